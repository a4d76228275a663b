//! Plain-Text Level Format
//!
//! One solid per line, five whitespace-separated decimal integers:
//!
//! ```text
//! x y width height collidable
//! 0 0 500 20 1
//! ```
//!
//! `collidable` is `0` or `1`. There is no header. Lines that do not parse
//! are skipped with a warning; they never fail the load.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::game::solid::Solid;

/// Level file errors.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    /// Reading the level file failed.
    #[error("Failed to read level {}: {source}", path.display())]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Writing the level file failed.
    #[error("Failed to write level {}: {source}", path.display())]
    Write {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
}

/// Parse one level line. `None` if it is not a valid solid.
fn parse_line(line: &str) -> Option<Solid> {
    let mut fields = line.split_whitespace().map(str::parse::<i32>);

    let x = fields.next()?.ok()?;
    let y = fields.next()?.ok()?;
    let width = fields.next()?.ok()?;
    let height = fields.next()?.ok()?;
    let collidable = match fields.next()?.ok()? {
        0 => false,
        1 => true,
        _ => return None,
    };

    Some(Solid::from_ints(x, y, width, height, collidable))
}

/// Parse level text into solids, in file order.
pub fn parse_level(text: &str) -> Vec<Solid> {
    let mut solids = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Some(solid) => solids.push(solid),
            None => warn!("Skipping malformed level line {}: {:?}", index + 1, line),
        }
    }

    solids
}

/// Serialize solids to level text.
///
/// Coordinates are rounded to whole pixels.
pub fn write_level(solids: &[Solid]) -> String {
    let mut out = String::with_capacity(solids.len() * 24);

    for solid in solids {
        let bounds = &solid.bounds;
        out.push_str(&format!(
            "{} {} {} {} {}\n",
            bounds.x.round() as i32,
            bounds.y.round() as i32,
            bounds.width.round() as i32,
            bounds.height.round() as i32,
            u8::from(solid.collidable),
        ));
    }

    out
}

/// Load solids from a level file.
pub fn load_level(path: impl AsRef<Path>) -> Result<Vec<Solid>, LevelError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LevelError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let solids = parse_level(&text);
    info!("Loaded level {} ({} solids)", path.display(), solids.len());
    Ok(solids)
}

/// Save solids to a level file, replacing it.
pub fn save_level(path: impl AsRef<Path>, solids: &[Solid]) -> Result<(), LevelError> {
    let path = path.as_ref();
    fs::write(path, write_level(solids)).map_err(|source| LevelError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Saved level {} ({} solids)", path.display(), solids.len());
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
