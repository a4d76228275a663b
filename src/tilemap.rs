//! Tiled Map Loading
//!
//! Reads orthogonal maps exported by the Tiled editor as JSON (CSV-style
//! `data` arrays, not base64). Every non-empty cell of a tile layer becomes
//! a static solid unless the layer has a `collide` property set to `false`.
//! An object named `spawn` in any object layer gives the player spawn.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::core::rect::Rect;
use crate::core::vec2::Vec2;
use crate::game::solid::Solid;
use crate::game::world::{World, DEFAULT_SPAWN};

/// Tiled stores flip flags in the top bits of each gid.
const GID_MASK: u32 = 0x1FFF_FFFF;

/// Tilemap errors.
#[derive(Debug, thiserror::Error)]
pub enum TilemapError {
    /// Reading the map file failed.
    #[error("Failed to read tilemap {}: {source}", path.display())]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The file is not valid Tiled JSON.
    #[error("Invalid tilemap JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid Tiled JSON using a feature this loader does not handle.
    #[error("Unsupported tilemap: {0}")]
    Unsupported(String),
}

// =============================================================================
// TILED JSON
// =============================================================================

/// Custom property on a layer or object.
#[derive(Clone, Debug, Deserialize)]
pub struct Property {
    /// Property name
    pub name: String,
    /// Raw JSON value
    pub value: serde_json::Value,
}

/// Grid of tile gids.
#[derive(Clone, Debug, Deserialize)]
pub struct TileLayer {
    /// Layer name
    #[serde(default)]
    pub name: String,
    /// Width in tiles
    pub width: u32,
    /// Height in tiles
    pub height: u32,
    /// Row-major gids, 0 = empty
    #[serde(default)]
    pub data: Option<Vec<u32>>,
    /// Set for compressed or base64 layers
    #[serde(default)]
    pub encoding: Option<String>,
    /// Custom properties
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl TileLayer {
    /// Does this layer block actors?
    pub fn collides(&self) -> bool {
        !self
            .properties
            .iter()
            .any(|p| p.name == "collide" && p.value == serde_json::Value::Bool(false))
    }
}

/// Placed object.
#[derive(Clone, Debug, Deserialize)]
pub struct MapObject {
    /// Object name
    #[serde(default)]
    pub name: String,
    /// Left in pixels
    pub x: f32,
    /// Top in pixels
    pub y: f32,
}

/// Layer of free-placed objects.
#[derive(Clone, Debug, Deserialize)]
pub struct ObjectGroup {
    /// Layer name
    #[serde(default)]
    pub name: String,
    /// Objects
    #[serde(default)]
    pub objects: Vec<MapObject>,
}

/// One map layer.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Layer {
    /// Tile grid
    TileLayer(TileLayer),
    /// Objects
    ObjectGroup(ObjectGroup),
    /// Image and group layers are ignored
    #[serde(other)]
    Other,
}

/// Tileset reference.
#[derive(Clone, Debug, Deserialize)]
pub struct Tileset {
    /// First gid belonging to this tileset
    pub firstgid: u32,
    /// Tiles per row in the image
    #[serde(default)]
    pub columns: u32,
    /// Image path, relative to the map
    #[serde(default)]
    pub image: Option<String>,
}

/// Tiled map document.
#[derive(Clone, Debug, Deserialize)]
pub struct TiledMap {
    /// Width in tiles
    pub width: u32,
    /// Height in tiles
    pub height: u32,
    /// Tile width in pixels
    #[serde(rename = "tilewidth")]
    pub tile_width: u32,
    /// Tile height in pixels
    #[serde(rename = "tileheight")]
    pub tile_height: u32,
    /// Map orientation
    #[serde(default)]
    pub orientation: Option<String>,
    /// Chunked map
    #[serde(default)]
    pub infinite: bool,
    /// Layers, bottom to top
    #[serde(default)]
    pub layers: Vec<Layer>,
    /// Tilesets
    #[serde(default)]
    pub tilesets: Vec<Tileset>,
}

// =============================================================================
// LOADED MAP
// =============================================================================

/// A drawable tile.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    /// Global tile id (flip flags stripped)
    pub gid: u32,
    /// Source rectangle in the tileset image
    pub src: Rect,
    /// Destination rectangle in the world
    pub dst: Rect,
    /// Index into `Tilemap::solids` if this tile blocks
    pub solid: Option<usize>,
}

/// A map ready to build a world from.
#[derive(Clone, Debug, Default)]
pub struct Tilemap {
    /// Name (usually the file path)
    pub name: String,
    /// Tileset image, if any
    pub tileset_image: Option<String>,
    /// All non-empty tiles, bottom layer first
    pub tiles: Vec<Tile>,
    /// Static solids from colliding layers
    pub solids: Vec<Solid>,
    /// Player spawn from the `spawn` object
    pub spawn: Option<Vec2>,
}

impl Tilemap {
    /// Build a world from this map's static geometry.
    ///
    /// Falls back to the default spawn when the map has none.
    pub fn build_world(&self) -> World {
        let spawn = match self.spawn {
            Some(spawn) => spawn,
            None => {
                warn!("Tilemap {} has no spawn object, using default", self.name);
                DEFAULT_SPAWN
            }
        };
        World::from_static_geometry(self.solids.clone(), spawn)
    }
}

/// Convert a parsed Tiled document.
pub fn from_tiled(name: &str, map: &TiledMap) -> Result<Tilemap, TilemapError> {
    if let Some(orientation) = &map.orientation {
        if orientation != "orthogonal" {
            return Err(TilemapError::Unsupported(format!("{} orientation", orientation)));
        }
    }
    if map.infinite {
        return Err(TilemapError::Unsupported("infinite maps".to_string()));
    }

    let tile_w = map.tile_width as f32;
    let tile_h = map.tile_height as f32;

    let mut tilemap = Tilemap {
        name: name.to_string(),
        tileset_image: map.tilesets.first().and_then(|t| t.image.clone()),
        ..Tilemap::default()
    };

    for layer in &map.layers {
        match layer {
            Layer::TileLayer(layer) => {
                if let Some(encoding) = &layer.encoding {
                    if encoding != "csv" {
                        return Err(TilemapError::Unsupported(format!(
                            "layer '{}' uses {} encoding",
                            layer.name, encoding
                        )));
                    }
                }
                let Some(data) = &layer.data else {
                    return Err(TilemapError::Unsupported(format!(
                        "layer '{}' has no data",
                        layer.name
                    )));
                };
                let collides = layer.collides();

                for (index, raw) in data.iter().enumerate() {
                    let gid = raw & GID_MASK;
                    if gid == 0 || layer.width == 0 {
                        continue;
                    }

                    let col = (index as u32 % layer.width) as f32;
                    let row = (index as u32 / layer.width) as f32;
                    let dst = Rect::new(col * tile_w, row * tile_h, tile_w, tile_h);

                    let solid = if collides {
                        tilemap.solids.push(Solid::new(dst));
                        Some(tilemap.solids.len() - 1)
                    } else {
                        None
                    };

                    tilemap.tiles.push(Tile {
                        gid,
                        src: source_rect(map, gid),
                        dst,
                        solid,
                    });
                }
            }
            Layer::ObjectGroup(group) => {
                if let Some(spawn) = group.objects.iter().find(|o| o.name == "spawn") {
                    // Tiled places objects at sub-pixel positions
                    tilemap.spawn = Some(Vec2::new(spawn.x.round(), spawn.y.round()));
                }
            }
            Layer::Other => {}
        }
    }

    Ok(tilemap)
}

/// Where a gid lives in its tileset image.
fn source_rect(map: &TiledMap, gid: u32) -> Rect {
    let tileset = map
        .tilesets
        .iter()
        .filter(|t| t.firstgid <= gid)
        .max_by_key(|t| t.firstgid);

    let (local, columns) = match tileset {
        Some(t) => (gid - t.firstgid, t.columns.max(1)),
        None => (0, 1),
    };

    let w = map.tile_width as f32;
    let h = map.tile_height as f32;
    Rect::new((local % columns) as f32 * w, (local / columns) as f32 * h, w, h)
}

/// Parse Tiled JSON text.
pub fn parse_tilemap(name: &str, json: &str) -> Result<Tilemap, TilemapError> {
    let map: TiledMap = serde_json::from_str(json)?;
    from_tiled(name, &map)
}

/// Load a Tiled JSON map from disk.
pub fn load_tilemap(path: impl AsRef<Path>) -> Result<Tilemap, TilemapError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| TilemapError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let tilemap = parse_tilemap(&path.display().to_string(), &json)?;
    info!(
        "Loaded tilemap {} ({} tiles, {} solids)",
        path.display(),
        tilemap.tiles.len(),
        tilemap.solids.len()
    );
    Ok(tilemap)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = r#"{
        "width": 4,
        "height": 3,
        "tilewidth": 16,
        "tileheight": 16,
        "orientation": "orthogonal",
        "infinite": false,
        "layers": [
            {
                "type": "tilelayer",
                "name": "background",
                "width": 4,
                "height": 3,
                "data": [5, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
                "properties": [{ "name": "collide", "type": "bool", "value": false }]
            },
            {
                "type": "tilelayer",
                "name": "ground",
                "width": 4,
                "height": 3,
                "data": [0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 2147483651, 0]
            },
            {
                "type": "objectgroup",
                "name": "objects",
                "objects": [
                    { "id": 1, "name": "spawn", "x": 16, "y": 0, "width": 0, "height": 0 }
                ]
            },
            { "type": "imagelayer", "name": "sky" }
        ],
        "tilesets": [
            { "firstgid": 1, "columns": 4, "image": "tiles.png", "tilewidth": 16, "tileheight": 16 }
        ]
    }"#;

    #[test]
    fn test_parse_tilemap() {
        let map = parse_tilemap("test", MAP).unwrap();

        assert_eq!(map.tiles.len(), 4);
        assert_eq!(map.solids.len(), 3);
        assert_eq!(map.spawn, Some(Vec2::new(16.0, 0.0)));
        assert_eq!(map.tileset_image.as_deref(), Some("tiles.png"));

        // Background tile is drawn but does not block
        assert_eq!(map.tiles[0].gid, 5);
        assert_eq!(map.tiles[0].src, Rect::new(0.0, 16.0, 16.0, 16.0));
        assert_eq!(map.tiles[0].solid, None);

        // Bottom row, flipped tile has its flags stripped
        assert_eq!(map.solids[0].bounds, Rect::new(0.0, 32.0, 16.0, 16.0));
        assert_eq!(map.tiles[3].gid, 3);
        assert_eq!(map.tiles[3].dst, Rect::new(32.0, 32.0, 16.0, 16.0));
        assert_eq!(map.tiles[3].solid, Some(2));
    }

    #[test]
    fn test_build_world() {
        let map = parse_tilemap("test", MAP).unwrap();
        let world = map.build_world();

        assert_eq!(world.tiles.len(), 3);
        assert!(world.solids.is_empty());
        assert_eq!(world.player_actor().unwrap().bounds.x, 16.0);
    }

    #[test]
    fn test_fractional_spawn_lands_and_jumps() {
        use crate::game::animation::AnimationLibrary;
        use crate::game::events::GameEventData;
        use crate::game::input::InputFrame;
        use crate::game::tick::{tick, SimConfig};

        let floor = vec![1u32; 8];
        let mut data = vec![0u32; 24];
        data.extend(floor);
        let json = serde_json::json!({
            "width": 8, "height": 4, "tilewidth": 16, "tileheight": 16,
            "layers": [
                { "type": "tilelayer", "name": "ground", "width": 8, "height": 4, "data": data },
                {
                    "type": "objectgroup",
                    "name": "objects",
                    "objects": [{ "id": 1, "name": "spawn", "x": 40.5, "y": 3.5 }]
                }
            ]
        })
        .to_string();

        let map = parse_tilemap("fractional", &json).unwrap();
        assert_eq!(map.spawn, Some(Vec2::new(41.0, 4.0)));

        let mut world = map.build_world();
        let config = SimConfig::default();
        let animations = AnimationLibrary::with_defaults();
        for _ in 0..120 {
            tick(&mut world, &InputFrame::new(), &config, &animations);
        }

        let player = world.player_actor().unwrap();
        assert!(player.grounded);
        assert_eq!(player.hitbox.bottom(), 48.0);

        let jump = InputFrame::new().with(InputFrame::FLAG_JUMP);
        let result = tick(&mut world, &jump, &config, &animations);
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e.data, GameEventData::ActorJumped { .. })));
    }

    #[test]
    fn test_missing_spawn_uses_default() {
        let json = r#"{ "width": 1, "height": 1, "tilewidth": 8, "tileheight": 8, "layers": [] }"#;
        let world = parse_tilemap("empty", json).unwrap().build_world();
        assert_eq!(world.spawn, DEFAULT_SPAWN);
    }

    #[test]
    fn test_base64_layer_unsupported() {
        let json = r#"{
            "width": 1, "height": 1, "tilewidth": 8, "tileheight": 8,
            "layers": [{ "type": "tilelayer", "width": 1, "height": 1, "encoding": "base64", "data": null }]
        }"#;
        let err = parse_tilemap("b64", json).unwrap_err();
        assert!(matches!(err, TilemapError::Unsupported(_)));
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_tilemap("bad", "{ not json").unwrap_err();
        assert!(matches!(err, TilemapError::Json(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.json");
        fs::write(&path, MAP).unwrap();

        let map = load_tilemap(&path).unwrap();
        assert_eq!(map.solids.len(), 3);
    }
}
