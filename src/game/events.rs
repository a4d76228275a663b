//! Game Events
//!
//! Tick-local reactions recorded during simulation, drained into
//! `TickResult` at the end of each tick.

use serde::{Serialize, Deserialize};
use crate::game::actor::ActorId;
use crate::game::solid::SolidId;

/// Priority for event processing order.
///
/// Lower value = processed first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventPriority {
    /// Squished actors are handled first
    Squish = 0,
    /// Then landings
    Landing = 1,
    /// Then jumps
    Jump = 2,
    /// Lowest priority
    Other = 255,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameEventData {
    /// A moving solid pushed an actor into something it could not clear
    ActorSquished {
        /// Actor that was squished
        actor: ActorId,
        /// Solid doing the pushing
        solid: SolidId,
    },

    /// Actor went from airborne to grounded
    ActorLanded {
        /// Actor that landed
        actor: ActorId,
    },

    /// Actor left the ground by jumping
    ActorJumped {
        /// Actor that jumped
        actor: ActorId,
    },
}

/// A game event with timing and priority.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u64,

    /// Processing priority
    pub priority: EventPriority,

    /// Actor involved (for tie-breaking)
    pub actor: ActorId,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u64, priority: EventPriority, data: GameEventData) -> Self {
        let actor = match &data {
            GameEventData::ActorSquished { actor, .. } => *actor,
            GameEventData::ActorLanded { actor } => *actor,
            GameEventData::ActorJumped { actor } => *actor,
        };

        Self {
            tick,
            priority,
            actor,
            data,
        }
    }

    /// Create actor squished event.
    pub fn actor_squished(tick: u64, actor: ActorId, solid: SolidId) -> Self {
        Self::new(
            tick,
            EventPriority::Squish,
            GameEventData::ActorSquished { actor, solid },
        )
    }

    /// Create actor landed event.
    pub fn actor_landed(tick: u64, actor: ActorId) -> Self {
        Self::new(tick, EventPriority::Landing, GameEventData::ActorLanded { actor })
    }

    /// Create actor jumped event.
    pub fn actor_jumped(tick: u64, actor: ActorId) -> Self {
        Self::new(tick, EventPriority::Jump, GameEventData::ActorJumped { actor })
    }
}

impl PartialOrd for GameEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GameEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: tick, then priority, then actor index, then payload
        self.tick
            .cmp(&other.tick)
            .then(self.priority.cmp(&other.priority))
            .then(self.actor.cmp(&other.actor))
            .then_with(|| self.data.cmp(&other.data))
    }
}
