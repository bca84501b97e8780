#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Upside Home engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative session world, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems and
//! presentation collaborators to react to. Systems read immutable snapshots such
//! as [`ProgressFacts`] and respond exclusively with new command batches.

mod grid;

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use grid::{Cell, GridError, MapData, TileGrid, TilePosition};

/// Canonical banner shown on the intro screen.
pub const WELCOME_BANNER: &str = "You lost the key in one of the labyrinths. Find it.";

/// Zero-based ordinal of a labyrinth in play order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelIndex(usize);

impl LevelIndex {
    /// Index of the first labyrinth.
    pub const FIRST: Self = Self(0);

    /// Creates a new level index.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Retrieves the zero-based index.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }

    /// One-based number presented to players.
    #[must_use]
    pub const fn ordinal(&self) -> usize {
        self.0 + 1
    }

    /// Index of the following labyrinth.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Reports whether this is the final labyrinth of a sequence of `count` levels.
    #[must_use]
    pub const fn is_last(&self, count: usize) -> bool {
        count > 0 && self.0 + 1 == count
    }
}

/// Hierarchical game state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Title screen awaiting the start signal.
    Intro,
    /// The hub connecting the player to the labyrinths.
    Home,
    /// Exploring the labyrinth with the provided index.
    Level(LevelIndex),
    /// Terminal state reached by returning home with the key.
    Win,
}

impl GameState {
    /// Reports whether the player moves around a map in this state.
    #[must_use]
    pub const fn is_exploring(&self) -> bool {
        matches!(self, Self::Home | Self::Level(_))
    }

    /// Index of the active labyrinth, if any.
    #[must_use]
    pub const fn level(&self) -> Option<LevelIndex> {
        match self {
            Self::Level(index) => Some(*index),
            _ => None,
        }
    }
}

/// Directions currently held by the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct HeldDirections {
    /// Movement toward decreasing column indices.
    pub left: bool,
    /// Movement toward increasing column indices.
    pub right: bool,
    /// Movement toward decreasing row indices.
    pub up: bool,
    /// Movement toward increasing row indices.
    pub down: bool,
}

/// Per-frame movement intent supplied by the input source.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveInput {
    axis: Vec2,
    sprint: bool,
}

impl MoveInput {
    /// Creates a new input from a raw axis and the speed modifier signal.
    #[must_use]
    pub const fn new(axis: Vec2, sprint: bool) -> Self {
        Self { axis, sprint }
    }

    /// Input describing a stationary player.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            axis: Vec2::ZERO,
            sprint: false,
        }
    }

    /// Derives the axis from held directions; opposing directions cancel.
    #[must_use]
    pub fn from_held(held: HeldDirections, sprint: bool) -> Self {
        let x = f32::from(u8::from(held.right)) - f32::from(u8::from(held.left));
        let y = f32::from(u8::from(held.down)) - f32::from(u8::from(held.up));
        Self::new(Vec2::new(x, y), sprint)
    }

    /// Raw axis as supplied by the input source.
    #[must_use]
    pub const fn axis(&self) -> Vec2 {
        self.axis
    }

    /// Whether the speed modifier is engaged.
    #[must_use]
    pub const fn sprint(&self) -> bool {
        self.sprint
    }

    /// Reports whether the player requests any movement.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.axis != Vec2::ZERO
    }

    /// Unit-length direction of travel, or zero when idle.
    #[must_use]
    pub fn direction(&self) -> Vec2 {
        self.axis.normalize_or_zero()
    }
}

/// Audio cues forwarded to the audio collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Ambient loop begins when the session starts.
    AmbientStarted,
    /// Ambient loop stops.
    AmbientStopped,
    /// Footstep loop begins because the player started moving.
    FootstepsStarted,
    /// Footstep loop stops because the player stood still or the game ended.
    FootstepsStopped,
    /// The key was picked up.
    KeyFound,
    /// The player brought the key home.
    Victory,
}

/// Transient text notices surfaced to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Notice {
    /// Announces arrival in the labyrinth with the provided index.
    LevelReached(LevelIndex),
    /// Announces the return to the hub through the final exit.
    ReturnedHome,
    /// The final exit stays closed until the key is found.
    KeyRequired,
    /// The key has been picked up.
    KeyFound,
}

impl Notice {
    /// Text displayed while the notice is active.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::LevelReached(level) => format!("LEVEL {}", level.ordinal()),
            Self::ReturnedHome => "HOME".to_owned(),
            Self::KeyRequired => "NEED THE KEY".to_owned(),
            Self::KeyFound => "KEY FOUND - RETURN HOME".to_owned(),
        }
    }

    /// Duration the notice remains visible.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        match self {
            Self::LevelReached(_) | Self::ReturnedHome => Duration::from_secs(2),
            Self::KeyRequired => Duration::from_millis(1_500),
            Self::KeyFound => Duration::from_millis(3_500),
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the session clock and integrates player movement.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
        /// Movement intent captured for this frame.
        input: MoveInput,
    },
    /// Leaves the intro screen and places the player in the hub.
    BeginSession,
    /// Moves the player to the entry of the provided labyrinth.
    EnterLevel {
        /// Labyrinth to enter.
        level: LevelIndex,
    },
    /// Moves the player back to the hub's entry door.
    ReturnHome,
    /// Picks up the key lying in the final labyrinth.
    CollectKey,
    /// Ends the session in the terminal win state.
    DeclareVictory,
    /// Replaces the active notice.
    ShowNotice {
        /// Notice to display.
        notice: Notice,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the session clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player moved through the active map.
    ActorMoved {
        /// Position before integrating the tick's movement.
        from: Vec2,
        /// Position after collision resolution.
        to: Vec2,
    },
    /// Announces that the session entered a new state.
    StateChanged {
        /// State before the transition.
        from: GameState,
        /// State after the transition.
        to: GameState,
    },
    /// Confirms that the player was relocated onto a tile of the active map.
    ActorTeleported {
        /// Tile the player now occupies.
        tile: TilePosition,
    },
    /// Confirms that the key was (re)placed on the provided tile.
    KeyPlaced {
        /// Tile holding the key.
        tile: TilePosition,
    },
    /// Confirms that the player picked up the key.
    KeyCollected {
        /// Tile the key was found on.
        tile: TilePosition,
    },
    /// Reports that a notice became active.
    NoticeShown {
        /// Notice now displayed.
        notice: Notice,
    },
    /// Reports that the active notice expired.
    NoticeCleared,
    /// Requests playback or suspension of an audio cue.
    CueTriggered {
        /// Cue to forward to the audio collaborator.
        cue: Cue,
    },
    /// Reports the frozen completion time once the session is won.
    SessionWon {
        /// Time between the session start and the win.
        elapsed: Duration,
    },
}

/// Derived layout of a labyrinth computed once when the level is loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LevelTopology {
    /// Tile where the player arrives.
    pub entry: TilePosition,
    /// Tile leading to the next labyrinth or back home.
    pub exit: TilePosition,
    /// Tile holding the key when this is the final labyrinth.
    pub key_tile: TilePosition,
    /// Breadth-first distance between the entry and the key tile.
    pub key_distance: u32,
}

/// Fixed door layout of the hub.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HomeLayout {
    /// Door leading into the first labyrinth.
    pub entry_door: TilePosition,
    /// Door that ends the game once the key is brought back.
    pub win_door: TilePosition,
    /// Tile where the player starts the session.
    pub center: TilePosition,
}

/// Immutable snapshot of the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorSnapshot {
    /// Continuous position in world units.
    pub position: Vec2,
    /// Collision radius in world units.
    pub radius: f32,
    /// Tile derived from the continuous position.
    pub tile: TilePosition,
    /// Whether the player carries the key.
    pub has_key: bool,
}

/// State of the key item.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KeyItem {
    /// Resting position of the key in world units.
    pub position: Vec2,
    /// Whether the key has been picked up.
    pub collected: bool,
    /// Whether the key trails the player.
    pub following: bool,
}

/// World facts consulted by the progression system once per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressFacts {
    /// Active game state.
    pub state: GameState,
    /// Most recently entered labyrinth; retained while in the hub.
    pub current_level: LevelIndex,
    /// Number of labyrinths in play order.
    pub level_count: usize,
    /// Tile the player occupies.
    pub actor_tile: TilePosition,
    /// Whether the player carries the key.
    pub has_key: bool,
    /// Whether the key item has been picked up.
    pub key_collected: bool,
    /// Door layout of the hub.
    pub home: HomeLayout,
    /// Topology of the active labyrinth, present only while in a level.
    pub level: Option<LevelTopology>,
}
