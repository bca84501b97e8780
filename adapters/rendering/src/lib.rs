#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation contracts for Upside Home adapters.
//!
//! Backends never read the world directly. Adapters gather a [`SessionView`]
//! from world queries once per frame, compose it into a [`Frame`], and hand
//! the frame to a [`RenderingBackend`]. Cues go to an [`AudioSink`].

use std::time::Duration;

use anyhow::Result as AnyResult;
use glam::Vec2;
use upside_home_core::{
    ActorSnapshot, Cue, GameState, HomeLayout, KeyItem, LevelTopology, Notice, TilePosition,
    WELCOME_BANNER,
};

/// Offset of a trailing key relative to the player, in tiles on both axes.
const KEY_FOLLOW_OFFSET_TILES: f32 = 0.6;

/// Headline displayed once the session is won.
pub const WIN_HEADLINE: &str = "SHE IS HOME";

/// Computes the top-left corner of the viewport in world units.
///
/// The viewport is centred on `focus` and each axis is clamped to
/// `[0, map - viewport]`. When the map is not larger than the viewport on an
/// axis the map is centred instead, producing a negative offset.
#[must_use]
pub fn clamp_camera(focus: Vec2, viewport: Vec2, map: Vec2) -> Vec2 {
    Vec2::new(
        clamp_axis(focus.x, viewport.x, map.x),
        clamp_axis(focus.y, viewport.y, map.y),
    )
}

fn clamp_axis(focus: f32, viewport: f32, map: f32) -> f32 {
    let max = map - viewport;
    if max <= 0.0 {
        return -(viewport - map) / 2.0;
    }

    (focus - viewport / 2.0).clamp(0.0, max)
}

/// Formats a duration as zero-padded `MM:SS`, truncating partial seconds.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs();
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Raw session data an adapter collects before composing a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionView {
    /// Active game state.
    pub state: GameState,
    /// Number of labyrinths in play order.
    pub level_count: usize,
    /// Snapshot of the player.
    pub actor: ActorSnapshot,
    /// State of the key item.
    pub key: KeyItem,
    /// Tile length shared by every map.
    pub tile_length: f32,
    /// Extent of the active map in world units.
    pub map_extent: Vec2,
    /// Whether restricted visibility applies to the active map.
    pub aura: bool,
    /// Door layout of the hub.
    pub home: HomeLayout,
    /// Topology of the active labyrinth, present only while in a level.
    pub level: Option<LevelTopology>,
    /// Active notice, if any.
    pub notice: Option<Notice>,
    /// Session time so far, frozen once won.
    pub elapsed: Duration,
}

/// Door tile drawn in the active map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DoorPresentation {
    /// Tile occupied by the door.
    pub tile: TilePosition,
    /// Whether the door is drawn crossed out.
    pub locked: bool,
}

impl DoorPresentation {
    const fn open(tile: TilePosition) -> Self {
        Self {
            tile,
            locked: false,
        }
    }
}

/// Text overlay describing progress.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hud {
    /// Either `HOME` or `LEVEL n`.
    pub label: String,
    /// Short hint about what to do next.
    pub objective: &'static str,
    /// Transient notice text.
    pub notice: Option<String>,
}

impl Hud {
    /// Derives the overlay for the provided session data.
    #[must_use]
    pub fn describe(view: &SessionView) -> Self {
        let label = match view.state {
            GameState::Level(level) => format!("LEVEL {}", level.ordinal()),
            GameState::Intro | GameState::Home | GameState::Win => "HOME".to_owned(),
        };

        let objective = if view.actor.has_key {
            "RETURN HOME"
        } else if view.state == GameState::Home {
            "ENTER LAB 1"
        } else {
            "GO SOUTH"
        };

        Self {
            label,
            objective,
            notice: view.notice.map(|notice| notice.text()),
        }
    }
}

/// Explorable scene drawn while in the hub or a labyrinth.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Top-left corner of the viewport in world units.
    pub camera: Vec2,
    /// Snapshot of the player.
    pub actor: ActorSnapshot,
    /// Tile length used to scale sprites.
    pub tile_length: f32,
    /// Whether the scene is masked by the visibility aura.
    pub aura: bool,
    /// Doors of the active map.
    pub doors: Vec<DoorPresentation>,
    /// Position at which the key is drawn, if visible.
    pub key: Option<Vec2>,
    /// Text overlay.
    pub hud: Hud,
}

/// Everything a backend needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    /// Title screen waiting for the start signal.
    Intro {
        /// Banner explaining the goal.
        banner: &'static str,
    },
    /// The player is moving through the hub or a labyrinth.
    Exploring(Scene),
    /// Terminal screen.
    Won {
        /// Headline text.
        headline: &'static str,
        /// Completion time formatted as `MM:SS`.
        time: String,
    },
}

impl Frame {
    /// Composes the frame for the provided session data and viewport size.
    #[must_use]
    pub fn compose(view: &SessionView, viewport: Vec2) -> Self {
        match view.state {
            GameState::Intro => Self::Intro {
                banner: WELCOME_BANNER,
            },
            GameState::Win => Self::Won {
                headline: WIN_HEADLINE,
                time: format_elapsed(view.elapsed),
            },
            GameState::Home | GameState::Level(_) => Self::Exploring(Scene {
                camera: clamp_camera(view.actor.position, viewport, view.map_extent),
                actor: view.actor,
                tile_length: view.tile_length,
                aura: view.aura && view.state.level().is_some(),
                doors: doors(view),
                key: key_position(view),
                hud: Hud::describe(view),
            }),
        }
    }
}

fn doors(view: &SessionView) -> Vec<DoorPresentation> {
    match (view.state, view.level) {
        (GameState::Level(_), Some(topology)) => vec![
            DoorPresentation::open(topology.entry),
            DoorPresentation::open(topology.exit),
        ],
        (GameState::Home, _) => vec![
            DoorPresentation::open(view.home.entry_door),
            DoorPresentation {
                tile: view.home.win_door,
                locked: !view.actor.has_key,
            },
        ],
        _ => Vec::new(),
    }
}

fn key_position(view: &SessionView) -> Option<Vec2> {
    if view.actor.has_key && view.key.following {
        let offset = Vec2::splat(view.tile_length * KEY_FOLLOW_OFFSET_TILES);
        return Some(view.actor.position - offset);
    }

    let in_final_level = view
        .state
        .level()
        .is_some_and(|level| level.is_last(view.level_count));
    (in_final_level && !view.key.collected).then_some(view.key.position)
}

/// Rendering backend capable of presenting Upside Home frames.
pub trait RenderingBackend {
    /// Presents a single composed frame.
    fn present(&mut self, frame: &Frame) -> AnyResult<()>;
}

/// Receives audio cues triggered by the world.
pub trait AudioSink {
    /// Plays, starts or stops the sound associated with the cue.
    fn play(&mut self, cue: Cue) -> AnyResult<()>;
}
