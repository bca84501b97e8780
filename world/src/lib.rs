#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Upside Home.

pub mod motion;
pub mod topology;

use std::time::Duration;

use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use upside_home_core::{
    Command, Cue, Event, GameState, GridError, HomeLayout, KeyItem, LevelIndex, LevelTopology,
    MoveInput, Notice, TileGrid, TilePosition,
};

const DEFAULT_HOME_COLUMNS: u32 = 25;
const DEFAULT_HOME_ROWS: u32 = 17;
const MIN_HOME_EXTENT: u32 = 3;

/// Tunable parameters of a session.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of tile columns in the hub.
    pub home_columns: u32,
    /// Number of tile rows in the hub.
    pub home_rows: u32,
    /// Player collision radius as a fraction of the tile length.
    pub radius_factor: f32,
    /// Player speed in tiles per second.
    pub speed_factor: f32,
    /// Speed multiplier applied while the speed modifier is held.
    pub sprint_multiplier: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            home_columns: DEFAULT_HOME_COLUMNS,
            home_rows: DEFAULT_HOME_ROWS,
            radius_factor: 0.45,
            speed_factor: 18.0,
            sprint_multiplier: 2.0,
        }
    }
}

/// Labyrinth supplied by the map data source.
#[derive(Clone, Debug)]
pub struct LevelMap {
    grid: TileGrid,
    aura: bool,
}

impl LevelMap {
    /// Creates a labyrinth description from its grid and visibility flag.
    #[must_use]
    pub const fn new(grid: TileGrid, aura: bool) -> Self {
        Self { grid, aura }
    }
}

/// Reasons a session cannot be assembled.
#[derive(Debug, Error)]
pub enum WorldError {
    /// At least one labyrinth is required.
    #[error("a session needs at least one level")]
    NoLevels,
    /// All labyrinths must share the tile length of the first one.
    #[error("level {level} uses tile size {actual}, expected {expected}")]
    TileLengthMismatch {
        /// Zero-based index of the offending level.
        level: usize,
        /// Tile length of the first level.
        expected: f32,
        /// Tile length of the offending level.
        actual: f32,
    },
    /// The hub must leave room for its two doors.
    #[error("home must be at least 3x3 tiles (got {columns}x{rows})")]
    HomeTooSmall {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// The hub grid could not be built.
    #[error("invalid home grid: {0}")]
    HomeGrid(#[from] GridError),
}

/// Represents the authoritative Upside Home session.
#[derive(Debug)]
pub struct World {
    config: SessionConfig,
    home: Home,
    levels: Vec<Level>,
    state: GameState,
    current_level: LevelIndex,
    actor: Actor,
    key: KeyItem,
    notice: Option<ActiveNotice>,
    clock: Duration,
    started_at: Option<Duration>,
    finished_in: Option<Duration>,
    footsteps: bool,
}

impl World {
    /// Creates a session in the intro state with the player at the hub centre.
    ///
    /// Level topologies are solved once here and never recomputed.
    pub fn new(config: SessionConfig, levels: Vec<LevelMap>) -> Result<Self, WorldError> {
        let Some(first) = levels.first() else {
            return Err(WorldError::NoLevels);
        };
        let tile_length = first.grid.tile_length();

        if let Some((level, map)) = levels
            .iter()
            .enumerate()
            .find(|(_, map)| map.grid.tile_length() != tile_length)
        {
            return Err(WorldError::TileLengthMismatch {
                level,
                expected: tile_length,
                actual: map.grid.tile_length(),
            });
        }

        let home = Home::build(config.home_columns, config.home_rows, tile_length)?;
        let levels: Vec<Level> = levels
            .into_iter()
            .enumerate()
            .map(|(index, map)| {
                let topology = topology::solve(&map.grid);
                debug!(
                    level = index,
                    entry = ?topology.entry,
                    exit = ?topology.exit,
                    key = ?topology.key_tile,
                    key_distance = topology.key_distance,
                    "solved level topology"
                );
                Level {
                    grid: map.grid,
                    topology,
                    aura: map.aura,
                }
            })
            .collect();

        let actor = Actor {
            position: home.grid.tile_center(home.layout.center),
            radius: tile_length * config.radius_factor,
            speed: tile_length * config.speed_factor,
            has_key: false,
        };

        Ok(Self {
            config,
            home,
            levels,
            state: GameState::Intro,
            current_level: LevelIndex::FIRST,
            actor,
            key: KeyItem::default(),
            notice: None,
            clock: Duration::ZERO,
            started_at: None,
            finished_in: None,
            footsteps: false,
        })
    }

    fn active_grid(&self) -> &TileGrid {
        match self.state {
            GameState::Level(index) => &self.level(index).grid,
            GameState::Intro | GameState::Home | GameState::Win => &self.home.grid,
        }
    }

    fn level(&self, index: LevelIndex) -> &Level {
        assert!(
            index.get() < self.levels.len(),
            "level {} does not exist ({} levels loaded)",
            index.get(),
            self.levels.len()
        );
        &self.levels[index.get()]
    }

    fn is_final_level(&self, index: LevelIndex) -> bool {
        index.is_last(self.levels.len())
    }

    fn set_state(&mut self, to: GameState, out_events: &mut Vec<Event>) {
        let from = self.state;
        if from == to {
            return;
        }

        self.state = to;
        info!(?from, ?to, "game state changed");
        out_events.push(Event::StateChanged { from, to });
    }

    fn teleport(&mut self, tile: TilePosition, out_events: &mut Vec<Event>) {
        self.actor.position = self.active_grid().tile_center(tile);
        out_events.push(Event::ActorTeleported { tile });
    }

    fn trigger(&mut self, cue: Cue, out_events: &mut Vec<Event>) {
        debug!(?cue, "cue triggered");
        out_events.push(Event::CueTriggered { cue });
    }

    fn tick(&mut self, dt: Duration, input: MoveInput, out_events: &mut Vec<Event>) {
        self.clock = self.clock.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        if self.state.is_exploring() {
            self.update_footsteps(input.is_moving(), out_events);

            let multiplier = if input.sprint() {
                self.config.sprint_multiplier
            } else {
                1.0
            };
            let distance = self.actor.speed * multiplier * dt.as_secs_f32();
            let from = self.actor.position;
            let to = motion::integrate(
                self.active_grid(),
                from,
                self.actor.radius,
                input.direction(),
                distance,
            );

            if to != from {
                self.actor.position = to;
                out_events.push(Event::ActorMoved { from, to });
            }
        }

        self.advance_notice(dt, out_events);
    }

    fn update_footsteps(&mut self, moving: bool, out_events: &mut Vec<Event>) {
        if moving == self.footsteps {
            return;
        }

        self.footsteps = moving;
        let cue = if moving {
            Cue::FootstepsStarted
        } else {
            Cue::FootstepsStopped
        };
        self.trigger(cue, out_events);
    }

    fn advance_notice(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let Some(active) = self.notice.as_mut() else {
            return;
        };

        active.remaining = active.remaining.saturating_sub(dt);
        if active.remaining.is_zero() {
            self.notice = None;
            out_events.push(Event::NoticeCleared);
        }
    }

    fn begin_session(&mut self, out_events: &mut Vec<Event>) {
        if self.state != GameState::Intro {
            warn!(state = ?self.state, "session already started");
            return;
        }

        self.started_at = Some(self.clock);
        self.set_state(GameState::Home, out_events);
        self.trigger(Cue::AmbientStarted, out_events);
    }

    fn enter_level(&mut self, level: LevelIndex, out_events: &mut Vec<Event>) {
        let topology = self.level(level).topology;
        if !self.state.is_exploring() {
            warn!(state = ?self.state, ?level, "cannot enter a level outside exploration");
            return;
        }

        self.current_level = level;
        self.set_state(GameState::Level(level), out_events);
        self.teleport(topology.entry, out_events);

        if self.is_final_level(level) {
            self.key = KeyItem {
                position: self.active_grid().tile_center(topology.key_tile),
                collected: false,
                following: false,
            };
            out_events.push(Event::KeyPlaced {
                tile: topology.key_tile,
            });
        }
    }

    fn return_home(&mut self, out_events: &mut Vec<Event>) {
        if self.state.level().is_none() {
            warn!(state = ?self.state, "return home requested outside a level");
            return;
        }

        self.set_state(GameState::Home, out_events);
        self.teleport(self.home.layout.entry_door, out_events);
    }

    fn collect_key(&mut self, out_events: &mut Vec<Event>) {
        let Some(level) = self.state.level() else {
            return;
        };
        if !self.is_final_level(level) || self.key.collected {
            return;
        }

        let tile = self.level(level).topology.key_tile;
        self.key.collected = true;
        self.key.following = true;
        self.actor.has_key = true;
        info!(?tile, "key collected");
        out_events.push(Event::KeyCollected { tile });
        self.trigger(Cue::KeyFound, out_events);
    }

    fn declare_victory(&mut self, out_events: &mut Vec<Event>) {
        if self.state != GameState::Home {
            warn!(state = ?self.state, "victory requested away from home");
            return;
        }

        let elapsed = self
            .clock
            .saturating_sub(self.started_at.unwrap_or(Duration::ZERO));
        self.finished_in = Some(elapsed);
        self.set_state(GameState::Win, out_events);

        if self.footsteps {
            self.footsteps = false;
            self.trigger(Cue::FootstepsStopped, out_events);
        }
        self.trigger(Cue::AmbientStopped, out_events);
        self.trigger(Cue::Victory, out_events);
        info!(elapsed_secs = elapsed.as_secs_f32(), "session won");
        out_events.push(Event::SessionWon { elapsed });
    }

    fn show_notice(&mut self, notice: Notice, out_events: &mut Vec<Event>) {
        debug!(text = %notice.text(), "notice shown");
        self.notice = Some(ActiveNotice {
            notice,
            remaining: notice.duration(),
        });
        out_events.push(Event::NoticeShown { notice });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the session is won every command is ignored.
///
/// # Panics
///
/// Panics when asked to enter a level index that was never loaded.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.state == GameState::Win {
        return;
    }

    match command {
        Command::Tick { dt, input } => world.tick(dt, input, out_events),
        Command::BeginSession => world.begin_session(out_events),
        Command::EnterLevel { level } => world.enter_level(level, out_events),
        Command::ReturnHome => world.return_home(out_events),
        Command::CollectKey => world.collect_key(out_events),
        Command::DeclareVictory => world.declare_victory(out_events),
        Command::ShowNotice { notice } => world.show_notice(notice, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use upside_home_core::{
        ActorSnapshot, GameState, HomeLayout, KeyItem, LevelIndex, LevelTopology, Notice,
        ProgressFacts, TileGrid,
    };

    use super::{SessionConfig, World};

    /// Active game state.
    #[must_use]
    pub fn state(world: &World) -> GameState {
        world.state
    }

    /// Configuration the session was created with.
    #[must_use]
    pub fn config(world: &World) -> &SessionConfig {
        &world.config
    }

    /// Most recently entered labyrinth.
    #[must_use]
    pub fn current_level(world: &World) -> LevelIndex {
        world.current_level
    }

    /// Number of labyrinths in play order.
    #[must_use]
    pub fn level_count(world: &World) -> usize {
        world.levels.len()
    }

    /// Topology solved for the labyrinth, if it exists.
    #[must_use]
    pub fn level_topology(world: &World, level: LevelIndex) -> Option<LevelTopology> {
        world.levels.get(level.get()).map(|level| level.topology)
    }

    /// Grid of the labyrinth, if it exists.
    #[must_use]
    pub fn level_grid(world: &World, level: LevelIndex) -> Option<&TileGrid> {
        world.levels.get(level.get()).map(|level| &level.grid)
    }

    /// Grid the player currently moves through.
    #[must_use]
    pub fn active_grid(world: &World) -> &TileGrid {
        world.active_grid()
    }

    /// Grid of the hub.
    #[must_use]
    pub fn home_grid(world: &World) -> &TileGrid {
        &world.home.grid
    }

    /// Door layout of the hub.
    #[must_use]
    pub fn home_layout(world: &World) -> HomeLayout {
        world.home.layout
    }

    /// Whether restricted visibility applies to the active map.
    #[must_use]
    pub fn aura_enabled(world: &World) -> bool {
        world
            .state
            .level()
            .and_then(|level| world.levels.get(level.get()))
            .map_or(false, |level| level.aura)
    }

    /// Snapshot of the player.
    #[must_use]
    pub fn actor(world: &World) -> ActorSnapshot {
        ActorSnapshot {
            position: world.actor.position,
            radius: world.actor.radius,
            tile: world.active_grid().tile_at(world.actor.position),
            has_key: world.actor.has_key,
        }
    }

    /// State of the key item.
    #[must_use]
    pub fn key_item(world: &World) -> KeyItem {
        world.key
    }

    /// Active notice and its remaining display time.
    #[must_use]
    pub fn notice(world: &World) -> Option<(Notice, Duration)> {
        world
            .notice
            .as_ref()
            .map(|active| (active.notice, active.remaining))
    }

    /// Whether the footstep loop is playing.
    #[must_use]
    pub fn footsteps_active(world: &World) -> bool {
        world.footsteps
    }

    /// Total simulated time since the world was created.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Time since the session started, frozen once it is won.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        if let Some(finished) = world.finished_in {
            return finished;
        }

        world
            .started_at
            .map_or(Duration::ZERO, |start| world.clock.saturating_sub(start))
    }

    /// Facts consulted by the progression system.
    #[must_use]
    pub fn progress_facts(world: &World) -> ProgressFacts {
        ProgressFacts {
            state: world.state,
            current_level: world.current_level,
            level_count: world.levels.len(),
            actor_tile: actor(world).tile,
            has_key: world.actor.has_key,
            key_collected: world.key.collected,
            home: world.home.layout,
            level: world
                .state
                .level()
                .and_then(|level| level_topology(world, level)),
        }
    }
}

#[derive(Debug)]
struct Home {
    grid: TileGrid,
    layout: HomeLayout,
}

impl Home {
    fn build(columns: u32, rows: u32, tile_length: f32) -> Result<Self, WorldError> {
        if columns < MIN_HOME_EXTENT || rows < MIN_HOME_EXTENT {
            return Err(WorldError::HomeTooSmall { columns, rows });
        }

        let grid = TileGrid::bordered(columns, rows, tile_length)?;
        let center_column = i32::try_from(columns / 2).unwrap_or(i32::MAX);
        let last_inner_row = i32::try_from(rows - 2).unwrap_or(i32::MAX);
        let center_row = i32::try_from(rows / 2).unwrap_or(i32::MAX);

        Ok(Self {
            grid,
            layout: HomeLayout {
                entry_door: TilePosition::new(center_column, 1),
                win_door: TilePosition::new(center_column, last_inner_row),
                center: TilePosition::new(center_column, center_row),
            },
        })
    }
}

#[derive(Debug)]
struct Level {
    grid: TileGrid,
    topology: LevelTopology,
    aura: bool,
}

#[derive(Clone, Copy, Debug)]
struct Actor {
    position: Vec2,
    radius: f32,
    speed: f32,
    has_key: bool,
}

#[derive(Clone, Copy, Debug)]
struct ActiveNotice {
    notice: Notice,
    remaining: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TILE: f32 = 10.0;

    fn level_from(rows: &[&str], aura: bool) -> LevelMap {
        let codes: Vec<Vec<u8>> = rows
            .iter()
            .map(|line| line.bytes().map(|b| u8::from(b == b'#')).collect())
            .collect();
        let grid = TileGrid::from_codes(rows[0].len() as u32, rows.len() as u32, TILE, &codes)
            .expect("valid grid");
        LevelMap::new(grid, aura)
    }

    fn corridor(aura: bool) -> LevelMap {
        level_from(&["#####", "##.##", "##..#", "##.##", "#####"], aura)
    }

    fn world_with(levels: Vec<LevelMap>) -> World {
        World::new(SessionConfig::default(), levels).expect("valid world")
    }

    fn started(levels: Vec<LevelMap>) -> World {
        let mut world = world_with(levels);
        let mut events = Vec::new();
        apply(&mut world, Command::BeginSession, &mut events);
        world
    }

    fn tick(world: &mut World, millis: u64, input: MoveInput) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::Tick {
                dt: Duration::from_millis(millis),
                input,
            },
            &mut events,
        );
        events
    }

    #[test]
    fn new_world_waits_in_intro_at_home_center() {
        let world = world_with(vec![corridor(false)]);
        let actor = query::actor(&world);

        assert_eq!(query::state(&world), GameState::Intro);
        assert_eq!(actor.tile, TilePosition::new(12, 8));
        assert_eq!(actor.position, Vec2::new(125.0, 85.0));
        assert!((actor.radius - 4.5).abs() < f32::EPSILON);
        assert_eq!(
            query::home_layout(&world),
            HomeLayout {
                entry_door: TilePosition::new(12, 1),
                win_door: TilePosition::new(12, 15),
                center: TilePosition::new(12, 8),
            }
        );
    }

    #[test]
    fn new_world_rejects_missing_levels() {
        assert!(matches!(
            World::new(SessionConfig::default(), Vec::new()),
            Err(WorldError::NoLevels)
        ));
    }

    #[test]
    fn new_world_rejects_mismatched_tile_lengths() {
        let other = LevelMap::new(TileGrid::bordered(4, 4, 12.0).expect("valid grid"), true);
        let error = World::new(SessionConfig::default(), vec![corridor(false), other])
            .expect_err("mismatched tile size must be rejected");

        assert!(matches!(
            error,
            WorldError::TileLengthMismatch { level: 1, .. }
        ));
    }

    #[test]
    fn new_world_rejects_tiny_home() {
        let config = SessionConfig {
            home_columns: 2,
            ..SessionConfig::default()
        };

        assert!(matches!(
            World::new(config, vec![corridor(false)]),
            Err(WorldError::HomeTooSmall { columns: 2, .. })
        ));
    }

    #[test]
    fn topology_is_solved_at_load() {
        let world = world_with(vec![corridor(false)]);
        let topology = query::level_topology(&world, LevelIndex::FIRST).expect("level 0");

        assert_eq!(topology.entry, TilePosition::new(2, 1));
        assert_eq!(topology.exit, TilePosition::new(2, 3));
        assert_eq!(topology.key_tile, TilePosition::new(3, 2));
    }

    #[test]
    fn begin_session_moves_to_home_and_starts_ambient() {
        let mut world = world_with(vec![corridor(false)]);
        let _ = tick(&mut world, 500, MoveInput::idle());
        let mut events = Vec::new();

        apply(&mut world, Command::BeginSession, &mut events);

        assert_eq!(
            events,
            vec![
                Event::StateChanged {
                    from: GameState::Intro,
                    to: GameState::Home,
                },
                Event::CueTriggered {
                    cue: Cue::AmbientStarted,
                },
            ]
        );
        assert_eq!(query::elapsed(&world), Duration::ZERO);
    }

    #[test]
    fn intro_ticks_do_not_move_the_player() {
        let mut world = world_with(vec![corridor(false)]);
        let before = query::actor(&world).position;

        let events = tick(&mut world, 100, MoveInput::new(Vec2::X, false));

        assert_eq!(query::actor(&world).position, before);
        assert_eq!(
            events,
            vec![Event::TimeAdvanced {
                dt: Duration::from_millis(100)
            }]
        );
    }

    #[test]
    fn home_ticks_move_the_player_and_toggle_footsteps() {
        let mut world = started(vec![corridor(false)]);
        let start = query::actor(&world).position;

        let events = tick(&mut world, 100, MoveInput::new(Vec2::X, false));
        let moved = query::actor(&world).position;

        assert!((moved.x - (start.x + 18.0)).abs() < 1e-3);
        assert_eq!(moved.y, start.y);
        assert!(events.contains(&Event::CueTriggered {
            cue: Cue::FootstepsStarted
        }));
        assert!(query::footsteps_active(&world));

        let events = tick(&mut world, 100, MoveInput::idle());
        assert!(events.contains(&Event::CueTriggered {
            cue: Cue::FootstepsStopped
        }));
        assert_eq!(query::actor(&world).position, moved);
    }

    #[test]
    fn sprint_doubles_the_step() {
        let mut world = started(vec![corridor(false)]);
        let start = query::actor(&world).position;

        let _ = tick(&mut world, 100, MoveInput::new(Vec2::Y, true));

        assert!((query::actor(&world).position.y - (start.y + 36.0)).abs() < 1e-3);
    }

    #[test]
    fn entering_final_level_teleports_and_places_key() {
        let mut world = started(vec![corridor(true)]);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::EnterLevel {
                level: LevelIndex::FIRST,
            },
            &mut events,
        );

        assert_eq!(query::state(&world), GameState::Level(LevelIndex::FIRST));
        assert_eq!(query::actor(&world).tile, TilePosition::new(2, 1));
        assert_eq!(query::actor(&world).position, Vec2::new(25.0, 15.0));
        assert!(query::aura_enabled(&world));
        assert!(events.contains(&Event::KeyPlaced {
            tile: TilePosition::new(3, 2)
        }));
        let key = query::key_item(&world);
        assert_eq!(key.position, Vec2::new(35.0, 25.0));
        assert!(!key.collected);
        assert!(!key.following);
    }

    #[test]
    fn entering_intermediate_level_leaves_key_alone() {
        let mut world = started(vec![corridor(false), corridor(true)]);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::EnterLevel {
                level: LevelIndex::FIRST,
            },
            &mut events,
        );

        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::KeyPlaced { .. })));
        assert!(!query::aura_enabled(&world));
    }

    #[test]
    #[should_panic(expected = "does not exist")]
    fn entering_unknown_level_fails_fast() {
        let mut world = started(vec![corridor(false)]);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::EnterLevel {
                level: LevelIndex::new(3),
            },
            &mut events,
        );
    }

    #[test]
    fn collecting_key_requires_final_level() {
        let mut world = started(vec![corridor(false), corridor(false)]);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::EnterLevel {
                level: LevelIndex::FIRST,
            },
            &mut events,
        );
        events.clear();

        apply(&mut world, Command::CollectKey, &mut events);

        assert!(events.is_empty());
        assert!(!query::actor(&world).has_key);
    }

    #[test]
    fn collecting_key_marks_it_following() {
        let mut world = started(vec![corridor(false)]);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::EnterLevel {
                level: LevelIndex::FIRST,
            },
            &mut events,
        );
        events.clear();

        apply(&mut world, Command::CollectKey, &mut events);
        apply(&mut world, Command::CollectKey, &mut events);

        assert_eq!(
            events,
            vec![
                Event::KeyCollected {
                    tile: TilePosition::new(3, 2)
                },
                Event::CueTriggered { cue: Cue::KeyFound },
            ]
        );
        let key = query::key_item(&world);
        assert!(key.collected && key.following);
        assert!(query::actor(&world).has_key);
    }

    #[test]
    fn return_home_places_player_on_entry_door() {
        let mut world = started(vec![corridor(false)]);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::EnterLevel {
                level: LevelIndex::FIRST,
            },
            &mut events,
        );

        apply(&mut world, Command::ReturnHome, &mut events);

        assert_eq!(query::state(&world), GameState::Home);
        assert_eq!(query::actor(&world).tile, TilePosition::new(12, 1));
        assert_eq!(query::current_level(&world), LevelIndex::FIRST);
    }

    #[test]
    fn victory_freezes_elapsed_time_and_ends_the_session() {
        let mut world = started(vec![corridor(false)]);
        let _ = tick(&mut world, 1_500, MoveInput::new(Vec2::X, false));
        let mut events = Vec::new();

        apply(&mut world, Command::DeclareVictory, &mut events);

        assert_eq!(query::state(&world), GameState::Win);
        assert_eq!(
            events,
            vec![
                Event::StateChanged {
                    from: GameState::Home,
                    to: GameState::Win,
                },
                Event::CueTriggered {
                    cue: Cue::FootstepsStopped,
                },
                Event::CueTriggered {
                    cue: Cue::AmbientStopped,
                },
                Event::CueTriggered { cue: Cue::Victory },
                Event::SessionWon {
                    elapsed: Duration::from_millis(1_500),
                },
            ]
        );

        let events = tick(&mut world, 2_000, MoveInput::idle());
        assert!(events.is_empty());
        assert_eq!(query::elapsed(&world), Duration::from_millis(1_500));
    }

    #[test]
    fn notices_expire_after_their_duration() {
        let mut world = started(vec![corridor(false)]);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ShowNotice {
                notice: Notice::KeyRequired,
            },
            &mut events,
        );

        let events = tick(&mut world, 1_000, MoveInput::idle());
        assert!(!events.contains(&Event::NoticeCleared));
        assert_eq!(
            query::notice(&world),
            Some((Notice::KeyRequired, Duration::from_millis(500)))
        );

        let events = tick(&mut world, 600, MoveInput::idle());
        assert!(events.contains(&Event::NoticeCleared));
        assert_eq!(query::notice(&world), None);
    }

    #[test]
    fn progress_facts_describe_the_active_level() {
        let mut world = started(vec![corridor(false)]);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::EnterLevel {
                level: LevelIndex::FIRST,
            },
            &mut events,
        );

        let facts = query::progress_facts(&world);

        assert_eq!(facts.state, GameState::Level(LevelIndex::FIRST));
        assert_eq!(facts.level_count, 1);
        assert_eq!(facts.actor_tile, TilePosition::new(2, 1));
        assert_eq!(facts.level, query::level_topology(&world, LevelIndex::FIRST));
    }
}
