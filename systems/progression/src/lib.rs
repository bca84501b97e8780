#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure progression system that decides state transitions between the hub and
//! the labyrinths, key pickup, and the win condition.
//!
//! Decisions are computed by [`decide`] from a [`ProgressFacts`] snapshot and
//! expressed as commands; the world performs every side effect.

use tracing::debug;
use upside_home_core::{Command, Event, GameState, LevelIndex, Notice, ProgressFacts};

/// Stimulus prompting a decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// External signal to leave the intro screen.
    Start,
    /// A simulated frame finished integrating motion.
    Frame,
}

/// Outcome of evaluating the transition table.
#[derive(Clone, Debug, PartialEq)]
pub struct Decision {
    /// State the world will be in once the commands are applied.
    pub next: GameState,
    /// Commands realising the transition and its side effects, in order.
    pub commands: Vec<Command>,
}

impl Decision {
    fn stay(state: GameState, commands: Vec<Command>) -> Self {
        Self {
            next: state,
            commands,
        }
    }

    fn move_to(next: GameState, commands: Vec<Command>) -> Self {
        Self { next, commands }
    }
}

/// Evaluates the transition table for the active state.
///
/// Only the rows of the active state apply. While in the final labyrinth the
/// key pickup is evaluated first, so a pickup counts toward the transitions
/// decided in the same frame.
#[must_use]
pub fn decide(trigger: Trigger, facts: &ProgressFacts) -> Decision {
    match (trigger, facts.state) {
        (Trigger::Start, GameState::Intro) => {
            Decision::move_to(GameState::Home, vec![Command::BeginSession])
        }
        (Trigger::Frame, GameState::Home) => decide_home(facts),
        (Trigger::Frame, GameState::Level(level)) => decide_level(level, facts),
        (_, state) => Decision::stay(state, Vec::new()),
    }
}

fn decide_home(facts: &ProgressFacts) -> Decision {
    let tile = facts.actor_tile;

    if facts.has_key
        && facts.current_level.is_last(facts.level_count)
        && tile == facts.home.win_door
    {
        return Decision::move_to(GameState::Win, vec![Command::DeclareVictory]);
    }

    if tile == facts.home.entry_door
        && !facts.has_key
        && facts.current_level.get() < facts.level_count
    {
        let level = facts.current_level;
        return Decision::move_to(GameState::Level(level), vec![Command::EnterLevel { level }]);
    }

    Decision::stay(GameState::Home, Vec::new())
}

fn decide_level(level: LevelIndex, facts: &ProgressFacts) -> Decision {
    let state = GameState::Level(level);
    let Some(topology) = facts.level else {
        return Decision::stay(state, Vec::new());
    };

    let tile = facts.actor_tile;
    let is_final = level.is_last(facts.level_count);
    let mut commands = Vec::new();
    let mut has_key = facts.has_key;

    if is_final && !facts.key_collected && tile == topology.key_tile {
        has_key = true;
        commands.push(Command::CollectKey);
        commands.push(Command::ShowNotice {
            notice: Notice::KeyFound,
        });
    }

    if has_key && tile == topology.entry {
        commands.push(Command::ReturnHome);
        return Decision::move_to(GameState::Home, commands);
    }

    if tile != topology.exit {
        return Decision::stay(state, commands);
    }

    if !is_final {
        let next = level.next();
        commands.push(Command::EnterLevel { level: next });
        commands.push(Command::ShowNotice {
            notice: Notice::LevelReached(next),
        });
        Decision::move_to(GameState::Level(next), commands)
    } else if has_key {
        commands.push(Command::ReturnHome);
        commands.push(Command::ShowNotice {
            notice: Notice::ReturnedHome,
        });
        Decision::move_to(GameState::Home, commands)
    } else {
        commands.push(Command::ShowNotice {
            notice: Notice::KeyRequired,
        });
        Decision::stay(state, commands)
    }
}

/// Pure system that reacts to world events and emits progression commands.
#[derive(Debug, Default)]
pub struct Progression;

impl Progression {
    /// Forwards the external start signal.
    pub fn start(&mut self, facts: &ProgressFacts, out: &mut Vec<Command>) {
        out.extend(decide(Trigger::Start, facts).commands);
    }

    /// Consumes world events and the current facts to emit transition commands.
    ///
    /// Decisions are only taken for batches containing a simulated frame.
    pub fn handle(&mut self, events: &[Event], facts: &ProgressFacts, out: &mut Vec<Command>) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        let decision = decide(Trigger::Frame, facts);
        if decision.next != facts.state {
            debug!(from = ?facts.state, to = ?decision.next, "transition decided");
        }
        out.extend(decision.commands);
    }
}
