//! Plain-text input scripts replayed by the `play` command.
//!
//! One instruction per line, `#` starts a comment:
//!
//! ```text
//! start
//! up 0.4
//! right down 1.5 sprint
//! idle 2
//! ```

use std::time::Duration;

use thiserror::Error;
use upside_home_core::{HeldDirections, MoveInput};

/// Single instruction of an input script.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Step {
    /// Sends the start signal.
    Start,
    /// Holds the input for the given simulated duration.
    Hold {
        input: MoveInput,
        duration: Duration,
    },
}

/// Reasons a script line could not be parsed.
#[derive(Debug, Error, PartialEq)]
pub(crate) enum ScriptError {
    #[error("line {line}: unknown instruction `{word}`")]
    UnknownInstruction { line: usize, word: String },
    #[error("line {line}: missing duration in seconds")]
    MissingDuration { line: usize },
    #[error("line {line}: `{value}` is not a valid duration in seconds")]
    InvalidDuration { line: usize, value: String },
    #[error("line {line}: unexpected trailing `{word}`")]
    TrailingInput { line: usize, word: String },
}

/// Parses a whole script.
pub(crate) fn parse(source: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }
        steps.push(parse_line(index + 1, content)?);
    }

    Ok(steps)
}

fn parse_line(line: usize, content: &str) -> Result<Step, ScriptError> {
    let mut words = content.split_whitespace().peekable();

    match words.peek().copied() {
        Some("start") => {
            let _ = words.next();
            ensure_finished(line, words.next())?;
            return Ok(Step::Start);
        }
        Some("idle") => {
            let _ = words.next();
            let duration = parse_duration(line, words.next())?;
            ensure_finished(line, words.next())?;
            return Ok(Step::Hold {
                input: MoveInput::idle(),
                duration,
            });
        }
        _ => {}
    }

    let mut held = HeldDirections::default();
    let mut any_direction = false;
    while let Some(word) = words.peek().copied() {
        let flag = match word {
            "left" => &mut held.left,
            "right" => &mut held.right,
            "up" => &mut held.up,
            "down" => &mut held.down,
            _ => break,
        };
        *flag = true;
        any_direction = true;
        let _ = words.next();
    }

    if !any_direction {
        return Err(ScriptError::UnknownInstruction {
            line,
            word: words.next().unwrap_or_default().to_owned(),
        });
    }

    let duration = parse_duration(line, words.next())?;
    let sprint = words.next_if_eq(&"sprint").is_some();
    ensure_finished(line, words.next())?;

    Ok(Step::Hold {
        input: MoveInput::from_held(held, sprint),
        duration,
    })
}

fn parse_duration(line: usize, word: Option<&str>) -> Result<Duration, ScriptError> {
    let word = word.ok_or(ScriptError::MissingDuration { line })?;
    word.parse::<f64>()
        .ok()
        .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
        .ok_or_else(|| ScriptError::InvalidDuration {
            line,
            value: word.to_owned(),
        })
}

fn ensure_finished(line: usize, word: Option<&str>) -> Result<(), ScriptError> {
    match word {
        Some(word) => Err(ScriptError::TrailingInput {
            line,
            word: word.to_owned(),
        }),
        None => Ok(()),
    }
}
