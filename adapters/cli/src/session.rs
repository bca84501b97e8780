//! Frame loop driving the world, the progression system and presentation.

use std::time::Duration;

use anyhow::Result;
use glam::Vec2;
use tracing::{debug, info, trace};
use upside_home_core::{Command, Cue, Event, GameState, MoveInput};
use upside_home_rendering::{AudioSink, Frame, Hud, RenderingBackend, SessionView};
use upside_home_system_progression::Progression;
use upside_home_world::{self as world, query, World};

use crate::script::Step;

/// Outcome of a replayed script.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Summary {
    pub(crate) state: GameState,
    pub(crate) elapsed: Duration,
    pub(crate) frames: u64,
}

/// Owns the world and feeds it fixed-length frames.
#[derive(Debug)]
pub(crate) struct Session<R, A> {
    world: World,
    progression: Progression,
    viewport: Vec2,
    frame_length: Duration,
    frames: u64,
    renderer: R,
    audio: A,
}

impl<R, A> Session<R, A>
where
    R: RenderingBackend,
    A: AudioSink,
{
    pub(crate) fn new(world: World, viewport: Vec2, fps: u32, renderer: R, audio: A) -> Self {
        Self {
            world,
            progression: Progression::default(),
            viewport,
            frame_length: Duration::from_secs(1) / fps.max(1),
            frames: 0,
            renderer,
            audio,
        }
    }

    /// Replays every step, stopping early once the session is won.
    pub(crate) fn run(&mut self, steps: &[Step]) -> Result<Summary> {
        for step in steps {
            if query::state(&self.world) == GameState::Win {
                break;
            }

            match *step {
                Step::Start => self.start()?,
                Step::Hold { input, duration } => self.hold(input, duration)?,
            }
        }

        Ok(Summary {
            state: query::state(&self.world),
            elapsed: query::elapsed(&self.world),
            frames: self.frames,
        })
    }

    fn start(&mut self) -> Result<()> {
        let mut commands = Vec::new();
        self.progression
            .start(&query::progress_facts(&self.world), &mut commands);

        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        self.publish(&events)
    }

    fn hold(&mut self, input: MoveInput, duration: Duration) -> Result<()> {
        let count = (duration.as_secs_f64() / self.frame_length.as_secs_f64()).round() as u64;
        for _ in 0..count {
            if query::state(&self.world) == GameState::Win {
                break;
            }
            self.step(input)?;
        }
        Ok(())
    }

    fn step(&mut self, input: MoveInput) -> Result<()> {
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::Tick {
                dt: self.frame_length,
                input,
            },
            &mut events,
        );

        let mut commands = Vec::new();
        self.progression.handle(
            &events,
            &query::progress_facts(&self.world),
            &mut commands,
        );
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        self.frames += 1;
        self.publish(&events)
    }

    fn publish(&mut self, events: &[Event]) -> Result<()> {
        for event in events {
            match event {
                Event::TimeAdvanced { .. } | Event::ActorMoved { .. } => {
                    trace!(?event, "world event");
                }
                Event::CueTriggered { cue } => self.audio.play(*cue)?,
                _ => debug!(?event, "world event"),
            }
        }

        let frame = Frame::compose(&self.view(), self.viewport);
        self.renderer.present(&frame)
    }

    fn view(&self) -> SessionView {
        let state = query::state(&self.world);
        SessionView {
            state,
            level_count: query::level_count(&self.world),
            actor: query::actor(&self.world),
            key: query::key_item(&self.world),
            tile_length: query::active_grid(&self.world).tile_length(),
            map_extent: query::active_grid(&self.world).extent(),
            aura: query::aura_enabled(&self.world),
            home: query::home_layout(&self.world),
            level: state
                .level()
                .and_then(|level| query::level_topology(&self.world, level)),
            notice: query::notice(&self.world).map(|(notice, _)| notice),
            elapsed: query::elapsed(&self.world),
        }
    }
}

/// Headless renderer that reports HUD changes through the log.
#[derive(Debug, Default)]
pub(crate) struct LogRenderer {
    hud: Option<Hud>,
}

impl RenderingBackend for LogRenderer {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        match frame {
            Frame::Intro { banner } => trace!(banner, "intro screen"),
            Frame::Exploring(scene) => {
                trace!(camera = ?scene.camera, position = ?scene.actor.position, "scene");
                if self.hud.as_ref() != Some(&scene.hud) {
                    info!(
                        label = %scene.hud.label,
                        objective = scene.hud.objective,
                        notice = scene.hud.notice.as_deref().unwrap_or(""),
                        "hud"
                    );
                    self.hud = Some(scene.hud.clone());
                }
            }
            Frame::Won { headline, time } => info!(time = %time, "{headline}"),
        }
        Ok(())
    }
}

/// Audio sink that logs cues instead of playing them.
#[derive(Debug, Default)]
pub(crate) struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, cue: Cue) -> Result<()> {
        info!(?cue, "audio cue");
        Ok(())
    }
}
