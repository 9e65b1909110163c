//! Session driver
//!
//! Owns the save record and the running session. The host calls
//! [`Game::update`] once per frame with its own frame time; the driver
//! runs as many fixed `SIM_DT` ticks as that time covers, then drains the
//! simulation's events, forwards sounds to the audio sink and persists
//! highscores and tutorial progress.

use std::path::PathBuf;

use crate::consts::*;
use crate::persistence::{self, SaveRecord};
use crate::platform::{AudioSink, InputProvider, gather_input};
use crate::settings::Settings;
use crate::sim::{GameEvent, SessionState, TickInput, tick};
use crate::tilemap::TileMap;

/// Longest frame the driver will simulate in one call
pub const MAX_FRAME_DT: f32 = 0.1;

/// Counters gathered while routing events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub kills: u32,
    pub takeovers: u32,
    pub phase: usize,
}

/// Outcome of a finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub map_index: usize,
    pub score: u64,
    pub got_highscore: bool,
    pub player_died: bool,
    pub frames: u64,
    pub stats: SessionStats,
}

pub struct Game<A: AudioSink> {
    save: SaveRecord,
    save_path: Option<PathBuf>,
    session: Option<SessionState>,
    stats: SessionStats,
    audio: A,
    /// Host time not yet covered by a tick
    accumulator: f32,
    /// Press edges waiting for the next tick
    pending: TickInput,
}

impl<A: AudioSink> Game<A> {
    /// Read the save record (if a path is given) and wait for a session
    pub fn new(save_path: Option<PathBuf>, audio: A) -> Self {
        let save = save_path
            .as_deref()
            .map(persistence::load)
            .unwrap_or_default();
        Self {
            save,
            save_path,
            session: None,
            stats: SessionStats::default(),
            audio,
            accumulator: 0.0,
            pending: TickInput::default(),
        }
    }

    pub fn save_record(&self) -> &SaveRecord {
        &self.save
    }

    pub fn settings(&self) -> &Settings {
        &self.save.settings
    }

    /// Replace the settings and write them out
    pub fn set_settings(&mut self, settings: Settings) {
        if self.save.settings != settings {
            self.save.settings = settings;
            self.persist();
        }
    }

    /// Whether a new session should start in the tutorial
    pub fn wants_tutorial(&self) -> bool {
        !self.save.settings.tutorial_done
    }

    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut SessionState> {
        self.session.as_mut()
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Start a session on `tiles`, replacing any running one
    pub fn begin(&mut self, map_index: usize, tiles: TileMap, seed: u64, tutorial: bool) -> &SessionState {
        if self.session.is_some() {
            self.end();
        }
        let highscore = self.save.highscores.best(map_index);
        self.stats = SessionStats::default();
        self.accumulator = 0.0;
        self.pending = TickInput::default();
        self.session
            .insert(SessionState::new(map_index, tiles, seed, highscore, tutorial))
    }

    /// Drop the running session and report how it went
    pub fn end(&mut self) -> Option<SessionSummary> {
        let session = self.session.take()?;
        let summary = SessionSummary {
            map_index: session.map_index,
            score: session.score,
            got_highscore: session.got_highscore,
            player_died: session.player_died,
            frames: session.frame_count,
            stats: self.stats,
        };
        log::info!(
            "Session end: map {} score {} after {} frames",
            summary.map_index,
            summary.score,
            summary.frames
        );
        Some(summary)
    }

    /// Read devices and advance the session by `dt` seconds
    pub fn update(&mut self, input: &impl InputProvider, dt: f32) {
        let input = gather_input(input);
        self.step(&input, dt);
    }

    /// Advance the session by `dt` seconds of host time with an already
    /// built input.
    ///
    /// Held buttons apply to every tick; a press is seen by exactly one
    /// tick, even when this frame was too short to run any.
    pub fn step(&mut self, input: &TickInput, dt: f32) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        self.pending.jump |= input.jump;
        self.pending.action |= input.action;
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let frame_input = TickInput {
                left: input.left,
                right: input.right,
                ..self.pending
            };
            tick(session, &frame_input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.pending = TickInput::default();
        }
        self.flush_events();
    }

    fn flush_events(&mut self) {
        let events = match self.session.as_mut() {
            Some(session) => session.drain_events(),
            None => return,
        };
        for event in events {
            self.route(event);
        }
    }

    fn route(&mut self, event: GameEvent) {
        match event {
            GameEvent::Sound { effect, volume } => {
                let gain = self.save.settings.effective_sfx_volume(volume);
                if gain > 0.0 {
                    self.audio.play(effect, gain);
                }
            }
            GameEvent::CharacterKilled { by_player: true, .. } => self.stats.kills += 1,
            GameEvent::BodyTaken { .. } => self.stats.takeovers += 1,
            GameEvent::PhaseAdvanced { phase } => self.stats.phase = phase,
            GameEvent::NewHighscore { map, score } => {
                if self.save.highscores.record(map, score) {
                    self.persist();
                    log::info!("Highscore {} on map {} persisted", score, map);
                }
            }
            GameEvent::TutorialComplete => {
                if !self.save.settings.tutorial_done {
                    self.save.settings.tutorial_done = true;
                    self.persist();
                }
            }
            GameEvent::CharacterKilled { .. }
            | GameEvent::PlayerHit { .. }
            | GameEvent::PlayerDied { .. }
            | GameEvent::ScoreMilestone { .. } => {}
        }
    }

    fn persist(&self) {
        let Some(path) = &self.save_path else {
            return;
        };
        if let Err(e) = persistence::save(path, &self.save) {
            log::warn!("{}", e);
        }
    }
}

/// Number of fixed steps in `seconds` of play
pub fn frames_for(seconds: f32) -> u64 {
    (seconds / SIM_DT).round().max(0.0) as u64
}
