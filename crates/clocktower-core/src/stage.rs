//! The physical stage: lights, sound and the status panel.
//!
//! [`Stage`] is the context the phase hooks run against. Every hook is
//! best effort: a failed effect or panel signal is logged and the
//! transition still completes.

use std::fmt;

use clocktower_effects::{Effect, EffectDispatcher, EffectRouter, VolumeRamp, VOLUME_RAMP};
use clocktower_models::{Edition, GamePhase, MoodLight, Team};
use clocktower_panel::{PanelMode, PanelSession};
use tracing::{info, warn};

use crate::machine::{MachineOptions, PhaseEvent, PhaseHooks};

/// Collaborators and ambient state shared by every phase.
pub struct Stage {
    effects: Box<dyn EffectDispatcher>,
    panel: Option<PanelSession>,
    edition: Edition,
    mood: MoodLight,
    volume_ramp: VolumeRamp,
}

impl Stage {
    pub fn new(effects: Box<dyn EffectDispatcher>, panel: Option<PanelSession>) -> Self {
        let edition = Edition::default();
        Self {
            effects,
            panel,
            edition,
            mood: edition.colour(),
            volume_ramp: VOLUME_RAMP,
        }
    }

    /// A stage with no effect adapters and no panel.
    pub fn bare() -> Self {
        Self::new(Box::new(EffectRouter::new()), None)
    }

    pub fn with_volume_ramp(mut self, ramp: VolumeRamp) -> Self {
        self.volume_ramp = ramp;
        self
    }

    pub fn edition(&self) -> Edition {
        self.edition
    }

    /// Current mood light colour and brightness.
    pub fn mood(&self) -> MoodLight {
        self.mood
    }

    pub fn has_panel(&self) -> bool {
        self.panel.is_some()
    }

    pub fn panel(&self) -> Option<&PanelSession> {
        self.panel.as_ref()
    }

    pub fn panel_mut(&mut self) -> Option<&mut PanelSession> {
        self.panel.as_mut()
    }

    /// Panel sub-mode, `Idle` when no panel is connected.
    pub fn panel_mode(&self) -> PanelMode {
        self.panel
            .as_ref()
            .map(PanelSession::mode)
            .unwrap_or(PanelMode::Idle)
    }

    /// Select the edition; the mood light follows its colour from now on.
    pub fn set_edition(&mut self, edition: Edition) {
        info!(edition = %edition, "edition selected");
        self.edition = edition;
        self.mood = edition.colour();
    }

    /// Show the winning team's colour and tell the panel.
    pub fn declare_winner(&mut self, team: Team) {
        info!(team = %team, "winner declared");
        self.mood = team.colour();
        self.trigger(Effect::MoodLightOn(self.mood));
        self.signal("winner", |panel| panel.declare_winner(team));
    }

    pub fn stop_all_audio(&mut self) {
        self.trigger(Effect::StopAllAudio);
    }

    /// Fire one effect, logging any failure.
    pub fn trigger(&self, effect: Effect) {
        if let Err(e) = self.effects.trigger(&effect) {
            warn!(effect = %effect.name(), error = %e, "effect failed");
        }
    }

    /// Send a one-shot panel signal if a panel is connected, logging any failure.
    fn signal<F>(&mut self, what: &str, send: F)
    where
        F: FnOnce(&mut PanelSession) -> clocktower_panel::Result<()>,
    {
        if let Some(panel) = self.panel.as_mut() {
            if let Err(e) = send(panel) {
                warn!(signal = what, error = %e, "panel signal failed");
            }
        }
    }

    /// Drain the panel and return everything it printed since the last call.
    pub fn panel_output(&mut self) -> Vec<String> {
        let Some(panel) = self.panel.as_mut() else {
            return Vec::new();
        };
        if let Err(e) = panel.drain() {
            warn!(error = %e, "panel drain failed");
        }
        panel.take_responses()
    }

    /// Switch the panel off, e.g. when the operator quits.
    pub fn shutdown(&mut self) {
        self.signal("off", PanelSession::signal_off);
    }

    // ==================== Hooks ====================

    /// The hooks for a session of the given variant.
    ///
    /// Restarting into Configuration resets the room and the panel straight
    /// away; without Configuration the PreGame entry hook already does it.
    pub fn hooks(options: MachineOptions) -> PhaseHooks<Stage> {
        let hooks = PhaseHooks::new()
            .on_enter(GamePhase::PreGame, reset_room)
            .on_enter(GamePhase::FirstNight, enter_first_night)
            .on_exit(GamePhase::FirstNight, exit_first_night)
            .on_enter(GamePhase::PreReveal, enter_pre_reveal)
            .on_enter(GamePhase::Day, enter_day)
            .on_enter(GamePhase::Nominations, enter_nominations)
            .on_enter(GamePhase::Night, enter_night)
            .on_enter(GamePhase::PostGame, enter_post_game);
        if options.with_configuration {
            hooks.on_transition(PhaseEvent::RestartGame, reset_room)
        } else {
            hooks
        }
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("effects", &self.effects.name())
            .field("panel", &self.panel)
            .field("edition", &self.edition)
            .field("mood", &self.mood)
            .finish()
    }
}

/// Back to the edition colour, whatever a previous game ended on, and a
/// fresh panel.
fn reset_room(stage: &mut Stage) {
    stage.mood = stage.edition.colour();
    stage.trigger(Effect::MoodLightOn(stage.mood));
    stage.signal("start", PanelSession::signal_start);
}

fn enter_first_night(stage: &mut Stage) {
    stage.trigger(Effect::PlaybackPause);
    stage.trigger(Effect::LightsOff);
    stage.signal("night", PanelSession::signal_night);
}

fn exit_first_night(stage: &mut Stage) {
    stage.trigger(Effect::day_lights(stage.mood));
    stage.trigger(Effect::VolumeDownRamp(stage.volume_ramp));
    stage.trigger(Effect::PlaybackResume);
}

fn enter_pre_reveal(stage: &mut Stage) {
    stage.trigger(Effect::day_lights(stage.mood));
    stage.trigger(Effect::VolumeDownRamp(stage.volume_ramp));
    stage.signal("pre-reveal", PanelSession::signal_pre_reveal);
}

fn enter_day(stage: &mut Stage) {
    stage.signal("day", PanelSession::signal_day);
}

fn enter_nominations(stage: &mut Stage) {
    stage.trigger(Effect::gong());
    stage.signal("nomination configuration", PanelSession::begin_nomination_config);
}

fn enter_night(stage: &mut Stage) {
    stage.trigger(Effect::LightsOff);
    stage.signal("night", PanelSession::signal_night);
    stage.trigger(Effect::NextTrack);
    stage.trigger(Effect::VolumeUpRamp(stage.volume_ramp));
}

fn enter_post_game(stage: &mut Stage) {
    stage.signal("end game", PanelSession::signal_end_game);
}
