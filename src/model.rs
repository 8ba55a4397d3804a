use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub(crate) const STAT_MIN: f32 = 0.0;
pub(crate) const STAT_MAX: f32 = 100.0;

/// Ticks per year of age.
pub(crate) const TICKS_PER_AGE: u64 = 60;

/// PLAY is refused below this much energy.
pub(crate) const PLAY_MIN_ENERGY: f32 = 15.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Status {
    Idle,
    Eating,
    Playing,
    Sleeping,
    Dead,
}

impl Status {
    /// Labels that only live for a display window before reverting.
    pub(crate) fn is_transient(self) -> bool {
        matches!(self, Status::Eating | Status::Playing)
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Status::Idle => "idle",
            Status::Eating => "eating",
            Status::Playing => "playing",
            Status::Sleeping => "sleeping",
            Status::Dead => "dead",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "idle" => Ok(Status::Idle),
            "eating" => Ok(Status::Eating),
            "playing" => Ok(Status::Playing),
            "sleeping" => Ok(Status::Sleeping),
            "dead" => Ok(Status::Dead),
            other => Err(ParseActionError::UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Vitals {
    pub(crate) hunger: f32,
    pub(crate) happiness: f32,
    pub(crate) energy: f32,
    pub(crate) health: f32,
}

impl Vitals {
    pub(crate) fn clamped(self) -> Self {
        Self {
            hunger: clamp_stat(self.hunger),
            happiness: clamp_stat(self.happiness),
            energy: clamp_stat(self.energy),
            health: clamp_stat(self.health),
        }
    }

    /// Mean of hunger, happiness and energy. Health is not part of it.
    pub(crate) fn wellbeing(&self) -> f32 {
        (self.hunger + self.happiness + self.energy) / 3.0
    }
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            hunger: 80.0,
            happiness: 80.0,
            energy: 100.0,
            health: 100.0,
        }
    }
}

pub(crate) fn clamp_stat(v: f32) -> f32 {
    v.clamp(STAT_MIN, STAT_MAX)
}

/// One simulation snapshot. Transitions build a new value instead of
/// editing the current one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct PetState {
    pub(crate) vitals: Vitals,
    pub(crate) age: u32,
    pub(crate) ticks: u64,
    pub(crate) last_play_tick: u64,
    pub(crate) last_feed_tick: u64,
    pub(crate) sleeping: bool,
    pub(crate) dead: bool,
    pub(crate) status: Status,
}

impl Default for PetState {
    fn default() -> Self {
        initial_state()
    }
}

pub(crate) fn initial_state() -> PetState {
    PetState {
        vitals: Vitals::default(),
        age: 0,
        ticks: 0,
        last_play_tick: 0,
        last_feed_tick: 0,
        sleeping: false,
        dead: false,
        status: Status::Idle,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Tick,
    Feed,
    Play,
    ToggleSleep,
    Reset,
    SetStatus(Status),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub(crate) enum ParseActionError {
    #[error("unknown action '{0}' (expected tick, feed, play, sleep, reset or status=<label>)")]
    UnknownAction(String),

    #[error("unknown status label '{0}' (expected idle, eating, playing, sleeping or dead)")]
    UnknownStatus(String),

    #[error("bad repeat count in '{0}'")]
    BadRepeat(String),
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let word = s.trim().to_ascii_lowercase();
        if let Some(label) = word.strip_prefix("status=") {
            return Ok(Action::SetStatus(label.parse()?));
        }
        match word.as_str() {
            "tick" => Ok(Action::Tick),
            "feed" => Ok(Action::Feed),
            "play" => Ok(Action::Play),
            "sleep" | "wake" | "toggle_sleep" => Ok(Action::ToggleSleep),
            "reset" | "revive" => Ok(Action::Reset),
            _ => Err(ParseActionError::UnknownAction(word)),
        }
    }
}
