//! Read-only view of a `PetState`: labels, bar severities and which controls
//! to offer. Nothing here feeds back into the simulation.

use crate::model::{PetState, PLAY_MIN_ENERGY};

const HUNGER_CRIT: f32 = 25.0;
const HAPPINESS_CRIT: f32 = 25.0;
const ENERGY_CRIT: f32 = 10.0;
const HEALTH_CRIT: f32 = 30.0;

const GOOD_ABOVE: f32 = 50.0;

const ALERT_HUNGER: f32 = 20.0;
const ALERT_HEALTH: f32 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BarLevel {
    Good,
    Warn,
    Critical,
}

pub(crate) fn bar_level(value: f32, crit: f32) -> BarLevel {
    if value > GOOD_ABOVE {
        BarLevel::Good
    } else if value > crit {
        BarLevel::Warn
    } else {
        BarLevel::Critical
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Bar {
    pub(crate) label: &'static str,
    pub(crate) value: f32,
    pub(crate) level: BarLevel,
}

pub(crate) fn bars(st: &PetState) -> [Bar; 4] {
    let v = st.vitals;
    let bar = |label, value, crit| Bar {
        label,
        value,
        level: bar_level(value, crit),
    };
    [
        bar("HLT", v.health, HEALTH_CRIT),
        bar("HGR", v.hunger, HUNGER_CRIT),
        bar("HAP", v.happiness, HAPPINESS_CRIT),
        bar("NRG", v.energy, ENERGY_CRIT),
    ]
}

pub(crate) fn exhausted(st: &PetState) -> bool {
    st.vitals.energy <= 0.0
}

pub(crate) fn banner(st: &PetState) -> &'static str {
    if st.dead {
        "SYSTEM OFFLINE"
    } else if exhausted(st) {
        "EXHAUSTED!"
    } else if st.sleeping {
        "DEEP SLEEP"
    } else {
        "UNIT OPERATIONAL"
    }
}

/// The flashing warning over the pet.
pub(crate) fn alert(st: &PetState) -> bool {
    if st.dead || st.sleeping {
        return false;
    }
    st.vitals.hunger < ALERT_HUNGER || st.vitals.health < ALERT_HEALTH || exhausted(st)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Face {
    Content,
    Resting,
    Distressed,
    Dead,
}

pub(crate) fn face(st: &PetState) -> Face {
    if st.dead {
        Face::Dead
    } else if st.sleeping || exhausted(st) {
        Face::Resting
    } else if st.vitals.health < ALERT_HEALTH || st.vitals.hunger < ALERT_HUNGER {
        Face::Distressed
    } else {
        Face::Content
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Control {
    pub(crate) key: char,
    pub(crate) label: &'static str,
    pub(crate) enabled: bool,
}

/// Buttons in display order. Gating only; the engine enforces the same
/// rules on its own.
pub(crate) fn controls(st: &PetState) -> [Control; 4] {
    let alive = !st.dead;
    let awake = alive && !st.sleeping;
    [
        Control {
            key: 'f',
            label: "FEED",
            enabled: awake,
        },
        Control {
            key: 'p',
            label: "PLAY",
            enabled: awake && st.vitals.energy >= PLAY_MIN_ENERGY,
        },
        Control {
            key: 's',
            label: if st.sleeping { "WAKE" } else { "SLEEP" },
            enabled: alive,
        },
        Control {
            key: 'r',
            label: if st.dead { "REVIVE" } else { "RESET" },
            enabled: true,
        },
    ]
}
