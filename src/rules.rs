//! Per-stat adjustment rules for one tick.
//!
//! Each vital stat has an ordered table of named rules. A rule fires when its
//! predicate holds for the pre-tick snapshot, and then adds to or rescales the
//! running value for that stat. Tables are folded front to back, so a
//! multiplier only affects what earlier rules accumulated.

use crate::model::{PetState, Vitals};

/// Age at which the difficulty multiplier stops growing.
const AGE_CAP: u32 = 10;

/// Ticks without play before boredom saturates.
const BOREDOM_RAMP_TICKS: f32 = 120.0;
const BOREDOM_MAX: f32 = 2.0;

/// Everything a rule may read. Built once per tick from the old snapshot.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TickContext {
    pub(crate) before: Vitals,
    pub(crate) sleeping: bool,
    pub(crate) age_mult: f32,
    pub(crate) boredom: f32,
}

impl TickContext {
    /// `next_tick` is the tick counter after this tick's increment.
    pub(crate) fn new(st: &PetState, next_tick: u64) -> Self {
        Self {
            before: st.vitals,
            sleeping: st.sleeping,
            age_mult: age_multiplier(st.age),
            boredom: boredom_factor(next_tick, st.last_play_tick),
        }
    }

    fn awake(&self) -> bool {
        !self.sleeping
    }
}

/// 1.0 for a newborn, 2.0 from age 10 on.
pub(crate) fn age_multiplier(age: u32) -> f32 {
    1.0 + age.min(AGE_CAP) as f32 / AGE_CAP as f32
}

pub(crate) fn boredom_factor(tick: u64, last_play_tick: u64) -> f32 {
    let since = tick.saturating_sub(last_play_tick) as f32;
    (1.0 + since / BOREDOM_RAMP_TICKS).min(BOREDOM_MAX)
}

#[derive(Clone, Copy)]
pub(crate) enum Effect {
    Add(f32),
    Scale(f32),
    AddWith(fn(&TickContext) -> f32),
    MapWith(fn(&TickContext, f32) -> f32),
}

#[derive(Clone, Copy)]
pub(crate) struct Rule {
    pub(crate) name: &'static str,
    pub(crate) applies: fn(&TickContext) -> bool,
    pub(crate) effect: Effect,
}

impl Rule {
    fn apply(&self, ctx: &TickContext, acc: f32) -> f32 {
        match self.effect {
            Effect::Add(d) => acc + d,
            Effect::Scale(m) => acc * m,
            Effect::AddWith(f) => acc + f(ctx),
            Effect::MapWith(f) => f(ctx, acc),
        }
    }
}

pub(crate) fn fold(rules: &[Rule], ctx: &TickContext) -> f32 {
    rules
        .iter()
        .filter(|r| (r.applies)(ctx))
        .fold(0.0, |acc, r| r.apply(ctx, acc))
}

/// Names of the rules in `rules` that fire for `ctx`, in table order.
#[cfg(test)]
pub(crate) fn fired(rules: &[Rule], ctx: &TickContext) -> Vec<&'static str> {
    rules
        .iter()
        .filter(|r| (r.applies)(ctx))
        .map(|r| r.name)
        .collect()
}

fn always(_: &TickContext) -> bool {
    true
}

/// `lo < wellbeing <= hi`
fn wellbeing_in(c: &TickContext, lo: f32, hi: f32) -> bool {
    let w = c.before.wellbeing();
    w > lo && w <= hi
}

/// Signed change to energy.
pub(crate) const ENERGY: &[Rule] = &[
    Rule {
        name: "sleep_recovery",
        applies: |c| c.sleeping && c.before.hunger > 30.0,
        effect: Effect::Add(2.5),
    },
    // starving pets sleep badly: half the recovery
    Rule {
        name: "hungry_sleep_recovery",
        applies: |c| c.sleeping && c.before.hunger <= 30.0,
        effect: Effect::Add(1.25),
    },
    Rule {
        name: "awake_drain",
        applies: |c| c.awake(),
        effect: Effect::Add(-0.3),
    },
    Rule {
        name: "hungry_drain",
        applies: |c| c.awake() && c.before.hunger < 40.0,
        effect: Effect::Add(-0.2),
    },
    Rule {
        name: "excited_drain",
        applies: |c| c.awake() && c.before.happiness > 70.0,
        effect: Effect::Add(-0.1),
    },
];

/// Amount hunger goes down by. Always non-negative.
pub(crate) const HUNGER_DECAY: &[Rule] = &[
    Rule {
        name: "sleep_metabolism",
        applies: |c| c.sleeping,
        effect: Effect::Add(0.15),
    },
    Rule {
        name: "awake_metabolism",
        applies: |c| c.awake(),
        effect: Effect::Add(0.35),
    },
    Rule {
        name: "energetic_metabolism",
        applies: |c| c.before.energy > 70.0,
        effect: Effect::Add(0.1),
    },
    Rule {
        name: "exhaustion_burn",
        applies: |c| c.before.energy <= 0.0,
        effect: Effect::Scale(1.3),
    },
    Rule {
        name: "cheerful_appetite",
        applies: |c| c.awake() && c.before.happiness > 60.0,
        effect: Effect::Add(0.05),
    },
    Rule {
        name: "age",
        applies: always,
        effect: Effect::MapWith(|c, d| d * c.age_mult),
    },
];

/// Signed change to happiness.
pub(crate) const HAPPINESS: &[Rule] = &[
    Rule {
        name: "boredom",
        applies: always,
        effect: Effect::AddWith(|c| -0.2 * c.boredom),
    },
    Rule {
        name: "starving",
        applies: |c| c.before.hunger < 20.0,
        effect: Effect::Add(-0.4),
    },
    Rule {
        name: "well_fed",
        applies: |c| c.before.hunger > 70.0,
        effect: Effect::Add(0.15),
    },
    Rule {
        name: "exhausted",
        applies: |c| c.before.energy <= 0.0,
        effect: Effect::Add(-0.4),
    },
    Rule {
        name: "lively",
        applies: |c| c.awake() && c.before.energy > 60.0,
        effect: Effect::Add(0.1),
    },
    Rule {
        name: "oversleep",
        applies: |c| c.sleeping && c.before.energy > 80.0,
        effect: Effect::Add(-0.15),
    },
    Rule {
        name: "unwell",
        applies: |c| c.before.health < 50.0,
        effect: Effect::Add(-0.2),
    },
    // only losses get harder with age
    Rule {
        name: "age",
        applies: always,
        effect: Effect::MapWith(|c, d| if d < 0.0 { d * c.age_mult } else { d }),
    },
];

/// Signed change to health. The first four rules are exclusive bands of
/// wellbeing; the rest stack on top.
pub(crate) const HEALTH: &[Rule] = &[
    Rule {
        name: "thriving",
        applies: |c| c.before.wellbeing() > 70.0,
        effect: Effect::Add(0.15),
    },
    Rule {
        name: "content",
        applies: |c| wellbeing_in(c, 50.0, 70.0),
        effect: Effect::Add(0.05),
    },
    Rule {
        name: "uneasy",
        applies: |c| wellbeing_in(c, 30.0, 50.0),
        effect: Effect::Add(-0.1),
    },
    Rule {
        name: "miserable",
        applies: |c| c.before.wellbeing() <= 30.0,
        effect: Effect::Add(-0.3),
    },
    Rule {
        name: "starvation",
        applies: |c| c.before.hunger <= 0.0,
        effect: Effect::Add(-1.2),
    },
    Rule {
        name: "exhaustion",
        applies: |c| c.awake() && c.before.energy <= 0.0,
        effect: Effect::Add(-0.4),
    },
    Rule {
        name: "despair",
        applies: |c| c.before.happiness <= 0.0,
        effect: Effect::Add(-0.25),
    },
    Rule {
        name: "peak_condition",
        applies: |c| {
            c.before.hunger > 85.0 && c.before.happiness > 85.0 && c.before.energy > 70.0
        },
        effect: Effect::Add(0.2),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(hunger: f32, happiness: f32, energy: f32, health: f32, sleeping: bool) -> TickContext {
        TickContext {
            before: Vitals {
                hunger,
                happiness,
                energy,
                health,
            },
            sleeping,
            age_mult: 1.0,
            boredom: 1.0,
        }
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn age_multiplier_saturates() {
        assert!(close(age_multiplier(0), 1.0));
        assert!(close(age_multiplier(5), 1.5));
        assert!(close(age_multiplier(10), 2.0));
        assert!(close(age_multiplier(42), 2.0));
    }

    #[test]
    fn boredom_ramps_then_caps() {
        assert!(close(boredom_factor(0, 0), 1.0));
        assert!(close(boredom_factor(60, 0), 1.5));
        assert!(close(boredom_factor(120, 0), 2.0));
        assert!(close(boredom_factor(5000, 0), 2.0));
        assert!(close(boredom_factor(130, 70), 1.5));
    }

    #[test]
    fn energy_rules() {
        let rested = ctx(50.0, 50.0, 50.0, 100.0, true);
        assert!(close(fold(ENERGY, &rested), 2.5));
        let starving = ctx(30.0, 50.0, 50.0, 100.0, true);
        assert!(close(fold(ENERGY, &starving), 1.25));
        let awake = ctx(30.0, 80.0, 50.0, 100.0, false);
        assert_eq!(
            fired(ENERGY, &awake),
            vec!["awake_drain", "hungry_drain", "excited_drain"]
        );
        assert!(close(fold(ENERGY, &awake), -0.6));
    }

    #[test]
    fn hunger_exhaustion_scales_base_but_not_appetite() {
        let mut c = ctx(50.0, 65.0, 0.0, 100.0, false);
        // (0.35 * 1.3) + 0.05
        assert!(close(fold(HUNGER_DECAY, &c), 0.505));
        c.age_mult = 2.0;
        assert!(close(fold(HUNGER_DECAY, &c), 1.01));
        assert!(!fired(HUNGER_DECAY, &c).contains(&"energetic_metabolism"));
    }

    #[test]
    fn hunger_sleeping_with_high_energy() {
        let c = ctx(50.0, 90.0, 90.0, 100.0, true);
        assert_eq!(
            fired(HUNGER_DECAY, &c),
            vec!["sleep_metabolism", "energetic_metabolism", "age"]
        );
        assert!(close(fold(HUNGER_DECAY, &c), 0.25));
    }

    #[test]
    fn happiness_losses_scale_with_age_gains_do_not() {
        let mut sad = ctx(10.0, 50.0, 0.0, 40.0, false);
        // -0.2 - 0.4 - 0.4 - 0.2
        assert!(close(fold(HAPPINESS, &sad), -1.2));
        sad.age_mult = 1.5;
        assert!(close(fold(HAPPINESS, &sad), -1.8));

        let mut glad = ctx(90.0, 50.0, 90.0, 100.0, false);
        glad.age_mult = 2.0;
        // -0.2 + 0.15 + 0.1
        assert!(close(fold(HAPPINESS, &glad), 0.05));
    }

    #[test]
    fn oversleep_and_lively_are_exclusive() {
        let asleep = ctx(50.0, 50.0, 90.0, 100.0, true);
        let names = fired(HAPPINESS, &asleep);
        assert!(names.contains(&"oversleep"));
        assert!(!names.contains(&"lively"));

        let awake = ctx(50.0, 50.0, 90.0, 100.0, false);
        let names = fired(HAPPINESS, &awake);
        assert!(names.contains(&"lively"));
        assert!(!names.contains(&"oversleep"));
    }

    #[test]
    fn health_wellbeing_bands_are_exclusive() {
        let bands = ["thriving", "content", "uneasy", "miserable"];
        for (h, expected) in [
            (90.0, "thriving"),
            (60.0, "content"),
            (50.0, "uneasy"),
            (40.0, "uneasy"),
            (30.0, "miserable"),
        ] {
            let c = ctx(h, h, h, 100.0, false);
            let hits: Vec<_> = fired(HEALTH, &c)
                .into_iter()
                .filter(|n| bands.contains(n))
                .collect();
            assert_eq!(hits, vec![expected], "wellbeing {h}");
        }
    }

    #[test]
    fn health_penalties_stack() {
        let c = ctx(0.0, 0.0, 0.0, 50.0, false);
        // miserable, starvation, exhaustion, despair
        assert!(close(fold(HEALTH, &c), -0.3 - 1.2 - 0.4 - 0.25));
        let asleep = ctx(0.0, 0.0, 0.0, 50.0, true);
        assert!(close(fold(HEALTH, &asleep), -0.3 - 1.2 - 0.25));
    }

    #[test]
    fn health_peak_condition_bonus() {
        let c = ctx(90.0, 90.0, 80.0, 100.0, false);
        assert!(close(fold(HEALTH, &c), 0.35));
        let almost = ctx(85.0, 90.0, 80.0, 100.0, false);
        assert!(close(fold(HEALTH, &almost), 0.15));
    }
}
