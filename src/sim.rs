use crate::model::{initial_state, Action, PetState, Status, Vitals, PLAY_MIN_ENERGY, TICKS_PER_AGE};
use crate::rules::{self, TickContext};

const FEED_HUNGER: f32 = 25.0;
const FEED_HEALTH: f32 = 2.0;
const FEED_HAPPINESS: f32 = 3.0;

const PLAY_HAPPINESS: f32 = 20.0;
const PLAY_ENERGY_COST: f32 = 15.0;
const PLAY_HUNGER_COST: f32 = 5.0;

impl PetState {
    /// Successor of `self` under `action`. Total: a refused action returns
    /// `self` unchanged.
    pub(crate) fn apply(self, action: Action) -> PetState {
        if self.dead && action != Action::Reset {
            return self;
        }
        match action {
            Action::Tick => self.tick(),
            Action::Feed => self.feed(),
            Action::Play => self.play(),
            Action::ToggleSleep => self.toggle_sleep(),
            Action::Reset => initial_state(),
            Action::SetStatus(status) => PetState { status, ..self },
        }
    }

    /// Whether `action` would change anything. Mirrors the guards in `apply`.
    pub(crate) fn accepts(&self, action: Action) -> bool {
        match action {
            Action::Reset => true,
            _ if self.dead => false,
            Action::Feed => !self.sleeping,
            Action::Play => !self.sleeping && self.vitals.energy >= PLAY_MIN_ENERGY,
            Action::Tick | Action::ToggleSleep | Action::SetStatus(_) => true,
        }
    }

    fn tick(self) -> PetState {
        let ticks = self.ticks + 1;
        let age = if ticks % TICKS_PER_AGE == 0 {
            self.age + 1
        } else {
            self.age
        };

        // every rule reads the same pre-tick snapshot
        let ctx = TickContext::new(&self, ticks);
        let v = self.vitals;
        let vitals = Vitals {
            hunger: v.hunger - rules::fold(rules::HUNGER_DECAY, &ctx),
            happiness: v.happiness + rules::fold(rules::HAPPINESS, &ctx),
            energy: v.energy + rules::fold(rules::ENERGY, &ctx),
            health: v.health + rules::fold(rules::HEALTH, &ctx),
        }
        .clamped();

        let dead = vitals.health <= 0.0;
        PetState {
            vitals,
            age,
            ticks,
            dead,
            status: if dead { Status::Dead } else { self.status },
            ..self
        }
    }

    fn feed(self) -> PetState {
        if self.sleeping {
            return self;
        }
        let v = self.vitals;
        PetState {
            vitals: Vitals {
                hunger: v.hunger + FEED_HUNGER,
                health: v.health + FEED_HEALTH,
                happiness: v.happiness + FEED_HAPPINESS,
                ..v
            }
            .clamped(),
            last_feed_tick: self.ticks,
            status: Status::Eating,
            ..self
        }
    }

    fn play(self) -> PetState {
        if self.sleeping || self.vitals.energy < PLAY_MIN_ENERGY {
            return self;
        }
        let v = self.vitals;
        PetState {
            vitals: Vitals {
                happiness: v.happiness + PLAY_HAPPINESS,
                energy: v.energy - PLAY_ENERGY_COST,
                hunger: v.hunger - PLAY_HUNGER_COST,
                ..v
            }
            .clamped(),
            last_play_tick: self.ticks,
            status: Status::Playing,
            ..self
        }
    }

    fn toggle_sleep(self) -> PetState {
        let sleeping = !self.sleeping;
        PetState {
            sleeping,
            status: if sleeping {
                Status::Sleeping
            } else {
                Status::Idle
            },
            ..self
        }
    }
}
