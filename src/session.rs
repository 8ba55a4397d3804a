use crate::model::{initial_state, Action, PetState};
use crate::status::StatusTimer;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

/// Sole owner of the live pet. Every change goes through `&mut self`, so
/// ticks, commands and status reversions are applied one at a time.
pub(crate) struct Session {
    state: PetState,
    timer: StatusTimer,
}

impl Session {
    pub(crate) fn new(status_window: Duration) -> Self {
        Self {
            state: initial_state(),
            timer: StatusTimer::new(status_window),
        }
    }

    pub(crate) fn state(&self) -> &PetState {
        &self.state
    }

    pub(crate) fn tick(&mut self) {
        let was_dead = self.state.dead;
        self.state = self.state.apply(Action::Tick);
        trace!(
            tick = self.state.ticks,
            hunger = self.state.vitals.hunger,
            happiness = self.state.vitals.happiness,
            energy = self.state.vitals.energy,
            health = self.state.vitals.health,
            "tick"
        );
        if self.state.dead && !was_dead {
            self.timer.cancel();
            info!(
                tick = self.state.ticks,
                age = self.state.age,
                "pet died"
            );
        }
    }

    /// Apply a user (or collaborator) command at real time `now`. Returns
    /// whether the engine accepted it.
    pub(crate) fn command(&mut self, action: Action, now: Instant) -> bool {
        let accepted = self.state.accepts(action);
        self.state = self.state.apply(action);
        debug!(?action, accepted, status = %self.state.status, "command");
        if !accepted {
            return false;
        }

        match action {
            Action::Feed | Action::Play => {
                let generation = self.timer.schedule(now);
                trace!(generation, "status window opened");
            }
            Action::SetStatus(status) if status.is_transient() => {
                let generation = self.timer.schedule(now);
                trace!(generation, "status window opened");
            }
            Action::SetStatus(_) => self.timer.cancel(),
            Action::ToggleSleep => {
                self.timer.cancel();
                info!(sleeping = self.state.sleeping, "sleep toggled");
            }
            Action::Reset => {
                self.timer.cancel();
                info!("pet reset");
            }
            Action::Tick => {}
        }
        true
    }

    /// Deliver a due status reversion, if any.
    pub(crate) fn poll_status(&mut self, now: Instant) {
        if let Some(action) = self.timer.poll(now, &self.state) {
            debug!(?action, "status window closed");
            self.state = self.state.apply(action);
        }
    }

    #[cfg(test)]
    pub(crate) fn status_pending(&self) -> bool {
        self.timer.pending_generation().is_some()
    }
}
