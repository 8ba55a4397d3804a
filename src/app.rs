use crate::config::{save_settings_atomic, Paths, Settings};
use crate::input::{collect_input_nonblocking, map_event_to_command, Command};
use crate::model::{Action, ParseActionError, PetState};
use crate::render::{draw_screen, Terminal};
use crate::session::Session;
use anyhow::Context;
use std::time::{Duration, Instant};
use tracing::info;

pub(crate) struct App {
    settings: Settings,
    settings_dirty: bool,
    paths: Paths,
    session: Session,
    term: Terminal,
    should_quit: bool,
}

impl App {
    fn init(settings: Settings, paths: Paths) -> anyhow::Result<Self> {
        let session = Session::new(settings.status_window());
        let term = Terminal::begin().context("could not enter terminal UI")?;
        Ok(Self {
            settings,
            settings_dirty: false,
            paths,
            session,
            term,
            should_quit: false,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let frame_dt = self.settings.frame_time();
        let sim_step = self.settings.tick_period();
        info!(tick_ms = self.settings.tick_ms, "session started");

        let mut last_frame = Instant::now();
        let mut sim_accum = Duration::ZERO;

        while !self.should_quit {
            self.term.resize_if_needed()?;

            // input
            for ev in collect_input_nonblocking(frame_dt)? {
                match map_event_to_command(&ev) {
                    Some(Command::Quit) => {
                        self.should_quit = true;
                        break;
                    }
                    Some(Command::ToggleColor) => {
                        self.settings.enable_color = !self.settings.enable_color;
                        self.settings_dirty = true;
                    }
                    Some(Command::Pet(action)) => {
                        self.session.command(action, Instant::now());
                    }
                    None => {}
                }
            }

            // sim fixed-step
            let now = Instant::now();
            let real_dt = now.saturating_duration_since(last_frame);
            last_frame = now;
            sim_accum = sim_accum.saturating_add(real_dt);

            while sim_accum >= sim_step {
                self.session.tick();
                sim_accum = sim_accum.saturating_sub(sim_step);
            }
            self.session.poll_status(now);

            // render
            draw_screen(
                &mut self.term.cur,
                self.session.state(),
                self.settings.enable_color,
            );
            self.term.present()?;

            // frame cap
            spin_sleep(frame_dt, Instant::now());
        }
        Ok(())
    }

    fn shutdown(&mut self) -> anyhow::Result<()> {
        info!(
            ticks = self.session.state().ticks,
            age = self.session.state().age,
            "session ended"
        );
        if self.settings_dirty {
            save_settings_atomic(&self.paths.settings_path, &self.settings)?;
        }
        Ok(())
    }
}

pub(crate) fn run(settings: Settings, paths: Paths) -> anyhow::Result<()> {
    let mut app = App::init(settings, paths)?;
    let result = app.run();
    // leave the alternate screen even when the loop failed
    let restored = app.term.end();
    result?;
    restored?;
    app.shutdown()
}

/// One script step: an action and how many times to apply it.
pub(crate) type Step = (Action, u64);

/// Parse a comma-separated script such as `feed,tick*30,play`. Repeats stay
/// as counts; nothing is expanded up front.
pub(crate) fn parse_script(script: &str) -> Result<Vec<Step>, ParseActionError> {
    let mut out = Vec::new();
    for word in script.split(',').map(str::trim).filter(|w| !w.is_empty()) {
        let (name, count) = match word.split_once('*') {
            Some((name, n)) => {
                let n = n
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ParseActionError::BadRepeat(word.to_string()))?;
                (name, n)
            }
            None => (word, 1),
        };
        let action: Action = name.parse()?;
        out.push((action, count));
    }
    Ok(out)
}

/// Run `steps` then `ticks` more ticks with no clock or status windows.
/// A run of one action stops as soon as it no longer changes the pet, and a
/// run of sleep toggles only needs its parity.
pub(crate) fn run_headless(steps: &[Step], ticks: u64) -> PetState {
    let mut session = Session::new(Duration::ZERO);
    let now = Instant::now();
    for &(action, count) in steps {
        let count = match action {
            Action::ToggleSleep => count % 2,
            _ => count,
        };
        for _ in 0..count {
            let before = *session.state();
            match action {
                Action::Tick => session.tick(),
                _ => {
                    session.command(action, now);
                }
            }
            if *session.state() == before {
                break;
            }
        }
    }
    for _ in 0..ticks {
        if session.state().dead {
            break;
        }
        session.tick();
    }
    *session.state()
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
