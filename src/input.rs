use crate::model::Action;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Clone, Debug)]
pub(crate) struct InputEvent {
    pub(crate) key: KeyCode,
    pub(crate) mods: KeyModifiers,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Pet(Action),
    ToggleColor,
    Quit,
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        if let Event::Key(k) = event::read()? {
            // key repeat would spam feed/play
            if k.kind == KeyEventKind::Press {
                out.push(InputEvent {
                    key: k.code,
                    mods: k.modifiers,
                });
                if out.len() >= 32 {
                    break;
                }
            }
        }
    }
    Ok(out)
}

/// Unbound keys map to nothing.
pub(crate) fn map_event_to_command(ev: &InputEvent) -> Option<Command> {
    if matches!(ev.key, KeyCode::Char('c') | KeyCode::Char('C'))
        && ev.mods.contains(KeyModifiers::CONTROL)
    {
        return Some(Command::Quit);
    }
    match ev.key {
        KeyCode::Char('f') | KeyCode::Char('F') => Some(Command::Pet(Action::Feed)),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::Pet(Action::Play)),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Command::Pet(Action::ToggleSleep)),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Pet(Action::Reset)),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(Command::ToggleColor),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}
