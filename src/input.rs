use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    TogglePause,
    ToggleTitle,
    Resize(u16, u16),
}

pub fn collect_actions(timeout: Duration) -> anyhow::Result<Vec<Action>> {
    let mut out = Vec::new();
    while event::poll(timeout)? {
        if let Some(a) = map_event(event::read()?) {
            out.push(a);
        }
        if out.len() >= 32 {
            break;
        }
    }
    Ok(out)
}

pub fn map_event(ev: Event) -> Option<Action> {
    match ev {
        Event::Key(k) if k.kind == KeyEventKind::Press => map_key(k),
        Event::Resize(w, h) => Some(Action::Resize(w, h)),
        _ => None,
    }
}

fn map_key(k: KeyEvent) -> Option<Action> {
    if k.code == KeyCode::Char('c') && k.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }
    match k.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(' ') => Some(Action::TogglePause),
        KeyCode::Char('t') | KeyCode::Char('T') => Some(Action::ToggleTitle),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(map_event(press(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(map_event(press(KeyCode::Esc)), Some(Action::Quit));
        assert_eq!(map_event(press(KeyCode::Char(' '))), Some(Action::TogglePause));
        assert_eq!(map_event(press(KeyCode::Char('t'))), Some(Action::ToggleTitle));
        assert_eq!(map_event(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn ctrl_c_quits() {
        let ev = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(map_event(ev), Some(Action::Quit));
        assert_eq!(map_event(press(KeyCode::Char('c'))), None);
    }

    #[test]
    fn resize_passes_through() {
        assert_eq!(map_event(Event::Resize(100, 40)), Some(Action::Resize(100, 40)));
    }
}
