use crate::app::actions::Action;
use crate::app::events::{Event, InputEvent};
use crate::app::state::AppState;
use crossterm::event::{
    self, Event as CtEvent, KeyCode, KeyEventKind, MouseButton, MouseEventKind,
};
use tokio::sync::mpsc;

/// Rows moved per mouse wheel notch
const WHEEL_ROWS: i32 = 1;

pub fn spawn_input_task(tx: mpsc::Sender<Event>, mouse_enabled: bool) {
    tokio::task::spawn_blocking(move || {
        loop {
            if event::poll(std::time::Duration::from_millis(250)).unwrap_or(false) {
                let forwarded = match event::read() {
                    Ok(CtEvent::Key(k)) if k.kind == KeyEventKind::Press => {
                        Some(InputEvent::Key(k))
                    }
                    Ok(CtEvent::Mouse(m)) if mouse_enabled => Some(InputEvent::Mouse(m)),
                    Ok(CtEvent::Resize(_, _)) => Some(InputEvent::Resize),
                    Ok(_) => None,
                    Err(e) => {
                        tracing::warn!("terminal input error: {e}");
                        None
                    }
                };
                if let Some(ev) = forwarded
                    && tx.blocking_send(Event::Input(ev)).is_err()
                {
                    break;
                }
            } else if tx.is_closed() {
                break;
            }
        }
    });
}

pub fn map_input_to_action(state: &AppState, ev: InputEvent) -> Option<Action> {
    match ev {
        InputEvent::Resize => Some(Action::Resize),
        InputEvent::Mouse(m) => {
            let over_lyrics = state.in_lyrics_area(m.column, m.row);
            match m.kind {
                MouseEventKind::ScrollUp if over_lyrics => Some(Action::LyricsScroll(-WHEEL_ROWS)),
                MouseEventKind::ScrollDown if over_lyrics => Some(Action::LyricsScroll(WHEEL_ROWS)),
                MouseEventKind::Down(MouseButton::Left) if over_lyrics => {
                    Some(Action::LyricsPointerDown)
                }
                MouseEventKind::Up(MouseButton::Left) => Some(Action::PointerUp),
                _ => None,
            }
        }
        InputEvent::Key(k) => match k.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char(' ') => Some(Action::TogglePause),
            KeyCode::Char('=') | KeyCode::Char('+') => Some(Action::VolumeUp),
            KeyCode::Char('-') | KeyCode::Char('_') => Some(Action::VolumeDown),
            KeyCode::Char(']') | KeyCode::Right => Some(Action::SeekForward),
            KeyCode::Char('[') | KeyCode::Left => Some(Action::SeekBack),
            KeyCode::Char('n') => Some(Action::PlayNext),
            KeyCode::Char('p') => Some(Action::PlayPrev),
            KeyCode::Char('l') => Some(Action::CycleLoopMode),
            KeyCode::Char('c') => Some(Action::Recenter),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::LyricsScroll(-1)),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::LyricsScroll(1)),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::Cooldowns;
    use crossterm::event::{KeyEvent, KeyModifiers, MouseEvent};
    use ratatui::layout::Rect;

    fn state() -> AppState {
        let mut state = AppState::new(Cooldowns::default());
        state.lyrics_area = Rect::new(0, 0, 40, 10);
        state
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> InputEvent {
        InputEvent::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_wheel_only_over_lyrics() {
        let s = state();
        assert_eq!(
            map_input_to_action(&s, mouse(MouseEventKind::ScrollDown, 5, 5)),
            Some(Action::LyricsScroll(1))
        );
        assert_eq!(
            map_input_to_action(&s, mouse(MouseEventKind::ScrollUp, 5, 5)),
            Some(Action::LyricsScroll(-1))
        );
        assert_eq!(map_input_to_action(&s, mouse(MouseEventKind::ScrollDown, 5, 12)), None);
    }

    #[test]
    fn test_pointer_down_in_pane_up_anywhere() {
        let s = state();
        assert_eq!(
            map_input_to_action(&s, mouse(MouseEventKind::Down(MouseButton::Left), 1, 1)),
            Some(Action::LyricsPointerDown)
        );
        assert_eq!(
            map_input_to_action(&s, mouse(MouseEventKind::Down(MouseButton::Left), 50, 20)),
            None
        );
        assert_eq!(
            map_input_to_action(&s, mouse(MouseEventKind::Up(MouseButton::Left), 50, 20)),
            Some(Action::PointerUp)
        );
    }

    #[test]
    fn test_keys() {
        let s = state();
        assert_eq!(map_input_to_action(&s, key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(map_input_to_action(&s, key(KeyCode::Char('c'))), Some(Action::Recenter));
        assert_eq!(map_input_to_action(&s, key(KeyCode::Char('n'))), Some(Action::PlayNext));
        assert_eq!(map_input_to_action(&s, key(KeyCode::Char('z'))), None);
    }
}
