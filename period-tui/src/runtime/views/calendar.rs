use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent};

use super::super::action_queue::{Action, ActionTx};
use super::{enqueue_action, select_day};

pub(super) fn handle_calendar_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => app.calendar.move_cursor(-1),
        KeyCode::Right | KeyCode::Char('l') => app.calendar.move_cursor(1),
        KeyCode::Up | KeyCode::Char('k') => app.calendar.move_cursor(-7),
        KeyCode::Down | KeyCode::Char('j') => app.calendar.move_cursor(7),
        KeyCode::Char('[') | KeyCode::Char('p') | KeyCode::PageUp => {
            app.calendar.shift_month(-1)
        }
        KeyCode::Char(']') | KeyCode::Char('n') | KeyCode::PageDown => {
            app.calendar.shift_month(1)
        }
        KeyCode::Char('t') => app.calendar.jump_to_today(),
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Some(cell) = app.calendar.cursor_cell().copied() {
                select_day(&cell, app, action_tx);
            }
        }
        KeyCode::Char('g') => app.open_goto(),
        KeyCode::Char('s') => app.open_profile_dialog(),
        KeyCode::Char('D') => app.open_account_dialog(),
        KeyCode::Char('r') => enqueue_action(action_tx, Action::Reload),
        KeyCode::Esc => app.clear_status(),
        KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::View;
    use crate::types::{AuthState, SelectedDate};
    use crossterm::event::KeyModifiers;
    use time::macros::date;

    use super::super::super::action_queue::channel;

    fn press(app: &mut App, code: KeyCode) -> Option<Action> {
        let (tx, mut rx) = channel();
        handle_calendar_key(KeyEvent::new(code, KeyModifiers::NONE), app, &tx);
        rx.try_recv().ok()
    }

    fn test_app() -> App {
        App::new(date!(2024 - 03 - 15), AuthState::Authenticated, true)
    }

    #[test]
    fn enter_requests_info_for_cursor_day() {
        let mut app = test_app();
        press(&mut app, KeyCode::Right);

        let action = press(&mut app, KeyCode::Enter);
        assert_eq!(
            action,
            Some(Action::LoadDateInfo {
                date: SelectedDate::new(date!(2024 - 03 - 16))
            })
        );
    }

    #[test]
    fn moving_past_month_end_switches_month() {
        let mut app = test_app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.calendar.cursor, date!(2024 - 03 - 29));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.calendar.cursor, date!(2024 - 04 - 05));
        assert_eq!(app.calendar.month_title(), "2024年4月");

        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.calendar.cursor, date!(2024 - 03 - 15));
    }

    #[test]
    fn dialog_keys_switch_views() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('D'));
        assert_eq!(app.current_view, View::DeleteAccount);

        let mut app = test_app();
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.current_view, View::Profile);

        let mut app = test_app();
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.current_view, View::GotoDate);
        assert_eq!(app.goto_input.value, "2024-03-15");
    }

    #[test]
    fn reload_is_queued() {
        let mut app = test_app();
        assert_eq!(press(&mut app, KeyCode::Char('r')), Some(Action::Reload));
    }
}
