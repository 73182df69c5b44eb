use crate::app::{App, View};
use crossterm::event::{KeyCode, KeyEvent};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_confirm_delete_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            let Some(pending) = app.pending_delete.take() else {
                app.cancel_delete();
                return;
            };
            app.current_view = View::DatePanel;
            tracing::debug!(record_id = pending.record_id, "record deletion confirmed");
            enqueue_action(
                action_tx,
                Action::DeleteRecord {
                    record_id: pending.record_id,
                },
            );
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::derive_panel;
    use crate::types::{AuthState, SelectedDate};
    use crossterm::event::KeyModifiers;
    use time::macros::date;

    use super::super::super::action_queue::channel;

    fn confirming_app() -> App {
        let mut app = App::new(date!(2024 - 03 - 15), AuthState::Authenticated, true);
        let date = SelectedDate::new(date!(2024 - 03 - 10));
        app.show_date_panel(derive_panel(date, app.auth, None));
        app.open_delete_confirm(9, "2024-03-08".to_string());
        app
    }

    #[test]
    fn confirming_queues_delete() {
        let mut app = confirming_app();
        let (tx, mut rx) = channel();

        let key = KeyEvent::new(KeyCode::Char('y'), KeyModifiers::NONE);
        handle_confirm_delete_key(key, &mut app, &tx);

        assert_eq!(
            rx.try_recv().ok(),
            Some(Action::DeleteRecord { record_id: 9 })
        );
        assert_eq!(app.current_view, View::DatePanel);
        assert!(app.pending_delete.is_none());
    }

    #[test]
    fn declining_issues_no_request() {
        for code in [KeyCode::Char('n'), KeyCode::Esc] {
            let mut app = confirming_app();
            let (tx, mut rx) = channel();

            handle_confirm_delete_key(KeyEvent::new(code, KeyModifiers::NONE), &mut app, &tx);

            assert!(rx.try_recv().is_err());
            assert_eq!(app.current_view, View::DatePanel);
            assert!(app.is_panel_visible());
        }
    }
}
