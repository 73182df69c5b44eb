use crate::app::App;
use crate::types::ProfileForm;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_profile_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    let dialog = &mut app.profile_dialog;
    match key.code {
        KeyCode::Esc => app.close_profile_dialog(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            dialog.focused = dialog.focused.toggle();
        }
        KeyCode::Enter => {
            dialog.error = None;
            enqueue_action(
                action_tx,
                Action::SaveProfile(ProfileForm {
                    cycle_length: dialog.cycle_length.value.clone(),
                    period_length: dialog.period_length.value.clone(),
                }),
            );
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            dialog.focused_input().insert(c)
        }
        KeyCode::Backspace => dialog.focused_input().backspace(),
        KeyCode::Left => dialog.focused_input().move_left(),
        KeyCode::Right => dialog.focused_input().move_right(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{ProfileField, View};
    use crate::types::AuthState;
    use time::macros::date;

    use super::super::super::action_queue::channel;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn submits_both_fields_as_typed() {
        let mut app = App::new(date!(2024 - 03 - 15), AuthState::Authenticated, true);
        app.cycle_length = Some(28);
        app.open_profile_dialog();
        let (tx, mut rx) = channel();

        handle_profile_key(key(KeyCode::Backspace), &mut app, &tx);
        handle_profile_key(key(KeyCode::Char('9')), &mut app, &tx);
        handle_profile_key(key(KeyCode::Tab), &mut app, &tx);
        assert_eq!(app.profile_dialog.focused, ProfileField::PeriodLength);
        handle_profile_key(key(KeyCode::Char('5')), &mut app, &tx);
        handle_profile_key(key(KeyCode::Enter), &mut app, &tx);

        assert_eq!(
            rx.try_recv().ok(),
            Some(Action::SaveProfile(ProfileForm {
                cycle_length: "29".to_string(),
                period_length: "5".to_string(),
            }))
        );
    }

    #[test]
    fn escape_discards_edits() {
        let mut app = App::new(date!(2024 - 03 - 15), AuthState::Authenticated, true);
        app.open_profile_dialog();
        let (tx, mut rx) = channel();

        handle_profile_key(key(KeyCode::Char('3')), &mut app, &tx);
        handle_profile_key(key(KeyCode::Esc), &mut app, &tx);

        assert_eq!(app.current_view, View::Calendar);
        assert!(app.profile_dialog.cycle_length.value.is_empty());
        assert!(rx.try_recv().is_err());
    }
}
