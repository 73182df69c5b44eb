use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) const PASSWORD_REQUIRED: &str = "请输入密码确认删除操作";

pub(super) fn handle_delete_account_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    let dialog = &mut app.account_dialog;
    match key.code {
        KeyCode::Esc => app.close_account_dialog(),
        KeyCode::Enter => {
            if dialog.submitting {
                return;
            }
            if dialog.password.value.trim().is_empty() {
                dialog.error = Some(PASSWORD_REQUIRED.to_string());
                return;
            }
            dialog.submitting = true;
            dialog.error = None;
            enqueue_action(
                action_tx,
                Action::DeleteAccount {
                    password: dialog.password.value.clone(),
                },
            );
        }
        _ if dialog.submitting => {}
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            dialog.password.insert(c)
        }
        KeyCode::Backspace => dialog.password.backspace(),
        KeyCode::Left => dialog.password.move_left(),
        KeyCode::Right => dialog.password.move_right(),
        _ => {}
    }
}
