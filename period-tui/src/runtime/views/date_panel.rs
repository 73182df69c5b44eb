use crate::app::App;
use crate::panel::PanelAction;
use crossterm::event::{KeyCode, KeyEvent};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_date_panel_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => {
            if let Some(panel) = app.panel.as_mut() {
                panel.select_previous();
            }
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
            if let Some(panel) = app.panel.as_mut() {
                panel.select_next();
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => activate_selected(app, action_tx),
        // Esc stands in for the overlay, `x` for the close control.
        KeyCode::Esc | KeyCode::Char('x') => app.close_date_panel(),
        _ => {}
    }
}

/// Run the highlighted panel action. Mutations are ignored while another
/// one is in flight.
pub(super) fn activate_selected(app: &mut App, action_tx: &ActionTx) {
    let Some(action) = app
        .panel
        .as_ref()
        .and_then(|panel| panel.selected_action())
        .cloned()
    else {
        return;
    };

    match action {
        PanelAction::Close => app.close_date_panel(),
        PanelAction::DeleteRecord {
            record_id,
            start_date,
        } => app.open_delete_confirm(record_id, start_date),
        action => {
            if app.submitting {
                return;
            }
            app.submitting = true;
            tracing::debug!(?action, "submitting panel action");
            enqueue_action(action_tx, Action::Submit(action));
        }
    }
}
