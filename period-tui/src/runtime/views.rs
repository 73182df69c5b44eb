use crate::app::{App, View};
use crate::calendar::DayCell;
use crate::panel::{resolve_day_click, DayClick};
use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use super::action_queue::{Action, ActionTx};

mod calendar;
mod confirm_delete;
mod date_panel;
mod delete_account;
mod goto_date;
mod profile;

fn enqueue_action(action_tx: &ActionTx, action: Action) {
    let _ = action_tx.send(action);
}

/// Resolve a chosen day cell and request its period info. Empty,
/// out-of-month and malformed cells do nothing.
fn select_day(cell: &DayCell, app: &mut App, action_tx: &ActionTx) {
    let date_attr = cell.date_attr();
    match resolve_day_click(Some(&date_attr), cell.is_current_month) {
        DayClick::Ignored => {
            tracing::debug!(date = %date_attr, "ignoring click outside the displayed month");
        }
        DayClick::Invalid(err) => {
            tracing::warn!(date = %date_attr, error = %err, "failed to parse selected date");
        }
        DayClick::Selected(date) => {
            tracing::debug!(%date, "day selected");
            app.clear_status();
            enqueue_action(action_tx, Action::LoadDateInfo { date });
        }
    }
}

pub(super) fn handle_view_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match app.current_view {
        View::Calendar => calendar::handle_calendar_key(key, app, action_tx),
        View::DatePanel => date_panel::handle_date_panel_key(key, app, action_tx),
        View::ConfirmDelete => confirm_delete::handle_confirm_delete_key(key, app, action_tx),
        View::DeleteAccount => delete_account::handle_delete_account_key(key, app, action_tx),
        View::Profile => profile::handle_profile_key(key, app, action_tx),
        View::GotoDate => goto_date::handle_goto_date_key(key, app),
    }
}

/// Left clicks on day cells and on the date panel. A click outside the
/// panel acts like clicking the overlay and closes it.
pub(super) fn handle_mouse(mouse: MouseEvent, app: &mut App, action_tx: &ActionTx) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    let (column, row) = (mouse.column, mouse.row);

    match app.current_view {
        View::Calendar => {
            if let Some(cell) = app.cell_at(column, row) {
                app.calendar.cursor = cell.date;
                select_day(&cell, app, action_tx);
            }
        }
        View::DatePanel => {
            if app.is_on_panel_close(column, row) || !app.is_in_panel(column, row) {
                app.close_date_panel();
                return;
            }
            let action_index = app.panel_item_at(row).and_then(|item| {
                app.panel
                    .as_ref()
                    .and_then(|panel| panel.action_index_of_item(item))
            });
            if let Some(index) = action_index {
                if let Some(panel) = app.panel.as_mut() {
                    panel.selected = index;
                }
                date_panel::activate_selected(app, action_tx);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::derive_panel;
    use crate::types::{AuthState, SelectedDate};
    use crossterm::event::KeyEventState;
    use ratatui::layout::Rect;
    use time::macros::date;

    use super::super::action_queue::channel;

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn test_app() -> App {
        App::new(date!(2024 - 03 - 15), AuthState::Authenticated, true)
    }

    #[test]
    fn clicking_current_month_cell_loads_info() {
        let mut app = test_app();
        let cell = app.calendar.grid.weeks[2][3];
        assert!(cell.is_current_month);
        app.cell_areas.push((Rect::new(0, 0, 4, 2), cell));
        let (tx, mut rx) = channel();

        handle_mouse(click(1, 1), &mut app, &tx);

        assert_eq!(
            rx.try_recv().ok(),
            Some(Action::LoadDateInfo {
                date: SelectedDate::new(cell.date)
            })
        );
    }

    #[test]
    fn clicking_out_of_month_cell_does_nothing() {
        let mut app = test_app();
        // March 2024 starts on a Friday, so the first Sunday is in February.
        let cell = app.calendar.grid.weeks[0][0];
        assert!(!cell.is_current_month);
        app.cell_areas.push((Rect::new(0, 0, 4, 2), cell));
        let (tx, mut rx) = channel();

        handle_mouse(click(0, 0), &mut app, &tx);

        assert!(rx.try_recv().is_err());
        assert!(!app.is_panel_visible());
    }

    #[test]
    fn clicking_outside_panel_closes_it() {
        let mut app = test_app();
        let date = SelectedDate::new(date!(2024 - 03 - 10));
        app.show_date_panel(derive_panel(date, app.auth, None));
        app.panel_area = Some(Rect::new(10, 10, 20, 8));
        let (tx, mut rx) = channel();

        handle_mouse(click(2, 2), &mut app, &tx);

        assert!(!app.is_panel_visible());
        assert_eq!(app.calendar.selected, None);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn clicking_panel_row_submits_that_action() {
        let mut app = test_app();
        let date = SelectedDate::new(date!(2024 - 03 - 10));
        app.show_date_panel(derive_panel(date, app.auth, None));
        app.panel_area = Some(Rect::new(10, 10, 20, 8));
        // Fallback panel: mark start, mark end, close.
        app.panel_item_rows = vec![(11, 0), (12, 1), (13, 2)];
        let (tx, mut rx) = channel();

        handle_mouse(click(15, 12), &mut app, &tx);

        assert_eq!(
            rx.try_recv().ok(),
            Some(Action::Submit(crate::panel::PanelAction::MarkEnd { date }))
        );
        assert!(app.submitting);
    }

    #[test]
    fn ctrl_c_quits_from_any_view() {
        let mut app = test_app();
        app.open_profile_dialog();
        let (tx, _rx) = channel();
        let key = KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        };

        handle_view_key(key, &mut app, &tx);
        assert!(!app.running);
    }
}
