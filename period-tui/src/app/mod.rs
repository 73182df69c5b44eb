use crate::calendar::{CalendarState, DayCell};
use crate::panel::DatePanel;
use crate::types::{AuthState, PredictionInfo};
use ratatui::layout::{Position, Rect};
use time::Date;

mod state;
pub use state::{
    AccountDialog, PendingDelete, ProfileDialog, ProfileField, StatusKind, StatusMessage,
    TextInput, View,
};

pub struct App {
    pub running: bool,
    pub auth: AuthState,
    pub dev_mode: bool,
    pub current_view: View,
    pub status: Option<StatusMessage>,

    pub calendar: CalendarState,
    /// `Some` while the date panel is visible.
    pub panel: Option<DatePanel>,
    /// A mutation is in flight; panel actions are disabled until it settles.
    pub submitting: bool,

    pub pending_delete: Option<PendingDelete>,
    pub account_dialog: AccountDialog,
    pub profile_dialog: ProfileDialog,
    pub goto_input: TextInput,

    /// Profile values reported alongside the predictions.
    pub cycle_length: Option<u32>,
    pub period_length: Option<u32>,
    pub account_deleted: bool,

    // Loading indicator
    pub is_loading: bool,
    pub throbber_state: throbber_widgets_tui::ThrobberState,

    // Screen areas recorded by the renderer each frame, used for mouse clicks
    pub cell_areas: Vec<(Rect, DayCell)>,
    pub panel_area: Option<Rect>,
    pub panel_close_area: Option<Rect>,
    pub panel_item_rows: Vec<(u16, usize)>,
}

impl App {
    pub fn new(today: Date, auth: AuthState, dev_mode: bool) -> Self {
        Self {
            running: true,
            auth,
            dev_mode,
            current_view: View::Calendar,
            status: None,
            calendar: CalendarState::new(today),
            panel: None,
            submitting: false,
            pending_delete: None,
            account_dialog: AccountDialog::default(),
            profile_dialog: ProfileDialog::default(),
            goto_input: TextInput::new(),
            cycle_length: None,
            period_length: None,
            account_deleted: false,
            is_loading: false,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
            cell_areas: Vec::new(),
            panel_area: None,
            panel_close_area: None,
            panel_item_rows: Vec::new(),
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn set_status(&mut self, message: String) {
        self.status = Some(StatusMessage {
            text: message,
            kind: StatusKind::Info,
        });
    }

    pub fn set_error(&mut self, message: String) {
        self.status = Some(StatusMessage {
            text: message,
            kind: StatusKind::Error,
        });
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn is_panel_visible(&self) -> bool {
        self.panel.is_some()
    }

    pub fn show_date_panel(&mut self, panel: DatePanel) {
        self.calendar.select(panel.date.date());
        self.panel = Some(panel);
        self.current_view = View::DatePanel;
    }

    /// Hide the panel and clear the selected day.
    pub fn close_date_panel(&mut self) {
        self.panel = None;
        self.pending_delete = None;
        self.calendar.clear_selection();
        self.panel_area = None;
        self.panel_close_area = None;
        self.panel_item_rows.clear();
        self.current_view = View::Calendar;
    }

    pub fn open_delete_confirm(&mut self, record_id: i64, start_date: String) {
        self.pending_delete = Some(PendingDelete {
            record_id,
            start_date,
        });
        self.current_view = View::ConfirmDelete;
    }

    /// Leave the confirmation dialog without deleting anything.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.current_view = self.view_behind_dialog();
    }

    pub fn open_account_dialog(&mut self) {
        self.account_dialog = AccountDialog::default();
        self.current_view = View::DeleteAccount;
    }

    /// Cancelling clears the typed password.
    pub fn close_account_dialog(&mut self) {
        self.account_dialog = AccountDialog::default();
        self.current_view = self.view_behind_dialog();
    }

    pub fn open_profile_dialog(&mut self) {
        let prefill = |value: Option<u32>| {
            value
                .map(|v| TextInput::from_str(&v.to_string()))
                .unwrap_or_default()
        };
        self.profile_dialog = ProfileDialog {
            cycle_length: prefill(self.cycle_length),
            period_length: prefill(self.period_length),
            ..ProfileDialog::default()
        };
        self.current_view = View::Profile;
    }

    pub fn close_profile_dialog(&mut self) {
        self.profile_dialog = ProfileDialog::default();
        self.current_view = self.view_behind_dialog();
    }

    pub fn open_goto(&mut self) {
        self.goto_input = TextInput::from_str(&self.calendar.cursor.to_string());
        self.current_view = View::GotoDate;
    }

    pub fn close_goto(&mut self) {
        self.goto_input.clear();
        self.current_view = self.view_behind_dialog();
    }

    fn view_behind_dialog(&self) -> View {
        if self.is_panel_visible() {
            View::DatePanel
        } else {
            View::Calendar
        }
    }

    pub fn apply_predictions(&mut self, info: PredictionInfo) {
        self.calendar.predictions = info.predictions;
        if info.cycle_length.is_some() {
            self.cycle_length = info.cycle_length;
        }
        if info.period_length.is_some() {
            self.period_length = info.period_length;
        }
    }

    pub fn cell_at(&self, column: u16, row: u16) -> Option<DayCell> {
        let position = Position::new(column, row);
        self.cell_areas
            .iter()
            .find(|(area, _)| area.contains(position))
            .map(|(_, cell)| *cell)
    }

    pub fn is_in_panel(&self, column: u16, row: u16) -> bool {
        self.panel_area
            .is_some_and(|area| area.contains(Position::new(column, row)))
    }

    pub fn is_on_panel_close(&self, column: u16, row: u16) -> bool {
        self.panel_close_area
            .is_some_and(|area| area.contains(Position::new(column, row)))
    }

    /// Index into the panel items of the line drawn at `row`.
    pub fn panel_item_at(&self, row: u16) -> Option<usize> {
        self.panel_item_rows
            .iter()
            .find(|(y, _)| *y == row)
            .map(|(_, index)| *index)
    }
}
