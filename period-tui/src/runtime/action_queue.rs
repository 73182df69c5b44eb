use crate::panel::PanelAction;
use crate::types::{ProfileForm, SelectedDate};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Action {
    /// Fetch period info for a selected day and open its panel.
    LoadDateInfo {
        date: SelectedDate,
    },
    /// Mark start, mark end or adjust, as chosen in the panel.
    Submit(PanelAction),
    DeleteRecord {
        record_id: i64,
    },
    DeleteAccount {
        password: String,
    },
    SaveProfile(ProfileForm),
    Reload,
}

pub(super) type ActionTx = UnboundedSender<Action>;
pub(super) type ActionRx = UnboundedReceiver<Action>;

pub(super) fn channel() -> (ActionTx, ActionRx) {
    mpsc::unbounded_channel()
}
