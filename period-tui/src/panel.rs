//! Date panel contents.
//!
//! The panel is computed in one pass from the authentication state and the
//! period info returned for the selected date. Nothing is appended
//! incrementally, so every action occurs at most once.

use crate::types::{
    AdjustKind, AdjustPeriod, AuthState, CandidateRecord, DateParseError, PeriodInfo, SelectedDate,
};

pub const LOGIN_REQUIRED: &str = "请先登录以使用经期记录功能";
pub const ALREADY_RECORDED: &str = "该日期已有经期记录";
pub const ADJUST_HEADING: &str = "调整经期记录：";

/// Outcome of selecting a calendar cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayClick {
    /// Empty or out-of-month cell.
    Ignored,
    Invalid(DateParseError),
    Selected(SelectedDate),
}

/// Resolve a selected cell from its raw date attribute.
pub fn resolve_day_click(date_attr: Option<&str>, is_current_month: bool) -> DayClick {
    let Some(raw) = date_attr.map(str::trim) else {
        return DayClick::Ignored;
    };
    if raw.is_empty() || raw == "None" || !is_current_month {
        return DayClick::Ignored;
    }

    match raw.parse::<SelectedDate>() {
        Ok(date) => DayClick::Selected(date),
        Err(err) => DayClick::Invalid(err),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    MarkStart {
        date: SelectedDate,
    },
    MarkEnd {
        date: SelectedDate,
    },
    /// Move the record's start to the selected date.
    SetStartDate {
        record_id: i64,
        date: SelectedDate,
    },
    /// Make the record span from its start to the selected date.
    AdjustRange {
        record_id: i64,
        start_date: String,
        end_date: SelectedDate,
    },
    DeleteRecord {
        record_id: i64,
        start_date: String,
    },
    Close,
}

impl PanelAction {
    pub fn label(&self) -> String {
        match self {
            PanelAction::MarkStart { .. } => "标记经期开始".to_string(),
            PanelAction::MarkEnd { .. } => "标记经期结束".to_string(),
            PanelAction::SetStartDate { .. } => "设为开始日期".to_string(),
            PanelAction::AdjustRange {
                start_date,
                end_date,
                ..
            } => format!("调整为 {} 至 {}", start_date, end_date),
            PanelAction::DeleteRecord { .. } => "删除记录".to_string(),
            PanelAction::Close => "关闭".to_string(),
        }
    }

    /// The adjust request this action submits, if it is an adjustment.
    pub fn adjust_request(&self) -> Option<AdjustPeriod> {
        match self {
            PanelAction::SetStartDate { record_id, date } => Some(AdjustPeriod {
                record_id: *record_id,
                kind: AdjustKind::Start,
                start_date: Some(date.to_string()),
                end_date: None,
            }),
            PanelAction::AdjustRange {
                record_id,
                start_date,
                end_date,
            } => Some(AdjustPeriod {
                record_id: *record_id,
                kind: AdjustKind::Both,
                start_date: Some(start_date.clone()),
                end_date: Some(end_date.to_string()),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelItem {
    Heading(&'static str),
    Record(CandidateRecord),
    Notice(&'static str),
    Separator,
    Action(PanelAction),
}

impl PanelItem {
    pub fn text(&self) -> String {
        match self {
            PanelItem::Heading(text) | PanelItem::Notice(text) => text.to_string(),
            PanelItem::Record(record) => {
                let mut text = format!("{} 开始 ({})", record.start_date, record.status_label());
                if let Some(end) = &record.current_end_date {
                    text.push_str(&format!("，当前结束 {}", end));
                }
                text
            }
            PanelItem::Separator => "─".repeat(16),
            PanelItem::Action(action) => action.label(),
        }
    }
}

/// Where the panel contents came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelSource {
    Info,
    /// The info request failed; only basic actions are offered.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePanel {
    pub date: SelectedDate,
    pub title: String,
    pub source: PanelSource,
    pub items: Vec<PanelItem>,
    /// Index among the actionable items.
    pub selected: usize,
}

impl DatePanel {
    pub fn actions(&self) -> impl Iterator<Item = &PanelAction> {
        self.items.iter().filter_map(|item| match item {
            PanelItem::Action(action) => Some(action),
            _ => None,
        })
    }

    pub fn action_count(&self) -> usize {
        self.actions().count()
    }

    pub fn selected_action(&self) -> Option<&PanelAction> {
        self.actions().nth(self.selected)
    }

    pub fn select_next(&mut self) {
        let count = self.action_count();
        if count > 0 {
            self.selected = (self.selected + 1) % count;
        }
    }

    pub fn select_previous(&mut self) {
        let count = self.action_count();
        if count > 0 {
            self.selected = (self.selected + count - 1) % count;
        }
    }

    /// Action index of the item at `item_index`, if that item is an action.
    pub fn action_index_of_item(&self, item_index: usize) -> Option<usize> {
        if !matches!(self.items.get(item_index), Some(PanelItem::Action(_))) {
            return None;
        }
        Some(
            self.items[..item_index]
                .iter()
                .filter(|item| matches!(item, PanelItem::Action(_)))
                .count(),
        )
    }
}

/// Build the panel for `date`. `info` is `None` when the info request failed,
/// which yields the fallback panel.
pub fn derive_panel(date: SelectedDate, auth: AuthState, info: Option<&PeriodInfo>) -> DatePanel {
    let (source, mut items) = match info {
        Some(info) => (PanelSource::Info, info_items(date, auth, info)),
        None => (PanelSource::Fallback, fallback_items(date, auth)),
    };
    items.push(PanelItem::Action(PanelAction::Close));

    DatePanel {
        date,
        title: date.display_zh(),
        source,
        items,
        selected: 0,
    }
}

fn info_items(date: SelectedDate, auth: AuthState, info: &PeriodInfo) -> Vec<PanelItem> {
    if !auth.is_authenticated() {
        return vec![PanelItem::Notice(LOGIN_REQUIRED)];
    }

    let mut items = Vec::new();
    if info.is_start_possible {
        items.push(PanelItem::Action(PanelAction::MarkStart { date }));
    }

    let records = &info.end_candidate_records;
    if records.is_empty() {
        if !info.is_start_possible {
            items.push(PanelItem::Notice(ALREADY_RECORDED));
        }
        return items;
    }

    items.push(PanelItem::Heading(ADJUST_HEADING));
    for (index, record) in records.iter().enumerate() {
        items.push(PanelItem::Record(record.clone()));
        items.push(PanelItem::Action(PanelAction::SetStartDate {
            record_id: record.id,
            date,
        }));
        items.push(PanelItem::Action(PanelAction::AdjustRange {
            record_id: record.id,
            start_date: record.start_date.clone(),
            end_date: date,
        }));
        items.push(PanelItem::Action(PanelAction::DeleteRecord {
            record_id: record.id,
            start_date: record.start_date.clone(),
        }));
        if index + 1 < records.len() {
            items.push(PanelItem::Separator);
        }
    }
    items
}

fn fallback_items(date: SelectedDate, auth: AuthState) -> Vec<PanelItem> {
    if !auth.is_authenticated() {
        return vec![PanelItem::Notice(LOGIN_REQUIRED)];
    }
    vec![
        PanelItem::Action(PanelAction::MarkStart { date }),
        PanelItem::Action(PanelAction::MarkEnd { date }),
    ]
}
