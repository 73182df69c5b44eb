#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Calendar,
    DatePanel,
    ConfirmDelete,
    DeleteAccount,
    Profile,
    GotoDate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusKind {
    Info,
    Error,
}

/// Message on the status line; takes the place of a browser alert.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

/// Record waiting for the user to confirm its deletion.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDelete {
    pub record_id: i64,
    pub start_date: String,
}

/// A text input with mid-string cursor support.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_str(s: &str) -> Self {
        Self {
            value: s.to_string(),
            cursor: s.len(),
        }
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character immediately before the cursor (backspace).
    pub fn backspace(&mut self) {
        if let Some(c) = self.value[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
            self.value.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(c) = self.value[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.value[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Returns the string split at the cursor: (before, after).
    pub fn split_at_cursor(&self) -> (&str, &str) {
        (&self.value[..self.cursor], &self.value[self.cursor..])
    }

    /// Display form with every character replaced by a bullet, split at the
    /// cursor like [`TextInput::split_at_cursor`].
    pub fn masked_at_cursor(&self) -> (String, String) {
        let (before, after) = self.split_at_cursor();
        (
            "•".repeat(before.chars().count()),
            "•".repeat(after.chars().count()),
        )
    }
}

/// Password confirmation for deleting the account.
#[derive(Debug, Clone, Default)]
pub struct AccountDialog {
    pub password: TextInput,
    /// Request in flight; the confirm control reads "验证中..." and is disabled.
    pub submitting: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ProfileField {
    #[default]
    CycleLength,
    PeriodLength,
}

impl ProfileField {
    pub fn toggle(self) -> Self {
        match self {
            ProfileField::CycleLength => ProfileField::PeriodLength,
            ProfileField::PeriodLength => ProfileField::CycleLength,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfileDialog {
    pub cycle_length: TextInput,
    pub period_length: TextInput,
    pub focused: ProfileField,
    pub error: Option<String>,
}

impl ProfileDialog {
    pub fn focused_input(&mut self) -> &mut TextInput {
        match self.focused {
            ProfileField::CycleLength => &mut self.cycle_length,
            ProfileField::PeriodLength => &mut self.period_length,
        }
    }
}
