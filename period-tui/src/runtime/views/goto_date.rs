use crate::app::App;
use crate::types::SelectedDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub(super) fn handle_goto_date_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => app.close_goto(),
        KeyCode::Enter => match app.goto_input.value.parse::<SelectedDate>() {
            Ok(date) => {
                app.close_goto();
                app.calendar.jump_to(date.date());
            }
            Err(err) => {
                tracing::warn!(input = %app.goto_input.value, error = %err, "failed to parse date");
                app.set_error(format!("无效日期: {}", err));
            }
        },
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.goto_input.insert(c)
        }
        KeyCode::Backspace => app.goto_input.backspace(),
        KeyCode::Left => app.goto_input.move_left(),
        KeyCode::Right => app.goto_input.move_right(),
        _ => {}
    }
}
