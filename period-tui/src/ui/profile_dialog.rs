use super::utils::centered_rect;
use super::*;
use crate::app::{ProfileField, TextInput};

pub fn render_profile_dialog(frame: &mut Frame, app: &App) {
    let dialog = &app.profile_dialog;
    let area = centered_rect(46, 10, frame.area());
    clear_area(frame, area);

    let field = |label: &str, input: &TextInput, focused: bool| {
        let (before, after) = input.split_at_cursor();
        let label_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut spans = vec![Span::styled(format!("{}: ", label), label_style)];
        spans.extend(input_line(before, after, focused).spans);
        Line::from(spans)
    };

    let mut lines = vec![
        Line::from(""),
        field(
            "月经间隔天数 (15-45)",
            &dialog.cycle_length,
            dialog.focused == ProfileField::CycleLength,
        ),
        field(
            "经期持续天数 (1-10)",
            &dialog.period_length,
            dialog.focused == ProfileField::PeriodLength,
        ),
        Line::from(""),
    ];
    if let Some(error) = &dialog.error {
        lines.push(Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines).block(dialog_block("基础信息", Color::Magenta)),
        area,
    );
}
