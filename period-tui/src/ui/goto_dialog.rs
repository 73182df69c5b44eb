use super::utils::centered_rect;
use super::*;

pub fn render_goto_dialog(frame: &mut Frame, app: &App) {
    let area = centered_rect(36, 5, frame.area());
    clear_area(frame, area);

    let (before, after) = app.goto_input.split_at_cursor();
    let lines = vec![
        Line::from(Span::styled("YYYY-MM-DD", Style::default().fg(Color::DarkGray))),
        input_line(before, after, true),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(dialog_block("跳转到日期", Color::Cyan)),
        area,
    );
}
