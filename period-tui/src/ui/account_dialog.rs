use super::utils::centered_rect;
use super::*;

pub fn render_account_dialog(frame: &mut Frame, app: &App) {
    let dialog = &app.account_dialog;
    let area = centered_rect(52, 11, frame.area());
    clear_area(frame, area);

    let (before, after) = dialog.password.masked_at_cursor();
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "此操作不可恢复，所有经期记录将被永久删除。",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled("请输入密码：", Style::default().fg(Color::Gray))),
        input_line(&before, &after, !dialog.submitting),
    ];

    lines.push(match &dialog.error {
        Some(error) => Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(""),
    });

    let confirm = if dialog.submitting {
        Span::styled("验证中...", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled("[Enter] 确认删除", Style::default().fg(Color::Red))
    };
    lines.push(Line::from(vec![
        confirm,
        Span::raw("    "),
        Span::styled("[Esc] 取消", Style::default().fg(Color::White)),
    ]));

    frame.render_widget(
        Paragraph::new(lines).block(dialog_block("删除账户", Color::Red)),
        area,
    );
}
