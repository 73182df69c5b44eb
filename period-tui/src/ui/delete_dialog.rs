use super::utils::centered_rect;
use super::*;

pub fn render_delete_confirm_dialog(frame: &mut Frame, app: &App) {
    let start_date = app
        .pending_delete
        .as_ref()
        .map(|pending| format!("{} 开始的记录", pending.start_date))
        .unwrap_or_default();

    let area = centered_rect(44, 8, frame.area());
    clear_area(frame, area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "确定要删除这条经期记录吗？",
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(start_date, Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y] 确定", Style::default().fg(Color::Red)),
            Span::raw("    "),
            Span::styled("[n] 取消", Style::default().fg(Color::White)),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(dialog_block("删除记录", Color::Red))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
