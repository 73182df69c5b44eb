use super::utils::centered_rect;
use super::*;
use crate::panel::{PanelItem, PanelSource};

const PANEL_WIDTH: u16 = 48;

pub fn render_date_panel(frame: &mut Frame, app: &mut App) {
    let Some(panel) = app.panel.as_ref() else {
        return;
    };

    let height = panel.items.len() as u16 + 4;
    let area = centered_rect(PANEL_WIDTH, height, frame.area());
    clear_area(frame, area);

    let focused = app.current_view == View::DatePanel;
    let mut lines = Vec::with_capacity(panel.items.len() + 1);
    let mut rows = Vec::with_capacity(panel.items.len());
    let mut action_index = 0;
    // One line of padding below the top border.
    let first_row = area.y + 2;
    lines.push(Line::from(""));

    for (item_index, item) in panel.items.iter().enumerate() {
        rows.push((first_row + item_index as u16, item_index));
        let line = match item {
            PanelItem::Heading(_) => Line::from(Span::styled(
                item.text(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            PanelItem::Notice(_) => Line::from(Span::styled(
                item.text(),
                Style::default().fg(Color::Yellow),
            )),
            PanelItem::Record(_) => Line::from(Span::styled(
                item.text(),
                Style::default().fg(Color::Gray),
            )),
            PanelItem::Separator => Line::from(Span::styled(
                item.text(),
                Style::default().fg(Color::DarkGray),
            )),
            PanelItem::Action(_) => {
                let is_selected = action_index == panel.selected;
                action_index += 1;
                let style = if app.submitting {
                    Style::default().fg(Color::DarkGray)
                } else if is_selected && focused {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                let marker = if is_selected { "› " } else { "  " };
                Line::from(Span::styled(format!("{}{}", marker, item.text()), style))
            }
        };
        lines.push(line);
    }

    let title = if app.submitting {
        format!("{} · 处理中...", panel.title)
    } else {
        panel.title.clone()
    };
    let border = match panel.source {
        PanelSource::Info => Color::Magenta,
        PanelSource::Fallback => Color::Yellow,
    };
    let block = dialog_block(&title, border).title_top(
        Line::from(Span::styled(" ✕ ", Style::default().fg(Color::Red))).right_aligned(),
    );
    frame.render_widget(Paragraph::new(lines).block(block), area);

    app.panel_area = Some(area);
    app.panel_close_area = Some(Rect {
        x: area.x + area.width.saturating_sub(4),
        y: area.y,
        width: 3,
        height: 1,
    });
    app.panel_item_rows = rows;
}
