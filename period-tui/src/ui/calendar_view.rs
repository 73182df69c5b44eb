use super::*;
use crate::calendar::{DayCell, PredictionMark};
use crate::types::weekday_zh;
use time::Weekday;

const WEEK_HEADER: [Weekday; 7] = [
    Weekday::Sunday,
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
];

pub fn render_calendar_view(frame: &mut Frame, app: &mut App, body: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {} ", app.calendar.month_title()),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);
    let inner = block.inner(body);
    frame.render_widget(block, body);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    let column_width = inner.width / 7;
    render_week_header(frame, rows[0], column_width);
    render_grid(frame, app, rows[1], column_width);
    render_legend(frame, app, rows[2]);
}

fn render_week_header(frame: &mut Frame, area: Rect, column_width: u16) {
    for (index, weekday) in WEEK_HEADER.iter().enumerate() {
        let label = weekday_zh(*weekday).chars().last().unwrap_or(' ').to_string();
        let color = match weekday {
            Weekday::Sunday | Weekday::Saturday => Color::Magenta,
            _ => Color::Gray,
        };
        let cell = Rect {
            x: area.x + column_width * index as u16,
            y: area.y,
            width: column_width,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(Span::styled(label, Style::default().fg(color)))
                .alignment(Alignment::Center),
            cell,
        );
    }
}

fn render_grid(frame: &mut Frame, app: &mut App, area: Rect, column_width: u16) {
    let mut cell_areas = Vec::with_capacity(42);
    let weeks = app.calendar.grid.weeks.len().max(1) as u16;
    let row_height = (area.height / weeks).clamp(1, 3);

    for (week_index, week) in app.calendar.grid.weeks.iter().enumerate() {
        let y = area.y + row_height * week_index as u16;
        if y + row_height > area.y + area.height {
            break;
        }
        for (day_index, cell) in week.iter().enumerate() {
            let cell_area = Rect {
                x: area.x + column_width * day_index as u16,
                y,
                width: column_width,
                height: row_height,
            };
            let style = day_style(app, cell);
            let mut lines = vec![Line::from(Span::styled(
                format!("{:>2}", cell.date.day()),
                style,
            ))];
            if row_height > 1 && cell.is_current_month {
                let marker = match app.calendar.prediction_mark(cell.date) {
                    Some(PredictionMark::Current) => "预测",
                    Some(PredictionMark::Upcoming) => "·",
                    None => "",
                };
                lines.push(Line::from(Span::styled(marker, style)));
            }
            frame.render_widget(
                Paragraph::new(lines).alignment(Alignment::Center),
                cell_area,
            );
            cell_areas.push((cell_area, *cell));
        }
    }
    app.cell_areas = cell_areas;
}

fn day_style(app: &App, cell: &DayCell) -> Style {
    if !cell.is_current_month {
        return Style::default().fg(Color::DarkGray);
    }

    let mut style = match app.calendar.prediction_mark(cell.date) {
        Some(PredictionMark::Current) => Style::default().fg(Color::Black).bg(Color::LightMagenta),
        Some(PredictionMark::Upcoming) => Style::default().fg(Color::LightMagenta),
        None => Style::default().fg(Color::White),
    };
    if cell.is_today {
        style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    if app.calendar.selected == Some(cell.date) {
        style = style.fg(Color::Black).bg(Color::Yellow);
    } else if app.calendar.cursor == cell.date && app.current_view == View::Calendar {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

fn render_legend(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![Line::from(vec![
        Span::styled(" ■ ", Style::default().fg(Color::LightMagenta)),
        Span::styled("本周期预测  ", Style::default().fg(Color::DarkGray)),
        Span::styled("· ", Style::default().fg(Color::LightMagenta)),
        Span::styled("后续预测", Style::default().fg(Color::DarkGray)),
    ])];

    if let Some(next) = app.calendar.predictions.iter().find(|p| p.is_current) {
        let mut text = format!(" 下次经期: {} 至 {}", next.start_date, next.end_date);
        if let Some(note) = &next.calculation_note {
            text.push_str(&format!(" ({})", note));
        }
        lines.push(Line::from(Span::styled(
            text,
            Style::default().fg(Color::Gray),
        )));
    }
    frame.render_widget(Paragraph::new(lines), area);
}
