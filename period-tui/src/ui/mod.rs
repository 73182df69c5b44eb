use crate::app::{App, StatusKind, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph},
    Frame,
};

mod account_dialog;
mod calendar_view;
mod date_panel;
mod delete_dialog;
mod goto_dialog;
mod profile_dialog;
pub(super) mod utils;

pub fn render(frame: &mut Frame, app: &mut App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, root[0], app);
    calendar_view::render_calendar_view(frame, app, root[1]);
    render_status_line(frame, root[2], app);
    render_key_hints(frame, root[3], app);

    // Overlays are drawn over the calendar; the panel stays visible behind
    // dialogs opened from it.
    if app.is_panel_visible() {
        date_panel::render_date_panel(frame, app);
    }
    match app.current_view {
        View::Calendar | View::DatePanel => {}
        View::ConfirmDelete => delete_dialog::render_delete_confirm_dialog(frame, app),
        View::DeleteAccount => account_dialog::render_account_dialog(frame, app),
        View::Profile => profile_dialog::render_profile_dialog(frame, app),
        View::GotoDate => goto_dialog::render_goto_dialog(frame, app),
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &mut App) {
    const LABEL: &str = " 经期日历";
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(12), Constraint::Min(0)])
        .split(area);

    let throbber_area = Rect {
        x: cols[0].x + 1,
        y: cols[0].y,
        width: 1,
        height: 1,
    };
    let label_area = Rect {
        x: throbber_area.x + 1,
        y: cols[0].y,
        width: cols[0].width.saturating_sub(2),
        height: 1,
    };
    let throbber = throbber_widgets_tui::Throbber::default()
        .style(Style::default().fg(Color::Magenta))
        .throbber_style(Style::default().fg(Color::Magenta))
        .throbber_set(throbber_widgets_tui::BRAILLE_SIX)
        .use_type(if app.is_loading {
            throbber_widgets_tui::WhichUse::Spin
        } else {
            throbber_widgets_tui::WhichUse::Full
        });
    frame.render_stateful_widget(throbber, throbber_area, &mut app.throbber_state);
    frame.render_widget(
        Paragraph::new(Span::styled(
            LABEL,
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        label_area,
    );

    let muted = Style::default().fg(Color::DarkGray);
    let mut spans = Vec::new();
    if app.auth.is_authenticated() {
        spans.push(Span::styled("已登录", Style::default().fg(Color::Green)));
    } else {
        spans.push(Span::styled("未登录", Style::default().fg(Color::Yellow)));
    }
    if let (Some(cycle), Some(period)) = (app.cycle_length, app.period_length) {
        spans.push(Span::styled(" | ", muted));
        spans.push(Span::styled(
            format!("周期 {} 天 · 经期 {} 天", cycle, period),
            Style::default().fg(Color::White),
        ));
    }
    if app.dev_mode {
        spans.push(Span::styled(" | ", muted));
        spans.push(Span::styled("DEV", Style::default().fg(Color::Cyan)));
    }
    spans.push(Span::raw(" "));
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Right),
        cols[1],
    );
}

fn render_status_line(frame: &mut Frame, area: Rect, app: &App) {
    let Some(status) = &app.status else {
        return;
    };
    let color = match status.kind {
        StatusKind::Info => Color::Green,
        StatusKind::Error => Color::Red,
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!(" {}", status.text),
            Style::default().fg(color),
        )),
        area,
    );
}

fn render_key_hints(frame: &mut Frame, area: Rect, app: &App) {
    let hints: &[(&str, &str)] = match app.current_view {
        View::Calendar => &[
            ("←↓↑→", "移动"),
            ("Enter", "选择"),
            ("[ ]", "切换月份"),
            ("t", "今天"),
            ("g", "跳转"),
            ("s", "基础信息"),
            ("r", "刷新"),
            ("D", "删除账户"),
            ("q", "退出"),
        ],
        View::DatePanel => &[("↑↓", "选择"), ("Enter", "执行"), ("Esc/x", "关闭")],
        View::ConfirmDelete => &[("y", "确定"), ("n", "取消")],
        View::DeleteAccount => &[("Enter", "确认删除"), ("Esc", "取消")],
        View::Profile => &[("Tab", "切换"), ("Enter", "保存"), ("Esc", "取消")],
        View::GotoDate => &[("Enter", "跳转"), ("Esc", "取消")],
    };

    let mut spans = vec![Span::raw(" ")];
    for (key, label) in hints {
        spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        spans.push(Span::styled(
            format!(" {}  ", label),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Bordered popup block in the style shared by all dialogs.
fn dialog_block(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Span::styled(format!(" {} ", title), Style::default().fg(color)))
        .padding(Padding::horizontal(1))
}

/// Input line with the cursor drawn as a block character.
fn input_line(before: &str, after: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let text = if focused {
        format!("{}█{}", before, after)
    } else {
        format!("{}{}", before, after)
    };
    Line::from(Span::styled(text, style))
}

fn clear_area(frame: &mut Frame, area: Rect) {
    frame.render_widget(Clear, area);
}
