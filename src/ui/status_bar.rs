use crate::session::window::Activity;
use crate::ui::theme::Theme;
use crate::ui::View;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

/// One label per window: `index:title`, colored by activity.
pub fn render_tabs(frame: &mut Frame, area: Rect, view: &View) {
    let mut parts: Vec<Span> = Vec::new();
    for tab in &view.tabs {
        let style = if tab.active {
            Theme::tab_active()
        } else {
            match tab.activity {
                Activity::Notice => Theme::tab_notice(),
                Activity::Unseen => Theme::tab_unseen(),
                Activity::None => Theme::tab_normal(),
            }
        };
        parts.push(Span::styled(format!(" {}:{} ", tab.index, tab.title), style));
    }
    pad(&mut parts, area.width, Theme::tab_normal());

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

pub fn render(frame: &mut Frame, area: Rect, view: &View) {
    let nick = if view.nickname.is_empty() {
        "offline"
    } else {
        view.nickname.as_str()
    };
    let mut parts: Vec<Span> = vec![Span::styled(
        format!(" [{nick}] "),
        Style::default().fg(Theme::ACCENT_GREEN).bg(Theme::BG_ELEVATED),
    )];

    let mut window = view.title.clone();
    if !view.modes.is_empty() {
        window.push_str(&format!(" ({})", view.modes));
    }
    parts.push(Span::styled(format!(" {window} "), Theme::status_bar()));

    let scroll = if view.buffer.pinned {
        String::new()
    } else {
        format!(
            " -- more ({}/{}) -- ",
            view.buffer.first + view.buffer.lines.len(),
            view.buffer.total
        )
    };
    // Pad so the scroll marker sits at the right edge
    let used = width(&parts) + scroll.width();
    parts.push(Span::styled(
        " ".repeat(usize::from(area.width).saturating_sub(used)),
        Theme::status_bar(),
    ));
    parts.push(Span::styled(
        scroll,
        Style::default().fg(Theme::ACCENT_AMBER).bg(Theme::BG_ELEVATED),
    ));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

fn width(parts: &[Span]) -> usize {
    parts.iter().map(|s| s.content.width()).sum()
}

fn pad(parts: &mut Vec<Span>, total: u16, style: Style) {
    let used = width(parts);
    parts.push(Span::styled(
        " ".repeat(usize::from(total).saturating_sub(used)),
        style,
    ));
}
