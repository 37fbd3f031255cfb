use crate::session::window::WindowKind;
use crate::ui::theme::Theme;
use crate::ui::View;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

pub fn render(frame: &mut Frame, area: Rect, view: &View) {
    let bg_style = Style::default().bg(Theme::BG_ELEVATED);
    let accent = |color: Color| {
        Style::default()
            .fg(color)
            .bg(Theme::BG_ELEVATED)
            .add_modifier(Modifier::BOLD)
    };
    let separator = Span::styled(
        " │ ",
        Style::default().fg(Theme::BORDER_DIM).bg(Theme::BG_ELEVATED),
    );

    let line = match view.kind {
        WindowKind::Group => {
            let topic = if view.topic.is_empty() {
                Span::styled(
                    "No topic set",
                    Style::default()
                        .fg(Theme::TEXT_MUTED)
                        .bg(Theme::BG_ELEVATED)
                        .add_modifier(Modifier::ITALIC),
                )
            } else {
                Span::styled(
                    view.topic.as_str(),
                    Style::default()
                        .fg(Theme::TEXT_PRIMARY)
                        .bg(Theme::BG_ELEVATED)
                        .add_modifier(Modifier::ITALIC),
                )
            };
            Line::from(vec![
                Span::styled(" ", bg_style),
                Span::styled(view.title.as_str(), accent(Theme::ACCENT_TEAL)),
                separator,
                topic,
            ])
        }
        WindowKind::Direct => Line::from(vec![
            Span::styled(" → ", accent(Theme::ACCENT_LAVENDER)),
            Span::styled(view.title.as_str(), accent(Theme::ACCENT_LAVENDER)),
        ]),
        WindowKind::Status => Line::from(vec![
            Span::styled(" ◆ ", accent(Theme::ACCENT_GREEN)),
            Span::styled("irctabs", accent(Theme::TEXT_PRIMARY)),
            separator,
            Span::styled(
                "/help for commands",
                Style::default()
                    .fg(Theme::TEXT_SECONDARY)
                    .bg(Theme::BG_ELEVATED)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]),
    };

    let paragraph = Paragraph::new(line).style(bg_style);
    frame.render_widget(paragraph, area);
}
