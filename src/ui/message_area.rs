use std::fmt::Write as _;

use crate::session::window::{Message, MessageKind};
use crate::ui::theme::Theme;
use crate::ui::View;
use ratatui::prelude::*;
use ratatui::widgets::{
    Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
};

pub fn render(frame: &mut Frame, area: Rect, view: &View) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let lines: Vec<Line> = view
        .buffer
        .lines
        .iter()
        .map(|msg| format_message(msg, &view.nickname, &view.timestamp_format))
        .collect();

    // The captured lines end at the current line; wrapped lines push the
    // oldest ones off the top.
    let width = usize::from(inner.width);
    let wrapped: usize = lines.iter().map(|l| l.width().max(1).div_ceil(width)).sum();
    let overflow = wrapped.saturating_sub(usize::from(inner.height));
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((u16::try_from(overflow).unwrap_or(u16::MAX), 0));
    frame.render_widget(paragraph, inner);

    let total = view.buffer.total;
    let rows = usize::from(inner.height);
    if total > rows {
        let mut scrollbar_state =
            ScrollbarState::new(total.saturating_sub(rows)).position(view.buffer.first);

        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .thumb_symbol("┃")
            .track_symbol(Some("│"))
            .thumb_style(Theme::scrollbar_thumb())
            .track_style(Theme::scrollbar_track());

        frame.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}

fn format_message(msg: &Message, our_nick: &str, timestamp_format: &str) -> Line<'static> {
    let mut stamp = String::new();
    // chrono reports a malformed format string as a fmt error
    if write!(stamp, "[{}] ", msg.timestamp.format(timestamp_format)).is_err() {
        stamp = format!("[{}] ", msg.timestamp.format("%H:%M"));
    }
    let ts = Span::styled(stamp, Theme::timestamp());

    match msg.kind {
        MessageKind::Normal => {
            let nick_style = if !our_nick.is_empty() && our_nick.eq_ignore_ascii_case(&msg.sender) {
                Theme::nick_self()
            } else {
                Theme::nick_color(&msg.sender)
            };
            Line::from(vec![
                ts,
                Span::styled(format!("<{}> ", msg.sender), nick_style),
                Span::styled(msg.text.clone(), Theme::message_text()),
            ])
        }
        MessageKind::Action => Line::from(vec![
            ts,
            Span::styled(
                format!("* {} {}", msg.sender, msg.text),
                Theme::action_message(),
            ),
        ]),
        MessageKind::Notice => {
            let sender = if msg.sender.is_empty() {
                String::new()
            } else {
                format!("-{}- ", msg.sender)
            };
            Line::from(vec![
                ts,
                Span::styled(sender, Theme::notice_message()),
                Span::styled(msg.text.clone(), Theme::notice_message()),
            ])
        }
        MessageKind::Join => event_line(ts, "→ ", &msg.text, Theme::join_message()),
        MessageKind::Part | MessageKind::Quit | MessageKind::Kick => {
            event_line(ts, "← ", &msg.text, Theme::part_message())
        }
        MessageKind::Nick | MessageKind::Topic | MessageKind::Mode => {
            event_line(ts, "• ", &msg.text, Theme::action_message())
        }
        MessageKind::System => event_line(ts, "• ", &msg.text, Theme::system_message()),
        MessageKind::Error => event_line(ts, "✘ ", &msg.text, Theme::error_message()),
    }
}

fn event_line(ts: Span<'static>, marker: &'static str, text: &str, style: Style) -> Line<'static> {
    Line::from(vec![
        ts,
        Span::styled(marker, style),
        Span::styled(text.to_string(), style),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_format_kinds() {
        let said = Message::new("ferris", "hi", MessageKind::Normal);
        assert!(plain(&format_message(&said, "me", "%H:%M")).ends_with("<ferris> hi"));

        let action = Message::new("ferris", "waves", MessageKind::Action);
        assert!(plain(&format_message(&action, "me", "%H:%M")).ends_with("* ferris waves"));

        let notice = Message::new("NickServ", "identify", MessageKind::Notice);
        assert!(plain(&format_message(&notice, "me", "%H:%M")).ends_with("-NickServ- identify"));

        let join = Message::event(MessageKind::Join, "ferris joined #rust");
        assert!(plain(&format_message(&join, "me", "%H:%M")).ends_with("→ ferris joined #rust"));
    }

    #[test]
    fn test_timestamp_format_is_applied() {
        let msg = Message::event(MessageKind::System, "x");
        let expected = format!("[{}] ", msg.timestamp.format("%Y"));
        assert!(plain(&format_message(&msg, "", "%Y")).starts_with(&expected));
    }

    #[test]
    fn test_bad_timestamp_format_falls_back() {
        let msg = Message::event(MessageKind::System, "x");
        let expected = format!("[{}] ", msg.timestamp.format("%H:%M"));
        assert!(plain(&format_message(&msg, "", "%Q%")).starts_with(&expected));
    }
}
