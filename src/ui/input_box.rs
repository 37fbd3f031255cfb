use crate::session::history::InputMode;
use crate::ui::theme::Theme;
use crate::ui::View;
use ratatui::prelude::*;
use ratatui::widgets::block::Padding;
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

pub fn render(frame: &mut Frame, area: Rect, view: &View) {
    let (title, prompt) = match view.mode {
        InputMode::Message => (" Message ", "❯ "),
        InputMode::Command => (" Command ", "/ "),
    };

    let block = Block::default()
        .title(title)
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_style(Theme::border())
        .padding(Padding::horizontal(1));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    // Keep the cursor visible on long lines by scrolling horizontally
    let prompt_width = prompt.width() as u16;
    let head = view.input.get(..view.cursor).unwrap_or(&view.input);
    let cursor_col = head.width() as u16;
    let room = inner.width.saturating_sub(prompt_width + 1);
    let scroll = cursor_col.saturating_sub(room);

    let line = Line::from(vec![
        Span::styled(prompt, Style::default().fg(Theme::ACCENT_TEAL)),
        Span::styled(view.input.as_str(), Theme::input_text()),
    ]);
    let paragraph = Paragraph::new(line).scroll((0, scroll));
    frame.render_widget(paragraph, inner);

    let cursor_x = inner.x + prompt_width + cursor_col - scroll;
    frame.set_cursor_position((cursor_x.min(inner.right() - 1), inner.y));
}
