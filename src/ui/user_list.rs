use crate::session::roster::{Privilege, RosterEntry};
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem};

/// `users` arrives in presentation order: operators, voiced, then the rest.
pub fn render(frame: &mut Frame, area: Rect, users: &[RosterEntry]) {
    let mut items: Vec<ListItem> = Vec::new();
    let mut last_group: Option<Privilege> = None;

    for user in users {
        // Dashed separator between privilege groups
        if last_group.is_some_and(|prev| prev != user.privilege) {
            items.push(ListItem::new(Span::styled(
                " ╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌",
                Style::default().fg(Theme::BORDER_DIM),
            )));
        }
        last_group = Some(user.privilege);

        let style = match user.privilege {
            Privilege::Operator => Theme::user_op(),
            Privilege::Voice => Theme::user_voice(),
            Privilege::None => Theme::user_normal(),
        };
        items.push(ListItem::new(Span::styled(
            format!(" {}", user.display_name()),
            style,
        )));
    }

    let title = if users.is_empty() {
        " Users ".to_string()
    } else {
        format!(" Users ({}) ", users.len())
    };

    let block = Block::default()
        .title(title)
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_style(Theme::border());

    if items.is_empty() {
        items.push(ListItem::new(Span::styled(
            " —",
            Style::default().fg(Theme::TEXT_MUTED),
        )));
    }

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
