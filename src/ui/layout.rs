use ratatui::layout::{Constraint, Direction, Layout, Rect};

const USER_LIST_WIDTH: u16 = 22;

pub struct AppLayout {
    pub tab_bar: Rect,
    pub topic_bar: Rect,
    pub message_area: Rect,
    /// Zero-sized when the active window has no roster.
    pub user_list: Rect,
    pub input_box: Rect,
    pub status_bar: Rect,
}

pub fn compute_layout(area: Rect, with_users: bool) -> AppLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Window tabs
            Constraint::Length(1), // Topic bar
            Constraint::Min(3),    // Messages + users
            Constraint::Length(3), // Input box
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let users_width = if with_users { USER_LIST_WIDTH } else { 0 };
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(users_width)])
        .split(rows[2]);

    AppLayout {
        tab_bar: rows[0],
        topic_bar: rows[1],
        message_area: body[0],
        user_list: body[1],
        input_box: rows[3],
        status_bar: rows[4],
    }
}

/// Text rows available to the message area inside its borders.
pub fn message_rows(area: Rect) -> usize {
    let layout = compute_layout(area, false);
    usize::from(layout.message_area.height.saturating_sub(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_list_only_with_roster() {
        let area = Rect::new(0, 0, 100, 30);
        assert_eq!(compute_layout(area, true).user_list.width, USER_LIST_WIDTH);
        let layout = compute_layout(area, false);
        assert_eq!(layout.user_list.width, 0);
        assert_eq!(layout.message_area.width, 100);
    }

    #[test]
    fn test_message_rows() {
        // 30 rows minus tabs, topic, input, status and two borders
        assert_eq!(message_rows(Rect::new(0, 0, 100, 30)), 22);
    }
}
