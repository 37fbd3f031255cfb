use ratatui::style::{Color, Modifier, Style};

pub struct Theme;

impl Theme {
    pub const BG_ELEVATED: Color = Color::Rgb(30, 34, 42);
    pub const TEXT_PRIMARY: Color = Color::Rgb(220, 223, 228);
    pub const TEXT_SECONDARY: Color = Color::Rgb(150, 156, 168);
    pub const TEXT_MUTED: Color = Color::Rgb(95, 100, 112);
    pub const BORDER_DIM: Color = Color::Rgb(60, 64, 74);
    pub const ACCENT_TEAL: Color = Color::Rgb(80, 200, 210);
    pub const ACCENT_AMBER: Color = Color::Rgb(230, 180, 80);
    pub const ACCENT_ROSE: Color = Color::Rgb(225, 110, 130);
    pub const ACCENT_LAVENDER: Color = Color::Rgb(175, 140, 220);
    pub const ACCENT_GREEN: Color = Color::Rgb(90, 210, 130);

    const NICK_PALETTE: [Color; 6] = [
        Color::Rgb(80, 200, 210),
        Color::Rgb(100, 170, 230),
        Color::Rgb(175, 140, 220),
        Color::Rgb(220, 150, 180),
        Color::Rgb(230, 180, 80),
        Color::Rgb(90, 210, 130),
    ];

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER_DIM)
    }

    pub fn title() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY).add_modifier(Modifier::BOLD)
    }

    pub fn timestamp() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    pub fn nick_self() -> Style {
        Style::default().fg(Self::ACCENT_GREEN).add_modifier(Modifier::BOLD)
    }

    /// Stable per-nick color so a speaker keeps the same hue across lines.
    pub fn nick_color(nick: &str) -> Style {
        let hash = nick
            .bytes()
            .map(|b| b.to_ascii_lowercase())
            .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(usize::from(b)));
        Style::default().fg(Self::NICK_PALETTE[hash % Self::NICK_PALETTE.len()])
    }

    pub fn message_text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    pub fn system_message() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    pub fn error_message() -> Style {
        Style::default().fg(Self::ACCENT_ROSE)
    }

    pub fn action_message() -> Style {
        Style::default().fg(Self::ACCENT_LAVENDER)
    }

    pub fn notice_message() -> Style {
        Style::default().fg(Self::ACCENT_AMBER)
    }

    pub fn join_message() -> Style {
        Style::default().fg(Self::ACCENT_GREEN)
    }

    pub fn part_message() -> Style {
        Style::default().fg(Self::ACCENT_ROSE)
    }

    pub fn tab_normal() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY).bg(Self::BG_ELEVATED)
    }

    pub fn tab_active() -> Style {
        Style::default()
            .fg(Self::ACCENT_TEAL)
            .bg(Self::BG_ELEVATED)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_unseen() -> Style {
        Style::default().fg(Self::ACCENT_AMBER).bg(Self::BG_ELEVATED)
    }

    pub fn tab_notice() -> Style {
        Style::default()
            .fg(Self::ACCENT_ROSE)
            .bg(Self::BG_ELEVATED)
            .add_modifier(Modifier::BOLD)
    }

    pub fn user_op() -> Style {
        Style::default().fg(Self::ACCENT_GREEN)
    }

    pub fn user_voice() -> Style {
        Style::default().fg(Self::ACCENT_AMBER)
    }

    pub fn user_normal() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    pub fn input_text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY).bg(Self::BG_ELEVATED)
    }

    pub fn scrollbar_thumb() -> Style {
        Style::default().fg(Self::ACCENT_TEAL)
    }

    pub fn scrollbar_track() -> Style {
        Style::default().fg(Self::BORDER_DIM)
    }
}
