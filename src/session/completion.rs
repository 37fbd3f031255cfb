//! Tab completion of roster names.

use super::window::Window;

/// Cycles through roster names matching the last word of the input line.
///
/// [`reset`](NameCompleter::reset) starts a session; each
/// [`tab`](NameCompleter::tab) yields the next candidate. The word as
/// originally typed is always the last candidate so cycling returns to it.
#[derive(Debug, Default)]
pub struct NameCompleter {
    suffix: String,
    active: bool,
    head: String,
    matches: Vec<String>,
    pos: usize,
}

impl NameCompleter {
    /// `suffix` is appended to names completed as the first word of a line.
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            ..Self::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn clear(&mut self) {
        self.active = false;
        self.head.clear();
        self.matches.clear();
        self.pos = 0;
    }

    /// Start a completion session for `input` against `window`'s roster and
    /// return the first candidate line.
    pub fn reset(&mut self, input: &str, window: &Window) -> String {
        let start = input
            .trim_end_matches(|c: char| !c.is_whitespace())
            .len();
        let (head, word) = input.split_at(start);
        let first_word = head.trim().is_empty();

        let mut matches: Vec<String> = if word.is_empty() {
            Vec::new()
        } else {
            let prefix = word.to_ascii_lowercase();
            window
                .users()
                .into_iter()
                .map(|entry| entry.name)
                .filter(|name| name.to_ascii_lowercase().starts_with(&prefix))
                .collect()
        };
        matches.sort_by_key(|name| name.to_ascii_lowercase());
        if first_word {
            for name in &mut matches {
                name.push_str(&self.suffix);
            }
        }
        matches.push(word.to_string());

        self.head = head.to_string();
        self.matches = matches;
        self.pos = 0;
        self.active = true;
        self.line()
    }

    /// Advance to the next candidate. `None` when no session is active.
    pub fn tab(&mut self) -> Option<String> {
        if !self.active || self.matches.is_empty() {
            return None;
        }
        self.pos = (self.pos + 1) % self.matches.len();
        Some(self.line())
    }

    fn line(&self) -> String {
        let word = self.matches.get(self.pos).map_or("", String::as_str);
        format!("{}{}", self.head, word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::roster::Privilege;
    use crate::session::signal::DirtyFlag;
    use crate::session::window::WindowKind;

    fn channel(names: &[&str]) -> Window {
        let win = Window::new(WindowKind::Group, "#rust", DirtyFlag::new());
        for name in names {
            win.add_user(name, Privilege::None);
        }
        win
    }

    #[test]
    fn test_first_word_gets_suffix_and_cycles() {
        let win = channel(&["alice", "bob", "Albert"]);
        let mut completer = NameCompleter::new(": ");
        assert_eq!(completer.reset("al", &win), "Albert: ");
        assert!(completer.is_active());
        assert_eq!(completer.tab().as_deref(), Some("alice: "));
        assert_eq!(completer.tab().as_deref(), Some("al"));
        assert_eq!(completer.tab().as_deref(), Some("Albert: "));
    }

    #[test]
    fn test_mid_sentence_replaces_last_word_only() {
        let win = channel(&["alice", "bob"]);
        let mut completer = NameCompleter::new(": ");
        assert_eq!(completer.reset("hey there B", &win), "hey there bob");
        assert_eq!(completer.tab().as_deref(), Some("hey there B"));
    }

    #[test]
    fn test_no_match_returns_input() {
        let win = channel(&["alice"]);
        let mut completer = NameCompleter::new(": ");
        assert_eq!(completer.reset("zz", &win), "zz");
        assert_eq!(completer.tab().as_deref(), Some("zz"));
    }

    #[test]
    fn test_empty_prefix_yields_only_original() {
        let win = channel(&["alice", "bob"]);
        let mut completer = NameCompleter::new(": ");
        assert_eq!(completer.reset("hello ", &win), "hello ");
        assert_eq!(completer.tab().as_deref(), Some("hello "));
        assert_eq!(completer.reset("", &win), "");
    }

    #[test]
    fn test_window_without_roster() {
        let win = Window::new(WindowKind::Direct, "peer", DirtyFlag::new());
        let mut completer = NameCompleter::new(": ");
        assert_eq!(completer.reset("pe", &win), "pe");
    }

    #[test]
    fn test_tab_without_session() {
        let mut completer = NameCompleter::new(": ");
        assert_eq!(completer.tab(), None);
        let win = channel(&["alice"]);
        completer.reset("a", &win);
        completer.clear();
        assert!(!completer.is_active());
        assert_eq!(completer.tab(), None);
    }
}
