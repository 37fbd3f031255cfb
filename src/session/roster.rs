//! Group membership list.
//!
//! A [`Roster`] keeps entries in arrival order with a lowercase-name index for
//! constant-time lookup. Display ordering is computed on demand by
//! [`Roster::presentation`] and never stored.

use std::collections::HashMap;

/// Channel privilege, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Privilege {
    #[default]
    None,
    Voice,
    Operator,
}

impl Privilege {
    /// Map a NAMES prefix character to a privilege.
    pub fn from_marker(c: char) -> Option<Privilege> {
        match c {
            '~' | '&' | '@' => Some(Privilege::Operator),
            '%' | '+' => Some(Privilege::Voice),
            _ => None,
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            Privilege::Operator => "@",
            Privilege::Voice => "+",
            Privilege::None => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub name: String,
    pub privilege: Privilege,
}

impl RosterEntry {
    pub fn new(name: impl Into<String>, privilege: Privilege) -> Self {
        Self {
            name: name.into(),
            privilege,
        }
    }

    /// Parse a raw NAMES token such as `@alice` or `+bob`.
    ///
    /// All leading markers are stripped and the highest one wins. Returns
    /// `None` for tokens with no name left.
    pub fn parse(token: &str) -> Option<RosterEntry> {
        let mut privilege = Privilege::None;
        let name = token.trim_start_matches(|c: char| match Privilege::from_marker(c) {
            Some(p) => {
                privilege = privilege.max(p);
                true
            }
            None => false,
        });
        if name.is_empty() {
            return None;
        }
        Some(RosterEntry::new(name, privilege))
    }

    pub fn display_name(&self) -> String {
        format!("{}{}", self.privilege.marker(), self.name)
    }
}

fn key(name: &str) -> String {
    name.to_ascii_lowercase()
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: Vec<RosterEntry>,
    index: HashMap<String, usize>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `name`, or update its privilege if already present.
    pub fn add(&mut self, name: &str, privilege: Privilege) {
        if name.is_empty() {
            return;
        }
        match self.index.get(&key(name)) {
            Some(&i) => self.entries[i].privilege = privilege,
            None => {
                self.index.insert(key(name), self.entries.len());
                self.entries.push(RosterEntry::new(name, privilege));
            }
        }
    }

    /// Rename `old` to `new` in place. Returns `false` when `old` is absent.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        let Some(&i) = self.index.get(&key(old)) else {
            return false;
        };
        if new.is_empty() {
            return false;
        }
        if key(old) != key(new) && self.index.contains_key(&key(new)) {
            // A stale entry already carries the new name; the renamed one wins.
            self.remove(new);
            return self.rename(old, new);
        }
        self.index.remove(&key(old));
        self.index.insert(key(new), i);
        self.entries[i].name = new.to_string();
        true
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let Some(i) = self.index.remove(&key(name)) else {
            return false;
        };
        self.entries.remove(i);
        for (j, entry) in self.entries.iter().enumerate().skip(i) {
            self.index.insert(key(&entry.name), j);
        }
        true
    }

    /// Replace the whole roster from raw NAMES tokens.
    pub fn replace<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.entries.clear();
        self.index.clear();
        for entry in tokens
            .into_iter()
            .filter_map(|t| RosterEntry::parse(t.as_ref()))
        {
            self.add(&entry.name, entry.privilege);
        }
    }

    pub fn set_privilege(&mut self, name: &str, privilege: Privilege) -> bool {
        match self.index.get(&key(name)) {
            Some(&i) => {
                self.entries[i].privilege = privilege;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&key(name))
    }

    pub fn get(&self, name: &str) -> Option<&RosterEntry> {
        self.index.get(&key(name)).map(|&i| &self.entries[i])
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    /// Operators first, then voiced, then everyone else; alphabetical within
    /// each group. Equal names keep their storage order.
    pub fn presentation(&self) -> Vec<RosterEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| {
            b.privilege
                .cmp(&a.privilege)
                .then_with(|| key(&a.name).cmp(&key(&b.name)))
        });
        sorted
    }
}
