//! Default nickname generator.
//!
//! Builds names like `QuietOwl42`, clipped so the whole nickname fits the
//! common nine-character limit.

use rand::RngExt;

const MAX_LEN: usize = 9;

const ADJECTIVES: &[&str] = &[
    "Quiet", "Brisk", "Lucky", "Amber", "Mossy", "Sunny", "Dusty", "Misty", "Rusty", "Witty",
    "Jolly", "Tidy", "Bold", "Calm", "Keen", "Wild",
];

const NOUNS: &[&str] = &[
    "Owl", "Elk", "Yak", "Emu", "Ant", "Bee", "Cod", "Eel", "Fox", "Gnu", "Jay", "Koi", "Ram",
    "Ray", "Wren", "Lark",
];

pub fn generate_nickname() -> String {
    let mut rng = rand::rng();
    let adj = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.random_range(0..NOUNS.len())];
    let num: u8 = rng.random_range(10..100);
    let mut stem = format!("{adj}{noun}");
    stem.truncate(MAX_LEN - 2);
    format!("{stem}{num}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nickname_shape() {
        for _ in 0..50 {
            let nick = generate_nickname();
            assert!(nick.len() <= MAX_LEN, "{nick} too long");
            assert!(nick.chars().next().unwrap().is_ascii_uppercase());
            assert!(nick.ends_with(|c: char| c.is_ascii_digit()));
            assert!(nick.is_ascii());
        }
    }
}
