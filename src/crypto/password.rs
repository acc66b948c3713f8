//! Credential password helpers: random generation and a pass/fail check.

use rand::Rng;

/// Default length for generated passwords.
pub const DEFAULT_LENGTH: usize = 16;

const LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

const MIN_LENGTH: usize = 8;
const COMMON: &[&str] = &["password", "admin", "123456", "qwerty", "letmein"];

/// Generate a random password from letters plus optional digits and symbols.
pub fn generate_password(length: usize, use_symbols: bool, use_numbers: bool) -> String {
    let mut alphabet: Vec<char> = LETTERS.chars().collect();
    if use_numbers {
        alphabet.extend(DIGITS.chars());
    }
    if use_symbols {
        alphabet.extend(SYMBOLS.chars());
    }

    let mut rng = rand::rng();
    (0..length)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())])
        .collect()
}

/// Outcome of [`check_password`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordCheck {
    pub passed: bool,
    /// One hint per failed rule.
    pub feedback: Vec<&'static str>,
}

/// Pass/fail strength signal for a credential password.
///
/// A password passes when it satisfies every rule; `feedback` lists the
/// rules it missed.
pub fn check_password(password: &str) -> PasswordCheck {
    let rules: [(bool, &'static str); 5] = [
        (
            password.chars().count() >= MIN_LENGTH,
            "too short (min 8 chars)",
        ),
        (password.chars().any(|c| c.is_ascii_digit()), "add numbers"),
        (
            password.chars().any(char::is_uppercase) && password.chars().any(char::is_lowercase),
            "mix uppercase and lowercase",
        ),
        (
            password.chars().any(|c| SYMBOLS.contains(c) || c == ' '),
            "add special characters",
        ),
        (
            !COMMON.contains(&password.to_lowercase().as_str()),
            "avoid common passwords",
        ),
    ];

    let feedback: Vec<&'static str> = rules
        .iter()
        .filter(|(ok, _)| !ok)
        .map(|(_, hint)| *hint)
        .collect();

    PasswordCheck {
        passed: feedback.is_empty(),
        feedback,
    }
}
