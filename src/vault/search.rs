//! Fuzzy partial matching of search queries against service names.
//!
//! Scores are on a 0–100 scale.  [`partial_ratio`] slides the shorter string
//! across the longer one and keeps the best [`ratio`] of any equal-length
//! window, so a query that appears inside a name scores 100.

/// Similarity of two strings: `200 * LCS / (len_a + len_b)`.
///
/// Two empty strings are identical (100).
pub fn ratio(a: &[char], b: &[char]) -> u8 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100;
    }
    let common = lcs_len(a, b);
    // `common <= min(len)`, so the result is within 0..=100.
    u8::try_from((200 * common + total / 2) / total).unwrap_or(100)
}

/// Best [`ratio`] between the shorter string and any same-length window of
/// the longer one.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    if short.is_empty() {
        return if long.is_empty() { 100 } else { 0 };
    }

    long.windows(short.len())
        .map(|window| ratio(&short, window))
        .max()
        .unwrap_or(0)
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
