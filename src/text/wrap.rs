use serde::{Deserialize, Serialize};

/// Rule that turns a string into display lines.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapPolicy {
    /// A new line every `n` words.
    Words(usize),
    /// Greedy packing under a measured pixel width.
    Width(f32),
}

/// Break `text` into lines of `words_per_line` whitespace-separated words.
///
/// The last line holds the remainder. `words_per_line == 0` is treated as 1.
pub fn wrap_by_words(text: &str, words_per_line: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(words_per_line.max(1))
        .map(|chunk| chunk.join(" "))
        .collect()
}

/// Greedily pack words onto lines whose measured width stays within `max_width`.
///
/// A word that alone exceeds `max_width` gets a line of its own and is never truncated.
pub fn wrap_by_width(
    text: &str,
    max_width: f32,
    mut measure: impl FnMut(&str) -> f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_owned()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wrap `text` under `policy`, measuring with `measure` when the policy needs it.
pub fn wrap(text: &str, policy: WrapPolicy, measure: impl FnMut(&str) -> f32) -> Vec<String> {
    match policy {
        WrapPolicy::Words(n) => wrap_by_words(text, n),
        WrapPolicy::Width(px) => wrap_by_width(text, px, measure),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
