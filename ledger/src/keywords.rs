use std::collections::BTreeSet;

/// Characters treated as token separators in notes, besides whitespace.
const SEPARATORS: &[char] = &[',', '.', ';', ':', '/', '-', '_'];

/// Tokens shorter than this are noise ("il", "di", "a") and are dropped.
const MIN_TOKEN_CHARS: usize = 3;

/// Mine a sorted, deduplicated keyword set from free-text notes.
///
/// Notes are split on whitespace and punctuation, case-folded, and tokens
/// of fewer than three characters are discarded. The result drives the
/// keyword facet of work-entry queries.
pub fn extract_keywords<'a, I>(notes: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut tokens = BTreeSet::new();
    for note in notes {
        for raw in note.split(|c: char| c.is_whitespace() || SEPARATORS.contains(&c)) {
            let token = raw.trim().to_lowercase();
            if token.chars().count() >= MIN_TOKEN_CHARS {
                tokens.insert(token);
            }
        }
    }
    tokens.into_iter().collect()
}
