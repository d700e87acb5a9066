/// Normalize a string for textual comparison: lower-case, fold all dash
/// variants to spaces, drop everything that is not alphanumeric or
/// whitespace, collapse whitespace runs to single spaces, trim.
///
/// Hyphenated and non-hyphenated variants compare equal ("part-time" vs
/// "part time"), as do strings differing only in case, punctuation, or
/// spacing. Idempotent: normalizing an already-normalized string is a
/// no-op.
pub fn normalize(input: &str) -> String {
    let folded: String = input
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '-' | '\u{2010}'..='\u{2015}' => ' ',
            c => c,
        })
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
