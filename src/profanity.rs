//! Profanity filter for chirp bodies.

/// Words replaced before a chirp is stored, matched case-insensitively.
const BANNED_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

const REPLACEMENT: &str = "****";

/// Replace banned words in `body`.
///
/// Words are split on single spaces, so spacing is preserved exactly and a
/// banned word with punctuation attached (`"fornax!"`) is left alone.
pub fn clean_body(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            let lower = word.to_lowercase();
            if BANNED_WORDS.contains(&lower.as_str()) {
                REPLACEMENT
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
