//! Transcript and translation cleanup.

/// Normalize service output for the manifest: collapse whitespace runs and
/// re-attach punctuation that recognition engines tend to float.
pub fn normalize(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut cleaned = String::with_capacity(collapsed.len());
    let mut chars = collapsed.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ' '
            && let Some(&next) = chars.peek()
            && matches!(next, '.' | ',' | '?' | '!' | ';' | ':')
        {
            continue;
        }
        cleaned.push(c);
    }
    cleaned
}
