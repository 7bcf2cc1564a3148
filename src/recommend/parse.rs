//! Splitting free-form recommendation text into entries

/// Line prefixes that mark a separate recommendation
pub const BULLET_MARKERS: [char; 3] = ['•', '-', '*'];

/// Split service text into recommendation entries
///
/// Lines whose trimmed content starts with a bullet marker become entries
/// (kept exactly as written). If no line qualifies, the whole text is a
/// single entry.
pub fn split_recommendations(text: &str) -> Vec<String> {
    let bullets: Vec<String> = text
        .split('\n')
        .filter(|line| line.trim().starts_with(&BULLET_MARKERS[..]))
        .map(str::to_string)
        .collect();

    if bullets.is_empty() {
        vec![text.to_string()]
    } else {
        bullets
    }
}
