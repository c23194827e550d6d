//! Parsing of `esp-rainmaker-cli getnodes` output
//!
//! The CLI prints status banners mixed with a numbered list:
//!
//! ```text
//! Initialising ESP RainMaker CLI...
//! 1. 7CDFA1B2C3D4E5F6
//! 2. 0A1B2C3D4E5F6789
//! Success
//! ```
//!
//! Banner filtering works by exclusion, so unfamiliar banner text that
//! happens to look like a numbered entry will be taken for a node.

/// Substrings that mark a line as CLI status output
const BANNER_MARKERS: &[&str] = &["Initialising", "Success", "Error", "Failed"];

/// Prefixes that mark a line as CLI status output
const BANNER_PREFIXES: &[&str] = &["ESP", "Note"];

/// Separator between the list number and the node ID
const ENTRY_SEPARATOR: &str = ". ";

/// Node IDs must be strictly longer than this
const MIN_NODE_ID_LEN: usize = 10;

/// Classification of a single line of `getnodes` output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Empty line
    Blank,
    /// Status or banner text
    Banner,
    /// Numbered entry carrying a plausible node ID
    Entry(&'a str),
    /// Anything else (unnumbered text, implausible IDs)
    Noise,
}

/// Classify one line of `getnodes` output
#[must_use]
pub fn classify_line(line: &str) -> Line<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Line::Blank;
    }

    if BANNER_MARKERS.iter().any(|m| line.contains(m))
        || BANNER_PREFIXES.iter().any(|p| line.starts_with(p))
    {
        return Line::Banner;
    }

    match line.split_once(ENTRY_SEPARATOR) {
        Some((_, candidate)) => {
            let candidate = candidate.trim();
            if is_plausible_node_id(candidate) {
                Line::Entry(candidate)
            } else {
                Line::Noise
            }
        }
        None => Line::Noise,
    }
}

/// Whether a token looks like a RainMaker node ID
///
/// Longer than ten characters, made only of ASCII letters, digits, `-`, `_`.
#[must_use]
pub fn is_plausible_node_id(candidate: &str) -> bool {
    candidate.len() > MIN_NODE_ID_LEN
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Extract node IDs from `getnodes` output, in source order
#[must_use]
pub fn parse_node_list(raw: &str) -> Vec<String> {
    raw.lines()
        .filter_map(|line| match classify_line(line) {
            Line::Entry(id) => Some(id.to_string()),
            Line::Blank | Line::Banner | Line::Noise => None,
        })
        .collect()
}
