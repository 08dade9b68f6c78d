//! Text preprocessing for narration.
//!
//! Card text is authored for the screen: it may carry markdown emphasis,
//! headings, list bullets, links and code fences. Those markers are dropped
//! here so the engine does not read them out. Code inside fences is kept,
//! since a code card is still narrated as written.

/// Turn card text into plain text suitable for a speech engine.
///
/// - Fence lines (```…) → removed, their content kept
/// - Headers (# …), bullets (-, *, +), blockquotes (>) → text only
/// - Bold / italic / strikethrough pairs (**, __, ~~, *) → removed
/// - Inline code backticks → removed
/// - Links \[text\](url) → text only
/// - Runs of whitespace → a single space
///
/// Returns an empty string when nothing speakable is left.
#[must_use]
pub fn to_speakable(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") {
            continue;
        }

        let line = strip_line_prefix(trimmed);
        let line = strip_links(line);
        let line = strip_inline_markers(&line);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(line);
    }

    collapse_whitespace(&out)
}

// ── Internal helpers ───────────────────────────────────────────────

fn strip_line_prefix(line: &str) -> &str {
    let line = line.trim_start_matches('#').trim_start_matches('>').trim_start();
    for bullet in ["- ", "* ", "+ "] {
        if let Some(rest) = line.strip_prefix(bullet) {
            return rest.trim_start();
        }
    }
    line
}

/// `[text](url)` → `text`. Unbalanced brackets are left alone.
fn strip_links(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(open) = rest.find('[') {
        let Some(close_rel) = rest[open..].find("](") else {
            break;
        };
        let close = open + close_rel;
        let Some(end_rel) = rest[close + 2..].find(')') else {
            break;
        };
        let end = close + 2 + end_rel;

        out.push_str(&rest[..open]);
        out.push_str(&rest[open + 1..close]);
        rest = &rest[end + 1..];
    }

    out.push_str(rest);
    out
}

/// Emphasis markers, longest first so `**` is never read as two `*`.
const EMPHASIS_MARKERS: [&str; 4] = ["**", "__", "~~", "*"];

fn strip_inline_markers(line: &str) -> String {
    let mut line = line.replace('`', "");
    for marker in EMPHASIS_MARKERS {
        line = strip_marker_pairs(&line, marker);
    }
    line
}

/// Drop `marker` where it wraps text (`*word*`, `**two words**`).
///
/// A marker that neither opens nor closes emphasis, like the operators in
/// `2 * 3` or `x ** 2`, is kept. So is a `__name__` identifier.
fn strip_marker_pairs(line: &str, marker: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut copied = 0;
    let mut search = 0;

    while let Some(rel) = line[search..].find(marker) {
        let open = search + rel;
        let body = open + marker.len();
        search = body;
        if !opens_emphasis(line, open, marker) {
            continue;
        }
        let Some(close) = find_closing(line, body, marker) else {
            continue;
        };
        if marker == "__" && is_identifier(&line[body..close]) {
            continue;
        }

        out.push_str(&line[copied..open]);
        out.push_str(&line[body..close]);
        copied = close + marker.len();
        search = copied;
    }

    out.push_str(&line[copied..]);
    out
}

fn opens_emphasis(line: &str, at: usize, marker: &str) -> bool {
    let before = line[..at].chars().next_back();
    let after = line[at + marker.len()..].chars().next();
    before.is_none_or(|c| c.is_whitespace() || "([\"'".contains(c))
        && after.is_some_and(|c| !c.is_whitespace() && !marker.starts_with(c))
}

fn closes_emphasis(line: &str, at: usize, marker: &str) -> bool {
    let before = line[..at].chars().next_back();
    let after = line[at + marker.len()..].chars().next();
    before.is_some_and(|c| !c.is_whitespace() && !marker.ends_with(c))
        && after.is_none_or(|c| c.is_whitespace() || ".,;:!?)]\"'".contains(c))
}

fn find_closing(line: &str, from: usize, marker: &str) -> Option<usize> {
    let mut search = from;
    while let Some(rel) = line[search..].find(marker) {
        let at = search + rel;
        if closes_emphasis(line, at, marker) {
            return Some(at);
        }
        search = at + 1;
    }
    None
}

fn is_identifier(text: &str) -> bool {
    text.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
