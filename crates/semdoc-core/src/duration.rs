//! Duration literal normalization
//!
//! Remote systems echo durations in a longer spelling than they were
//! submitted in (`5m` comes back as `5m0s`). This module rewrites every
//! duration literal to its minimal form so both spellings compare equal.
//!
//! # Grammar
//!
//! ```text
//! literal := [digits "h"] [digits "m"] [digits "s"]    (at least one part)
//! ```
//!
//! A literal is only recognised when it is not glued to surrounding word
//! characters, so `100ms`, `v1s` and `1.5h` pass through untouched.
//!
//! # Canonical spelling
//!
//! The total is decomposed into hours, minutes and seconds, zero parts are
//! dropped, and an all-zero duration is spelled `0s`:
//! `5m0s → 5m`, `1h0m0s → 1h`, `90m → 1h30m`, `0h0m0s → 0s`.

use crate::document::{Document, Scalar};

/// Largest duration representable as signed 64-bit nanoseconds, in seconds
pub const MAX_DURATION_SECS: u64 = (i64::MAX as u64) / 1_000_000_000;

const UNITS: [(u8, u64); 3] = [(b'h', 3600), (b'm', 60), (b's', 1)];

// ── Public API ─────────────────────────────────────────────

/// Rewrite every duration literal in `text` to its minimal spelling
///
/// Never fails: substrings that do not parse as a duration are copied
/// verbatim.
pub fn normalize_durations(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() || (i > 0 && is_word_byte(bytes[i - 1])) {
            i += 1;
            continue;
        }
        match match_literal(bytes, i) {
            Some(end) => {
                let literal = &text[i..end];
                if let Some(rewritten) = rewrite_literal(literal) {
                    out.push_str(&text[copied..i]);
                    out.push_str(&rewritten);
                    copied = end;
                }
                i = end;
            }
            None => i += 1,
        }
    }

    if copied == 0 {
        return text.to_string();
    }
    out.push_str(&text[copied..]);
    out
}

/// Apply [`normalize_durations`] to every string leaf of a tree
///
/// Keys are left alone; only scalar string values are rewritten.
pub fn normalize_duration_leaves(doc: &mut Document) {
    match doc {
        Document::Scalar(Scalar::String(s)) => {
            let rewritten = normalize_durations(s);
            if rewritten != *s {
                tracing::trace!(original = %s, rewritten = %rewritten, "normalized duration");
                *s = rewritten;
            }
        }
        Document::Scalar(_) => {}
        Document::Sequence(items) => {
            for item in items {
                normalize_duration_leaves(item);
            }
        }
        Document::Mapping(m) => {
            for (_, value) in m.iter_mut() {
                normalize_duration_leaves(value);
            }
        }
    }
}

/// Parse a complete duration literal into whole seconds
///
/// Returns `None` when `literal` does not match the grammar exactly, or the
/// total overflows [`MAX_DURATION_SECS`].
pub fn parse_duration(literal: &str) -> Option<u64> {
    let bytes = literal.as_bytes();
    let mut pos = 0;
    let mut total: u64 = 0;
    let mut matched = false;

    for (unit, scale) in UNITS {
        let digits_end = scan_digits(bytes, pos);
        if digits_end == pos || bytes.get(digits_end) != Some(&unit) {
            continue;
        }
        let magnitude: u64 = literal[pos..digits_end].parse().ok()?;
        total = magnitude
            .checked_mul(scale)
            .and_then(|part| total.checked_add(part))?;
        pos = digits_end + 1;
        matched = true;
    }

    if !matched || pos != bytes.len() || total > MAX_DURATION_SECS {
        return None;
    }
    Some(total)
}

/// Spell a number of seconds in minimal `XhYmZs` form
pub fn format_duration(total_secs: u64) -> String {
    if total_secs == 0 {
        return "0s".to_string();
    }
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    let mut out = String::new();
    for (value, unit) in [(hours, 'h'), (minutes, 'm'), (seconds, 's')] {
        if value > 0 {
            out.push_str(&value.to_string());
            out.push(unit);
        }
    }
    out
}

// ── Scanner ────────────────────────────────────────────────

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'.'
}

fn scan_digits(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    end
}

/// Longest grammar match starting at `start`, ending on a word boundary
fn match_literal(bytes: &[u8], start: usize) -> Option<usize> {
    let mut pos = start;
    for (unit, _) in UNITS {
        let digits_end = scan_digits(bytes, pos);
        if digits_end > pos && bytes.get(digits_end) == Some(&unit) {
            pos = digits_end + 1;
        }
    }
    if pos == start {
        return None;
    }
    match bytes.get(pos) {
        Some(&b) if is_word_byte(b) => None,
        _ => Some(pos),
    }
}

/// Minimal spelling of `literal`, or `None` to keep the original text
fn rewrite_literal(literal: &str) -> Option<String> {
    let total = parse_duration(literal)?;
    let rewritten = format_duration(total);
    if rewritten == literal {
        return None;
    }
    // never substitute something that does not read back as the same duration
    match parse_duration(&rewritten) {
        Some(check) if check == total => Some(rewritten),
        _ => None,
    }
}
