//! Path segment matching logic.
//!
//! # Responsibilities
//! - Recognise the entity identifier shape used by `/manage/<id>`
//! - Split a path into a fixed prefix and its trailing parameter
//!
//! # Design Decisions
//! - Identifier shape is strict: 8-4-4-4-12 lowercase hex groups
//! - Uppercase hex, braces and the 32-char simple form are rejected
//! - No regex to guarantee O(n) matching

/// Length of a hyphenated identifier segment.
pub const IDENTIFIER_LEN: usize = 36;

const HYPHEN_POSITIONS: [usize; 4] = [8, 13, 18, 23];

/// Returns true if `segment` is a lowercase hyphenated identifier.
pub fn is_identifier(segment: &str) -> bool {
    if segment.len() != IDENTIFIER_LEN {
        return false;
    }

    segment.bytes().enumerate().all(|(i, b)| {
        if HYPHEN_POSITIONS.contains(&i) {
            b == b'-'
        } else {
            b.is_ascii_digit() || (b'a'..=b'f').contains(&b)
        }
    })
}

/// Returns the remainder of `path` after `prefix` if it is a single identifier segment.
pub fn identifier_after<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    path.strip_prefix(prefix).filter(|rest| is_identifier(rest))
}
