//! Log sanitization utilities
//!
//! Route 53 XML bodies, canonical requests and error payloads can be large; debug and error
//! logs only ever see a bounded prefix of them.

/// Maximum number of bytes of a body kept in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Largest char boundary at or below `index`.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    (0..=index).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

/// Truncate a string for safe logging.
///
/// Strings within the limit are returned as-is; longer ones keep their first
/// `TRUNCATE_LIMIT` bytes (rounded down to a char boundary) plus a length marker.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}
