//! Shared helper types used across the analyzers

pub mod location;

pub use location::{Location, Segment};

/// Render a raw JSON value the way error messages quote it: strings as-is, everything else as JSON.
pub fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Truncate a message to `max_len` bytes on a char boundary, appending a marker when cut.
pub fn truncate_message(message: &str, max_len: usize) -> String {
    if message.len() <= max_len {
        return message.to_string();
    }
    const MARKER: &str = "... [truncated]";
    let mut cut = max_len.saturating_sub(MARKER.len());
    while cut > 0 && !message.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}{}", &message[..cut], MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("abc")), "abc");
        assert_eq!(display_value(&json!(-10)), "-10");
        assert_eq!(display_value(&json!(1.5)), "1.5");
        assert_eq!(display_value(&json!([1, "a"])), "[1,\"a\"]");
    }

    #[test]
    fn test_truncate_message() {
        assert_eq!(truncate_message("short", 100), "short");
        let long = "x".repeat(200);
        let truncated = truncate_message(&long, 50);
        assert!(truncated.len() <= 50);
        assert!(truncated.ends_with("[truncated]"));
    }
}
