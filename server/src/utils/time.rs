//! Time utility functions

use chrono::Utc;

/// Current time as an RFC 3339 string with millisecond precision (UTC)
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_now_iso_is_rfc3339() {
        let iso = now_iso();
        assert!(DateTime::parse_from_rfc3339(&iso).is_ok(), "got: {}", iso);
    }

    #[test]
    fn test_now_iso_uses_utc_suffix() {
        let iso = now_iso();
        assert!(
            iso.ends_with('Z'),
            "Should use Z suffix for UTC, got: {}",
            iso
        );
    }
}
