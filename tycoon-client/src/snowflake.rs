//! Discord snowflake detection
//!
//! User-scoped endpoints accept either a native Tycoon user id or a Discord
//! snowflake. Snowflakes are 17- or 18-digit decimal strings; anything else is
//! treated as a native id and passed through untouched. The actual lookup
//! lives on the client, which translates a detected snowflake through the
//! `/snowflake2user` endpoint before building the request path.

/// Whether an identifier has the shape of a Discord snowflake.
///
/// Native Tycoon user ids are short integers, so a 17- or 18-digit string is
/// unambiguous.
pub fn is_snowflake(id: &str) -> bool {
    matches!(id.len(), 17 | 18) && id.bytes().all(|byte| byte.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_lengths() {
        assert!(is_snowflake("12345678901234567")); // 17 digits
        assert!(is_snowflake("123456789012345678")); // 18 digits
    }

    #[test]
    fn test_native_ids_pass_through() {
        assert!(!is_snowflake("42"));
        assert!(!is_snowflake("1234567890123456")); // 16 digits
        assert!(!is_snowflake("1234567890123456789")); // 19 digits
    }

    #[test]
    fn test_non_digits_rejected() {
        assert!(!is_snowflake("12345678901234567x"));
        assert!(!is_snowflake("1234567890１234567")); // fullwidth digit
        assert!(!is_snowflake(""));
    }
}
