//! Attendance code format
//!
//! A code is exactly four ASCII decimal digits; allocated values live in
//! "1000" to "9999". The code is the member's only check-in credential:
//! there is no checksum and no cryptographic binding to the member, so
//! anyone holding a code can mark that member present. Known limitation,
//! accepted for a hall-door check-in flow run by trusted operators.

/// Lowest code ever allocated
pub const CODE_MIN: u32 = 1000;
/// Highest allocatable code
pub const CODE_MAX: u32 = 9999;

/// Validate a raw scan/typed string as an attendance code
///
/// Trims surrounding whitespace and accepts iff exactly four decimal digits
/// remain. Returns the canonical code string.
pub fn validate(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.len() == 4 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        Some(trimmed)
    } else {
        None
    }
}

/// Whether a 4-digit string falls in the allocatable range
///
/// Codes are handed out starting at 1000, so leading-zero strings like
/// "0042" pass [`validate`] but never denote a member.
pub fn in_range(code: &str) -> bool {
    code.parse::<u32>()
        .map(|n| (CODE_MIN..=CODE_MAX).contains(&n))
        .unwrap_or(false)
}

/// Render a numeric code as its canonical 4-digit string
pub fn format_code(n: u32) -> String {
    format!("{n:04}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exactly_four_digits() {
        assert_eq!(validate("1042"), Some("1042"));
        assert_eq!(validate("  9921  "), Some("9921"));
        assert_eq!(validate("0042"), Some("0042"));
    }

    #[test]
    fn rejects_everything_else() {
        assert_eq!(validate("99"), None);
        assert_eq!(validate("99215"), None);
        assert_eq!(validate("1o42"), None);
        assert_eq!(validate("10 42"), None);
        assert_eq!(validate(""), None);
        assert_eq!(validate("١٠٤٢"), None); // non-ASCII digits
        assert_eq!(validate("-142"), None);
    }

    #[test]
    fn range_check_excludes_leading_zero_codes() {
        assert!(in_range("1000"));
        assert!(in_range("9999"));
        assert!(!in_range("0999"));
        assert!(!in_range("0042"));
    }

    #[test]
    fn formatting_is_zero_padded() {
        assert_eq!(format_code(1000), "1000");
        assert_eq!(format_code(9999), "9999");
    }
}
