//! Phone number normalization.
//!
//! Numbers are assumed to be Indian unless they already carry a `+` country
//! code. Inner spaces and dashes are not touched.
//!
//! CHANGELOG:
//! - 10/12/2026 - Initial implementation

/// Default country calling code for bare 10-character numbers.
pub const DEFAULT_COUNTRY_CODE: &str = "91";

/// Normalize a raw phone string into its dialable form.
///
/// Rules, first match wins:
/// 1. `+...` is returned as-is (after trimming)
/// 2. `91...` gets a `+` prefix
/// 3. exactly 10 characters gets `+91`
/// 4. anything else is returned trimmed but otherwise unchanged
pub fn normalize(raw: &str) -> String {
    let phone = raw.trim();

    if phone.starts_with('+') {
        return phone.to_string();
    }

    if phone.starts_with(DEFAULT_COUNTRY_CODE) {
        return format!("+{}", phone);
    }

    if phone.chars().count() == 10 {
        return format!("+{}{}", DEFAULT_COUNTRY_CODE, phone);
    }

    phone.to_string()
}

/// Whether a (normalized) number carries an explicit country code.
pub fn has_country_code(phone: &str) -> bool {
    phone.starts_with('+')
}
