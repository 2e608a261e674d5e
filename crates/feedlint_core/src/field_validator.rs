//! Semantic validators for string-typed GTFS fields: identifiers, URLs,
//! emails, phone numbers, language codes, timezones, currency codes and
//! the mixed-case style check. Each check appends notices to the
//! container and never aborts the row.

use std::str::FromStr;

use url::Url;

use crate::notice::{NoticeContainer, NoticeSeverity, ValidationNotice};
use crate::options::CountryCode;

/// ISO 4217 alphabetic currency codes.
const CURRENCY_CODES: &[&str] = &[
    "AED", "AFN", "ALL", "AMD", "ANG", "AOA", "ARS", "AUD", "AWG", "AZN", "BAM", "BBD", "BDT",
    "BGN", "BHD", "BIF", "BMD", "BND", "BOB", "BOV", "BRL", "BSD", "BTN", "BWP", "BYN", "BZD",
    "CAD", "CDF", "CHE", "CHF", "CHW", "CLF", "CLP", "CNY", "COP", "COU", "CRC", "CUC", "CUP",
    "CVE", "CZK", "DJF", "DKK", "DOP", "DZD", "EGP", "ERN", "ETB", "EUR", "FJD", "FKP", "GBP",
    "GEL", "GHS", "GIP", "GMD", "GNF", "GTQ", "GYD", "HKD", "HNL", "HRK", "HTG", "HUF", "IDR",
    "ILS", "INR", "IQD", "IRR", "ISK", "JMD", "JOD", "JPY", "KES", "KGS", "KHR", "KMF", "KPW",
    "KRW", "KWD", "KYD", "KZT", "LAK", "LBP", "LKR", "LRD", "LSL", "LYD", "MAD", "MDL", "MGA",
    "MKD", "MMK", "MNT", "MOP", "MRO", "MUR", "MVR", "MWK", "MXN", "MXV", "MYR", "MZN", "NAD",
    "NGN", "NIO", "NOK", "NPR", "NZD", "OMR", "PAB", "PEN", "PGK", "PHP", "PKR", "PLN", "PYG",
    "QAR", "RON", "RSD", "RUB", "RWF", "SAR", "SBD", "SCR", "SDG", "SEK", "SGD", "SHP", "SLL",
    "SOS", "SRD", "SSP", "STD", "SVC", "SYP", "SZL", "THB", "TJS", "TMT", "TND", "TOP", "TRY",
    "TTD", "TWD", "TZS", "UAH", "UGX", "USD", "USN", "UYI", "UYU", "UZS", "VEF", "VND", "VUV",
    "WST", "XAF", "XAG", "XAU", "XBA", "XBB", "XBC", "XBD", "XCD", "XDR", "XOF", "XPD", "XPF",
    "XPT", "XSU", "XTS", "XUA", "XXX", "YER", "ZAR", "ZMW", "ZWL",
];

const CURRENCY_ZERO_DECIMALS: &[&str] = &[
    "ADP", "AFN", "ALL", "BIF", "BYR", "CLP", "DJF", "ESP", "GNF", "IQD", "IRR", "ISK", "ITL",
    "JPY", "KMF", "KPW", "KRW", "LAK", "LBP", "LUF", "MGA", "MGF", "MMK", "MRO", "PYG", "RSD",
    "RWF", "SLL", "SOS", "STD", "SYP", "TMM", "TRL", "UGX", "UYI", "VND", "VUV", "XAF", "XOF",
    "XPF", "YER", "ZMK", "ZWD",
];

const CURRENCY_THREE_DECIMALS: &[&str] = &["BHD", "JOD", "KWD", "LYD", "OMR", "TND"];

const CURRENCY_FOUR_DECIMALS: &[&str] = &["CLF", "UYW"];

/// The `(file, 1-based row, column name)` triple carried on every notice.
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    pub file_name: &'a str,
    pub row_number: u64,
    pub field_name: &'a str,
}

impl<'a> CellContext<'a> {
    pub fn new(file_name: &'a str, row_number: u64, field_name: &'a str) -> Self {
        Self {
            file_name,
            row_number,
            field_name,
        }
    }

    fn notice(
        &self,
        code: &str,
        severity: NoticeSeverity,
        message: &str,
        value: &str,
    ) -> ValidationNotice {
        ValidationNotice::new(code, severity, message)
            .with_location(self.file_name, self.row_number, self.field_name)
            .with_context_field("fieldValue", value)
    }
}

/// Pure per-cell validators, configured once per run.
#[derive(Debug, Clone, Default)]
pub struct FieldValidator {
    country_code: CountryCode,
}

impl FieldValidator {
    pub fn new(country_code: CountryCode) -> Self {
        Self { country_code }
    }

    /// Baseline check applied to every non-empty cell: flags surrounding
    /// whitespace, embedded line breaks and replacement characters, then
    /// hands back the trimmed value.
    pub fn validate_field(
        &self,
        value: &str,
        context: CellContext<'_>,
        notices: &mut NoticeContainer,
    ) -> String {
        if value.contains('\n') || value.contains('\r') {
            notices.push(context.notice(
                "new_line_in_value",
                NoticeSeverity::Error,
                "value contains new line",
                value,
            ));
        }
        if value != value.trim() {
            notices.push(context.notice(
                "leading_or_trailing_whitespaces",
                NoticeSeverity::Warning,
                "value has leading or trailing whitespace",
                value,
            ));
        }
        if value.chars().any(|ch| ch == '\u{FFFD}') {
            notices.push(context.notice(
                "invalid_character",
                NoticeSeverity::Error,
                "value contains a replacement character",
                value,
            ));
        }
        value.trim().to_string()
    }

    /// Identifiers must be non-empty printable ASCII without embedded
    /// whitespace.
    pub fn validate_id(
        &self,
        value: &str,
        context: CellContext<'_>,
        notices: &mut NoticeContainer,
    ) -> bool {
        if value
            .chars()
            .any(|ch| !ch.is_ascii() || ch.is_ascii_control())
        {
            notices.push(context.notice(
                "non_ascii_or_non_printable_char",
                NoticeSeverity::Warning,
                "id contains non-ascii or non-printable characters",
                value,
            ));
        }
        if value.contains(char::is_whitespace) {
            notices.push(context.notice(
                "invalid_identifier",
                NoticeSeverity::Error,
                "id contains whitespace",
                value,
            ));
            return false;
        }
        true
    }

    /// URLs need both a scheme and an authority.
    pub fn validate_url(
        &self,
        value: &str,
        context: CellContext<'_>,
        notices: &mut NoticeContainer,
    ) -> bool {
        let valid = Url::parse(value)
            .map(|url| url.has_authority())
            .unwrap_or(false);
        if !valid {
            notices.push(context.notice(
                "invalid_url",
                NoticeSeverity::Error,
                "field contains invalid url",
                value,
            ));
        }
        valid
    }

    pub fn validate_email(
        &self,
        value: &str,
        context: CellContext<'_>,
        notices: &mut NoticeContainer,
    ) -> bool {
        if !is_valid_email(value) {
            notices.push(context.notice(
                "invalid_email",
                NoticeSeverity::Error,
                "field contains invalid email",
                value,
            ));
            return false;
        }
        true
    }

    /// With an unknown country code only `+`-prefixed (E.164-style)
    /// numbers are accepted.
    pub fn validate_phone_number(
        &self,
        value: &str,
        context: CellContext<'_>,
        notices: &mut NoticeContainer,
    ) -> bool {
        let valid = if self.country_code.is_unknown() {
            value.starts_with('+') && has_phone_shape(value)
        } else {
            has_phone_shape(value)
        };
        if !valid {
            notices.push(context.notice(
                "invalid_phone_number",
                NoticeSeverity::Error,
                "field contains invalid phone number",
                value,
            ));
        }
        valid
    }

    /// BCP 47 syntax: a 2-3 letter primary subtag plus 2-8 character
    /// alphanumeric subtags.
    pub fn validate_language_code(
        &self,
        value: &str,
        context: CellContext<'_>,
        notices: &mut NoticeContainer,
    ) -> bool {
        if !is_valid_language_code(value) {
            notices.push(context.notice(
                "invalid_language_code",
                NoticeSeverity::Error,
                "field contains invalid language code",
                value,
            ));
            return false;
        }
        true
    }

    pub fn validate_timezone(
        &self,
        value: &str,
        context: CellContext<'_>,
        notices: &mut NoticeContainer,
    ) -> bool {
        if chrono_tz::Tz::from_str(value).is_err() {
            notices.push(context.notice(
                "invalid_timezone",
                NoticeSeverity::Error,
                "field cannot be parsed as timezone",
                value,
            ));
            return false;
        }
        true
    }

    pub fn validate_currency_code(
        &self,
        value: &str,
        context: CellContext<'_>,
        notices: &mut NoticeContainer,
    ) -> bool {
        if !CURRENCY_CODES.contains(&value) {
            notices.push(context.notice(
                "invalid_currency",
                NoticeSeverity::Error,
                "field contains invalid currency code",
                value,
            ));
            return false;
        }
        true
    }

    /// Style check for columns expected to carry customer-facing mixed
    /// case text.
    pub fn validate_mixed_case(
        &self,
        value: &str,
        context: CellContext<'_>,
        notices: &mut NoticeContainer,
    ) {
        if is_mixed_case_violation(value) {
            notices.push(context.notice(
                "mixed_case_recommended_field",
                NoticeSeverity::Warning,
                "field should use mixed case",
                value,
            ));
        }
    }
}

/// Fraction digits mandated by ISO 4217, for currency-amount checks.
pub fn currency_fraction_digits(code: &str) -> Option<u32> {
    if !CURRENCY_CODES.contains(&code) {
        return None;
    }
    if CURRENCY_ZERO_DECIMALS.contains(&code) {
        return Some(0);
    }
    if CURRENCY_THREE_DECIMALS.contains(&code) {
        return Some(3);
    }
    if CURRENCY_FOUR_DECIMALS.contains(&code) {
        return Some(4);
    }
    Some(2)
}

fn is_valid_email(value: &str) -> bool {
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if local.contains(char::is_whitespace) || domain.contains(char::is_whitespace) {
        return false;
    }
    if domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }
    domain.contains('.')
}

fn has_phone_shape(value: &str) -> bool {
    let mut digits = 0;
    for ch in value.chars() {
        if ch.is_ascii_digit() {
            digits += 1;
            continue;
        }
        match ch {
            '+' | '-' | '(' | ')' | '.' | ' ' => {}
            _ => return false,
        }
    }
    digits >= 2
}

fn is_valid_language_code(value: &str) -> bool {
    let mut parts = value.split('-');
    let Some(primary) = parts.next() else {
        return false;
    };
    if !(2..=3).contains(&primary.len()) {
        return false;
    }
    if !primary.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return false;
    }
    for part in parts {
        if !(2..=8).contains(&part.len()) {
            return false;
        }
        if !part.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return false;
        }
    }
    true
}

/// All-lowercase or all-uppercase Latin text in a mixed-case column.
fn is_mixed_case_violation(value: &str) -> bool {
    let tokens: Vec<&str> = value
        .split(|ch: char| !ch.is_alphabetic())
        .filter(|token| !token.is_empty())
        .collect();
    if tokens.is_empty() {
        return false;
    }

    if tokens.len() == 1 {
        let token = tokens[0];
        if token.len() <= 1 || token.chars().any(|ch| ch.is_ascii_digit()) {
            return false;
        }
        return token.chars().all(|ch| ch.is_lowercase())
            || token.chars().all(|ch| ch.is_uppercase());
    }

    let mut has_mixed_case = false;
    let mut counted_tokens = 0;
    for token in tokens {
        if token.len() == 1 || token.chars().any(|ch| ch.is_ascii_digit()) {
            continue;
        }
        counted_tokens += 1;
        let has_upper = token.chars().any(|ch| ch.is_uppercase());
        let has_lower = token.chars().any(|ch| ch.is_lowercase());
        if has_upper && has_lower {
            has_mixed_case = true;
        }
    }

    counted_tokens >= 2 && !has_mixed_case
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> CellContext<'static> {
        CellContext::new("stops.txt", 2, "stop_name")
    }

    #[test]
    fn flags_surrounding_whitespace_and_returns_trimmed() {
        let validator = FieldValidator::default();
        let mut notices = NoticeContainer::new();
        let trimmed = validator.validate_field(" Main St ", context(), &mut notices);

        assert_eq!(trimmed, "Main St");
        assert_eq!(notices.len(), 1);
        assert_eq!(
            notices.iter().next().unwrap().code,
            "leading_or_trailing_whitespaces"
        );
    }

    #[test]
    fn id_with_inner_whitespace_is_an_error() {
        let validator = FieldValidator::default();
        let mut notices = NoticeContainer::new();
        assert!(!validator.validate_id("S 1", context(), &mut notices));
        assert_eq!(notices.iter().next().unwrap().code, "invalid_identifier");
    }

    #[test]
    fn url_requires_scheme_and_authority() {
        let validator = FieldValidator::default();
        let mut notices = NoticeContainer::new();
        assert!(validator.validate_url("https://example.com", context(), &mut notices));
        assert!(!validator.validate_url("example.com", context(), &mut notices));
        assert!(!validator.validate_url("mailto:x@example.com", context(), &mut notices));
        assert_eq!(notices.len(), 2);
    }

    #[test]
    fn email_needs_local_and_dotted_domain() {
        let validator = FieldValidator::default();
        let mut notices = NoticeContainer::new();
        assert!(validator.validate_email("info@example.com", context(), &mut notices));
        assert!(!validator.validate_email("info@example", context(), &mut notices));
        assert!(!validator.validate_email("example.com", context(), &mut notices));
    }

    #[test]
    fn unknown_country_accepts_only_plus_prefixed_numbers() {
        let validator = FieldValidator::new(CountryCode::Unknown);
        let mut notices = NoticeContainer::new();
        assert!(validator.validate_phone_number("+31 20 123 4567", context(), &mut notices));
        assert!(!validator.validate_phone_number("020 123 4567", context(), &mut notices));

        let validator = FieldValidator::new(CountryCode::parse("NL"));
        assert!(validator.validate_phone_number("020 123 4567", context(), &mut notices));
    }

    #[test]
    fn timezone_uses_iana_names() {
        let validator = FieldValidator::default();
        let mut notices = NoticeContainer::new();
        assert!(validator.validate_timezone("Europe/Amsterdam", context(), &mut notices));
        assert!(!validator.validate_timezone("Mars/Olympus", context(), &mut notices));
    }

    #[test]
    fn mixed_case_flags_shouting_text() {
        let validator = FieldValidator::default();
        let mut notices = NoticeContainer::new();
        validator.validate_mixed_case("CENTRAL STATION", context(), &mut notices);
        assert_eq!(notices.len(), 1);
        assert_eq!(
            notices.iter().next().unwrap().code,
            "mixed_case_recommended_field"
        );

        let mut clean = NoticeContainer::new();
        validator.validate_mixed_case("Central Station", context(), &mut clean);
        assert!(clean.is_empty());
    }

    #[test]
    fn currency_fraction_digits_follow_iso_4217() {
        assert_eq!(currency_fraction_digits("EUR"), Some(2));
        assert_eq!(currency_fraction_digits("JPY"), Some(0));
        assert_eq!(currency_fraction_digits("BHD"), Some(3));
        assert_eq!(currency_fraction_digits("NOPE"), None);
    }
}
