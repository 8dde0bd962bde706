// src/services/phone.rs
// DOCUMENTATION: Egyptian phone number validation and formatting
// PURPOSE: Shared by signup, contact and profile forms

use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;
use std::sync::OnceLock;
use validator::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneKind {
    /// 01[0125] + 8 digits
    Mobile,
    /// 0 + area code + subscriber number
    Landline,
    /// +20 / 0020 followed by a mobile number without its leading 0
    InternationalMobile,
}

struct Patterns {
    mobile: Regex,
    landline: Regex,
    international: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        mobile: Regex::new(r"^01[0125][0-9]{8}$").expect("static mobile pattern"),
        // Cairo (02) and Alexandria (03) use 8-digit numbers, other codes 7
        landline: Regex::new(r"^0(?:[23][0-9]{8}|(?:1[3-9]|[4-9][0-9])[0-9]{7})$")
            .expect("static landline pattern"),
        international: Regex::new(r"^(?:\+|00)201[0125][0-9]{8}$")
            .expect("static international pattern"),
    })
}

/// Arabic-Indic (U+0660..) and Eastern Arabic-Indic (U+06F0..) digits as ASCII
fn ascii_digit(c: char) -> char {
    match c {
        '\u{660}'..='\u{669}' => char::from(b'0' + (c as u32 - 0x660) as u8),
        '\u{6f0}'..='\u{6f9}' => char::from(b'0' + (c as u32 - 0x6f0) as u8),
        _ => c,
    }
}

/// Drop the separators people type inside numbers and fold Arabic digits to ASCII
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.' | '\u{a0}'))
        .map(ascii_digit)
        .collect()
}

pub fn classify_phone(raw: &str) -> Option<PhoneKind> {
    let number = normalize_phone(raw);
    let p = patterns();

    if p.mobile.is_match(&number) {
        Some(PhoneKind::Mobile)
    } else if p.international.is_match(&number) {
        Some(PhoneKind::InternationalMobile)
    } else if p.landline.is_match(&number) {
        Some(PhoneKind::Landline)
    } else {
        None
    }
}

pub fn is_valid_phone(raw: &str) -> bool {
    classify_phone(raw).is_some()
}

/// Human-readable grouping of a valid number
/// DOCUMENTATION: mobile "01012345678" → "010 123 45678";
/// international → "+20 101 234 5678"; landline "0212345678" → "02 1234 5678"
pub fn format_phone(raw: &str) -> Option<String> {
    let number = normalize_phone(raw);
    match classify_phone(&number)? {
        PhoneKind::Mobile => Some(format!("{} {} {}", &number[..3], &number[3..6], &number[6..])),
        PhoneKind::InternationalMobile => {
            let national = number.trim_start_matches('+').trim_start_matches("00");
            let local = &national[2..];
            Some(format!("+20 {} {} {}", &local[..3], &local[3..6], &local[6..]))
        }
        PhoneKind::Landline => {
            if number.len() == 10 && matches!(&number[..2], "02" | "03") {
                Some(format!("{} {} {}", &number[..2], &number[2..6], &number[6..]))
            } else {
                Some(format!("{} {} {}", &number[..3], &number[3..6], &number[6..]))
            }
        }
    }
}

/// `validator` custom rule
pub fn validate_phone_field(value: &str) -> Result<(), ValidationError> {
    if is_valid_phone(value) {
        Ok(())
    } else {
        let mut error = ValidationError::new("phone");
        error.message = Some(Cow::Borrowed("Enter a valid Egyptian phone number"));
        Err(error)
    }
}
