//! Query classification
//!
//! Turns a free-text request into exactly one [`QueryIntent`]. Rules are
//! applied in a fixed order, so a long digit run is always a phone number and
//! a digits + letters pair is always a plate, never a name.

use serde::{Deserialize, Serialize};

/// Minimum digit count for a single token to be treated as a phone number.
pub const PHONE_MIN_DIGITS: usize = 7;

/// The classified shape of a search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryIntent {
    /// Plate number with its letter code, e.g. `123456 B`.
    PlateExact { number: String, suffix: String },
    /// Digits of a phone number, separators removed.
    PhoneDigits(String),
    /// Date of birth exactly as typed.
    DateOfBirth(String),
    /// Plate number without a letter code.
    PlateNumberOnly(String),
    /// Vehicle make/model substring, or a single name matched phonetically.
    VehicleOrNameFuzzy(String),
    /// Given and family name, matched phonetically as a pair.
    FullNameFuzzy { first: String, second: String },
}

impl QueryIntent {
    /// Short stable label used in logs and the admin search log.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryIntent::PlateExact { .. } => "plate",
            QueryIntent::PhoneDigits(_) => "phone",
            QueryIntent::DateOfBirth(_) => "dob",
            QueryIntent::PlateNumberOnly(_) => "plate_number",
            QueryIntent::VehicleOrNameFuzzy(_) => "vehicle_or_name",
            QueryIntent::FullNameFuzzy { .. } => "full_name",
        }
    }
}

/// Arabic-Indic and Extended Arabic-Indic digits map to their ASCII digit.
fn ascii_digit(c: char) -> char {
    match c {
        '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
        '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
        _ => c,
    }
}

fn normalize_digits(token: &str) -> String {
    token.chars().map(ascii_digit).collect()
}

fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

fn digits_of(token: &str) -> String {
    token.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Classify a raw request.
///
/// Returns `None` only for blank input; every other input yields one intent.
/// Arabic-Indic digits are read as ASCII digits and carried as such.
pub fn classify(raw: &str) -> Option<QueryIntent> {
    let tokens: Vec<String> = raw.split_whitespace().map(normalize_digits).collect();

    match tokens.as_slice() {
        [] => None,
        [a, b] if is_numeric(a) || is_numeric(b) => {
            let (number, suffix) = if is_numeric(a) { (a, b) } else { (b, a) };
            Some(QueryIntent::PlateExact {
                number: number.clone(),
                suffix: suffix.to_uppercase(),
            })
        }
        [token] => Some(classify_single(token)),
        [first, second, ..] => Some(QueryIntent::FullNameFuzzy {
            first: first.clone(),
            second: second.clone(),
        }),
    }
}

/// `d/m/y` with three numeric parts. Checked before the phone rule so a full
/// date is not read as its eight digits.
fn is_date_shaped(token: &str) -> bool {
    let parts: Vec<&str> = token.split('/').collect();
    parts.len() == 3 && parts.iter().all(|p| is_numeric(p))
}

fn classify_single(token: &str) -> QueryIntent {
    if is_date_shaped(token) {
        return QueryIntent::DateOfBirth(token.to_string());
    }

    let digits = digits_of(token);
    if digits.len() >= PHONE_MIN_DIGITS {
        QueryIntent::PhoneDigits(digits)
    } else if token.contains('/') {
        QueryIntent::DateOfBirth(token.to_string())
    } else if is_numeric(token) {
        QueryIntent::PlateNumberOnly(token.to_string())
    } else {
        QueryIntent::VehicleOrNameFuzzy(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn intent(raw: &str) -> QueryIntent {
        classify(raw).expect("non-blank input must classify")
    }

    #[test]
    fn test_plate_exact() {
        assert_eq!(
            intent("123456 A"),
            QueryIntent::PlateExact {
                number: "123456".into(),
                suffix: "A".into()
            }
        );
    }

    #[test]
    fn test_plate_exact_letter_first_and_lowercase() {
        assert_eq!(
            intent("  b   123456 "),
            QueryIntent::PlateExact {
                number: "123456".into(),
                suffix: "B".into()
            }
        );
    }

    #[test]
    fn test_two_numeric_tokens_is_plate() {
        assert_eq!(
            intent("123 456"),
            QueryIntent::PlateExact {
                number: "123".into(),
                suffix: "456".into()
            }
        );
    }

    #[test]
    fn test_phone_digits() {
        assert_eq!(intent("12345678"), QueryIntent::PhoneDigits("12345678".into()));
        assert_eq!(intent("03-123-456"), QueryIntent::PhoneDigits("03123456".into()));
    }

    #[test]
    fn test_full_date_beats_phone_rule() {
        assert_eq!(intent("15/03/1990"), QueryIntent::DateOfBirth("15/03/1990".into()));
    }

    #[test]
    fn test_slashed_phone_is_phone() {
        assert_eq!(intent("03/123456"), QueryIntent::PhoneDigits("03123456".into()));
    }

    #[test]
    fn test_date_of_birth() {
        assert_eq!(intent("1/3/1990"), QueryIntent::DateOfBirth("1/3/1990".into()));
        assert_eq!(intent("3/1990"), QueryIntent::DateOfBirth("3/1990".into()));
    }

    #[test]
    fn test_plate_number_only() {
        assert_eq!(intent("123"), QueryIntent::PlateNumberOnly("123".into()));
        assert_eq!(intent("123456"), QueryIntent::PlateNumberOnly("123456".into()));
    }

    #[test]
    fn test_seven_digit_number_is_phone() {
        assert_eq!(intent("1234567"), QueryIntent::PhoneDigits("1234567".into()));
    }

    #[test]
    fn test_vehicle_or_name() {
        assert_eq!(intent("Toyota"), QueryIntent::VehicleOrNameFuzzy("Toyota".into()));
        assert_eq!(intent("أحمد"), QueryIntent::VehicleOrNameFuzzy("أحمد".into()));
        assert_eq!(intent("A4"), QueryIntent::VehicleOrNameFuzzy("A4".into()));
    }

    #[test]
    fn test_full_name() {
        assert_eq!(
            intent("Ahmed Khalil"),
            QueryIntent::FullNameFuzzy {
                first: "Ahmed".into(),
                second: "Khalil".into()
            }
        );
    }

    #[test]
    fn test_full_name_uses_first_two_tokens() {
        assert_eq!(
            intent("Ahmed Khalil Haddad 42"),
            QueryIntent::FullNameFuzzy {
                first: "Ahmed".into(),
                second: "Khalil".into()
            }
        );
    }

    #[test]
    fn test_arabic_indic_digits() {
        assert_eq!(intent("٠٣١٢٣٤٥٦"), QueryIntent::PhoneDigits("03123456".into()));
        assert_eq!(intent("۰۳۱۲۳۴۵۶"), QueryIntent::PhoneDigits("03123456".into()));
        assert_eq!(intent("١٢٣"), QueryIntent::PlateNumberOnly("123".into()));
        assert_eq!(
            intent("١٢٣٤٥٦ ب"),
            QueryIntent::PlateExact {
                number: "123456".into(),
                suffix: "ب".into()
            }
        );
        assert_eq!(intent("١٥/٠٣/١٩٩٠"), QueryIntent::DateOfBirth("15/03/1990".into()));
    }

    #[test]
    fn test_blank_has_no_intent() {
        assert_eq!(classify(""), None);
        assert_eq!(classify(" \t\n"), None);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(intent("123").kind(), "plate_number");
        assert_eq!(intent("Ahmed Khalil").kind(), "full_name");
    }
}
