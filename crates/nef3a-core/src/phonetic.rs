//! Soundex-style phonetic codes for Latin and Arabic names
//!
//! A name is reduced to a 4-character code: its first letter followed by up
//! to three consonant-class digits. Both alphabets share the same six digit
//! classes, so a transliterated name and its Arabic spelling often collide.
//!
//! ```rust
//! use nef3a_core::phonetic::encode;
//!
//! assert_eq!(encode("Robert"), "R163");
//! assert_eq!(encode(""), "0000");
//! ```

/// Code returned when nothing encodable is left after normalization.
pub const SENTINEL: &str = "0000";

/// Length of every code.
pub const CODE_LEN: usize = 4;

/// Pads short codes. Outside the class digits 1-6, so padding never reads as
/// a consonant class; the registry's stored codes use the same `0` padding.
const FILLER: char = '0';
const HAMZA: char = '\u{0621}';
const ARABIC_FIRST: char = '\u{0621}';
const ARABIC_LAST: char = '\u{064A}';

/// Digit class of a letter, `None` for letters that carry no class (vowels,
/// H, W, Y and unlisted Arabic letters).
fn digit_class(c: char) -> Option<char> {
    let digit = match c {
        'B' | 'F' | 'P' | 'V' | 'ب' | 'ف' => '1',
        'C' | 'G' | 'J' | 'K' | 'Q' | 'S' | 'X' | 'Z' | 'ك' | 'ق' | 'س' | 'ش' | 'ج' => '2',
        'D' | 'T' | 'د' | 'ت' => '3',
        'L' | 'ل' => '4',
        'M' | 'N' | 'م' | 'ن' => '5',
        'R' | 'ر' => '6',
        _ => return None,
    };
    Some(digit)
}

fn is_encodable(c: char) -> bool {
    c.is_ascii_uppercase() || (ARABIC_FIRST..=ARABIC_LAST).contains(&c)
}

/// Uppercase and keep only Latin capitals and Arabic letters, minus hamza.
fn normalize(text: &str) -> Vec<char> {
    text.chars()
        .flat_map(char::to_uppercase)
        .filter(|&c| is_encodable(c) && c != HAMZA)
        .collect()
}

/// Encode `text` into its phonetic code.
///
/// Total and deterministic: any input, including the empty string, yields
/// exactly [`CODE_LEN`] characters.
pub fn encode(text: &str) -> String {
    let letters = normalize(text);
    let Some((&first, tail)) = letters.split_first() else {
        return SENTINEL.to_string();
    };

    let mut code = String::with_capacity(CODE_LEN * 2);
    code.push(first);

    // Unclassed letters still separate runs: "BAB" keeps both B digits.
    let mut prev: Option<char> = None;
    for &c in tail {
        let class = digit_class(c);
        if class != prev {
            if let Some(digit) = class {
                code.push(digit);
            }
        }
        prev = class;
    }

    code.chars()
        .chain(std::iter::repeat(FILLER))
        .take(CODE_LEN)
        .collect()
}

/// Code of a two-part name, the concatenation of both parts' codes.
pub fn encode_pair(first: &str, second: &str) -> String {
    let mut code = encode(first);
    code.push_str(&encode(second));
    code
}
