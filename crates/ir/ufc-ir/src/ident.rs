//! Identifier rule shared by functions and classes
//!
//! A name is valid when it is non-empty and its first character is not a
//! digit. "Digit" means a decimal digit in any script (general category
//! `Nd`) or a character with `Numeric_Type=Digit`, such as superscripts and
//! circled digits. Other numeric characters (`½`, `Ⅻ`, `〇`) are letters as
//! far as this rule is concerned.

use crate::error::{IrError, NameKind};

/// First code point of every run of ten decimal digits (Unicode 14)
const DECIMAL_ZEROS: [u32; 66] = [
    0x0030, 0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66,
    0x0CE6, 0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946,
    0x19D0, 0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0,
    0xA9F0, 0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x10D30, 0x11066, 0x110F0, 0x11136, 0x111D0,
    0x112F0, 0x11450, 0x114D0, 0x11650, 0x116C0, 0x11730, 0x118E0, 0x11950, 0x11C50, 0x11D50,
    0x11DA0, 0x16A60, 0x16AC0, 0x16B50, 0x1D7CE, 0x1D7D8, 0x1D7E2, 0x1D7EC, 0x1D7F6, 0x1E140,
    0x1E2F0, 0x1E950, 0x1FBF0,
];

/// Inclusive ranges of non-decimal characters with `Numeric_Type=Digit`
const OTHER_DIGITS: [(u32, u32); 20] = [
    (0x00B2, 0x00B3),
    (0x00B9, 0x00B9),
    (0x1369, 0x1371),
    (0x19DA, 0x19DA),
    (0x2070, 0x2070),
    (0x2074, 0x2079),
    (0x2080, 0x2089),
    (0x2460, 0x2468),
    (0x2474, 0x247C),
    (0x2488, 0x2490),
    (0x24EA, 0x24EA),
    (0x24F5, 0x24FD),
    (0x24FF, 0x24FF),
    (0x2776, 0x277E),
    (0x2780, 0x2788),
    (0x278A, 0x2792),
    (0x10A40, 0x10A43),
    (0x10E60, 0x10E68),
    (0x11052, 0x1105A),
    (0x1F100, 0x1F10A),
];

/// Whether `ch` counts as a digit for the identifier rule
pub(crate) fn is_digit(ch: char) -> bool {
    if ch.is_ascii_digit() {
        return true;
    }
    if ch.is_ascii() {
        return false;
    }
    let code = u32::from(ch);
    let after_zero = DECIMAL_ZEROS.partition_point(|&zero| zero <= code);
    if after_zero > 0 && code - DECIMAL_ZEROS[after_zero - 1] < 10 {
        return true;
    }
    OTHER_DIGITS
        .iter()
        .any(|&(start, end)| (start..=end).contains(&code))
}

/// Checks the identifier rule
pub(crate) fn validate_name(kind: NameKind, name: &str) -> Result<(), IrError> {
    match name.chars().next() {
        None => Err(IrError::EmptyName { kind }),
        Some(first) if is_digit(first) => Err(IrError::LeadingDigit {
            kind,
            name: name.to_string(),
        }),
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_digits_in_any_script() {
        for ch in ['0', '9', '٣', '۷', '९', '০', '๕', '０', '𝟎', '🯹'] {
            assert!(is_digit(ch), "{ch:?}");
        }
    }

    #[test]
    fn digit_typed_numerics() {
        for ch in ['²', '¹', '⁴', '₀', '①', '⓪', '❶'] {
            assert!(is_digit(ch), "{ch:?}");
        }
    }

    #[test]
    fn other_numerics_are_not_digits() {
        for ch in ['½', 'Ⅻ', '〇', '⑩', '十', 'a', '_', '/', ':'] {
            assert!(!is_digit(ch), "{ch:?}");
        }
    }

    #[test]
    fn zero_table_is_sorted_runs_of_ten() {
        for pair in DECIMAL_ZEROS.windows(2) {
            assert!(pair[1] - pair[0] >= 10, "{:#x} overlaps {:#x}", pair[0], pair[1]);
        }
        for zero in DECIMAL_ZEROS {
            assert!(char::from_u32(zero).is_some_and(char::is_numeric));
            assert!(char::from_u32(zero + 9).is_some_and(char::is_numeric));
        }
    }
}
