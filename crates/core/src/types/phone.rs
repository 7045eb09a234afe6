//! Phone number input mask.
//!
//! The mask is applied live as the customer types: raw keystrokes go in,
//! a progressively formatted `(XXX)XXX-XXXX` display string comes out. The
//! formatter only ever rearranges digits, so [`strip_mask`] always recovers
//! what was typed.

/// Number of digits in a complete phone number.
pub const PHONE_DIGITS: usize = 10;

/// Remove every non-digit character from a display string.
///
/// ```
/// use coffey_core::strip_mask;
///
/// assert_eq!(strip_mask("(555)123-4567"), "5551234567");
/// assert_eq!(strip_mask("abc"), "");
/// ```
#[must_use]
pub fn strip_mask(display: &str) -> String {
    display.chars().filter(char::is_ascii_digit).collect()
}

/// Format raw input into the phone display mask.
///
/// `previous_raw` is the value of the field before this keystroke. When the
/// previous value was five characters long and the new one is four, the
/// customer just deleted the closing paren, so the mask collapses back to
/// `(DD` instead of re-inserting it (which would trap the cursor).
///
/// ```
/// use coffey_core::apply_mask;
///
/// assert_eq!(apply_mask("5", None), "(5");
/// assert_eq!(apply_mask("555", None), "(555)");
/// assert_eq!(apply_mask("5551234567", None), "(555)123-4567");
/// assert_eq!(apply_mask("(555", Some("(555)")), "(55");
/// ```
#[must_use]
pub fn apply_mask(new_raw: &str, previous_raw: Option<&str>) -> String {
    let digits = strip_mask(new_raw);
    let len = digits.len();

    if len > 6 {
        return format!(
            "({}){}-{}",
            segment(&digits, 0, 3),
            segment(&digits, 3, 6),
            segment(&digits, 6, PHONE_DIGITS)
        );
    }

    let deleted_paren = previous_raw.is_some_and(|prev| prev.chars().count() == 5)
        && new_raw.chars().count() == 4;
    if deleted_paren {
        return format!("({}", segment(&digits, 0, 2));
    }

    match len {
        0 => String::new(),
        1 | 2 => format!("({digits}"),
        3 => format!("({digits})"),
        _ => format!("({}){}", segment(&digits, 0, 3), segment(&digits, 3, len)),
    }
}

/// Digit-string slice clamped to the available length.
fn segment(digits: &str, start: usize, end: usize) -> &str {
    digits.get(start..end.min(digits.len())).unwrap_or("")
}

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input does not contain exactly ten digits.
    #[error("phone number must have {PHONE_DIGITS} digits (got {0})")]
    WrongLength(usize),
}

/// A complete ten-digit phone number, stored as bare digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse a phone number from masked or raw input.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::WrongLength`] unless the input holds exactly ten
    /// digits once formatting characters are removed.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let digits = strip_mask(s);
        if digits.len() != PHONE_DIGITS {
            return Err(PhoneError::WrongLength(digits.len()));
        }
        Ok(Self(digits))
    }

    /// Returns the masked display form, `(XXX)XXX-XXXX`.
    #[must_use]
    pub fn masked(&self) -> String {
        apply_mask(&self.0, None)
    }
}
