//! Card number and BIN value objects.

use std::fmt;

use binlist_core::error::ValidationError;

/// Shortest accepted card number: a bare 6-digit BIN.
pub const MIN_CARD_NUMBER_LEN: usize = 6;
/// Longest PAN allowed by ISO/IEC 7812.
pub const MAX_CARD_NUMBER_LEN: usize = 19;
/// BINs are 6 or 8 digits; lookups accept anything in between.
pub const MIN_BIN_LEN: usize = 6;
/// Longest BIN forwarded to the lookup service.
pub const MAX_BIN_LEN: usize = 8;

/// Leading and trailing digits left visible when masking.
const VISIBLE_PREFIX: usize = 6;
const VISIBLE_SUFFIX: usize = 4;

fn check_digits(
    field: &'static str,
    raw: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidField {
            field,
            reason: "must contain only digits".to_owned(),
        });
    }
    if !(min..=max).contains(&raw.len()) {
        return Err(ValidationError::InvalidField {
            field,
            reason: format!("must be {min} to {max} digits, got {}", raw.len()),
        });
    }
    Ok(())
}

/// Masks everything but the first six and last four characters.
///
/// Works on unvalidated input so commands can be logged before validation.
#[must_use]
pub fn mask(raw: &str) -> String {
    let len = raw.chars().count();
    if len <= VISIBLE_PREFIX + VISIBLE_SUFFIX {
        return raw.to_owned();
    }
    raw.chars()
        .enumerate()
        .map(|(i, c)| {
            if i < VISIBLE_PREFIX || i >= len - VISIBLE_SUFFIX {
                c
            } else {
                '*'
            }
        })
        .collect()
}

/// A validated card number (full PAN or a leading BIN prefix).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CardNumber(String);

impl CardNumber {
    /// Parses a card number: ASCII digits only, 6 to 19 long.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidField` for `card_number`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        check_digits("card_number", raw, MIN_CARD_NUMBER_LEN, MAX_CARD_NUMBER_LEN)?;
        Ok(Self(raw.to_owned()))
    }

    /// The unmasked digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of digits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; parsing rejects short input.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The leading digits sent to the lookup service (up to eight).
    #[must_use]
    pub fn bin(&self) -> &str {
        &self.0[..self.0.len().min(MAX_BIN_LEN)]
    }

    /// The masked form used in logs and results.
    #[must_use]
    pub fn masked(&self) -> String {
        mask(&self.0)
    }

    /// Whether the digits pass the Luhn (mod 10) checksum.
    #[must_use]
    pub fn luhn_valid(&self) -> bool {
        let sum: u32 = self
            .0
            .bytes()
            .rev()
            .map(|b| u32::from(b - b'0'))
            .enumerate()
            .map(|(i, d)| {
                if i % 2 == 1 {
                    let doubled = d * 2;
                    if doubled > 9 { doubled - 9 } else { doubled }
                } else {
                    d
                }
            })
            .sum();
        sum % 10 == 0
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CardNumber").field(&self.masked()).finish()
    }
}

/// A validated bank identification number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bin(String);

impl Bin {
    /// Parses a BIN: ASCII digits only, 6 to 8 long.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidField` for `bin`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        check_digits("bin", raw, MIN_BIN_LEN, MAX_BIN_LEN)?;
        Ok(Self(raw.to_owned()))
    }

    /// The digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Bin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
