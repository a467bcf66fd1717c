//! Customer contact details collected at checkout.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input is not an 11 digit `01X` mobile number.
    #[error("phone number must be 11 digits starting with 013-019")]
    InvalidFormat,
}

/// A Bangladeshi mobile number.
///
/// ## Constraints
///
/// - Exactly 11 ASCII digits
/// - Starts with `01`
/// - Third digit (operator prefix) is between 3 and 9
///
/// ## Examples
///
/// ```
/// use nb_collection_core::Phone;
///
/// assert!(Phone::parse("01712345678").is_ok());
/// assert!(Phone::parse("01312345678").is_ok());
///
/// assert!(Phone::parse("").is_err());            // empty
/// assert!(Phone::parse("01212345678").is_err()); // no 012 operator
/// assert!(Phone::parse("0171234567").is_err());  // too short
/// assert!(Phone::parse("+8801712345678").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Number of digits in a mobile number.
    pub const LENGTH: usize = 11;

    /// Parse a `Phone` from a string. No trimming or normalization is done.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or does not match
    /// `01[3-9]` followed by eight more digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        let bytes = s.as_bytes();
        let valid = bytes.len() == Self::LENGTH
            && bytes.iter().all(u8::is_ascii_digit)
            && bytes.starts_with(b"01")
            && matches!(bytes.get(2), Some(b'3'..=b'9'));

        if !valid {
            return Err(PhoneError::InvalidFormat);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Errors that can occur when parsing a [`PostalCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PostalCodeError {
    /// Not 4 to 6 ASCII digits.
    #[error("postal code must be {min}-{max} digits")]
    InvalidFormat {
        /// Minimum digit count.
        min: usize,
        /// Maximum digit count.
        max: usize,
    },
}

/// A postal code: 4 to 6 decimal digits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PostalCode(String);

impl PostalCode {
    /// Minimum number of digits.
    pub const MIN_LENGTH: usize = 4;
    /// Maximum number of digits.
    pub const MAX_LENGTH: usize = 6;

    /// Parse a `PostalCode` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error unless the input is 4-6 ASCII digits.
    pub fn parse(s: &str) -> Result<Self, PostalCodeError> {
        let len_ok = (Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&s.len());
        if !len_ok || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PostalCodeError::InvalidFormat {
                min: Self::MIN_LENGTH,
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_accepts_every_operator_prefix() {
        for third in '3'..='9' {
            let number = format!("01{third}12345678");
            assert!(Phone::parse(&number).is_ok(), "{number} should parse");
        }
    }

    #[test]
    fn test_phone_rejections() {
        assert_eq!(Phone::parse(""), Err(PhoneError::Empty));
        for bad in [
            "01012345678",
            "01112345678",
            "01212345678",
            "02712345678",
            "0171234567",
            "017123456789",
            "0171234567a",
            " 01712345678",
            "01712345678 ",
            "০১৭১২৩৪৫৬৭৮",
        ] {
            assert_eq!(
                Phone::parse(bad),
                Err(PhoneError::InvalidFormat),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_postal_code() {
        assert!(PostalCode::parse("1207").is_ok());
        assert!(PostalCode::parse("12070").is_ok());
        assert!(PostalCode::parse("120700").is_ok());
        assert!(PostalCode::parse("120").is_err());
        assert!(PostalCode::parse("1207000").is_err());
        assert!(PostalCode::parse("12a7").is_err());
        assert!(PostalCode::parse("").is_err());
    }
}
