use core::fmt;

/// Errors raised while building a base-58 [`crate::Encoder`] or decoding with
/// one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Base58Error {
    /// The alphabet does not contain exactly 58 symbols.
    InvalidAlphabetLength { len: usize },
    /// The alphabet repeats a symbol, which would make decoding ambiguous.
    DuplicateSymbol { byte: u8 },
    /// The alphabet contains a byte outside ASCII.
    NonAsciiSymbol { byte: u8 },
    /// Decoding was asked to parse an empty string.
    EmptyInput,
    /// A character of the input is not part of the alphabet.
    InvalidCharacter { character: char, index: usize },
    /// The numeral is larger than `u64::MAX`.
    Overflow,
}

impl fmt::Display for Base58Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAlphabetLength { len } => {
                write!(f, "base58: alphabet must be 58 bytes long, got {len}")
            }
            Self::DuplicateSymbol { byte } => {
                write!(f, "base58: duplicate alphabet symbol {:?}", char::from(*byte))
            }
            Self::NonAsciiSymbol { byte } => {
                write!(f, "base58: non-ascii alphabet byte {byte:#04x}")
            }
            Self::EmptyInput => write!(f, "base58: id should not be empty"),
            Self::InvalidCharacter { character, index } => {
                write!(f, "base58: invalid character {character:?} at index {index}")
            }
            Self::Overflow => write!(f, "base58: value does not fit in 64 bits"),
        }
    }
}

impl core::error::Error for Base58Error {}
