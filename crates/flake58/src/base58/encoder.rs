use crate::Base58Error;
use core::fmt;

/// The Bitcoin-ordered base-58 alphabet: digits and letters without `0`, `O`,
/// `I` and `l`.
pub const STD_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Longest numeral a `u64` can need: `58^11 > 2^64`.
pub const MAX_ENCODED_LEN: usize = 11;

const BASE: u64 = 58;
const NO_VALUE: u8 = 255;

/// A bijective base-58 codec over a caller-chosen alphabet.
///
/// Position 0 of the alphabet is the zero digit. Numerals are written most
/// significant digit first with no padding, so their length grows with the
/// value: two encoded IDs only sort like their integers when they have the
/// same length. Decode and compare the decomposed time instead of sorting
/// strings.
///
/// The encoder is immutable once built and can be shared freely across
/// threads.
///
/// # Example
///
/// ```
/// use flake58::Encoder;
///
/// let enc = Encoder::standard();
/// assert_eq!(enc.encode(0), "1");
/// assert_eq!(enc.encode(65535), "LUv");
/// assert_eq!(enc.decode("LUv").unwrap(), 65535);
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Encoder {
    encode: [u8; 58],
    decode: [u8; 256],
}

impl Encoder {
    /// Builds an encoder from a 58-symbol ASCII alphabet.
    ///
    /// # Errors
    ///
    /// - [`Base58Error::InvalidAlphabetLength`] unless `alphabet` has exactly
    ///   58 bytes
    /// - [`Base58Error::NonAsciiSymbol`] if a byte is not ASCII
    /// - [`Base58Error::DuplicateSymbol`] if a symbol repeats
    pub fn new(alphabet: impl AsRef<[u8]>) -> Result<Self, Base58Error> {
        Self::build(alphabet.as_ref())
    }

    /// Like [`Self::new`], but panics on an invalid alphabet.
    ///
    /// Only meant for static initialisation, where a bad alphabet is a
    /// programming error nobody can recover from.
    ///
    /// # Panics
    ///
    /// Panics if the alphabet is rejected by [`Self::new`].
    pub fn must_new(alphabet: impl AsRef<[u8]>) -> Self {
        match Self::new(alphabet) {
            Ok(enc) => enc,
            Err(e) => panic!("{e}"),
        }
    }

    /// The encoder over [`STD_ALPHABET`]. Cannot fail.
    pub const fn standard() -> Self {
        match Self::build(STD_ALPHABET) {
            Ok(enc) => enc,
            Err(_) => panic!("standard base58 alphabet is valid"),
        }
    }

    const fn build(alphabet: &[u8]) -> Result<Self, Base58Error> {
        if alphabet.len() != BASE as usize {
            return Err(Base58Error::InvalidAlphabetLength {
                len: alphabet.len(),
            });
        }

        let mut encode = [0_u8; 58];
        let mut decode = [NO_VALUE; 256];
        let mut i = 0;
        while i < encode.len() {
            let byte = alphabet[i];
            if !byte.is_ascii() {
                return Err(Base58Error::NonAsciiSymbol { byte });
            }
            if decode[byte as usize] != NO_VALUE {
                return Err(Base58Error::DuplicateSymbol { byte });
            }
            encode[i] = byte;
            decode[byte as usize] = i as u8;
            i += 1;
        }

        Ok(Self { encode, decode })
    }

    /// The alphabet in digit order.
    pub const fn alphabet(&self) -> &[u8; 58] {
        &self.encode
    }

    /// Encodes `n` into a new [`String`].
    pub fn encode(&self, n: u64) -> String {
        let mut buf = [0_u8; MAX_ENCODED_LEN];
        self.encode_to_buf(n, &mut buf).to_owned()
    }

    /// Encodes `n` into `buf` without allocating and returns the written
    /// suffix. `0` encodes as the single zero symbol.
    pub fn encode_to_buf<'a>(&self, mut n: u64, buf: &'a mut [u8; MAX_ENCODED_LEN]) -> &'a str {
        // Digits are produced least significant first, so fill from the end.
        let mut pos = MAX_ENCODED_LEN;
        loop {
            pos -= 1;
            buf[pos] = self.encode[(n % BASE) as usize];
            n /= BASE;
            if n == 0 {
                break;
            }
        }

        // SAFETY: every alphabet symbol was checked to be ASCII in `build`.
        unsafe { core::str::from_utf8_unchecked(&buf[pos..]) }
    }

    /// Decodes a numeral produced by [`Self::encode`].
    ///
    /// Leading zero symbols are accepted and contribute nothing, so `"11"`
    /// decodes to `0` just like `"1"`.
    ///
    /// # Errors
    ///
    /// - [`Base58Error::EmptyInput`] for `""`
    /// - [`Base58Error::InvalidCharacter`] naming the first character outside
    ///   the alphabet and its byte offset
    /// - [`Base58Error::Overflow`] if the value exceeds `u64::MAX`
    pub fn decode(&self, s: &str) -> Result<u64, Base58Error> {
        if s.is_empty() {
            return Err(Base58Error::EmptyInput);
        }

        let mut n = 0_u64;
        for (index, character) in s.char_indices() {
            let digit = if character.is_ascii() {
                self.decode[character as usize]
            } else {
                NO_VALUE
            };
            if digit == NO_VALUE {
                return Err(Base58Error::InvalidCharacter { character, index });
            }
            n = n
                .checked_mul(BASE)
                .and_then(|n| n.checked_add(u64::from(digit)))
                .ok_or(Base58Error::Overflow)?;
        }

        Ok(n)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for Encoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // SAFETY: the alphabet is ASCII, see `build`.
        let alphabet = unsafe { core::str::from_utf8_unchecked(&self.encode) };
        f.debug_struct("Encoder").field("alphabet", &alphabet).finish()
    }
}
