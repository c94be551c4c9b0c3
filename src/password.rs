//! Random password generation for managed database accounts.

use std::fmt;
use std::str::FromStr;

use crate::error::Result;

const DIGITS: &[u8] = b"0123456789";
const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SYMBOLS: &[u8] = b"+=-!@#$%*,.[]";

/// Character set a password is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordKind {
    /// Digits only.
    Num,
    /// Upper and lower case letters.
    #[default]
    Char,
    /// Digits and letters.
    Mix,
    /// Digits, letters and punctuation.
    Advance,
}

impl PasswordKind {
    /// Parse a kind name; anything unrecognised falls back to [`PasswordKind::Char`].
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "num" => PasswordKind::Num,
            "mix" => PasswordKind::Mix,
            "advance" => PasswordKind::Advance,
            _ => PasswordKind::Char,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PasswordKind::Num => "num",
            PasswordKind::Char => "char",
            PasswordKind::Mix => "mix",
            PasswordKind::Advance => "advance",
        }
    }

    fn alphabet(&self) -> Vec<u8> {
        match self {
            PasswordKind::Num => DIGITS.to_vec(),
            PasswordKind::Char => LETTERS.to_vec(),
            PasswordKind::Mix => [DIGITS, LETTERS].concat(),
            PasswordKind::Advance => [DIGITS, LETTERS, SYMBOLS].concat(),
        }
    }
}

impl FromStr for PasswordKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for PasswordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generate a password of `length` characters drawn uniformly from `kind`'s
/// alphabet.
///
/// Fails only when the OS random source is unavailable.
pub fn generate_password(length: usize, kind: PasswordKind) -> Result<String> {
    let alphabet = kind.alphabet();
    // Largest multiple of the alphabet size that fits in a byte; bytes at or
    // above it are redrawn so every character is equally likely.
    let limit = (256 / alphabet.len() * alphabet.len()) as u16;

    let mut password = String::with_capacity(length);
    let mut buf = [0u8; 64];
    while password.len() < length {
        getrandom::getrandom(&mut buf)
            .map_err(|e| anyhow::anyhow!("OS random source unavailable: {}", e))?;
        for &byte in buf.iter().filter(|&&b| u16::from(b) < limit) {
            if password.len() == length {
                break;
            }
            password.push(char::from(alphabet[usize::from(byte) % alphabet.len()]));
        }
    }

    Ok(password)
}
