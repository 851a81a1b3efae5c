//! Password hashing and verification
//!
//! Argon2id with the crate defaults (m=19 MiB, t=2, p=1), an optional
//! application-wide pepper, NFKC normalization and a small strength policy.
//! Clear-text input is zeroized on drop and never shows up in `Debug`.

use std::fmt;

use argon2::{
    Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier as _, password_hash::SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

const WEAK_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "12345678",
    "123456789",
    "1234567890",
    "abcdefgh",
    "letmein1",
    "welcome1",
    "admin123",
    "iloveyou",
    "trustno1",
];

const KEYBOARD_RUNS: &[&str] = &["qwerty", "asdfgh", "zxcvbn", "qazwsx"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be blank")]
    Blank,

    #[error("Password contains control characters")]
    ControlCharacter,

    #[error("Password is too easy to guess")]
    TooPredictable,
}

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Stored password hash is not a valid PHC string")]
    MalformedHash,
}

/// User-supplied password, normalized to NFKC.
///
/// Not `Clone`; the buffer is wiped when the value goes out of scope.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Normalizes and checks the strength policy. Use for new passwords.
    pub fn new(raw: impl Into<String>) -> Result<Self, PasswordPolicyError> {
        let password = Self::normalized(raw);
        password.check_policy()?;
        Ok(password)
    }

    /// Normalizes only. Use when checking a login attempt: an existing
    /// password must still verify after the policy gets stricter.
    pub fn for_verification(raw: impl Into<String>) -> Self {
        Self::normalized(raw)
    }

    fn normalized(raw: impl Into<String>) -> Self {
        let raw = Zeroizing::new(raw.into());
        Self(raw.nfkc().collect())
    }

    fn check_policy(&self) -> Result<(), PasswordPolicyError> {
        if self.0.trim().is_empty() {
            return Err(PasswordPolicyError::Blank);
        }

        // Length in code points, not bytes.
        let length = self.0.chars().count();
        if length < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: length,
            });
        }
        if length > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: length,
            });
        }

        if self.0.chars().any(|c| c.is_control() && c != '\t') {
            return Err(PasswordPolicyError::ControlCharacter);
        }

        if is_predictable(&self.0) {
            return Err(PasswordPolicyError::TooPredictable);
        }

        Ok(())
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(self.0.as_bytes().to_vec());
        if let Some(pepper) = pepper {
            bytes.extend_from_slice(pepper);
        }
        bytes
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClearTextPassword([REDACTED])")
    }
}

/// Argon2id hash in PHC string format, as stored in the database.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Wraps a stored PHC string after checking it parses.
    pub fn from_phc_string(phc: impl Into<String>) -> Result<Self, PasswordHashError> {
        let phc = phc.into();
        PasswordHash::new(&phc).map_err(|_| PasswordHashError::MalformedHash)?;
        Ok(Self(phc))
    }

    pub fn as_phc_string(&self) -> &str {
        &self.0
    }

    pub fn into_phc_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword([HASH])")
    }
}

/// Hashes and verifies passwords with a fixed pepper.
#[derive(Clone, Default)]
pub struct PasswordHasher {
    pepper: Option<Vec<u8>>,
}

impl PasswordHasher {
    pub fn new(pepper: Option<Vec<u8>>) -> Self {
        Self {
            pepper: pepper.filter(|p| !p.is_empty()),
        }
    }

    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let input = password.peppered(self.pepper.as_deref());

        let phc = Argon2::default()
            .hash_password(&input, &salt)
            .map_err(|e| PasswordHashError::Hashing(e.to_string()))?;

        Ok(HashedPassword(phc.to_string()))
    }

    /// Constant-time check. Any parse failure counts as a mismatch.
    pub fn verify(&self, password: &ClearTextPassword, hashed: &HashedPassword) -> bool {
        let Ok(parsed) = PasswordHash::new(&hashed.0) else {
            return false;
        };
        let input = password.peppered(self.pepper.as_deref());

        Argon2::default().verify_password(&input, &parsed).is_ok()
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("peppered", &self.pepper.is_some())
            .finish()
    }
}

fn is_predictable(password: &str) -> bool {
    let lower = password.to_lowercase();

    let mut chars = lower.chars();
    if let Some(first) = chars.next() {
        if chars.all(|c| c == first) {
            return true;
        }
    }

    if is_digit_run(&lower) {
        return true;
    }

    KEYBOARD_RUNS.iter().any(|run| lower.contains(run)) || WEAK_PASSWORDS.contains(&lower.as_str())
}

/// "2345678", "98765432", wrapping at 9/0.
fn is_digit_run(s: &str) -> bool {
    if !s.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let digits: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() < 4 {
        return false;
    }

    let ascending = digits.windows(2).all(|w| (w[0] + 1) % 10 == w[1]);
    let descending = digits.windows(2).all(|w| (w[1] + 1) % 10 == w[0]);
    ascending || descending
}
