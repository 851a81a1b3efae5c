//! User Password Value Object
//!
//! Stored Argon2id hash of a user's password. Hashing and verification are
//! delegated to `platform::password`.

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{
    ClearTextPassword, HashedPassword, PasswordHasher, PasswordPolicyError,
};
use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Check the strength policy and hash a newly chosen password.
    pub fn hash(raw: impl Into<String>, hasher: &PasswordHasher) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(policy_error)?;
        let hashed = hasher
            .hash(&clear_text)
            .map_err(|e| AppError::internal("Could not hash password").with_source(e))?;
        Ok(Self(hashed))
    }

    /// Wrap the PHC string read from the `users` table.
    pub fn from_db(phc: impl Into<String>) -> AppResult<Self> {
        HashedPassword::from_phc_string(phc)
            .map(Self)
            .map_err(|e| AppError::internal("Stored password hash is corrupt").with_source(e))
    }

    /// Login attempts are not policy-checked; a wrong password just fails.
    pub fn verify(&self, attempt: impl Into<String>, hasher: &PasswordHasher) -> bool {
        let attempt = ClearTextPassword::for_verification(attempt);
        hasher.verify(&attempt, &self.0)
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserPassword([HASH])")
    }
}

fn policy_error(err: PasswordPolicyError) -> AppError {
    let action = match &err {
        PasswordPolicyError::TooShort { .. } => "Choose a longer password",
        PasswordPolicyError::TooLong { .. } => "Choose a shorter password",
        PasswordPolicyError::Blank => "Enter a password",
        PasswordPolicyError::ControlCharacter => "Remove control characters from the password",
        PasswordPolicyError::TooPredictable => "Avoid common words and keyboard or digit runs",
    };
    AppError::bad_request(err.to_string()).with_action(action)
}
