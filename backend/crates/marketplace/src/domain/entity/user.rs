//! User Entity

use chrono::{DateTime, NaiveDate, Utc};
use kernel::error::app_error::{AppError, AppResult};

use crate::domain::value_object::{
    UserId, email::Email, user_password::UserPassword, user_role::UserRole,
};

const NAME_MAX_LENGTH: usize = 120;

/// Registered buyer or vendor.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Unique, lower-cased
    pub email: Email,
    pub password: UserPassword,
    /// Immutable after registration
    pub role: UserRole,
    pub phone_number: Option<String>,
    /// Brazilian taxpayer number, stored as given
    pub cpf: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Optional personal data collected at registration.
#[derive(Debug, Clone, Default)]
pub struct ContactDetails {
    pub phone_number: Option<String>,
    pub cpf: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

impl User {
    pub fn new(
        name: &str,
        email: Email,
        password: UserPassword,
        role: UserRole,
        contact: ContactDetails,
    ) -> AppResult<Self> {
        let now = Utc::now();

        if let Some(dob) = contact.date_of_birth {
            if dob > now.date_naive() {
                return Err(AppError::bad_request("Date of birth cannot be in the future"));
            }
        }

        Ok(Self {
            id: UserId::new(),
            name: validate_name(name)?,
            email,
            password,
            role,
            phone_number: trimmed(contact.phone_number),
            cpf: trimmed(contact.cpf),
            date_of_birth: contact.date_of_birth,
            created_at: now,
            updated_at: now,
        })
    }

    /// Name and email are the only mutable profile fields.
    pub fn rename(&mut self, name: &str, email: Email) -> AppResult<()> {
        self.name = validate_name(name)?;
        self.email = email;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_vendor(&self) -> bool {
        self.role.is_vendor()
    }
}

fn validate_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Name cannot be blank"));
    }
    if name.chars().count() > NAME_MAX_LENGTH {
        return Err(AppError::bad_request(format!(
            "Name must be at most {NAME_MAX_LENGTH} characters"
        )));
    }
    Ok(name.to_string())
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
