//! Platform crate
//!
//! Technical building blocks with no marketplace vocabulary in them.
//! Currently: Argon2id password hashing ([`password`]).

pub mod password;
