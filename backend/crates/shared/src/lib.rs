//! Shared Kernel
//!
//! Vocabulary that every marketplace crate agrees on:
//! - [`error::app_error::AppError`], the HTTP-mappable error every layer can fall back to
//! - [`error::kind::ErrorKind`], the classification behind it
//! - [`id::Id`], UUID identifiers tagged with the entity they belong to
//!
//! Only things whose meaning is identical across bounded contexts live here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
