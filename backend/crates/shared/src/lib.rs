//! Shared Kernel
//!
//! Vocabulary every backend crate agrees on:
//! - [`error::kind::ErrorKind`] - the status classification of a failure
//! - [`error::app_error::AppError`] - the error every handler ultimately returns
//!
//! Domain crates keep their own error enums and convert into `AppError`
//! at the HTTP boundary.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
