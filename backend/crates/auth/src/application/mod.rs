//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod sign_in;
pub mod token_codec;

// Re-exports
pub use config::AuthConfig;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use token_codec::{TokenCodec, TokenError};
