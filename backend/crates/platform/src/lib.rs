//! Platform Crate - Technical Infrastructure
//!
//! Building blocks with no domain knowledge:
//! - HMAC-SHA256 signing and base64url encoding for tokens
//! - Credential cookie parsing and `Set-Cookie` construction
//! - Token-bucket admission control
//! - Argon2id password hash verification

pub mod cookie;
pub mod crypto;
pub mod password;
pub mod rate_limit;
