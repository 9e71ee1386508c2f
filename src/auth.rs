//! Authentication-adjacent helpers: fixed-window rate limiting, short-TTL token caching,
//! and token masking/validation for logs.

pub mod masking;
pub mod rate_limit;
pub mod secret;
pub mod token_cache;

pub use masking::*;
pub use rate_limit::*;
pub use secret::*;
pub use token_cache::*;
