//! Utility functions

pub mod crypto;
pub mod net;
pub mod pagination;
pub mod validation;

pub use crypto::{generate_secure_token, generate_verification_code, hash_string};
pub use net::client_ip;
pub use pagination::Pagination;
pub use validation::{validate_username, validate_verification_code};
