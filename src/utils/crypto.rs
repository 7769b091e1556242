//! Cryptographic utilities

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::constants::{CERTIFICATE_CODE_GROUPS, CERTIFICATE_CODE_GROUP_LEN};

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Uppercase alphabet without look-alikes (0/O, 1/I)
const CODE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generate a cryptographically secure random token
pub fn generate_secure_token(length: usize) -> String {
    random_from(ALPHANUMERIC, length)
}

fn random_from(charset: &[u8], length: usize) -> String {
    let mut rng = rand::rng();

    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..charset.len());
            charset[idx] as char
        })
        .collect()
}

/// Hash a string using SHA-256
pub fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

/// Generate a certificate verification code, e.g. `LL-7KQX-M2PA-94TZ`
pub fn generate_verification_code(prefix: &str) -> String {
    let groups: Vec<String> = (0..CERTIFICATE_CODE_GROUPS)
        .map(|_| random_from(CODE_CHARSET, CERTIFICATE_CODE_GROUP_LEN))
        .collect();

    format!("{}-{}", prefix, groups.join("-"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::validate_verification_code;

    #[test]
    fn test_generate_secure_token() {
        let token1 = generate_secure_token(32);
        let token2 = generate_secure_token(32);

        assert_eq!(token1.len(), 32);
        assert_eq!(token2.len(), 32);
        assert_ne!(token1, token2);
    }

    #[test]
    fn test_hash_string() {
        let hash1 = hash_string("test");
        let hash2 = hash_string("test");
        let hash3 = hash_string("different");

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_verification_code_shape() {
        let code = generate_verification_code("LL");
        assert_eq!(code.len(), "LL-XXXX-XXXX-XXXX".len());
        assert!(code.starts_with("LL-"));
        assert!(validate_verification_code(&code).is_ok());
        assert!(!code.contains('O') && !code.contains('0'));
    }
}
