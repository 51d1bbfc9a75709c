use crate::error::AppError;
use bcrypt::{hash, verify};

/// One-way password digests backed by bcrypt.
///
/// bcrypt salts every digest, so equal passwords produce different digests and
/// `verify` recomputes the hash with the salt embedded in the stored digest.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash(password, self.cost)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    pub fn verify(&self, password: &str, digest: &str) -> Result<bool, AppError> {
        verify(password, digest)
            .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    #[test]
    fn test_password_hashing_and_verification() {
        let password = "test_password123";
        let digest = hasher().hash(password).unwrap();

        assert_ne!(digest, password);
        assert!(hasher().verify(password, &digest).unwrap());
        assert!(!hasher().verify("test_password124", &digest).unwrap());
        assert!(!hasher().verify("", &digest).unwrap());
    }

    #[test]
    fn test_equal_passwords_get_distinct_digests() {
        let first = hasher().hash("same-password").unwrap();
        let second = hasher().hash("same-password").unwrap();

        assert_ne!(first, second);
        assert!(hasher().verify("same-password", &second).unwrap());
    }

    #[test]
    fn test_verify_with_invalid_hash() {
        match hasher().verify("test_password123", "invalidhashformat") {
            Err(AppError::Internal(msg)) => assert!(msg.contains("Failed to verify password")),
            Ok(false) => {}
            Ok(true) => panic!("Password verification should fail for invalid hash format"),
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }
}
