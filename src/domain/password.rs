//! Password value object.
//!
//! Hashing and verification use Argon2 with its default parameters. The
//! strength policy is enforced before anything is hashed.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::{MIN_PASSWORD_LENGTH, PASSWORD_SPECIAL_CHARS};
use crate::error::{AppError, AppResult};

#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password").field("hash", &"[REDACTED]").finish()
    }
}

impl Password {
    /// Check the policy, then hash.
    ///
    /// # Errors
    /// Validation error when the password is too short or misses one of the
    /// required character classes.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        check_policy(plain_text)?;
        Ok(Self { hash: Self::hash(plain_text)? })
    }

    /// Wrap a hash loaded from storage.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// Malformed stored hashes never verify.
    pub fn verify(&self, plain_text: &str) -> bool {
        Self::verify_hash(plain_text, &self.hash).unwrap_or(false)
    }

    fn hash(plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {e}")))?;
        Ok(hash.to_string())
    }

    fn verify_hash(plain_text: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid hash format: {e}")))?;
        Ok(Argon2::default()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }
}

fn check_policy(plain_text: &str) -> AppResult<()> {
    if plain_text.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    let has_upper = plain_text.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = plain_text.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = plain_text.chars().any(|c| c.is_ascii_digit());
    let has_special = plain_text.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c));
    if !(has_upper && has_lower && has_digit && has_special) {
        return Err(AppError::validation(
            "Password must contain uppercase, lowercase, number, and special character",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let password = Password::new("SecurePass123!").unwrap();
        assert!(password.verify("SecurePass123!"));
        assert!(!password.verify("WrongPass123!"));
    }

    #[test]
    fn test_password_from_hash() {
        let password = Password::new("TestPass123?").unwrap();
        let restored = Password::from_hash(password.as_str().to_string());
        assert!(restored.verify("TestPass123?"));
    }

    #[test]
    fn test_same_password_different_salts() {
        let a = Password::new("SamePass123#").unwrap();
        let b = Password::new("SamePass123#").unwrap();
        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn test_policy() {
        assert!(Password::new("Sh0rt!").is_err());
        assert!(Password::new("alllower123!").is_err());
        assert!(Password::new("ALLUPPER123!").is_err());
        assert!(Password::new("NoDigitsHere!").is_err());
        assert!(Password::new("NoSpecial123").is_err());
        assert!(Password::new("Ex8!abc").is_err());
        assert!(Password::new("Exa8!bcd").is_ok());
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        assert!(!Password::from_hash("not-a-hash".into()).verify("anything"));
    }

    #[test]
    fn test_debug_redacted() {
        let password = Password::new("SecurePass123!").unwrap();
        assert!(!format!("{password:?}").contains("argon2"));
    }
}
