use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_hash_verifies_the_original_password() {
        let hash = hash_password("phonebook-owner-pw").expect("hash");
        assert!(verify_password("phonebook-owner-pw", &hash).expect("verify"));
    }

    #[test]
    fn hash_is_salted_per_call() {
        let a = hash_password("same-input").expect("hash");
        let b = hash_password("same-input").expect("hash");
        assert_ne!(a, b);
    }

    #[test]
    fn mismatched_password_fails_verification() {
        let hash = hash_password("the-real-one").expect("hash");
        assert!(!verify_password("a-guess", &hash).expect("verify"));
    }

    #[test]
    fn stored_value_that_is_not_a_phc_string_errors() {
        assert!(verify_password("anything", "plaintext-left-in-column").is_err());
    }
}
