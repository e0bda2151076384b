use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2,
};
#[cfg(test)]
use argon2::password_hash::{PasswordHash, PasswordVerifier};
use rand::rngs::OsRng;
use tracing::error;

/// Hashes an account password into an argon2id PHC string.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!("password hashing failed: {e}")
        })?
        .to_string();
    Ok(hash)
}

#[cfg(test)]
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
    fn hash_is_not_the_plaintext() {
        let hash = hash_password("p1").expect("hashing should succeed");
        assert_ne!(hash, "p1");
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn same_password_hashes_differently_each_time() {
        let a = hash_password("p1").unwrap();
        let b = hash_password("p1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn hash_verifies_against_original() {
        let hash = hash_password("correct-horse").expect("hashing should succeed");
        assert!(verify_password("correct-horse", &hash).expect("verify should succeed"));
        assert!(!verify_password("wrong-horse", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
