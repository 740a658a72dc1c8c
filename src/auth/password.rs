use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::thread_rng;

use crate::error::AppError;

const MEMORY_COST_KIB: u32 = 19_456;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;

fn hasher() -> Result<Argon2<'static>, AppError> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
        .map_err(|err| AppError::internal_with_source("invalid argon2 parameters", err))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut thread_rng());
    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| AppError::internal_with_source("password hashing failed", err))?
        .to_string();
    Ok(hash)
}

/// `Ok(false)` on mismatch. A hash that cannot be parsed is an internal error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|err| AppError::internal_with_source("stored password hash is invalid", err))?;

    Ok(hasher()?
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Runs [`hash_password`] on the blocking pool.
pub async fn hash_password_async(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|err| AppError::internal_with_source("password hashing task failed", err))?
}

pub async fn verify_password_async(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|err| AppError::internal_with_source("password verify task failed", err))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("pw").expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("m=19456,t=2,p=1"));

        assert!(verify_password("pw", &hash).expect("verify should succeed"));
        assert!(!verify_password("wrong", &hash).expect("verify should succeed"));
    }

    #[test]
    fn salts_differ_per_hash() {
        let first = hash_password("pw").expect("hashing should succeed");
        let second = hash_password("pw").expect("hashing should succeed");
        assert_ne!(first, second);
    }

    #[test]
    fn unparseable_hash_is_internal_error() {
        let err = verify_password("pw", "not-a-hash").expect_err("verify should fail");
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn blocking_pool_variants_match_sync_ones() {
        let hash = hash_password_async("pw".to_string())
            .await
            .expect("hashing should succeed");
        assert!(verify_password("pw", &hash).expect("verify should succeed"));

        assert!(
            verify_password_async("pw".to_string(), hash.clone())
                .await
                .expect("verify should succeed")
        );
        assert!(
            !verify_password_async("wrong".to_string(), hash)
                .await
                .expect("verify should succeed")
        );

        let err = verify_password_async("pw".to_string(), "not-a-hash".to_string())
            .await
            .expect_err("verify should fail");
        assert!(matches!(err, AppError::Internal(_)));
    }
}
