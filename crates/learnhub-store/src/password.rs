use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use learnhub_config::PasswordConfig;
use tokio::task;

use crate::error::StoreError;

/// Salted Argon2id hashing. Verification reads the cost parameters from the
/// stored hash, so changing the config does not lock out existing users.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    pub fn new(config: PasswordConfig) -> Result<Self, StoreError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| StoreError::PasswordHash(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, password: &str) -> Result<String, StoreError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| StoreError::PasswordHash(e.to_string()))
    }

    pub fn verify(&self, password: &str, encoded: &str) -> Result<bool, StoreError> {
        let parsed =
            PasswordHash::new(encoded).map_err(|e| StoreError::PasswordHash(e.to_string()))?;
        Ok(self
            .argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// [`Self::hash`] off the async executor.
    pub async fn hash_blocking(&self, password: String) -> Result<String, StoreError> {
        let hasher = self.clone();
        task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| StoreError::PasswordHash(e.to_string()))?
    }

    /// [`Self::verify`] off the async executor.
    pub async fn verify_blocking(
        &self,
        password: String,
        encoded: String,
    ) -> Result<bool, StoreError> {
        let hasher = self.clone();
        task::spawn_blocking(move || hasher.verify(&password, &encoded))
            .await
            .map_err(|e| StoreError::PasswordHash(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> Argon2Hasher {
        Argon2Hasher::new(PasswordConfig::minimal()).unwrap()
    }

    #[test]
    fn hash_is_salted_and_verifiable() {
        let h = hasher();
        let a = h.hash("hunter2").unwrap();
        let b = h.hash("hunter2").unwrap();

        assert!(a.starts_with("$argon2id$"));
        assert_ne!(a, b);
        assert!(h.verify("hunter2", &a).unwrap());
        assert!(!h.verify("hunter3", &a).unwrap());
    }

    #[test]
    fn verify_uses_params_from_the_hash() {
        let old = hasher().hash("pw").unwrap();
        let stronger = Argon2Hasher::new(PasswordConfig {
            memory_kib: 64,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        assert!(stronger.verify("pw", &old).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(matches!(
            hasher().verify("pw", "plaintext"),
            Err(StoreError::PasswordHash(_))
        ));
    }

    #[test]
    fn invalid_params_are_rejected() {
        let err = Argon2Hasher::new(PasswordConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn blocking_variants_agree() {
        let h = hasher();
        let encoded = h.hash_blocking("pw".into()).await.unwrap();
        assert!(h.verify_blocking("pw".into(), encoded).await.unwrap());
    }
}
