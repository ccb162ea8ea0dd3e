use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::{UserError, UserResult};

/// Argon2id password hasher with a configurable work factor.
///
/// Each hash gets a fresh random salt and is stored as a PHC string, which
/// carries its own parameters. Verification reads them from the string, so
/// changing the work factor never invalidates existing hashes.
///
/// The default work factor is argon2's own default.
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// # Errors
    /// `PasswordHash` when the combination is rejected by argon2
    /// (e.g. memory below 8 KiB per lane).
    pub fn with_params(memory_kib: u32, iterations: u32, parallelism: u32) -> UserResult<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| UserError::PasswordHash(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }

    pub fn verify(&self, password: &str, hash: &str) -> UserResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

        Ok(self
            .argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
