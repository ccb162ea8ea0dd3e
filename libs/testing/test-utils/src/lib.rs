//! Shared test utilities for domain testing
//!
//! - `TestMongo`: throwaway MongoDB container (feature: "mongo")
//! - `TestDataBuilder`: per-test user data that does not collide across tests
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { workspace = true, features = ["mongo"] }
//! ```
//!
//! ```rust,ignore
//! use test_utils::{TestDataBuilder, TestMongo};
//!
//! #[tokio::test]
//! #[ignore] // Requires Docker
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let data = TestDataBuilder::from_test_name("my_mongo_test");
//!     let repo = MongoUserRepository::new(mongo.database());
//!     let username = data.username("dave");
//! }
//! ```

use std::hash::{DefaultHasher, Hash, Hasher};
use uuid::Uuid;

#[cfg(feature = "mongo")]
mod mongo;

#[cfg(feature = "mongo")]
pub use mongo::TestMongo;

/// Deterministic user data keyed by a seed.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from the test name so reruns produce the same data.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let a = TestDataBuilder::from_test_name("test_create_user");
    /// let b = TestDataBuilder::from_test_name("test_create_user");
    /// assert_eq!(a.username("dave"), b.username("dave"));
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// assert_eq!(TestDataBuilder::new(7).username("main"), "test-user-7-main");
    /// ```
    pub fn username(&self, suffix: &str) -> String {
        format!("test-user-{}-{}", self.seed, suffix)
    }

    pub fn password(&self) -> String {
        format!("pw-{:x}", self.seed)
    }

    pub fn roles(&self) -> Vec<String> {
        vec!["Employee".to_string()]
    }

    /// Id for a note owner that never has to exist as a user.
    pub fn note_owner(&self) -> Uuid {
        Uuid::from_u64_pair(self.seed, !self.seed)
    }
}
