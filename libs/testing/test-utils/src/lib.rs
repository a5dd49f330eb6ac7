//! Shared test infrastructure for the catalog crates.
//!
//! - `TestDatabase`: migrated in-memory SQLite, or a Postgres container with
//!   the `postgres` feature
//! - `TestDataBuilder`: deterministic names for test rows
//! - `assertions`: assertion helpers with readable failure messages
//!
//! ```rust,ignore
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn creates_product() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("creates_product");
//!     let name = builder.name("product", "main");
//! }
//! ```

mod database;

#[cfg(feature = "postgres")]
mod postgres;

pub use database::TestDatabase;

/// Deterministic test data derived from a seed
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seeds from the test name so reruns produce the same data.
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// `test-{prefix}-{seed}-{suffix}`
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.name("product", "main"), "test-product-7-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }
}

pub mod assertions {
    use std::fmt::Debug;

    /// Unwraps `value`, panicking with `context` when it is `None`.
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Asserts ascending order without duplicates.
    pub fn assert_strictly_ascending<T: PartialOrd + Debug>(values: &[T], context: &str) {
        for pair in values.windows(2) {
            assert!(
                pair[0] < pair[1],
                "{}: {:?} is not strictly ascending",
                context,
                values
            );
        }
    }
}
