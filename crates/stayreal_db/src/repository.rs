//! Repository factory trait
//!
//! Repositories are built from a database client through a factory so the
//! binary and the tests construct them the same way.

/// A trait for database repository factories
///
/// Generic over the repository type and the configuration type.
pub trait RepositoryFactory<R, C> {
    /// Create a new repository instance
    fn create_repository(&self, config: C) -> R;
}
