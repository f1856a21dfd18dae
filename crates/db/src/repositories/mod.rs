//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Reads
//! take `&SqlitePool`; writes that may run inside a handler's transaction
//! take any `SqliteExecutor` (a pool or `&mut *tx`).

pub mod activity_repo;
pub mod group_repo;
pub mod journal_repo;
pub mod project_repo;
pub mod user_repo;

pub use activity_repo::ActivityRepo;
pub use group_repo::GroupRepo;
pub use journal_repo::JournalRepo;
pub use project_repo::ProjectRepo;
pub use user_repo::UserRepo;
