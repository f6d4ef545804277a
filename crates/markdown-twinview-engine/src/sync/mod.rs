//! # Synchronization
//!
//! - **`coordinator`**: [`SyncCoordinator`], the entry point hosts drive
//! - **`store`**: the canonical document text and its change queue
//! - **`task`**: cancellable frame/timeout handles

pub mod coordinator;
pub mod store;
pub mod task;

pub use coordinator::{Relocation, SyncCoordinator};
pub use store::{DocumentStore, StoreChange};
pub use task::{Deadline, Task};
