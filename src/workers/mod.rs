pub mod cleanup_worker;

pub use cleanup_worker::{start_cleanup_worker, CleanupConfig, CleanupWorker};
