//! Utilities shared by every storage backend

pub mod cancel;
pub mod error;
pub mod retry;

pub use cancel::{Cancelled, cancellable};
pub use error::{DatabaseError, DatabaseResult};
pub use retry::{RetryConfig, retry_with_backoff};
