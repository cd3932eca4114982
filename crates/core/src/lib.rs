//! Reel core types and utilities

pub mod clock;
pub mod error;
pub mod session;
pub mod store;
pub mod validation;

pub use clock::{Clock, SystemClock, expiry_after};
#[cfg(any(test, feature = "tests"))]
pub use clock::ManualClock;
pub use error::{Error, Result};
pub use session::Session;
pub use store::{FileStore, MemoryStore, SessionStore, StorageKey};
pub use validation::{ValidationError, validate_credentials, validate_registration};
