//! Core traits defined in `invitehub-core` and implemented here or by other crates.

pub mod clock;
pub mod id_generator;

pub use clock::{Clock, ManualClock, SystemClock};
pub use id_generator::{IdGenerator, OsIdGenerator, SeededIdGenerator};
