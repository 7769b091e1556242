//! Domain models
//!
//! This module contains all domain models used throughout the application.

pub mod certificate;
pub mod completion;
pub mod course;
pub mod enrollment;
pub mod lesson;
pub mod security_log;
pub mod stats;
pub mod user;

pub use certificate::*;
pub use completion::*;
pub use course::*;
pub use enrollment::*;
pub use lesson::*;
pub use security_log::*;
pub use stats::*;
pub use user::*;
