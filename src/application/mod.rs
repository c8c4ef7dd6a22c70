//! Application layer: the interaction controller and page services
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod controller;
pub mod error;
pub mod error_ext;
pub mod services;

pub use controller::{Indicators, InteractionController};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
