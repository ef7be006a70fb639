//! Data models for the coordination backend

pub mod dates;
pub mod enums;
pub mod equipment;
pub mod file;
pub mod fleet;
pub mod note;
pub mod project;
pub mod request;

pub use enums::*;
