//! Domain logic - pure version and tag rules independent of I/O

pub mod tag;
pub mod version;

pub use tag::TagPattern;
pub use version::{compare_versions, Version};
