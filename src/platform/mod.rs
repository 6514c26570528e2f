//! Supported platforms and URL classification.

pub mod classifier;

pub use classifier::{classify, Platform};
