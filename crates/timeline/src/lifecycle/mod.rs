//! Lifecycle management for keeping an index trimmed to a window around now.

pub mod window;

pub use window::{DefaultWindowPolicy, PruneReport, RetentionWindow, WindowPolicy};
