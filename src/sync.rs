//! Cross-window position synchronization.

pub mod peer;
