//! Pure domain logic for the Presswork publishing backend.
//!
//! This crate has no internal dependencies and no I/O. It holds the shared
//! error taxonomy, type aliases, upload file-name rules, and markdown post
//! parsing used by the other workspace crates.

pub mod error;
pub mod post;
pub mod types;
pub mod upload;
