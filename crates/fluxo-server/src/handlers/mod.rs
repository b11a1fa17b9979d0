//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod bulk_upload;
pub mod health;
pub mod templates;

// Re-export all handlers for use in router
pub use bulk_upload::*;
pub use health::*;
pub use templates::*;
