//! User interface module - what the user sees besides log output.
//!
//! Log events go through `tracing`; this module prints the human-facing
//! summary, warnings and the final error.

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_error, display_status, display_success, display_summary, display_warning,
    format_summary, format_tags,
};
