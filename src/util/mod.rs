//! Shared utilities

pub mod config;
pub mod diagnostic;
pub mod hash;
pub mod interning;

pub use config::Config;
pub use diagnostic::Diagnostic;
pub use interning::InternedString;
