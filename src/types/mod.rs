//! Type definitions module.
//!
//! Contains shared types used across the application.

pub mod version;
pub mod views;

pub use version::ContractVersion;
pub use views::*;
