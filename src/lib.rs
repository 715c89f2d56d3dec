//! Local PHP development environment setup for Linux.
//!
//! The `platform` module hides the differences between distribution
//! families behind one `Platform` facade; `php_fpm` and `caddy` build on it.

pub mod caddy;
pub mod capability;
pub mod command;
pub mod config;
pub mod detector;
pub mod error;
pub mod files;
pub mod host;
pub mod php_fpm;
pub mod platform;
pub mod version;

pub use capability::{Capability, DistroKind};
pub use error::ValetError;
pub use platform::{Distribution, Platform};
pub use version::LinkedPhp;
