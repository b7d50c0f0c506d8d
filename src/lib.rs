//! AppForge - Website-to-App Configuration Wizard
//!
//! A terminal wizard that collects everything needed to wrap a website as an
//! Android app, shows a live device preview while you type, and produces the
//! build guides once the simulated export finishes.
//!
//! ## Features
//!
//! - **Six-Step Wizard:** URL, identity, design, advanced features, signing, export
//! - **Live Preview:** Phone mock-up that follows every keystroke
//! - **Presets:** Save and reload drafts as TOML (passwords are never written)
//! - **Guides:** Debug APK and release signing instructions as Markdown
//!
//! ## Quick Start
//!
//! ```bash
//! # Interactive wizard
//! appforge
//!
//! # Pre-fill the URL
//! appforge wizard --url https://example.com
//!
//! # Render the signing guide without the wizard
//! appforge guide signing --set keystore_alias=release --out dist
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod tui;
pub mod wizard;

// Re-export commonly used types
pub use error::{AppForgeError, ErrorCode};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
