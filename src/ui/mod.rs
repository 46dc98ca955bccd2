//! # UI Module
//!
//! This module provides the terminal window the screens are composed into.
//!
//! ## Components
//!
//! - [`App`] - Application state (reactor, UI queue, screens, focus)
//! - [`WindowComposer`] - Setup / in-test phase and per-screen view cache
//! - [`view`] - The declarative node tree renderers produce
//! - [`mod@render`] - Drawing the node tree with ratatui
//! - [`config`] - Persisted configuration
//!
//! ## Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                    Header                        │
//! ├─────────────────────────────────────────────────┤
//! │ Session                                         │
//! ├─────────────────────────────────────────────────┤
//! │ Test Setup  (or the mounted in-test screens)    │
//! │                                                 │
//! ├─────────────────────────────────────────────────┤
//! │                    Footer                        │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! Modals are drawn centered over everything and take focus while open.

pub mod app;
pub mod config;
pub mod render;
pub mod view;
pub mod window;

pub use app::App;
pub use render::render;
pub use window::{Phase, WindowComposer};
