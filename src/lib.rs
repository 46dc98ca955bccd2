//! Hearing UI - terminal presentation layer for a speech-in-noise hearing test
//!
//! This library provides the eight screens of the test (session, setup, trial
//! controls and five response screens), the reactive fields they are built
//! from, the window that composes them, and the binding through which a test
//! engine drives them.

pub mod engine;
pub mod logging;
pub mod reactive;
pub mod screens;
pub mod ui;
