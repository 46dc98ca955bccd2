//! # Reactive Module
//!
//! The primitives every screen adapter is built from.
//!
//! ## Components
//!
//! - [`ObservableField`] - value cell whose reads are tracked and whose
//!   writes invalidate the renderers that read it
//! - [`Reactor`] - dependency graph, dirty set, render-pass coalescing
//! - [`UiQueue`] - the single UI task queue all adapter mutations go through
//! - [`ObserverSlot`] - weak, replaceable reference to one external observer
//!
//! ## Threading
//!
//! The engine may call adapters from any thread. Adapters never write a
//! field directly; they hand the write to the [`UiQueue`], which applies it
//! on the UI thread in issue order. Field storage itself is lock-protected,
//! so getters are safe from anywhere.

mod field;
mod observer;
mod queue;
mod scheduler;

pub use field::{BoolField, ListField, ObservableField, StringField};
pub use observer::ObserverSlot;
pub use queue::UiQueue;
pub use scheduler::{FieldId, Reactor, RenderPass, RenderScope};
