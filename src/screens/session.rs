//! # Session Screen
//!
//! Audio device picker plus the one user-facing error surface of the layer:
//! the engine reports failures with [`SessionUi::show_error_message`] and the
//! renderer turns them into a modal the user dismisses.

use std::sync::Arc;

use crate::reactive::{BoolField, ListField, Reactor, StringField, UiQueue};
use crate::ui::view::{Button, Node};

/// Contract the engine uses to drive the Session screen.
pub trait SessionUi: Send + Sync {
    fn show_error_message(&self, message: &str);
    fn audio_device(&self) -> String;
    /// Replace the device list wholesale.
    fn populate_audio_device_menu(&self, devices: Vec<String>);
}

#[derive(Clone)]
pub struct SessionAdapter {
    audio_device: StringField,
    audio_devices: ListField,
    show_error: BoolField,
    error_message: StringField,
    queue: UiQueue,
}

impl SessionAdapter {
    pub fn new(reactor: &Arc<Reactor>, queue: &UiQueue) -> Self {
        Self {
            audio_device: StringField::new(reactor, String::new()),
            audio_devices: ListField::new(reactor, Vec::new()),
            show_error: BoolField::new(reactor, false),
            error_message: StringField::new(reactor, String::new()),
            queue: queue.clone(),
        }
    }

    pub fn audio_devices(&self) -> Vec<String> {
        self.audio_devices.get()
    }

    pub fn is_showing_error(&self) -> bool {
        self.show_error.get()
    }

    pub fn error_message(&self) -> String {
        self.error_message.get()
    }

    /// Pick a device from the current list, as the picker does.
    pub fn choose_audio_device(&self, label: &str) -> bool {
        let devices = self.audio_devices.get();
        self.audio_device.select_from(&devices, label)
    }
}

impl SessionUi for SessionAdapter {
    fn show_error_message(&self, message: &str) {
        tracing::info!(message, "engine reported an error");
        self.queue.assign(&self.error_message, message.to_string());
        self.queue.assign(&self.show_error, true);
    }

    fn audio_device(&self) -> String {
        self.audio_device.get()
    }

    fn populate_audio_device_menu(&self, devices: Vec<String>) {
        self.queue.assign(&self.audio_devices, devices);
    }
}

pub fn render(ui: &SessionAdapter) -> Vec<Node> {
    let mut nodes = vec![Node::picker(
        "Audio Device",
        ui.audio_devices.get(),
        &ui.audio_device,
    )];
    if ui.show_error.get() {
        let dismiss = ui.show_error.clone();
        nodes.push(Node::Modal {
            title: "Error".to_string(),
            message: ui.error_message.get(),
            buttons: vec![Button::new("OK", move || {
                dismiss.set(false);
            })
            .default_action()],
        });
    }
    nodes
}
