//! # Test Setup Screen
//!
//! The form the tester fills in before a run. Its visibility field also
//! decides which half of the window is shown (see
//! [`WindowComposer`](crate::ui::WindowComposer)).
//!
//! The settings-file path and RME setting are opaque strings carried to the
//! engine untouched.

use std::sync::Arc;

use crate::reactive::{BoolField, ListField, ObserverSlot, Reactor, StringField, UiQueue};
use crate::screens::Visibility;
use crate::ui::view::{Button, Node};

pub trait TestSetupObserver: Send + Sync {
    fn notify_that_confirm_button_has_been_clicked(&self);
    fn notify_that_play_calibration_button_has_been_clicked(&self);
}

/// Contract the engine uses to read and drive the Test Setup screen.
pub trait TestSetupUi: Visibility {
    fn tester_id(&self) -> String;
    fn subject_id(&self) -> String;
    fn session(&self) -> String;
    fn starting_snr(&self) -> String;
    fn transducer(&self) -> String;
    fn rme_setting(&self) -> String;
    fn test_settings_file(&self) -> String;
    fn set_test_settings_file(&self, path: &str);
    /// Replace the transducer list wholesale.
    fn populate_transducer_menu(&self, transducers: Vec<String>);
    fn attach(&self, observer: &Arc<dyn TestSetupObserver>);
}

#[derive(Clone)]
pub struct TestSetupAdapter {
    showing: BoolField,
    tester_id: StringField,
    subject_id: StringField,
    session: StringField,
    starting_snr: StringField,
    transducer: StringField,
    rme_setting: StringField,
    transducers: ListField,
    test_settings_file: StringField,
    observer: ObserverSlot<dyn TestSetupObserver>,
    queue: UiQueue,
}

impl TestSetupAdapter {
    pub fn new(reactor: &Arc<Reactor>, queue: &UiQueue) -> Self {
        let text = || StringField::new(reactor, String::new());
        Self {
            showing: BoolField::new(reactor, true),
            tester_id: text(),
            subject_id: text(),
            session: text(),
            starting_snr: text(),
            transducer: text(),
            rme_setting: text(),
            transducers: ListField::new(reactor, Vec::new()),
            test_settings_file: text(),
            observer: ObserverSlot::new(),
            queue: queue.clone(),
        }
    }

    pub fn showing(&self) -> &BoolField {
        &self.showing
    }

    pub fn transducers(&self) -> Vec<String> {
        self.transducers.get()
    }

    /// Field handles the renderer binds to; also how tests type into them.
    pub fn tester_id_field(&self) -> &StringField {
        &self.tester_id
    }

    pub fn subject_id_field(&self) -> &StringField {
        &self.subject_id
    }

    pub fn session_field(&self) -> &StringField {
        &self.session
    }

    pub fn starting_snr_field(&self) -> &StringField {
        &self.starting_snr
    }

    pub fn rme_setting_field(&self) -> &StringField {
        &self.rme_setting
    }

    pub fn choose_transducer(&self, label: &str) -> bool {
        let transducers = self.transducers.get();
        self.transducer.select_from(&transducers, label)
    }
}

impl Visibility for TestSetupAdapter {
    fn show(&self) {
        self.queue.assign(&self.showing, true);
    }

    fn hide(&self) {
        self.queue.assign(&self.showing, false);
    }
}

impl TestSetupUi for TestSetupAdapter {
    fn tester_id(&self) -> String {
        self.tester_id.get()
    }

    fn subject_id(&self) -> String {
        self.subject_id.get()
    }

    fn session(&self) -> String {
        self.session.get()
    }

    fn starting_snr(&self) -> String {
        self.starting_snr.get()
    }

    fn transducer(&self) -> String {
        self.transducer.get()
    }

    fn rme_setting(&self) -> String {
        self.rme_setting.get()
    }

    fn test_settings_file(&self) -> String {
        self.test_settings_file.get()
    }

    fn set_test_settings_file(&self, path: &str) {
        self.queue.assign(&self.test_settings_file, path.to_string());
    }

    fn populate_transducer_menu(&self, transducers: Vec<String>) {
        self.queue.assign(&self.transducers, transducers);
    }

    fn attach(&self, observer: &Arc<dyn TestSetupObserver>) {
        self.observer.attach(observer);
    }
}

pub fn render(ui: &TestSetupAdapter) -> Vec<Node> {
    let calibrate = ui.observer.clone();
    let confirm = ui.observer.clone();
    vec![
        Node::text_field("subject ID", &ui.subject_id),
        Node::text_field("tester ID", &ui.tester_id),
        Node::text_field("session", &ui.session),
        Node::text_field("RME setting", &ui.rme_setting),
        Node::picker("Transducer", ui.transducers.get(), &ui.transducer),
        Node::Row(vec![
            Node::text_field("test settings file", &ui.test_settings_file),
            Node::Button(Button::new("Play Calibration", move || {
                calibrate.notify("play calibration", |o| {
                    o.notify_that_play_calibration_button_has_been_clicked();
                });
            })),
        ]),
        Node::text_field("starting SNR (dB)", &ui.starting_snr),
        Node::Button(
            Button::new("Confirm", move || {
                confirm.notify("confirm", |o| {
                    o.notify_that_confirm_button_has_been_clicked();
                });
            })
            .default_action(),
        ),
    ]
}
