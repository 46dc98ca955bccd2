//! # Test Screen
//!
//! Trial controls shown for the whole test battery. The engine disables
//! "Play Trial" and "Exit Test" while it is busy; disabled buttons do not
//! dispatch, which is what keeps a double press from starting two trials.

use std::sync::Arc;

use crate::reactive::{BoolField, ObserverSlot, Reactor, StringField, UiQueue};
use crate::screens::Visibility;
use crate::ui::view::{Button, Node};

pub trait TestObserver: Send + Sync {
    fn exit_test(&self);
    fn play_trial(&self);
    fn accept_continuing_testing(&self) {}
    fn decline_continuing_testing(&self) {}
}

pub trait TestUi: Visibility {
    fn show_exit_test_button(&self);
    fn hide_exit_test_button(&self);
    fn show_next_trial_button(&self);
    fn hide_next_trial_button(&self);
    fn display(&self, text: &str);
    fn secondary_display(&self, text: &str);
    fn show_continue_testing_dialog(&self);
    fn hide_continue_testing_dialog(&self);
    fn set_continue_testing_dialog_message(&self, message: &str);
    /// Message for the subject, shown until dismissed.
    fn show_sheet(&self, message: &str);
    fn attach(&self, observer: &Arc<dyn TestObserver>);
}

#[derive(Clone)]
pub struct TestAdapter {
    showing: BoolField,
    exit_test_button_enabled: BoolField,
    next_trial_button_enabled: BoolField,
    display: StringField,
    secondary_display: StringField,
    continue_dialog_showing: BoolField,
    continue_dialog_message: StringField,
    sheet_showing: BoolField,
    sheet_message: StringField,
    observer: ObserverSlot<dyn TestObserver>,
    queue: UiQueue,
}

impl TestAdapter {
    pub fn new(reactor: &Arc<Reactor>, queue: &UiQueue) -> Self {
        Self {
            showing: BoolField::new(reactor, false),
            exit_test_button_enabled: BoolField::new(reactor, false),
            next_trial_button_enabled: BoolField::new(reactor, false),
            display: StringField::new(reactor, String::new()),
            secondary_display: StringField::new(reactor, String::new()),
            continue_dialog_showing: BoolField::new(reactor, false),
            continue_dialog_message: StringField::new(reactor, String::new()),
            sheet_showing: BoolField::new(reactor, false),
            sheet_message: StringField::new(reactor, String::new()),
            observer: ObserverSlot::new(),
            queue: queue.clone(),
        }
    }

    pub fn showing(&self) -> &BoolField {
        &self.showing
    }

    pub fn exit_test_button_enabled(&self) -> bool {
        self.exit_test_button_enabled.get()
    }

    pub fn next_trial_button_enabled(&self) -> bool {
        self.next_trial_button_enabled.get()
    }

    pub fn primary_display(&self) -> String {
        self.display.get()
    }

    pub fn secondary_display_text(&self) -> String {
        self.secondary_display.get()
    }

    pub fn is_continue_testing_dialog_showing(&self) -> bool {
        self.continue_dialog_showing.get()
    }
}

impl Visibility for TestAdapter {
    fn show(&self) {
        self.queue.assign(&self.showing, true);
    }

    fn hide(&self) {
        self.queue.assign(&self.showing, false);
    }
}

impl TestUi for TestAdapter {
    fn show_exit_test_button(&self) {
        self.queue.assign(&self.exit_test_button_enabled, true);
    }

    fn hide_exit_test_button(&self) {
        self.queue.assign(&self.exit_test_button_enabled, false);
    }

    fn show_next_trial_button(&self) {
        self.queue.assign(&self.next_trial_button_enabled, true);
    }

    fn hide_next_trial_button(&self) {
        self.queue.assign(&self.next_trial_button_enabled, false);
    }

    fn display(&self, text: &str) {
        self.queue.assign(&self.display, text.to_string());
    }

    fn secondary_display(&self, text: &str) {
        self.queue.assign(&self.secondary_display, text.to_string());
    }

    fn show_continue_testing_dialog(&self) {
        self.queue.assign(&self.continue_dialog_showing, true);
    }

    fn hide_continue_testing_dialog(&self) {
        self.queue.assign(&self.continue_dialog_showing, false);
    }

    fn set_continue_testing_dialog_message(&self, message: &str) {
        self.queue
            .assign(&self.continue_dialog_message, message.to_string());
    }

    fn show_sheet(&self, message: &str) {
        self.queue.assign(&self.sheet_message, message.to_string());
        self.queue.assign(&self.sheet_showing, true);
    }

    fn attach(&self, observer: &Arc<dyn TestObserver>) {
        self.observer.attach(observer);
    }
}

pub fn render(ui: &TestAdapter) -> Vec<Node> {
    let mut nodes = Vec::new();
    for text in [ui.display.get(), ui.secondary_display.get()] {
        if !text.is_empty() {
            nodes.push(Node::label(text));
        }
    }

    let exit = ui.observer.clone();
    let play = ui.observer.clone();
    nodes.push(Node::Row(vec![
        Node::Button(
            Button::new("Exit Test", move || {
                exit.notify("exit test", |o| o.exit_test());
            })
            .enabled(ui.exit_test_button_enabled.get()),
        ),
        Node::Button(
            Button::new("Play Trial", move || {
                play.notify("play trial", |o| o.play_trial());
            })
            .enabled(ui.next_trial_button_enabled.get())
            .default_action(),
        ),
    ]));

    if ui.continue_dialog_showing.get() {
        let accept = ui.observer.clone();
        let decline = ui.observer.clone();
        nodes.push(Node::Modal {
            title: "Continue testing?".to_string(),
            message: ui.continue_dialog_message.get(),
            buttons: vec![
                Button::new("Continue", move || {
                    accept.notify("accept continuing testing", |o| {
                        o.accept_continuing_testing();
                    });
                })
                .default_action(),
                Button::new("Exit", move || {
                    decline.notify("decline continuing testing", |o| {
                        o.decline_continuing_testing();
                    });
                }),
            ],
        });
    }

    if ui.sheet_showing.get() {
        let dismiss = ui.sheet_showing.clone();
        nodes.push(Node::Modal {
            title: String::new(),
            message: ui.sheet_message.get(),
            buttons: vec![Button::new("OK", move || {
                dismiss.set(false);
            })
            .default_action()],
        });
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::ScreenId;
    use crate::ui::view::ScreenView;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<&'static str>>,
    }

    impl Recorder {
        fn push(&self, event: &'static str) {
            self.events.lock().expect("events").push(event);
        }

        fn events(&self) -> Vec<&'static str> {
            self.events.lock().expect("events").clone()
        }
    }

    impl TestObserver for Recorder {
        fn exit_test(&self) {
            self.push("exit");
        }

        fn play_trial(&self) {
            self.push("play");
        }

        fn accept_continuing_testing(&self) {
            self.push("accept");
        }
    }

    fn setup() -> (TestAdapter, Arc<Recorder>) {
        let ui = TestAdapter::new(&Reactor::new(), &UiQueue::new());
        let recorder = Arc::new(Recorder::default());
        let observer: Arc<dyn TestObserver> = recorder.clone();
        ui.attach(&observer);
        (ui, recorder)
    }

    fn view(ui: &TestAdapter) -> ScreenView {
        ScreenView {
            screen: ScreenId::Test,
            nodes: render(ui),
        }
    }

    #[test]
    fn test_disabled_buttons_do_not_dispatch() {
        let (ui, recorder) = setup();
        let view = view(&ui);
        assert!(!view.button("Play Trial").expect("play").press());
        assert!(!view.button("Exit Test").expect("exit").press());
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_enabled_buttons_dispatch_every_press() {
        let (ui, recorder) = setup();
        ui.show_next_trial_button();
        ui.show_exit_test_button();
        let view = view(&ui);
        let play = view.button("Play Trial").expect("play");
        play.press();
        play.press();
        view.button("Exit Test").expect("exit").press();
        assert_eq!(recorder.events(), vec!["play", "play", "exit"]);
    }

    #[test]
    fn test_hiding_next_trial_button_guards_redundant_presses() {
        let (ui, recorder) = setup();
        ui.show_next_trial_button();
        view(&ui).button("Play Trial").expect("play").press();

        ui.hide_next_trial_button();
        view(&ui).button("Play Trial").expect("play").press();
        assert_eq!(recorder.events(), vec!["play"]);
    }

    #[test]
    fn test_display_texts_render_as_labels() {
        let (ui, _recorder) = setup();
        ui.display("Trial 3");
        ui.secondary_display("SNR 4 dB");
        assert_eq!(ui.primary_display(), "Trial 3");
        assert_eq!(ui.secondary_display_text(), "SNR 4 dB");
        let nodes = render(&ui);
        assert!(matches!(&nodes[0], Node::Label(text) if text == "Trial 3"));
        assert!(matches!(&nodes[1], Node::Label(text) if text == "SNR 4 dB"));
    }

    #[test]
    fn test_continue_testing_dialog() {
        let (ui, recorder) = setup();
        ui.set_continue_testing_dialog_message("Block 1 finished.");
        ui.show_continue_testing_dialog();
        let view = view(&ui);
        let (_, message, _) = view.modals().next().expect("dialog");
        assert_eq!(message, "Block 1 finished.");

        view.button("Continue").expect("continue").press();
        // Observers that ignore the dialog answers still compile and work.
        view.button("Exit").expect("exit").press();
        assert_eq!(recorder.events(), vec!["accept"]);

        ui.hide_continue_testing_dialog();
        assert!(!ui.is_continue_testing_dialog_showing());
    }

    #[test]
    fn test_sheet_is_dismissed_locally() {
        let (ui, _recorder) = setup();
        ui.show_sheet("Test complete");
        let view = view(&ui);
        view.button("OK").expect("ok").press();
        assert!(view_has_no_modal(&ui));
    }

    fn view_has_no_modal(ui: &TestAdapter) -> bool {
        view(ui).modals().next().is_none()
    }
}
