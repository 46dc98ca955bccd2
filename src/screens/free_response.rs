//! Free-text response entry with a "flagged" marker for trials the tester
//! wants to revisit.

use std::sync::Arc;

use crate::reactive::{BoolField, ObserverSlot, Reactor, StringField, UiQueue};
use crate::screens::Visibility;
use crate::ui::view::{Button, Node};

pub trait FreeResponseObserver: Send + Sync {
    fn notify_that_submit_button_has_been_clicked(&self);
}

pub trait FreeResponseUi: Visibility {
    fn free_response(&self) -> String;
    fn flagged(&self) -> bool;
    fn clear_free_response(&self);
    fn clear_flag(&self);
    fn attach(&self, observer: &Arc<dyn FreeResponseObserver>);
}

#[derive(Clone)]
pub struct FreeResponseAdapter {
    showing: BoolField,
    free_response: StringField,
    flagged: BoolField,
    observer: ObserverSlot<dyn FreeResponseObserver>,
    queue: UiQueue,
}

impl FreeResponseAdapter {
    pub fn new(reactor: &Arc<Reactor>, queue: &UiQueue) -> Self {
        Self {
            showing: BoolField::new(reactor, false),
            free_response: StringField::new(reactor, String::new()),
            flagged: BoolField::new(reactor, false),
            observer: ObserverSlot::new(),
            queue: queue.clone(),
        }
    }

    pub fn showing(&self) -> &BoolField {
        &self.showing
    }

    pub fn free_response_field(&self) -> &StringField {
        &self.free_response
    }

    pub fn flagged_field(&self) -> &BoolField {
        &self.flagged
    }
}

impl Visibility for FreeResponseAdapter {
    fn show(&self) {
        self.queue.assign(&self.showing, true);
    }

    fn hide(&self) {
        self.queue.assign(&self.showing, false);
    }
}

impl FreeResponseUi for FreeResponseAdapter {
    fn free_response(&self) -> String {
        self.free_response.get()
    }

    fn flagged(&self) -> bool {
        self.flagged.get()
    }

    fn clear_free_response(&self) {
        self.queue.assign(&self.free_response, String::new());
    }

    fn clear_flag(&self) {
        self.queue.assign(&self.flagged, false);
    }

    fn attach(&self, observer: &Arc<dyn FreeResponseObserver>) {
        self.observer.attach(observer);
    }
}

pub fn render(ui: &FreeResponseAdapter) -> Vec<Node> {
    let submit = ui.observer.clone();
    vec![
        Node::toggle("flagged", &ui.flagged),
        Node::text_field("response", &ui.free_response),
        Node::Button(
            Button::new("Submit", move || {
                submit.notify("submit free response", |o| {
                    o.notify_that_submit_button_has_been_clicked();
                });
            })
            .default_action(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::ScreenId;
    use crate::ui::view::ScreenView;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Submits(AtomicUsize);

    impl FreeResponseObserver for Submits {
        fn notify_that_submit_button_has_been_clicked(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_submit_reads_typed_response() {
        let ui = FreeResponseAdapter::new(&Reactor::new(), &UiQueue::new());
        let submits = Arc::new(Submits::default());
        let observer: Arc<dyn FreeResponseObserver> = submits.clone();
        ui.attach(&observer);

        ui.free_response_field().set("the boy ran home".to_string());
        ui.flagged_field().set(true);
        let view = ScreenView {
            screen: ScreenId::FreeResponse,
            nodes: render(&ui),
        };
        assert_eq!(view.default_button().map(|b| b.label.as_str()), Some("Submit"));
        view.default_button().expect("submit").press();

        assert_eq!(submits.0.load(Ordering::SeqCst), 1);
        assert_eq!(ui.free_response(), "the boy ran home");
        assert!(ui.flagged());
    }

    #[test]
    fn test_clear_resets_response_and_flag() {
        let ui = FreeResponseAdapter::new(&Reactor::new(), &UiQueue::new());
        ui.free_response_field().set("anything".to_string());
        ui.flagged_field().set(true);
        ui.clear_free_response();
        ui.clear_flag();
        assert_eq!(ui.free_response(), "");
        assert!(!ui.flagged());
    }

    #[test]
    fn test_show_then_hide_ends_hidden() {
        let ui = FreeResponseAdapter::new(&Reactor::new(), &UiQueue::new());
        ui.show();
        ui.hide();
        assert!(!ui.showing().get());
    }
}
