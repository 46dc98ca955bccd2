//! Two-button pass/fail scoring of the subject's spoken response.

use std::sync::Arc;

use crate::reactive::{BoolField, ObserverSlot, Reactor, UiQueue};
use crate::screens::Visibility;
use crate::ui::view::{Button, Node, Tone};

pub trait PassFailObserver: Send + Sync {
    fn notify_that_incorrect_button_has_been_clicked(&self);
    fn notify_that_correct_button_has_been_clicked(&self);
}

pub trait PassFailUi: Visibility {
    fn attach(&self, observer: &Arc<dyn PassFailObserver>);
}

#[derive(Clone)]
pub struct PassFailAdapter {
    showing: BoolField,
    observer: ObserverSlot<dyn PassFailObserver>,
    queue: UiQueue,
}

impl PassFailAdapter {
    pub fn new(reactor: &Arc<Reactor>, queue: &UiQueue) -> Self {
        Self {
            showing: BoolField::new(reactor, false),
            observer: ObserverSlot::new(),
            queue: queue.clone(),
        }
    }

    pub fn showing(&self) -> &BoolField {
        &self.showing
    }
}

impl Visibility for PassFailAdapter {
    fn show(&self) {
        self.queue.assign(&self.showing, true);
    }

    fn hide(&self) {
        self.queue.assign(&self.showing, false);
    }
}

impl PassFailUi for PassFailAdapter {
    fn attach(&self, observer: &Arc<dyn PassFailObserver>) {
        self.observer.attach(observer);
    }
}

pub fn render(ui: &PassFailAdapter) -> Vec<Node> {
    let incorrect = ui.observer.clone();
    let correct = ui.observer.clone();
    vec![Node::Row(vec![
        Node::Button(
            Button::new("Incorrect", move || {
                incorrect.notify("incorrect", |o| {
                    o.notify_that_incorrect_button_has_been_clicked();
                });
            })
            .tone(Tone::Negative),
        ),
        Node::Button(
            Button::new("Correct", move || {
                correct.notify("correct", |o| {
                    o.notify_that_correct_button_has_been_clicked();
                });
            })
            .tone(Tone::Positive),
        ),
    ])]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::ScreenId;
    use crate::ui::view::ScreenView;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Scores(Mutex<Vec<bool>>);

    impl PassFailObserver for Scores {
        fn notify_that_incorrect_button_has_been_clicked(&self) {
            self.0.lock().expect("scores").push(false);
        }

        fn notify_that_correct_button_has_been_clicked(&self) {
            self.0.lock().expect("scores").push(true);
        }
    }

    #[test]
    fn test_double_click_dispatches_twice() {
        let ui = PassFailAdapter::new(&Reactor::new(), &UiQueue::new());
        let scores = Arc::new(Scores::default());
        let observer: Arc<dyn PassFailObserver> = scores.clone();
        ui.attach(&observer);

        let view = ScreenView {
            screen: ScreenId::PassFail,
            nodes: render(&ui),
        };
        let correct = view.button("Correct").expect("correct");
        correct.press();
        correct.press();
        view.button("Incorrect").expect("incorrect").press();
        assert_eq!(*scores.0.lock().expect("scores"), vec![true, true, false]);
    }

    #[test]
    fn test_no_default_button() {
        let ui = PassFailAdapter::new(&Reactor::new(), &UiQueue::new());
        let view = ScreenView {
            screen: ScreenId::PassFail,
            nodes: render(&ui),
        };
        assert!(view.default_button().is_none());
    }
}
