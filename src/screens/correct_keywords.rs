//! Count-of-correct-keywords entry. The count is carried as typed; parsing
//! it is the engine's business.

use std::sync::Arc;

use crate::reactive::{BoolField, ObserverSlot, Reactor, StringField, UiQueue};
use crate::screens::Visibility;
use crate::ui::view::{Button, Node};

pub trait CorrectKeywordsObserver: Send + Sync {
    fn notify_that_submit_button_has_been_clicked(&self);
}

pub trait CorrectKeywordsUi: Visibility {
    fn correct_keywords(&self) -> String;
    fn attach(&self, observer: &Arc<dyn CorrectKeywordsObserver>);
}

#[derive(Clone)]
pub struct CorrectKeywordsAdapter {
    showing: BoolField,
    correct_keywords: StringField,
    observer: ObserverSlot<dyn CorrectKeywordsObserver>,
    queue: UiQueue,
}

impl CorrectKeywordsAdapter {
    pub fn new(reactor: &Arc<Reactor>, queue: &UiQueue) -> Self {
        Self {
            showing: BoolField::new(reactor, false),
            correct_keywords: StringField::new(reactor, String::new()),
            observer: ObserverSlot::new(),
            queue: queue.clone(),
        }
    }

    pub fn showing(&self) -> &BoolField {
        &self.showing
    }

    pub fn correct_keywords_field(&self) -> &StringField {
        &self.correct_keywords
    }
}

impl Visibility for CorrectKeywordsAdapter {
    fn show(&self) {
        self.queue.assign(&self.showing, true);
    }

    fn hide(&self) {
        self.queue.assign(&self.showing, false);
    }
}

impl CorrectKeywordsUi for CorrectKeywordsAdapter {
    fn correct_keywords(&self) -> String {
        self.correct_keywords.get()
    }

    fn attach(&self, observer: &Arc<dyn CorrectKeywordsObserver>) {
        self.observer.attach(observer);
    }
}

pub fn render(ui: &CorrectKeywordsAdapter) -> Vec<Node> {
    let submit = ui.observer.clone();
    vec![
        Node::text_field("# keywords correct", &ui.correct_keywords),
        Node::Button(
            Button::new("Submit", move || {
                submit.notify("submit keyword count", |o| {
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

    impl CorrectKeywordsObserver for Submits {
        fn notify_that_submit_button_has_been_clicked(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_count_is_kept_as_typed() {
        let ui = CorrectKeywordsAdapter::new(&Reactor::new(), &UiQueue::new());
        ui.correct_keywords_field().set("two".to_string());
        assert_eq!(ui.correct_keywords(), "two");
    }

    #[test]
    fn test_submit_without_observer_is_silent() {
        let ui = CorrectKeywordsAdapter::new(&Reactor::new(), &UiQueue::new());
        let view = ScreenView {
            screen: ScreenId::CorrectKeywords,
            nodes: render(&ui),
        };
        assert!(view.button("Submit").expect("submit").press());

        let submits = Arc::new(Submits::default());
        let observer: Arc<dyn CorrectKeywordsObserver> = submits.clone();
        ui.attach(&observer);
        // The handler reaches an observer attached after the view was built.
        view.button("Submit").expect("submit").press();
        assert_eq!(submits.0.load(Ordering::SeqCst), 1);
    }
}
