//! # Choose Keywords Screen
//!
//! A sentence laid out as text spans around three keyword buttons:
//!
//! ```text
//! <preceding> [first] <after first> [second] <after second> [third] <after third>
//! ```
//!
//! The engine owns the correctness marks; each keyword button is drawn with
//! its mark so the tester sees what will be submitted.

use std::sync::Arc;

use crate::reactive::{BoolField, ObserverSlot, Reactor, StringField, UiQueue};
use crate::screens::Visibility;
use crate::ui::view::{Button, Node, Tone};

pub trait ChooseKeywordsObserver: Send + Sync {
    fn notify_that_first_keyword_button_is_clicked(&self);
    fn notify_that_second_keyword_button_is_clicked(&self);
    fn notify_that_third_keyword_button_is_clicked(&self);
    fn notify_that_reset_button_is_clicked(&self);
    fn notify_that_all_wrong_button_has_been_clicked(&self);
    fn notify_that_submit_button_has_been_clicked(&self);
}

pub trait ChooseKeywordsUi: Visibility {
    fn first_keyword_correct(&self) -> bool;
    fn second_keyword_correct(&self) -> bool;
    fn third_keyword_correct(&self) -> bool;
    fn flagged(&self) -> bool;
    fn clear_flag(&self);
    fn mark_first_keyword_correct(&self);
    fn mark_second_keyword_correct(&self);
    fn mark_third_keyword_correct(&self);
    fn mark_first_keyword_incorrect(&self);
    fn mark_second_keyword_incorrect(&self);
    fn mark_third_keyword_incorrect(&self);
    fn set_first_keyword_button_text(&self, text: &str);
    fn set_second_keyword_button_text(&self, text: &str);
    fn set_third_keyword_button_text(&self, text: &str);
    fn set_text_preceding_first_keyword_button(&self, text: &str);
    fn set_text_following_first_keyword_button(&self, text: &str);
    fn set_text_following_second_keyword_button(&self, text: &str);
    fn set_text_following_third_keyword_button(&self, text: &str);
    fn attach(&self, observer: &Arc<dyn ChooseKeywordsObserver>);
}

/// One keyword button: its label and its correctness mark.
#[derive(Clone)]
struct Keyword {
    text: StringField,
    correct: BoolField,
}

impl Keyword {
    fn new(reactor: &Arc<Reactor>) -> Self {
        Self {
            text: StringField::new(reactor, String::new()),
            correct: BoolField::new(reactor, false),
        }
    }
}

#[derive(Clone)]
pub struct ChooseKeywordsAdapter {
    showing: BoolField,
    flagged: BoolField,
    keywords: [Keyword; 3],
    preceding_text: StringField,
    following_text: [StringField; 3],
    observer: ObserverSlot<dyn ChooseKeywordsObserver>,
    queue: UiQueue,
}

impl ChooseKeywordsAdapter {
    pub fn new(reactor: &Arc<Reactor>, queue: &UiQueue) -> Self {
        let text = || StringField::new(reactor, String::new());
        Self {
            showing: BoolField::new(reactor, false),
            flagged: BoolField::new(reactor, false),
            keywords: [
                Keyword::new(reactor),
                Keyword::new(reactor),
                Keyword::new(reactor),
            ],
            preceding_text: text(),
            following_text: [text(), text(), text()],
            observer: ObserverSlot::new(),
            queue: queue.clone(),
        }
    }

    pub fn showing(&self) -> &BoolField {
        &self.showing
    }

    pub fn flagged_field(&self) -> &BoolField {
        &self.flagged
    }

    fn mark(&self, index: usize, correct: bool) {
        self.queue.assign(&self.keywords[index].correct, correct);
    }

    fn set_keyword_text(&self, index: usize, text: &str) {
        self.queue
            .assign(&self.keywords[index].text, text.to_string());
    }
}

impl Visibility for ChooseKeywordsAdapter {
    fn show(&self) {
        self.queue.assign(&self.showing, true);
    }

    fn hide(&self) {
        self.queue.assign(&self.showing, false);
    }
}

impl ChooseKeywordsUi for ChooseKeywordsAdapter {
    fn first_keyword_correct(&self) -> bool {
        self.keywords[0].correct.get()
    }

    fn second_keyword_correct(&self) -> bool {
        self.keywords[1].correct.get()
    }

    fn third_keyword_correct(&self) -> bool {
        self.keywords[2].correct.get()
    }

    fn flagged(&self) -> bool {
        self.flagged.get()
    }

    fn clear_flag(&self) {
        self.queue.assign(&self.flagged, false);
    }

    fn mark_first_keyword_correct(&self) {
        self.mark(0, true);
    }

    fn mark_second_keyword_correct(&self) {
        self.mark(1, true);
    }

    fn mark_third_keyword_correct(&self) {
        self.mark(2, true);
    }

    fn mark_first_keyword_incorrect(&self) {
        self.mark(0, false);
    }

    fn mark_second_keyword_incorrect(&self) {
        self.mark(1, false);
    }

    fn mark_third_keyword_incorrect(&self) {
        self.mark(2, false);
    }

    fn set_first_keyword_button_text(&self, text: &str) {
        self.set_keyword_text(0, text);
    }

    fn set_second_keyword_button_text(&self, text: &str) {
        self.set_keyword_text(1, text);
    }

    fn set_third_keyword_button_text(&self, text: &str) {
        self.set_keyword_text(2, text);
    }

    fn set_text_preceding_first_keyword_button(&self, text: &str) {
        self.queue.assign(&self.preceding_text, text.to_string());
    }

    fn set_text_following_first_keyword_button(&self, text: &str) {
        self.queue.assign(&self.following_text[0], text.to_string());
    }

    fn set_text_following_second_keyword_button(&self, text: &str) {
        self.queue.assign(&self.following_text[1], text.to_string());
    }

    fn set_text_following_third_keyword_button(&self, text: &str) {
        self.queue.assign(&self.following_text[2], text.to_string());
    }

    fn attach(&self, observer: &Arc<dyn ChooseKeywordsObserver>) {
        self.observer.attach(observer);
    }
}

type Notify = fn(&(dyn ChooseKeywordsObserver + 'static));

const KEYWORD_EVENTS: [(&str, Notify); 3] = [
    ("first keyword", |o| o.notify_that_first_keyword_button_is_clicked()),
    ("second keyword", |o| o.notify_that_second_keyword_button_is_clicked()),
    ("third keyword", |o| o.notify_that_third_keyword_button_is_clicked()),
];

fn event_button(
    ui: &ChooseKeywordsAdapter,
    label: impl Into<String>,
    event: &'static str,
    notify: Notify,
) -> Button {
    let observer = ui.observer.clone();
    Button::new(label, move || {
        observer.notify(event, notify);
    })
}

pub fn render(ui: &ChooseKeywordsAdapter) -> Vec<Node> {
    let mut sentence = vec![Node::label(ui.preceding_text.get())];
    for ((keyword, following), (event, notify)) in ui
        .keywords
        .iter()
        .zip(&ui.following_text)
        .zip(KEYWORD_EVENTS)
    {
        let tone = if keyword.correct.get() {
            Tone::Positive
        } else {
            Tone::Negative
        };
        sentence.push(Node::Button(
            event_button(ui, keyword.text.get(), event, notify).tone(tone),
        ));
        sentence.push(Node::label(following.get()));
    }

    vec![
        Node::toggle("flagged", &ui.flagged),
        Node::Row(sentence),
        Node::Row(vec![
            Node::Button(event_button(ui, "Reset", "reset keywords", |o| {
                o.notify_that_reset_button_is_clicked();
            })),
            Node::Button(event_button(ui, "All wrong", "all keywords wrong", |o| {
                o.notify_that_all_wrong_button_has_been_clicked();
            })),
            Node::Button(
                event_button(ui, "Submit", "submit keywords", |o| {
                    o.notify_that_submit_button_has_been_clicked();
                })
                .default_action(),
            ),
        ]),
    ]
}
