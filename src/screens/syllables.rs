//! # Syllables Screen
//!
//! A fixed grid of consonant syllables. Clicking a cell records it as the
//! selection and then reports it to the observer, so the observer can read
//! either the argument or [`SyllablesUi::syllable`] and see the same label.

use std::sync::Arc;

use crate::reactive::{BoolField, ObserverSlot, Reactor, StringField, UiQueue};
use crate::screens::Visibility;
use crate::ui::view::{Button, Node};

/// Grid cells, row by row.
pub const SYLLABLE_GRID: [[&str; 7]; 3] = [
    ["B", "D", "G", "F", "Ghee", "H", "Yee"],
    ["K", "L", "M", "N", "P", "R", "Sh"],
    ["S", "Th", "T", "Ch", "V", "W", "Z"],
];

pub trait SyllablesObserver: Send + Sync {
    fn notify_that_response_button_has_been_clicked(&self, syllable: &str);
}

pub trait SyllablesUi: Visibility {
    fn syllable(&self) -> String;
    fn flagged(&self) -> bool;
    fn clear_flag(&self);
    fn attach(&self, observer: &Arc<dyn SyllablesObserver>);
}

#[derive(Clone)]
pub struct SyllablesAdapter {
    showing: BoolField,
    syllable: StringField,
    flagged: BoolField,
    observer: ObserverSlot<dyn SyllablesObserver>,
    queue: UiQueue,
}

impl SyllablesAdapter {
    pub fn new(reactor: &Arc<Reactor>, queue: &UiQueue) -> Self {
        Self {
            showing: BoolField::new(reactor, false),
            syllable: StringField::new(reactor, String::new()),
            flagged: BoolField::new(reactor, false),
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
}

impl Visibility for SyllablesAdapter {
    fn show(&self) {
        self.queue.assign(&self.showing, true);
    }

    fn hide(&self) {
        self.queue.assign(&self.showing, false);
    }
}

impl SyllablesUi for SyllablesAdapter {
    fn syllable(&self) -> String {
        self.syllable.get()
    }

    fn flagged(&self) -> bool {
        self.flagged.get()
    }

    fn clear_flag(&self) {
        self.queue.assign(&self.flagged, false);
    }

    fn attach(&self, observer: &Arc<dyn SyllablesObserver>) {
        self.observer.attach(observer);
    }
}

pub fn render(ui: &SyllablesAdapter) -> Vec<Node> {
    let mut nodes = vec![Node::toggle("flagged", &ui.flagged)];
    for row in SYLLABLE_GRID {
        let cells = row
            .iter()
            .map(|&label| {
                let selection = ui.syllable.clone();
                let observer = ui.observer.clone();
                Node::Button(Button::new(label, move || {
                    selection.set(label.to_string());
                    observer.notify("syllable response", |o| {
                        o.notify_that_response_button_has_been_clicked(label);
                    });
                }))
            })
            .collect();
        nodes.push(Node::Row(cells));
    }
    nodes
}
