//! # View Tree
//!
//! The declarative output of a screen renderer. Renderers build a fresh
//! `Vec<Node>` from their adapter's fields; the window composer groups those
//! into [`ScreenView`]s; [`render`](super::render) draws them and
//! [`App`](super::App) routes keys to the interactive nodes.
//!
//! Bound controls carry a handle to the field they edit, so user input writes
//! straight through to the adapter.

use std::fmt;
use std::rc::Rc;

use crate::reactive::{BoolField, StringField};
use crate::screens::ScreenId;

/// Click handler. Handlers capture the adapter's observer slot, not the
/// observer, so they always reach whichever observer is attached now.
pub type Action = Rc<dyn Fn()>;

/// Emphasis for buttons that carry a correct/incorrect mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Normal,
    Positive,
    Negative,
}

#[derive(Clone)]
pub struct Button {
    pub label: String,
    pub enabled: bool,
    /// Pressed by `Enter` from any other control of the same screen.
    pub default: bool,
    pub tone: Tone,
    pub on_press: Action,
}

impl Button {
    pub fn new(label: impl Into<String>, on_press: impl Fn() + 'static) -> Self {
        Self {
            label: label.into(),
            enabled: true,
            default: false,
            tone: Tone::Normal,
            on_press: Rc::new(on_press),
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn default_action(mut self) -> Self {
        self.default = true;
        self
    }

    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    /// Invoke the handler unless the button is disabled.
    pub fn press(&self) -> bool {
        if !self.enabled {
            tracing::debug!(label = %self.label, "ignoring press on disabled button");
            return false;
        }
        (self.on_press)();
        true
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("label", &self.label)
            .field("enabled", &self.enabled)
            .field("default", &self.default)
            .field("tone", &self.tone)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum Node {
    Label(String),
    TextField {
        label: String,
        value: String,
        binding: StringField,
    },
    Toggle {
        label: String,
        on: bool,
        binding: BoolField,
    },
    Picker {
        label: String,
        options: Vec<String>,
        selected: String,
        binding: StringField,
    },
    Button(Button),
    Row(Vec<Node>),
    /// Overlay that captures focus until one of its buttons closes it.
    Modal {
        title: String,
        message: String,
        buttons: Vec<Button>,
    },
}

impl Node {
    pub fn label(text: impl Into<String>) -> Self {
        Node::Label(text.into())
    }

    pub fn text_field(label: impl Into<String>, binding: &StringField) -> Self {
        Node::TextField {
            label: label.into(),
            value: binding.get(),
            binding: binding.clone(),
        }
    }

    pub fn toggle(label: impl Into<String>, binding: &BoolField) -> Self {
        Node::Toggle {
            label: label.into(),
            on: binding.get(),
            binding: binding.clone(),
        }
    }

    pub fn picker(label: impl Into<String>, options: Vec<String>, binding: &StringField) -> Self {
        Node::Picker {
            label: label.into(),
            options,
            selected: binding.get(),
            binding: binding.clone(),
        }
    }

    fn is_interactive(&self) -> bool {
        matches!(
            self,
            Node::TextField { .. } | Node::Toggle { .. } | Node::Picker { .. } | Node::Button(_)
        )
    }

    /// Depth-first walk over interactive nodes, skipping modals.
    fn collect_controls<'a>(&'a self, screen: ScreenId, out: &mut Vec<Control<'a>>) {
        match self {
            Node::Row(children) => {
                for child in children {
                    child.collect_controls(screen, out);
                }
            }
            node if node.is_interactive() => out.push(Control {
                screen,
                widget: Widget::Node(node),
            }),
            _ => {}
        }
    }
}

/// What a focusable control points at.
#[derive(Debug, Clone, Copy)]
pub enum Widget<'a> {
    Node(&'a Node),
    ModalButton(&'a Button),
}

/// One focusable control together with the screen it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct Control<'a> {
    pub screen: ScreenId,
    pub widget: Widget<'a>,
}

impl<'a> Control<'a> {
    /// The button behind this control, if it is one.
    pub fn button(&self) -> Option<&'a Button> {
        match self.widget {
            Widget::Node(Node::Button(button)) | Widget::ModalButton(button) => Some(button),
            Widget::Node(_) => None,
        }
    }

    /// Whether this control is `node`.
    pub fn is_node(&self, node: &Node) -> bool {
        matches!(self.widget, Widget::Node(own) if std::ptr::eq(own, node))
    }

    /// Whether this control is `button`.
    pub fn is_button(&self, button: &Button) -> bool {
        self.button().is_some_and(|own| std::ptr::eq(own, button))
    }
}

/// The rendered output of one mounted screen.
#[derive(Debug, Clone)]
pub struct ScreenView {
    pub screen: ScreenId,
    pub nodes: Vec<Node>,
}

impl ScreenView {
    pub fn title(&self) -> &'static str {
        self.screen.title()
    }

    /// Modals at the top level of this screen.
    pub fn modals(&self) -> impl Iterator<Item = (&str, &str, &[Button])> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Modal {
                title,
                message,
                buttons,
            } => Some((title.as_str(), message.as_str(), buttons.as_slice())),
            _ => None,
        })
    }

    /// The first enabled default button of this screen.
    pub fn default_button(&self) -> Option<&Button> {
        let mut controls = Vec::new();
        for node in &self.nodes {
            node.collect_controls(self.screen, &mut controls);
        }
        controls
            .into_iter()
            .filter_map(|control| control.button())
            .find(|button| button.default && button.enabled)
    }

    /// Find a button by label anywhere in the screen, modals included.
    pub fn button(&self, label: &str) -> Option<&Button> {
        fn find<'a>(nodes: &'a [Node], label: &str) -> Option<&'a Button> {
            nodes.iter().find_map(|node| match node {
                Node::Button(button) if button.label == label => Some(button),
                Node::Row(children) => find(children, label),
                Node::Modal { buttons, .. } => buttons.iter().find(|b| b.label == label),
                _ => None,
            })
        }
        find(&self.nodes, label)
    }
}

/// Everything the window shows in one frame.
#[derive(Debug, Clone, Default)]
pub struct WindowView {
    pub screens: Vec<ScreenView>,
}

impl WindowView {
    pub fn screen(&self, id: ScreenId) -> Option<&ScreenView> {
        self.screens.iter().find(|view| view.screen == id)
    }

    pub fn is_mounted(&self, id: ScreenId) -> bool {
        self.screen(id).is_some()
    }

    /// Whether any mounted screen shows a modal.
    pub fn has_modal(&self) -> bool {
        self.screens.iter().any(|view| view.modals().next().is_some())
    }

    /// Focusable controls in traversal order. While a modal is open only its
    /// buttons can take focus.
    pub fn controls(&self) -> Vec<Control<'_>> {
        let mut modal = Vec::new();
        for view in &self.screens {
            for (_, _, buttons) in view.modals() {
                modal.extend(buttons.iter().map(|button| Control {
                    screen: view.screen,
                    widget: Widget::ModalButton(button),
                }));
            }
        }
        if !modal.is_empty() {
            return modal;
        }
        let mut out = Vec::new();
        for view in &self.screens {
            for node in &view.nodes {
                node.collect_controls(view.screen, &mut out);
            }
        }
        out
    }
}
