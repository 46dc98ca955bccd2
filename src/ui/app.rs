//! # Application State
//!
//! [`App`] owns the window's reactor, UI queue, screens and composer, plus
//! the only state that is not an observable field: which control has focus.
//!
//! One turn of the main loop is [`App::frame`] followed by at most one
//! [`App::handle_key`], so every key is handled against a view that already
//! reflects every applied write.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::reactive::{BoolField, Reactor, StringField, UiQueue};
use crate::screens::{ScreenId, Screens};
use crate::ui::view::{Button, Control, Node, Widget, WindowView};
use crate::ui::window::WindowComposer;

/// What the focused control lets the keyboard do, detached from the view so
/// handlers may run while the view is replaced.
enum Focused {
    Button(Button),
    Text(StringField),
    Toggle(BoolField),
    Picker {
        options: Vec<String>,
        binding: StringField,
    },
    Inert,
}

impl Focused {
    fn of(control: &Control<'_>) -> Self {
        match control.widget {
            Widget::Node(Node::Button(button)) | Widget::ModalButton(button) => {
                Focused::Button(button.clone())
            }
            Widget::Node(Node::TextField { binding, .. }) => Focused::Text(binding.clone()),
            Widget::Node(Node::Toggle { binding, .. }) => Focused::Toggle(binding.clone()),
            Widget::Node(Node::Picker {
                options, binding, ..
            }) => Focused::Picker {
                options: options.clone(),
                binding: binding.clone(),
            },
            Widget::Node(_) => Focused::Inert,
        }
    }
}

pub struct App {
    reactor: Arc<Reactor>,
    queue: UiQueue,
    screens: Screens,
    composer: WindowComposer,
    view: WindowView,
    focus: usize,
    /// The terminal must be redrawn even though no screen re-rendered.
    redraw: bool,
    pub should_quit: bool,
}

impl App {
    /// Build a window on the calling thread, which becomes the UI thread.
    pub fn new() -> Self {
        let reactor = Reactor::new();
        let queue = UiQueue::new();
        let screens = Screens::new(&reactor, &queue);
        Self::with_parts(reactor, queue, screens)
    }

    pub fn with_parts(reactor: Arc<Reactor>, queue: UiQueue, screens: Screens) -> Self {
        let composer = WindowComposer::new(&reactor, &screens);
        Self {
            reactor,
            queue,
            screens,
            composer,
            view: WindowView::default(),
            focus: 0,
            redraw: false,
            should_quit: false,
        }
    }

    pub fn screens(&self) -> &Screens {
        &self.screens
    }

    pub fn queue(&self) -> &UiQueue {
        &self.queue
    }

    pub fn reactor(&self) -> &Arc<Reactor> {
        &self.reactor
    }

    pub fn composer(&self) -> &WindowComposer {
        &self.composer
    }

    /// The view produced by the last render pass.
    pub fn view(&self) -> &WindowView {
        &self.view
    }

    pub fn focus_index(&self) -> usize {
        self.focus
    }

    pub fn focused_control(&self) -> Option<Control<'_>> {
        self.view.controls().get(self.focus).copied()
    }

    /// Apply queued writes, then run a render pass if any are pending.
    /// Returns whether the terminal needs drawing.
    ///
    /// Focus moves and resizes only redraw the cached view; screens are
    /// re-rendered only when a field they read has changed.
    pub fn frame(&mut self) -> bool {
        self.queue.pump();
        if !self.reactor.needs_render() {
            return std::mem::take(&mut self.redraw);
        }
        self.view = self.composer.compose();
        let controls = self.view.controls().len();
        if self.focus >= controls {
            self.focus = 0;
        }
        self.redraw = false;
        true
    }

    /// Draw again on the next frame without re-rendering any screen, e.g.
    /// after a terminal resize.
    pub fn request_redraw(&mut self) {
        self.redraw = true;
    }

    pub fn focus_next(&mut self) {
        let count = self.view.controls().len();
        if count > 0 {
            self.focus = (self.focus + 1) % count;
            self.redraw = true;
        }
    }

    pub fn focus_previous(&mut self) {
        let count = self.view.controls().len();
        if count > 0 {
            self.focus = (self.focus + count - 1) % count;
            self.redraw = true;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                tracing::info!("quit requested");
                self.should_quit = true;
                return;
            }
            KeyCode::Tab | KeyCode::Down => return self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => return self.focus_previous(),
            _ if ctrl => return,
            _ => {}
        }

        let Some(control) = self.focused_control() else {
            return;
        };
        let screen = control.screen;
        let focused = Focused::of(&control);

        match (key.code, focused) {
            (KeyCode::Enter | KeyCode::Char(' '), Focused::Button(button)) => {
                button.press();
            }
            (KeyCode::Char(' '), Focused::Toggle(binding)) => {
                let on = binding.get();
                self.queue.assign(&binding, !on);
            }
            (KeyCode::Char(c), Focused::Text(binding)) => {
                let mut text = binding.get();
                text.push(c);
                self.queue.assign(&binding, text);
            }
            (KeyCode::Backspace, Focused::Text(binding)) => {
                let mut text = binding.get();
                if text.pop().is_some() {
                    self.queue.assign(&binding, text);
                }
            }
            (KeyCode::Left, Focused::Picker { options, binding }) => {
                cycle_picker(&options, &binding, false);
            }
            (KeyCode::Right, Focused::Picker { options, binding }) => {
                cycle_picker(&options, &binding, true);
            }
            (KeyCode::Enter, _) => self.press_default(screen),
            _ => {}
        }
    }

    fn press_default(&self, screen: ScreenId) {
        let button = self
            .view
            .screen(screen)
            .and_then(|view| view.default_button())
            .cloned();
        if let Some(button) = button {
            button.press();
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Step a picker's selection through the options it was rendered with.
fn cycle_picker(options: &[String], binding: &StringField, forward: bool) {
    if options.is_empty() {
        return;
    }
    let current = binding.get();
    let next = match options.iter().position(|option| *option == current) {
        Some(index) if forward => (index + 1) % options.len(),
        Some(index) => (index + options.len() - 1) % options.len(),
        None if forward => 0,
        None => options.len() - 1,
    };
    binding.select_from(options, &options[next]);
}
