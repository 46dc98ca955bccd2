//! # Screens Module
//!
//! The eight fixed screens of the hearing test. Each submodule follows the
//! same pattern:
//!
//! - an **observer trait** the engine implements to hear about clicks
//! - a **UI contract trait** the engine calls to read and drive the screen
//! - an **adapter** that owns the screen's [`ObservableField`]s and its
//!   [`ObserverSlot`], and implements the contract by marshaling every
//!   mutation through the [`UiQueue`]
//! - a **renderer**, `render(&adapter) -> Vec<Node>`
//!
//! | Screen | Observer events |
//! |---|---|
//! | [`session`] | none |
//! | [`test_setup`] | confirm, play calibration |
//! | [`test`] | exit test, play trial, continue-testing answers |
//! | [`free_response`] | submit |
//! | [`syllables`] | response button (with the syllable) |
//! | [`choose_keywords`] | three keywords, reset, all wrong, submit |
//! | [`correct_keywords`] | submit |
//! | [`pass_fail`] | incorrect, correct |
//!
//! [`ObservableField`]: crate::reactive::ObservableField
//! [`ObserverSlot`]: crate::reactive::ObserverSlot
//! [`UiQueue`]: crate::reactive::UiQueue

use std::sync::Arc;

use crate::reactive::{Reactor, UiQueue};
use crate::ui::view::Node;

pub mod choose_keywords;
pub mod correct_keywords;
pub mod free_response;
pub mod pass_fail;
pub mod session;
pub mod syllables;
pub mod test;
pub mod test_setup;

pub use choose_keywords::{ChooseKeywordsAdapter, ChooseKeywordsObserver, ChooseKeywordsUi};
pub use correct_keywords::{CorrectKeywordsAdapter, CorrectKeywordsObserver, CorrectKeywordsUi};
pub use free_response::{FreeResponseAdapter, FreeResponseObserver, FreeResponseUi};
pub use pass_fail::{PassFailAdapter, PassFailObserver, PassFailUi};
pub use session::{SessionAdapter, SessionUi};
pub use syllables::{SyllablesAdapter, SyllablesObserver, SyllablesUi, SYLLABLE_GRID};
pub use test::{TestAdapter, TestObserver, TestUi};
pub use test_setup::{TestSetupAdapter, TestSetupObserver, TestSetupUi};

/// The eight screens, in the order the window stacks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScreenId {
    Session,
    TestSetup,
    Test,
    FreeResponse,
    Syllables,
    ChooseKeywords,
    CorrectKeywords,
    PassFail,
}

impl ScreenId {
    /// Screens mounted while the test battery is running.
    pub const IN_TEST: [ScreenId; 6] = [
        ScreenId::Test,
        ScreenId::FreeResponse,
        ScreenId::Syllables,
        ScreenId::ChooseKeywords,
        ScreenId::CorrectKeywords,
        ScreenId::PassFail,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ScreenId::Session => "Session",
            ScreenId::TestSetup => "Test Setup",
            ScreenId::Test => "Test",
            ScreenId::FreeResponse => "Free Response",
            ScreenId::Syllables => "Syllables",
            ScreenId::ChooseKeywords => "Choose Keywords",
            ScreenId::CorrectKeywords => "Correct Keywords",
            ScreenId::PassFail => "Pass / Fail",
        }
    }
}

/// Per-screen visibility, shared by every screen except Session.
pub trait Visibility: Send + Sync {
    fn show(&self);
    fn hide(&self);
}

/// Every adapter of one window, created together over one reactor and one
/// UI queue.
#[derive(Clone)]
pub struct Screens {
    pub session: SessionAdapter,
    pub test_setup: TestSetupAdapter,
    pub test: TestAdapter,
    pub free_response: FreeResponseAdapter,
    pub syllables: SyllablesAdapter,
    pub choose_keywords: ChooseKeywordsAdapter,
    pub correct_keywords: CorrectKeywordsAdapter,
    pub pass_fail: PassFailAdapter,
}

impl Screens {
    pub fn new(reactor: &Arc<Reactor>, queue: &UiQueue) -> Self {
        Self {
            session: SessionAdapter::new(reactor, queue),
            test_setup: TestSetupAdapter::new(reactor, queue),
            test: TestAdapter::new(reactor, queue),
            free_response: FreeResponseAdapter::new(reactor, queue),
            syllables: SyllablesAdapter::new(reactor, queue),
            choose_keywords: ChooseKeywordsAdapter::new(reactor, queue),
            correct_keywords: CorrectKeywordsAdapter::new(reactor, queue),
            pass_fail: PassFailAdapter::new(reactor, queue),
        }
    }

    /// Whether a screen's visibility field is set. Session is always shown.
    pub fn is_showing(&self, screen: ScreenId) -> bool {
        match screen {
            ScreenId::Session => true,
            ScreenId::TestSetup => self.test_setup.showing().get(),
            ScreenId::Test => self.test.showing().get(),
            ScreenId::FreeResponse => self.free_response.showing().get(),
            ScreenId::Syllables => self.syllables.showing().get(),
            ScreenId::ChooseKeywords => self.choose_keywords.showing().get(),
            ScreenId::CorrectKeywords => self.correct_keywords.showing().get(),
            ScreenId::PassFail => self.pass_fail.showing().get(),
        }
    }

    /// Run one screen's renderer against its adapter.
    pub fn render(&self, screen: ScreenId) -> Vec<Node> {
        match screen {
            ScreenId::Session => session::render(&self.session),
            ScreenId::TestSetup => test_setup::render(&self.test_setup),
            ScreenId::Test => test::render(&self.test),
            ScreenId::FreeResponse => free_response::render(&self.free_response),
            ScreenId::Syllables => syllables::render(&self.syllables),
            ScreenId::ChooseKeywords => choose_keywords::render(&self.choose_keywords),
            ScreenId::CorrectKeywords => correct_keywords::render(&self.correct_keywords),
            ScreenId::PassFail => pass_fail::render(&self.pass_fail),
        }
    }
}
