//! # Engine Binding
//!
//! The one seam between this layer and the test engine. At startup the
//! engine receives [`UiContracts`], a struct holding every screen's UI
//! contract, and attaches its observers through them. Nothing else crosses
//! the boundary.
//!
//! Contracts are `Send + Sync` handles; the engine may keep them and call
//! them from any thread.

use std::sync::Arc;

use crate::screens::{
    ChooseKeywordsUi, CorrectKeywordsUi, FreeResponseUi, PassFailUi, Screens, SessionUi,
    SyllablesUi, TestSetupUi, TestUi,
};

pub mod demo;

pub use demo::DemoEngine;

/// Every screen's UI contract, handed to the engine once.
#[derive(Clone)]
pub struct UiContracts {
    pub session: Arc<dyn SessionUi>,
    pub test_setup: Arc<dyn TestSetupUi>,
    pub test: Arc<dyn TestUi>,
    pub free_response: Arc<dyn FreeResponseUi>,
    pub syllables: Arc<dyn SyllablesUi>,
    pub choose_keywords: Arc<dyn ChooseKeywordsUi>,
    pub correct_keywords: Arc<dyn CorrectKeywordsUi>,
    pub pass_fail: Arc<dyn PassFailUi>,
}

impl UiContracts {
    pub fn from_screens(screens: &Screens) -> Self {
        Self {
            session: Arc::new(screens.session.clone()),
            test_setup: Arc::new(screens.test_setup.clone()),
            test: Arc::new(screens.test.clone()),
            free_response: Arc::new(screens.free_response.clone()),
            syllables: Arc::new(screens.syllables.clone()),
            choose_keywords: Arc::new(screens.choose_keywords.clone()),
            correct_keywords: Arc::new(screens.correct_keywords.clone()),
            pass_fail: Arc::new(screens.pass_fail.clone()),
        }
    }
}

/// A test engine that drives the screens.
pub trait Engine: Send + Sync + 'static {
    /// Receive the screens. Called once, before the first frame.
    fn bind(self: Arc<Self>, ui: UiContracts);
}

/// Hand `engine` the contracts of every screen in `screens`.
pub fn bind_engine<E: Engine>(engine: &Arc<E>, screens: &Screens) {
    tracing::info!("binding engine to screens");
    Arc::clone(engine).bind(UiContracts::from_screens(screens));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::{Reactor, UiQueue};
    use crate::screens::{TestSetupObserver, Visibility};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Probe {
        ui: Mutex<Option<UiContracts>>,
        confirms: AtomicUsize,
    }

    impl TestSetupObserver for Probe {
        fn notify_that_confirm_button_has_been_clicked(&self) {
            self.confirms.fetch_add(1, Ordering::SeqCst);
        }

        fn notify_that_play_calibration_button_has_been_clicked(&self) {}
    }

    impl Engine for Probe {
        fn bind(self: Arc<Self>, ui: UiContracts) {
            let observer: Arc<dyn TestSetupObserver> = self.clone();
            ui.test_setup.attach(&observer);
            ui.session.populate_audio_device_menu(vec!["Built-in".to_string()]);
            *self.ui.lock().expect("ui") = Some(ui);
        }
    }

    #[test]
    fn test_contracts_share_adapter_state() {
        let reactor = Reactor::new();
        let screens = Screens::new(&reactor, &UiQueue::new());
        let probe = Arc::new(Probe::default());
        bind_engine(&probe, &screens);

        assert_eq!(screens.session.audio_devices(), vec!["Built-in".to_string()]);

        let guard = probe.ui.lock().expect("ui");
        let ui = guard.as_ref().expect("bound");
        ui.test_setup.hide();
        assert!(!screens.test_setup.showing().get());
    }

    #[test]
    fn test_bound_observer_hears_clicks() {
        let reactor = Reactor::new();
        let screens = Screens::new(&reactor, &UiQueue::new());
        let probe = Arc::new(Probe::default());
        bind_engine(&probe, &screens);

        let view = crate::ui::view::ScreenView {
            screen: crate::screens::ScreenId::TestSetup,
            nodes: screens.render(crate::screens::ScreenId::TestSetup),
        };
        view.default_button().expect("confirm").press();
        assert_eq!(probe.confirms.load(Ordering::SeqCst), 1);
    }
}
