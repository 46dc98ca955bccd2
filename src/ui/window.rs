//! # Window Composer
//!
//! Decides which screens are mounted and keeps each mounted screen's last
//! rendered view.
//!
//! ```text
//!            TestSetup hidden
//!   Setup ───────────────────▶ InTest
//!   Session                    Session
//!   TestSetup                  Test, FreeResponse, Syllables,
//!                              ChooseKeywords, CorrectKeywords,
//!                              PassFail (each while showing)
//! ```
//!
//! The phase only moves forward. Visibility is read inside the composer's own
//! [`RenderScope::Window`], so a visibility write re-runs the mount decision
//! while leaving untouched screens cached.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::reactive::{Reactor, RenderScope};
use crate::screens::{ScreenId, Screens};
use crate::ui::view::{ScreenView, WindowView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Setup,
    InTest,
}

pub struct WindowComposer {
    reactor: Arc<Reactor>,
    screens: Screens,
    phase: Phase,
    mounted: Vec<ScreenId>,
    cache: BTreeMap<ScreenId, ScreenView>,
    render_counts: HashMap<ScreenId, u64>,
}

impl WindowComposer {
    pub fn new(reactor: &Arc<Reactor>, screens: &Screens) -> Self {
        Self {
            reactor: Arc::clone(reactor),
            screens: screens.clone(),
            phase: Phase::Setup,
            mounted: Vec::new(),
            cache: BTreeMap::new(),
            render_counts: HashMap::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Screens mounted by the last [`compose`](Self::compose), in stacking
    /// order.
    pub fn mounted(&self) -> &[ScreenId] {
        &self.mounted
    }

    /// How many times `screen`'s renderer has run.
    pub fn render_count(&self, screen: ScreenId) -> u64 {
        self.render_counts.get(&screen).copied().unwrap_or(0)
    }

    /// Run one render pass: settle the mount set, re-render dirty screens,
    /// and assemble the window.
    pub fn compose(&mut self) -> WindowView {
        let reactor = Arc::clone(&self.reactor);
        let pass = reactor.begin_pass();

        if pass.covers(RenderScope::Window) || self.mounted.is_empty() {
            self.mounted = reactor.track(RenderScope::Window, || self.mount_set());
        }

        let unmounted: Vec<ScreenId> = self
            .cache
            .keys()
            .filter(|screen| !self.mounted.contains(screen))
            .copied()
            .collect();
        for screen in unmounted {
            tracing::debug!(?screen, "unmounting screen");
            self.cache.remove(&screen);
            reactor.forget(RenderScope::Screen(screen));
        }

        for &screen in &self.mounted {
            if self.cache.contains_key(&screen) && !pass.covers(RenderScope::Screen(screen)) {
                continue;
            }
            let nodes = reactor.track(RenderScope::Screen(screen), || self.screens.render(screen));
            *self.render_counts.entry(screen).or_default() += 1;
            self.cache.insert(screen, ScreenView { screen, nodes });
        }

        WindowView {
            screens: self
                .mounted
                .iter()
                .filter_map(|screen| self.cache.get(screen).cloned())
                .collect(),
        }
    }

    fn mount_set(&mut self) -> Vec<ScreenId> {
        if self.phase == Phase::Setup && !self.screens.is_showing(ScreenId::TestSetup) {
            tracing::info!("test setup dismissed, entering test phase");
            self.phase = Phase::InTest;
        }
        let mut mounted = vec![ScreenId::Session];
        match self.phase {
            Phase::Setup => mounted.push(ScreenId::TestSetup),
            Phase::InTest => mounted.extend(
                ScreenId::IN_TEST
                    .into_iter()
                    .filter(|&screen| self.screens.is_showing(screen)),
            ),
        }
        mounted
    }
}
