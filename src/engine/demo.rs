//! # Walkthrough Engine
//!
//! A stand-in test engine so the window can be driven end to end without
//! audio hardware. It walks a subject through trials, rotating across the
//! five response screens:
//!
//! ```text
//! Confirm ──▶ Play Trial ──(playback thread)──▶ response screen
//!                 ▲                                   │ submit
//!                 └──── next trial / continue? ◀──────┘
//! ```
//!
//! Playback runs on its own thread and drives the screens from there, the
//! same way a real engine reports from its audio thread.

use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::thread;
use std::time::Duration;

use crate::engine::{Engine, UiContracts};
use crate::screens::{
    ChooseKeywordsObserver, ChooseKeywordsUi, CorrectKeywordsObserver, CorrectKeywordsUi,
    FreeResponseObserver, FreeResponseUi, PassFailObserver, PassFailUi, SessionUi,
    SyllablesObserver, SyllablesUi, TestObserver, TestSetupObserver, TestSetupUi, TestUi,
    Visibility,
};
use crate::ui::config::Config;

/// The response screen a trial is answered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    FreeResponse,
    Syllables,
    ChooseKeywords,
    CorrectKeywords,
    PassFail,
}

impl ResponseKind {
    const ROTATION: [ResponseKind; 5] = [
        ResponseKind::FreeResponse,
        ResponseKind::Syllables,
        ResponseKind::ChooseKeywords,
        ResponseKind::CorrectKeywords,
        ResponseKind::PassFail,
    ];

    /// Response screen for the zero-based trial `index`.
    pub fn for_trial(index: u32) -> Self {
        Self::ROTATION[index as usize % Self::ROTATION.len()]
    }
}

/// Target sentence for the keyword screen: three keywords and the text
/// around them.
const SENTENCE: [&str; 7] = ["The", "boy", "ran to the", "store", "for", "milk", "."];

#[derive(Debug, Default)]
struct Progress {
    trials_completed: u32,
    awaiting: Option<ResponseKind>,
    finished: bool,
}

pub struct DemoEngine {
    audio_devices: Vec<String>,
    transducers: Vec<String>,
    trials_per_block: u32,
    playback: Duration,
    ui: OnceLock<UiContracts>,
    progress: Mutex<Progress>,
}

impl DemoEngine {
    pub fn new(config: &Config) -> Arc<Self> {
        Self::with_playback(config, Duration::from_millis(600))
    }

    /// Like [`new`](Self::new) with a custom simulated playback time.
    pub fn with_playback(config: &Config, playback: Duration) -> Arc<Self> {
        Arc::new(Self {
            audio_devices: config.audio_devices.clone(),
            transducers: config.transducers.clone(),
            trials_per_block: config.trials_per_block.max(1),
            playback,
            ui: OnceLock::new(),
            progress: Mutex::new(Progress::default()),
        })
    }

    pub fn trials_completed(&self) -> u32 {
        self.progress().trials_completed
    }

    /// The response screen waiting for an answer, if any.
    pub fn awaiting(&self) -> Option<ResponseKind> {
        self.progress().awaiting
    }

    pub fn is_finished(&self) -> bool {
        self.progress().finished
    }

    fn progress(&self) -> std::sync::MutexGuard<'_, Progress> {
        self.progress.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ui(&self) -> Option<&UiContracts> {
        let ui = self.ui.get();
        if ui.is_none() {
            tracing::warn!("event before engine was bound");
        }
        ui
    }

    fn ready_next_trial(&self, ui: &UiContracts) {
        let completed = self.trials_completed();
        ui.test.display(&format!("Trials completed: {completed}"));
        ui.test.secondary_display("Press Play Trial when the subject is ready.");
        ui.test.show_next_trial_button();
        ui.test.show_exit_test_button();
    }

    /// Record the answer for `kind` and move on. Answers from a screen that
    /// is not waiting are dropped.
    fn complete_response(&self, kind: ResponseKind, answer: &str) {
        let Some(ui) = self.ui() else {
            return;
        };
        let completed = {
            let mut progress = self.progress();
            if progress.awaiting != Some(kind) {
                tracing::debug!(?kind, "ignoring response from idle screen");
                return;
            }
            progress.awaiting = None;
            progress.trials_completed += 1;
            progress.trials_completed
        };
        tracing::info!(trial = completed, ?kind, answer, "response recorded");
        hide_response_screen(ui, kind);

        if completed % self.trials_per_block == 0 {
            ui.test.set_continue_testing_dialog_message(&format!(
                "{completed} trials completed. Continue testing?"
            ));
            ui.test.show_continue_testing_dialog();
        } else {
            self.ready_next_trial(ui);
        }
    }

    fn finish(&self, ui: &UiContracts) {
        let completed = {
            let mut progress = self.progress();
            progress.finished = true;
            progress.awaiting = None;
            progress.trials_completed
        };
        tracing::info!(trials = completed, "test finished");
        ui.test.hide_continue_testing_dialog();
        ui.test.hide_next_trial_button();
        ui.test.hide_exit_test_button();
        ui.test.display("Test finished.");
        ui.test.secondary_display("");
        ui.test.show_sheet(&format!(
            "Testing is complete after {completed} trials. Press Ctrl+Q to quit."
        ));
    }
}

fn hide_response_screen(ui: &UiContracts, kind: ResponseKind) {
    match kind {
        ResponseKind::FreeResponse => ui.free_response.hide(),
        ResponseKind::Syllables => ui.syllables.hide(),
        ResponseKind::ChooseKeywords => ui.choose_keywords.hide(),
        ResponseKind::CorrectKeywords => ui.correct_keywords.hide(),
        ResponseKind::PassFail => ui.pass_fail.hide(),
    }
}

/// Prepare and show the response screen for `kind`.
fn present_response_screen(ui: &UiContracts, kind: ResponseKind) {
    match kind {
        ResponseKind::FreeResponse => {
            ui.free_response.clear_free_response();
            ui.free_response.clear_flag();
            ui.free_response.show();
        }
        ResponseKind::Syllables => {
            ui.syllables.clear_flag();
            ui.syllables.show();
        }
        ResponseKind::ChooseKeywords => {
            let keywords = &ui.choose_keywords;
            keywords.clear_flag();
            keywords.set_text_preceding_first_keyword_button(SENTENCE[0]);
            keywords.set_first_keyword_button_text(SENTENCE[1]);
            keywords.set_text_following_first_keyword_button(SENTENCE[2]);
            keywords.set_second_keyword_button_text(SENTENCE[3]);
            keywords.set_text_following_second_keyword_button(SENTENCE[4]);
            keywords.set_third_keyword_button_text(SENTENCE[5]);
            keywords.set_text_following_third_keyword_button(SENTENCE[6]);
            mark_all(ui, true);
            keywords.show();
        }
        ResponseKind::CorrectKeywords => ui.correct_keywords.show(),
        ResponseKind::PassFail => ui.pass_fail.show(),
    }
}

fn mark_all(ui: &UiContracts, correct: bool) {
    let keywords = &ui.choose_keywords;
    if correct {
        keywords.mark_first_keyword_correct();
        keywords.mark_second_keyword_correct();
        keywords.mark_third_keyword_correct();
    } else {
        keywords.mark_first_keyword_incorrect();
        keywords.mark_second_keyword_incorrect();
        keywords.mark_third_keyword_incorrect();
    }
}

impl Engine for DemoEngine {
    fn bind(self: Arc<Self>, ui: UiContracts) {
        ui.session
            .populate_audio_device_menu(self.audio_devices.clone());
        ui.test_setup
            .populate_transducer_menu(self.transducers.clone());

        let test_setup: Arc<dyn TestSetupObserver> = self.clone();
        ui.test_setup.attach(&test_setup);
        let test: Arc<dyn TestObserver> = self.clone();
        ui.test.attach(&test);
        let free_response: Arc<dyn FreeResponseObserver> = self.clone();
        ui.free_response.attach(&free_response);
        let syllables: Arc<dyn SyllablesObserver> = self.clone();
        ui.syllables.attach(&syllables);
        let choose_keywords: Arc<dyn ChooseKeywordsObserver> = self.clone();
        ui.choose_keywords.attach(&choose_keywords);
        let correct_keywords: Arc<dyn CorrectKeywordsObserver> = self.clone();
        ui.correct_keywords.attach(&correct_keywords);
        let pass_fail: Arc<dyn PassFailObserver> = self.clone();
        ui.pass_fail.attach(&pass_fail);

        if self.ui.set(ui).is_err() {
            tracing::warn!("engine bound twice, keeping the first binding");
        }
    }
}

impl TestSetupObserver for DemoEngine {
    fn notify_that_confirm_button_has_been_clicked(&self) {
        let Some(ui) = self.ui() else {
            return;
        };
        let subject = ui.test_setup.subject_id();
        if subject.trim().is_empty() {
            ui.session.show_error_message("Enter a subject ID before confirming.");
            return;
        }
        tracing::info!(
            subject = %subject,
            tester = %ui.test_setup.tester_id(),
            session = %ui.test_setup.session(),
            transducer = %ui.test_setup.transducer(),
            starting_snr = %ui.test_setup.starting_snr(),
            settings = %ui.test_setup.test_settings_file(),
            device = %ui.session.audio_device(),
            "test confirmed"
        );
        ui.test_setup.hide();
        ui.test.show();
        self.ready_next_trial(ui);
    }

    fn notify_that_play_calibration_button_has_been_clicked(&self) {
        let Some(ui) = self.ui() else {
            return;
        };
        tracing::info!(
            device = %ui.session.audio_device(),
            transducer = %ui.test_setup.transducer(),
            "calibration requested"
        );
        if ui.session.audio_device().is_empty() {
            ui.session
                .show_error_message("Choose an audio device before playing calibration.");
        }
    }
}

impl TestObserver for DemoEngine {
    fn exit_test(&self) {
        if let Some(ui) = self.ui() {
            self.finish(ui);
        }
    }

    fn play_trial(&self) {
        let Some(ui) = self.ui() else {
            return;
        };
        let (trial, kind) = {
            let mut progress = self.progress();
            if progress.awaiting.is_some() || progress.finished {
                return;
            }
            let kind = ResponseKind::for_trial(progress.trials_completed);
            progress.awaiting = Some(kind);
            (progress.trials_completed + 1, kind)
        };
        ui.test.hide_next_trial_button();
        ui.test.hide_exit_test_button();
        ui.test.display(&format!("Trial {trial}: playing..."));
        ui.test.secondary_display("");

        let ui = ui.clone();
        let playback = self.playback;
        thread::spawn(move || {
            thread::sleep(playback);
            tracing::debug!(trial, ?kind, "playback finished");
            ui.test.display(&format!("Trial {trial}: waiting for response"));
            present_response_screen(&ui, kind);
        });
    }

    fn accept_continuing_testing(&self) {
        if let Some(ui) = self.ui() {
            ui.test.hide_continue_testing_dialog();
            self.ready_next_trial(ui);
        }
    }

    fn decline_continuing_testing(&self) {
        if let Some(ui) = self.ui() {
            self.finish(ui);
        }
    }
}

impl FreeResponseObserver for DemoEngine {
    fn notify_that_submit_button_has_been_clicked(&self) {
        let Some(ui) = self.ui() else {
            return;
        };
        let answer = ui.free_response.free_response();
        let flagged = ui.free_response.flagged();
        self.complete_response(
            ResponseKind::FreeResponse,
            &format!("{answer:?} flagged={flagged}"),
        );
    }
}

impl SyllablesObserver for DemoEngine {
    fn notify_that_response_button_has_been_clicked(&self, syllable: &str) {
        let flagged = self.ui().is_some_and(|ui| ui.syllables.flagged());
        self.complete_response(
            ResponseKind::Syllables,
            &format!("{syllable} flagged={flagged}"),
        );
    }
}

impl ChooseKeywordsObserver for DemoEngine {
    fn notify_that_first_keyword_button_is_clicked(&self) {
        if let Some(ui) = self.ui() {
            let keywords = &ui.choose_keywords;
            if keywords.first_keyword_correct() {
                keywords.mark_first_keyword_incorrect();
            } else {
                keywords.mark_first_keyword_correct();
            }
        }
    }

    fn notify_that_second_keyword_button_is_clicked(&self) {
        if let Some(ui) = self.ui() {
            let keywords = &ui.choose_keywords;
            if keywords.second_keyword_correct() {
                keywords.mark_second_keyword_incorrect();
            } else {
                keywords.mark_second_keyword_correct();
            }
        }
    }

    fn notify_that_third_keyword_button_is_clicked(&self) {
        if let Some(ui) = self.ui() {
            let keywords = &ui.choose_keywords;
            if keywords.third_keyword_correct() {
                keywords.mark_third_keyword_incorrect();
            } else {
                keywords.mark_third_keyword_correct();
            }
        }
    }

    fn notify_that_reset_button_is_clicked(&self) {
        if let Some(ui) = self.ui() {
            mark_all(ui, true);
        }
    }

    fn notify_that_all_wrong_button_has_been_clicked(&self) {
        if let Some(ui) = self.ui() {
            mark_all(ui, false);
        }
    }

    fn notify_that_submit_button_has_been_clicked(&self) {
        let Some(ui) = self.ui() else {
            return;
        };
        let keywords = &ui.choose_keywords;
        let marks = [
            keywords.first_keyword_correct(),
            keywords.second_keyword_correct(),
            keywords.third_keyword_correct(),
        ];
        let flagged = keywords.flagged();
        self.complete_response(
            ResponseKind::ChooseKeywords,
            &format!("{marks:?} flagged={flagged}"),
        );
    }
}

impl CorrectKeywordsObserver for DemoEngine {
    fn notify_that_submit_button_has_been_clicked(&self) {
        let Some(ui) = self.ui() else {
            return;
        };
        let count = ui.correct_keywords.correct_keywords();
        match count.trim().parse::<u32>() {
            Ok(count) => self.complete_response(ResponseKind::CorrectKeywords, &count.to_string()),
            Err(_) => ui
                .session
                .show_error_message(&format!("\"{count}\" is not a valid number of keywords.")),
        }
    }
}

impl PassFailObserver for DemoEngine {
    fn notify_that_incorrect_button_has_been_clicked(&self) {
        self.complete_response(ResponseKind::PassFail, "incorrect");
    }

    fn notify_that_correct_button_has_been_clicked(&self) {
        self.complete_response(ResponseKind::PassFail, "correct");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::bind_engine;
    use crate::screens::ScreenId;
    use crate::ui::App;
    use std::time::Instant;

    fn setup(trials_per_block: u32) -> (App, Arc<DemoEngine>) {
        let config = Config {
            trials_per_block,
            ..Config::default()
        };
        let mut app = App::new();
        let engine = DemoEngine::with_playback(&config, Duration::ZERO);
        bind_engine(&engine, app.screens());
        app.frame();
        (app, engine)
    }

    fn press(app: &mut App, screen: ScreenId, label: &str) {
        let button = app
            .view()
            .screen(screen)
            .and_then(|view| view.button(label))
            .cloned()
            .unwrap_or_else(|| panic!("no {label} button on {screen:?}"));
        assert!(button.press(), "{label} is disabled");
        app.frame();
    }

    /// Pump until the playback thread has shown `screen`.
    fn wait_for(app: &mut App, screen: ScreenId) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !app.view().is_mounted(screen) {
            assert!(Instant::now() < deadline, "{screen:?} never appeared");
            thread::sleep(Duration::from_millis(5));
            app.frame();
        }
    }

    fn confirm(app: &mut App) {
        app.screens()
            .test_setup
            .subject_id_field()
            .set("S1".to_string());
        app.frame();
        press(app, ScreenId::TestSetup, "Confirm");
    }

    #[test]
    fn test_bind_populates_menus() {
        let (app, _engine) = setup(5);
        assert_eq!(app.screens().session.audio_devices(), Config::default().audio_devices);
        assert_eq!(app.screens().test_setup.transducers(), Config::default().transducers);
    }

    #[test]
    fn test_confirm_without_subject_reports_error() {
        let (mut app, _engine) = setup(5);
        press(&mut app, ScreenId::TestSetup, "Confirm");
        assert!(app.screens().session.is_showing_error());
        assert!(app.view().is_mounted(ScreenId::TestSetup));
    }

    #[test]
    fn test_confirm_enters_test() {
        let (mut app, _engine) = setup(5);
        confirm(&mut app);
        assert!(!app.view().is_mounted(ScreenId::TestSetup));
        assert!(app.view().is_mounted(ScreenId::Test));
        assert!(app.screens().test.next_trial_button_enabled());
        assert_eq!(app.screens().test_setup.subject_id(), "S1");
    }

    #[test]
    fn test_trial_rotation_through_response_screens() {
        let (mut app, engine) = setup(10);
        confirm(&mut app);

        press(&mut app, ScreenId::Test, "Play Trial");
        assert!(!app.screens().test.next_trial_button_enabled());
        wait_for(&mut app, ScreenId::FreeResponse);
        app.screens()
            .free_response
            .free_response_field()
            .set("the boy ran".to_string());
        press(&mut app, ScreenId::FreeResponse, "Submit");
        assert!(!app.view().is_mounted(ScreenId::FreeResponse));

        press(&mut app, ScreenId::Test, "Play Trial");
        wait_for(&mut app, ScreenId::Syllables);
        press(&mut app, ScreenId::Syllables, "Sh");
        assert_eq!(app.screens().syllables.syllable(), "Sh");

        press(&mut app, ScreenId::Test, "Play Trial");
        wait_for(&mut app, ScreenId::ChooseKeywords);
        press(&mut app, ScreenId::ChooseKeywords, "boy");
        assert!(!app.screens().choose_keywords.first_keyword_correct());
        press(&mut app, ScreenId::ChooseKeywords, "Submit");

        press(&mut app, ScreenId::Test, "Play Trial");
        wait_for(&mut app, ScreenId::CorrectKeywords);
        app.screens()
            .correct_keywords
            .correct_keywords_field()
            .set("two".to_string());
        press(&mut app, ScreenId::CorrectKeywords, "Submit");
        assert!(app.screens().session.is_showing_error());
        assert_eq!(engine.awaiting(), Some(ResponseKind::CorrectKeywords));
        press(&mut app, ScreenId::Session, "OK");
        app.screens()
            .correct_keywords
            .correct_keywords_field()
            .set("2".to_string());
        press(&mut app, ScreenId::CorrectKeywords, "Submit");

        press(&mut app, ScreenId::Test, "Play Trial");
        wait_for(&mut app, ScreenId::PassFail);
        press(&mut app, ScreenId::PassFail, "Correct");

        assert_eq!(engine.trials_completed(), 5);
        assert_eq!(engine.awaiting(), None);
    }

    #[test]
    fn test_continue_dialog_after_block() {
        let (mut app, engine) = setup(1);
        confirm(&mut app);

        press(&mut app, ScreenId::Test, "Play Trial");
        wait_for(&mut app, ScreenId::FreeResponse);
        press(&mut app, ScreenId::FreeResponse, "Submit");
        assert!(app.screens().test.is_continue_testing_dialog_showing());

        press(&mut app, ScreenId::Test, "Continue");
        assert!(!app.screens().test.is_continue_testing_dialog_showing());
        assert!(app.screens().test.next_trial_button_enabled());

        press(&mut app, ScreenId::Test, "Play Trial");
        wait_for(&mut app, ScreenId::Syllables);
        press(&mut app, ScreenId::Syllables, "B");
        press(&mut app, ScreenId::Test, "Exit");
        assert!(engine.is_finished());
        assert_eq!(engine.trials_completed(), 2);
        assert!(!app.screens().test.next_trial_button_enabled());
    }

    #[test]
    fn test_stray_response_is_ignored() {
        let (mut app, engine) = setup(5);
        confirm(&mut app);
        engine.notify_that_correct_button_has_been_clicked();
        assert_eq!(engine.trials_completed(), 0);
    }

    #[test]
    fn test_response_kind_rotation() {
        assert_eq!(ResponseKind::for_trial(0), ResponseKind::FreeResponse);
        assert_eq!(ResponseKind::for_trial(4), ResponseKind::PassFail);
        assert_eq!(ResponseKind::for_trial(5), ResponseKind::FreeResponse);
    }
}
