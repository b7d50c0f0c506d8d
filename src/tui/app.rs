//! TUI Application State
//!
//! Owns the wizard form, routes terminal events into it and carries out the
//! actions that need config, files or the outside world.

use super::events::{keys, EventHandler, TuiEvent};
use super::form::{ExportAction, WizardAction, WizardForm};
use crate::config::Config;
use crate::wizard::guides::{self, GuideKind, PROJECT_SOURCE_NOTICE};
use crate::wizard::{spawn_export_timer, AppDraft, PreviewModel, WizardSession};
use anyhow::Result;
use crossterm::event::KeyEvent;
use std::path::PathBuf;

/// Default file for Ctrl+S when no preset is configured
const DEFAULT_PRESET_FILE: &str = "appforge-preset.toml";

type LinkOpener = Box<dyn Fn(&str) -> std::io::Result<()> + Send>;

/// Main application state
pub struct App {
    pub form: WizardForm,
    pub config: Config,
    pub should_quit: bool,

    // Animation state
    pub animation_frame: usize,

    event_handler: EventHandler,
    open_link: LinkOpener,
}

impl App {
    /// Create a new app instance around a fresh wizard session
    pub fn new(config: Config, draft: AppDraft) -> Self {
        let session = WizardSession::with_draft(draft, config.session_options());
        Self {
            form: WizardForm::new(session),
            config,
            should_quit: false,
            animation_frame: 0,
            event_handler: EventHandler::new(),
            open_link: Box::new(|url: &str| open::that(url)),
        }
    }

    /// Replace how external links are opened
    pub fn with_link_opener<F>(mut self, opener: F) -> Self
    where
        F: Fn(&str) -> std::io::Result<()> + Send + 'static,
    {
        self.open_link = Box::new(opener);
        self
    }

    /// Get event sender
    pub fn event_sender(&self) -> tokio::sync::mpsc::UnboundedSender<TuiEvent> {
        self.event_handler.sender()
    }

    /// Receive next event
    pub async fn next_event(&mut self) -> Option<TuiEvent> {
        self.event_handler.next().await
    }

    /// Take an already queued event, if any
    pub fn try_next_event(&mut self) -> Option<TuiEvent> {
        self.event_handler.try_next()
    }

    /// What the device mock-up should show right now
    pub fn preview(&self) -> PreviewModel {
        PreviewModel::project(self.form.session.draft(), self.form.session.export_phase())
    }

    /// Handle an event
    pub async fn handle_event(&mut self, event: TuiEvent) -> Result<()> {
        match event {
            TuiEvent::Key(key_event) => {
                self.handle_key_event(key_event)?;
            }
            TuiEvent::Paste(text) => {
                self.form.handle_paste(&text);
            }
            TuiEvent::Resize(_, _) => {
                // Next draw picks up the new size
            }
            TuiEvent::ExportFinished(finished) => {
                if self.form.session.complete_export(&finished) {
                    self.form.focused_field = 0;
                    self.form.status_message = Some("Your app is ready.".to_string());
                }
            }
            TuiEvent::Quit => {
                self.should_quit = true;
            }
            TuiEvent::Tick => {
                self.animation_frame = self.animation_frame.wrapping_add(1);
            }
        }
        Ok(())
    }

    fn handle_key_event(&mut self, event: KeyEvent) -> Result<()> {
        if keys::is_quit(&event) {
            self.should_quit = true;
            return Ok(());
        }

        let action = self.form.handle_key(event);
        self.handle_wizard_action(action)
    }

    fn handle_wizard_action(&mut self, action: WizardAction) -> Result<()> {
        match action {
            WizardAction::None => {}
            WizardAction::Cancel => {
                tracing::info!("Wizard cancelled from first step");
                self.should_quit = true;
            }
            WizardAction::StartExport => self.start_export(),
            WizardAction::Export(export_action) => self.run_export_action(export_action),
            WizardAction::SavePreset => self.save_preset(),
        }
        Ok(())
    }

    /// Kick off the simulated build. The timer reports back through the
    /// event channel.
    fn start_export(&mut self) {
        let Some(ticket) = self.form.session.start_export() else {
            return;
        };
        let tx = self.event_sender();
        spawn_export_timer(&ticket, self.config.export.delay(), move |finished| {
            let _ = tx.send(TuiEvent::ExportFinished(finished));
        });
        self.form.error_message = None;
        self.form.status_message = None;
    }

    fn run_export_action(&mut self, action: ExportAction) {
        tracing::info!("Export action: {:?}", action);
        let draft = self.form.session.draft();
        match action {
            ExportAction::OpenReport => {
                let url = guides::report_url(draft, &self.config.export.report_base_url);
                match (self.open_link)(&url) {
                    Ok(()) => {
                        self.form.status_message = Some(format!("Opened {}", url));
                    }
                    Err(e) => {
                        tracing::warn!("Failed to open {}: {}", url, e);
                        self.form.error_message =
                            Some(format!("Could not open browser. Visit: {}", url));
                    }
                }
            }
            ExportAction::DebugApkGuide => self.write_guide(GuideKind::DebugApk),
            ExportAction::SigningGuide => self.write_guide(GuideKind::Signing),
            ExportAction::ProjectSource => {
                self.form.status_message = Some(PROJECT_SOURCE_NOTICE.to_string());
            }
            ExportAction::StartOver => self.form.start_over(),
        }
    }

    fn write_guide(&mut self, kind: GuideKind) {
        let export = &self.config.export;
        match guides::write_guide(
            &export.output_dir,
            kind,
            self.form.session.draft(),
            export.secret_policy(),
        ) {
            Ok(path) => {
                self.form.error_message = None;
                self.form.status_message = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                tracing::error!("Failed to write guide: {}", e);
                self.form.error_message = Some(format!("[{}] {}", e.code(), e));
            }
        }
    }

    fn preset_path(&self) -> PathBuf {
        self.config
            .wizard
            .preset
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PRESET_FILE))
    }

    fn save_preset(&mut self) {
        let path = self.preset_path();
        match self.form.session.draft().save_preset(&path) {
            Ok(()) => {
                self.form.status_message = Some(format!("Preset saved to {}", path.display()));
            }
            Err(e) => {
                tracing::error!("Failed to save preset: {}", e);
                self.form.error_message = Some(format!("[{}] {}", e.code(), e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::{ExportPhase, WizardStep};
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> TuiEvent {
        TuiEvent::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    fn test_config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.export.output_dir = dir.path().join("guides");
        config.export.delay_ms = 50;
        config.wizard.preset = Some(dir.path().join("preset.toml"));
        config
    }

    async fn app_at_export(config: Config) -> App {
        let mut draft = AppDraft::default();
        draft.website_url = "https://example.com".to_string();
        draft.app_name = "Crab Shop".to_string();
        let mut app = App::new(config, draft);
        while app.form.session.step() != WizardStep::Export {
            app.handle_event(key(KeyCode::Enter)).await.unwrap();
        }
        app
    }

    #[tokio::test]
    async fn test_ctrl_c_quits() {
        let mut app = App::new(Config::default(), AppDraft::default());
        let event = TuiEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        app.handle_event(event).await.unwrap();
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_tick_advances_animation() {
        let mut app = App::new(Config::default(), AppDraft::default());
        app.handle_event(TuiEvent::Tick).await.unwrap();
        app.handle_event(TuiEvent::Tick).await.unwrap();
        assert_eq!(app.animation_frame, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_export_flow_through_event_channel() {
        let dir = TempDir::new().unwrap();
        let mut app = app_at_export(test_config(&dir)).await;

        app.handle_event(key(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.form.session.export_phase(), ExportPhase::InProgress);
        assert!(app.preview().splash.is_some());

        // A second Enter while building does nothing
        app.handle_event(key(KeyCode::Enter)).await.unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;
        let event = app.next_event().await.unwrap();
        assert!(matches!(event, TuiEvent::ExportFinished(_)));
        app.handle_event(event).await.unwrap();

        assert!(app.form.session.is_export_complete());
        assert!(app.try_next_event().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_post_export_actions() {
        let dir = TempDir::new().unwrap();
        let opened = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&opened);
        let mut app = app_at_export(test_config(&dir))
            .await
            .with_link_opener(move |url| {
                sink.lock().unwrap().push(url.to_string());
                Ok(())
            });

        app.handle_event(key(KeyCode::Enter)).await.unwrap();
        let finished = app.next_event().await.unwrap();
        app.handle_event(finished).await.unwrap();
        assert!(app.form.session.is_export_complete());

        // Report link
        app.handle_event(key(KeyCode::Enter)).await.unwrap();
        assert_eq!(
            opened.lock().unwrap().as_slice(),
            ["https://www.pwabuilder.com/report?url=https%3A%2F%2Fexample.com"]
        );

        // Debug APK guide
        app.handle_event(key(KeyCode::Down)).await.unwrap();
        app.handle_event(key(KeyCode::Enter)).await.unwrap();
        assert!(dir.path().join("guides/APK_BUILD_INSTRUCTIONS.md").exists());

        // Signing guide, redacted by default
        app.handle_event(key(KeyCode::Down)).await.unwrap();
        app.handle_event(key(KeyCode::Enter)).await.unwrap();
        let signing =
            std::fs::read_to_string(dir.path().join("guides/RELEASE_INSTRUCTIONS.md")).unwrap();
        assert!(signing.contains("Keystore Password: ********"));

        // Project source only explains itself
        app.handle_event(key(KeyCode::Down)).await.unwrap();
        app.handle_event(key(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.form.status_message.as_deref(), Some(PROJECT_SOURCE_NOTICE));

        // Start over keeps the draft
        app.handle_event(key(KeyCode::Down)).await.unwrap();
        app.handle_event(key(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.form.session.step(), WizardStep::Url);
        assert_eq!(app.form.session.draft().app_name, "Crab Shop");
    }

    #[tokio::test]
    async fn test_failed_link_open_shows_url() {
        let dir = TempDir::new().unwrap();
        let mut app = app_at_export(test_config(&dir))
            .await
            .with_link_opener(|_| Err(std::io::Error::other("no browser")));
        app.form.session.start_export();
        app.run_export_action(ExportAction::OpenReport);
        let message = app.form.error_message.clone().unwrap();
        assert!(message.contains("pwabuilder.com/report?url="));
    }

    #[tokio::test]
    async fn test_ctrl_s_saves_preset() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let preset = config.wizard.preset.clone().unwrap();
        let mut app = App::new(config, AppDraft::default());

        let event = TuiEvent::Key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        app.handle_event(event).await.unwrap();
        assert!(preset.exists());
        assert!(app.form.status_message.is_some());
    }

    #[tokio::test]
    async fn test_stale_completion_ignored_after_restart() {
        let dir = TempDir::new().unwrap();
        let mut app = app_at_export(test_config(&dir)).await;
        let ticket = app.form.session.start_export().unwrap();
        app.form.session.reset();

        app.handle_event(TuiEvent::ExportFinished(ticket.finished()))
            .await
            .unwrap();
        assert_eq!(app.form.session.export_phase(), ExportPhase::Idle);
        assert!(app.form.status_message.is_none());
    }
}
