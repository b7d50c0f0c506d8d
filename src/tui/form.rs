//! Wizard Form
//!
//! Keyboard editing of the draft: which fields each step shows, which one has
//! focus, and what each key does to it. Anything that needs config or I/O is
//! handed back to the app as a [`WizardAction`].

use super::events::keys;
use crate::wizard::{
    DisplayMode, FieldUpdate, NavigationStyle, Secret, StepChange, TargetSdk, WizardSession,
    WizardStep,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// One editable control on a step screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    WebsiteUrl,
    AppName,
    PackageName,
    Version,
    TargetSdk,
    ThemeColor,
    BackgroundColor,
    NavigationStyle,
    SplashText,
    DisplayMode,
    PullToRefresh,
    OfflineSupport,
    PushNotifications,
    OneSignalId,
    AdMobEnabled,
    AdMobAppId,
    AdMobBannerId,
    UseCustomSigning,
    KeystoreAlias,
    KeystorePassword,
    KeyPassword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Secret,
    Toggle,
    Choice,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Self::WebsiteUrl => "Website URL",
            Self::AppName => "App Name",
            Self::PackageName => "Package Name",
            Self::Version => "Version",
            Self::TargetSdk => "Target SDK",
            Self::ThemeColor => "Theme Color",
            Self::BackgroundColor => "Background Color",
            Self::NavigationStyle => "Navigation Style",
            Self::SplashText => "Splash Screen Text",
            Self::DisplayMode => "Display Mode",
            Self::PullToRefresh => "Pull to Refresh",
            Self::OfflineSupport => "Offline Support",
            Self::PushNotifications => "Push Notifications",
            Self::OneSignalId => "OneSignal App ID",
            Self::AdMobEnabled => "AdMob Monetization",
            Self::AdMobAppId => "AdMob App ID",
            Self::AdMobBannerId => "Banner Ad Unit ID",
            Self::UseCustomSigning => "Use Custom Keystore",
            Self::KeystoreAlias => "Key Alias",
            Self::KeystorePassword => "Keystore Password",
            Self::KeyPassword => "Key Password",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::TargetSdk | Self::NavigationStyle | Self::DisplayMode => FieldKind::Choice,
            Self::PullToRefresh
            | Self::OfflineSupport
            | Self::PushNotifications
            | Self::AdMobEnabled
            | Self::UseCustomSigning => FieldKind::Toggle,
            Self::KeystorePassword | Self::KeyPassword => FieldKind::Secret,
            _ => FieldKind::Text,
        }
    }

    /// Hint shown while a text field is empty
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::WebsiteUrl => "https://your-website.com",
            Self::AppName => "My Awesome App",
            Self::AdMobAppId => "ca-app-pub-xxxxxxxx~yyyyyyyy",
            Self::AdMobBannerId => "ca-app-pub-xxxxxxxx/zzzzzzzz",
            Self::KeyPassword => "same as keystore password",
            _ => "",
        }
    }
}

/// Fields shown on `step` for the current draft.
///
/// Dependent inputs (OneSignal id, ad ids, keystore details) only appear while
/// their toggle is on; their values are kept either way.
pub fn visible_fields(step: WizardStep, session: &WizardSession) -> Vec<Field> {
    let draft = session.draft();
    match step {
        WizardStep::Url => vec![Field::WebsiteUrl],
        WizardStep::Identity => vec![
            Field::AppName,
            Field::PackageName,
            Field::Version,
            Field::TargetSdk,
        ],
        WizardStep::Design => vec![
            Field::ThemeColor,
            Field::BackgroundColor,
            Field::NavigationStyle,
            Field::SplashText,
            Field::DisplayMode,
        ],
        WizardStep::Advanced => {
            let mut fields = vec![
                Field::PullToRefresh,
                Field::OfflineSupport,
                Field::PushNotifications,
            ];
            if draft.push_notifications {
                fields.push(Field::OneSignalId);
            }
            fields.push(Field::AdMobEnabled);
            if draft.admob_enabled {
                fields.extend([Field::AdMobAppId, Field::AdMobBannerId]);
            }
            fields
        }
        WizardStep::Signing => {
            let mut fields = vec![Field::UseCustomSigning];
            if draft.use_custom_signing {
                fields.extend([
                    Field::KeystoreAlias,
                    Field::KeystorePassword,
                    Field::KeyPassword,
                ]);
            }
            fields
        }
        WizardStep::Export => Vec::new(),
    }
}

/// Buttons on the export screen once the build has finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportAction {
    OpenReport,
    DebugApkGuide,
    SigningGuide,
    ProjectSource,
    StartOver,
}

impl ExportAction {
    pub const ALL: [ExportAction; 5] = [
        Self::OpenReport,
        Self::DebugApkGuide,
        Self::SigningGuide,
        Self::ProjectSource,
        Self::StartOver,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::OpenReport => "Get Play Store Package (report page)",
            Self::DebugApkGuide => "Debug APK Guide",
            Self::SigningGuide => "Signing Guide",
            Self::ProjectSource => "Project Source",
            Self::StartOver => "Create Another Application",
        }
    }
}

/// What the app should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardAction {
    /// Nothing special
    None,
    /// Esc on the first step: leave the wizard
    Cancel,
    /// Start the simulated build
    StartExport,
    /// A post-build button was pressed
    Export(ExportAction),
    /// Save the draft as a preset file
    SavePreset,
}

/// Form state around one wizard session
pub struct WizardForm {
    pub session: WizardSession,
    pub focused_field: usize,
    pub error_message: Option<String>,
    pub status_message: Option<String>,
}

impl WizardForm {
    pub fn new(session: WizardSession) -> Self {
        Self {
            session,
            focused_field: 0,
            error_message: None,
            status_message: None,
        }
    }

    pub fn fields(&self) -> Vec<Field> {
        visible_fields(self.session.step(), &self.session)
    }

    pub fn focused(&self) -> Option<Field> {
        self.fields().get(self.focused_field).copied()
    }

    /// Focused button on the finished export screen
    pub fn focused_action(&self) -> ExportAction {
        ExportAction::ALL[self.focused_field.min(ExportAction::ALL.len() - 1)]
    }

    fn focus_count(&self) -> usize {
        if self.session.is_export_complete() {
            ExportAction::ALL.len()
        } else {
            self.fields().len()
        }
    }

    /// Text shown for a field. Secrets are masked.
    pub fn display_value(&self, field: Field) -> String {
        let draft = self.session.draft();
        match field {
            Field::WebsiteUrl => draft.website_url.clone(),
            Field::AppName => draft.app_name.clone(),
            Field::PackageName => draft.package_name.clone(),
            Field::Version => draft.version.clone(),
            Field::TargetSdk => draft.target_sdk.label(),
            Field::ThemeColor => draft.theme_color.clone(),
            Field::BackgroundColor => draft.background_color.clone(),
            Field::NavigationStyle => draft.navigation_style.label().to_string(),
            Field::SplashText => draft.splash_text.clone(),
            Field::DisplayMode => draft.display_mode.label().to_string(),
            Field::OneSignalId => draft.onesignal_id.clone(),
            Field::AdMobAppId => draft.admob_app_id.clone(),
            Field::AdMobBannerId => draft.admob_banner_id.clone(),
            Field::KeystoreAlias => draft.keystore_alias.clone(),
            Field::KeystorePassword => "•".repeat(draft.keystore_password.len()),
            Field::KeyPassword => "•".repeat(draft.key_password.len()),
            Field::PullToRefresh => on_off(draft.pull_to_refresh),
            Field::OfflineSupport => on_off(draft.offline_support),
            Field::PushNotifications => on_off(draft.push_notifications),
            Field::AdMobEnabled => on_off(draft.admob_enabled),
            Field::UseCustomSigning => on_off(draft.use_custom_signing),
        }
    }

    pub fn is_toggled(&self, field: Field) -> bool {
        let draft = self.session.draft();
        match field {
            Field::PullToRefresh => draft.pull_to_refresh,
            Field::OfflineSupport => draft.offline_support,
            Field::PushNotifications => draft.push_notifications,
            Field::AdMobEnabled => draft.admob_enabled,
            Field::UseCustomSigning => draft.use_custom_signing,
            _ => false,
        }
    }

    /// Handle key events for the current step
    pub fn handle_key(&mut self, event: KeyEvent) -> WizardAction {
        if self.session.is_generating() {
            return WizardAction::None;
        }
        if self.session.is_export_complete() {
            return self.handle_finished_key(event);
        }

        if keys::is_cancel(&event) {
            if self.prev_step() {
                return WizardAction::Cancel;
            }
            return WizardAction::None;
        }
        if keys::is_save_preset(&event) {
            return WizardAction::SavePreset;
        }
        if keys::is_next_field(&event) || keys::is_down(&event) {
            self.move_focus(true);
            return WizardAction::None;
        }
        if keys::is_prev_field(&event) || keys::is_up(&event) {
            self.move_focus(false);
            return WizardAction::None;
        }
        if keys::is_enter(&event) {
            if self.session.step() == WizardStep::Export {
                return WizardAction::StartExport;
            }
            self.next_step();
            return WizardAction::None;
        }

        if let Some(field) = self.focused() {
            self.handle_field_key(field, event);
        }
        WizardAction::None
    }

    fn handle_finished_key(&mut self, event: KeyEvent) -> WizardAction {
        let count = ExportAction::ALL.len();
        match event.code {
            KeyCode::Up | KeyCode::BackTab => {
                self.focused_field = (self.focused_field + count - 1) % count;
            }
            KeyCode::Down | KeyCode::Tab => {
                self.focused_field = (self.focused_field + 1) % count;
            }
            KeyCode::Enter => return WizardAction::Export(self.focused_action()),
            _ => {}
        }
        WizardAction::None
    }

    fn handle_field_key(&mut self, field: Field, event: KeyEvent) {
        match field.kind() {
            FieldKind::Toggle => {
                if keys::is_toggle(&event) || keys::is_left(&event) || keys::is_right(&event) {
                    self.toggle(field);
                }
            }
            FieldKind::Choice => {
                if keys::is_left(&event) {
                    self.cycle(field, false);
                } else if keys::is_right(&event) || keys::is_toggle(&event) {
                    self.cycle(field, true);
                }
            }
            FieldKind::Text => match event.code {
                KeyCode::Char(c) if is_plain(&event) => self.edit_text(field, |s| s.push(c)),
                KeyCode::Backspace => self.edit_text(field, |s| {
                    s.pop();
                }),
                _ => {}
            },
            FieldKind::Secret => match event.code {
                KeyCode::Char(c) if is_plain(&event) => self.edit_secret(field, |s| s.push(c)),
                KeyCode::Backspace => self.edit_secret(field, Secret::pop),
                _ => {}
            },
        }
    }

    /// Insert pasted text into the focused text field
    pub fn handle_paste(&mut self, text: &str) {
        if self.session.navigation_locked() {
            return;
        }
        let Some(field) = self.focused() else { return };
        let printable = text.chars().filter(|c| !c.is_control());
        match field.kind() {
            FieldKind::Text => self.edit_text(field, |s| s.extend(printable)),
            FieldKind::Secret => self.edit_secret(field, |s| printable.for_each(|c| s.push(c))),
            FieldKind::Toggle | FieldKind::Choice => {}
        }
    }

    /// Go to the next step, reporting why if that is not possible
    pub fn next_step(&mut self) {
        if self.session.step() == WizardStep::Url && !self.session.draft().website_url.is_empty()
        {
            self.session.check_url();
        }
        match self.session.advance() {
            StepChange::Moved { .. } => {
                self.focused_field = 0;
                self.error_message = None;
                self.status_message = None;
            }
            // URL problems are already shown inline under the field
            StepChange::Blocked(_) if self.session.step() == WizardStep::Url => {
                self.error_message = None;
            }
            StepChange::Blocked(reason) => self.error_message = Some(reason),
            StepChange::Unchanged => {}
        }
    }

    /// Go back one step. Returns true when already on the first step.
    pub fn prev_step(&mut self) -> bool {
        match self.session.retreat() {
            StepChange::Moved { .. } => {
                self.focused_field = 0;
                self.error_message = None;
                self.status_message = None;
                false
            }
            _ => self.session.step() == WizardStep::first(),
        }
    }

    /// Back to step 1 after an export
    pub fn start_over(&mut self) {
        self.session.reset();
        self.focused_field = 0;
        self.error_message = None;
        self.status_message = None;
    }

    fn move_focus(&mut self, forward: bool) {
        let count = self.focus_count();
        if count == 0 {
            return;
        }
        self.focused_field = if forward {
            (self.focused_field + 1) % count
        } else {
            (self.focused_field + count - 1) % count
        };
    }

    fn clamp_focus(&mut self) {
        let count = self.focus_count();
        if self.focused_field >= count {
            self.focused_field = count.saturating_sub(1);
        }
    }

    fn edit_text(&mut self, field: Field, edit: impl FnOnce(&mut String)) {
        let mut value = self.display_value(field);
        edit(&mut value);
        if let Some(update) = text_update(field, value) {
            self.session.update_field(update);
        }
    }

    /// Edit a password in place; the plaintext never leaves a `Secret`
    fn edit_secret(&mut self, field: Field, edit: impl FnOnce(&mut Secret)) {
        let draft = self.session.draft();
        let update = match field {
            Field::KeystorePassword => {
                let mut secret = draft.keystore_password.clone();
                edit(&mut secret);
                FieldUpdate::KeystorePassword(secret)
            }
            Field::KeyPassword => {
                let mut secret = draft.key_password.clone();
                edit(&mut secret);
                FieldUpdate::KeyPassword(secret)
            }
            _ => return,
        };
        self.session.update_field(update);
    }

    fn toggle(&mut self, field: Field) {
        let value = !self.is_toggled(field);
        let update = match field {
            Field::PullToRefresh => FieldUpdate::PullToRefresh(value),
            Field::OfflineSupport => FieldUpdate::OfflineSupport(value),
            Field::PushNotifications => FieldUpdate::PushNotifications(value),
            Field::AdMobEnabled => FieldUpdate::AdMobEnabled(value),
            Field::UseCustomSigning => FieldUpdate::UseCustomSigning(value),
            _ => return,
        };
        self.session.update_field(update);
        self.clamp_focus();
    }

    fn cycle(&mut self, field: Field, forward: bool) {
        let draft = self.session.draft();
        let update = match field {
            Field::TargetSdk => {
                FieldUpdate::TargetSdk(cycle_in(&TargetSdk::ALL, draft.target_sdk, forward))
            }
            Field::NavigationStyle => FieldUpdate::NavigationStyle(cycle_in(
                &NavigationStyle::ALL,
                draft.navigation_style,
                forward,
            )),
            Field::DisplayMode => {
                FieldUpdate::DisplayMode(cycle_in(&DisplayMode::ALL, draft.display_mode, forward))
            }
            _ => return,
        };
        self.session.update_field(update);
    }
}

fn is_plain(event: &KeyEvent) -> bool {
    event.modifiers.is_empty() || event.modifiers == KeyModifiers::SHIFT
}

fn on_off(value: bool) -> String {
    let text = if value { "on" } else { "off" };
    text.to_string()
}

fn cycle_in<T: Copy + PartialEq>(options: &[T], current: T, forward: bool) -> T {
    let len = options.len();
    let index = options.iter().position(|o| *o == current).unwrap_or(0);
    let next = if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    };
    options[next]
}

fn text_update(field: Field, value: String) -> Option<FieldUpdate> {
    Some(match field {
        Field::WebsiteUrl => FieldUpdate::WebsiteUrl(value),
        Field::AppName => FieldUpdate::AppName(value),
        Field::PackageName => FieldUpdate::PackageName(value),
        Field::Version => FieldUpdate::Version(value),
        Field::ThemeColor => FieldUpdate::ThemeColor(value),
        Field::BackgroundColor => FieldUpdate::BackgroundColor(value),
        Field::SplashText => FieldUpdate::SplashText(value),
        Field::OneSignalId => FieldUpdate::OneSignalId(value),
        Field::AdMobAppId => FieldUpdate::AdMobAppId(value),
        Field::AdMobBannerId => FieldUpdate::AdMobBannerId(value),
        Field::KeystoreAlias => FieldUpdate::KeystoreAlias(value),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::validate::{INVALID_URL_MESSAGE, MISSING_URL_MESSAGE};
    use crate::wizard::{SessionOptions, ValidationPolicy};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn type_text(form: &mut WizardForm, text: &str) {
        for c in text.chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn form_at(step: WizardStep) -> WizardForm {
        let mut form = WizardForm::new(WizardSession::default());
        type_text(&mut form, "https://example.com");
        while form.session.step() != step {
            form.handle_key(key(KeyCode::Enter));
        }
        form
    }

    #[test]
    fn test_typing_url_and_advancing() {
        let mut form = WizardForm::new(WizardSession::default());
        type_text(&mut form, "https://example.com");
        assert_eq!(form.session.draft().website_url, "https://example.com");

        form.handle_key(key(KeyCode::Backspace));
        assert_eq!(form.session.draft().website_url, "https://example.co");

        form.handle_key(key(KeyCode::Enter));
        assert_eq!(form.session.step(), WizardStep::Identity);
        assert!(form.error_message.is_none());
    }

    #[test]
    fn test_enter_with_empty_url_shows_message_once() {
        let mut form = WizardForm::new(WizardSession::default());
        form.handle_key(key(KeyCode::Enter));
        assert_eq!(form.session.step(), WizardStep::Url);
        assert_eq!(form.session.url_error(), Some(MISSING_URL_MESSAGE));
        assert!(form.error_message.is_none());
    }

    #[test]
    fn test_strict_block_uses_error_line() {
        let options = SessionOptions {
            policy: ValidationPolicy::Strict,
            ..SessionOptions::default()
        };
        let mut form = WizardForm::new(WizardSession::new(options));
        type_text(&mut form, "https://example.com");
        form.handle_key(key(KeyCode::Enter));
        assert_eq!(form.session.step(), WizardStep::Identity);

        // App name is empty, so strict mode keeps us here
        form.handle_key(key(KeyCode::Enter));
        assert_eq!(form.session.step(), WizardStep::Identity);
        assert!(form.error_message.is_some());
    }

    #[test]
    fn test_malformed_url_flagged_but_not_blocking() {
        let mut form = WizardForm::new(WizardSession::default());
        type_text(&mut form, "example");
        form.handle_key(key(KeyCode::Enter));
        assert_eq!(form.session.step(), WizardStep::Identity);
        assert_eq!(form.session.url_error(), Some(INVALID_URL_MESSAGE));
    }

    #[test]
    fn test_esc_on_first_step_cancels() {
        let mut form = WizardForm::new(WizardSession::default());
        assert_eq!(form.handle_key(key(KeyCode::Esc)), WizardAction::Cancel);

        let mut form = form_at(WizardStep::Design);
        assert_eq!(form.handle_key(key(KeyCode::Esc)), WizardAction::None);
        assert_eq!(form.session.step(), WizardStep::Identity);
    }

    #[test]
    fn test_focus_wraps() {
        let mut form = form_at(WizardStep::Identity);
        assert_eq!(form.focused(), Some(Field::AppName));
        form.handle_key(key(KeyCode::Up));
        assert_eq!(form.focused(), Some(Field::TargetSdk));
        form.handle_key(key(KeyCode::Tab));
        assert_eq!(form.focused(), Some(Field::AppName));
    }

    #[test]
    fn test_cycle_navigation_style() {
        let mut form = form_at(WizardStep::Design);
        form.handle_key(key(KeyCode::Tab));
        form.handle_key(key(KeyCode::Tab));
        assert_eq!(form.focused(), Some(Field::NavigationStyle));

        form.handle_key(key(KeyCode::Right));
        assert_eq!(form.session.draft().navigation_style, NavigationStyle::Floating);
        form.handle_key(key(KeyCode::Right));
        assert_eq!(form.session.draft().navigation_style, NavigationStyle::Tabs);
        form.handle_key(key(KeyCode::Left));
        form.handle_key(key(KeyCode::Left));
        form.handle_key(key(KeyCode::Left));
        assert_eq!(form.session.draft().navigation_style, NavigationStyle::None);
    }

    #[test]
    fn test_admob_toggle_reveals_and_keeps_ids() {
        let mut form = form_at(WizardStep::Advanced);
        assert!(!form.fields().contains(&Field::AdMobAppId));

        while form.focused() != Some(Field::AdMobEnabled) {
            form.handle_key(key(KeyCode::Tab));
        }
        form.handle_key(key(KeyCode::Char(' ')));
        assert!(form.session.draft().admob_enabled);
        assert!(form.fields().contains(&Field::AdMobAppId));

        form.handle_key(key(KeyCode::Tab));
        assert_eq!(form.focused(), Some(Field::AdMobAppId));
        type_text(&mut form, "ca-app-pub-1");

        form.handle_key(key(KeyCode::BackTab));
        form.handle_key(key(KeyCode::Char(' ')));
        assert!(!form.session.draft().admob_enabled);
        assert!(!form.fields().contains(&Field::AdMobAppId));
        assert_eq!(form.session.draft().admob_app_id, "ca-app-pub-1");
    }

    #[test]
    fn test_password_is_masked() {
        let mut form = form_at(WizardStep::Signing);
        form.handle_key(key(KeyCode::Char(' ')));
        while form.focused() != Some(Field::KeystorePassword) {
            form.handle_key(key(KeyCode::Tab));
        }
        type_text(&mut form, "pw12");
        assert_eq!(form.session.draft().keystore_password.expose(), "pw12");
        assert_eq!(form.display_value(Field::KeystorePassword), "••••");
    }

    #[test]
    fn test_password_editing_keys_and_paste() {
        let mut form = form_at(WizardStep::Signing);
        form.handle_key(key(KeyCode::Char(' ')));
        while form.focused() != Some(Field::KeyPassword) {
            form.handle_key(key(KeyCode::Tab));
        }

        type_text(&mut form, "abc");
        form.handle_key(key(KeyCode::Backspace));
        form.handle_paste("XY\n");
        form.handle_key(key(KeyCode::Char('Z')));

        let draft = form.session.draft();
        assert_eq!(draft.key_password.expose(), "abXYZ");
        assert!(draft.keystore_password.is_empty());
        assert_eq!(form.display_value(Field::KeyPassword), "•••••");
    }

    #[test]
    fn test_paste_into_text_field() {
        let mut form = WizardForm::new(WizardSession::default());
        form.handle_paste("https://pasted.example\n");
        assert_eq!(form.session.draft().website_url, "https://pasted.example");
    }

    #[test]
    fn test_export_screen_actions() {
        let mut form = form_at(WizardStep::Export);
        assert_eq!(form.handle_key(key(KeyCode::Enter)), WizardAction::StartExport);

        let ticket = form.session.start_export().unwrap();
        // Keys are ignored while generating
        assert_eq!(form.handle_key(key(KeyCode::Esc)), WizardAction::None);
        assert_eq!(form.session.step(), WizardStep::Export);

        form.session.complete_export(&ticket.finished());
        form.focused_field = 0;
        form.handle_key(key(KeyCode::Down));
        assert_eq!(
            form.handle_key(key(KeyCode::Enter)),
            WizardAction::Export(ExportAction::DebugApkGuide)
        );
        form.handle_key(key(KeyCode::Up));
        form.handle_key(key(KeyCode::Up));
        assert_eq!(form.focused_action(), ExportAction::StartOver);

        form.start_over();
        assert_eq!(form.session.step(), WizardStep::Url);
        assert_eq!(form.session.draft().website_url, "https://example.com");
    }

    #[test]
    fn test_ctrl_s_requests_preset_save() {
        let mut form = WizardForm::new(WizardSession::default());
        let event = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(form.handle_key(event), WizardAction::SavePreset);
        assert!(form.session.draft().website_url.is_empty());
    }
}
