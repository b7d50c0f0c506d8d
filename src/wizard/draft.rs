//! Configuration draft
//!
//! The flat record of everything the wizard collects. Created from defaults
//! (or a preset file), mutated one field at a time through [`FieldUpdate`].

use crate::error::{AppForgeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use zeroize::Zeroizing;

/// Password-like value. Wiped on drop, never printed by `Debug`, never serialized.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(Zeroizing<String>);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// Borrow the plaintext value
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn push(&mut self, c: char) {
        self.0.push(c);
    }

    pub fn pop(&mut self) {
        self.0.pop();
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            f.write_str("Secret(<empty>)")
        } else {
            f.write_str("Secret(<redacted>)")
        }
    }
}

/// Target Android platform level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TargetSdk {
    #[default]
    Android16,
    Android15,
    Android14,
    Android13,
}

impl TargetSdk {
    pub const ALL: [TargetSdk; 4] = [
        Self::Android16,
        Self::Android15,
        Self::Android14,
        Self::Android13,
    ];

    pub fn api_level(&self) -> u8 {
        match self {
            Self::Android16 => 36,
            Self::Android15 => 35,
            Self::Android14 => 34,
            Self::Android13 => 33,
        }
    }

    pub fn android_version(&self) -> u8 {
        self.api_level() - 20
    }

    pub fn label(&self) -> String {
        let base = format!("Android {} (API {})", self.android_version(), self.api_level());
        if *self == Self::Android16 {
            format!("{} - Latest", base)
        } else {
            base
        }
    }
}

impl TryFrom<u8> for TargetSdk {
    type Error = String;

    fn try_from(level: u8) -> std::result::Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|sdk| sdk.api_level() == level)
            .ok_or_else(|| format!("unsupported API level {}", level))
    }
}

impl From<TargetSdk> for u8 {
    fn from(sdk: TargetSdk) -> Self {
        sdk.api_level()
    }
}

/// Navigation chrome shown around the web content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationStyle {
    #[default]
    Classic,
    Floating,
    Tabs,
    None,
}

impl NavigationStyle {
    pub const ALL: [NavigationStyle; 4] = [Self::Classic, Self::Floating, Self::Tabs, Self::None];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Floating => "floating",
            Self::Tabs => "tabs",
            Self::None => "none",
        }
    }
}

impl FromStr for NavigationStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| "expected one of classic, floating, tabs, none".to_string())
    }
}

/// Web app manifest display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    Fullscreen,
    #[default]
    Standalone,
    MinimalUi,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 3] = [Self::Fullscreen, Self::Standalone, Self::MinimalUi];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Fullscreen => "fullscreen",
            Self::Standalone => "standalone",
            Self::MinimalUi => "minimal-ui",
        }
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| "expected one of fullscreen, standalone, minimal-ui".to_string())
    }
}

/// Everything the wizard collects about the app being configured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppDraft {
    // Step 1: URL
    pub website_url: String,

    // Step 2: Identity
    pub app_name: String,
    pub package_name: String,
    pub version: String,
    pub target_sdk: TargetSdk,

    // Step 3: Design
    pub theme_color: String,
    pub background_color: String,
    pub navigation_style: NavigationStyle,
    pub splash_text: String,
    pub display_mode: DisplayMode,

    // Step 4: Advanced
    pub pull_to_refresh: bool,
    pub offline_support: bool,
    pub push_notifications: bool,
    pub onesignal_id: String,
    pub admob_enabled: bool,
    pub admob_app_id: String,
    pub admob_banner_id: String,

    // Step 5: Signing
    pub use_custom_signing: bool,
    pub keystore_alias: String,
    #[serde(skip)]
    pub keystore_password: Secret,
    #[serde(skip)]
    pub key_password: Secret,
}

impl Default for AppDraft {
    fn default() -> Self {
        Self {
            website_url: String::new(),
            app_name: String::new(),
            package_name: "com.my.awesomeapp".to_string(),
            version: "1.0.0".to_string(),
            target_sdk: TargetSdk::Android16,
            theme_color: "#3b82f6".to_string(),
            background_color: "#ffffff".to_string(),
            navigation_style: NavigationStyle::Classic,
            splash_text: "Loading...".to_string(),
            display_mode: DisplayMode::Standalone,
            pull_to_refresh: true,
            offline_support: true,
            push_notifications: false,
            onesignal_id: String::new(),
            admob_enabled: false,
            admob_app_id: String::new(),
            admob_banner_id: String::new(),
            use_custom_signing: false,
            keystore_alias: "upload".to_string(),
            keystore_password: Secret::default(),
            key_password: Secret::default(),
        }
    }
}

/// A single-field change to the draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    WebsiteUrl(String),
    AppName(String),
    PackageName(String),
    Version(String),
    TargetSdk(TargetSdk),
    ThemeColor(String),
    BackgroundColor(String),
    NavigationStyle(NavigationStyle),
    SplashText(String),
    DisplayMode(DisplayMode),
    PullToRefresh(bool),
    OfflineSupport(bool),
    PushNotifications(bool),
    OneSignalId(String),
    AdMobEnabled(bool),
    AdMobAppId(String),
    AdMobBannerId(String),
    UseCustomSigning(bool),
    KeystoreAlias(String),
    KeystorePassword(Secret),
    KeyPassword(Secret),
}

impl FieldUpdate {
    /// Canonical snake_case name of the targeted field
    pub fn name(&self) -> &'static str {
        match self {
            Self::WebsiteUrl(_) => "website_url",
            Self::AppName(_) => "app_name",
            Self::PackageName(_) => "package_name",
            Self::Version(_) => "version",
            Self::TargetSdk(_) => "target_sdk",
            Self::ThemeColor(_) => "theme_color",
            Self::BackgroundColor(_) => "background_color",
            Self::NavigationStyle(_) => "navigation_style",
            Self::SplashText(_) => "splash_text",
            Self::DisplayMode(_) => "display_mode",
            Self::PullToRefresh(_) => "pull_to_refresh",
            Self::OfflineSupport(_) => "offline_support",
            Self::PushNotifications(_) => "push_notifications",
            Self::OneSignalId(_) => "onesignal_id",
            Self::AdMobEnabled(_) => "admob_enabled",
            Self::AdMobAppId(_) => "admob_app_id",
            Self::AdMobBannerId(_) => "admob_banner_id",
            Self::UseCustomSigning(_) => "use_custom_signing",
            Self::KeystoreAlias(_) => "keystore_alias",
            Self::KeystorePassword(_) => "keystore_password",
            Self::KeyPassword(_) => "key_password",
        }
    }

    /// Build an update from a field name and its textual value.
    ///
    /// Names are matched ignoring case, `_` and `-`, so both `app_name` and
    /// `appName` work. The older manifest spellings (`splashScreenText`,
    /// `keystorePass`, `keyPass`) are accepted too.
    pub fn parse(name: &str, value: &str) -> Result<Self> {
        let key: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        let text = || value.to_string();

        let update = match key.as_str() {
            "websiteurl" | "url" => Self::WebsiteUrl(text()),
            "appname" | "name" => Self::AppName(text()),
            "packagename" | "package" => Self::PackageName(text()),
            "version" => Self::Version(text()),
            "targetsdk" => {
                let level: u8 = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid("target_sdk", value, "expected an API level number"))?;
                Self::TargetSdk(
                    TargetSdk::try_from(level).map_err(|e| invalid("target_sdk", value, &e))?,
                )
            }
            "themecolor" => Self::ThemeColor(text()),
            "backgroundcolor" => Self::BackgroundColor(text()),
            "navigationstyle" => Self::NavigationStyle(
                value
                    .parse()
                    .map_err(|e: String| invalid("navigation_style", value, &e))?,
            ),
            "splashtext" | "splashscreentext" => Self::SplashText(text()),
            "displaymode" => Self::DisplayMode(
                value
                    .parse()
                    .map_err(|e: String| invalid("display_mode", value, &e))?,
            ),
            "pulltorefresh" => Self::PullToRefresh(parse_bool("pull_to_refresh", value)?),
            "offlinesupport" => Self::OfflineSupport(parse_bool("offline_support", value)?),
            "pushnotifications" => {
                Self::PushNotifications(parse_bool("push_notifications", value)?)
            }
            "onesignalid" => Self::OneSignalId(text()),
            "admobenabled" => Self::AdMobEnabled(parse_bool("admob_enabled", value)?),
            "admobappid" => Self::AdMobAppId(text()),
            "admobbannerid" => Self::AdMobBannerId(text()),
            "usecustomsigning" => {
                Self::UseCustomSigning(parse_bool("use_custom_signing", value)?)
            }
            "keystorealias" => Self::KeystoreAlias(text()),
            "keystorepassword" | "keystorepass" => Self::KeystorePassword(Secret::new(value)),
            "keypassword" | "keypass" => Self::KeyPassword(Secret::new(value)),
            _ => return Err(AppForgeError::UnknownField(name.to_string())),
        };
        Ok(update)
    }

    /// Parse a `name=value` pair as given on the command line
    pub fn parse_assignment(assignment: &str) -> Result<Self> {
        let (name, value) = assignment.split_once('=').ok_or_else(|| {
            AppForgeError::InvalidFieldValue {
                field: "assignment",
                value: assignment.to_string(),
                reason: "expected name=value".to_string(),
            }
        })?;
        Self::parse(name.trim(), value)
    }
}

fn invalid(field: &'static str, value: &str, reason: &str) -> AppForgeError {
    AppForgeError::InvalidFieldValue {
        field,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_bool(field: &'static str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(invalid(field, value, "expected true or false")),
    }
}

impl AppDraft {
    /// Merge a single field into the draft. No other field is touched.
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::WebsiteUrl(v) => self.website_url = v,
            FieldUpdate::AppName(v) => self.app_name = v,
            FieldUpdate::PackageName(v) => self.package_name = v,
            FieldUpdate::Version(v) => self.version = v,
            FieldUpdate::TargetSdk(v) => self.target_sdk = v,
            FieldUpdate::ThemeColor(v) => self.theme_color = v,
            FieldUpdate::BackgroundColor(v) => self.background_color = v,
            FieldUpdate::NavigationStyle(v) => self.navigation_style = v,
            FieldUpdate::SplashText(v) => self.splash_text = v,
            FieldUpdate::DisplayMode(v) => self.display_mode = v,
            FieldUpdate::PullToRefresh(v) => self.pull_to_refresh = v,
            FieldUpdate::OfflineSupport(v) => self.offline_support = v,
            FieldUpdate::PushNotifications(v) => self.push_notifications = v,
            FieldUpdate::OneSignalId(v) => self.onesignal_id = v,
            FieldUpdate::AdMobEnabled(v) => self.admob_enabled = v,
            FieldUpdate::AdMobAppId(v) => self.admob_app_id = v,
            FieldUpdate::AdMobBannerId(v) => self.admob_banner_id = v,
            FieldUpdate::UseCustomSigning(v) => self.use_custom_signing = v,
            FieldUpdate::KeystoreAlias(v) => self.keystore_alias = v,
            FieldUpdate::KeystorePassword(v) => self.keystore_password = v,
            FieldUpdate::KeyPassword(v) => self.key_password = v,
        }
    }

    /// Load a draft from a TOML preset. Missing keys keep their defaults.
    pub fn load_preset(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| AppForgeError::io(path, e))?;
        toml::from_str(&contents).map_err(|e| AppForgeError::Preset {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save the draft as a TOML preset. Passwords are never written.
    pub fn save_preset(&self, path: &Path) -> Result<()> {
        let toml_string = toml::to_string_pretty(self).map_err(|e| AppForgeError::Preset {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| AppForgeError::io(parent, e))?;
        }
        fs::write(path, toml_string).map_err(|e| AppForgeError::io(path, e))?;

        tracing::info!("Draft preset saved to: {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let draft = AppDraft::default();
        assert!(draft.website_url.is_empty());
        assert_eq!(draft.package_name, "com.my.awesomeapp");
        assert_eq!(draft.version, "1.0.0");
        assert_eq!(draft.target_sdk.api_level(), 36);
        assert_eq!(draft.navigation_style, NavigationStyle::Classic);
        assert!(draft.pull_to_refresh);
        assert!(draft.offline_support);
        assert!(!draft.admob_enabled);
        assert_eq!(draft.keystore_alias, "upload");
        assert!(draft.keystore_password.is_empty());
        assert!(!draft.use_custom_signing);
    }

    #[test]
    fn test_apply_touches_only_target_field() {
        let mut draft = AppDraft::default();
        draft.apply(FieldUpdate::AppName("Crab Shop".to_string()));

        let mut expected = AppDraft::default();
        expected.app_name = "Crab Shop".to_string();
        assert_eq!(draft, expected);
    }

    #[rstest]
    #[case("app_name", "Shop", FieldUpdate::AppName("Shop".to_string()))]
    #[case("appName", "Shop", FieldUpdate::AppName("Shop".to_string()))]
    #[case("websiteUrl", "https://a.io", FieldUpdate::WebsiteUrl("https://a.io".to_string()))]
    #[case("target_sdk", "34", FieldUpdate::TargetSdk(TargetSdk::Android14))]
    #[case("navigationStyle", "Tabs", FieldUpdate::NavigationStyle(NavigationStyle::Tabs))]
    #[case("display-mode", "minimal-ui", FieldUpdate::DisplayMode(DisplayMode::MinimalUi))]
    #[case("adMobEnabled", "yes", FieldUpdate::AdMobEnabled(true))]
    #[case("splashScreenText", "Hi", FieldUpdate::SplashText("Hi".to_string()))]
    #[case("keyPass", "s3cret", FieldUpdate::KeyPassword(Secret::new("s3cret")))]
    fn test_parse_field_names(
        #[case] name: &str,
        #[case] value: &str,
        #[case] expected: FieldUpdate,
    ) {
        assert_eq!(FieldUpdate::parse(name, value).unwrap(), expected);
    }

    #[test]
    fn test_parse_rejects_unknown_and_invalid() {
        assert!(matches!(
            FieldUpdate::parse("favourite_colour", "red"),
            Err(AppForgeError::UnknownField(_))
        ));
        assert!(matches!(
            FieldUpdate::parse("target_sdk", "12"),
            Err(AppForgeError::InvalidFieldValue { field: "target_sdk", .. })
        ));
        assert!(matches!(
            FieldUpdate::parse("pull_to_refresh", "maybe"),
            Err(AppForgeError::InvalidFieldValue { .. })
        ));
    }

    #[test]
    fn test_parse_assignment() {
        let update = FieldUpdate::parse_assignment("version=2.0.0").unwrap();
        assert_eq!(update, FieldUpdate::Version("2.0.0".to_string()));
        // Value may itself contain '='
        let update = FieldUpdate::parse_assignment("url=https://a.io/?q=1").unwrap();
        assert_eq!(update, FieldUpdate::WebsiteUrl("https://a.io/?q=1".to_string()));
        assert!(FieldUpdate::parse_assignment("version").is_err());
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = Secret::new("hunter2");
        let printed = format!("{:?}", secret);
        assert!(!printed.contains("hunter2"));
        assert_eq!(secret.expose(), "hunter2");
        assert_eq!(secret.len(), 7);
    }

    #[test]
    fn test_preset_round_trip_skips_passwords() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shop.toml");

        let mut draft = AppDraft::default();
        draft.apply(FieldUpdate::WebsiteUrl("https://shop.example".to_string()));
        draft.apply(FieldUpdate::NavigationStyle(NavigationStyle::Floating));
        draft.apply(FieldUpdate::KeystorePassword(Secret::new("hunter2")));
        draft.save_preset(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("hunter2"));
        assert!(written.contains("navigation_style = \"floating\""));
        assert!(written.contains("target_sdk = 36"));

        let loaded = AppDraft::load_preset(&path).unwrap();
        assert_eq!(loaded.website_url, "https://shop.example");
        assert_eq!(loaded.navigation_style, NavigationStyle::Floating);
        assert!(loaded.keystore_password.is_empty());
    }

    #[test]
    fn test_partial_preset_keeps_defaults() {
        let draft: AppDraft = toml::from_str("app_name = \"Tiny\"\n").unwrap();
        assert_eq!(draft.app_name, "Tiny");
        assert_eq!(draft.package_name, "com.my.awesomeapp");
        assert_eq!(draft.display_mode, DisplayMode::Standalone);
    }

    #[test]
    fn test_preset_bad_sdk_is_preset_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "target_sdk = 21\n").unwrap();
        assert!(matches!(
            AppDraft::load_preset(&path),
            Err(AppForgeError::Preset { .. })
        ));
    }

    #[test]
    fn test_target_sdk_labels() {
        assert_eq!(TargetSdk::Android16.label(), "Android 16 (API 36) - Latest");
        assert_eq!(TargetSdk::Android13.label(), "Android 13 (API 33)");
    }
}
