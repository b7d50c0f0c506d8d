//! Live device preview
//!
//! A pure projection of the draft (plus the export phase) into what the
//! phone mock-up shows. Drawing lives in `tui::preview_render`.

use super::draft::{AppDraft, NavigationStyle};
use super::export::ExportPhase;
use serde::Serialize;

/// Clock shown in the mock status bar
pub const STATUS_BAR_TIME: &str = "9:41";

const FALLBACK_THEME: Rgb = Rgb(0x3b, 0x82, 0xf6);
const FALLBACK_BACKGROUND: Rgb = Rgb(0xff, 0xff, 0xff);

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#rrggbb`. Anything else yields `None`, matching
    /// `validate::is_hex_color`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Bottom navigation chrome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BottomChrome {
    None,
    Floating,
    Tabs,
}

/// Full-screen splash drawn while the build runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplashOverlay {
    pub text: String,
    pub color: Rgb,
}

/// Everything the phone mock-up displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewModel {
    pub status_time: &'static str,
    /// Title bar, present only for the classic navigation style
    pub top_bar: Option<String>,
    pub title: String,
    pub subtitle: &'static str,
    pub refresh_indicator: bool,
    pub ad_banner: bool,
    pub bottom_chrome: BottomChrome,
    pub splash: Option<SplashOverlay>,
    pub theme: Rgb,
    pub background: Rgb,
    pub badges: [&'static str; 2],
}

impl PreviewModel {
    pub fn project(draft: &AppDraft, phase: ExportPhase) -> Self {
        let theme = Rgb::from_hex(&draft.theme_color).unwrap_or(FALLBACK_THEME);
        let background = Rgb::from_hex(&draft.background_color).unwrap_or(FALLBACK_BACKGROUND);

        let top_bar = (draft.navigation_style == NavigationStyle::Classic)
            .then(|| non_empty_or(&draft.app_name, "App Name"));

        let bottom_chrome = match draft.navigation_style {
            NavigationStyle::Floating => BottomChrome::Floating,
            NavigationStyle::Tabs => BottomChrome::Tabs,
            NavigationStyle::Classic | NavigationStyle::None => BottomChrome::None,
        };

        let subtitle = if draft.website_url.is_empty() {
            "Configure URL to preview"
        } else {
            "Connecting to source..."
        };

        let splash = phase.is_in_progress().then(|| SplashOverlay {
            text: draft.splash_text.clone(),
            color: theme,
        });

        Self {
            status_time: STATUS_BAR_TIME,
            top_bar,
            title: non_empty_or(&draft.app_name, "Preview"),
            subtitle,
            refresh_indicator: draft.pull_to_refresh,
            ad_banner: draft.admob_enabled,
            bottom_chrome,
            splash,
            theme,
            background,
            badges: ["API 36 COMPLIANT", "V3 SIGNING"],
        }
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
