//! Draft validation
//!
//! `validate_url` is the inline URL check. `step_issues` applies one policy to
//! every other field: each check yields a [`FieldIssue`], and the session
//! decides from [`ValidationPolicy`] whether issues block navigation.

use super::draft::AppDraft;
use super::step::WizardStep;
use crate::error::AppForgeError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Message shown under the URL field when parsing fails
pub const INVALID_URL_MESSAGE: &str = "Please enter a valid URL (e.g., https://example.com)";

/// Message shown when trying to leave step 1 without a URL
pub const MISSING_URL_MESSAGE: &str = "Website URL is required";

static PACKAGE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]*(\.[A-Za-z][A-Za-z0-9_]*)+$")
        .expect("Failed to compile package name pattern")
});

static HEX_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Failed to compile hex color pattern")
});

/// Whether field issues block `advance()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Issues are shown but never block (only an empty URL does)
    #[default]
    Lenient,
    /// Any issue on the current step blocks moving forward
    Strict,
}

/// A problem with one field of the draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

impl FieldIssue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Parse `candidate` as an absolute URL.
///
/// Relative references and free text fail with [`INVALID_URL_MESSAGE`].
pub fn validate_url(candidate: &str) -> Result<Url, AppForgeError> {
    Url::parse(candidate.trim()).map_err(|e| {
        tracing::debug!("URL rejected ({}): {:?}", e, candidate);
        AppForgeError::InvalidUrl {
            input: candidate.to_string(),
            message: INVALID_URL_MESSAGE.to_string(),
        }
    })
}

/// Dotted Java-style package identifier, e.g. `com.example.app`
pub fn is_package_name(candidate: &str) -> bool {
    PACKAGE_NAME_RE.is_match(candidate)
}

/// `#rrggbb` color literal
pub fn is_hex_color(candidate: &str) -> bool {
    HEX_COLOR_RE.is_match(candidate)
}

/// All issues for the fields collected on `step`
pub fn step_issues(step: WizardStep, draft: &AppDraft) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    match step {
        WizardStep::Url => {
            if draft.website_url.is_empty() {
                issues.push(FieldIssue::new("website_url", MISSING_URL_MESSAGE));
            } else if validate_url(&draft.website_url).is_err() {
                issues.push(FieldIssue::new("website_url", INVALID_URL_MESSAGE));
            }
        }
        WizardStep::Identity => {
            if draft.app_name.trim().is_empty() {
                issues.push(FieldIssue::new("app_name", "App name is empty"));
            }
            if !is_package_name(&draft.package_name) {
                issues.push(FieldIssue::new(
                    "package_name",
                    "Package name should look like com.company.app",
                ));
            }
            if draft.version.trim().is_empty() {
                issues.push(FieldIssue::new("version", "Version is empty"));
            }
        }
        WizardStep::Design => {
            if !is_hex_color(&draft.theme_color) {
                issues.push(FieldIssue::new("theme_color", "Theme color must be #RRGGBB"));
            }
            if !is_hex_color(&draft.background_color) {
                issues.push(FieldIssue::new(
                    "background_color",
                    "Background color must be #RRGGBB",
                ));
            }
        }
        WizardStep::Advanced => {
            if draft.push_notifications && draft.onesignal_id.trim().is_empty() {
                issues.push(FieldIssue::new(
                    "onesignal_id",
                    "Push notifications need a OneSignal app ID",
                ));
            }
            if draft.admob_enabled {
                if draft.admob_app_id.trim().is_empty() {
                    issues.push(FieldIssue::new("admob_app_id", "AdMob app ID is empty"));
                }
                if draft.admob_banner_id.trim().is_empty() {
                    issues.push(FieldIssue::new("admob_banner_id", "Banner ad unit ID is empty"));
                }
            }
        }
        WizardStep::Signing => {
            if draft.use_custom_signing {
                if draft.keystore_alias.trim().is_empty() {
                    issues.push(FieldIssue::new("keystore_alias", "Key alias is empty"));
                }
                if draft.keystore_password.is_empty() {
                    issues.push(FieldIssue::new(
                        "keystore_password",
                        "Keystore password is empty",
                    ));
                }
            }
        }
        WizardStep::Export => {}
    }
    issues
}

/// Issues across the whole draft, in step order
pub fn all_issues(draft: &AppDraft) -> Vec<(WizardStep, FieldIssue)> {
    WizardStep::ALL
        .into_iter()
        .flat_map(|step| {
            step_issues(step, draft)
                .into_iter()
                .map(move |issue| (step, issue))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::draft::{FieldUpdate, Secret};
    use rstest::rstest;

    #[test]
    fn test_validate_url_accepts_absolute() {
        let url = validate_url("https://example.com").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn test_validate_url_rejects_free_text() {
        let err = validate_url("not a url").unwrap_err();
        assert!(!err.to_string().is_empty());
        assert_eq!(err.to_string(), INVALID_URL_MESSAGE);
    }

    #[rstest]
    #[case("example.com", false)]
    #[case("/relative/path", false)]
    #[case("", false)]
    #[case("http://localhost:8080/app", true)]
    #[case("  https://padded.example  ", true)]
    fn test_validate_url_cases(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(validate_url(input).is_ok(), ok, "input: {:?}", input);
    }

    #[rstest]
    #[case("com.my.awesomeapp", true)]
    #[case("io.crab_shop.app2", true)]
    #[case("awesomeapp", false)]
    #[case("com..app", false)]
    #[case("1com.app", false)]
    #[case("com.my app", false)]
    fn test_package_names(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(is_package_name(input), ok, "input: {:?}", input);
    }

    #[test]
    fn test_hex_colors() {
        assert!(is_hex_color("#3b82f6"));
        assert!(is_hex_color("#FFFFFF"));
        assert!(!is_hex_color("3b82f6"));
        assert!(!is_hex_color("#fff"));
    }

    #[test]
    fn test_default_draft_issues() {
        let draft = AppDraft::default();
        let issues = all_issues(&draft);
        let fields: Vec<&str> = issues.iter().map(|(_, i)| i.field).collect();
        assert_eq!(fields, vec!["website_url", "app_name"]);
    }

    #[test]
    fn test_ad_ids_only_checked_when_enabled() {
        let mut draft = AppDraft::default();
        assert!(step_issues(WizardStep::Advanced, &draft).is_empty());
        draft.apply(FieldUpdate::AdMobEnabled(true));
        assert_eq!(step_issues(WizardStep::Advanced, &draft).len(), 2);
    }

    #[test]
    fn test_signing_checks_only_custom() {
        let mut draft = AppDraft::default();
        assert!(step_issues(WizardStep::Signing, &draft).is_empty());
        draft.apply(FieldUpdate::UseCustomSigning(true));
        assert_eq!(step_issues(WizardStep::Signing, &draft)[0].field, "keystore_password");
        draft.apply(FieldUpdate::KeystorePassword(Secret::new("pw")));
        assert!(step_issues(WizardStep::Signing, &draft).is_empty());
    }
}
