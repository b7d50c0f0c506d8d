//! Export artifacts
//!
//! The export produces text only: a report link, two Markdown guides and a
//! summary table. Nothing here builds a real package.

use super::draft::AppDraft;
use crate::error::{AppForgeError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Default page the report link points at
pub const DEFAULT_REPORT_BASE_URL: &str = "https://www.pwabuilder.com/report";

/// Shown when the user asks for the project source
pub const PROJECT_SOURCE_NOTICE: &str = "Project source bundling is not produced here. \
    Follow the debug APK guide or the report page to get a buildable package.";

const REDACTED: &str = "********";

/// How passwords appear in the signing guide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecretPolicy {
    /// Passwords replaced by asterisks
    #[default]
    Redact,
    /// Passwords written as entered, with a warning banner
    Plaintext,
}

impl SecretPolicy {
    pub fn from_include_passwords(include: bool) -> Self {
        if include { Self::Plaintext } else { Self::Redact }
    }
}

/// Guide documents the export screen offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum GuideKind {
    DebugApk,
    Signing,
}

impl GuideKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::DebugApk => "APK_BUILD_INSTRUCTIONS.md",
            Self::Signing => "RELEASE_INSTRUCTIONS.md",
        }
    }

    pub fn render(&self, draft: &AppDraft, policy: SecretPolicy) -> String {
        match self {
            Self::DebugApk => debug_apk_guide(),
            Self::Signing => signing_guide(draft, policy),
        }
    }
}

/// External report link for the configured site
pub fn report_url(draft: &AppDraft, base: &str) -> String {
    format!(
        "{}?url={}",
        base.trim_end_matches('?'),
        urlencoding::encode(&draft.website_url)
    )
}

pub fn debug_apk_guide() -> String {
    [
        "# How to get your Debug APK",
        "1. We have generated an Android Studio project for you.",
        "2. Download the 'Project Source' from the Export screen.",
        "3. Open it in Android Studio.",
        "4. Click 'Build' -> 'Build Bundle(s) / APK(s)' -> 'Build APK(s)'.",
        "Your real device-ready APK will be ready in seconds!",
    ]
    .join("\n")
}

/// Release signing walkthrough.
///
/// The key password falls back to the keystore password when left empty.
pub fn signing_guide(draft: &AppDraft, policy: SecretPolicy) -> String {
    let alias = &draft.keystore_alias;
    let (keystore_pass, key_pass) = match policy {
        SecretPolicy::Redact => (REDACTED, REDACTED),
        SecretPolicy::Plaintext => {
            let keystore = draft.keystore_password.expose();
            let key = if draft.key_password.is_empty() {
                keystore
            } else {
                draft.key_password.expose()
            };
            (or_redacted(keystore), or_redacted(key))
        }
    };

    let mut doc = String::new();
    if policy == SecretPolicy::Plaintext {
        doc.push_str(
            "> WARNING: this file contains plaintext passwords. \
             Do not commit it or share it.\n\n",
        );
    }
    doc.push_str(&format!(
        "# App Signing Instructions for {}\n\
         1. Package Name: {}\n\
         2. Key Alias: {}\n\
         3. Keystore Password: {}\n\
         4. Key Password: {}\n\
         \n\
         ## How to generate a real .jks file:\n\
         Run this command in your terminal:\n\
         keytool -genkey -v -keystore {}.jks -keyalg RSA -keysize 2048 -validity 10000 -alias {}",
        draft.app_name, draft.package_name, alias, keystore_pass, key_pass, alias, alias
    ));
    doc
}

fn or_redacted(value: &str) -> &str {
    if value.is_empty() { REDACTED } else { value }
}

/// Write the guide into `dir` and return the file path
pub fn write_guide(
    dir: &Path,
    kind: GuideKind,
    draft: &AppDraft,
    policy: SecretPolicy,
) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| AppForgeError::io(dir, e))?;
    let path = dir.join(kind.file_name());
    fs::write(&path, kind.render(draft, policy)).map_err(|e| AppForgeError::io(&path, e))?;
    tracing::info!("Wrote {:?} guide to {:?}", kind, path);
    Ok(path)
}

/// Rows of the pre-export build summary
pub fn export_summary(draft: &AppDraft) -> Vec<(&'static str, String)> {
    let signing = if draft.use_custom_signing {
        "Custom Key"
    } else {
        "Managed v2"
    };
    vec![
        (
            "Target Engine",
            format!(
                "Android {} API {}",
                draft.target_sdk.android_version(),
                draft.target_sdk.api_level()
            ),
        ),
        ("Architecture", "v8a, v7a, x86_64".to_string()),
        ("Size Opt", "LZMA Compressed".to_string()),
        ("Signing", signing.to_string()),
    ]
}
