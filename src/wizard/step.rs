//! Wizard step sequence

use serde::{Deserialize, Serialize};

/// One of the six wizard steps, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WizardStep {
    Url,
    Identity,
    Design,
    Advanced,
    Signing,
    Export,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        Self::Url,
        Self::Identity,
        Self::Design,
        Self::Advanced,
        Self::Signing,
        Self::Export,
    ];

    /// Position in the sequence (0-based)
    pub fn index(&self) -> usize {
        match self {
            Self::Url => 0,
            Self::Identity => 1,
            Self::Design => 2,
            Self::Advanced => 3,
            Self::Signing => 4,
            Self::Export => 5,
        }
    }

    /// Step number (1-based)
    pub fn number(&self) -> usize {
        self.index() + 1
    }

    /// Total number of steps
    pub fn total() -> usize {
        Self::ALL.len()
    }

    pub fn first() -> Self {
        Self::Url
    }

    /// The following step, or `None` at the end of the sequence
    pub fn next(&self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// The preceding step, or `None` at the start of the sequence
    pub fn prev(&self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// Short label used in the progress header
    pub fn label(&self) -> &'static str {
        match self {
            Self::Url => "URL",
            Self::Identity => "IDENTITY",
            Self::Design => "DESIGN",
            Self::Advanced => "ADVANCED",
            Self::Signing => "SIGNING",
            Self::Export => "EXPORT",
        }
    }

    /// Step title
    pub fn title(&self) -> &'static str {
        match self {
            Self::Url => "Let's build your app.",
            Self::Identity => "App Identity",
            Self::Design => "Visual Language",
            Self::Advanced => "Advanced Options",
            Self::Signing => "App Signing",
            Self::Export => "Ready for Deployment",
        }
    }

    /// Step subtitle
    pub fn subtitle(&self) -> &'static str {
        match self {
            Self::Url => "Enter your web URL to begin the transformation.",
            Self::Identity => "Define how your app appears on device and store.",
            Self::Design => "Style your app to match your brand identity perfectly.",
            Self::Advanced => "Power your app with native capabilities and monetization.",
            Self::Signing => "Secure your APK for Play Store publication.",
            Self::Export => "Review your configuration, then start the build.",
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
