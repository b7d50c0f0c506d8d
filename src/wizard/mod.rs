//! Wizard domain
//!
//! The six-step configuration flow, independent of any terminal code.

pub mod draft;
pub mod export;
pub mod guides;
pub mod preview;
pub mod session;
pub mod step;
pub mod validate;

pub use draft::{AppDraft, DisplayMode, FieldUpdate, NavigationStyle, Secret, TargetSdk};
pub use export::{spawn_export_timer, ExportFinished, ExportPhase, ExportTicket, DEFAULT_EXPORT_DELAY};
pub use guides::{GuideKind, SecretPolicy};
pub use preview::PreviewModel;
pub use session::{SessionOptions, StepChange, WizardSession};
pub use step::WizardStep;
pub use validate::{FieldIssue, ValidationPolicy};
