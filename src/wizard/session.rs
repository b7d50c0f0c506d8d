//! Wizard session
//!
//! One `WizardSession` per wizard instance. It owns the current step, the
//! configuration draft and the export sub-machine; the UI holds it and calls
//! into it, nothing is global.

use super::draft::{AppDraft, FieldUpdate};
use super::export::{ExportFinished, ExportPhase, ExportTicket};
use super::step::WizardStep;
use super::validate::{self, FieldIssue, ValidationPolicy, MISSING_URL_MESSAGE};
use crate::error::AppForgeError;
use url::Url;
use uuid::Uuid;

/// Behavior switches taken from the `[wizard]` config section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionOptions {
    pub policy: ValidationPolicy,
    pub clear_draft_on_reset: bool,
}

/// Result of a navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepChange {
    /// Moved one step
    Moved { from: WizardStep, to: WizardStep },
    /// Navigation refused, with the reason shown to the user
    Blocked(String),
    /// Nothing to do (sequence boundary, or export running/finished)
    Unchanged,
}

/// The wizard controller
pub struct WizardSession {
    id: Uuid,
    step: WizardStep,
    draft: AppDraft,
    url_error: Option<String>,
    export: ExportPhase,
    ticket: Option<ExportTicket>,
    next_job_id: u64,
    options: SessionOptions,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl WizardSession {
    /// Start a session on step 1 with a default draft
    pub fn new(options: SessionOptions) -> Self {
        Self::with_draft(AppDraft::default(), options)
    }

    /// Start a session on step 1 with a prepared draft (e.g. from a preset)
    pub fn with_draft(draft: AppDraft, options: SessionOptions) -> Self {
        let id = Uuid::new_v4();
        tracing::debug!("Wizard session {} created", id);
        Self {
            id,
            step: WizardStep::first(),
            draft,
            url_error: None,
            export: ExportPhase::Idle,
            ticket: None,
            next_job_id: 0,
            options,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &AppDraft {
        &self.draft
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    /// Inline message under the URL field, if any
    pub fn url_error(&self) -> Option<&str> {
        self.url_error.as_deref()
    }

    pub fn export_phase(&self) -> ExportPhase {
        self.export
    }

    pub fn is_generating(&self) -> bool {
        self.export.is_in_progress()
    }

    pub fn is_export_complete(&self) -> bool {
        self.export.is_completed()
    }

    /// Back/next are hidden once an export has started
    pub fn navigation_locked(&self) -> bool {
        self.export != ExportPhase::Idle
    }

    /// Whether `advance()` would currently be refused
    pub fn can_advance(&self) -> bool {
        !self.navigation_locked()
            && self.step.next().is_some()
            && self.blocking_reason().is_none()
    }

    pub fn can_retreat(&self) -> bool {
        !self.navigation_locked() && self.step.prev().is_some()
    }

    /// Field issues on the current step
    pub fn current_issues(&self) -> Vec<FieldIssue> {
        validate::step_issues(self.step, &self.draft)
    }

    fn blocking_reason(&self) -> Option<String> {
        if self.step == WizardStep::Url && self.draft.website_url.is_empty() {
            return Some(MISSING_URL_MESSAGE.to_string());
        }
        if self.options.policy == ValidationPolicy::Strict {
            return self.current_issues().into_iter().next().map(|i| i.message);
        }
        None
    }

    /// Move to the next step.
    ///
    /// Leaving step 1 requires a non-empty URL. A malformed URL is not
    /// rejected here under the lenient policy; only `check_url` reports it.
    pub fn advance(&mut self) -> StepChange {
        if self.navigation_locked() {
            return StepChange::Unchanged;
        }
        let Some(next) = self.step.next() else {
            return StepChange::Unchanged;
        };

        if let Some(reason) = self.blocking_reason() {
            if self.step == WizardStep::Url {
                self.url_error = Some(reason.clone());
            }
            tracing::debug!("Advance from {} blocked: {}", self.step, reason);
            return StepChange::Blocked(reason);
        }

        let from = self.step;
        self.step = next;
        tracing::debug!("Wizard step {} -> {}", from, next);
        StepChange::Moved { from, to: next }
    }

    /// Move to the previous step
    pub fn retreat(&mut self) -> StepChange {
        if self.navigation_locked() {
            return StepChange::Unchanged;
        }
        let Some(prev) = self.step.prev() else {
            return StepChange::Unchanged;
        };

        let from = self.step;
        self.step = prev;
        tracing::debug!("Wizard step {} -> {}", from, prev);
        StepChange::Moved { from, to: prev }
    }

    /// Merge one field into the draft.
    ///
    /// While a URL message is showing, editing the URL re-checks it so the
    /// message clears as soon as the input becomes valid.
    pub fn update_field(&mut self, update: FieldUpdate) {
        tracing::trace!("Draft field updated: {}", update.name());
        let is_url = matches!(update, FieldUpdate::WebsiteUrl(_));
        self.draft.apply(update);

        if is_url && self.url_error.is_some() {
            self.check_url();
        }
    }

    /// Parse `candidate` as an absolute URL. Touches neither the draft nor the
    /// inline message.
    pub fn validate_url(&self, candidate: &str) -> Result<Url, AppForgeError> {
        validate::validate_url(candidate)
    }

    /// Validate the draft URL and update the inline message. Returns whether it
    /// is valid.
    pub fn check_url(&mut self) -> bool {
        match validate::validate_url(&self.draft.website_url) {
            Ok(_) => {
                self.url_error = None;
                true
            }
            Err(e) => {
                self.url_error = Some(e.to_string());
                false
            }
        }
    }

    /// Begin the simulated export.
    ///
    /// Only valid on the export step while idle. A second call while the
    /// export is running (or after it finished) returns `None` and does not
    /// restart anything.
    pub fn start_export(&mut self) -> Option<ExportTicket> {
        if self.step != WizardStep::Export || self.export != ExportPhase::Idle {
            tracing::debug!(
                "Ignoring export request on {} while {:?}",
                self.step,
                self.export
            );
            return None;
        }

        self.next_job_id += 1;
        let ticket = ExportTicket::new(self.id, self.next_job_id);
        self.ticket = Some(ticket.clone());
        self.export = ExportPhase::InProgress;
        tracing::info!("Export job {} started for session {}", ticket.job_id, self.id);
        Some(ticket)
    }

    /// Apply a timer completion. Stale notices (other session, superseded or
    /// cancelled job) are ignored and return `false`.
    pub fn complete_export(&mut self, finished: &ExportFinished) -> bool {
        let live = self.ticket.as_ref().is_some_and(|t| {
            t.session_id == finished.session_id
                && t.job_id == finished.job_id
                && !t.is_cancelled()
        });

        if !live || self.export != ExportPhase::InProgress {
            tracing::debug!("Ignoring stale export completion {:?}", finished);
            return false;
        }

        self.ticket = None;
        self.export = ExportPhase::Completed;
        tracing::info!("Export job {} completed", finished.job_id);
        true
    }

    /// Back to step 1 with the export cleared.
    ///
    /// The draft is kept for edit-and-re-export unless the session was
    /// configured with `clear_draft_on_reset`.
    pub fn reset(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            ticket.cancel();
        }
        self.export = ExportPhase::Idle;
        self.step = WizardStep::first();
        self.url_error = None;
        if self.options.clear_draft_on_reset {
            self.draft = AppDraft::default();
        }
        tracing::info!("Wizard session {} reset", self.id);
    }
}

impl Drop for WizardSession {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            ticket.cancel();
        }
    }
}
