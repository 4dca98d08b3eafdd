//! Confirmation prompts shown before destructive bulk actions.
//!
//! # Design
//! - Prompts are plain data so the browser layer can render them with a rich
//!   dialog library or fall back to the native `confirm` box.
//! - Only the three-way soft-delete prompt offers a "deny" outcome, which
//!   escalates to a permanent delete.

use async_trait::async_trait;
use bulkdesk_api_models::DeleteMode;
use serde::Serialize;

use crate::config::ActionKind;

/// Decision returned by a confirmation dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Proceed with the prompt's primary mode.
    Confirm,
    /// Proceed with the alternate (permanent) mode.
    Deny,
    /// Abort; nothing is sent.
    Cancel,
}

/// Content of a confirmation dialog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPrompt {
    /// Dialog title.
    pub title: String,
    /// Dialog body; may contain inline markup.
    pub html: String,
    /// Icon name understood by the dialog library.
    pub icon: &'static str,
    /// Label of the confirm button.
    pub confirm_button_text: String,
    /// Colour of the confirm button, when it should stand out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_button_color: Option<&'static str>,
    /// Label of the cancel button.
    pub cancel_button_text: String,
    /// Always offer a cancel button.
    pub show_cancel_button: bool,
    /// Whether the deny button is offered.
    pub show_deny_button: bool,
    /// Label of the deny button, when offered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deny_button_text: Option<String>,
    /// Question asked by the native fallback dialog.
    #[serde(skip)]
    pub fallback_text: String,
    /// Mode dispatched on [`ConfirmOutcome::Confirm`].
    #[serde(skip)]
    pub primary: DeleteMode,
}

impl ConfirmPrompt {
    /// Build the prompt for a delete button with `count` selected records.
    ///
    /// Restore actions are not confirmed and yield `None`.
    #[must_use]
    pub fn for_action(kind: ActionKind, mode: Option<DeleteMode>, count: usize) -> Option<Self> {
        let mode = mode.or_else(|| kind.default_mode())?;
        match (kind, mode) {
            (ActionKind::Restore, _) => None,
            (_, DeleteMode::Soft) => Some(Self {
                title: "Delete Records".to_string(),
                html: format!("You are about to delete <b>{count}</b> record(s)."),
                icon: "warning",
                confirm_button_text: "Move to Trash".to_string(),
                confirm_button_color: None,
                cancel_button_text: "Cancel".to_string(),
                show_cancel_button: true,
                show_deny_button: true,
                deny_button_text: Some("Delete Permanently".to_string()),
                fallback_text: format!(
                    "Are you sure you want to move {count} selected item(s) to trash?"
                ),
                primary: DeleteMode::Soft,
            }),
            (_, DeleteMode::Hard) => Some(Self {
                title: "Delete Permanently?".to_string(),
                html: format!("You are about to permanently delete <b>{count}</b> record(s)."),
                icon: "warning",
                confirm_button_text: "Yes, Delete Permanently".to_string(),
                confirm_button_color: Some("#d33"),
                cancel_button_text: "Cancel".to_string(),
                show_cancel_button: true,
                show_deny_button: false,
                deny_button_text: None,
                fallback_text: format!(
                    "Are you sure you want to permanently delete {count} selected item(s)?"
                ),
                primary: DeleteMode::Hard,
            }),
        }
    }

    /// Map a dialog outcome to the mode to dispatch, or `None` to abort.
    #[must_use]
    pub const fn resolve(&self, outcome: ConfirmOutcome) -> Option<DeleteMode> {
        match outcome {
            ConfirmOutcome::Confirm => Some(self.primary),
            ConfirmOutcome::Deny if self.show_deny_button => Some(DeleteMode::Hard),
            ConfirmOutcome::Deny | ConfirmOutcome::Cancel => None,
        }
    }
}

/// Asks the user to confirm a prompt.
#[async_trait(?Send)]
pub trait ConfirmGate {
    /// Present `prompt` and wait for the user's decision.
    async fn confirm(&self, prompt: &ConfirmPrompt) -> ConfirmOutcome;
}
