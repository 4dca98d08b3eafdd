//! Scope options and action button configuration.
//!
//! # Design
//! - Defaults match the markup the server renders (`markAll*` ids, `.row-checkbox`).
//! - Page scripts may override selectors through `initTableActions(options)`.
//! - Buttons carry their endpoint in data attributes; a button without one is unusable.

use bulkdesk_api_models::DeleteMode;
use serde::Deserialize;

use crate::csrf::{DEFAULT_COOKIE_NAME, DEFAULT_HEADER_NAME};
use crate::error::OptionsError;

/// Selector for master checkboxes picked up during auto-initialisation.
pub const AUTO_MARK_ALL_SELECTOR: &str = "[id^='markAll']";
/// Default selector for the master checkbox inside a table.
pub const DEFAULT_MARK_ALL_SELECTOR: &str = "input.mark-all";
/// Default selector for row checkboxes.
pub const DEFAULT_ROW_SELECTOR: &str = "input.row-checkbox";

/// Kind of bulk action a button triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Bring trashed records back.
    Restore,
    /// Move records to the trash, with the option to delete permanently.
    SoftDelete,
    /// Remove records permanently.
    HardDelete,
}

impl ActionKind {
    /// Every action kind in toolbar order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Restore, Self::SoftDelete, Self::HardDelete]
    }

    /// Short label used in logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Restore => "restore",
            Self::SoftDelete => "delete",
            Self::HardDelete => "delete permanently",
        }
    }

    /// Element id the server renders for this button on list pages.
    #[must_use]
    pub const fn default_selector(self) -> &'static str {
        match self {
            Self::Restore => "#restoreSelectedBtn",
            Self::SoftDelete => "#deleteSelectedBtn",
            Self::HardDelete => "#deletePermanentlyBtn",
        }
    }

    /// Data attribute holding the endpoint URL.
    #[must_use]
    pub const fn url_attribute(self) -> &'static str {
        match self {
            Self::Restore => "data-restore-url",
            Self::SoftDelete | Self::HardDelete => "data-delete-url",
        }
    }

    /// Mode used when the button has no `data-type` attribute.
    #[must_use]
    pub const fn default_mode(self) -> Option<DeleteMode> {
        match self {
            Self::Restore => None,
            Self::SoftDelete => Some(DeleteMode::Soft),
            Self::HardDelete => Some(DeleteMode::Hard),
        }
    }

    /// Notice title shown after the server accepts the action.
    #[must_use]
    pub const fn success_title(self) -> &'static str {
        match self {
            Self::Restore => "Restored!",
            Self::SoftDelete | Self::HardDelete => "Deleted!",
        }
    }
}

/// Resolved configuration for one action button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionConfig {
    /// Which action the button performs.
    pub kind: ActionKind,
    /// Endpoint receiving the POST.
    pub endpoint: String,
    /// Mode sent when the user confirms; `None` for restore.
    pub mode: Option<DeleteMode>,
}

impl ActionConfig {
    /// Build a configuration from the button's data attributes.
    ///
    /// Returns `None` when the endpoint attribute is missing or blank.
    #[must_use]
    pub fn from_attributes(
        kind: ActionKind,
        endpoint: Option<String>,
        data_type: Option<&str>,
    ) -> Option<Self> {
        let endpoint = endpoint?.trim().to_string();
        if endpoint.is_empty() {
            return None;
        }
        let mode = match kind {
            ActionKind::Restore => None,
            ActionKind::SoftDelete | ActionKind::HardDelete => data_type
                .and_then(DeleteMode::parse)
                .or_else(|| kind.default_mode()),
        };
        Some(Self {
            kind,
            endpoint,
            mode,
        })
    }
}

/// Selectors and token settings for one table scope.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScopeOptions {
    /// Selector of the table that bounds the scope.
    pub table_selector: Option<String>,
    /// Master checkbox selector, looked up inside the table.
    pub mark_all_selector: String,
    /// Row checkbox selector, looked up inside the table.
    pub row_checkbox_selector: String,
    /// Restore button selector.
    pub restore_btn_selector: Option<String>,
    /// Delete button selector; permanent unless the button's `data-type`
    /// says `soft`.
    pub delete_btn_selector: Option<String>,
    /// Move-to-trash button selector, offering permanent delete as the
    /// alternate choice.
    pub soft_delete_btn_selector: Option<String>,
    /// Cookie carrying the anti-forgery token.
    pub csrf_cookie_name: String,
    /// Request header receiving the anti-forgery token.
    pub csrf_header_name: String,
}

impl Default for ScopeOptions {
    fn default() -> Self {
        Self {
            table_selector: None,
            mark_all_selector: DEFAULT_MARK_ALL_SELECTOR.to_string(),
            row_checkbox_selector: DEFAULT_ROW_SELECTOR.to_string(),
            restore_btn_selector: None,
            delete_btn_selector: None,
            soft_delete_btn_selector: None,
            csrf_cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            csrf_header_name: DEFAULT_HEADER_NAME.to_string(),
        }
    }
}

impl ScopeOptions {
    /// Options used for scopes discovered automatically on page load.
    ///
    /// Every well-known button id is wired; absent buttons are skipped.
    #[must_use]
    pub fn page_defaults() -> Self {
        Self {
            restore_btn_selector: Some(ActionKind::Restore.default_selector().to_string()),
            delete_btn_selector: Some(ActionKind::HardDelete.default_selector().to_string()),
            soft_delete_btn_selector: Some(ActionKind::SoftDelete.default_selector().to_string()),
            ..Self::default()
        }
    }

    /// Parse the JSON form of an `initTableActions` options object.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::Decode`] for malformed input and
    /// [`OptionsError::MissingTableSelector`] when no table is named.
    pub fn from_json(raw: &str) -> Result<Self, OptionsError> {
        let options: Self = serde_json::from_str(raw).map_err(|err| OptionsError::Decode {
            reason: err.to_string(),
        })?;
        match options.table_selector.as_deref().map(str::trim) {
            Some(selector) if !selector.is_empty() => Ok(options),
            _ => Err(OptionsError::MissingTableSelector),
        }
    }

    /// Selector configured for the given action, if any.
    #[must_use]
    pub fn button_selector(&self, kind: ActionKind) -> Option<&str> {
        let selector = match kind {
            ActionKind::Restore => self.restore_btn_selector.as_deref(),
            ActionKind::SoftDelete => self.soft_delete_btn_selector.as_deref(),
            ActionKind::HardDelete => self.delete_btn_selector.as_deref(),
        }?;
        let selector = selector.trim();
        (!selector.is_empty()).then_some(selector)
    }
}
