#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::multiple_crate_versions)]
//! Shared HTTP DTOs for the bulk-action endpoints.
//!
//! The admin list views post the selected record identifiers to a
//! server-configured endpoint and read back a `{success, message}` document.
//! Keeping the encoding here gives the browser controller and any server-side
//! handler one definition of the contract.

use serde::{Deserialize, Serialize};

/// Identifier of a single record as rendered into a row checkbox.
///
/// Canonical integers travel as JSON numbers; anything else (including
/// zero-padded or signed-plus values) is sent verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    /// Integer primary key.
    Int(i64),
    /// Non-numeric key (slug, UUID, ...).
    Text(String),
}

impl RowId {
    /// Interpret a checkbox `value` attribute.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(value) if value.to_string() == trimmed => Self::Int(value),
            _ => Self::Text(trimmed.to_string()),
        }
    }
}

/// Deletion flavour requested from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Move records to the trash; reversible via restore.
    Soft,
    /// Remove records permanently.
    Hard,
}

impl DeleteMode {
    /// Parse a `data-type` attribute value, ignoring case and whitespace.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "soft" => Some(Self::Soft),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

/// Body posted to a bulk-action endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkActionRequest {
    /// Identifiers of the selected records, in row order.
    pub ids: Vec<RowId>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    /// Deletion flavour; omitted for restore requests.
    pub mode: Option<DeleteMode>,
}

impl BulkActionRequest {
    /// Build a delete request for the given mode.
    #[must_use]
    pub const fn delete(ids: Vec<RowId>, mode: DeleteMode) -> Self {
        Self {
            ids,
            mode: Some(mode),
        }
    }

    /// Build a restore request (no `type` field on the wire).
    #[must_use]
    pub const fn restore(ids: Vec<RowId>) -> Self {
        Self { ids, mode: None }
    }
}

/// Response document returned by a bulk-action endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkActionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Outcome flag; older endpoints omit it and only send a message.
    pub success: Option<bool>,
    #[serde(default)]
    /// Human-readable message supplied by the server.
    pub message: String,
}

impl BulkActionResponse {
    /// Whether the server accepted the action.
    ///
    /// Responses without a `success` flag count as accepted.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success.unwrap_or(true)
    }
}
