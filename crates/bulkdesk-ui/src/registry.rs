//! Scope registry and element ownership.
//!
//! # Design
//! - Scopes are identified by the elements they own, not by selectors: the
//!   master checkbox and every bound button carry a `data-bulk-scope` marker.
//! - A master checkbox already carrying a marker is never wired again, whichever
//!   entry point finds it.
//! - A page-level button found by several scopes belongs to the first one that
//!   claims it.

use std::collections::HashMap;

use crate::config::ActionConfig;

/// Attribute recording which scope owns an element.
pub const SCOPE_MARKER_ATTRIBUTE: &str = "data-bulk-scope";

const SCOPE_ID_PREFIX: &str = "bulk-scope-";

/// An element that can record the scope owning it.
pub trait ScopeMarked {
    /// Identifier of the owning scope, if any.
    fn scope_marker(&self) -> Option<String>;
    /// Record `scope_id` as the owner.
    fn mark_scope(&self, scope_id: &str);
}

/// Claim `target` for `scope_id`.
///
/// Returns `false` when another scope already owns it.
pub fn claim<T: ScopeMarked + ?Sized>(target: &T, scope_id: &str) -> bool {
    match target.scope_marker() {
        Some(owner) => owner == scope_id,
        None => {
            target.mark_scope(scope_id);
            true
        }
    }
}

/// Keep only the buttons `scope_id` could claim.
#[must_use]
pub fn claim_buttons<B: ScopeMarked>(
    buttons: Vec<(ActionConfig, B)>,
    scope_id: &str,
) -> Vec<(ActionConfig, B)> {
    buttons
        .into_iter()
        .filter(|(_, button)| claim(button, scope_id))
        .collect()
}

/// Controller handles keyed by scope identifier.
#[derive(Debug)]
pub struct ScopeRegistry<T> {
    scopes: HashMap<String, T>,
    next_id: u64,
}

impl<T> Default for ScopeRegistry<T> {
    fn default() -> Self {
        Self {
            scopes: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<T> ScopeRegistry<T> {
    /// Reserve a fresh scope identifier.
    pub fn allocate(&mut self) -> String {
        self.next_id += 1;
        format!("{SCOPE_ID_PREFIX}{}", self.next_id)
    }

    /// Register `value` under `scope_id`; returns `false` if the id is taken.
    pub fn register(&mut self, scope_id: impl Into<String>, value: T) -> bool {
        let scope_id = scope_id.into();
        if self.scopes.contains_key(&scope_id) {
            return false;
        }
        self.scopes.insert(scope_id, value);
        true
    }
}
