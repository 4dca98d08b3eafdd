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
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]
//! Bulk selection controls for server-rendered admin tables.
//!
//! Each table scope gets one [`controller::BulkSelectionController`]: a
//! mark-all checkbox drives the row checkboxes, action buttons appear while
//! any row is checked, and activating a button confirms with the user before
//! posting the selected ids to the endpoint configured on the button.
//!
//! The DOM-free modules below compile on every target so the behaviour can be
//! tested natively; the browser bindings only exist on `wasm32`.

pub mod config;
pub mod confirm;
pub mod controller;
pub mod csrf;
pub mod dispatch;
pub mod error;
pub mod registry;
pub mod selection;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod dialog;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod http;

#[cfg(target_arch = "wasm32")]
pub use app::{init_table_actions, start};
