//! Confirmation and notice dialogs.
//!
//! # Design
//! - Prefer SweetAlert2 (`window.Swal`) when the page loads it; the check runs
//!   on every call so late-loaded scripts are honoured.
//! - Fall back to the blocking native `confirm`/`alert` boxes, which only
//!   offer OK/Cancel.

use crate::confirm::{ConfirmGate, ConfirmOutcome, ConfirmPrompt};
use crate::dispatch::Notifier;
use anyhow::anyhow;
use async_trait::async_trait;
use gloo::console;
use gloo::dialogs;
use gloo::utils::window;
use js_sys::{Function, Promise, Reflect};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

const FALLBACK_ERROR_PREFIX: &str = "Action failed: ";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NoticeOptions<'a> {
    title: &'a str,
    text: &'a str,
    icon: &'static str,
    confirm_button_text: &'static str,
}

/// Browser-backed confirmation gate and notifier.
pub(crate) struct BrowserDialogs;

#[async_trait(?Send)]
impl ConfirmGate for BrowserDialogs {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> ConfirmOutcome {
        if !sweet_alert_available() {
            return if dialogs::confirm(&prompt.fallback_text) {
                ConfirmOutcome::Confirm
            } else {
                ConfirmOutcome::Cancel
            };
        }
        match fire(prompt).await {
            Ok(result) if flag(&result, "isConfirmed") => ConfirmOutcome::Confirm,
            Ok(result) if flag(&result, "isDenied") => ConfirmOutcome::Deny,
            Ok(_) => ConfirmOutcome::Cancel,
            Err(err) => {
                console::error!("confirmation dialog failed", err.to_string());
                ConfirmOutcome::Cancel
            }
        }
    }
}

#[async_trait(?Send)]
impl Notifier for BrowserDialogs {
    async fn success(&self, title: &str, message: &str) {
        if !sweet_alert_available() {
            dialogs::alert(message);
            return;
        }
        let options = NoticeOptions {
            title,
            text: message,
            icon: "success",
            confirm_button_text: "OK",
        };
        if let Err(err) = fire(&options).await {
            console::error!("success notice failed", err.to_string());
        }
    }

    async fn error(&self, title: &str, message: &str) {
        if !sweet_alert_available() {
            dialogs::alert(&format!("{FALLBACK_ERROR_PREFIX}{message}"));
            return;
        }
        let options = NoticeOptions {
            title,
            text: message,
            icon: "error",
            confirm_button_text: "OK",
        };
        if let Err(err) = fire(&options).await {
            console::error!("error notice failed", err.to_string());
        }
    }
}

fn sweet_alert() -> Option<(JsValue, Function)> {
    let swal = Reflect::get(&window(), &JsValue::from_str("Swal")).ok()?;
    if swal.is_undefined() || swal.is_null() {
        return None;
    }
    let fire = Reflect::get(&swal, &JsValue::from_str("fire"))
        .ok()?
        .dyn_into::<Function>()
        .ok()?;
    Some((swal, fire))
}

fn sweet_alert_available() -> bool {
    sweet_alert().is_some()
}

async fn fire<T: Serialize>(options: &T) -> anyhow::Result<JsValue> {
    let (swal, fire) = sweet_alert().ok_or_else(|| anyhow!("Swal.fire is not available"))?;
    let encoded = serde_json::to_string(options)?;
    let options =
        js_sys::JSON::parse(&encoded).map_err(|err| anyhow!("dialog options: {err:?}"))?;
    let promise = fire
        .call1(&swal, &options)
        .map_err(|err| anyhow!("Swal.fire threw: {err:?}"))?
        .dyn_into::<Promise>()
        .map_err(|_| anyhow!("Swal.fire did not return a promise"))?;
    JsFuture::from(promise)
        .await
        .map_err(|err| anyhow!("dialog rejected: {err:?}"))
}

fn flag(result: &JsValue, name: &str) -> bool {
    Reflect::get(result, &JsValue::from_str(name))
        .ok()
        .as_ref()
        .and_then(JsValue::as_bool)
        .unwrap_or(false)
}
