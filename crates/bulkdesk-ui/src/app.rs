//! Browser entry points: auto-initialisation and `initTableActions`.
//!
//! # Design
//! - Scopes live in a page-level registry keyed by an allocated scope id;
//!   listeners are owned by the registry entry so they stay attached until
//!   navigation.
//! - Auto-initialisation and `initTableActions` both claim the master checkbox,
//!   so a table is wired once whichever runs first.
//! - Clicks spawn the async confirm/dispatch flow; checkbox changes update
//!   visibility synchronously inside the event handler.

use crate::config::{ActionKind, ScopeOptions};
use crate::controller::{ActivationOutcome, BulkSelectionController, ControllerCtx};
use crate::dialog::BrowserDialogs;
use crate::dispatch::DispatchOutcome;
use crate::dom::{
    BrowserPage, DocumentCookies, DomButton, DomCheckbox, ResolvedScope, discover_scopes,
    resolve_configured,
};
use crate::http::GlooTransport;
use crate::registry::{ScopeRegistry, claim, claim_buttons};
use anyhow::anyhow;
use gloo::console;
use gloo::events::EventListener;
use gloo::utils::document;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

type DomController = BulkSelectionController<DomCheckbox, DomButton>;

struct ScopeHandle {
    _controller: Rc<DomController>,
    _listeners: Vec<EventListener>,
}

thread_local! {
    static SCOPES: RefCell<ScopeRegistry<ScopeHandle>> = RefCell::new(ScopeRegistry::default());
}

/// Module start hook: wire every conventional scope once the DOM is parsed.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let doc = document();
    if doc.ready_state() == "loading" {
        EventListener::once(&doc, "DOMContentLoaded", |_| init_discovered_scopes()).forget();
    } else {
        init_discovered_scopes();
    }
}

/// Initialise one table from a page script.
///
/// Returns `true` when a new scope was wired.
#[wasm_bindgen(js_name = initTableActions)]
pub fn init_table_actions(options: JsValue) -> bool {
    let options = match parse_options(&options) {
        Ok(options) => options,
        Err(err) => {
            console::error!("initTableActions rejected options", err.to_string());
            return false;
        }
    };
    resolve_configured(&options).is_some_and(|scope| register(scope, &options))
}

fn parse_options(options: &JsValue) -> anyhow::Result<ScopeOptions> {
    let raw = js_sys::JSON::stringify(options)
        .map_err(|err| anyhow!("options are not serialisable: {err:?}"))?;
    Ok(ScopeOptions::from_json(&String::from(raw))?)
}

fn init_discovered_scopes() {
    let options = ScopeOptions::page_defaults();
    let wired = discover_scopes(&options)
        .into_iter()
        .map(|scope| register(scope, &options))
        .filter(|wired| *wired)
        .count();
    console::debug!("bulk scopes initialised", wired);
}

fn register(scope: ResolvedScope, options: &ScopeOptions) -> bool {
    let scope_id = SCOPES.with(|scopes| scopes.borrow_mut().allocate());
    if !claim(&DomCheckbox(scope.master.clone()), &scope_id) {
        console::debug!("bulk scope already wired", scope.master.id());
        return false;
    }
    let scope = ResolvedScope {
        buttons: claim_buttons(scope.buttons, &scope_id),
        ..scope
    };
    let Some(handle) = bind(scope, &context(options)) else {
        return false;
    };
    SCOPES.with(|scopes| scopes.borrow_mut().register(scope_id, handle))
}

fn context(options: &ScopeOptions) -> ControllerCtx {
    let dialogs = Rc::new(BrowserDialogs);
    ControllerCtx {
        gate: dialogs.clone(),
        transport: Rc::new(GlooTransport),
        notifier: dialogs,
        page: Rc::new(BrowserPage),
        tokens: Rc::new(DocumentCookies {
            name: options.csrf_cookie_name.clone(),
        }),
        csrf_header_name: options.csrf_header_name.clone(),
    }
}

fn bind(scope: ResolvedScope, ctx: &ControllerCtx) -> Option<ScopeHandle> {
    let controller = Rc::new(DomController::new(
        scope.rows.iter().cloned().map(DomCheckbox).collect(),
        scope.buttons.clone(),
    )?);
    controller.update_visibility();

    let mut listeners = Vec::with_capacity(scope.rows.len() + scope.buttons.len() + 1);
    {
        let controller = controller.clone();
        let master = scope.master.clone();
        listeners.push(EventListener::new(&scope.master, "change", move |_| {
            controller.set_all(master.checked());
        }));
    }
    for row in &scope.rows {
        let controller = controller.clone();
        listeners.push(EventListener::new(row, "change", move |_| {
            controller.on_row_changed();
        }));
    }
    for (config, DomButton(element)) in &scope.buttons {
        let kind = config.kind;
        let controller = controller.clone();
        let ctx = ctx.clone();
        listeners.push(EventListener::new(element, "click", move |_| {
            let controller = controller.clone();
            let ctx = ctx.clone();
            spawn_local(async move {
                let outcome = controller.activate(kind, &ctx).await;
                log_outcome(kind, &outcome);
            });
        }));
    }

    Some(ScopeHandle {
        _controller: controller,
        _listeners: listeners,
    })
}

fn log_outcome(kind: ActionKind, outcome: &ActivationOutcome) {
    match outcome {
        ActivationOutcome::Dispatched(DispatchOutcome::Failed(err)) => {
            console::error!("bulk action failed", kind.label(), err.to_string());
        }
        ActivationOutcome::Dispatched(DispatchOutcome::Rejected { message }) => {
            console::warn!("bulk action rejected", kind.label(), message.clone());
        }
        ActivationOutcome::Busy => {
            console::debug!("bulk action already in flight", kind.label());
        }
        ActivationOutcome::Unbound
        | ActivationOutcome::NoSelection
        | ActivationOutcome::Cancelled
        | ActivationOutcome::Dispatched(DispatchOutcome::Reloaded { .. }) => {}
    }
}
