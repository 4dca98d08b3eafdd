//! DOM adapters and scope resolution.
//!
//! # Design
//! - Wrap `web_sys` elements in the controller's checkbox/button seams.
//! - Resolve scopes from selectors; a scope without a master checkbox or rows
//!   is skipped quietly.
//! - Action buttons are looked up inside the scope first, then page-wide for
//!   toolbars rendered outside the table element.
//! - Ownership markers live in the `data-bulk-scope` attribute.

use crate::config::{AUTO_MARK_ALL_SELECTOR, ActionConfig, ActionKind, ScopeOptions};
use crate::csrf::{TokenSource, token_from_cookies};
use crate::dispatch::PageControl;
use crate::registry::{SCOPE_MARKER_ATTRIBUTE, ScopeMarked};
use crate::selection::{ActionTarget, RowCheckbox};
use gloo::console;
use gloo::utils::{document, window};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlDocument, HtmlElement, HtmlInputElement};

const VISIBLE_DISPLAY: &str = "inline-block";
const HIDDEN_DISPLAY: &str = "none";

fn element_marker(element: &Element) -> Option<String> {
    element
        .get_attribute(SCOPE_MARKER_ATTRIBUTE)
        .filter(|owner| !owner.is_empty())
}

fn mark_element(element: &Element, scope_id: &str) {
    if let Err(err) = element.set_attribute(SCOPE_MARKER_ATTRIBUTE, scope_id) {
        console::error!("scope marker update failed", format!("{err:?}"));
    }
}

/// Row checkbox backed by an `<input type="checkbox">`.
pub(crate) struct DomCheckbox(pub(crate) HtmlInputElement);

impl ScopeMarked for DomCheckbox {
    fn scope_marker(&self) -> Option<String> {
        element_marker(&self.0)
    }

    fn mark_scope(&self, scope_id: &str) {
        mark_element(&self.0, scope_id);
    }
}

impl RowCheckbox for DomCheckbox {
    fn is_checked(&self) -> bool {
        self.0.checked()
    }

    fn set_checked(&self, checked: bool) {
        self.0.set_checked(checked);
    }

    fn value(&self) -> String {
        self.0.value()
    }
}

/// Action button whose display and disabled state follow the controller.
#[derive(Clone)]
pub(crate) struct DomButton(pub(crate) HtmlElement);

impl ScopeMarked for DomButton {
    fn scope_marker(&self) -> Option<String> {
        element_marker(&self.0)
    }

    fn mark_scope(&self, scope_id: &str) {
        mark_element(&self.0, scope_id);
    }
}

impl ActionTarget for DomButton {
    fn set_visible(&self, visible: bool) {
        let display = if visible {
            VISIBLE_DISPLAY
        } else {
            HIDDEN_DISPLAY
        };
        if let Err(err) = self.0.style().set_property("display", display) {
            console::error!("button display update failed", format!("{err:?}"));
        }
    }

    fn set_busy(&self, busy: bool) {
        let result = if busy {
            self.0
                .set_attribute("disabled", "")
                .and_then(|()| self.0.set_attribute("aria-busy", "true"))
        } else {
            self.0
                .remove_attribute("disabled")
                .and_then(|()| self.0.remove_attribute("aria-busy"))
        };
        if let Err(err) = result {
            console::error!("button busy update failed", format!("{err:?}"));
        }
    }
}

/// Anti-forgery token read from `document.cookie` on each request.
pub(crate) struct DocumentCookies {
    pub(crate) name: String,
}

impl TokenSource for DocumentCookies {
    fn token(&self) -> Option<String> {
        let cookies = document().dyn_into::<HtmlDocument>().ok()?.cookie().ok()?;
        token_from_cookies(&cookies, &self.name)
    }
}

/// Reloads the current location.
pub(crate) struct BrowserPage;

impl PageControl for BrowserPage {
    fn reload(&self) {
        if let Err(err) = window().location().reload() {
            console::error!("page reload failed", format!("{err:?}"));
        }
    }
}

/// Elements making up one table scope.
pub(crate) struct ResolvedScope {
    pub(crate) master: HtmlInputElement,
    pub(crate) rows: Vec<HtmlInputElement>,
    pub(crate) buttons: Vec<(ActionConfig, DomButton)>,
}

enum ScopeRoot {
    Table(Element),
    Document(Document),
}

impl ScopeRoot {
    fn query(&self, selector: &str) -> Option<Element> {
        let found = match self {
            Self::Table(table) => table.query_selector(selector),
            Self::Document(doc) => doc.query_selector(selector),
        };
        found.ok().flatten()
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let found = match self {
            Self::Table(table) => table.query_selector_all(selector),
            Self::Document(doc) => doc.query_selector_all(selector),
        };
        let Ok(list) = found else {
            console::error!("invalid selector", selector.to_string());
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|index| list.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }
}

/// Resolve the scope named by `initTableActions` options.
pub(crate) fn resolve_configured(options: &ScopeOptions) -> Option<ResolvedScope> {
    let selector = options.table_selector.as_deref()?;
    let table = ScopeRoot::Document(document()).query(selector)?;
    let root = ScopeRoot::Table(table);
    let master = root
        .query(&options.mark_all_selector)?
        .dyn_into::<HtmlInputElement>()
        .ok()?;
    build_scope(&root, master, options)
}

/// Discover scopes from the markup conventions used on list pages.
pub(crate) fn discover_scopes(options: &ScopeOptions) -> Vec<ResolvedScope> {
    let page = ScopeRoot::Document(document());
    let mut masters = page.query_all(AUTO_MARK_ALL_SELECTOR);
    masters.extend(page.query_all(&format!("table {}", options.mark_all_selector)));

    masters
        .into_iter()
        .filter_map(|element| element.dyn_into::<HtmlInputElement>().ok())
        .filter_map(|master| {
            let root = match master.closest("table") {
                Ok(Some(table)) => ScopeRoot::Table(table),
                _ => ScopeRoot::Document(document()),
            };
            build_scope(&root, master, options)
        })
        .collect()
}

fn build_scope(
    root: &ScopeRoot,
    master: HtmlInputElement,
    options: &ScopeOptions,
) -> Option<ResolvedScope> {
    let rows: Vec<HtmlInputElement> = root
        .query_all(&options.row_checkbox_selector)
        .into_iter()
        .filter_map(|element| element.dyn_into::<HtmlInputElement>().ok())
        .collect();
    if rows.is_empty() {
        console::debug!("bulk scope skipped: no row checkboxes", master.id());
        return None;
    }
    Some(ResolvedScope {
        master,
        rows,
        buttons: resolve_buttons(root, options),
    })
}

fn resolve_buttons(root: &ScopeRoot, options: &ScopeOptions) -> Vec<(ActionConfig, DomButton)> {
    let page = ScopeRoot::Document(document());
    ActionKind::all()
        .into_iter()
        .filter_map(|kind| {
            let selector = options.button_selector(kind)?;
            let element = root
                .query(selector)
                .or_else(|| page.query(selector))?
                .dyn_into::<HtmlElement>()
                .ok()?;
            let data_type = element.get_attribute("data-type");
            let Some(config) = ActionConfig::from_attributes(
                kind,
                element.get_attribute(kind.url_attribute()),
                data_type.as_deref(),
            ) else {
                console::warn!(
                    "bulk action button has no endpoint",
                    selector.to_string(),
                    kind.url_attribute()
                );
                return None;
            };
            Some((config, DomButton(element)))
        })
        .collect()
}
