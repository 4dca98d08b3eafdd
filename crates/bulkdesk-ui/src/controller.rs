//! Per-table bulk selection controller.
//!
//! # Design
//! - One controller per scope: a master checkbox, its rows, and the action
//!   buttons wired to them.
//! - Collaborators (dialogs, HTTP, page reload, token lookup) are shared
//!   trait objects so every scope on a page uses the same instances.
//! - A button ignores activations while its own request is in flight.

use std::cell::Cell;
use std::rc::Rc;

use bulkdesk_api_models::{BulkActionRequest, RowId};

use crate::config::{ActionConfig, ActionKind};
use crate::confirm::{ConfirmGate, ConfirmPrompt};
use crate::csrf::{CsrfHeader, TokenSource};
use crate::dispatch::{BulkTransport, DispatchOutcome, Notifier, PageControl, dispatch};
use crate::selection::{self, ActionTarget, RowCheckbox};

/// Shared collaborators used by every controller on a page.
#[derive(Clone)]
pub struct ControllerCtx {
    /// Confirmation dialogs.
    pub gate: Rc<dyn ConfirmGate>,
    /// HTTP transport for bulk requests.
    pub transport: Rc<dyn BulkTransport>,
    /// Success/error notices.
    pub notifier: Rc<dyn Notifier>,
    /// Page reload hook.
    pub page: Rc<dyn PageControl>,
    /// Anti-forgery token lookup.
    pub tokens: Rc<dyn TokenSource>,
    /// Header carrying the anti-forgery token.
    pub csrf_header_name: String,
}

/// What happened when an action button was activated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// The scope has no button for this action.
    Unbound,
    /// The button's previous request is still in flight.
    Busy,
    /// No rows were checked; nothing happened.
    NoSelection,
    /// The user cancelled the confirmation.
    Cancelled,
    /// A request was sent.
    Dispatched(DispatchOutcome),
}

struct BoundAction<B> {
    config: ActionConfig,
    target: B,
    in_flight: Cell<bool>,
}

/// Selection state and bulk actions for one table scope.
pub struct BulkSelectionController<C, B> {
    rows: Vec<C>,
    actions: Vec<BoundAction<B>>,
}

impl<C: RowCheckbox, B: ActionTarget> BulkSelectionController<C, B> {
    /// Create a controller, or `None` when the scope has no rows.
    #[must_use]
    pub fn new(rows: Vec<C>, actions: Vec<(ActionConfig, B)>) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }
        let actions = actions
            .into_iter()
            .map(|(config, target)| BoundAction {
                config,
                target,
                in_flight: Cell::new(false),
            })
            .collect();
        Some(Self { rows, actions })
    }

    /// Apply the master checkbox state to every row.
    pub fn set_all(&self, checked: bool) -> bool {
        selection::set_all(&self.rows, checked);
        self.update_visibility()
    }

    /// React to a single row being toggled.
    pub fn on_row_changed(&self) -> bool {
        self.update_visibility()
    }

    /// Show the action buttons iff any row is checked.
    pub fn update_visibility(&self) -> bool {
        selection::update_visibility(&self.rows, self.actions.iter().map(|action| &action.target))
    }

    /// Identifiers of the checked rows.
    #[must_use]
    pub fn selection(&self) -> Vec<RowId> {
        selection::selected_ids(&self.rows)
    }

    /// Run the confirm-then-dispatch flow for the button of `kind`.
    pub async fn activate(&self, kind: ActionKind, ctx: &ControllerCtx) -> ActivationOutcome {
        let Some(action) = self.actions.iter().find(|action| action.config.kind == kind) else {
            return ActivationOutcome::Unbound;
        };
        if action.in_flight.get() {
            return ActivationOutcome::Busy;
        }
        let ids = self.selection();
        if ids.is_empty() {
            return ActivationOutcome::NoSelection;
        }

        action.in_flight.set(true);
        let request = match ConfirmPrompt::for_action(kind, action.config.mode, ids.len()) {
            None => BulkActionRequest::restore(ids),
            Some(prompt) => {
                let outcome = ctx.gate.confirm(&prompt).await;
                let Some(mode) = prompt.resolve(outcome) else {
                    action.in_flight.set(false);
                    return ActivationOutcome::Cancelled;
                };
                BulkActionRequest::delete(ids, mode)
            }
        };

        action.target.set_busy(true);
        let csrf = CsrfHeader::resolve(&ctx.csrf_header_name, ctx.tokens.as_ref());
        let outcome = dispatch(
            ctx.transport.as_ref(),
            ctx.notifier.as_ref(),
            ctx.page.as_ref(),
            &action.config.endpoint,
            csrf.as_ref(),
            &request,
            kind.success_title(),
        )
        .await;

        // A reload is already underway; the page keeps the button disabled.
        if !matches!(outcome, DispatchOutcome::Reloaded { .. }) {
            action.target.set_busy(false);
            action.in_flight.set(false);
        }
        ActivationOutcome::Dispatched(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::ConfirmOutcome;
    use crate::csrf::DEFAULT_HEADER_NAME;
    use crate::dispatch::fakes::{CountingPage, RecordingNotifier, ScriptedTransport};
    use crate::error::DispatchError;
    use crate::registry::claim_buttons;
    use crate::selection::fakes::{FakeButton, FakeRow, rows};
    use async_trait::async_trait;
    use serde_json::json;
    use std::cell::RefCell;

    struct ScriptedGate {
        answer: ConfirmOutcome,
        prompts: RefCell<Vec<ConfirmPrompt>>,
    }

    #[async_trait(?Send)]
    impl ConfirmGate for ScriptedGate {
        async fn confirm(&self, prompt: &ConfirmPrompt) -> ConfirmOutcome {
            self.prompts.borrow_mut().push(prompt.clone());
            self.answer
        }
    }

    struct Token(Option<&'static str>);

    impl TokenSource for Token {
        fn token(&self) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    struct Harness {
        gate: Rc<ScriptedGate>,
        transport: Rc<ScriptedTransport>,
        notifier: Rc<RecordingNotifier>,
        page: Rc<CountingPage>,
        ctx: ControllerCtx,
    }

    fn harness(answer: ConfirmOutcome, transport: ScriptedTransport) -> Harness {
        let gate = Rc::new(ScriptedGate {
            answer,
            prompts: RefCell::new(Vec::new()),
        });
        let transport = Rc::new(transport);
        let notifier = Rc::new(RecordingNotifier::default());
        let page = Rc::new(CountingPage::default());
        let ctx = ControllerCtx {
            gate: gate.clone(),
            transport: transport.clone(),
            notifier: notifier.clone(),
            page: page.clone(),
            tokens: Rc::new(Token(Some("s3cret"))),
            csrf_header_name: DEFAULT_HEADER_NAME.to_string(),
        };
        Harness {
            gate,
            transport,
            notifier,
            page,
            ctx,
        }
    }

    fn delete_button(kind: ActionKind) -> (ActionConfig, FakeButton) {
        let config = ActionConfig::from_attributes(kind, Some("/payslips/delete".into()), None)
            .expect("endpoint present");
        (config, FakeButton::default())
    }

    fn restore_button() -> (ActionConfig, FakeButton) {
        let config = ActionConfig::from_attributes(
            ActionKind::Restore,
            Some("/payslips/restore".into()),
            None,
        )
        .expect("endpoint present");
        (config, FakeButton::default())
    }

    fn payslips() -> BulkSelectionController<FakeRow, FakeButton> {
        BulkSelectionController::new(
            rows(&[("4", true), ("5", false), ("7", true), ("9", true)]),
            vec![delete_button(ActionKind::SoftDelete), restore_button()],
        )
        .expect("rows present")
    }

    fn button(
        controller: &BulkSelectionController<FakeRow, FakeButton>,
        kind: ActionKind,
    ) -> &FakeButton {
        &controller
            .actions
            .iter()
            .find(|action| action.config.kind == kind)
            .expect("button wired")
            .target
    }

    #[test]
    fn scope_without_rows_is_skipped() {
        let controller: Option<BulkSelectionController<FakeRow, FakeButton>> =
            BulkSelectionController::new(Vec::new(), vec![restore_button()]);
        assert!(controller.is_none());
    }

    #[test]
    fn master_toggle_drives_rows_and_buttons() {
        let controller = payslips();
        assert!(!controller.set_all(false));
        assert!(controller.rows.iter().all(|row| !row.is_checked()));
        assert!(!button(&controller, ActionKind::SoftDelete).visible.get());
        assert!(!button(&controller, ActionKind::Restore).visible.get());

        assert!(controller.set_all(true));
        assert!(controller.rows.iter().all(RowCheckbox::is_checked));
        assert!(button(&controller, ActionKind::SoftDelete).visible.get());
        assert!(button(&controller, ActionKind::Restore).visible.get());
    }

    #[test]
    fn row_change_updates_visibility_only() {
        let controller = payslips();
        controller.set_all(false);
        controller.rows[2].set_checked(true);
        assert!(controller.on_row_changed());
        assert!(button(&controller, ActionKind::SoftDelete).visible.get());
        assert_eq!(controller.selection(), vec![RowId::Int(7)]);

        controller.rows[2].set_checked(false);
        assert!(!controller.on_row_changed());
        assert!(!button(&controller, ActionKind::SoftDelete).visible.get());
    }

    #[tokio::test]
    async fn confirm_sends_soft_delete_for_selected_ids() {
        let h = harness(
            ConfirmOutcome::Confirm,
            ScriptedTransport::replying(Some(true), "Deleted"),
        );
        let controller = payslips();

        let outcome = controller.activate(ActionKind::SoftDelete, &h.ctx).await;

        assert!(matches!(
            outcome,
            ActivationOutcome::Dispatched(DispatchOutcome::Reloaded { .. })
        ));
        let sent = h.transport.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].endpoint, "/payslips/delete");
        assert_eq!(sent[0].body, json!({"ids": [4, 7, 9], "type": "soft"}));
        assert_eq!(
            sent[0].csrf,
            Some(CsrfHeader {
                name: "X-CSRFToken".into(),
                value: "s3cret".into(),
            })
        );
        assert_eq!(h.page.reloads.get(), 1);
        let notices = h.notifier.notices.borrow();
        assert_eq!(notices.len(), 1);
        assert!(!notices[0].is_error());
        assert_eq!(notices[0].title(), "Deleted!");
        let prompts = h.gate.prompts.borrow();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].html.contains("<b>3</b>"));
    }

    #[tokio::test]
    async fn deny_escalates_to_hard_delete() {
        let h = harness(
            ConfirmOutcome::Deny,
            ScriptedTransport::replying(Some(true), "Gone"),
        );
        let controller = payslips();

        controller.activate(ActionKind::SoftDelete, &h.ctx).await;

        let sent = h.transport.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body["type"], "hard");
    }

    #[tokio::test]
    async fn cancel_sends_nothing() {
        let h = harness(
            ConfirmOutcome::Cancel,
            ScriptedTransport::replying(Some(true), "Deleted"),
        );
        let controller = payslips();

        let outcome = controller.activate(ActionKind::SoftDelete, &h.ctx).await;

        assert_eq!(outcome, ActivationOutcome::Cancelled);
        assert!(h.transport.sent.borrow().is_empty());
        assert_eq!(h.page.reloads.get(), 0);
        assert_eq!(
            button(&controller, ActionKind::SoftDelete).busy_toggles.get(),
            0
        );
    }

    #[tokio::test]
    async fn empty_selection_never_reaches_gate_or_transport() {
        let h = harness(
            ConfirmOutcome::Confirm,
            ScriptedTransport::replying(Some(true), "Deleted"),
        );
        let controller = payslips();
        controller.set_all(false);

        let outcome = controller.activate(ActionKind::SoftDelete, &h.ctx).await;

        assert_eq!(outcome, ActivationOutcome::NoSelection);
        assert!(h.gate.prompts.borrow().is_empty());
        assert!(h.transport.sent.borrow().is_empty());
    }

    #[tokio::test]
    async fn restore_skips_confirmation_and_omits_type() {
        let h = harness(
            ConfirmOutcome::Cancel,
            ScriptedTransport::replying(None, "3 payslip(s) restored successfully."),
        );
        let controller = payslips();

        controller.activate(ActionKind::Restore, &h.ctx).await;

        assert!(h.gate.prompts.borrow().is_empty());
        let sent = h.transport.sent.borrow();
        assert_eq!(sent[0].endpoint, "/payslips/restore");
        assert_eq!(sent[0].body, json!({"ids": [4, 7, 9]}));
        assert_eq!(h.notifier.notices.borrow()[0].title(), "Restored!");
    }

    #[tokio::test]
    async fn rejection_keeps_selection_and_releases_button() {
        let h = harness(
            ConfirmOutcome::Confirm,
            ScriptedTransport::replying(Some(false), "X"),
        );
        let controller = payslips();

        let outcome = controller.activate(ActionKind::SoftDelete, &h.ctx).await;

        assert_eq!(
            outcome,
            ActivationOutcome::Dispatched(DispatchOutcome::Rejected { message: "X".into() })
        );
        let notices = h.notifier.notices.borrow();
        assert!(notices[0].is_error());
        assert!(notices[0].message().contains('X'));
        assert_eq!(h.page.reloads.get(), 0);
        assert_eq!(controller.selection().len(), 3);
        let target = button(&controller, ActionKind::SoftDelete);
        assert!(!target.busy.get());
        assert_eq!(target.busy_toggles.get(), 2);
    }

    #[tokio::test]
    async fn transport_failure_allows_retry() {
        let h = harness(
            ConfirmOutcome::Confirm,
            ScriptedTransport::failing(DispatchError::Decode("unexpected token <".into())),
        );
        let controller = payslips();

        let first = controller.activate(ActionKind::SoftDelete, &h.ctx).await;
        let second = controller.activate(ActionKind::SoftDelete, &h.ctx).await;

        assert!(matches!(
            first,
            ActivationOutcome::Dispatched(DispatchOutcome::Failed(_))
        ));
        assert_eq!(first, second);
        assert_eq!(h.transport.sent.borrow().len(), 2);
        assert_eq!(controller.selection().len(), 3);
    }

    #[tokio::test]
    async fn reloading_button_stays_busy() {
        let h = harness(
            ConfirmOutcome::Confirm,
            ScriptedTransport::replying(Some(true), "Deleted"),
        );
        let controller = payslips();

        controller.activate(ActionKind::SoftDelete, &h.ctx).await;
        let again = controller.activate(ActionKind::SoftDelete, &h.ctx).await;

        assert_eq!(again, ActivationOutcome::Busy);
        assert!(button(&controller, ActionKind::SoftDelete).busy.get());
        assert_eq!(h.transport.sent.borrow().len(), 1);
    }

    #[tokio::test]
    async fn missing_button_is_unbound() {
        let h = harness(
            ConfirmOutcome::Confirm,
            ScriptedTransport::replying(Some(true), "Deleted"),
        );
        let controller = payslips();

        let outcome = controller.activate(ActionKind::HardDelete, &h.ctx).await;

        assert_eq!(outcome, ActivationOutcome::Unbound);
        assert!(h.gate.prompts.borrow().is_empty());
        assert!(h.transport.sent.borrow().is_empty());
    }

    #[tokio::test]
    async fn scopes_sharing_a_page_button_stay_independent() {
        let h = harness(
            ConfirmOutcome::Confirm,
            ScriptedTransport::replying(Some(true), "Deleted"),
        );
        let (config, toolbar) = delete_button(ActionKind::SoftDelete);
        let (_, trash_local) = delete_button(ActionKind::SoftDelete);

        let payslips = BulkSelectionController::new(
            rows(&[("1", true), ("2", false)]),
            claim_buttons(vec![(config.clone(), toolbar.clone())], "bulk-scope-1"),
        )
        .expect("rows present");
        let employees = BulkSelectionController::new(
            rows(&[("emp-3", false)]),
            claim_buttons(
                vec![(config.clone(), toolbar.clone()), (config, trash_local.clone())],
                "bulk-scope-2",
            ),
        )
        .expect("rows present");

        assert!(payslips.update_visibility());
        assert!(!employees.on_row_changed());
        assert!(toolbar.visible.get());
        assert!(!trash_local.visible.get());

        let outcome = payslips.activate(ActionKind::SoftDelete, &h.ctx).await;
        assert!(matches!(
            outcome,
            ActivationOutcome::Dispatched(DispatchOutcome::Reloaded { .. })
        ));
        assert_eq!(payslips.selection(), vec![RowId::Int(1)]);
        assert_eq!(
            employees.activate(ActionKind::SoftDelete, &h.ctx).await,
            ActivationOutcome::NoSelection
        );
        let sent = h.transport.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, json!({"ids": [1], "type": "soft"}));
    }
}
