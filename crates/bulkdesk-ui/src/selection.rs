//! Row selection and button visibility.
//!
//! # Design
//! - The checkboxes themselves hold the selection; nothing is cached here.
//! - Visibility is recomputed synchronously after every checkbox mutation.
//! - The master checkbox is never written back from row changes.

use bulkdesk_api_models::RowId;

/// A row checkbox bound to one record identifier.
pub trait RowCheckbox {
    /// Whether the row is currently checked.
    fn is_checked(&self) -> bool;
    /// Check or uncheck the row.
    fn set_checked(&self, checked: bool);
    /// Raw identifier rendered into the checkbox `value`.
    fn value(&self) -> String;
}

/// A bulk action button whose presentation follows the selection.
pub trait ActionTarget {
    /// Show or hide the button.
    fn set_visible(&self, visible: bool);
    /// Mark the button as busy while its request is in flight.
    fn set_busy(&self, busy: bool);
}

/// Whether at least one row is checked.
#[must_use]
pub fn any_checked<C: RowCheckbox>(rows: &[C]) -> bool {
    rows.iter().any(RowCheckbox::is_checked)
}

/// Identifiers of the checked rows, in document order.
#[must_use]
pub fn selected_ids<C: RowCheckbox>(rows: &[C]) -> Vec<RowId> {
    rows.iter()
        .filter(|row| row.is_checked())
        .map(|row| RowId::parse(&row.value()))
        .collect()
}

/// Set every row to `checked`.
pub fn set_all<C: RowCheckbox>(rows: &[C], checked: bool) {
    for row in rows {
        row.set_checked(checked);
    }
}

/// Show the buttons iff any row is checked; returns the computed flag.
pub fn update_visibility<'a, C, B, I>(rows: &[C], buttons: I) -> bool
where
    C: RowCheckbox,
    B: ActionTarget + 'a,
    I: IntoIterator<Item = &'a B>,
{
    let visible = any_checked(rows);
    for button in buttons {
        button.set_visible(visible);
    }
    visible
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::{ActionTarget, RowCheckbox};
    use crate::registry::ScopeMarked;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    pub(crate) struct FakeRow {
        pub(crate) value: String,
        pub(crate) checked: Cell<bool>,
    }

    impl FakeRow {
        pub(crate) fn new(value: &str, checked: bool) -> Self {
            Self {
                value: value.to_string(),
                checked: Cell::new(checked),
            }
        }
    }

    impl RowCheckbox for FakeRow {
        fn is_checked(&self) -> bool {
            self.checked.get()
        }

        fn set_checked(&self, checked: bool) {
            self.checked.set(checked);
        }

        fn value(&self) -> String {
            self.value.clone()
        }
    }

    /// Clones share state, like two lookups of the same page element.
    #[derive(Clone, Default)]
    pub(crate) struct FakeButton {
        pub(crate) visible: Rc<Cell<bool>>,
        pub(crate) busy: Rc<Cell<bool>>,
        pub(crate) busy_toggles: Rc<Cell<u32>>,
        owner: Rc<RefCell<Option<String>>>,
    }

    impl ActionTarget for FakeButton {
        fn set_visible(&self, visible: bool) {
            self.visible.set(visible);
        }

        fn set_busy(&self, busy: bool) {
            self.busy.set(busy);
            self.busy_toggles.set(self.busy_toggles.get() + 1);
        }
    }

    impl ScopeMarked for FakeButton {
        fn scope_marker(&self) -> Option<String> {
            self.owner.borrow().clone()
        }

        fn mark_scope(&self, scope_id: &str) {
            *self.owner.borrow_mut() = Some(scope_id.to_string());
        }
    }

    pub(crate) fn rows(spec: &[(&str, bool)]) -> Vec<FakeRow> {
        spec.iter()
            .map(|(value, checked)| FakeRow::new(value, *checked))
            .collect()
    }
}
