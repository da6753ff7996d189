//! Selection state machine.
//!
//! The controller only stores the selected item. Whether the field still
//! agrees with it is derived on demand by comparing the item's canonical
//! text against the live field text.

/// Agreement between the selected item and the field text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    /// Nothing selected; the field holds whatever was typed
    Empty,
    /// Field text equals the selected item's canonical text
    Committed,
    /// An item is selected but the field text was edited since
    Diverged,
}

impl SelectionState {
    /// Classify from the selected item's canonical text (if any) and the
    /// current field text.
    pub fn classify(selected_text: Option<&str>, field_text: &str) -> Self {
        match selected_text {
            None => SelectionState::Empty,
            Some(expected) if expected == field_text => SelectionState::Committed,
            Some(_) => SelectionState::Diverged,
        }
    }
}

/// What the change handler did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Field text matched the selection (or the empty selection)
    Consistent,
    /// Mismatch under strict mode; selection and field were cleared
    Reset,
    /// Mismatch with strict mode off; nothing touched
    Tolerated,
}

impl Reconciliation {
    /// Decide how to react to a change notification.
    ///
    /// `expected` is the selected item's canonical text, or `""` when
    /// nothing is selected. Free text typed without a selection therefore
    /// counts as a mismatch too.
    pub fn decide(expected: &str, field_text: &str, strict_value: bool) -> Self {
        if expected == field_text {
            Reconciliation::Consistent
        } else if strict_value {
            Reconciliation::Reset
        } else {
            Reconciliation::Tolerated
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(SelectionState::classify(None, "abc"), SelectionState::Empty);
        assert_eq!(
            SelectionState::classify(Some("Berlin"), "Berlin"),
            SelectionState::Committed
        );
        assert_eq!(
            SelectionState::classify(Some("Berlin"), "Berl"),
            SelectionState::Diverged
        );
    }

    #[test]
    fn test_decide() {
        assert_eq!(Reconciliation::decide("", "", true), Reconciliation::Consistent);
        assert_eq!(
            Reconciliation::decide("Berlin", "Berlin", false),
            Reconciliation::Consistent
        );
        assert_eq!(Reconciliation::decide("Berlin", "B", true), Reconciliation::Reset);
        assert_eq!(
            Reconciliation::decide("Berlin", "B", false),
            Reconciliation::Tolerated
        );
        assert_eq!(Reconciliation::decide("", "typed", true), Reconciliation::Reset);
    }
}
