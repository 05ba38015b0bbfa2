use std::collections::HashMap;

/// State-changing action the controller can forward to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Retry,
    Cancel,
}

impl ActionKind {
    pub fn verb(self) -> &'static str {
        match self {
            Self::Retry => "retry",
            Self::Cancel => "cancel",
        }
    }
}

/// Per-record reservation of outstanding retry/cancel requests.
///
/// At most one action may be outstanding for a record id at a time.
#[derive(Debug, Default, Clone)]
pub struct InFlightActions {
    pending: HashMap<String, ActionKind>,
}

impl InFlightActions {
    /// Reserve `id` for `kind`. Returns the action already outstanding when the
    /// reservation is refused.
    pub fn try_reserve(&mut self, id: &str, kind: ActionKind) -> Result<(), ActionKind> {
        if let Some(existing) = self.pending.get(id) {
            return Err(*existing);
        }
        self.pending.insert(id.to_string(), kind);
        Ok(())
    }

    pub fn release(&mut self, id: &str) -> Option<ActionKind> {
        self.pending.remove(id)
    }

    pub fn pending(&self, id: &str) -> Option<ActionKind> {
        self.pending.get(id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_reservation_for_same_id_is_refused() {
        let mut in_flight = InFlightActions::default();
        assert!(in_flight.try_reserve("a", ActionKind::Retry).is_ok());
        assert_eq!(in_flight.try_reserve("a", ActionKind::Cancel), Err(ActionKind::Retry));
        assert!(in_flight.try_reserve("b", ActionKind::Cancel).is_ok());
        assert_eq!(in_flight.pending("b"), Some(ActionKind::Cancel));
    }

    #[test]
    fn release_allows_a_new_reservation() {
        let mut in_flight = InFlightActions::default();
        in_flight.try_reserve("a", ActionKind::Retry).unwrap();
        assert_eq!(in_flight.release("a"), Some(ActionKind::Retry));
        assert!(in_flight.pending("a").is_none());
        assert!(in_flight.try_reserve("a", ActionKind::Retry).is_ok());
    }
}
