//! Status lifecycles for operator-driven requests.
//!
//! Privacy and waitlist requests are advanced by back-office staff, never by
//! the requesting user. Each status enum lists its successors; every change
//! goes through [`StateMachine::transition_to`].

use super::ValidationError;

pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Statuses reachable in one step.
    fn valid_transitions(&self) -> Vec<Self>;

    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Returns `target` when the move is allowed.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if !self.can_transition_to(&target) {
            return Err(ValidationError::invalid_format(
                "status",
                format!("cannot move from {:?} to {:?}", self, target),
            ));
        }
        Ok(target)
    }

    /// No further moves once the request is closed.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Ticket {
        Open,
        Escalated,
        Closed,
    }

    impl StateMachine for Ticket {
        fn valid_transitions(&self) -> Vec<Self> {
            match self {
                Ticket::Open => vec![Ticket::Escalated, Ticket::Closed],
                Ticket::Escalated => vec![Ticket::Closed],
                Ticket::Closed => vec![],
            }
        }
    }

    #[test]
    fn allowed_move_returns_target() {
        assert_eq!(Ticket::Open.transition_to(Ticket::Escalated), Ok(Ticket::Escalated));
    }

    #[test]
    fn backwards_move_is_refused() {
        let err = Ticket::Escalated.transition_to(Ticket::Open).unwrap_err();
        assert!(err.to_string().contains("cannot move from Escalated to Open"));
    }

    #[test]
    fn closed_is_terminal() {
        assert!(Ticket::Closed.is_terminal());
        assert!(!Ticket::Open.is_terminal());
    }
}
