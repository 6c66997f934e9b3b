//! Lifecycle phases shared by the registry tables and the sequencer.

use std::fmt;

/// State of the lifecycle sequencer.
///
/// Transitions run strictly forward:
/// `Uninitialized -> Initializing -> Ready -> TearingDown -> Finalized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LifecyclePhase {
    /// Nothing has been set up yet.
    Uninitialized,
    /// Foundational state exists; registration passes are running.
    Initializing,
    /// All tables are populated and read-mostly.
    Ready,
    /// The reverse teardown sequence is running.
    TearingDown,
    /// Terminal. Every table has been released.
    Finalized,
}

impl LifecyclePhase {
    /// Returns a human-readable name for this phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecyclePhase::Uninitialized => "uninitialized",
            LifecyclePhase::Initializing => "initializing",
            LifecyclePhase::Ready => "ready",
            LifecyclePhase::TearingDown => "tearing down",
            LifecyclePhase::Finalized => "finalized",
        }
    }

    /// The only phase reachable from this one, if any.
    pub fn successor(&self) -> Option<LifecyclePhase> {
        match self {
            LifecyclePhase::Uninitialized => Some(LifecyclePhase::Initializing),
            LifecyclePhase::Initializing => Some(LifecyclePhase::Ready),
            LifecyclePhase::Ready => Some(LifecyclePhase::TearingDown),
            LifecyclePhase::TearingDown => Some(LifecyclePhase::Finalized),
            LifecyclePhase::Finalized => None,
        }
    }

    /// Check whether moving to `next` is a legal transition.
    pub fn can_transition_to(&self, next: LifecyclePhase) -> bool {
        self.successor() == Some(next)
    }
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transitions_only() {
        assert!(LifecyclePhase::Uninitialized.can_transition_to(LifecyclePhase::Initializing));
        assert!(LifecyclePhase::Initializing.can_transition_to(LifecyclePhase::Ready));
        assert!(LifecyclePhase::Ready.can_transition_to(LifecyclePhase::TearingDown));
        assert!(LifecyclePhase::TearingDown.can_transition_to(LifecyclePhase::Finalized));

        assert!(!LifecyclePhase::Uninitialized.can_transition_to(LifecyclePhase::Ready));
        assert!(!LifecyclePhase::Ready.can_transition_to(LifecyclePhase::Initializing));
        assert!(!LifecyclePhase::Finalized.can_transition_to(LifecyclePhase::Uninitialized));
    }

    #[test]
    fn finalized_is_terminal() {
        assert_eq!(LifecyclePhase::Finalized.successor(), None);
    }

    #[test]
    fn display() {
        assert_eq!(LifecyclePhase::TearingDown.to_string(), "tearing down");
    }
}
