//! Results of operations whose failure must never abort a run.

/// Outcome of a best-effort operation.
///
/// Unlike `Result`, there is no `?` conversion: a failure can be inspected
/// and logged but never propagated as a run-aborting error.
///
/// # Example
///
/// ```rust
/// use agent_bootstrap::BestEffort;
///
/// let linked: BestEffort<Vec<String>> = BestEffort::Failed("no sudo".to_string());
/// assert!(!linked.is_done());
/// assert_eq!(linked.failure(), Some("no sudo"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum BestEffort<T> {
    /// The operation completed.
    Done(T),
    /// The operation failed; the reason is kept for logging.
    Failed(String),
}

impl<T> BestEffort<T> {
    /// Whether the operation completed.
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    /// The completed value, if any.
    pub fn done(&self) -> Option<&T> {
        match self {
            Self::Done(value) => Some(value),
            Self::Failed(_) => None,
        }
    }

    /// The failure reason, if any.
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Done(_) => None,
            Self::Failed(reason) => Some(reason),
        }
    }

    /// Emit a warning for a failed operation named `what`.
    pub fn warn_on_failure(&self, what: &str) {
        if let Self::Failed(reason) = self {
            tracing::warn!("{what} failed (continuing): {reason}");
        }
    }
}
