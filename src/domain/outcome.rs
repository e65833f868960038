use serde::Serialize;

use super::DomainError;

/// Raw counts reported by a single-document write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WriteOutcome {
    pub matched: u64,
    pub modified: u64,
}

impl WriteOutcome {
    pub fn new(matched: u64, modified: u64) -> Self {
        Self { matched, modified }
    }

    /// Deletes count removed documents as both matched and modified.
    pub fn deleted(count: u64) -> Self {
        Self::new(count, count)
    }

    pub fn is_match(&self) -> bool {
        self.matched > 0
    }

    /// Zero matched documents means the target does not exist.
    pub fn require_match(self, msg: impl Into<String>) -> Result<Self, DomainError> {
        if self.is_match() {
            Ok(self)
        } else {
            Err(DomainError::not_found(msg))
        }
    }
}

/// Result of a sparse update. `NoOp` is returned without contacting the
/// store when the update provided no fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateOutcome {
    NoOp,
    Applied(WriteOutcome),
}

impl UpdateOutcome {
    pub fn matched(&self) -> u64 {
        match self {
            Self::NoOp => 0,
            Self::Applied(outcome) => outcome.matched,
        }
    }

    pub fn modified(&self) -> u64 {
        match self {
            Self::NoOp => 0,
            Self::Applied(outcome) => outcome.modified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;

    #[test]
    fn test_zero_match_is_not_found() {
        let err = WriteOutcome::default()
            .require_match("Company with that id was not found")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_match_without_modification_is_ok() {
        let outcome = WriteOutcome::new(1, 0).require_match("missing").unwrap();
        assert_eq!(outcome.modified, 0);
    }

    #[test]
    fn test_noop_reports_zero_counts() {
        assert_eq!(UpdateOutcome::NoOp.matched(), 0);
        assert_eq!(UpdateOutcome::NoOp.modified(), 0);
        assert_eq!(UpdateOutcome::Applied(WriteOutcome::new(1, 1)).modified(), 1);
    }
}
