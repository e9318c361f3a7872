/*
[INPUT]:  Raw form input (name, description, decimal stake string)
[OUTPUT]: Validated task fields with the stake converted to base units
[POS]:    Task domain layer - new-task input before it reaches the store
[UPDATE]: When new-task form fields or validation rules change
*/

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::units;

/// Unsubmitted new-task input, kept intact until a create succeeds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub name: String,
    pub description: String,
    /// Whole-token amount as typed, e.g. "0.75"
    pub stake_input: String,
}

/// Draft that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    pub name: String,
    pub description: String,
    pub stake_amount: u128,
}

impl TaskDraft {
    pub fn new(name: &str, description: &str, stake_input: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            stake_input: stake_input.to_string(),
        }
    }

    /// Whether every field has content, i.e. the submit affordance can be enabled
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.description.trim().is_empty()
            && !self.stake_input.trim().is_empty()
    }

    pub fn validate(&self) -> Result<ValidDraft> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation("name cannot be empty".to_string()));
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(LedgerError::Validation(
                "description cannot be empty".to_string(),
            ));
        }
        if self.stake_input.trim().is_empty() {
            return Err(LedgerError::Validation("stake cannot be empty".to_string()));
        }

        Ok(ValidDraft {
            name: name.to_string(),
            description: description.to_string(),
            stake_amount: units::to_base_units(&self.stake_input)?,
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_valid_draft() {
        let draft = TaskDraft::new(" Audit ", "check the vault", "0.25");
        assert!(draft.is_complete());

        let valid = draft.validate().unwrap();
        assert_eq!(valid.name, "Audit");
        assert_eq!(valid.description, "check the vault");
        assert_eq!(valid.stake_amount, 250_000_000_000_000_000);
    }

    #[rstest]
    #[case("", "desc", "1.0")]
    #[case("name", "  ", "1.0")]
    #[case("name", "desc", "")]
    fn test_blank_fields(#[case] name: &str, #[case] description: &str, #[case] stake: &str) {
        let draft = TaskDraft::new(name, description, stake);
        assert!(!draft.is_complete());
        assert!(matches!(draft.validate(), Err(LedgerError::Validation(_))));
    }

    #[rstest]
    #[case("abc")]
    #[case("-2")]
    fn test_bad_stake(#[case] stake: &str) {
        let draft = TaskDraft::new("name", "desc", stake);
        assert!(matches!(
            draft.validate(),
            Err(LedgerError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_clear() {
        let mut draft = TaskDraft::new("a", "b", "1");
        draft.clear();
        assert_eq!(draft, TaskDraft::default());
    }
}
