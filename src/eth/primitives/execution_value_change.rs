use crate::ext::not;

/// Change of a single account value during an engine execution.
///
/// Tracks the value read when execution started and the value written during
/// execution, so the apply step can detect lost updates.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExecutionValueChange<T>
where
    T: PartialEq,
{
    original: ValueState<T>,
    modified: ValueState<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueState<T> {
    Set(T),
    NotSet,
}

impl<T> ValueState<T> {
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    pub fn is_not_set(&self) -> bool {
        not(self.is_set())
    }
}

impl<T> Default for ExecutionValueChange<T>
where
    T: PartialEq,
{
    fn default() -> Self {
        Self {
            original: ValueState::NotSet,
            modified: ValueState::NotSet,
        }
    }
}

impl<T> ExecutionValueChange<T>
where
    T: PartialEq,
{
    /// Creates a new [`ExecutionValueChange`] only with the original value.
    pub fn from_original(value: T) -> Self {
        Self {
            original: ValueState::Set(value),
            modified: ValueState::NotSet,
        }
    }

    /// Creates a new [`ExecutionValueChange`] only with the modified value.
    pub fn from_modified(value: T) -> Self {
        Self {
            original: ValueState::NotSet,
            modified: ValueState::Set(value),
        }
    }

    /// Sets the modified value of an original value.
    pub fn set_modified(&mut self, value: T) {
        if self.original.is_not_set() {
            tracing::warn!("setting modified value without original value present");
        }
        self.modified = ValueState::Set(value);
    }

    /// Takes the original value as reference if it is set.
    pub fn take_original_ref(&self) -> Option<&T> {
        if let ValueState::Set(ref value) = self.original {
            Some(value)
        } else {
            None
        }
    }

    /// Takes the modified value as reference if it is set.
    pub fn take_modified_ref(&self) -> Option<&T> {
        if let ValueState::Set(ref value) = self.modified {
            Some(value)
        } else {
            None
        }
    }

    /// Checks if the value was modified.
    pub fn is_modified(&self) -> bool {
        self.modified.is_set() && (self.original != self.modified)
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_change_tracks_original_and_modified() {
        let mut change = ExecutionValueChange::from_original(1u64);
        assert_eq!(change.take_original_ref(), Some(&1));
        assert_eq!(change.take_modified_ref(), None);
        assert!(!change.is_modified());

        change.set_modified(2);
        assert_eq!(change.take_modified_ref(), Some(&2));
        assert!(change.is_modified());
    }

    #[test]
    fn value_change_without_difference_is_not_modified() {
        let mut change = ExecutionValueChange::from_original(1u64);
        change.set_modified(1);
        assert!(!change.is_modified());
    }
}
