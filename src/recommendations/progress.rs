use std::collections::BTreeSet;

use axum::http::StatusCode;
use dashmap::DashMap;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::error::HttpError;
use crate::impl_into_response;

/// Longest recommendation id accepted by the store
pub const MAX_ID_LEN: usize = 128;

#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("Recommendation id must not be empty")]
    EmptyId,

    #[error("Recommendation id longer than {} characters", MAX_ID_LEN)]
    IdTooLong,

    #[error("Action index {index} out of range (max {max})")]
    ActionIndexOutOfRange { index: usize, max: usize },

    #[error("Progress is already tracked for {0} recommendations")]
    TrackingLimitReached(usize),
}

impl HttpError for ProgressError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyId | Self::IdTooLong | Self::ActionIndexOutOfRange { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::TrackingLimitReached(_) => StatusCode::CONFLICT,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::EmptyId => Some("EMPTY_ID"),
            Self::IdTooLong => Some("ID_TOO_LONG"),
            Self::ActionIndexOutOfRange { .. } => Some("ACTION_INDEX_OUT_OF_RANGE"),
            Self::TrackingLimitReached(_) => Some("TRACKING_LIMIT_REACHED"),
        }
    }
}

impl_into_response!(ProgressError);

/// Checklist state for recommendation actions, keyed by recommendation id.
///
/// Lives outside the engine; recommendations themselves are never mutated.
/// Both the number of tracked ids and the action index range are bounded.
pub struct ActionProgressStore {
    completed: DashMap<String, BTreeSet<usize>>,
    max_tracked: usize,
    max_actions: usize,
}

/// Completed action indices for one recommendation
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionProgress {
    pub recommendation_id: String,
    pub completed_actions: Vec<usize>,
}

impl ActionProgressStore {
    pub fn new(max_tracked: usize, max_actions: usize) -> Self {
        Self {
            completed: DashMap::new(),
            max_tracked,
            max_actions,
        }
    }

    /// Flip an action between done and not done.
    /// Returns `true` if the action is now completed.
    pub fn toggle(&self, recommendation_id: &str, action_index: usize) -> Result<bool, ProgressError> {
        if action_index >= self.max_actions {
            return Err(ProgressError::ActionIndexOutOfRange {
                index: action_index,
                max: self.max_actions.saturating_sub(1),
            });
        }

        // New ids only while under the cap; known ids can always be toggled back
        if !self.completed.contains_key(recommendation_id) && self.completed.len() >= self.max_tracked {
            tracing::warn!(
                recommendation_id = %recommendation_id,
                tracked = self.completed.len(),
                "Progress tracking limit reached"
            );
            return Err(ProgressError::TrackingLimitReached(self.max_tracked));
        }

        let mut entry = self
            .completed
            .entry(recommendation_id.to_string())
            .or_default();

        let now_completed = if entry.remove(&action_index) {
            false
        } else {
            entry.insert(action_index);
            true
        };

        drop(entry);
        self.completed
            .remove_if(recommendation_id, |_, set| set.is_empty());

        Ok(now_completed)
    }

    pub fn progress(&self, recommendation_id: &str) -> ActionProgress {
        let completed_actions = self
            .completed
            .get(recommendation_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();

        ActionProgress {
            recommendation_id: recommendation_id.to_string(),
            completed_actions,
        }
    }

    /// Forget all progress for a recommendation. Returns whether any existed.
    pub fn clear(&self, recommendation_id: &str) -> bool {
        self.completed.remove(recommendation_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }
}

/// Trimmed, bounded recommendation id from a path segment
pub fn require_id(id: &str) -> Result<&str, ProgressError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(ProgressError::EmptyId);
    }
    if trimmed.chars().count() > MAX_ID_LEN {
        return Err(ProgressError::IdTooLong);
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ActionProgressStore {
        ActionProgressStore::new(100, 16)
    }

    #[test]
    fn test_toggle_marks_and_unmarks() {
        let store = store();
        assert!(store.toggle("rec_p1", 2).unwrap());
        assert!(store.toggle("rec_p1", 0).unwrap());
        assert_eq!(store.progress("rec_p1").completed_actions, vec![0, 2]);

        assert!(!store.toggle("rec_p1", 2).unwrap());
        assert_eq!(store.progress("rec_p1").completed_actions, vec![0]);
    }

    #[test]
    fn test_progress_is_keyed_by_id() {
        let store = store();
        store.toggle("rec_a", 1).unwrap();
        assert!(store.progress("rec_b").completed_actions.is_empty());
        assert_eq!(store.progress("rec_a").recommendation_id, "rec_a");
    }

    #[test]
    fn test_empty_entries_are_dropped() {
        let store = store();
        store.toggle("rec_a", 1).unwrap();
        store.toggle("rec_a", 1).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear() {
        let store = store();
        store.toggle("rec_a", 0).unwrap();
        store.toggle("rec_b", 0).unwrap();
        assert!(store.clear("rec_a"));
        assert!(!store.clear("rec_a"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_action_index_is_bounded() {
        let store = store();
        assert!(store.toggle("rec_a", 15).unwrap());

        let err = store.toggle("rec_a", 16).unwrap_err();
        assert!(matches!(err, ProgressError::ActionIndexOutOfRange { index: 16, max: 15 }));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = store.toggle("rec_b", usize::MAX).unwrap_err();
        assert_eq!(err.error_code(), Some("ACTION_INDEX_OUT_OF_RANGE"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_tracked_ids_are_capped() {
        let store = ActionProgressStore::new(2, 16);
        store.toggle("rec_a", 0).unwrap();
        store.toggle("rec_b", 0).unwrap();

        let err = store.toggle("rec_c", 0).unwrap_err();
        assert!(matches!(err, ProgressError::TrackingLimitReached(2)));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(store.len(), 2);

        // Known ids keep working at the cap; an emptied id frees its slot
        assert!(store.toggle("rec_a", 3).unwrap());
        assert!(!store.toggle("rec_b", 0).unwrap());
        assert!(store.toggle("rec_c", 0).unwrap());
    }

    #[test]
    fn test_require_id() {
        assert_eq!(require_id("  rec_a ").unwrap(), "rec_a");
        assert!(matches!(require_id("   "), Err(ProgressError::EmptyId)));
        assert!(matches!(
            require_id(&"x".repeat(MAX_ID_LEN + 1)),
            Err(ProgressError::IdTooLong)
        ));
    }
}
