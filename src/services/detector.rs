//! Rollover detection
//!
//! Compares the period implied by "now" with the persisted last-acknowledged
//! marker. Pure: the marker is passed in and nothing is written.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, warn};

use super::period::compute_period;
use crate::error::{RolloverError, RolloverResult};
use crate::models::{Period, PeriodId, UserId};
use crate::storage::PersistenceGateway;

/// How the stored marker relates to the current period
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MarkerState {
    /// No marker has ever been written
    Absent,
    /// Marker names a period before the current one
    Stale(PeriodId),
    /// Marker names the current period
    Current,
    /// Marker names a later period than the clock implies
    Ahead(PeriodId),
    /// Marker text is not a period id
    Corrupt(String),
}

impl MarkerState {
    /// Classify a raw marker against the current period id
    pub fn classify(last_acknowledged: Option<&str>, current: PeriodId) -> Self {
        let Some(raw) = last_acknowledged else {
            return Self::Absent;
        };

        match PeriodId::parse(raw) {
            Ok(id) if id < current => Self::Stale(id),
            Ok(id) if id == current => Self::Current,
            Ok(id) => Self::Ahead(id),
            Err(_) => Self::Corrupt(raw.to_string()),
        }
    }

    /// The marker as a usable period id, if it is one
    pub fn period_id(&self, current: PeriodId) -> Option<PeriodId> {
        match self {
            Self::Stale(id) | Self::Ahead(id) => Some(*id),
            Self::Current => Some(current),
            Self::Absent | Self::Corrupt(_) => None,
        }
    }

    /// The anomaly for markers that must not be acted on
    pub fn anomaly(&self, current: PeriodId) -> Option<RolloverError> {
        match self {
            Self::Ahead(id) => Some(RolloverError::InvalidMarkerState(format!(
                "marker {} is ahead of current period {}",
                id, current
            ))),
            Self::Corrupt(raw) => Some(RolloverError::InvalidMarkerState(format!(
                "marker {:?} is not a period id",
                raw
            ))),
            _ => None,
        }
    }
}

/// Result of a rollover check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RolloverCheck {
    /// Whether the user should be prompted
    pub is_new: bool,
    pub current_period: Period,
    pub marker: MarkerState,
}

/// Decide whether a new period has begun since the marker was written
///
/// A marker that is ahead of the clock or unreadable is logged and treated
/// as "not new": the prompt is never re-triggered for a period already
/// passed.
pub fn check_for_new_period(
    last_acknowledged: Option<&str>,
    now: NaiveDateTime,
    start_day: u32,
) -> RolloverCheck {
    let current_period = compute_period(now, start_day);
    let marker = MarkerState::classify(last_acknowledged, current_period.id);

    let is_new = match &marker {
        MarkerState::Absent | MarkerState::Stale(_) => true,
        MarkerState::Current => false,
        MarkerState::Ahead(_) | MarkerState::Corrupt(_) => {
            if let Some(err) = marker.anomaly(current_period.id) {
                warn!(error = %err, "ignoring marker for rollover detection");
            }
            false
        }
    };

    debug!(
        current = %current_period.id,
        marker = ?last_acknowledged,
        is_new,
        "checked for new period"
    );

    RolloverCheck {
        is_new,
        current_period,
        marker,
    }
}

/// Read the user's marker from the store and check it against `now`
pub async fn load_check<G: PersistenceGateway + ?Sized>(
    gateway: &G,
    uid: &UserId,
    now: NaiveDateTime,
    start_day: u32,
) -> RolloverResult<RolloverCheck> {
    let marker = gateway.get_last_acknowledged_period(uid).await?;
    Ok(check_for_new_period(marker.as_deref(), now, start_day))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_stale_marker_is_new() {
        let check = check_for_new_period(Some("2024-05"), at(2024, 6, 3), 1);
        assert!(check.is_new);
        assert_eq!(check.current_period.id.to_string(), "2024-06");
        assert_eq!(check.marker, MarkerState::Stale(PeriodId::new(2024, 5)));
    }

    #[test]
    fn test_absent_marker_is_new() {
        let check = check_for_new_period(None, at(2024, 6, 3), 1);
        assert!(check.is_new);
        assert_eq!(check.marker, MarkerState::Absent);
    }

    #[test]
    fn test_current_marker_is_not_new() {
        let check = check_for_new_period(Some("2024-06"), at(2024, 6, 30), 1);
        assert!(!check.is_new);
        assert_eq!(check.marker, MarkerState::Current);
    }

    #[test]
    fn test_future_marker_is_not_new() {
        let check = check_for_new_period(Some("2024-09"), at(2024, 6, 3), 1);
        assert!(!check.is_new);
        assert_eq!(check.marker, MarkerState::Ahead(PeriodId::new(2024, 9)));
        assert!(matches!(
            check.marker.anomaly(check.current_period.id),
            Some(RolloverError::InvalidMarkerState(_))
        ));
    }

    #[test]
    fn test_corrupt_marker_is_not_new() {
        let check = check_for_new_period(Some("june"), at(2024, 6, 3), 1);
        assert!(!check.is_new);
        assert_eq!(check.marker, MarkerState::Corrupt("june".into()));
    }

    #[test]
    fn test_mid_month_start_day_uses_period_id() {
        // With start day 15, June 10 still belongs to the period "2024-05".
        let check = check_for_new_period(Some("2024-05"), at(2024, 6, 10), 15);
        assert!(!check.is_new);

        let check = check_for_new_period(Some("2024-05"), at(2024, 6, 15), 15);
        assert!(check.is_new);
        assert_eq!(check.current_period.id, PeriodId::new(2024, 6));
    }

    #[tokio::test]
    async fn test_load_check_reads_store() {
        use crate::storage::{MemoryStore, StoreOp};

        let store = MemoryStore::new();
        let uid = UserId::parse("alice").unwrap();
        store
            .set_last_acknowledged_period(&uid, PeriodId::new(2024, 6))
            .await
            .unwrap();

        let check = load_check(&store, &uid, at(2024, 6, 20), 1).await.unwrap();
        assert!(!check.is_new);

        store.fail_on(StoreOp::GetMarker);
        let err = load_check(&store, &uid, at(2024, 6, 20), 1).await.unwrap_err();
        assert!(err.is_store_unavailable());
    }
}
