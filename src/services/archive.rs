//! Archive manager
//!
//! Executes the user's rollover decision. `archive_current_period` snapshots
//! every expense dated before the current period into one immutable record
//! per period and removes the snapshotted expenses from the working set;
//! `mark_period_as_checked` only moves the marker. Both are idempotent and
//! never move the marker backwards.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::detector::MarkerState;
use super::period::{compute_period, period_for_date};
use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::clock::Clock;
use crate::error::{RolloverError, RolloverResult};
use crate::models::{ArchiveRecord, Expense, ExpenseId, Period, PeriodId, UserId};
use crate::storage::PersistenceGateway;

/// What an archive run did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveSummary {
    pub current_period: Period,
    /// Periods whose record was written by this run
    pub archived: Vec<PeriodId>,
    /// Periods whose record already existed and was left untouched
    pub already_archived: Vec<PeriodId>,
    /// Expenses removed from the working set
    pub expenses_removed: usize,
    /// Expenses left in the working set because their period's record
    /// already existed without them
    pub stranded: usize,
    /// Marker value after the run
    pub marker: PeriodId,
}

/// Executes archive and acknowledge transitions for one store
pub struct ArchiveManager<'a, G: PersistenceGateway + ?Sized> {
    gateway: &'a G,
    clock: &'a dyn Clock,
    start_day: u32,
    audit: Option<&'a AuditLogger>,
}

impl<'a, G: PersistenceGateway + ?Sized> ArchiveManager<'a, G> {
    pub fn new(gateway: &'a G, clock: &'a dyn Clock, start_day: u32) -> Self {
        Self {
            gateway,
            clock,
            start_day,
            audit: None,
        }
    }

    /// Record committed changes in an audit log
    pub fn with_audit(mut self, audit: &'a AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Archive everything before the current period and advance the marker
    ///
    /// A failed archive write or removal returns the error with the marker
    /// untouched, so the rollover is still pending and a retry picks up
    /// where this run stopped: existing records are never rewritten and
    /// removal is re-attempted.
    pub async fn archive_current_period(&self, uid: &UserId) -> RolloverResult<ArchiveSummary> {
        let current = compute_period(self.clock.now(), self.start_day);
        let raw_marker = self.gateway.get_last_acknowledged_period(uid).await?;
        let marker = MarkerState::classify(raw_marker.as_deref(), current.id);

        // Only periods that hold expenses get a record
        let expenses = self.gateway.get_expenses(uid).await?;
        let mut by_period: BTreeMap<PeriodId, Vec<Expense>> = BTreeMap::new();
        for expense in expenses.into_iter().filter(|e| e.date < current.start) {
            by_period
                .entry(period_for_date(expense.date, self.start_day).id)
                .or_default()
                .push(expense);
        }

        let mut archived = Vec::new();
        let mut already_archived = Vec::new();
        let mut to_remove = Vec::new();
        let mut stranded = 0;
        let mut audit_entries = Vec::new();

        for (period_id, snapshot) in by_period {
            let candidate_ids: Vec<ExpenseId> = snapshot.iter().map(|e| e.id).collect();
            let (record, written) = self.archive_period(uid, period_id, snapshot).await?;
            let record_ids = record.expense_ids();

            if written {
                audit_entries.push(
                    AuditEntry::create(uid, EntityType::ArchiveRecord, period_id.to_string(), &record)
                        .with_summary(format!(
                            "{} expenses, {}",
                            record.snapshot.len(),
                            record.total()
                        )),
                );
                archived.push(period_id);
            } else {
                let missing = candidate_ids
                    .iter()
                    .filter(|id| !record_ids.contains(id))
                    .count();
                if missing > 0 {
                    warn!(
                        user = %uid,
                        period = %period_id,
                        missing,
                        "expenses dated in an archived period are not in its snapshot"
                    );
                    stranded += missing;
                }
                already_archived.push(period_id);
            }

            to_remove.extend(record_ids);
        }

        let expenses_removed = if to_remove.is_empty() {
            0
        } else {
            self.gateway.remove_expenses(uid, &to_remove).await?
        };

        if expenses_removed > 0 {
            audit_entries.push(
                AuditEntry::delete(uid, EntityType::Expense, "working-set", &to_remove)
                    .with_summary(format!("{} expenses moved to archive", expenses_removed)),
            );
        }

        let marker_after = self
            .advance_marker(uid, current.id, &marker, raw_marker.as_deref(), &mut audit_entries)
            .await?;

        if let Some(audit) = self.audit {
            audit.record(&audit_entries);
        }

        info!(
            user = %uid,
            current = %current.id,
            archived = ?archived,
            already_archived = ?already_archived,
            expenses_removed,
            stranded,
            "archived previous period"
        );

        Ok(ArchiveSummary {
            current_period: current,
            archived,
            already_archived,
            expenses_removed,
            stranded,
            marker: marker_after,
        })
    }

    /// Accept the current period without moving any data
    pub async fn mark_period_as_checked(&self, uid: &UserId) -> RolloverResult<Period> {
        let current = compute_period(self.clock.now(), self.start_day);
        let raw_marker = self.gateway.get_last_acknowledged_period(uid).await?;
        let marker = MarkerState::classify(raw_marker.as_deref(), current.id);

        let mut audit_entries = Vec::new();
        let marker_after = self
            .advance_marker(uid, current.id, &marker, raw_marker.as_deref(), &mut audit_entries)
            .await?;

        if let Some(audit) = self.audit {
            audit.record(&audit_entries);
        }

        info!(user = %uid, current = %current.id, marker = %marker_after, "acknowledged period");
        Ok(current)
    }

    /// Re-express the marker after the period start day changed
    ///
    /// Period ids name the month a period starts in, so the same marker
    /// means a different period once the start day moves. A marker that
    /// named the current period under `previous_start_day` is rewritten to
    /// the current period under the new start day, which can move it
    /// backwards. A stale marker stays stale so the pending rollover is
    /// still offered. Returns the new marker when one was written.
    pub async fn realign_marker(
        &self,
        uid: &UserId,
        previous_start_day: u32,
    ) -> RolloverResult<Option<PeriodId>> {
        let now = self.clock.now();
        let old_current = compute_period(now, previous_start_day).id;
        let new_current = compute_period(now, self.start_day).id;
        let raw_marker = self.gateway.get_last_acknowledged_period(uid).await?;
        let marker = MarkerState::classify(raw_marker.as_deref(), old_current);

        let target = match marker {
            MarkerState::Current => new_current,
            MarkerState::Stale(id) => id.min(new_current.prev()),
            MarkerState::Ahead(_) | MarkerState::Corrupt(_) => {
                if let Some(err) = marker.anomaly(old_current) {
                    warn!(user = %uid, error = %err, "leaving marker as is after start day change");
                }
                return Ok(None);
            }
            MarkerState::Absent => return Ok(None),
        };

        if marker.period_id(old_current) == Some(target) {
            debug!(user = %uid, marker = %target, "marker already aligned");
            return Ok(None);
        }

        self.gateway.set_last_acknowledged_period(uid, target).await?;

        if let Some(audit) = self.audit {
            audit.record(&[AuditEntry::update(
                uid,
                EntityType::Marker,
                "last_acknowledged_period",
                raw_marker.as_ref(),
                &target.to_string(),
            )
            .with_summary(format!(
                "start day {} -> {}",
                previous_start_day, self.start_day
            ))]);
        }

        info!(user = %uid, from = ?raw_marker, to = %target, "realigned marker to new start day");
        Ok(Some(target))
    }

    /// Write the record for one period unless it already exists
    ///
    /// Returns the record now in the store and whether this call wrote it.
    async fn archive_period(
        &self,
        uid: &UserId,
        period_id: PeriodId,
        snapshot: Vec<Expense>,
    ) -> RolloverResult<(ArchiveRecord, bool)> {
        if let Some(existing) = self.gateway.get_archive_record(uid, period_id).await? {
            debug!(user = %uid, period = %period_id, "archive record exists, skipping write");
            return Ok((existing, false));
        }

        let record = ArchiveRecord::new(period_id, snapshot);
        match self.gateway.write_archive_record(uid, record.clone()).await {
            Ok(()) => Ok((record, true)),
            Err(RolloverError::ArchiveConflict { .. }) => {
                info!(user = %uid, period = %period_id, "archive written concurrently, using stored record");
                let existing = self
                    .gateway
                    .get_archive_record(uid, period_id)
                    .await?
                    .ok_or_else(|| {
                        RolloverError::StoreUnavailable(format!(
                            "archive record for {} reported present but not readable",
                            period_id
                        ))
                    })?;
                Ok((existing, false))
            }
            Err(e) => {
                warn!(user = %uid, period = %period_id, error = %e, "archive write failed");
                Err(e)
            }
        }
    }

    /// Move the marker to `current` unless it already points further ahead
    async fn advance_marker(
        &self,
        uid: &UserId,
        current: PeriodId,
        marker: &MarkerState,
        raw_marker: Option<&str>,
        audit_entries: &mut Vec<AuditEntry>,
    ) -> RolloverResult<PeriodId> {
        if let MarkerState::Ahead(ahead) = marker {
            if let Some(err) = marker.anomaly(current) {
                warn!(user = %uid, error = %err, "keeping marker, it is ahead of the clock");
            }
            return Ok(*ahead);
        }

        if let MarkerState::Corrupt(_) = marker {
            if let Some(err) = marker.anomaly(current) {
                warn!(user = %uid, error = %err, "replacing unreadable marker");
            }
        }

        self.gateway.set_last_acknowledged_period(uid, current).await?;

        if *marker != MarkerState::Current {
            let before = raw_marker.map(str::to_string);
            audit_entries.push(AuditEntry::update(
                uid,
                EntityType::Marker,
                "last_acknowledged_period",
                before.as_ref(),
                &current.to_string(),
            ));
        }

        Ok(current)
    }
}
