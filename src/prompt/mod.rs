//! Rollover prompt control
//!
//! `PromptController` runs the rollover check when the app loads, asks the
//! user through a `RolloverPrompt`, executes the decision with the
//! `ArchiveManager`, and only then closes the prompt. A failed decision
//! leaves the prompt open so the user can retry.

mod terminal;

pub use terminal::TerminalPrompt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::audit::AuditLogger;
use crate::clock::Clock;
use crate::error::RolloverResult;
use crate::models::{Period, UserId};
use crate::services::archive::{ArchiveManager, ArchiveSummary};
use crate::services::detector::{load_check, RolloverCheck};
use crate::storage::PersistenceGateway;

/// The two ways a user can deal with a new period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RolloverChoice {
    /// Snapshot the previous period and clear it from the working set
    Archive,
    /// Keep all data and just accept the new period
    Continue,
}

/// User-facing surface of the rollover decision
pub trait RolloverPrompt {
    /// Ask the user; `None` means the prompt was dismissed without a choice
    fn choose(&mut self, check: &RolloverCheck) -> RolloverResult<Option<RolloverChoice>>;

    /// Called once the chosen operation has completed
    fn close(&mut self);
}

/// What a controller run ended with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PromptOutcome {
    /// The current period was already acknowledged
    NoRollover { current_period: Period },
    /// The user closed the prompt; it shows again next time
    Dismissed { current_period: Period },
    Archived(ArchiveSummary),
    Continued { current_period: Period },
}

/// Drives the rollover check and decision for one user
pub struct PromptController<'a, G: PersistenceGateway + ?Sized> {
    gateway: &'a G,
    clock: &'a dyn Clock,
    start_day: u32,
    audit: Option<&'a AuditLogger>,
}

impl<'a, G: PersistenceGateway + ?Sized> PromptController<'a, G> {
    pub fn new(gateway: &'a G, clock: &'a dyn Clock, start_day: u32) -> Self {
        Self {
            gateway,
            clock,
            start_day,
            audit: None,
        }
    }

    pub fn with_audit(mut self, audit: &'a AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Check for a new period and, if there is one, let the user decide
    pub async fn run<P: RolloverPrompt + ?Sized>(
        &self,
        uid: &UserId,
        prompt: &mut P,
    ) -> RolloverResult<PromptOutcome> {
        let check = load_check(self.gateway, uid, self.clock.now(), self.start_day).await?;
        if !check.is_new {
            debug!(user = %uid, current = %check.current_period.id, "no rollover pending");
            return Ok(PromptOutcome::NoRollover {
                current_period: check.current_period,
            });
        }

        let Some(choice) = prompt.choose(&check)? else {
            info!(user = %uid, "rollover prompt dismissed");
            return Ok(PromptOutcome::Dismissed {
                current_period: check.current_period,
            });
        };

        let outcome = self.execute(uid, choice).await;
        match outcome {
            Ok(outcome) => {
                prompt.close();
                Ok(outcome)
            }
            Err(e) => {
                warn!(user = %uid, choice = ?choice, error = %e, "rollover failed, prompt stays open");
                Err(e)
            }
        }
    }

    /// Carry out a decision without asking
    pub async fn execute(&self, uid: &UserId, choice: RolloverChoice) -> RolloverResult<PromptOutcome> {
        let mut manager = ArchiveManager::new(self.gateway, self.clock, self.start_day);
        if let Some(audit) = self.audit {
            manager = manager.with_audit(audit);
        }

        match choice {
            RolloverChoice::Archive => manager
                .archive_current_period(uid)
                .await
                .map(PromptOutcome::Archived),
            RolloverChoice::Continue => manager
                .mark_period_as_checked(uid)
                .await
                .map(|current_period| PromptOutcome::Continued { current_period }),
        }
    }
}
