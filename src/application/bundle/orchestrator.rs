//! Bundle operation orchestrator
//!
//! Processes one bundle end to end:
//!
//! 1. document validation (a failure rejects every operation),
//! 2. per operation, in bundle order: input then business validation, then
//!    the timeline mutation,
//! 3. persistence of every changed charge, all or nothing,
//! 4. one accepted and one rejected event.
//!
//! Once an operation fails, every later operation on the same charge is
//! rejected with `SubsequentBundleOperationsFail` without being evaluated.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use super::locks::ChargeLocks;
use super::outcome::{BundleDisposition, BundleOutcome};
use super::validators::BundleValidators;
use crate::application::ports::EventPublisher;
use crate::config::AppConfig;
use crate::domain::charge::{Charge, ChargeIdentifier, TimelineError};
use crate::domain::document::{ChargeBundle, ChargeOperation, Document, OperationType};
use crate::domain::validation::{
    BusinessValidationContext, DocumentValidationContext, InputValidationContext,
    RejectedOperation, ValidationResult, ValidationRuleContainer,
};
use crate::domain::{DomainError, RepositoryProvider};
use crate::shared::errors::AppError;
use crate::shared::telemetry::{record_bundle, record_timeline_fault};
use crate::shared::utils::{retry_with_backoff, RetryConfig};

/// A charge as seen by the bundle currently being processed.
struct WorkingCharge {
    charge: Option<Charge>,
    /// Repository state when the bundle started
    original: Option<Charge>,
    dirty: bool,
}

/// A write already made by [`BundleOrchestrator::persist`], kept so it can be
/// undone if a later write fails.
enum AppliedWrite {
    Added(Charge),
    Updated { previous: Charge, current: Charge },
    Removed(Charge),
}

enum Verdict {
    Accepted,
    Rejected(Vec<ValidationRuleContainer>),
}

pub struct BundleOrchestrator {
    repos: Arc<dyn RepositoryProvider>,
    validators: BundleValidators,
    publisher: Arc<dyn EventPublisher>,
    locks: ChargeLocks,
    retry: RetryConfig,
}

impl BundleOrchestrator {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        validators: BundleValidators,
        publisher: Arc<dyn EventPublisher>,
        config: &AppConfig,
    ) -> Self {
        Self {
            repos,
            validators,
            publisher,
            locks: ChargeLocks::new(),
            retry: RetryConfig::from(&config.persistence),
        }
    }

    /// Share a lock registry with other orchestrators in the process.
    pub fn with_locks(mut self, locks: ChargeLocks) -> Self {
        self.locks = locks;
        self
    }

    pub fn locks(&self) -> &ChargeLocks {
        &self.locks
    }

    /// Process `bundle` with the current time as validation clock.
    pub async fn handle(&self, bundle: ChargeBundle) -> Result<BundleOutcome, AppError> {
        self.handle_at(bundle, Utc::now()).await
    }

    /// Process `bundle` with `now` as validation clock.
    pub async fn handle_at(
        &self,
        mut bundle: ChargeBundle,
        now: DateTime<Utc>,
    ) -> Result<BundleOutcome, AppError> {
        let started = Instant::now();
        if bundle.operations.is_empty() {
            return Err(AppError::EmptyBundle {
                document_id: bundle.document.id,
            });
        }
        bundle.normalize_positions();

        let document_id = bundle.document.id.clone();
        info!(
            document_id = %document_id,
            operations = bundle.operations.len(),
            sender = %bundle.document.sender.market_id,
            "Processing charge bundle"
        );

        let outcome = match self.validate_document(&bundle.document).await? {
            ValidationResult::Failure(containers) => {
                warn!(
                    document_id = %document_id,
                    failures = containers.len(),
                    "Document rejected"
                );
                let ChargeBundle {
                    document,
                    operations,
                } = bundle;
                let rejected = operations
                    .into_iter()
                    .map(|op| RejectedOperation::new(op, containers.clone()))
                    .collect();
                BundleOutcome {
                    document,
                    disposition: BundleDisposition::DocumentRejected,
                    accepted: Vec::new(),
                    rejected,
                }
            }
            ValidationResult::Success => self.process_operations(bundle, now).await?,
        };

        self.publish(&outcome).await?;
        record_bundle(
            outcome.disposition.as_str(),
            outcome.accepted.len(),
            outcome.rejected.len(),
            started,
        );
        info!(
            document_id = %document_id,
            disposition = outcome.disposition.as_str(),
            accepted = outcome.accepted.len(),
            rejected = outcome.rejected.len(),
            "Charge bundle processed"
        );
        Ok(outcome)
    }

    async fn validate_document(&self, document: &Document) -> Result<ValidationResult, AppError> {
        let sender = self
            .repos
            .market_participants()
            .find_by_market_id(&document.sender.market_id)
            .await?;
        let context = DocumentValidationContext { sender };
        Ok(self.validators.document.validate(document, &context))
    }

    async fn process_operations(
        &self,
        bundle: ChargeBundle,
        now: DateTime<Utc>,
    ) -> Result<BundleOutcome, AppError> {
        let identifiers = bundle.charge_identifiers();
        let _guard = self.locks.acquire(&identifiers).await;

        let ChargeBundle {
            document,
            operations,
        } = bundle;
        let input_context = InputValidationContext { now };
        let mut working: BTreeMap<ChargeIdentifier, WorkingCharge> = BTreeMap::new();
        let mut poisoned: HashMap<ChargeIdentifier, String> = HashMap::new();
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();

        for operation in operations {
            let identifier = operation.charge_identifier();

            if let Some(trigger) = poisoned.get(&identifier) {
                debug!(
                    document_id = %document.id,
                    operation_id = %operation.id,
                    triggered_by = %trigger,
                    "Operation rejected after earlier failure on the same charge"
                );
                let container = ValidationRuleContainer::cascaded(&operation.id, trigger);
                rejected.push(RejectedOperation::new(operation, vec![container]));
                continue;
            }

            let verdict = self
                .process_operation(&document, &operation, &identifier, &input_context, &mut working)
                .await?;
            match verdict {
                Verdict::Accepted => {
                    debug!(
                        document_id = %document.id,
                        operation_id = %operation.id,
                        charge_id = %identifier,
                        operation_type = %operation.operation_type,
                        "Operation accepted"
                    );
                    accepted.push(operation);
                }
                Verdict::Rejected(containers) => {
                    info!(
                        document_id = %document.id,
                        operation_id = %operation.id,
                        charge_id = %identifier,
                        failures = containers.len(),
                        "Operation rejected"
                    );
                    poisoned.insert(identifier, operation.id.clone());
                    rejected.push(RejectedOperation::new(operation, containers));
                }
            }
        }

        self.persist(working).await?;

        Ok(BundleOutcome {
            document,
            disposition: BundleDisposition::Processed,
            accepted,
            rejected,
        })
    }

    async fn process_operation(
        &self,
        document: &Document,
        operation: &ChargeOperation,
        identifier: &ChargeIdentifier,
        input_context: &InputValidationContext,
        working: &mut BTreeMap<ChargeIdentifier, WorkingCharge>,
    ) -> Result<Verdict, AppError> {
        let input = self.validators.input.validate(operation, input_context);
        if input.is_failed() {
            return Ok(Verdict::Rejected(input.into_containers()));
        }

        let entry = match working.entry(identifier.clone()) {
            Entry::Occupied(slot) => slot.into_mut(),
            Entry::Vacant(slot) => {
                let found = self.repos.charges().find_by_identifier(identifier).await?;
                slot.insert(WorkingCharge {
                    original: found.clone(),
                    charge: found,
                    dirty: false,
                })
            }
        };

        let business_context = BusinessValidationContext {
            sender: document.sender.clone(),
            existing_charge: entry.charge.as_ref().filter(|c| c.has_periods()).cloned(),
        };
        let business = self.validators.business.validate(operation, &business_context);
        if business.is_failed() {
            return Ok(Verdict::Rejected(business.into_containers()));
        }

        match apply(entry, operation) {
            Ok(()) => {
                entry.dirty = true;
                Ok(Verdict::Accepted)
            }
            Err(fault) => {
                error!(
                    document_id = %document.id,
                    operation_id = %operation.id,
                    charge_id = %identifier,
                    error = %fault,
                    "Timeline rejected an operation that passed validation"
                );
                record_timeline_fault();
                Ok(Verdict::Rejected(vec![ValidationRuleContainer::timeline_violation(
                    &operation.id,
                    fault.to_string(),
                )]))
            }
        }
    }

    /// Write every changed charge. When a write fails, the writes already
    /// made for this bundle are undone before the error is returned.
    async fn persist(&self, working: BTreeMap<ChargeIdentifier, WorkingCharge>) -> Result<(), AppError> {
        let mut applied = Vec::new();

        for (identifier, entry) in working {
            if !entry.dirty {
                continue;
            }
            let Some(charge) = entry.charge else {
                continue;
            };

            match self.write(&identifier, entry.original, charge).await {
                Ok(Some(write)) => applied.push(write),
                Ok(None) => {}
                Err(err) => {
                    error!(
                        charge_id = %identifier,
                        error = %err,
                        undo = applied.len(),
                        "Charge write failed, rolling back bundle"
                    );
                    self.roll_back(applied).await;
                    return Err(err.into());
                }
            }
        }
        Ok(())
    }

    async fn write(
        &self,
        identifier: &ChargeIdentifier,
        original: Option<Charge>,
        charge: Charge,
    ) -> Result<Option<AppliedWrite>, DomainError> {
        let charges = self.repos.charges();

        match (original, charge.has_periods()) {
            (None, true) => {
                let added = retry_with_backoff(
                    self.retry.clone(),
                    || charges.add(charge.clone()),
                    DomainError::is_transient,
                    "add_charge",
                )
                .await?;
                debug!(charge_id = %identifier, "Charge created");
                Ok(Some(AppliedWrite::Added(added)))
            }
            (Some(previous), true) => {
                let current = retry_with_backoff(
                    self.retry.clone(),
                    || charges.update(charge.clone()),
                    DomainError::is_transient,
                    "update_charge",
                )
                .await?;
                debug!(charge_id = %identifier, "Charge updated");
                Ok(Some(AppliedWrite::Updated { previous, current }))
            }
            (Some(previous), false) => {
                retry_with_backoff(
                    self.retry.clone(),
                    || charges.remove(&charge),
                    DomainError::is_transient,
                    "remove_charge",
                )
                .await?;
                debug!(charge_id = %identifier, "Charge removed");
                Ok(Some(AppliedWrite::Removed(previous)))
            }
            // created and stopped away within the same bundle
            (None, false) => Ok(None),
        }
    }

    /// Undo `applied` in reverse order. Failures are logged; the caller
    /// reports the write error that triggered the rollback.
    async fn roll_back(&self, applied: Vec<AppliedWrite>) {
        let charges = self.repos.charges();

        for write in applied.into_iter().rev() {
            let (identifier, result) = match write {
                AppliedWrite::Added(added) => {
                    let result = retry_with_backoff(
                        self.retry.clone(),
                        || charges.remove(&added),
                        DomainError::is_transient,
                        "undo_add_charge",
                    )
                    .await;
                    (added.identifier().clone(), result)
                }
                AppliedWrite::Updated { previous, current } => {
                    let restore = previous.with_version(current.version());
                    let result = retry_with_backoff(
                        self.retry.clone(),
                        || charges.update(restore.clone()),
                        DomainError::is_transient,
                        "undo_update_charge",
                    )
                    .await
                    .map(|_| ());
                    (current.identifier().clone(), result)
                }
                AppliedWrite::Removed(previous) => {
                    let result = retry_with_backoff(
                        self.retry.clone(),
                        || charges.add(previous.clone()),
                        DomainError::is_transient,
                        "undo_remove_charge",
                    )
                    .await
                    .map(|_| ());
                    (previous.identifier().clone(), result)
                }
            };

            match result {
                Ok(()) => debug!(charge_id = %identifier, "Charge write undone"),
                Err(err) => error!(
                    charge_id = %identifier,
                    error = %err,
                    "Failed to undo charge write"
                ),
            }
        }
    }

    async fn publish(&self, outcome: &BundleOutcome) -> Result<(), AppError> {
        if !outcome.accepted.is_empty() {
            self.publisher
                .publish_accepted(&outcome.document, &outcome.accepted)
                .await?;
        }
        if !outcome.rejected.is_empty() {
            self.publisher
                .publish_rejected(&outcome.document, &outcome.rejected)
                .await?;
        }
        Ok(())
    }
}

/// Apply `operation` to the working copy of its charge.
fn apply(entry: &mut WorkingCharge, operation: &ChargeOperation) -> Result<(), TimelineError> {
    match (operation.operation_type, entry.charge.as_mut()) {
        (OperationType::Create, Some(charge)) => {
            charge.restart(operation.resolution, operation.to_period())
        }
        (OperationType::Create, None) => {
            let charge = Charge::create(
                operation.charge_identifier(),
                operation.resolution,
                operation.to_period(),
            )?;
            entry.charge = Some(charge);
            Ok(())
        }
        (OperationType::Update, Some(charge)) => charge.update(operation.to_period()),
        (OperationType::Stop, Some(charge)) => charge.stop(operation.stop_date()),
        (OperationType::CancelStop, Some(charge)) => charge.cancel_stop(operation.to_period()),
        (_, None) => Err(TimelineError::NoPeriods),
    }
}

// ── Tests ──────────────────────────────────────────────────────
