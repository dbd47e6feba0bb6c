//! Execution coordinator for bulk runs.
//!
//! Each unit is an independent trial: generate (or copy) its value, then
//! write it. Units run with bounded concurrency and complete in any order;
//! results are slotted back by submission position so the returned vector
//! always matches the plan's order and length.
//!
//! An unreachable backend aborts the batch: units that have not yet been
//! submitted are recorded with a connectivity error instead of running.
//! Cancelling the session token drops every in-flight unit and returns
//! [`PipelineError::Cancelled`] without producing results.

use futures::StreamExt;
use glossa_core::bulk_result::{BulkResult, BulkResultSummary, LOST_UNIT_ERROR};
use glossa_core::work_set::{WorkPlan, WorkUnit};
use tokio_util::sync::CancellationToken;

use crate::collaborators::{GenerationBackend, TranslationStore};
use crate::error::{BackendError, PipelineError};

/// Default number of units in flight at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Upper bound for the configured fan-out.
pub const MAX_CONCURRENCY_LIMIT: usize = 16;

/// Error recorded when the store accepted the call but not the value.
const WRITE_REJECTED_ERROR: &str = "Translation store rejected the value";

/// Result of one unit plus whether it should abort the batch.
struct UnitOutcome {
    result: BulkResult,
    fatal: bool,
}

impl UnitOutcome {
    fn ok(result: BulkResult) -> Self {
        Self {
            result,
            fatal: false,
        }
    }

    fn from_error(unit: &WorkUnit, err: BackendError, flagged: bool) -> Self {
        Self {
            fatal: err.is_unreachable(),
            result: BulkResult::failed(
                unit.key_name.clone(),
                Some(unit.locale_code.clone()),
                err.to_string(),
                flagged,
            ),
        }
    }
}

/// Runs work plans against a store and a generation backend.
#[derive(Debug, Clone, Copy)]
pub struct BulkCoordinator {
    max_concurrency: usize,
}

impl Default for BulkCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENCY)
    }
}

impl BulkCoordinator {
    /// Fan-out is clamped to `1..=MAX_CONCURRENCY_LIMIT`.
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            max_concurrency: max_concurrency.clamp(1, MAX_CONCURRENCY_LIMIT),
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Run every unit of `plan` and return one result per unit, in plan
    /// order.
    pub async fn execute(
        &self,
        plan: &WorkPlan,
        store: &dyn TranslationStore,
        backend: &dyn GenerationBackend,
        cancel: &CancellationToken,
    ) -> Result<Vec<BulkResult>, PipelineError> {
        let total = plan.len();
        let abort = CancellationToken::new();
        let mut slots: Vec<Option<BulkResult>> = vec![None; total];

        tracing::info!(
            action = %plan.action,
            source = %plan.source.code,
            total,
            max_concurrency = self.max_concurrency,
            "Bulk run started"
        );

        // Futures are created up front and only start when first polled.
        let abort_ref = &abort;
        let pending: Vec<_> = plan
            .units
            .iter()
            .enumerate()
            .map(|(position, unit)| async move {
                (position, run_unit(plan, unit, store, backend, abort_ref).await)
            })
            .collect();
        let units = futures::stream::iter(pending).buffer_unordered(self.max_concurrency);
        let mut units = std::pin::pin!(units);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::info!(total, "Bulk run cancelled; in-flight units discarded");
                    return Err(PipelineError::Cancelled);
                }
                next = units.next() => {
                    let Some((position, outcome)) = next else { break };
                    if !outcome.result.success {
                        tracing::warn!(
                            key = %outcome.result.key_name,
                            locale = outcome.result.locale_code.as_deref().unwrap_or("-"),
                            error = outcome.result.error.as_deref().unwrap_or(""),
                            "Bulk unit failed"
                        );
                    }
                    if outcome.fatal && !abort.is_cancelled() {
                        tracing::error!(
                            position,
                            total,
                            "Backend unreachable; aborting unsubmitted units"
                        );
                        abort.cancel();
                    }
                    slots[position] = Some(outcome.result);
                }
            }
        }

        let results: Vec<BulkResult> = slots
            .into_iter()
            .zip(&plan.units)
            .map(|(slot, unit)| {
                slot.unwrap_or_else(|| {
                    BulkResult::failed(
                        unit.key_name.clone(),
                        Some(unit.locale_code.clone()),
                        LOST_UNIT_ERROR,
                        false,
                    )
                })
            })
            .collect();

        let summary = BulkResultSummary::from_results(&results);
        tracing::info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            requires_review = summary.requires_review,
            all_succeeded = summary.all_succeeded(),
            "Bulk run finished"
        );

        Ok(results)
    }
}

/// Produce and persist one unit's value.
async fn run_unit(
    plan: &WorkPlan,
    unit: &WorkUnit,
    store: &dyn TranslationStore,
    backend: &dyn GenerationBackend,
    abort: &CancellationToken,
) -> UnitOutcome {
    if abort.is_cancelled() {
        return UnitOutcome::ok(BulkResult::not_submitted(
            unit.key_name.clone(),
            Some(unit.locale_code.clone()),
        ));
    }

    let produced = if plan.action.generates() {
        backend
            .generate(unit, &plan.source, &plan.instructions)
            .await
            .map(|g| (g.value, g.requires_review))
    } else {
        backend
            .copy_value(unit, &plan.source)
            .await
            .map(|c| (c.value, false))
    };
    let (value, flagged) = match produced {
        Ok(produced) => produced,
        Err(err) => return UnitOutcome::from_error(unit, err, false),
    };

    let locale_code = Some(unit.locale_code.clone());
    match store
        .write_translation(unit.key_id, unit.locale_id, &value, flagged)
        .await
    {
        Ok(outcome) if outcome.success => UnitOutcome::ok(BulkResult::succeeded(
            unit.key_name.clone(),
            locale_code,
            flagged || outcome.requires_review,
        )),
        Ok(outcome) => UnitOutcome::ok(BulkResult::failed(
            unit.key_name.clone(),
            locale_code,
            WRITE_REJECTED_ERROR,
            flagged || outcome.requires_review,
        )),
        Err(err) => UnitOutcome::from_error(unit, err, flagged),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use glossa_core::bulk_action::BulkActionType;
    use glossa_core::bulk_result::CONNECTIVITY_ERROR;
    use glossa_core::locale::{Locale, TranslationKey};
    use glossa_core::types::DbId;
    use tokio::sync::Notify;

    use super::*;
    use crate::collaborators::{CopiedValue, Generated};
    use crate::memory::MemoryCatalog;

    #[derive(Clone)]
    enum Behavior {
        Ok { review: bool },
        Delayed(Duration),
        Content(&'static str),
        Unreachable,
        UnreachableAfter(Duration),
        Blocked(Arc<Notify>),
    }

    /// Backend whose per-key behaviour is scripted by the test.
    #[derive(Default)]
    struct ScriptedBackend {
        script: HashMap<DbId, Behavior>,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl ScriptedBackend {
        fn with(script: Vec<(DbId, Behavior)>) -> Self {
            Self {
                script: script.into_iter().collect(),
                ..Self::default()
            }
        }

        async fn produce(&self, unit: &WorkUnit) -> Result<Generated, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let behavior = self
                .script
                .get(&unit.key_id)
                .cloned()
                .unwrap_or(Behavior::Ok { review: false });
            let outcome = match behavior {
                Behavior::Ok { review } => Ok(review),
                Behavior::Delayed(d) => {
                    tokio::time::sleep(d).await;
                    Ok(false)
                }
                Behavior::Content(msg) => Err(BackendError::Content(msg.to_string())),
                Behavior::Unreachable => {
                    Err(BackendError::Unreachable("connection refused".into()))
                }
                Behavior::UnreachableAfter(d) => {
                    tokio::time::sleep(d).await;
                    Err(BackendError::Unreachable("connection reset".into()))
                }
                Behavior::Blocked(notify) => {
                    notify.notified().await;
                    Ok(false)
                }
            };

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            outcome.map(|requires_review| Generated {
                value: format!("{}@{}", unit.key_name, unit.locale_code),
                requires_review,
            })
        }
    }

    #[async_trait]
    impl GenerationBackend for ScriptedBackend {
        async fn generate(
            &self,
            unit: &WorkUnit,
            _source: &Locale,
            _instructions: &str,
        ) -> Result<Generated, BackendError> {
            self.produce(unit).await
        }

        async fn copy_value(
            &self,
            unit: &WorkUnit,
            _source: &Locale,
        ) -> Result<CopiedValue, BackendError> {
            self.produce(unit).await.map(|g| CopiedValue { value: g.value })
        }
    }

    fn locale(id: DbId, code: &str) -> Locale {
        Locale {
            id,
            code: code.into(),
            name: code.into(),
            native_name: code.into(),
            is_default: false,
            app_locale_id: id,
            added_at: chrono::Utc::now(),
        }
    }

    /// A plan of `keys` x `targets`, with every key registered in `store`.
    fn plan(
        action: BulkActionType,
        keys: &[DbId],
        targets: &[(DbId, &str)],
        store: &MemoryCatalog,
    ) -> WorkPlan {
        let mut units = Vec::new();
        for key_id in keys {
            store.add_key(
                1,
                TranslationKey {
                    id: *key_id,
                    name: format!("key{key_id}"),
                },
            );
            for (locale_id, code) in targets {
                units.push(WorkUnit {
                    index: units.len(),
                    key_id: *key_id,
                    key_name: format!("key{key_id}"),
                    locale_id: *locale_id,
                    locale_code: code.to_string(),
                });
            }
        }
        WorkPlan {
            action,
            source: locale(1, "en"),
            instructions: String::new(),
            units,
        }
    }

    // -- scenarios --

    #[tokio::test]
    async fn translate_all_one_key_two_locales_succeeds() {
        let store = MemoryCatalog::new();
        let plan = plan(BulkActionType::TranslateAll, &[10], &[(2, "de"), (3, "fr")], &store);
        let backend = ScriptedBackend::default();

        let results = BulkCoordinator::default()
            .execute(&plan, &store, &backend, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.success));
        assert_eq!(results[0].locale_code.as_deref(), Some("de"));
        assert_eq!(results[1].locale_code.as_deref(), Some("fr"));
        assert_eq!(store.stored(10, 3).unwrap().value, "key10@fr");
    }

    #[tokio::test]
    async fn results_keep_submission_order_when_completion_order_differs() {
        let store = MemoryCatalog::new();
        let plan = plan(BulkActionType::TranslateAll, &[1, 2, 3], &[(2, "de")], &store);
        let backend = ScriptedBackend::with(vec![
            (1, Behavior::Delayed(Duration::from_millis(60))),
            (2, Behavior::Content("model refused")),
        ]);

        let results = BulkCoordinator::new(3)
            .execute(&plan, &store, &backend, &CancellationToken::new())
            .await
            .unwrap();

        let shape: Vec<_> = results.iter().map(|r| (r.key_name.as_str(), r.success)).collect();
        assert_eq!(shape, vec![("key1", true), ("key2", false), ("key3", true)]);
        assert_eq!(results[1].error.as_deref(), Some("model refused"));
    }

    #[tokio::test]
    async fn unreachable_backend_marks_unsubmitted_units() {
        let store = MemoryCatalog::new();
        let plan = plan(BulkActionType::FillMissing, &[1, 2, 3, 4], &[(2, "de")], &store);
        let backend = ScriptedBackend::with(vec![(2, Behavior::Unreachable)]);

        let results = BulkCoordinator::new(1)
            .execute(&plan, &store, &backend, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(results.len(), 4);
        assert!(results[0].success);
        assert!(!results[1].success);
        assert!(results[1].error.as_deref().unwrap().contains("unreachable"));
        for r in &results[2..] {
            assert!(!r.success);
            assert_eq!(r.error.as_deref(), Some(CONNECTIVITY_ERROR));
        }
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn abort_keeps_outcomes_of_units_already_in_flight() {
        let store = MemoryCatalog::new();
        let keys: Vec<DbId> = (1..=6).collect();
        let plan = plan(BulkActionType::TranslateAll, &keys, &[(2, "de")], &store);
        let backend = ScriptedBackend::with(vec![
            (1, Behavior::Delayed(Duration::from_millis(80))),
            (2, Behavior::Delayed(Duration::from_millis(80))),
            (3, Behavior::UnreachableAfter(Duration::from_millis(10))),
        ]);

        let results = BulkCoordinator::new(3)
            .execute(&plan, &store, &backend, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(results.len(), plan.len());
        assert!(results[0].success && results[1].success);
        assert!(store.stored(1, 2).is_some());
        assert!(store.stored(2, 2).is_some());
        assert!(!results[2].success);
        assert!(results[2].error.as_deref().unwrap().contains("unreachable"));
        for r in &results[3..] {
            assert_eq!(r.error.as_deref(), Some(CONNECTIVITY_ERROR));
        }
        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn review_flag_is_independent_of_success() {
        let store = MemoryCatalog::new();
        let plan = plan(BulkActionType::TranslateAll, &[1, 2], &[(2, "de")], &store);
        let backend = ScriptedBackend::with(vec![(1, Behavior::Ok { review: true })]);

        let results = BulkCoordinator::default()
            .execute(&plan, &store, &backend, &CancellationToken::new())
            .await
            .unwrap();

        assert!(results[0].success && results[0].requires_review);
        assert!(results[1].success && !results[1].requires_review);
        assert!(store.stored(1, 2).unwrap().pending_review);
    }

    #[tokio::test]
    async fn store_failure_keeps_generator_review_flag() {
        let store = MemoryCatalog::new();
        let mut plan = plan(BulkActionType::TranslateAll, &[1], &[(2, "de")], &store);
        // Key unknown to the store: generation succeeds, write fails.
        plan.units[0].key_id = 77;
        let backend = ScriptedBackend::with(vec![(77, Behavior::Ok { review: true })]);

        let results = BulkCoordinator::default()
            .execute(&plan, &store, &backend, &CancellationToken::new())
            .await
            .unwrap();

        assert!(!results[0].success);
        assert!(results[0].requires_review);
    }

    #[tokio::test]
    async fn copy_locale_never_flags_review_by_itself() {
        let store = MemoryCatalog::new();
        let plan = plan(BulkActionType::CopyLocale, &[5], &[(3, "fr")], &store);
        let backend = ScriptedBackend::with(vec![(5, Behavior::Ok { review: true })]);

        let results = BulkCoordinator::default()
            .execute(&plan, &store, &backend, &CancellationToken::new())
            .await
            .unwrap();

        assert!(results[0].success);
        assert!(!results[0].requires_review);
    }

    #[tokio::test]
    async fn fan_out_is_bounded() {
        let store = MemoryCatalog::new();
        let keys: Vec<DbId> = (1..=12).collect();
        let plan = plan(BulkActionType::TranslateAll, &keys, &[(2, "de")], &store);
        let backend = ScriptedBackend::with(
            keys.iter()
                .map(|k| (*k, Behavior::Delayed(Duration::from_millis(10))))
                .collect(),
        );

        let results = BulkCoordinator::new(3)
            .execute(&plan, &store, &backend, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(results.len(), 12);
        assert!(backend.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn empty_plan_completes_with_no_results() {
        let store = MemoryCatalog::new();
        let plan = plan(BulkActionType::FillMissing, &[], &[(2, "de")], &store);
        let backend = ScriptedBackend::default();

        let results = BulkCoordinator::default()
            .execute(&plan, &store, &backend, &CancellationToken::new())
            .await
            .unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn cancellation_discards_in_flight_units() {
        let store = Arc::new(MemoryCatalog::new());
        let gate = Arc::new(Notify::new());
        let plan = plan(BulkActionType::TranslateAll, &[1, 2], &[(2, "de")], &store);
        let backend = Arc::new(ScriptedBackend::with(vec![
            (1, Behavior::Blocked(Arc::clone(&gate))),
            (2, Behavior::Blocked(Arc::clone(&gate))),
        ]));
        let cancel = CancellationToken::new();

        let run = {
            let (store, backend, cancel) =
                (Arc::clone(&store), Arc::clone(&backend), cancel.clone());
            tokio::spawn(async move {
                BulkCoordinator::default()
                    .execute(&plan, store.as_ref(), backend.as_ref(), &cancel)
                    .await
            })
        };
        while backend.in_flight.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }

        cancel.cancel();
        gate.notify_waiters();

        assert!(matches!(run.await.unwrap(), Err(PipelineError::Cancelled)));
        assert!(store.stored(1, 2).is_none());
        assert!(store.stored(2, 2).is_none());
    }

    #[test]
    fn concurrency_is_clamped() {
        assert_eq!(BulkCoordinator::new(0).max_concurrency(), 1);
        assert_eq!(BulkCoordinator::new(500).max_concurrency(), MAX_CONCURRENCY_LIMIT);
    }
}
