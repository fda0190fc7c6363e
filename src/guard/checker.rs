//! Deadline-bounded check of one predicted/reference pair
//!
//! Every call returns a `CheckOutcome`. Engine faults, timeouts, unknown
//! methods, invalid deadlines and worker panics are all converted into a
//! verdict here and never escape.
//!
//! A timed-out worker cannot be killed. The check raises its `CancelFlag`
//! and interrupts the engine; the worker then stops at its next poll.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::cancel::CancelFlag;
use crate::compare::EquivalenceDecider;
use crate::config::{deadline_from_secs, CheckConfig};
use crate::executor::{CheckError, MatchPolicy, QueryEngine, Sandbox, SandboxOutcome};
use crate::observability::{log_event_with_fields, Event, Timer};

use super::deadline::{run_with_deadline, DeadlineError};
use super::verdict::CheckOutcome;

/// Grades query pairs with the settings of one `CheckConfig`
#[derive(Debug, Clone, Default)]
pub struct Checker {
    config: CheckConfig,
}

impl Checker {
    pub fn new(config: CheckConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Checks a pair with the configured method and deadline
    pub fn check<E>(&self, engine: Arc<E>, predicted: &str, reference: &str) -> CheckOutcome
    where
        E: QueryEngine + ?Sized + 'static,
    {
        self.check_with(
            engine,
            predicted,
            reference,
            self.config.deadline_secs,
            &self.config.method,
        )
    }

    /// Checks a pair with an explicit deadline and method
    pub fn check_with<E>(
        &self,
        engine: Arc<E>,
        predicted: &str,
        reference: &str,
        deadline_secs: f64,
        method: &str,
    ) -> CheckOutcome
    where
        E: QueryEngine + ?Sized + 'static,
    {
        let check_id = Uuid::new_v4().to_string();
        let timer = Timer::new();

        let policy = match method.parse::<MatchPolicy>() {
            Ok(policy) => policy,
            Err(err) => {
                log_event_with_fields(
                    Event::CheckUnknownMethod,
                    &[
                        ("check_id", check_id.as_str()),
                        ("code", err.code()),
                        ("method", method),
                    ],
                );
                return CheckOutcome::from_error(&err);
            }
        };

        let deadline = match deadline_from_secs(deadline_secs) {
            Ok(deadline) => deadline,
            Err(message) => {
                let err = CheckError::InvalidDeadline(message);
                log_failure(&check_id, &err, &timer);
                return CheckOutcome::from_error(&err);
            }
        };

        let deadline_ms = deadline.as_millis().to_string();
        log_event_with_fields(
            Event::CheckBegin,
            &[
                ("check_id", check_id.as_str()),
                ("deadline_ms", deadline_ms.as_str()),
                ("engine", engine.name()),
                ("method", policy.as_str()),
            ],
        );

        let cancel = CancelFlag::new();
        match self.run_guarded(&engine, predicted, reference, policy, deadline, &cancel) {
            Ok(outcome) => {
                let outcome = CheckOutcome::decided(outcome.passed, outcome.rows);
                let elapsed = timer.elapsed_ms();
                let rows = outcome.rows.len().to_string();
                let status = outcome.status();
                log_event_with_fields(
                    Event::CheckComplete,
                    &[
                        ("check_id", check_id.as_str()),
                        ("elapsed_ms", elapsed.as_str()),
                        ("rows", rows.as_str()),
                        ("status", status.as_str()),
                    ],
                );
                outcome
            }
            Err(err) => {
                if err.is_timeout() {
                    cancel.cancel();
                    engine.interrupt();
                    log_event_with_fields(
                        Event::EngineInterrupted,
                        &[("check_id", check_id.as_str()), ("engine", engine.name())],
                    );
                }
                log_failure(&check_id, &err, &timer);
                CheckOutcome::from_error(&err)
            }
        }
    }

    fn run_guarded<E>(
        &self,
        engine: &Arc<E>,
        predicted: &str,
        reference: &str,
        policy: MatchPolicy,
        deadline: Duration,
        cancel: &CancelFlag,
    ) -> Result<SandboxOutcome, CheckError>
    where
        E: QueryEngine + ?Sized + 'static,
    {
        let worker_engine = Arc::clone(engine);
        let predicted = predicted.to_string();
        let reference = reference.to_string();
        let solver = self.config.solver.clone();
        let normalize = self.config.normalize_operators;
        let cancel = cancel.clone();

        let result = run_with_deadline(deadline, move || {
            let decider = EquivalenceDecider::new(solver).with_cancel(cancel.clone());
            let mut sandbox = Sandbox::new(&*worker_engine, decider)
                .with_normalized_operators(normalize)
                .with_cancel(cancel);
            sandbox.run(&predicted, &reference, policy)
        });

        match result {
            Ok(inner) => inner,
            Err(DeadlineError::Elapsed(deadline)) => Err(CheckError::Timeout(deadline)),
            Err(err @ DeadlineError::Panicked(_)) | Err(err @ DeadlineError::Spawn(_)) => {
                Err(CheckError::WorkerFailed(err.to_string()))
            }
        }
    }
}

fn log_failure(check_id: &str, err: &CheckError, timer: &Timer) {
    let event = match err {
        CheckError::Timeout(_) => Event::CheckTimeout,
        CheckError::Engine { .. } => Event::CheckEngineFault,
        CheckError::UnknownMethod(_) => Event::CheckUnknownMethod,
        CheckError::InvalidDeadline(_) => Event::CheckInvalidDeadline,
        CheckError::WorkerFailed(_) => Event::CheckWorkerFailed,
    };
    let message = err.to_string();
    let elapsed = timer.elapsed_ms();

    let mut fields = vec![
        ("check_id", check_id),
        ("code", err.code()),
        ("elapsed_ms", elapsed.as_str()),
        ("message", message.as_str()),
    ];
    if let CheckError::Engine { role, fault } = err {
        fields.push(("category", fault.category().as_str()));
        fields.push(("role", role.as_str()));
    }
    log_event_with_fields(event, &fields);
}

/// Checks one pair against `engine`.
///
/// Returns `(status, passed, rows)` as a `CheckOutcome`; see `Verdict` for the
/// status strings.
pub fn check<E>(
    predicted: &str,
    reference: &str,
    engine: Arc<E>,
    deadline_secs: f64,
    method: &str,
) -> CheckOutcome
where
    E: QueryEngine + ?Sized + 'static,
{
    Checker::default().check_with(engine, predicted, reference, deadline_secs, method)
}
