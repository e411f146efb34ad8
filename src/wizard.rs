// File: ./src/wizard.rs
//! Step wizard controller.
//!
//! Drives a linear sequence of steps. Moving forward is gated by an
//! injected async validator; moving back is always allowed; jumping is
//! allowed to earlier steps or to steps already passed. The wizard knows
//! nothing about fields, it only hands the current index to the validator.
//!
//! All methods take `&self` so the host can share one wizard between the
//! event handler that clicks "next" and the one that renders the progress
//! bar. Only one validation runs at a time: a second `advance()` issued while
//! one is pending returns [`AdvanceOutcome::Busy`] without calling the
//! validator. If the user navigates while a validation is pending, its
//! result is discarded ([`AdvanceOutcome::Stale`]).
use anyhow::Result;
use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Async predicate deciding whether the given step may be left going forward.
///
/// An `Err` counts as "not valid". The validator is expected to surface
/// field-level messages itself; the wizard only reacts by not moving.
pub trait StepValidator: Send + Sync {
    fn validate(&self, step: usize) -> impl Future<Output = Result<bool>> + Send;
}

impl<F, Fut> StepValidator for F
where
    F: Fn(usize) -> Fut + Send + Sync,
    Fut: Future<Output = Result<bool>> + Send,
{
    fn validate(&self, step: usize) -> impl Future<Output = Result<bool>> + Send {
        self(step)
    }
}

/// Navigation state as seen by a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    pub current_step: usize,
    pub completed_steps: HashSet<usize>,
    pub step_count: usize,
    /// Set once the last step validated and completion was signalled.
    pub finished: bool,
}

impl WizardState {
    fn new(step_count: usize) -> Self {
        Self {
            current_step: 0,
            completed_steps: HashSet::new(),
            step_count,
            finished: false,
        }
    }

    pub fn is_first_step(&self) -> bool {
        self.current_step == 0
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step + 1 == self.step_count
    }

    /// A step indicator is clickable when it lies behind the current step or
    /// was already passed.
    pub fn can_jump_to(&self, index: usize) -> bool {
        index < self.step_count
            && (index < self.current_step || self.completed_steps.contains(&index))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Validation passed and the wizard moved one step forward.
    Advanced { from: usize, to: usize },
    /// Validation passed on the last step. Signalled once per wizard.
    Completed,
    /// The validator said no (or failed). Nothing changed.
    Rejected { step: usize },
    /// Another advance is still waiting on its validator.
    Busy,
    /// The user navigated while validation was pending; result dropped.
    Stale,
    /// Advance on the last step after completion was already signalled.
    Ignored,
}

impl AdvanceOutcome {
    pub fn moved(self) -> bool {
        matches!(self, AdvanceOutcome::Advanced { .. })
    }
}

/// What the "previous" control does at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviousAction {
    /// On the first step the control leaves the wizard; the host decides
    /// where to go.
    Exit,
    Retreat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    Exit,
    Retreated { to: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Current,
    Completed,
    Locked,
}

struct Inner {
    state: WizardState,
    // Bumped on every index change so a pending validation can tell whether
    // the step it validated is still the current one.
    generation: u64,
}

/// Clears the in-flight flag when the advance future finishes or is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct FormWizard<V> {
    inner: Mutex<Inner>,
    in_flight: AtomicBool,
    validator: V,
}

impl<V: StepValidator> FormWizard<V> {
    pub fn new(step_count: usize, validator: V) -> Result<Self> {
        if step_count == 0 {
            anyhow::bail!("A wizard needs at least one step");
        }
        Ok(Self {
            inner: Mutex::new(Inner {
                state: WizardState::new(step_count),
                generation: 0,
            }),
            in_flight: AtomicBool::new(false),
            validator,
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn validator(&self) -> &V {
        &self.validator
    }

    /// Validate the current step and move forward if it passes.
    ///
    /// No timeout is applied: a validator that never resolves keeps the
    /// wizard on the same step (and `is_validating()` true) until the
    /// returned future is dropped.
    pub async fn advance(&self) -> AdvanceOutcome {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            log::debug!("advance ignored: validation already in flight");
            return AdvanceOutcome::Busy;
        };

        let (step, generation) = {
            let inner = self.lock();
            if inner.state.finished && inner.state.is_last_step() {
                return AdvanceOutcome::Ignored;
            }
            (inner.state.current_step, inner.generation)
        };

        let passed = match self.validator.validate(step).await {
            Ok(passed) => passed,
            Err(e) => {
                log::warn!("Validator failed on step {}: {}", step, e);
                false
            }
        };
        if !passed {
            log::debug!("Step {} did not validate", step);
            return AdvanceOutcome::Rejected { step };
        }

        let mut inner = self.lock();
        if inner.generation != generation {
            log::debug!("Dropping validation of step {}: user navigated meanwhile", step);
            return AdvanceOutcome::Stale;
        }

        inner.state.completed_steps.insert(step);
        if step + 1 < inner.state.step_count {
            inner.state.current_step = step + 1;
            inner.generation += 1;
            AdvanceOutcome::Advanced {
                from: step,
                to: step + 1,
            }
        } else {
            inner.state.finished = true;
            log::info!("Wizard completed after {} steps", inner.state.step_count);
            AdvanceOutcome::Completed
        }
    }

    /// Step back one page. No validation; a no-op on the first step.
    pub fn retreat(&self) -> bool {
        let mut inner = self.lock();
        if inner.state.current_step == 0 {
            return false;
        }
        inner.state.current_step -= 1;
        inner.generation += 1;
        true
    }

    /// Go straight to `index` if it lies behind the current step or was
    /// already completed. Anything else (including out of range) is ignored.
    pub fn jump_to(&self, index: usize) -> bool {
        let mut inner = self.lock();
        if !inner.state.can_jump_to(index) {
            return false;
        }
        if index != inner.state.current_step {
            inner.state.current_step = index;
            inner.generation += 1;
        }
        true
    }

    pub fn previous_action(&self) -> PreviousAction {
        if self.lock().state.is_first_step() {
            PreviousAction::Exit
        } else {
            PreviousAction::Retreat
        }
    }

    /// The "previous" control: retreat, or ask the host to exit on step 0.
    pub fn back(&self) -> BackOutcome {
        let mut inner = self.lock();
        if inner.state.current_step == 0 {
            return BackOutcome::Exit;
        }
        inner.state.current_step -= 1;
        inner.generation += 1;
        BackOutcome::Retreated {
            to: inner.state.current_step,
        }
    }

    pub fn current_step(&self) -> usize {
        self.lock().state.current_step
    }

    pub fn step_count(&self) -> usize {
        self.lock().state.step_count
    }

    pub fn completed_steps(&self) -> HashSet<usize> {
        self.lock().state.completed_steps.clone()
    }

    pub fn is_first_step(&self) -> bool {
        self.lock().state.is_first_step()
    }

    pub fn is_last_step(&self) -> bool {
        self.lock().state.is_last_step()
    }

    pub fn is_finished(&self) -> bool {
        self.lock().state.finished
    }

    pub fn is_validating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> WizardState {
        self.lock().state.clone()
    }

    /// Fill ratio of the progress bar, 0.0 on the first step, 1.0 on the last.
    pub fn progress(&self) -> f32 {
        let inner = self.lock();
        if inner.state.step_count <= 1 {
            return 1.0;
        }
        inner.state.current_step as f32 / (inner.state.step_count - 1) as f32
    }

    pub fn step_status(&self, index: usize) -> Option<StepStatus> {
        let inner = self.lock();
        if index >= inner.state.step_count {
            return None;
        }
        Some(if index == inner.state.current_step {
            StepStatus::Current
        } else if inner.state.completed_steps.contains(&index) {
            StepStatus::Completed
        } else {
            StepStatus::Locked
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always(result: bool) -> impl Fn(usize) -> std::future::Ready<Result<bool>> + Send + Sync {
        move |_| std::future::ready(Ok(result))
    }

    #[test]
    fn test_zero_steps_is_rejected() {
        assert!(FormWizard::new(0, always(true)).is_err());
    }

    #[test]
    fn test_initial_state() {
        let wizard = FormWizard::new(5, always(true)).unwrap();
        let state = wizard.snapshot();
        assert_eq!(state.current_step, 0);
        assert!(state.completed_steps.is_empty());
        assert_eq!(state.step_count, 5);
        assert_eq!(wizard.progress(), 0.0);
        assert_eq!(wizard.previous_action(), PreviousAction::Exit);
        assert_eq!(wizard.step_status(0), Some(StepStatus::Current));
        assert_eq!(wizard.step_status(1), Some(StepStatus::Locked));
        assert_eq!(wizard.step_status(5), None);
    }

    #[test]
    fn test_back_on_first_step_signals_exit() {
        let wizard = FormWizard::new(3, always(true)).unwrap();
        assert_eq!(wizard.back(), BackOutcome::Exit);
        assert_eq!(wizard.current_step(), 0);
    }

    #[tokio::test]
    async fn test_back_after_advance_retreats() {
        let wizard = FormWizard::new(3, always(true)).unwrap();
        wizard.advance().await;
        assert_eq!(wizard.previous_action(), PreviousAction::Retreat);
        assert_eq!(wizard.back(), BackOutcome::Retreated { to: 0 });
        assert_eq!(wizard.completed_steps(), HashSet::from([0]));
    }

    #[tokio::test]
    async fn test_validator_error_counts_as_rejection() {
        let wizard = FormWizard::new(3, |_| async {
            Err::<bool, _>(anyhow::anyhow!("form state unavailable"))
        })
        .unwrap();
        assert_eq!(wizard.advance().await, AdvanceOutcome::Rejected { step: 0 });
        assert_eq!(wizard.current_step(), 0);
        assert!(wizard.completed_steps().is_empty());
        assert!(!wizard.is_validating());
    }

    #[tokio::test]
    async fn test_single_step_wizard_completes() {
        let wizard = FormWizard::new(1, always(true)).unwrap();
        assert_eq!(wizard.progress(), 1.0);
        assert!(wizard.is_last_step());
        assert_eq!(wizard.advance().await, AdvanceOutcome::Completed);
        assert_eq!(wizard.advance().await, AdvanceOutcome::Ignored);
        assert_eq!(wizard.completed_steps(), HashSet::from([0]));
    }
}
