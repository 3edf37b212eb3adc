use parking_lot::Mutex;

/// Where a form is in its submit cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// The submit control is disabled while a request is in flight.
    #[error("A submission is already in progress")]
    InFlight,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{0}")]
    Request(String),
}

/// Holds an immutable form snapshot and its submit phase.
///
/// Edits replace the whole snapshot; a submission works on the snapshot
/// taken when it started.
#[derive(Debug)]
pub struct FormCell<F> {
    inner: Mutex<(F, SubmitPhase)>,
}

impl<F: Clone> FormCell<F> {
    pub fn new(form: F) -> Self {
        Self {
            inner: Mutex::new((form, SubmitPhase::Idle)),
        }
    }

    pub fn snapshot(&self) -> F {
        self.inner.lock().0.clone()
    }

    pub fn phase(&self) -> SubmitPhase {
        self.inner.lock().1.clone()
    }

    pub fn can_submit(&self) -> bool {
        self.inner.lock().1 != SubmitPhase::Submitting
    }

    /// Replace the snapshot with `edit(current)`. Allowed in every phase.
    pub fn update(&self, edit: impl FnOnce(F) -> F) {
        let mut inner = self.inner.lock();
        let current = inner.0.clone();
        inner.0 = edit(current);
    }

    /// Enter `Submitting` and return the snapshot to send.
    pub fn begin(&self) -> Result<F, SubmitError> {
        let mut inner = self.inner.lock();
        if inner.1 == SubmitPhase::Submitting {
            return Err(SubmitError::InFlight);
        }
        inner.1 = SubmitPhase::Submitting;
        Ok(inner.0.clone())
    }

    pub fn finish(&self, phase: SubmitPhase) {
        self.inner.lock().1 = phase;
    }
}
