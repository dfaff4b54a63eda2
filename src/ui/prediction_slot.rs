use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    sync::mpsc::{channel, Receiver, Sender},
    thread,
};

use chrono::{DateTime, Local};

use crate::{model::prediction::PredictionResult, service::predictapi::client::PredictionError};

pub type PredictionOutcome = Result<PredictionResult, PredictionError>;

#[derive(Debug)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

/// Holds the result shown to the user.
///
/// Every submission runs on its own thread and reports through a shared channel, so
/// overlapping submissions are applied in the order they resolve and the last one wins.
pub struct PredictionSlot {
    state: SubmissionState,
    last_result: Option<(PredictionResult, DateTime<Local>)>,
    in_flight: usize,
    // `None` is sent when a job panicked before producing an outcome
    sender: Sender<Option<PredictionOutcome>>,
    receiver: Receiver<Option<PredictionOutcome>>,
}

impl PredictionSlot {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            state: SubmissionState::Idle,
            last_result: None,
            in_flight: 0,
            sender,
            receiver,
        }
    }

    pub fn submit<F>(&mut self, job: F)
    where
        F: FnOnce() -> PredictionOutcome + Send + 'static,
    {
        let tx = self.sender.clone();
        thread::spawn(move || {
            let outcome = catch_unwind(AssertUnwindSafe(job)).ok();
            let _ = tx.send(outcome);
        });

        self.in_flight += 1;
        self.state = SubmissionState::Submitting;
    }

    pub fn try_update(&mut self) {
        while let Ok(outcome) = self.receiver.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.state = match outcome {
                Some(Ok(result)) => {
                    self.last_result = Some((result, Local::now()));
                    SubmissionState::Succeeded
                }
                Some(Err(err @ PredictionError::InvalidResponse(..))) => {
                    SubmissionState::Failed(format!("service rejected the draft: {}", err))
                }
                Some(Err(err)) if err.is_decode() => {
                    SubmissionState::Failed(format!("unexpected answer from the service: {}", err))
                }
                Some(Err(err)) => SubmissionState::Failed(format!("service unreachable: {}", err)),
                None => {
                    tracing::warn!("Prediction worker stopped without an outcome");
                    SubmissionState::Failed("submission stopped unexpectedly".to_string())
                }
            };
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn last_result(&self) -> Option<&(PredictionResult, DateTime<Local>)> {
        self.last_result.as_ref()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

impl Default for PredictionSlot {
    fn default() -> Self {
        Self::new()
    }
}
