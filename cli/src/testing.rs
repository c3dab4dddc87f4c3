//! Scripted backend for controller tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use symptom_core::{
    CheckerError, CheckerResult, HistoryResponse, SymptomAnalysis, SymptomBackend,
};
use tokio::sync::oneshot;

/// A reply handed out for one backend call
pub enum Reply<T> {
    Ready(CheckerResult<T>),
    /// Resolves when the test sends on the paired sender
    Gated(oneshot::Receiver<CheckerResult<T>>),
}

impl<T> Reply<T> {
    async fn resolve(self) -> CheckerResult<T> {
        match self {
            Reply::Ready(result) => result,
            Reply::Gated(receiver) => receiver
                .await
                .unwrap_or_else(|_| Err(CheckerError::Transport("reply dropped".to_string()))),
        }
    }
}

#[derive(Default)]
pub struct ScriptedBackend {
    submitted: Mutex<Vec<String>>,
    history_calls: AtomicUsize,
    check_replies: Mutex<VecDeque<Reply<SymptomAnalysis>>>,
    history_replies: Mutex<VecDeque<Reply<HistoryResponse>>>,
}

impl std::fmt::Debug for ScriptedBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedBackend")
            .field("submitted", &self.submitted())
            .field("history_calls", &self.history_calls())
            .finish()
    }
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_check(&self, result: CheckerResult<SymptomAnalysis>) {
        self.check_replies
            .lock()
            .unwrap()
            .push_back(Reply::Ready(result));
    }

    pub fn gate_check(&self) -> oneshot::Sender<CheckerResult<SymptomAnalysis>> {
        let (sender, receiver) = oneshot::channel();
        self.check_replies
            .lock()
            .unwrap()
            .push_back(Reply::Gated(receiver));
        sender
    }

    pub fn push_history(&self, result: CheckerResult<HistoryResponse>) {
        self.history_replies
            .lock()
            .unwrap()
            .push_back(Reply::Ready(result));
    }

    pub fn gate_history(&self) -> oneshot::Sender<CheckerResult<HistoryResponse>> {
        let (sender, receiver) = oneshot::channel();
        self.history_replies
            .lock()
            .unwrap()
            .push_back(Reply::Gated(receiver));
        sender
    }

    /// Symptom texts received, in call order
    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SymptomBackend for ScriptedBackend {
    async fn check_symptoms(&self, symptoms: &str) -> CheckerResult<SymptomAnalysis> {
        self.submitted.lock().unwrap().push(symptoms.to_string());
        let reply = self.check_replies.lock().unwrap().pop_front();
        match reply {
            Some(reply) => reply.resolve().await,
            None => Err(CheckerError::Transport("no scripted reply".to_string())),
        }
    }

    async fn fetch_history(&self) -> CheckerResult<HistoryResponse> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.history_replies.lock().unwrap().pop_front();
        match reply {
            Some(reply) => reply.resolve().await,
            None => Err(CheckerError::Transport("no scripted reply".to_string())),
        }
    }
}

pub fn analysis(conditions: &[&str]) -> SymptomAnalysis {
    SymptomAnalysis {
        possible_conditions: conditions.iter().map(|c| c.to_string()).collect(),
        red_flags: vec!["High fever above 39.5C".to_string()],
        recommended_next_steps: vec!["Rest and fluids".to_string()],
        reasoning: None,
        disclaimer: None,
    }
}

pub fn history(records: Vec<Value>) -> HistoryResponse {
    HistoryResponse {
        history: Some(records),
    }
}

/// Lets spawned tasks run until `done` holds
pub async fn settle(done: impl Fn() -> bool) {
    for _ in 0..1000 {
        if done() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
