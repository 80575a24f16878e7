//! Bounded-concurrency translation queue.
//!
//! Every task moves through `Pending -> Active -> Succeeded`, or through
//! `Active -> Retrying -> Pending` until its retries are used up and it ends
//! `Failed`. The caller awaits a per-task oneshot channel; the queue itself
//! is driven by `pump`, which starts pending tasks while fewer than
//! `concurrency` are active.

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use futures::future::join_all;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::provider::{TranslateOptions, TranslationError, TranslationProvider, TranslationResult};
use crate::config::TranslationConfig;

pub type TaskResult = Result<TranslationResult, TranslationError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueOptions {
    pub concurrency: usize,
    pub retry_times: usize,
    pub retry_delay: Duration,
    pub batch_delay: Duration,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self::from_config(&TranslationConfig::default())
    }
}

impl QueueOptions {
    pub fn from_config(config: &TranslationConfig) -> Self {
        Self {
            concurrency: config.concurrency.max(1),
            retry_times: config.retry_times,
            retry_delay: Duration::from_millis(config.retry_delay),
            batch_delay: Duration::from_millis(config.batch_delay),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Active,
    Retrying,
    Succeeded,
    Failed,
}

struct TranslationTask {
    id: u64,
    text: String,
    options: TranslateOptions,
    retries: usize,
    state: TaskState,
    reply: oneshot::Sender<TaskResult>,
}

impl TranslationTask {
    fn transition(&mut self, state: TaskState) {
        debug!(task = self.id, from = ?self.state, to = ?state, retries = self.retries, "task state");
        self.state = state;
    }
}

#[derive(Default)]
struct QueueState {
    pending: VecDeque<TranslationTask>,
    active: usize,
    peak_active: usize,
}

struct Inner {
    provider: Arc<dyn TranslationProvider>,
    options: QueueOptions,
    state: Mutex<QueueState>,
    next_id: AtomicU64,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn enqueue(&self, mut task: TranslationTask) {
        task.transition(TaskState::Pending);
        self.lock().pending.push_back(task);
    }
}

/// Runs translation tasks against one provider with at most
/// `concurrency` requests in flight.
///
/// Must be used from within a tokio runtime.
#[derive(Clone)]
pub struct TranslationQueue {
    inner: Arc<Inner>,
}

impl TranslationQueue {
    pub fn new(provider: Arc<dyn TranslationProvider>, options: QueueOptions) -> Self {
        Self {
            inner: Arc::new(Inner {
                provider,
                options,
                state: Mutex::new(QueueState::default()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn provider(&self) -> &Arc<dyn TranslationProvider> {
        &self.inner.provider
    }

    pub fn options(&self) -> &QueueOptions {
        &self.inner.options
    }

    /// Queue one text and wait for its final result.
    pub async fn add_task(&self, text: &str, options: &TranslateOptions) -> TaskResult {
        let (reply, rx) = oneshot::channel();
        let task = TranslationTask {
            id: self.inner.next_id.fetch_add(1, Ordering::Relaxed),
            text: text.to_string(),
            options: options.clone(),
            retries: 0,
            state: TaskState::Pending,
            reply,
        };
        self.inner.enqueue(task);
        pump(&self.inner);

        rx.await.unwrap_or(Err(TranslationError::Canceled))
    }

    /// Translate `texts`, preferring the provider's batch call.
    ///
    /// If the batch call fails every text is queued as its own task. The
    /// result at index `i` always belongs to `texts[i]`.
    pub async fn add_batch_tasks(
        &self,
        texts: &[String],
        options: &TranslateOptions,
    ) -> Vec<TaskResult> {
        if texts.is_empty() {
            return Vec::new();
        }

        match self.inner.provider.batch_translate(texts, options).await {
            Ok(results) if results.len() == texts.len() => {
                return results.into_iter().map(Ok).collect();
            }
            Ok(results) => warn!(
                expected = texts.len(),
                got = results.len(),
                "batch translation returned a different number of results, falling back to single tasks"
            ),
            Err(e) => warn!(error = %e, "batch translation failed, falling back to single tasks"),
        }

        join_all(texts.iter().map(|text| self.add_task(text, options))).await
    }

    pub fn pending_len(&self) -> usize {
        self.inner.lock().pending.len()
    }

    pub fn active_len(&self) -> usize {
        self.inner.lock().active
    }

    /// Highest number of tasks that were active at the same time.
    pub fn peak_active(&self) -> usize {
        self.inner.lock().peak_active
    }
}

/// Start pending tasks until the concurrency limit is reached.
fn pump(inner: &Arc<Inner>) {
    loop {
        let mut task = {
            let mut state = inner.lock();
            if state.active >= inner.options.concurrency {
                return;
            }
            let Some(task) = state.pending.pop_front() else {
                return;
            };
            state.active += 1;
            state.peak_active = state.peak_active.max(state.active);
            task
        };
        task.transition(TaskState::Active);

        let inner = Arc::clone(inner);
        tokio::spawn(run(inner, task));
    }
}

async fn run(inner: Arc<Inner>, mut task: TranslationTask) {
    let outcome = inner.provider.translate(&task.text, &task.options).await;
    inner.lock().active -= 1;

    match outcome {
        Ok(result) => {
            task.transition(TaskState::Succeeded);
            let _ = task.reply.send(Ok(result));
        }
        Err(e) if task.retries < inner.options.retry_times => {
            task.retries += 1;
            debug!(task = task.id, error = %e, attempt = task.retries, "translation failed, retrying");
            task.transition(TaskState::Retrying);

            let retry_inner = Arc::clone(&inner);
            let delay = inner.options.retry_delay;
            tokio::spawn(async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                retry_inner.enqueue(task);
                pump(&retry_inner);
            });
        }
        Err(e) => {
            warn!(task = task.id, text = %task.text, error = %e, "translation failed");
            task.transition(TaskState::Failed);
            let _ = task.reply.send(Err(e));
        }
    }

    let delay = inner.options.batch_delay;
    if !delay.is_zero() && !inner.lock().pending.is_empty() {
        tokio::time::sleep(delay).await;
    }
    pump(&inner);
}
