use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::types::VisionModel;
use super::ClassificationError;
use crate::pipeline::import::ImagePayload;

/// Mock vision model for testing: plays back scripted replies in order.
///
/// Once the script runs out the last entry repeats, so a single-entry script
/// behaves like a fixed response.
pub struct ScriptedVisionModel {
    script: Mutex<VecDeque<Result<String, ClassificationError>>>,
    last: Mutex<Option<Result<String, ClassificationError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedVisionModel {
    pub fn new(script: Vec<Result<String, ClassificationError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// Always answer with `reply`.
    pub fn replying(reply: &str) -> Self {
        Self::new(vec![Ok(reply.to_string())])
    }

    /// Always fail with `error`.
    pub fn failing(error: ClassificationError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Sleep before answering (exercises timeouts and cancellation).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `invoke` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn next_entry(&self) -> Result<String, ClassificationError> {
        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(_) => {
                return Err(ClassificationError::Transport(
                    "Scripted model state poisoned".into(),
                ))
            }
        };
        if let Some(entry) = next {
            *last = Some(entry);
        }
        last.clone().unwrap_or_else(|| {
            Err(ClassificationError::Transport("Scripted model has no replies".into()))
        })
    }
}

#[async_trait]
impl VisionModel for ScriptedVisionModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn invoke(
        &self,
        prompt: &str,
        _payload: &ImagePayload,
    ) -> Result<String, ClassificationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.next_entry()
    }
}
