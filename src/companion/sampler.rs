use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::core::detector::EmotionDetector;
use crate::core::emotion::Emotion;
use crate::core::error::DetectionError;

/// Polls a detector on a fixed period and publishes the latest label.
pub struct EmotionSampler {
    detector: Arc<dyn EmotionDetector>,
    period: Duration,
}

impl EmotionSampler {
    pub fn new(detector: Arc<dyn EmotionDetector>, period: Duration) -> Self {
        Self { detector, period }
    }

    /// Starts polling on a background task. The first sample is taken one
    /// full period after the call.
    pub fn spawn(self) -> SamplerHandle {
        let (tx, rx) = watch::channel(None);
        let tx = Arc::new(tx);
        let publisher = tx.clone();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        match self.detector.detect().await {
                            Ok(emotion) => {
                                tx.send_replace(emotion);
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "emotion detection failed");
                            }
                        }
                    }
                }
            }
            tracing::debug!("emotion sampler stopped");
        });

        SamplerHandle {
            tx: publisher,
            rx,
            cancel,
            task,
        }
    }
}

/// Latest-wins emotion slot fed by the sampler task and by [`publish`].
///
/// [`publish`]: SamplerHandle::publish
pub struct SamplerHandle {
    tx: Arc<watch::Sender<Option<Emotion>>>,
    rx: watch::Receiver<Option<Emotion>>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl SamplerHandle {
    pub fn latest(&self) -> Option<Emotion> {
        *self.rx.borrow()
    }

    /// Overwrites the current label until the next sample replaces it.
    pub fn publish(&self, emotion: Emotion) {
        self.tx.send_replace(Some(emotion));
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Emotion>> {
        self.rx.clone()
    }

    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "emotion sampler task ended abnormally");
        }
    }
}

/// Always reports the same label.
pub struct FixedDetector(pub Option<Emotion>);

#[async_trait]
impl EmotionDetector for FixedDetector {
    async fn detect(&self) -> Result<Option<Emotion>, DetectionError> {
        Ok(self.0)
    }
}

/// Replays a fixed list of outcomes, then keeps repeating the last one.
pub struct ScriptedDetector {
    script: Mutex<Vec<Result<Option<Emotion>, DetectionError>>>,
}

impl ScriptedDetector {
    pub fn new(script: Vec<Result<Option<Emotion>, DetectionError>>) -> Self {
        let mut script = script;
        script.reverse();
        Self {
            script: Mutex::new(script),
        }
    }
}

#[async_trait]
impl EmotionDetector for ScriptedDetector {
    async fn detect(&self) -> Result<Option<Emotion>, DetectionError> {
        let mut script = self.script.lock().unwrap_or_else(|e| e.into_inner());
        match script.len() {
            0 => Ok(None),
            1 => script[0].clone(),
            _ => script.pop().unwrap_or(Ok(None)),
        }
    }
}
