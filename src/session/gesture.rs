//! Gesture streaming session
//!
//! A periodic sampler captures the current camera frame and fires one
//! independent gateway request per frame; replies append to the log in
//! arrival order, which may differ from capture order. This is accepted
//! non-determinism: in-flight requests are never serialized or canceled,
//! only their effects are suppressed once the session is no longer live.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::conversation::{ConversationLog, Sender};
use crate::format::format_reply;
use crate::gateway::Backend;
use crate::media::FrameSource;
use crate::strings;

/// One gesture streaming activation
///
/// Holds the liveness flag that guards every in-flight reply: after stop,
/// late results are dropped instead of displaying stale inferences.
pub struct GestureSession {
    live: Arc<AtomicBool>,
    stop_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl GestureSession {
    /// Spawn the sampler over an already-acquired frame source
    pub(crate) fn start(
        backend: Arc<dyn Backend>,
        log: ConversationLog,
        source: Box<dyn FrameSource>,
        interval: Duration,
    ) -> Self {
        let live = Arc::new(AtomicBool::new(true));
        let (stop_tx, stop_rx) = oneshot::channel();

        let handle = tokio::spawn(sampler_loop(
            backend,
            log,
            source,
            interval,
            Arc::clone(&live),
            stop_rx,
        ));

        Self {
            live,
            stop_tx: Some(stop_tx),
            handle,
        }
    }

    /// Whether the session is still live (a transport error auto-stops it)
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Stop sampling and release the camera
    ///
    /// No request is dispatched after this returns; replies already in
    /// flight resolve but are dropped by the liveness guard.
    pub(crate) async fn stop(mut self) {
        self.live.store(false, Ordering::SeqCst);
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        // Wait for the sampler to run its release path
        let _ = self.handle.await;
    }
}

async fn sampler_loop(
    backend: Arc<dyn Backend>,
    log: ConversationLog,
    mut source: Box<dyn FrameSource>,
    interval: Duration,
    live: Arc<AtomicBool>,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = &mut stop_rx => break,
            _ = ticker.tick() => {
                if !live.load(Ordering::SeqCst) {
                    break;
                }

                let frame = match source.grab() {
                    Ok(frame) => frame,
                    Err(e) => {
                        tracing::warn!(error = %e, "frame capture failed, stopping stream");
                        if live.swap(false, Ordering::SeqCst) {
                            log.append(Sender::Assistant, strings::CAMERA_ERROR);
                        }
                        break;
                    }
                };

                // Independent request per frame; the loop never waits on it
                let backend = Arc::clone(&backend);
                let log = log.clone();
                let live = Arc::clone(&live);
                tokio::spawn(async move {
                    match backend.send_frame(&frame).await {
                        Ok(task) => {
                            if live.load(Ordering::SeqCst) {
                                log.append(Sender::Assistant, format_reply(&task));
                            } else {
                                tracing::debug!("dropping gesture reply after stop");
                            }
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "gesture request failed");
                            // First failure stops the stream; later ones are late replies
                            if live.swap(false, Ordering::SeqCst) {
                                log.append(Sender::Assistant, strings::GESTURE_STREAM_ERROR);
                            }
                        }
                    }
                });
            }
        }
    }

    source.stop();
    tracing::debug!("gesture sampler stopped");
}
