//! Real-time driver for [`MotionRuntime`]
//!
//! Ticks the runtime from a tokio interval, applies commands from the host
//! between frames and publishes a snapshot after every tick.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::orchestrator::MotionRuntime;
use super::snapshot::FrameSnapshot;
use crate::scroll::InputDisposition;

/// Input from the host, applied before the next frame
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeCommand {
    Navigate { path: String },
    Wheel { delta: f64 },
    Touch { delta: f64 },
    Anchor { href: String },
    /// Platform reduced-motion notification
    ReducedMotion(bool),
    Viewport(Option<f64>),
    EffectsAvailable(bool),
}

pub struct FrameLoop {
    runtime: MotionRuntime,
    frame_interval: Duration,
    commands: mpsc::UnboundedReceiver<RuntimeCommand>,
    frame_tx: Option<mpsc::UnboundedSender<FrameSnapshot>>,
}

fn now() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}

impl FrameLoop {
    /// Create a loop and the sender used to feed it commands
    pub fn new(
        runtime: MotionRuntime,
        frame_interval: Duration,
    ) -> (Self, mpsc::UnboundedSender<RuntimeCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let frame_loop = Self {
            runtime,
            frame_interval: frame_interval.max(Duration::from_millis(1)),
            commands: rx,
            frame_tx: None,
        };
        (frame_loop, tx)
    }

    /// Publish a snapshot after every frame
    pub fn with_frame_sender(mut self, tx: mpsc::UnboundedSender<FrameSnapshot>) -> Self {
        self.frame_tx = Some(tx);
        self
    }

    /// Run until the shutdown signal, then tear the runtime down
    ///
    /// Returns the last frame rendered before teardown.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> FrameSnapshot {
        info!(
            "Frame loop started: interval={}ms",
            self.frame_interval.as_millis()
        );
        self.runtime.start(now());

        let mut frames = tokio::time::interval(self.frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!("Frame loop received shutdown signal");
                        break;
                    }
                }

                Some(command) = self.commands.recv() => {
                    self.apply(command);
                }

                _ = frames.tick() => {
                    let at = now();
                    self.runtime.tick(at);
                    self.publish(at);
                }
            }
        }

        let at = now();
        let last = self.runtime.snapshot(at);
        self.runtime.teardown(at);
        last
    }

    fn apply(&mut self, command: RuntimeCommand) {
        let at = now();
        debug!("Applying {:?}", command);
        match command {
            RuntimeCommand::Navigate { path } => {
                self.runtime.navigate_to(&path, at);
            }
            RuntimeCommand::Wheel { delta } => {
                if self.runtime.wheel(delta) == InputDisposition::Passthrough {
                    self.scroll_natively(delta);
                }
            }
            RuntimeCommand::Touch { delta } => {
                if self.runtime.touch(delta) == InputDisposition::Passthrough {
                    self.scroll_natively(delta);
                }
            }
            RuntimeCommand::Anchor { href } => {
                self.runtime.anchor_click(&href, at);
            }
            RuntimeCommand::ReducedMotion(reduced) => self.runtime.platform_motion_changed(reduced),
            RuntimeCommand::Viewport(height) => self.runtime.set_viewport(height),
            RuntimeCommand::EffectsAvailable(available) => {
                self.runtime.set_effects_available(available)
            }
        }
    }

    /// Stand-in for the platform's own scrolling when input is not consumed
    fn scroll_natively(&mut self, delta: f64) {
        let offset = self.runtime.scroll().current_offset() + delta;
        self.runtime.sync_native(offset);
    }

    fn publish(&mut self, at: std::time::Instant) {
        let Some(tx) = self.frame_tx.as_ref() else {
            return;
        };
        let snapshot = self.runtime.snapshot(at);
        if tx.send(snapshot).is_err() {
            warn!("Frame receiver dropped, no longer publishing frames");
            self.frame_tx = None;
        }
    }
}
