//! Shared control state and the frame processor.
//!
//! The selected effect and the optional background are written by control
//! commands and read by whoever processes frames, possibly on another thread.
//! Both live behind one [`RwLock`] so a frame always sees a consistent pair:
//! [`ControlState::snapshot`] copies the selection and clones the background
//! `Arc` under a read lock, and processing then runs without holding it.

use crate::config::{EngineConfig, effective_threads};
use crate::effects::{Dispatcher, EffectSelection};
use crate::imaging::{self, FrameBuffer};
use parking_lot::RwLock;
use std::sync::Arc;

/// Consistent view of the control state taken between frames.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub selection: EffectSelection,
    pub background: Option<Arc<FrameBuffer>>,
}

#[derive(Debug, Default)]
struct Inner {
    selection: EffectSelection,
    background: Option<Arc<FrameBuffer>>,
}

/// Guarded selection + background, shared between control and processing.
#[derive(Debug, Default)]
pub struct ControlState {
    inner: RwLock<Inner>,
}

impl ControlState {
    pub fn new(selection: EffectSelection) -> Self {
        Self {
            inner: RwLock::new(Inner {
                selection,
                background: None,
            }),
        }
    }

    /// Replace the active effect; takes effect from the next frame.
    pub fn set_effect(&self, selection: EffectSelection) {
        let previous = std::mem::replace(&mut self.inner.write().selection, selection);
        if previous != selection {
            log::info!("effect changed: {previous} → {selection}");
        }
    }

    /// Install or clear the background used by `subtract`.
    ///
    /// An empty background is rejected and the current one is kept.
    pub fn set_background(&self, background: Option<FrameBuffer>) -> imaging::Result<()> {
        let Some(bg) = background else {
            self.clear_background();
            return Ok(());
        };
        if let Err(e) = bg.ensure_non_empty() {
            log::warn!("background rejected: {e}");
            return Err(e);
        }
        log::info!("background set ({}x{})", bg.width(), bg.height());
        self.inner.write().background = Some(Arc::new(bg));
        Ok(())
    }

    pub fn clear_background(&self) {
        log::info!("background cleared");
        self.inner.write().background = None;
    }

    pub fn effect(&self) -> EffectSelection {
        self.inner.read().selection
    }

    pub fn has_background(&self) -> bool {
        self.inner.read().background.is_some()
    }

    pub fn snapshot(&self) -> Snapshot {
        let inner = self.inner.read();
        Snapshot {
            selection: inner.selection,
            background: inner.background.clone(),
        }
    }
}

/// Applies the current effect to frames and fits them to the viewport.
///
/// Pixel work runs on a private rayon pool sized from
/// [`ProcessingConfig`](crate::config::ProcessingConfig).
pub struct Processor {
    config: EngineConfig,
    dispatcher: Dispatcher,
    state: Arc<ControlState>,
    pool: rayon::ThreadPool,
}

impl Processor {
    pub fn new(config: EngineConfig) -> Result<Self, rayon::ThreadPoolBuildError> {
        let state = Arc::new(ControlState::new(config.effects.default));
        Self::with_state(config, state)
    }

    /// Build a processor around an existing control state.
    pub fn with_state(
        config: EngineConfig,
        state: Arc<ControlState>,
    ) -> Result<Self, rayon::ThreadPoolBuildError> {
        let threads = effective_threads(&config.processing);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("imager-worker-{i}"))
            .build()?;
        log::debug!("processor pool started with {threads} threads");
        Ok(Self {
            dispatcher: Dispatcher::new(config.dispatch_options()),
            config,
            state,
            pool,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Handle for control commands from other threads.
    pub fn state(&self) -> &Arc<ControlState> {
        &self.state
    }

    pub fn set_effect(&self, selection: EffectSelection) {
        self.state.set_effect(selection);
    }

    pub fn set_background(&self, background: FrameBuffer) -> imaging::Result<()> {
        self.state.set_background(Some(background))
    }

    pub fn clear_background(&self) {
        self.state.clear_background();
    }

    pub fn effect(&self) -> EffectSelection {
        self.state.effect()
    }

    pub fn has_background(&self) -> bool {
        self.state.has_background()
    }

    /// Apply the currently selected effect and fit to the viewport.
    pub fn process(&self, frame: &FrameBuffer) -> imaging::Result<FrameBuffer> {
        let snapshot = self.state.snapshot();
        self.run(frame, snapshot.selection, snapshot.background.as_deref())
    }

    /// Apply an explicit effect, using the shared background.
    ///
    /// For still images, where the caller picks the effect per request rather
    /// than switching the stream's selection.
    pub fn apply_still(
        &self,
        frame: &FrameBuffer,
        selection: EffectSelection,
    ) -> imaging::Result<FrameBuffer> {
        let background = self.state.snapshot().background;
        self.run(frame, selection, background.as_deref())
    }

    /// The unprocessed frame fitted to the viewport.
    pub fn preview(&self, frame: &FrameBuffer) -> imaging::Result<FrameBuffer> {
        let viewport = self.config.viewport;
        self.pool
            .install(|| imaging::resize_and_crop(frame, viewport.width, viewport.height))
    }

    fn run(
        &self,
        frame: &FrameBuffer,
        selection: EffectSelection,
        background: Option<&FrameBuffer>,
    ) -> imaging::Result<FrameBuffer> {
        let viewport = self.config.viewport;
        self.pool.install(|| {
            self.dispatcher
                .dispatch(frame, selection, background, viewport.width, viewport.height)
        })
    }
}
