//! Recorder session and shared handle.
//!
//! A [`Session`] acquires the output artifact, builds the configured recorder
//! strategy and tears it down when finished or dropped. Instrumented values
//! reach the recorder through a cloned [`RecorderHandle`] instead of a global.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`). Sharing a recorder
//! across threads would need a lock around every call.

use crate::api::dto::GraphDto;
use crate::application::tracer::FunctionTracer;
use crate::config::{RecorderConfig, RecorderKind};
use crate::domain::graph::GraphSnapshot;
use crate::domain::ids::Identity;
use crate::error::{RecorderError, Result};
use crate::infrastructure::{GraphBuilder, TextRecorder};
use crate::ports::EventRecorder;
use std::cell::{Cell, RefCell};
use std::fs::File;
use std::io::BufWriter;
use std::rc::Rc;

struct Shared {
    recorder: RefCell<Box<dyn EventRecorder>>,
    identities: Cell<u64>,
    failure: RefCell<Option<RecorderError>>,
    closed: Cell<bool>,
}

/// Cheap, cloneable access to the active recorder.
#[derive(Clone)]
pub struct RecorderHandle {
    inner: Rc<Shared>,
}

impl RecorderHandle {
    pub fn new(recorder: Box<dyn EventRecorder>) -> Self {
        Self {
            inner: Rc::new(Shared {
                recorder: RefCell::new(recorder),
                identities: Cell::new(0),
                failure: RefCell::new(None),
                closed: Cell::new(false),
            }),
        }
    }

    /// Run one recorder call.
    ///
    /// The first failure is kept and every later call is skipped, since the
    /// output can no longer be trusted. Returns `None` when the call did not
    /// run or failed.
    pub fn record<T>(&self, f: impl FnOnce(&mut dyn EventRecorder) -> Result<T>) -> Option<T> {
        if self.inner.closed.get() {
            tracing::debug!("event after teardown dropped");
            return None;
        }
        if self.inner.failure.borrow().is_some() {
            return None;
        }

        let mut recorder = self.inner.recorder.borrow_mut();
        match f(&mut **recorder) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Recorder failed, further events are dropped: {}", e);
                *self.inner.failure.borrow_mut() = Some(e);
                None
            }
        }
    }

    /// Fresh identity for a newly constructed tracked value.
    pub fn next_identity(&self) -> Identity {
        let id = self.inner.identities.get();
        self.inner.identities.set(id + 1);
        Identity(id)
    }

    pub fn depth(&self) -> usize {
        self.inner.recorder.borrow().depth()
    }

    pub fn snapshot(&self) -> Option<GraphSnapshot> {
        self.inner.recorder.borrow().snapshot()
    }

    /// Open a function grouping closed when the returned guard drops.
    pub fn trace_function(&self, name: &str) -> FunctionTracer {
        FunctionTracer::enter(self, name)
    }

    /// First failure seen by this handle, if any.
    pub fn take_failure(&self) -> Option<RecorderError> {
        self.inner.failure.borrow_mut().take()
    }

    fn teardown(&self) -> Result<()> {
        self.inner.recorder.borrow_mut().teardown()
    }

    fn replace(&self, recorder: Box<dyn EventRecorder>) {
        *self.inner.recorder.borrow_mut() = recorder;
    }

    fn close(&self) {
        self.inner.closed.set(true);
    }
}

/// Build the recorder strategy named by `config`, creating its output file.
pub fn build_recorder(config: &RecorderConfig) -> Result<Box<dyn EventRecorder>> {
    let file = File::create(&config.output).map_err(|source| RecorderError::ResourceAcquisition {
        path: config.output.clone(),
        source,
    })?;
    let out = BufWriter::new(file);

    let recorder: Box<dyn EventRecorder> = match config.kind {
        RecorderKind::Graphviz => Box::new(GraphBuilder::new(out, config.graph_options())?),
        RecorderKind::Text => Box::new(TextRecorder::new(out)),
    };
    Ok(recorder)
}

pub struct Session {
    handle: RecorderHandle,
    config: RecorderConfig,
    finished: bool,
}

impl Session {
    /// Acquire the output and start recording.
    pub fn start(config: RecorderConfig) -> Result<Self> {
        let recorder = build_recorder(&config)?;
        tracing::info!(kind = ?config.kind, output = %config.output.display(), "recording started");
        Ok(Self::with_recorder(recorder, config))
    }

    /// Start a session around an already built recorder.
    pub fn with_recorder(recorder: Box<dyn EventRecorder>, config: RecorderConfig) -> Self {
        Self {
            handle: RecorderHandle::new(recorder),
            config,
            finished: false,
        }
    }

    pub fn handle(&self) -> RecorderHandle {
        self.handle.clone()
    }

    pub fn kind(&self) -> RecorderKind {
        self.config.kind
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Replace the active strategy. A no-op when `kind` is already active;
    /// otherwise the current recorder is torn down and a new one starts on
    /// the same output path.
    pub fn switch(&mut self, kind: RecorderKind) -> Result<()> {
        if kind == self.config.kind {
            return Ok(());
        }
        self.teardown_current()?;

        self.config.kind = kind;
        let recorder = build_recorder(&self.config)?;
        self.handle.replace(recorder);
        tracing::info!(kind = ?kind, "recorder switched");
        Ok(())
    }

    /// Tear down the recorder and return its graph, if it built one.
    pub fn finish(mut self) -> Result<Option<GraphSnapshot>> {
        self.finished = true;
        let teardown = self.teardown_current();
        self.handle.close();
        if let Some(e) = self.handle.take_failure() {
            return Err(e);
        }
        teardown?;
        Ok(self.handle.snapshot())
    }

    fn teardown_current(&self) -> Result<()> {
        self.handle.teardown()?;
        if let (Some(path), Some(snapshot)) = (&self.config.summary, self.handle.snapshot()) {
            let json = serde_json::to_string_pretty(&GraphDto::from(&snapshot))?;
            std::fs::write(path, json).map_err(|source| RecorderError::ResourceAcquisition {
                path: path.clone(),
                source,
            })?;
            tracing::info!(summary = %path.display(), "summary written");
        }
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(e) = self.teardown_current() {
                tracing::warn!("Failed to finish recording on drop: {}", e);
            }
            self.handle.close();
        }
    }
}
