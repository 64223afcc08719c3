// Main library entry point for Lifetrace.

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ports;

pub use application::{FunctionTracer, RecorderHandle, Session, TracedInt};
pub use config::{RecorderConfig, RecorderKind};
pub use error::{RecorderError, Result};
pub use ports::{EventRecorder, MoveToken};
