pub mod scenarios;
pub mod session;
pub mod traced_int;
pub mod tracer;

pub use scenarios::Scenario;
pub use session::{build_recorder, RecorderHandle, Session};
pub use traced_int::TracedInt;
pub use tracer::FunctionTracer;

use crate::config::RecorderConfig;
use crate::domain::graph::GraphSnapshot;
use crate::error::Result;

/// Record one scenario into the artifact named by `config`.
pub struct RecordUsecase<'a> {
    pub config: &'a RecorderConfig,
}

impl<'a> RecordUsecase<'a> {
    pub fn run(&self, scenario: Scenario) -> Result<Option<GraphSnapshot>> {
        let session = Session::start(self.config.clone())?;
        scenario.run(&session.handle());
        session.finish()
    }
}
