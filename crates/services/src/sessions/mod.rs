mod plan;
mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{SamplePlan, Sampler, SpecialQuestionRule};
pub use progress::ExamProgress;
pub use service::{ExamEvent, ExamSession, TickOutcome};
pub use view::AttemptSnapshot;
pub use workflow::ExamLoopService;
