mod attempt;
mod bank;
mod ids;
mod question;
mod settings;

pub use attempt::{AttemptError, Completion, ExamAttempt, FinishReason, LifecycleState};
pub use bank::{BankError, QuestionBank};
pub use ids::{ParseIdError, QuestionId};
pub use question::{AnswerChoice, OptionKey, QuestionError, QuestionOption, QuestionRecord};
pub use settings::{
    ExamSettings, ScoringWeights, SettingsError, SpecialQuestionSettings, TimeLimit,
};
