// 服务模块
// 提供核心业务逻辑服务

pub mod analysis;
pub mod database;
pub mod session;
pub mod timer;

pub use analysis::{AnalysisComposer, ComposerConfig};

pub use database::{DatabaseService, StoreError};

pub use session::{
    aggregate_score, evaluate_answer, validate_quiz, Evaluation, QuizSession, ScoreSummary,
    SessionError, SessionPhase, SessionSnapshot, DEFAULT_QUESTION_TIME_LIMIT,
};

pub use timer::DeadlineTimer;
