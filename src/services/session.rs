//! 测验会话引擎
//! 管理单人限时测验的状态机：作答倒计时、判定、答题日志与最终结果收束

use std::sync::{Arc, Mutex, Weak};

use chrono::Utc;
use log::{debug, info, warn};
use rand::thread_rng;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AnswerRecord, Question, Quiz, QuizResult};
use crate::services::analysis::AnalysisComposer;
use crate::services::timer::DeadlineTimer;

/// 每道题的默认作答时限（秒）
pub const DEFAULT_QUESTION_TIME_LIMIT: u32 = 30;

/// 会话阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// 等待作答，倒计时进行中
    AwaitingAnswer,
    /// 展示判定反馈，等待进入下一题
    Feedback,
    /// 全部题目作答完毕，最终结果已生成
    Complete,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::AwaitingAnswer => "awaiting_answer",
            SessionPhase::Feedback => "feedback",
            SessionPhase::Complete => "complete",
        }
    }
}

/// 会话构建错误
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid quiz: {0}")]
    InvalidQuiz(String),
}

/// 单次作答的判定结果
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub correct: bool,
    pub correct_answer: String,
}

/// 判定一次作答；submitted 为 None 表示超时未选择
///
/// 严格区分大小写的全等比较，选项文本由创建向导保证整洁。
/// 对任何结构合法的题目总能给出结果，不会失败。
pub fn evaluate_answer(question: &Question, submitted: Option<&str>) -> Evaluation {
    let correct = submitted.map_or(false, |answer| answer == question.correct_answer);
    Evaluation {
        correct,
        correct_answer: question.correct_answer.clone(),
    }
}

/// 分数汇总
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSummary {
    pub score: u32,
    pub total: u32,
}

/// 由答题日志推导分数；纯函数，重复调用结果不变
pub fn aggregate_score(log: &[AnswerRecord]) -> ScoreSummary {
    ScoreSummary {
        score: log.iter().filter(|record| record.correct).count() as u32,
        total: log.len() as u32,
    }
}

/// 构建会话前的测验校验
///
/// 题目数为零、任一题选项不足两个、或没有唯一一个选项与标准答案
/// 文本相符时拒绝开始。
pub fn validate_quiz(quiz: &Quiz) -> Result<(), SessionError> {
    if quiz.questions.is_empty() {
        return Err(SessionError::InvalidQuiz("quiz has no questions".into()));
    }
    for question in &quiz.questions {
        if question.options.len() < 2 {
            return Err(SessionError::InvalidQuiz(format!(
                "question {} has fewer than two options",
                question.id
            )));
        }
        let matching = question
            .options
            .iter()
            .filter(|option| option.text == question.correct_answer)
            .count();
        if matching != 1 {
            return Err(SessionError::InvalidQuiz(format!(
                "question {} must have exactly one option matching the correct answer",
                question.id
            )));
        }
    }
    Ok(())
}

/// 会话状态快照（只读）
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub quiz_id: String,
    pub phase: SessionPhase,
    pub current_index: usize,
    pub total_questions: usize,
    pub remaining_seconds: i64,
    pub score: ScoreSummary,
    pub answers: Vec<AnswerRecord>,
}

/// 测验会话
///
/// 独占持有一次游玩的全部状态；外部只能读取快照或调用
/// submit / advance / go_back 指令，超时迁移由倒计时回调驱动。
pub struct QuizSession {
    id: String,
    quiz: Quiz,
    user_id: String,
    phase: SessionPhase,
    current_index: usize,
    answers: Vec<AnswerRecord>,
    timer: DeadlineTimer,
    time_limit: u32,
    composer: AnalysisComposer,
    outcome: Option<QuizResult>,
    self_ref: Weak<Mutex<QuizSession>>,
}

impl QuizSession {
    /// 从已加载的测验构建会话并启动第一题的倒计时
    pub fn start(
        quiz: Quiz,
        user_id: impl Into<String>,
    ) -> Result<Arc<Mutex<QuizSession>>, SessionError> {
        Self::start_with_time_limit(quiz, user_id, DEFAULT_QUESTION_TIME_LIMIT)
    }

    /// 以自定义每题时限构建会话
    pub fn start_with_time_limit(
        quiz: Quiz,
        user_id: impl Into<String>,
        time_limit: u32,
    ) -> Result<Arc<Mutex<QuizSession>>, SessionError> {
        validate_quiz(&quiz)?;

        let session = Arc::new_cyclic(|weak: &Weak<Mutex<QuizSession>>| {
            Mutex::new(QuizSession {
                id: Uuid::new_v4().to_string(),
                quiz,
                user_id: user_id.into(),
                phase: SessionPhase::AwaitingAnswer,
                current_index: 0,
                answers: Vec::new(),
                timer: DeadlineTimer::new(),
                time_limit,
                composer: AnalysisComposer::new(),
                outcome: None,
                self_ref: weak.clone(),
            })
        });

        {
            let mut guard = session.lock().unwrap();
            guard.arm_timer();
            info!(
                "会话 {} 启动：测验 {}，共 {} 题，每题 {} 秒",
                guard.id,
                guard.quiz.id,
                guard.quiz.questions.len(),
                guard.time_limit
            );
        }

        Ok(session)
    }

    /// 当前展示中的题目
    pub fn current_question(&self) -> &Question {
        &self.quiz.questions[self.current_index]
    }

    /// 完成后的最终结果；未完成时为 None
    pub fn outcome(&self) -> Option<QuizResult> {
        self.outcome.clone()
    }

    /// 当前状态快照；分数每次由日志重新计算，从不缓存
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id.clone(),
            quiz_id: self.quiz.id.clone(),
            phase: self.phase,
            current_index: self.current_index,
            total_questions: self.quiz.questions.len(),
            remaining_seconds: self.timer.remaining_seconds(),
            score: aggregate_score(&self.answers),
            answers: self.answers.clone(),
        }
    }

    /// 提交当前题目的作答
    ///
    /// 先同步取消倒计时再写入记录，同一题重复提交（包括与超时竞争
    /// 落败的一方）不产生第二条记录。
    pub fn submit(&mut self, answer: &str) {
        if !self.can_record() {
            warn!(
                "会话 {}：第 {} 题已有记录或阶段不符，忽略提交",
                self.id,
                self.current_index + 1
            );
            return;
        }
        self.timer.cancel();
        self.push_record(Some(answer.to_string()));
    }

    /// 倒计时到期回调；等价于提交空作答
    fn handle_timeout(&mut self) {
        if !self.can_record() {
            debug!(
                "会话 {}：超时信号到达时第 {} 题已有记录，忽略",
                self.id,
                self.current_index + 1
            );
            return;
        }
        info!("会话 {}：第 {} 题超时未作答", self.id, self.current_index + 1);
        self.push_record(None);
    }

    /// 从反馈阶段进入下一题；最后一题时收束为最终结果。
    /// 回看已作答的题目时向前返回一步。
    pub fn advance(&mut self) {
        match self.phase {
            SessionPhase::Feedback => {
                if self.current_index + 1 == self.quiz.questions.len() {
                    self.finalize();
                } else {
                    self.current_index += 1;
                    self.phase = SessionPhase::AwaitingAnswer;
                    self.arm_timer();
                    debug!("会话 {}：进入第 {} 题", self.id, self.current_index + 1);
                }
            }
            SessionPhase::AwaitingAnswer if self.current_index < self.answers.len() => {
                self.timer.cancel();
                self.current_index += 1;
                self.arm_timer();
                debug!("会话 {}：返回第 {} 题", self.id, self.current_index + 1);
            }
            _ => {
                warn!("会话 {}：当前阶段不允许 advance，忽略", self.id);
            }
        }
    }

    /// 在作答当前题之前回看上一题；仅查看，已有记录不变
    pub fn go_back(&mut self) {
        if self.phase != SessionPhase::AwaitingAnswer
            || self.current_index == 0
            || self.current_index < self.answers.len()
        {
            warn!("会话 {}：当前状态不允许回看，忽略", self.id);
            return;
        }
        self.timer.cancel();
        self.current_index -= 1;
        self.arm_timer();
        debug!("会话 {}：回看第 {} 题", self.id, self.current_index + 1);
    }

    /// 放弃会话，停止倒计时
    pub fn abandon(&mut self) {
        self.timer.cancel();
        info!("会话 {} 被放弃", self.id);
    }

    /// 仅在等待作答且该题尚无记录时允许写入
    fn can_record(&self) -> bool {
        self.phase == SessionPhase::AwaitingAnswer && self.current_index == self.answers.len()
    }

    fn push_record(&mut self, selected: Option<String>) {
        let question = &self.quiz.questions[self.current_index];
        let evaluation = evaluate_answer(question, selected.as_deref());
        self.answers.push(AnswerRecord {
            question_id: question.id.clone(),
            selected_answer: selected,
            correct: evaluation.correct,
            correct_answer: evaluation.correct_answer,
        });
        self.phase = SessionPhase::Feedback;
        debug!(
            "会话 {}：第 {} 题记录完成，{}",
            self.id,
            self.current_index + 1,
            if self.answers[self.answers.len() - 1].correct {
                "答对"
            } else {
                "答错"
            }
        );
    }

    fn finalize(&mut self) {
        self.timer.cancel();
        self.phase = SessionPhase::Complete;

        let summary = aggregate_score(&self.answers);
        let analysis = self
            .composer
            .compose(&self.quiz, &self.answers, &mut thread_rng());

        self.outcome = Some(QuizResult {
            id: String::new(), // 存储层在持久化时分配
            quiz_id: self.quiz.id.clone(),
            user_id: self.user_id.clone(),
            score: summary.score,
            total_questions: summary.total,
            answers: self.answers.clone(),
            analysis,
            completed_at: Utc::now(),
        });

        info!(
            "会话 {} 完成：得分 {}/{}",
            self.id, summary.score, summary.total
        );
    }

    fn arm_timer(&mut self) {
        let weak = self.self_ref.clone();
        self.timer.start(self.time_limit, move || {
            if let Some(session) = weak.upgrade() {
                session.lock().unwrap().handle_timeout();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, QuizOption};
    use tokio::time::{sleep, Duration};

    fn option(text: &str, is_correct: bool) -> QuizOption {
        QuizOption {
            text: text.to_string(),
            is_correct,
        }
    }

    fn sample_question(id: &str) -> Question {
        Question {
            id: id.to_string(),
            text: format!("Question {}", id),
            media: None,
            options: vec![
                option("Red", true),
                option("Blue", false),
                option("Green", false),
            ],
            correct_answer: "Red".to_string(),
            explanation: Some("Red is the one".to_string()),
        }
    }

    fn sample_quiz(question_count: usize) -> Quiz {
        Quiz {
            id: "quiz-1".to_string(),
            title: "What Is Your Spirit Color".to_string(),
            description: "A quick color quiz".to_string(),
            category: Category::Personality,
            creator_id: "user-1".to_string(),
            participant_count: 0,
            average_score: 0.0,
            questions: (1..=question_count)
                .map(|i| sample_question(&format!("q{}", i)))
                .collect(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_full_play_through_produces_all_records() {
        let session = QuizSession::start(sample_quiz(3), "user-1").unwrap();

        for i in 0..3 {
            let mut guard = session.lock().unwrap();
            assert_eq!(guard.snapshot().phase, SessionPhase::AwaitingAnswer);
            assert_eq!(guard.snapshot().current_index, i);
            guard.submit("Red");
            assert_eq!(guard.snapshot().phase, SessionPhase::Feedback);
            guard.advance();
        }

        let guard = session.lock().unwrap();
        let snapshot = guard.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Complete);
        assert_eq!(snapshot.answers.len(), 3);

        let outcome = guard.outcome().unwrap();
        assert_eq!(outcome.score, 3);
        assert_eq!(outcome.total_questions, 3);
        assert!(!outcome.analysis.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_records_unanswered() {
        let session = QuizSession::start_with_time_limit(sample_quiz(2), "user-1", 2).unwrap();

        sleep(Duration::from_secs(5)).await;

        let guard = session.lock().unwrap();
        let snapshot = guard.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Feedback);
        assert_eq!(snapshot.answers.len(), 1);
        assert_eq!(snapshot.answers[0].selected_answer, None);
        assert!(!snapshot.answers[0].correct);
        assert_eq!(snapshot.answers[0].correct_answer, "Red");
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_cancels_timer() {
        let session = QuizSession::start_with_time_limit(sample_quiz(2), "user-1", 2).unwrap();

        session.lock().unwrap().submit("Blue");
        sleep(Duration::from_secs(10)).await;

        let guard = session.lock().unwrap();
        let snapshot = guard.snapshot();
        assert_eq!(snapshot.answers.len(), 1);
        assert_eq!(snapshot.answers[0].selected_answer.as_deref(), Some("Blue"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_after_timeout_is_noop() {
        let session = QuizSession::start_with_time_limit(sample_quiz(2), "user-1", 1).unwrap();

        sleep(Duration::from_secs(3)).await;
        let mut guard = session.lock().unwrap();
        guard.submit("Red");

        let snapshot = guard.snapshot();
        assert_eq!(snapshot.answers.len(), 1);
        assert_eq!(snapshot.answers[0].selected_answer, None);
    }

    #[tokio::test]
    async fn test_double_submit_is_noop() {
        let session = QuizSession::start(sample_quiz(2), "user-1").unwrap();
        let mut guard = session.lock().unwrap();

        guard.submit("Red");
        guard.submit("Blue");

        let snapshot = guard.snapshot();
        assert_eq!(snapshot.answers.len(), 1);
        assert_eq!(snapshot.answers[0].selected_answer.as_deref(), Some("Red"));
    }

    #[tokio::test]
    async fn test_advance_before_answering_is_noop() {
        let session = QuizSession::start(sample_quiz(2), "user-1").unwrap();
        let mut guard = session.lock().unwrap();

        guard.advance();

        let snapshot = guard.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::AwaitingAnswer);
        assert_eq!(snapshot.current_index, 0);
    }

    #[tokio::test]
    async fn test_go_back_at_first_question_is_noop() {
        let session = QuizSession::start(sample_quiz(2), "user-1").unwrap();
        let mut guard = session.lock().unwrap();

        guard.go_back();

        assert_eq!(guard.snapshot().current_index, 0);
    }

    #[tokio::test]
    async fn test_go_back_is_view_only() {
        let session = QuizSession::start(sample_quiz(3), "user-1").unwrap();
        let mut guard = session.lock().unwrap();

        guard.submit("Red");
        guard.advance();
        assert_eq!(guard.snapshot().current_index, 1);

        guard.go_back();
        assert_eq!(guard.snapshot().current_index, 0);

        // 已有记录的题目不接受再次作答
        guard.submit("Blue");
        let snapshot = guard.snapshot();
        assert_eq!(snapshot.answers.len(), 1);
        assert_eq!(snapshot.answers[0].selected_answer.as_deref(), Some("Red"));

        // 再回看一层被拒绝，向前返回后继续作答
        guard.go_back();
        assert_eq!(guard.snapshot().current_index, 0);
        guard.advance();
        assert_eq!(guard.snapshot().current_index, 1);
        guard.submit("Red");
        assert_eq!(guard.snapshot().answers.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mixed_scenario_scoring() {
        let session = QuizSession::start_with_time_limit(sample_quiz(3), "user-1", 2).unwrap();

        // 第一题答对
        {
            let mut guard = session.lock().unwrap();
            guard.submit("Red");
            guard.advance();
        }
        // 第二题超时
        sleep(Duration::from_secs(5)).await;
        {
            let mut guard = session.lock().unwrap();
            assert_eq!(guard.snapshot().phase, SessionPhase::Feedback);
            guard.advance();
        }
        // 第三题答错
        let mut guard = session.lock().unwrap();
        guard.submit("Green");
        guard.advance();

        let snapshot = guard.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Complete);
        assert_eq!(snapshot.score, ScoreSummary { score: 1, total: 3 });

        let answers = &snapshot.answers;
        assert!(answers[0].correct);
        assert_eq!(answers[0].selected_answer.as_deref(), Some("Red"));
        assert!(!answers[1].correct);
        assert_eq!(answers[1].selected_answer, None);
        assert!(!answers[2].correct);
        assert_eq!(answers[2].selected_answer.as_deref(), Some("Green"));

        let outcome = guard.outcome().unwrap();
        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.total_questions, 3);
    }

    #[tokio::test]
    async fn test_score_recomputed_on_each_transition() {
        let session = QuizSession::start(sample_quiz(3), "user-1").unwrap();
        let mut guard = session.lock().unwrap();

        assert_eq!(guard.snapshot().score, ScoreSummary { score: 0, total: 0 });
        guard.submit("Red");
        assert_eq!(guard.snapshot().score, ScoreSummary { score: 1, total: 1 });
        guard.advance();
        guard.submit("Blue");
        assert_eq!(guard.snapshot().score, ScoreSummary { score: 1, total: 2 });
    }

    #[test]
    fn test_empty_quiz_rejected() {
        let quiz = sample_quiz(0);
        match QuizSession::start(quiz, "user-1") {
            Err(SessionError::InvalidQuiz(reason)) => {
                assert!(reason.contains("no questions"));
            }
            Ok(_) => panic!("empty quiz must not start a session"),
        }
    }

    #[test]
    fn test_question_with_one_option_rejected() {
        let mut quiz = sample_quiz(1);
        quiz.questions[0].options.truncate(1);
        assert!(QuizSession::start(quiz, "user-1").is_err());
    }

    #[test]
    fn test_missing_correct_option_rejected() {
        let mut quiz = sample_quiz(1);
        quiz.questions[0].correct_answer = "Purple".to_string();
        assert!(QuizSession::start(quiz, "user-1").is_err());
    }

    #[test]
    fn test_evaluate_answer_rules() {
        let question = sample_question("q1");

        assert!(evaluate_answer(&question, Some("Red")).correct);
        assert!(!evaluate_answer(&question, Some("red")).correct);
        assert!(!evaluate_answer(&question, Some("Blue")).correct);

        let timed_out = evaluate_answer(&question, None);
        assert!(!timed_out.correct);
        assert_eq!(timed_out.correct_answer, "Red");
    }

    #[test]
    fn test_aggregate_score_counts_correct_records() {
        let record = |correct: bool| AnswerRecord {
            question_id: "q1".to_string(),
            selected_answer: Some("Red".to_string()),
            correct,
            correct_answer: "Red".to_string(),
        };

        let log = vec![record(true), record(false), record(true)];
        let summary = aggregate_score(&log);
        assert_eq!(summary, ScoreSummary { score: 2, total: 3 });
        // 重复计算结果一致
        assert_eq!(aggregate_score(&log), summary);
        assert_eq!(aggregate_score(&[]), ScoreSummary { score: 0, total: 0 });
    }
}
