// 会话命令模块
// 提供供前端调用的测验会话指令：开始、作答、前进、回看与快照读取

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tauri::State;

use crate::commands::quiz::{DbState, QuestionDto};
use crate::models::AnswerRecord;
use crate::services::session::QuizSession;

/// 活跃会话表
pub struct SessionStore(pub Mutex<HashMap<String, Arc<Mutex<QuizSession>>>>);

impl SessionStore {
    pub fn new() -> Self {
        Self(Mutex::new(HashMap::new()))
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// 答题记录传输对象
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecordDto {
    pub question_id: String,
    pub selected_answer: Option<String>,
    pub correct: bool,
    pub correct_answer: String,
}

impl AnswerRecordDto {
    pub fn from_model(record: &AnswerRecord) -> Self {
        Self {
            question_id: record.question_id.clone(),
            selected_answer: record.selected_answer.clone(),
            correct: record.correct,
            correct_answer: record.correct_answer.clone(),
        }
    }
}

/// 会话状态传输对象
///
/// result_id 仅在本次指令完成了会话并持久化结果时填充。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshotDto {
    pub session_id: String,
    pub quiz_id: String,
    pub phase: String,
    pub current_index: usize,
    pub total_questions: usize,
    pub remaining_seconds: i64,
    pub score: u32,
    pub answered: u32,
    pub answers: Vec<AnswerRecordDto>,
    pub question: QuestionDto,
    pub result_id: Option<String>,
}

fn snapshot_dto(session: &QuizSession, result_id: Option<String>) -> SessionSnapshotDto {
    let snapshot = session.snapshot();
    SessionSnapshotDto {
        session_id: snapshot.session_id,
        quiz_id: snapshot.quiz_id,
        phase: snapshot.phase.as_str().to_string(),
        current_index: snapshot.current_index,
        total_questions: snapshot.total_questions,
        remaining_seconds: snapshot.remaining_seconds,
        score: snapshot.score.score,
        answered: snapshot.score.total,
        answers: snapshot.answers.iter().map(AnswerRecordDto::from_model).collect(),
        question: QuestionDto::from_model(session.current_question()),
        result_id,
    }
}

fn get_session(
    store: &State<'_, SessionStore>,
    session_id: &str,
) -> Result<Arc<Mutex<QuizSession>>, String> {
    let sessions = store.0.lock().map_err(|e| e.to_string())?;
    sessions
        .get(session_id)
        .cloned()
        .ok_or_else(|| format!("session not active or not found: {}", session_id))
}

/// 加载测验并开始一次新会话
#[tauri::command]
pub async fn start_quiz_session(
    quiz_id: String,
    user_id: String,
    db: State<'_, DbState>,
    store: State<'_, SessionStore>,
) -> Result<SessionSnapshotDto, String> {
    let quiz = {
        let db = db.0.lock().map_err(|e| e.to_string())?;
        db.get_quiz(&quiz_id).map_err(|e| e.to_string())?
    };

    let session = QuizSession::start(quiz, user_id).map_err(|e| e.to_string())?;
    let dto = {
        let guard = session.lock().map_err(|e| e.to_string())?;
        snapshot_dto(&guard, None)
    };

    store
        .0
        .lock()
        .map_err(|e| e.to_string())?
        .insert(dto.session_id.clone(), session);

    Ok(dto)
}

/// 提交当前题目的作答
#[tauri::command]
pub async fn submit_answer(
    session_id: String,
    answer: String,
    store: State<'_, SessionStore>,
) -> Result<SessionSnapshotDto, String> {
    let session = get_session(&store, &session_id)?;
    let mut guard = session.lock().map_err(|e| e.to_string())?;

    guard.submit(&answer);

    Ok(snapshot_dto(&guard, None))
}

/// 进入下一题；最后一题时持久化最终结果并结束会话
#[tauri::command]
pub async fn advance_question(
    session_id: String,
    db: State<'_, DbState>,
    store: State<'_, SessionStore>,
) -> Result<SessionSnapshotDto, String> {
    let session = get_session(&store, &session_id)?;
    let mut guard = session.lock().map_err(|e| e.to_string())?;

    guard.advance();

    if let Some(outcome) = guard.outcome() {
        // 会话收束：结果恰好持久化一次，随后丢弃会话状态
        let stored = {
            let db = db.0.lock().map_err(|e| e.to_string())?;
            db.create_result(&outcome).map_err(|e| e.to_string())?
        };
        let dto = snapshot_dto(&guard, Some(stored.id));
        drop(guard);
        store.0.lock().map_err(|e| e.to_string())?.remove(&session_id);
        return Ok(dto);
    }

    Ok(snapshot_dto(&guard, None))
}

/// 在作答当前题之前回看上一题
#[tauri::command]
pub async fn go_back_question(
    session_id: String,
    store: State<'_, SessionStore>,
) -> Result<SessionSnapshotDto, String> {
    let session = get_session(&store, &session_id)?;
    let mut guard = session.lock().map_err(|e| e.to_string())?;

    guard.go_back();

    Ok(snapshot_dto(&guard, None))
}

/// 读取会话状态快照
#[tauri::command]
pub async fn get_session_snapshot(
    session_id: String,
    store: State<'_, SessionStore>,
) -> Result<SessionSnapshotDto, String> {
    let session = get_session(&store, &session_id)?;
    let guard = session.lock().map_err(|e| e.to_string())?;

    Ok(snapshot_dto(&guard, None))
}

/// 放弃会话并停止倒计时
#[tauri::command]
pub async fn abandon_session(
    session_id: String,
    store: State<'_, SessionStore>,
) -> Result<(), String> {
    let session = store
        .0
        .lock()
        .map_err(|e| e.to_string())?
        .remove(&session_id);

    if let Some(session) = session {
        session.lock().map_err(|e| e.to_string())?.abandon();
    }

    Ok(())
}
