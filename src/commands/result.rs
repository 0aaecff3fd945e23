// 结果命令模块
// 提供供前端调用的测验结果查询命令

use serde::{Deserialize, Serialize};
use tauri::State;

use crate::commands::quiz::DbState;
use crate::commands::session::AnswerRecordDto;
use crate::models::QuizResult;

/// 结果传输对象
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultDto {
    pub id: String,
    pub quiz_id: String,
    pub user_id: String,
    pub score: u32,
    pub total_questions: u32,
    pub answers: Vec<AnswerRecordDto>,
    pub analysis: String,
    pub completed_at: String,
}

impl ResultDto {
    pub fn from_model(result: &QuizResult) -> Self {
        Self {
            id: result.id.clone(),
            quiz_id: result.quiz_id.clone(),
            user_id: result.user_id.clone(),
            score: result.score,
            total_questions: result.total_questions,
            answers: result.answers.iter().map(AnswerRecordDto::from_model).collect(),
            analysis: result.analysis.clone(),
            completed_at: result.completed_at.to_rfc3339(),
        }
    }
}

/// 获取结果
#[tauri::command]
pub async fn get_result(id: String, state: State<'_, DbState>) -> Result<ResultDto, String> {
    let db = state.0.lock().map_err(|e| e.to_string())?;

    let result = db.get_result(&id).map_err(|e| e.to_string())?;

    Ok(ResultDto::from_model(&result))
}

/// 获取某用户的全部结果
#[tauri::command]
pub async fn get_results_by_user(
    user_id: String,
    state: State<'_, DbState>,
) -> Result<Vec<ResultDto>, String> {
    let db = state.0.lock().map_err(|e| e.to_string())?;

    let results = db.results_by_user(&user_id).map_err(|e| e.to_string())?;

    Ok(results.iter().map(ResultDto::from_model).collect())
}

/// 获取某测验下的全部结果
#[tauri::command]
pub async fn get_results_by_quiz(
    quiz_id: String,
    state: State<'_, DbState>,
) -> Result<Vec<ResultDto>, String> {
    let db = state.0.lock().map_err(|e| e.to_string())?;

    let results = db.results_by_quiz(&quiz_id).map_err(|e| e.to_string())?;

    Ok(results.iter().map(ResultDto::from_model).collect())
}
