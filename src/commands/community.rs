// 社区命令模块
// 提供供前端调用的评论与用户资料命令

use serde::{Deserialize, Serialize};
use tauri::State;

use crate::commands::quiz::DbState;
use crate::models::{Comment, User};

/// 评论传输对象
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDto {
    pub id: String,
    pub quiz_id: String,
    pub user_id: String,
    pub username: String,
    pub content: String,
    pub upvotes: i64,
    pub created_at: String,
}

impl CommentDto {
    fn from_model(comment: &Comment) -> Self {
        Self {
            id: comment.id.clone(),
            quiz_id: comment.quiz_id.clone(),
            user_id: comment.user_id.clone(),
            username: comment.username.clone(),
            content: comment.content.clone(),
            upvotes: comment.upvotes,
            created_at: comment.created_at.to_rfc3339(),
        }
    }
}

/// 用户传输对象
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub avatar: Option<String>,
    pub quizzes_taken: i64,
    pub quizzes_created: i64,
    pub total_points: i64,
    pub average_score: f64,
    pub joined_at: String,
}

impl UserDto {
    fn from_model(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            avatar: user.avatar.clone(),
            quizzes_taken: user.quizzes_taken,
            quizzes_created: user.quizzes_created,
            total_points: user.total_points,
            average_score: user.average_score,
            joined_at: user.joined_at.to_rfc3339(),
        }
    }
}

/// 用户统计传输对象
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatsDto {
    pub quizzes_taken: i64,
    pub quizzes_created: i64,
    pub total_points: i64,
    pub average_score: f64,
}

/// 获取某测验下的评论
#[tauri::command]
pub async fn get_comments(
    quiz_id: String,
    state: State<'_, DbState>,
) -> Result<Vec<CommentDto>, String> {
    let db = state.0.lock().map_err(|e| e.to_string())?;

    let comments = db.comments_by_quiz(&quiz_id).map_err(|e| e.to_string())?;

    Ok(comments.iter().map(CommentDto::from_model).collect())
}

/// 发表评论
#[tauri::command]
pub async fn add_comment(
    quiz_id: String,
    user_id: String,
    content: String,
    state: State<'_, DbState>,
) -> Result<CommentDto, String> {
    let db = state.0.lock().map_err(|e| e.to_string())?;

    let comment = db
        .add_comment(&quiz_id, &user_id, &content)
        .map_err(|e| e.to_string())?;

    Ok(CommentDto::from_model(&comment))
}

/// 点赞评论
#[tauri::command]
pub async fn upvote_comment(
    id: String,
    state: State<'_, DbState>,
) -> Result<CommentDto, String> {
    let db = state.0.lock().map_err(|e| e.to_string())?;

    let comment = db.upvote_comment(&id).map_err(|e| e.to_string())?;

    Ok(CommentDto::from_model(&comment))
}

/// 删除评论
#[tauri::command]
pub async fn delete_comment(id: String, state: State<'_, DbState>) -> Result<(), String> {
    let db = state.0.lock().map_err(|e| e.to_string())?;

    db.delete_comment(&id).map_err(|e| e.to_string())?;

    Ok(())
}

/// 创建用户
#[tauri::command]
pub async fn create_user(
    username: String,
    avatar: Option<String>,
    state: State<'_, DbState>,
) -> Result<UserDto, String> {
    let db = state.0.lock().map_err(|e| e.to_string())?;

    let user = db
        .create_user(&username, avatar.as_deref())
        .map_err(|e| e.to_string())?;

    Ok(UserDto::from_model(&user))
}

/// 获取用户资料
#[tauri::command]
pub async fn get_user(id: String, state: State<'_, DbState>) -> Result<UserDto, String> {
    let db = state.0.lock().map_err(|e| e.to_string())?;

    let user = db.get_user(&id).map_err(|e| e.to_string())?;

    Ok(UserDto::from_model(&user))
}

/// 获取用户统计
#[tauri::command]
pub async fn get_user_stats(
    id: String,
    state: State<'_, DbState>,
) -> Result<UserStatsDto, String> {
    let db = state.0.lock().map_err(|e| e.to_string())?;

    let stats = db.get_user_stats(&id).map_err(|e| e.to_string())?;

    Ok(UserStatsDto {
        quizzes_taken: stats.quizzes_taken,
        quizzes_created: stats.quizzes_created,
        total_points: stats.total_points,
        average_score: stats.average_score,
    })
}
