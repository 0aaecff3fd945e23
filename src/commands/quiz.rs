// 测验命令模块
// 提供供前端调用的测验浏览、搜索与创建命令

use crate::models::{Category, Question, Quiz, QuizOption};
use crate::services::database::DatabaseService;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tauri::State;

/// 数据库应用状态
pub struct DbState(pub Mutex<DatabaseService>);

/// 选项传输对象
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizOptionDto {
    pub text: String,
    pub is_correct: bool,
}

/// 题目传输对象
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDto {
    pub id: String,
    pub text: String,
    pub media: Option<String>,
    pub options: Vec<QuizOptionDto>,
    pub correct_answer: String,
    pub explanation: Option<String>,
}

impl QuestionDto {
    pub fn from_model(question: &Question) -> Self {
        Self {
            id: question.id.clone(),
            text: question.text.clone(),
            media: question.media.clone(),
            options: question
                .options
                .iter()
                .map(|option| QuizOptionDto {
                    text: option.text.clone(),
                    is_correct: option.is_correct,
                })
                .collect(),
            correct_answer: question.correct_answer.clone(),
            explanation: question.explanation.clone(),
        }
    }
}

/// 测验传输对象
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub creator_id: String,
    pub participant_count: i64,
    pub average_score: f64,
    pub questions: Vec<QuestionDto>,
    pub created_at: String,
}

impl QuizDto {
    pub fn from_model(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id.clone(),
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            category: quiz.category.as_str().to_string(),
            creator_id: quiz.creator_id.clone(),
            participant_count: quiz.participant_count,
            average_score: quiz.average_score,
            questions: quiz.questions.iter().map(QuestionDto::from_model).collect(),
            created_at: quiz.created_at.to_rfc3339(),
        }
    }
}

/// 创建向导提交的题目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuestionDto {
    pub text: String,
    pub media: Option<String>,
    pub options: Vec<QuizOptionDto>,
    pub explanation: Option<String>,
}

/// 创建向导提交的测验
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuizDto {
    pub title: String,
    pub description: String,
    pub category: String,
    pub creator_id: String,
    pub questions: Vec<NewQuestionDto>,
}

/// 获取测验
#[tauri::command]
pub async fn get_quiz(id: String, state: State<'_, DbState>) -> Result<QuizDto, String> {
    let db = state.0.lock().map_err(|e| e.to_string())?;

    let quiz = db.get_quiz(&id).map_err(|e| e.to_string())?;

    Ok(QuizDto::from_model(&quiz))
}

/// 获取测验列表
#[tauri::command]
pub async fn list_quizzes(state: State<'_, DbState>) -> Result<Vec<QuizDto>, String> {
    let db = state.0.lock().map_err(|e| e.to_string())?;

    let quizzes = db.list_quizzes().map_err(|e| e.to_string())?;

    Ok(quizzes.iter().map(QuizDto::from_model).collect())
}

/// 搜索测验
#[tauri::command]
pub async fn search_quizzes(
    keyword: String,
    limit: Option<i32>,
    state: State<'_, DbState>,
) -> Result<Vec<QuizDto>, String> {
    let db = state.0.lock().map_err(|e| e.to_string())?;

    let quizzes = db
        .search_quizzes(&keyword, limit.unwrap_or(50))
        .map_err(|e| e.to_string())?;

    Ok(quizzes.iter().map(QuizDto::from_model).collect())
}

/// 按分类获取测验
#[tauri::command]
pub async fn get_quizzes_by_category(
    category: String,
    state: State<'_, DbState>,
) -> Result<Vec<QuizDto>, String> {
    let category =
        Category::parse(&category).ok_or_else(|| format!("unknown category: {}", category))?;

    let db = state.0.lock().map_err(|e| e.to_string())?;
    let quizzes = db.quizzes_by_category(category).map_err(|e| e.to_string())?;

    Ok(quizzes.iter().map(QuizDto::from_model).collect())
}

/// 获取某用户创建的测验
#[tauri::command]
pub async fn get_quizzes_by_creator(
    creator_id: String,
    state: State<'_, DbState>,
) -> Result<Vec<QuizDto>, String> {
    let db = state.0.lock().map_err(|e| e.to_string())?;

    let quizzes = db
        .quizzes_by_creator(&creator_id)
        .map_err(|e| e.to_string())?;

    Ok(quizzes.iter().map(QuizDto::from_model).collect())
}

/// 全部可选分类
#[tauri::command]
pub async fn list_categories() -> Result<Vec<String>, String> {
    Ok(Category::ALL
        .iter()
        .map(|category| category.as_str().to_string())
        .collect())
}

/// 发布新测验
#[tauri::command]
pub async fn create_quiz(quiz: NewQuizDto, state: State<'_, DbState>) -> Result<QuizDto, String> {
    let category =
        Category::parse(&quiz.category).ok_or_else(|| format!("unknown category: {}", quiz.category))?;

    let questions = build_questions(quiz.questions)?;
    if questions.len() < 10 {
        return Err("a quiz needs at least 10 questions for comprehensive analysis".to_string());
    }

    let db = state.0.lock().map_err(|e| e.to_string())?;
    let created = db
        .create_quiz(&quiz.title, &quiz.description, category, &quiz.creator_id, questions)
        .map_err(|e| e.to_string())?;

    Ok(QuizDto::from_model(&created))
}

/// 校验向导输入并编号题目；空白选项丢弃，标准答案取自唯一勾选的选项
fn build_questions(inputs: Vec<NewQuestionDto>) -> Result<Vec<Question>, String> {
    let mut questions = Vec::new();

    for (index, input) in inputs.into_iter().enumerate() {
        if input.text.trim().is_empty() {
            return Err(format!("question {} is missing its text", index + 1));
        }

        let options: Vec<QuizOption> = input
            .options
            .into_iter()
            .filter(|option| !option.text.trim().is_empty())
            .map(|option| QuizOption {
                text: option.text,
                is_correct: option.is_correct,
            })
            .collect();

        if options.len() < 2 {
            return Err(format!(
                "question {} needs at least 2 answer options",
                index + 1
            ));
        }

        let correct_answer = {
            let marked: Vec<&QuizOption> =
                options.iter().filter(|option| option.is_correct).collect();
            if marked.len() != 1 {
                return Err(format!(
                    "question {} must have exactly one correct answer",
                    index + 1
                ));
            }
            marked[0].text.clone()
        };

        questions.push(Question {
            id: format!("q{}", index + 1),
            text: input.text,
            media: input.media,
            options,
            correct_answer,
            explanation: input.explanation,
        });
    }

    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(text: &str, is_correct: bool) -> QuizOptionDto {
        QuizOptionDto {
            text: text.to_string(),
            is_correct,
        }
    }

    fn question(text: &str, options: Vec<QuizOptionDto>) -> NewQuestionDto {
        NewQuestionDto {
            text: text.to_string(),
            media: None,
            options,
            explanation: None,
        }
    }

    #[test]
    fn test_build_questions_derives_correct_answer() {
        let built = build_questions(vec![question(
            "Pick one",
            vec![option("A", false), option("B", true), option("", false)],
        )])
        .unwrap();

        assert_eq!(built.len(), 1);
        assert_eq!(built[0].id, "q1");
        assert_eq!(built[0].correct_answer, "B");
        // 空白选项被丢弃
        assert_eq!(built[0].options.len(), 2);
    }

    #[test]
    fn test_build_questions_requires_two_options() {
        let result = build_questions(vec![question("Pick one", vec![option("A", true)])]);
        assert!(result.unwrap_err().contains("at least 2"));
    }

    #[test]
    fn test_build_questions_requires_single_correct() {
        let none_marked =
            build_questions(vec![question("Pick", vec![option("A", false), option("B", false)])]);
        assert!(none_marked.unwrap_err().contains("exactly one"));

        let two_marked =
            build_questions(vec![question("Pick", vec![option("A", true), option("B", true)])]);
        assert!(two_marked.unwrap_err().contains("exactly one"));
    }
}
