// 数据模型模块
// 定义测验、题目、答题记录、结果、用户与评论等共享数据结构

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 测验分类（固定集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Personality,
    Trivia,
    #[serde(rename = "Pop Culture")]
    PopCulture,
    Hypotheticals,
    #[serde(rename = "General Knowledge")]
    GeneralKnowledge,
    Books,
    #[serde(rename = "Love and Relationships")]
    LoveAndRelationships,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Personality,
        Category::Trivia,
        Category::PopCulture,
        Category::Hypotheticals,
        Category::GeneralKnowledge,
        Category::Books,
        Category::LoveAndRelationships,
    ];

    /// 分类的展示名，同时也是数据库中的存储值
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Personality => "Personality",
            Category::Trivia => "Trivia",
            Category::PopCulture => "Pop Culture",
            Category::Hypotheticals => "Hypotheticals",
            Category::GeneralKnowledge => "General Knowledge",
            Category::Books => "Books",
            Category::LoveAndRelationships => "Love and Relationships",
        }
    }

    /// 从存储值解析分类
    pub fn parse(value: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.as_str() == value)
    }
}

/// 题目选项；is_correct 由创建向导写入，判定时以 Question.correct_answer 为准
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOption {
    pub text: String,
    pub is_correct: bool,
}

/// 题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub media: Option<String>,
    pub options: Vec<QuizOption>,
    pub correct_answer: String,
    pub explanation: Option<String>,
}

/// 测验；载入会话后不再变更
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub creator_id: String,
    pub participant_count: i64,
    pub average_score: f64,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
}

/// 答题记录：一道题在一次会话中的最终结果，创建后不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: String,
    pub selected_answer: Option<String>, // None 表示超时未作答
    pub correct: bool,
    pub correct_answer: String, // 判定时快照，题库后续变更不影响展示
}

/// 一次完整会话的最终结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    pub id: String,
    pub quiz_id: String,
    pub user_id: String,
    pub score: u32,
    pub total_questions: u32,
    pub answers: Vec<AnswerRecord>,
    pub analysis: String,
    pub completed_at: DateTime<Utc>,
}

/// 用户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub avatar: Option<String>,
    pub quizzes_taken: i64,
    pub quizzes_created: i64,
    pub total_points: i64,
    pub average_score: f64,
    pub joined_at: DateTime<Utc>,
}

/// 用户统计快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub quizzes_taken: i64,
    pub quizzes_created: i64,
    pub total_points: i64,
    pub average_score: f64,
}

/// 测验下的评论
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub quiz_id: String,
    pub user_id: String,
    pub username: String,
    pub content: String,
    pub upvotes: i64,
    pub created_at: DateTime<Utc>,
}
