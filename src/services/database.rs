// 数据存储服务模块
// 基于 SQLite 持久化测验、用户、评论与测验结果

use rusqlite::{Connection, Row};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Category, Comment, Question, Quiz, QuizResult, User, UserStats};

/// 存储层错误
///
/// NotFound 区分于其他存储故障，调用方据此决定界面提示；
/// 核心层不做重试。
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found: {1}")]
    NotFound(&'static str, String),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// 数据库服务
pub struct DatabaseService {
    pool: Arc<Mutex<Connection>>,
    db_path: PathBuf,
}

impl DatabaseService {
    /// 打开默认路径下的数据库并确保表结构存在
    pub fn new() -> Result<Self, StoreError> {
        let db_path = crate::utils::get_database_path();

        // 确保数据目录存在
        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let pool = Arc::new(Mutex::new(Connection::open(&db_path)?));
        let service = Self { pool, db_path };
        service.initialize()?;
        Ok(service)
    }

    /// 打开内存数据库（测试用）
    pub fn in_memory() -> Result<Self, StoreError> {
        let pool = Arc::new(Mutex::new(Connection::open_in_memory()?));
        let service = Self {
            pool,
            db_path: PathBuf::from(":memory:"),
        };
        service.initialize()?;
        Ok(service)
    }

    pub fn database_path(&self) -> &Path {
        &self.db_path
    }

    /// 初始化数据库表结构
    pub fn initialize(&self) -> Result<(), StoreError> {
        let conn = self.pool.lock().unwrap();

        // 用户表
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL,
                avatar TEXT,
                quizzes_taken INTEGER NOT NULL DEFAULT 0,
                quizzes_created INTEGER NOT NULL DEFAULT 0,
                total_points INTEGER NOT NULL DEFAULT 0,
                average_score REAL NOT NULL DEFAULT 0,
                joined_at TEXT NOT NULL
            )",
            [],
        )?;

        // 测验表
        conn.execute(
            "CREATE TABLE IF NOT EXISTS quizzes (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                creator_id TEXT NOT NULL,
                participant_count INTEGER NOT NULL DEFAULT 0,
                average_score REAL NOT NULL DEFAULT 0,
                questions TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (creator_id) REFERENCES users(id)
            )",
            [],
        )?;

        // 结果表
        conn.execute(
            "CREATE TABLE IF NOT EXISTS results (
                id TEXT PRIMARY KEY,
                quiz_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                score INTEGER NOT NULL,
                total_questions INTEGER NOT NULL,
                answers TEXT NOT NULL,
                analysis TEXT NOT NULL,
                completed_at TEXT NOT NULL,
                FOREIGN KEY (quiz_id) REFERENCES quizzes(id)
            )",
            [],
        )?;

        // 评论表
        conn.execute(
            "CREATE TABLE IF NOT EXISTS comments (
                id TEXT PRIMARY KEY,
                quiz_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                username TEXT NOT NULL,
                content TEXT NOT NULL,
                upvotes INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                FOREIGN KEY (quiz_id) REFERENCES quizzes(id)
            )",
            [],
        )?;

        // 创建索引优化查询性能
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_quizzes_category ON quizzes(category)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_quizzes_creator ON quizzes(creator_id)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_results_quiz_id ON results(quiz_id)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_results_user_id ON results(user_id)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_comments_quiz_id ON comments(quiz_id)",
            [],
        )?;

        Ok(())
    }

    // ==================== 测验管理 ====================

    /// 创建测验
    pub fn create_quiz(
        &self,
        title: &str,
        description: &str,
        category: Category,
        creator_id: &str,
        questions: Vec<Question>,
    ) -> Result<Quiz, StoreError> {
        let quiz = Quiz {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: description.to_string(),
            category,
            creator_id: creator_id.to_string(),
            participant_count: 0,
            average_score: 0.0,
            questions,
            created_at: Utc::now(),
        };
        let questions_json = serde_json::to_string(&quiz.questions)?;

        let conn = self.pool.lock().unwrap();
        conn.execute(
            "INSERT INTO quizzes
             (id, title, description, category, creator_id, participant_count,
              average_score, questions, created_at)
             VALUES (?, ?, ?, ?, ?, 0, 0, ?, ?)",
            rusqlite::params![
                quiz.id,
                quiz.title,
                quiz.description,
                quiz.category.as_str(),
                quiz.creator_id,
                questions_json,
                quiz.created_at.to_rfc3339(),
            ],
        )?;

        // 更新创建者统计
        conn.execute(
            "UPDATE users SET quizzes_created = quizzes_created + 1 WHERE id = ?",
            rusqlite::params![quiz.creator_id],
        )?;

        Ok(quiz)
    }

    /// 获取测验
    pub fn get_quiz(&self, id: &str) -> Result<Quiz, StoreError> {
        let conn = self.pool.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, title, description, category, creator_id, participant_count,
                    average_score, questions, created_at
             FROM quizzes WHERE id = ?",
        )?;
        let mut rows = stmt.query(rusqlite::params![id])?;

        if let Some(row) = rows.next()? {
            Ok(Self::row_to_quiz(row)?)
        } else {
            Err(StoreError::NotFound("quiz", id.to_string()))
        }
    }

    /// 列出所有测验
    pub fn list_quizzes(&self) -> Result<Vec<Quiz>, StoreError> {
        let conn = self.pool.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, title, description, category, creator_id, participant_count,
                    average_score, questions, created_at
             FROM quizzes ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map([], |row| Self::row_to_quiz(row))?;

        let mut quizzes = Vec::new();
        for row in rows {
            quizzes.push(row?);
        }
        Ok(quizzes)
    }

    /// 按分类获取测验
    pub fn quizzes_by_category(&self, category: Category) -> Result<Vec<Quiz>, StoreError> {
        let conn = self.pool.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, title, description, category, creator_id, participant_count,
                    average_score, questions, created_at
             FROM quizzes WHERE category = ? ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map(rusqlite::params![category.as_str()], |row| {
            Self::row_to_quiz(row)
        })?;

        let mut quizzes = Vec::new();
        for row in rows {
            quizzes.push(row?);
        }
        Ok(quizzes)
    }

    /// 获取某用户创建的测验
    pub fn quizzes_by_creator(&self, creator_id: &str) -> Result<Vec<Quiz>, StoreError> {
        let conn = self.pool.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, title, description, category, creator_id, participant_count,
                    average_score, questions, created_at
             FROM quizzes WHERE creator_id = ? ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map(rusqlite::params![creator_id], |row| Self::row_to_quiz(row))?;

        let mut quizzes = Vec::new();
        for row in rows {
            quizzes.push(row?);
        }
        Ok(quizzes)
    }

    /// 按关键词搜索测验（标题、描述、分类）
    pub fn search_quizzes(&self, keyword: &str, limit: i32) -> Result<Vec<Quiz>, StoreError> {
        let conn = self.pool.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, title, description, category, creator_id, participant_count,
                    average_score, questions, created_at
             FROM quizzes
             WHERE title LIKE ? OR description LIKE ? OR category LIKE ?
             ORDER BY created_at DESC LIMIT ?",
        )?;

        let pattern = format!("%{}%", keyword);
        let rows = stmt.query_map(
            rusqlite::params![pattern, pattern, pattern, limit],
            |row| Self::row_to_quiz(row),
        )?;

        let mut quizzes = Vec::new();
        for row in rows {
            quizzes.push(row?);
        }
        Ok(quizzes)
    }

    // ==================== 测验结果 ====================

    /// 持久化一次会话的最终结果并分配标识
    ///
    /// 同时累计测验的参与人数与平均分、作答者的答题统计。
    pub fn create_result(&self, result: &QuizResult) -> Result<QuizResult, StoreError> {
        let mut stored = result.clone();
        stored.id = Uuid::new_v4().to_string();
        let answers_json = serde_json::to_string(&stored.answers)?;

        let percentage = if stored.total_questions > 0 {
            stored.score as f64 / stored.total_questions as f64 * 100.0
        } else {
            0.0
        };

        let conn = self.pool.lock().unwrap();
        conn.execute(
            "INSERT INTO results
             (id, quiz_id, user_id, score, total_questions, answers, analysis, completed_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            rusqlite::params![
                stored.id,
                stored.quiz_id,
                stored.user_id,
                stored.score,
                stored.total_questions,
                answers_json,
                stored.analysis,
                stored.completed_at.to_rfc3339(),
            ],
        )?;

        // SET 表达式按旧行值求值，滚动平均在单条语句内完成
        conn.execute(
            "UPDATE quizzes SET
                average_score = (average_score * participant_count + ?) / (participant_count + 1),
                participant_count = participant_count + 1
             WHERE id = ?",
            rusqlite::params![percentage, stored.quiz_id],
        )?;
        conn.execute(
            "UPDATE users SET
                average_score = (average_score * quizzes_taken + ?) / (quizzes_taken + 1),
                quizzes_taken = quizzes_taken + 1,
                total_points = total_points + ?
             WHERE id = ?",
            rusqlite::params![percentage, stored.score as i64 * 10, stored.user_id],
        )?;

        Ok(stored)
    }

    /// 获取结果
    pub fn get_result(&self, id: &str) -> Result<QuizResult, StoreError> {
        let conn = self.pool.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, quiz_id, user_id, score, total_questions, answers, analysis, completed_at
             FROM results WHERE id = ?",
        )?;
        let mut rows = stmt.query(rusqlite::params![id])?;

        if let Some(row) = rows.next()? {
            Ok(Self::row_to_result(row)?)
        } else {
            Err(StoreError::NotFound("result", id.to_string()))
        }
    }

    /// 获取某用户的全部结果
    pub fn results_by_user(&self, user_id: &str) -> Result<Vec<QuizResult>, StoreError> {
        let conn = self.pool.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, quiz_id, user_id, score, total_questions, answers, analysis, completed_at
             FROM results WHERE user_id = ? ORDER BY completed_at DESC",
        )?;
        let rows = stmt.query_map(rusqlite::params![user_id], |row| Self::row_to_result(row))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    /// 获取某测验下的全部结果
    pub fn results_by_quiz(&self, quiz_id: &str) -> Result<Vec<QuizResult>, StoreError> {
        let conn = self.pool.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, quiz_id, user_id, score, total_questions, answers, analysis, completed_at
             FROM results WHERE quiz_id = ? ORDER BY completed_at DESC",
        )?;
        let rows = stmt.query_map(rusqlite::params![quiz_id], |row| Self::row_to_result(row))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    // ==================== 用户 ====================

    /// 创建用户
    pub fn create_user(&self, username: &str, avatar: Option<&str>) -> Result<User, StoreError> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            avatar: avatar.map(|a| a.to_string()),
            quizzes_taken: 0,
            quizzes_created: 0,
            total_points: 0,
            average_score: 0.0,
            joined_at: Utc::now(),
        };

        let conn = self.pool.lock().unwrap();
        conn.execute(
            "INSERT INTO users
             (id, username, avatar, quizzes_taken, quizzes_created, total_points,
              average_score, joined_at)
             VALUES (?, ?, ?, 0, 0, 0, 0, ?)",
            rusqlite::params![user.id, user.username, user.avatar, user.joined_at.to_rfc3339()],
        )?;

        Ok(user)
    }

    /// 获取用户
    pub fn get_user(&self, id: &str) -> Result<User, StoreError> {
        let conn = self.pool.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, username, avatar, quizzes_taken, quizzes_created, total_points,
                    average_score, joined_at
             FROM users WHERE id = ?",
        )?;
        let mut rows = stmt.query(rusqlite::params![id])?;

        if let Some(row) = rows.next()? {
            Ok(Self::row_to_user(row)?)
        } else {
            Err(StoreError::NotFound("user", id.to_string()))
        }
    }

    /// 获取用户统计快照
    pub fn get_user_stats(&self, id: &str) -> Result<UserStats, StoreError> {
        let user = self.get_user(id)?;
        Ok(UserStats {
            quizzes_taken: user.quizzes_taken,
            quizzes_created: user.quizzes_created,
            total_points: user.total_points,
            average_score: user.average_score,
        })
    }

    // ==================== 评论 ====================

    /// 获取某测验下的评论，按时间倒序
    pub fn comments_by_quiz(&self, quiz_id: &str) -> Result<Vec<Comment>, StoreError> {
        let conn = self.pool.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, quiz_id, user_id, username, content, upvotes, created_at
             FROM comments WHERE quiz_id = ? ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map(rusqlite::params![quiz_id], |row| Self::row_to_comment(row))?;

        let mut comments = Vec::new();
        for row in rows {
            comments.push(row?);
        }
        Ok(comments)
    }

    /// 发表评论
    pub fn add_comment(
        &self,
        quiz_id: &str,
        user_id: &str,
        content: &str,
    ) -> Result<Comment, StoreError> {
        // 先取用户名快照，再持有连接锁
        let user = self.get_user(user_id)?;

        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            user_id: user_id.to_string(),
            username: user.username,
            content: content.to_string(),
            upvotes: 0,
            created_at: Utc::now(),
        };

        let conn = self.pool.lock().unwrap();
        conn.execute(
            "INSERT INTO comments (id, quiz_id, user_id, username, content, upvotes, created_at)
             VALUES (?, ?, ?, ?, ?, 0, ?)",
            rusqlite::params![
                comment.id,
                comment.quiz_id,
                comment.user_id,
                comment.username,
                comment.content,
                comment.created_at.to_rfc3339(),
            ],
        )?;

        Ok(comment)
    }

    /// 点赞评论，返回更新后的评论
    pub fn upvote_comment(&self, id: &str) -> Result<Comment, StoreError> {
        let conn = self.pool.lock().unwrap();

        let updated = conn.execute(
            "UPDATE comments SET upvotes = upvotes + 1 WHERE id = ?",
            rusqlite::params![id],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound("comment", id.to_string()));
        }

        let mut stmt = conn.prepare(
            "SELECT id, quiz_id, user_id, username, content, upvotes, created_at
             FROM comments WHERE id = ?",
        )?;
        let comment = stmt.query_row(rusqlite::params![id], |row| Self::row_to_comment(row))?;
        Ok(comment)
    }

    /// 删除评论
    pub fn delete_comment(&self, id: &str) -> Result<(), StoreError> {
        let conn = self.pool.lock().unwrap();

        let deleted = conn.execute("DELETE FROM comments WHERE id = ?", rusqlite::params![id])?;
        if deleted == 0 {
            return Err(StoreError::NotFound("comment", id.to_string()));
        }
        Ok(())
    }

    // ==================== 辅助方法 ====================

    /// 从数据库行转换为 Quiz
    fn row_to_quiz(row: &Row) -> Result<Quiz, rusqlite::Error> {
        Ok(Quiz {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            category: parse_category(3, row.get(3)?)?,
            creator_id: row.get(4)?,
            participant_count: row.get(5)?,
            average_score: row.get(6)?,
            questions: parse_json(7, row.get(7)?)?,
            created_at: parse_timestamp(8, row.get(8)?)?,
        })
    }

    /// 从数据库行转换为 QuizResult
    fn row_to_result(row: &Row) -> Result<QuizResult, rusqlite::Error> {
        Ok(QuizResult {
            id: row.get(0)?,
            quiz_id: row.get(1)?,
            user_id: row.get(2)?,
            score: row.get(3)?,
            total_questions: row.get(4)?,
            answers: parse_json(5, row.get(5)?)?,
            analysis: row.get(6)?,
            completed_at: parse_timestamp(7, row.get(7)?)?,
        })
    }

    /// 从数据库行转换为 User
    fn row_to_user(row: &Row) -> Result<User, rusqlite::Error> {
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            avatar: row.get(2)?,
            quizzes_taken: row.get(3)?,
            quizzes_created: row.get(4)?,
            total_points: row.get(5)?,
            average_score: row.get(6)?,
            joined_at: parse_timestamp(7, row.get(7)?)?,
        })
    }

    /// 从数据库行转换为 Comment
    fn row_to_comment(row: &Row) -> Result<Comment, rusqlite::Error> {
        Ok(Comment {
            id: row.get(0)?,
            quiz_id: row.get(1)?,
            user_id: row.get(2)?,
            username: row.get(3)?,
            content: row.get(4)?,
            upvotes: row.get(5)?,
            created_at: parse_timestamp(6, row.get(6)?)?,
        })
    }
}

fn parse_timestamp(index: usize, value: String) -> Result<DateTime<Utc>, rusqlite::Error> {
    value.parse::<DateTime<Utc>>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_json<T: serde::de::DeserializeOwned>(
    index: usize,
    value: String,
) -> Result<T, rusqlite::Error> {
    serde_json::from_str(&value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_category(index: usize, value: String) -> Result<Category, rusqlite::Error> {
    Category::parse(&value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            rusqlite::types::Type::Text,
            format!("unknown category: {}", value).into(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuizOption;

    fn sample_questions(count: usize) -> Vec<Question> {
        (1..=count)
            .map(|i| Question {
                id: format!("q{}", i),
                text: format!("Question {}", i),
                media: None,
                options: vec![
                    QuizOption {
                        text: "Yes".to_string(),
                        is_correct: true,
                    },
                    QuizOption {
                        text: "No".to_string(),
                        is_correct: false,
                    },
                ],
                correct_answer: "Yes".to_string(),
                explanation: None,
            })
            .collect()
    }

    fn sample_result(quiz_id: &str, user_id: &str) -> QuizResult {
        QuizResult {
            id: String::new(),
            quiz_id: quiz_id.to_string(),
            user_id: user_id.to_string(),
            score: 2,
            total_questions: 4,
            answers: vec![correct_record(), timed_out_record()],
            analysis: "Your responses reveal balanced thinking patterns.".to_string(),
            completed_at: Utc::now(),
        }
    }

    fn correct_record() -> crate::models::AnswerRecord {
        crate::models::AnswerRecord {
            question_id: "q1".to_string(),
            selected_answer: Some("Yes".to_string()),
            correct: true,
            correct_answer: "Yes".to_string(),
        }
    }

    fn timed_out_record() -> crate::models::AnswerRecord {
        crate::models::AnswerRecord {
            question_id: "q2".to_string(),
            selected_answer: None,
            correct: false,
            correct_answer: "Yes".to_string(),
        }
    }

    #[test]
    fn test_quiz_roundtrip() {
        let db = DatabaseService::in_memory().unwrap();
        let creator = db.create_user("QuizMaster2024", None).unwrap();

        let created = db
            .create_quiz(
                "Which Dragon Rider Are You",
                "Find your inner rider",
                Category::Personality,
                &creator.id,
                sample_questions(3),
            )
            .unwrap();

        let loaded = db.get_quiz(&created.id).unwrap();
        assert_eq!(loaded, created);
        assert_eq!(loaded.questions.len(), 3);
        assert_eq!(loaded.questions[0].correct_answer, "Yes");

        let all = db.list_quizzes().unwrap();
        assert_eq!(all.len(), 1);

        let by_category = db.quizzes_by_category(Category::Personality).unwrap();
        assert_eq!(by_category.len(), 1);
        assert!(db.quizzes_by_category(Category::Trivia).unwrap().is_empty());

        let by_creator = db.quizzes_by_creator(&creator.id).unwrap();
        assert_eq!(by_creator.len(), 1);

        let found = db.search_quizzes("dragon", 10).unwrap();
        assert_eq!(found.len(), 1);
        assert!(db.search_quizzes("unicorn", 10).unwrap().is_empty());

        // 创建者统计被更新
        let stats = db.get_user_stats(&creator.id).unwrap();
        assert_eq!(stats.quizzes_created, 1);
    }

    #[test]
    fn test_get_missing_quiz_is_not_found() {
        let db = DatabaseService::in_memory().unwrap();
        match db.get_quiz("nope") {
            Err(StoreError::NotFound(kind, id)) => {
                assert_eq!(kind, "quiz");
                assert_eq!(id, "nope");
            }
            other => panic!("expected NotFound, got {:?}", other.map(|q| q.id)),
        }
    }

    #[test]
    fn test_create_result_assigns_id_and_updates_stats() {
        let db = DatabaseService::in_memory().unwrap();
        let creator = db.create_user("Maker", None).unwrap();
        let taker = db.create_user("Taker", None).unwrap();
        let quiz = db
            .create_quiz(
                "Music Through the Decades",
                "Name that tune",
                Category::Trivia,
                &creator.id,
                sample_questions(4),
            )
            .unwrap();

        let stored = db.create_result(&sample_result(&quiz.id, &taker.id)).unwrap();
        assert!(!stored.id.is_empty());

        let loaded = db.get_result(&stored.id).unwrap();
        assert_eq!(loaded, stored);
        assert_eq!(loaded.answers.len(), 2);
        assert_eq!(loaded.answers[1].selected_answer, None);

        let updated_quiz = db.get_quiz(&quiz.id).unwrap();
        assert_eq!(updated_quiz.participant_count, 1);
        assert!((updated_quiz.average_score - 50.0).abs() < f64::EPSILON);

        let stats = db.get_user_stats(&taker.id).unwrap();
        assert_eq!(stats.quizzes_taken, 1);
        assert_eq!(stats.total_points, 20);
        assert!((stats.average_score - 50.0).abs() < f64::EPSILON);

        assert_eq!(db.results_by_user(&taker.id).unwrap().len(), 1);
        assert_eq!(db.results_by_quiz(&quiz.id).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_result_is_not_found() {
        let db = DatabaseService::in_memory().unwrap();
        assert!(matches!(
            db.get_result("missing"),
            Err(StoreError::NotFound("result", _))
        ));
    }

    #[test]
    fn test_comment_flow() {
        let db = DatabaseService::in_memory().unwrap();
        let creator = db.create_user("Maker", None).unwrap();
        let quiz = db
            .create_quiz(
                "Spot the Red Flag",
                "Relationship check",
                Category::LoveAndRelationships,
                &creator.id,
                sample_questions(2),
            )
            .unwrap();

        let comment = db.add_comment(&quiz.id, &creator.id, "Loved this one!").unwrap();
        assert_eq!(comment.username, "Maker");
        assert_eq!(comment.upvotes, 0);

        let listed = db.comments_by_quiz(&quiz.id).unwrap();
        assert_eq!(listed.len(), 1);

        let upvoted = db.upvote_comment(&comment.id).unwrap();
        assert_eq!(upvoted.upvotes, 1);

        db.delete_comment(&comment.id).unwrap();
        assert!(matches!(
            db.delete_comment(&comment.id),
            Err(StoreError::NotFound("comment", _))
        ));

        // 评论者必须存在
        assert!(matches!(
            db.add_comment(&quiz.id, "ghost", "hello"),
            Err(StoreError::NotFound("user", _))
        ));
    }
}
