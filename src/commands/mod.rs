// Tauri 命令模块
// 提供供前端调用的命令接口

pub mod community;
pub mod quiz;
pub mod result;
pub mod session;

pub use session::{
    abandon_session,
    advance_question,
    get_session_snapshot,
    go_back_question,
    start_quiz_session,
    submit_answer,
    AnswerRecordDto,
    SessionSnapshotDto,
    SessionStore,
};

pub use quiz::{
    create_quiz,
    get_quiz,
    get_quizzes_by_category,
    get_quizzes_by_creator,
    list_categories,
    list_quizzes,
    search_quizzes,
    DbState,
    NewQuestionDto,
    NewQuizDto,
    QuestionDto,
    QuizDto,
    QuizOptionDto,
};

pub use result::{get_result, get_results_by_quiz, get_results_by_user, ResultDto};

pub use community::{
    add_comment,
    create_user,
    delete_comment,
    get_comments,
    get_user,
    get_user_stats,
    upvote_comment,
    CommentDto,
    UserDto,
    UserStatsDto,
};
