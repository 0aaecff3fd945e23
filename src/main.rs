#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod commands;
mod models;
mod services;
mod utils;

use std::sync::Mutex;

use commands::{DbState, SessionStore};
use services::database::DatabaseService;

#[tauri::command]
fn get_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[tauri::command]
fn get_platform() -> String {
    utils::get_platform().to_string()
}

/// 初始化日志输出：标准输出 + 数据目录下的日志文件
fn setup_logging() -> Result<(), fern::InitError> {
    let log_path = utils::get_log_path();
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(std::io::stdout())
        .chain(fern::log_file(log_path)?)
        .apply()?;

    Ok(())
}

fn main() {
    if let Err(e) = setup_logging() {
        eprintln!("日志初始化失败: {}", e);
    }

    // 初始化数据库
    let db = DatabaseService::new().expect("Failed to initialize database");
    log::info!("数据库位于 {}", db.database_path().display());

    tauri::Builder::default()
        .manage(DbState(Mutex::new(db)))
        .manage(SessionStore::new())
        .invoke_handler(tauri::generate_handler![
            get_app_version,
            get_platform,
            // 会话命令
            commands::session::start_quiz_session,
            commands::session::submit_answer,
            commands::session::advance_question,
            commands::session::go_back_question,
            commands::session::get_session_snapshot,
            commands::session::abandon_session,
            // 测验命令
            commands::quiz::get_quiz,
            commands::quiz::list_quizzes,
            commands::quiz::search_quizzes,
            commands::quiz::get_quizzes_by_category,
            commands::quiz::get_quizzes_by_creator,
            commands::quiz::list_categories,
            commands::quiz::create_quiz,
            // 结果命令
            commands::result::get_result,
            commands::result::get_results_by_user,
            commands::result::get_results_by_quiz,
            // 社区命令
            commands::community::get_comments,
            commands::community::add_comment,
            commands::community::upvote_comment,
            commands::community::delete_comment,
            commands::community::create_user,
            commands::community::get_user,
            commands::community::get_user_stats,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
