use std::path::PathBuf;

#[cfg(target_os = "macos")]
const PLATFORM: &str = "macos";

#[cfg(target_os = "windows")]
const PLATFORM: &str = "windows";

#[cfg(target_os = "linux")]
const PLATFORM: &str = "linux";

/// 应用数据目录（可执行文件旁的 data 目录）
pub fn get_app_data_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("data")
}

pub fn get_database_path() -> PathBuf {
    get_app_data_dir().join("quixie.db")
}

pub fn get_log_path() -> PathBuf {
    get_app_data_dir().join("quixie.log")
}

pub fn get_platform() -> &'static str {
    PLATFORM
}
