use std::path::{Path, PathBuf};

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/resto | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_PATH | {WORK_DIR}/database/resto.db | SQLite 数据库文件 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志输出 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | REALTIME_CHANNEL_CAPACITY | 256 | 实时频道缓冲大小 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/resto HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 数据库路径覆盖 (None 时使用工作目录下的默认路径)
    pub database_path: Option<String>,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别
    pub log_level: String,
    /// 是否输出 JSON 日志
    pub log_json: bool,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// 每个订阅频道的缓冲大小
    pub realtime_channel_capacity: usize,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/resto".into()),
            http_port: env_parse("HTTP_PORT", 3000),
            database_path: std::env::var("DATABASE_PATH").ok().filter(|p| !p.is_empty()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_parse("LOG_JSON", false),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS", 30000),
            realtime_channel_capacity: env_parse(
                "REALTIME_CHANNEL_CAPACITY",
                crate::realtime::DEFAULT_CHANNEL_CAPACITY,
            ),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config.database_path = None;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// SQLite 数据库文件路径
    pub fn database_path(&self) -> PathBuf {
        match &self.database_path {
            Some(path) => PathBuf::from(path),
            None => Path::new(&self.work_dir).join("database").join("resto.db"),
        }
    }

    /// 日志目录
    pub fn log_dir(&self) -> PathBuf {
        Path::new(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    ///
    /// ```text
    /// {work_dir}/
    /// ├── database/
    /// └── logs/
    /// ```
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(Path::new(&self.work_dir).join("database"))?;
        std::fs::create_dir_all(self.log_dir())?;
        if let Some(parent) = self.database_path().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_follow_work_dir() {
        let config = Config::with_overrides("/tmp/resto-test", 4000);
        assert_eq!(config.http_port, 4000);
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/resto-test/database/resto.db")
        );
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/resto-test/logs"));
    }

    #[test]
    fn test_explicit_database_path() {
        let mut config = Config::with_overrides("/tmp/resto-test", 4000);
        config.database_path = Some("/srv/resto.db".into());
        assert_eq!(config.database_path(), PathBuf::from("/srv/resto.db"));
    }

    #[test]
    fn test_ensure_work_dir_structure() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_overrides(dir.path().to_string_lossy(), 4000);
        config.ensure_work_dir_structure().unwrap();
        assert!(dir.path().join("database").is_dir());
        assert!(dir.path().join("logs").is_dir());
    }
}
