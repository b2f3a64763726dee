//! Resto Server - 餐厅管理与在线预订服务端
//!
//! # 架构概述
//!
//! - **数据库** (`db`): SQLite (sqlx) 连接池、迁移和各表仓储
//! - **菜单日历** (`calendar`): 菜单排期分类与日历事件展开
//! - **预订** (`booking`): 例外解析、15 分钟时间格生成、预订向导与事务内容量检查
//! - **实时** (`realtime`): 按 (表, 过滤条件) 共享的变更订阅注册表
//! - **HTTP API** (`api`): 看板 CRUD、公开预订接口、WebSocket
//!
//! # 模块结构
//!
//! ```text
//! resto-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── routes/        # 路由组装与中间件栈
//! ├── middleware/    # 请求日志
//! ├── calendar/      # 菜单日历
//! ├── booking/       # 预订核心逻辑
//! ├── realtime/      # 变更订阅
//! ├── db/            # 数据库层
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod booking;
pub mod calendar;
pub mod core;
pub mod db;
pub mod middleware;
pub mod realtime;
pub mod routes;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerError, ServerState};
pub use routes::{build_app, build_router};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境
///
/// 1. 加载 `.env` (不存在时忽略)
/// 2. 读取配置并创建工作目录
/// 3. 初始化日志 (控制台或 `{work_dir}/logs` 按日滚动文件)
pub fn setup_environment() -> Result<Config, ServerError> {
    let _ = dotenv::dotenv();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let log_dir = config.log_dir();
    let log_dir = if config.is_production() {
        log_dir.to_str()
    } else {
        None
    };
    init_logger_with_file(Some(&config.log_level), Some(config.log_json), log_dir);

    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    ____            __
   / __ \___  _____/ /_____
  / /_/ / _ \/ ___/ __/ __ \
 / _, _/  __(__  ) /_/ /_/ /
/_/ |_|\___/____/\__/\____/
    "#
    );
}
