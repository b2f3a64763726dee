use std::sync::Arc;

use serde::Serialize;
use shared::message::{ChangeEvent, ChangeKind};
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;

use crate::core::{Config, Result};
use crate::db::DbService;
use crate::realtime::SubscriptionRegistry;

/// 服务器状态 - 持有所有服务的单例引用
///
/// 启动时构造一次，以 axum `State` 注入到每个处理器。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | realtime | Arc<SubscriptionRegistry> | 实时订阅注册表 |
/// | shutdown | CancellationToken | 关闭信号 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据库服务
    pub db: DbService,
    /// 实时变更订阅注册表
    pub realtime: Arc<SubscriptionRegistry>,
    /// 关闭信号，WebSocket 连接据此退出
    pub shutdown: CancellationToken,
}

impl ServerState {
    pub fn new(config: Config, db: DbService) -> Self {
        let realtime = SubscriptionRegistry::new(config.realtime_channel_capacity);
        Self {
            config,
            db,
            realtime,
            shutdown: CancellationToken::new(),
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/resto.db，执行迁移)
    /// 3. 实时订阅注册表
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_path();
        let db = DbService::new(&db_path.to_string_lossy()).await?;

        tracing::info!(
            work_dir = %config.work_dir,
            environment = %config.environment,
            "Server state initialized"
        );
        Ok(Self::new(config.clone(), db))
    }

    /// 内存数据库状态 (测试用)
    pub async fn in_memory() -> Result<Self> {
        let db = DbService::in_memory().await?;
        Ok(Self::new(Config::with_overrides("/tmp/resto", 0), db))
    }

    /// 获取数据库连接池
    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    /// 广播表变更
    ///
    /// `old`/`new` 决定事件类型；两者都缺省时不发送。
    /// 返回收到事件的频道数。
    pub fn broadcast_change<T: Serialize>(
        &self,
        table: &str,
        kind: ChangeKind,
        old: Option<&T>,
        new: Option<&T>,
    ) -> usize {
        let to_value = |row: Option<&T>| row.and_then(|r| serde_json::to_value(r).ok());
        let event = match (kind, to_value(old), to_value(new)) {
            (ChangeKind::Insert, _, Some(new)) => ChangeEvent::insert(table, new),
            (ChangeKind::Update, Some(old), Some(new)) => ChangeEvent::update(table, old, new),
            (ChangeKind::Update, None, Some(new)) => {
                ChangeEvent::update(table, serde_json::Value::Null, new)
            }
            (ChangeKind::Delete, Some(old), _) => ChangeEvent::delete(table, old),
            _ => {
                tracing::debug!(table, %kind, "Change without payload, not broadcast");
                return 0;
            }
        };
        let delivered = self.realtime.publish(&event);
        tracing::debug!(table, %kind, delivered, "Change broadcast");
        delivered
    }
}
