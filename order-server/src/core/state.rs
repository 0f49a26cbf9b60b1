use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppError;

/// 服务器状态 - 持有配置与数据库连接池
///
/// ServerState 被克隆进每个 HTTP handler；`SqlitePool` 内部是 Arc，
/// 浅拷贝成本极低。
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (确保目录存在)
    /// 2. 数据库 (work_dir/database/comanda.db, 自动迁移)
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_dir().join("comanda.db");
        let db = DbService::new(&db_path.to_string_lossy()).await?;

        Ok(Self {
            config: config.clone(),
            pool: db.pool,
        })
    }

    /// 从已有连接池构造状态 (测试场景)
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        Self { config, pool }
    }
}
