//! Comanda Order Server - 餐厅点餐平台服务端
//!
//! # 架构概述
//!
//! 本模块是订单服务的主入口，提供以下核心功能：
//!
//! - **订单引擎** (`orders`): 购物车准入、下单事务、状态机与库存补偿
//! - **数据库** (`db`): 嵌入式 SQLite 存储 (sqlx, WAL)
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! order-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (连接池 + 仓储)
//! ├── orders/        # 订单事务引擎
//! └── utils/         # 错误、日志等工具
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env` and initialize logging. Call once at process start.
pub fn setup_environment() {
    let _ = dotenv::dotenv();
    let level = std::env::var("LOG_LEVEL").ok();
    init_logger_with_file(level.as_deref(), std::env::var("LOG_DIR").ok().as_deref());
}

pub fn print_banner() {
    println!(
        r#"
   _________  ____ ___  ____ _____  ____/ /___ _
  / ___/ __ \/ __ `__ \/ __ `/ __ \/ __  / __ `/
 / /__/ /_/ / / / / / / /_/ / / / / /_/ / /_/ /
 \___/\____/_/ /_/ /_/\__,_/_/ /_/\__,_/\__,_/
    "#
    );
}
