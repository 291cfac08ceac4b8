//! Marketplace core engine
//!
//! Business-logic core of a freelancer marketplace: service offers with
//! three pricing tiers, snapshot-based orders with a small status state
//! machine, one-review-per-pair ratings and on-demand platform statistics.
//! Authentication, HTTP routing and durable persistence are external
//! collaborators; the core consumes an already-resolved [`Principal`] per
//! request and exposes the mutation/query surface below.
//!
//! # Module structure
//!
//! ```text
//! market-core/src/
//! ├── core/          # 配置、应用状态
//! ├── policy/        # 访问策略 (pure role/ownership checks)
//! ├── accounts/      # 用户与资料目录
//! ├── catalog/       # Offer 商品目录 (3 pricing tiers)
//! ├── orders/        # 订单账本 (snapshot on write)
//! ├── reviews/       # 评价账本 (unique per pair)
//! ├── stats/         # 平台统计聚合
//! └── utils/         # 日志、校验工具
//! ```
//!
//! [`Principal`]: shared::models::Principal

pub mod accounts;
pub mod catalog;
pub mod core;
pub mod orders;
pub mod policy;
pub mod reviews;
pub mod stats;
pub mod utils;

// Re-export public types
pub use accounts::AccountDirectory;
pub use catalog::CatalogStore;
pub use crate::core::{AppState, Config};
pub use orders::OrderLedger;
pub use policy::{Action, can_perform};
pub use reviews::ReviewLedger;
pub use stats::StatsAggregator;

// Re-export unified error types from shared
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
