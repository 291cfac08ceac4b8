use std::sync::Arc;

use tracing::info;

use shared::models::{
    Order, OrderCount, OrderStatus, PlatformStats, Principal, Review, ReviewCreate, UserRole,
};

use crate::accounts::AccountDirectory;
use crate::catalog::CatalogStore;
use crate::core::Config;
use crate::orders::OrderLedger;
use crate::reviews::ReviewLedger;
use crate::stats::StatsAggregator;
use crate::utils::{AppError, AppResult, ErrorCode};

/// 应用状态 - 持有所有存储的单例引用
///
/// AppState 是核心引擎的根数据结构，持有所有存储的共享引用。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 存储组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | accounts | Arc<AccountDirectory> | 用户与资料目录 |
/// | catalog | Arc<CatalogStore> | 商品目录 |
/// | orders | Arc<OrderLedger> | 订单账本 |
/// | reviews | Arc<ReviewLedger> | 评价账本 |
/// | stats | Arc<StatsAggregator> | 平台统计 |
///
/// Cross-store operations (order placement, offer deletion, review
/// submission against a business user) live here so the catalog-first
/// lock order is upheld in one place.
#[derive(Clone)]
pub struct AppState {
    /// 应用配置
    pub config: Config,
    /// 本次进程的实例标识；状态仅存于内存，重启即清空
    pub epoch: String,
    /// 用户与资料目录
    pub accounts: Arc<AccountDirectory>,
    /// 商品目录
    pub catalog: Arc<CatalogStore>,
    /// 订单账本
    pub orders: Arc<OrderLedger>,
    /// 评价账本
    pub reviews: Arc<ReviewLedger>,
    /// 平台统计
    pub stats: Arc<StatsAggregator>,
}

impl AppState {
    /// 初始化应用状态
    pub fn initialize(config: &Config) -> Self {
        let epoch = uuid::Uuid::new_v4().to_string();
        let accounts = Arc::new(AccountDirectory::new());
        let catalog = Arc::new(CatalogStore::new());
        let orders = Arc::new(OrderLedger::new());
        let reviews = Arc::new(ReviewLedger::new());
        let stats = Arc::new(StatsAggregator::new(
            accounts.clone(),
            catalog.clone(),
            reviews.clone(),
        ));

        info!(epoch = %epoch, environment = %config.environment, "core state initialized");

        Self {
            config: config.clone(),
            epoch,
            accounts,
            catalog,
            orders,
            reviews,
            stats,
        }
    }

    /// 下单 (快照当前报价详情)
    pub fn place_order(&self, principal: &Principal, offer_detail_id: i64) -> AppResult<Order> {
        self.orders
            .place_order(&self.catalog, principal, offer_detail_id)
    }

    /// 删除报价
    ///
    /// 仍被未完结订单引用的报价拒绝删除 (OfferInUse)
    pub fn delete_offer(&self, principal: &Principal, offer_id: i64) -> AppResult<()> {
        self.catalog.delete_offer(principal, offer_id, || {
            self.orders.has_active_for_offer(offer_id)
        })
    }

    /// 提交评价
    ///
    /// 被评价方必须是已注册的商家用户
    pub fn create_review(&self, principal: &Principal, payload: ReviewCreate) -> AppResult<Review> {
        let target = self.accounts.get_user(payload.business_user_id)?;
        if target.role != UserRole::Business {
            return Err(AppError::with_message(
                ErrorCode::ValidationFailed,
                "reviews can only target business users",
            )
            .with_detail("business_user_id", payload.business_user_id));
        }
        self.reviews.create_review(principal, payload)
    }

    /// 商家进行中订单数
    pub fn in_progress_order_count(&self, business_user_id: i64) -> AppResult<OrderCount> {
        self.business_order_count(business_user_id, OrderStatus::InProgress)
    }

    /// 商家已完成订单数
    pub fn completed_order_count(&self, business_user_id: i64) -> AppResult<OrderCount> {
        self.business_order_count(business_user_id, OrderStatus::Completed)
    }

    fn business_order_count(
        &self,
        business_user_id: i64,
        status: OrderStatus,
    ) -> AppResult<OrderCount> {
        let user = self.accounts.get_user(business_user_id)?;
        if user.role != UserRole::Business {
            return Err(AppError::new(ErrorCode::UserNotFound)
                .with_detail("user_id", business_user_id)
                .with_detail("required_role", "business"));
        }
        Ok(OrderCount {
            order_count: self.orders.count_for_business(business_user_id, status),
        })
    }

    /// 平台统计快照
    pub fn platform_stats(&self) -> PlatformStats {
        self.stats.platform_stats()
    }
}
