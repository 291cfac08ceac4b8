//! Order ledger
//!
//! Orders snapshot the chosen offer detail at placement time; later
//! catalog edits never leak into placed orders. Status follows a small
//! state machine: `in_progress` may move to `completed` or `cancelled`,
//! both of which are terminal.
//!
//! Lock ordering: placement runs inside the catalog's read lock (see
//! [`CatalogStore::with_detail`]) and takes this ledger's write lock
//! second, never the other way around.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use parking_lot::RwLock;
use tracing::info;

use shared::models::{Order, OrderStatus, Principal};
use shared::now_ms;

use crate::catalog::CatalogStore;
use crate::policy::{Action, can_perform};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Order store
pub struct OrderLedger {
    inner: RwLock<HashMap<i64, Order>>,
    next_id: AtomicI64,
}

impl Default for OrderLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderLedger {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Place an order for one offer detail.
    ///
    /// The snapshot is copied while the catalog read lock is held, so a
    /// concurrent offer delete can never race a placement into a dangling
    /// reference.
    pub fn place_order(
        &self,
        catalog: &CatalogStore,
        principal: &Principal,
        offer_detail_id: i64,
    ) -> AppResult<Order> {
        if !can_perform(principal, Action::PlaceOrder, None) {
            return Err(AppError::with_message(
                ErrorCode::RoleRequired,
                "only customers can place orders",
            )
            .with_detail("required_role", "customer"));
        }

        catalog.with_detail(offer_detail_id, |offer, detail| {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            let now = now_ms();
            let order = Order {
                id,
                customer_user_id: principal.user_id,
                business_user_id: offer.user_id,
                offer_id: offer.id,
                offer_detail_id: detail.id,
                title: detail.title.clone(),
                revisions: detail.revisions,
                delivery_time_in_days: detail.delivery_time_in_days,
                price: detail.price,
                features: detail.features.clone(),
                offer_type: detail.offer_type,
                status: OrderStatus::InProgress,
                created_at: now,
                updated_at: now,
            };

            self.inner.write().insert(id, order.clone());
            info!(
                order_id = id,
                customer = principal.user_id,
                business = offer.user_id,
                offer_detail_id,
                "order placed"
            );
            Ok(order)
        })
    }

    pub fn get_order(&self, order_id: i64) -> AppResult<Order> {
        self.inner
            .read()
            .get(&order_id)
            .cloned()
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", order_id))
    }

    /// Transition an order's status. Only the business side may do this.
    ///
    /// Terminal orders reject every transition; re-asserting the current
    /// non-terminal status is a no-op.
    pub fn update_status(
        &self,
        principal: &Principal,
        order_id: i64,
        new_status: OrderStatus,
    ) -> AppResult<Order> {
        let mut inner = self.inner.write();
        let order = inner.get_mut(&order_id).ok_or_else(|| {
            AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", order_id)
        })?;
        if !can_perform(
            principal,
            Action::UpdateOrderStatus,
            Some(order.business_user_id),
        ) {
            return Err(AppError::with_message(
                ErrorCode::PermissionDenied,
                "only the business side can update the order status",
            ));
        }

        if order.status.is_terminal() {
            let code = match order.status {
                OrderStatus::Completed => ErrorCode::OrderAlreadyCompleted,
                _ => ErrorCode::OrderAlreadyCancelled,
            };
            return Err(AppError::new(code).with_detail("order_id", order_id));
        }
        if order.status == new_status {
            return Ok(order.clone());
        }

        order.status = new_status;
        order.updated_at = now_ms();

        info!(order_id, status = %new_status, "order status updated");
        Ok(order.clone())
    }

    /// Remove an order. Admin only.
    pub fn delete_order(&self, principal: &Principal, order_id: i64) -> AppResult<()> {
        if !can_perform(principal, Action::DeleteOrder, None) {
            return Err(AppError::with_message(
                ErrorCode::AdminRequired,
                "only admins can delete orders",
            ));
        }

        let mut inner = self.inner.write();
        if inner.remove(&order_id).is_none() {
            return Err(AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", order_id));
        }

        info!(order_id, "order deleted");
        Ok(())
    }

    /// Orders the user participates in (either side), newest first
    pub fn list_for_user(&self, user_id: i64) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .inner
            .read()
            .values()
            .filter(|o| o.customer_user_id == user_id || o.business_user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by_key(|o| (Reverse(o.created_at), o.id));
        orders
    }

    /// Number of a business user's orders in the given status
    pub fn count_for_business(&self, business_user_id: i64, status: OrderStatus) -> usize {
        self.inner
            .read()
            .values()
            .filter(|o| o.business_user_id == business_user_id && o.status == status)
            .count()
    }

    /// Whether any non-terminal order still references the offer
    pub fn has_active_for_offer(&self, offer_id: i64) -> bool {
        self.inner
            .read()
            .values()
            .any(|o| o.offer_id == offer_id && !o.status.is_terminal())
    }
}
