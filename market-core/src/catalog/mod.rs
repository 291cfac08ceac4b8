//! Catalog store
//!
//! Offers with exactly one pricing detail per tier (basic, standard,
//! premium). `min_price` and `min_delivery_time` are derived and
//! recomputed inside the same write-lock critical section as the change
//! that invalidates them, so readers never observe stale values.
//!
//! Lock ordering: the catalog lock is always taken before the order
//! ledger's. Cross-store operations go through [`CatalogStore::with_detail`]
//! and [`CatalogStore::delete_offer`], which uphold that order.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};

use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::info;

use shared::models::{
    Offer, OfferCreate, OfferDetail, OfferDetailCreate, OfferDetailPatch, OfferOrdering,
    OfferQuery, OfferTier, OfferUpdate, Principal,
};
use shared::now_ms;

use crate::policy::{Action, can_perform};
use crate::utils::validation::{
    MAX_FEATURE_LEN, MAX_TEXT_LEN, MAX_TITLE_LEN, MAX_URL_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Default)]
struct CatalogInner {
    offers: HashMap<i64, Offer>,
    /// detail id -> parent offer id
    detail_index: HashMap<i64, i64>,
}

/// Offer catalog
pub struct CatalogStore {
    inner: RwLock<CatalogInner>,
    next_offer_id: AtomicI64,
    next_detail_id: AtomicI64,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(CatalogInner::default()),
            next_offer_id: AtomicI64::new(1),
            next_detail_id: AtomicI64::new(1),
        }
    }

    /// Create an offer with exactly one detail per tier.
    pub fn create_offer(&self, principal: &Principal, payload: OfferCreate) -> AppResult<Offer> {
        if !can_perform(principal, Action::CreateOffer, None) {
            return Err(AppError::with_message(
                ErrorCode::RoleRequired,
                "only business users can create offers",
            )
            .with_detail("required_role", "business"));
        }

        validate_required_text(&payload.title, "title", MAX_TITLE_LEN)?;
        validate_required_text(&payload.description, "description", MAX_TEXT_LEN)?;
        validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
        validate_tier_set(&payload.details)?;
        for detail in &payload.details {
            validate_detail_fields(
                &detail.title,
                detail.revisions,
                detail.delivery_time_in_days,
                detail.price,
                &detail.features,
            )?;
        }

        let offer_id = self.next_offer_id.fetch_add(1, Ordering::Relaxed);
        let now = now_ms();
        let details: Vec<OfferDetail> = payload
            .details
            .into_iter()
            .map(|d| OfferDetail {
                id: self.next_detail_id.fetch_add(1, Ordering::Relaxed),
                offer_id,
                title: d.title,
                revisions: d.revisions,
                delivery_time_in_days: d.delivery_time_in_days,
                price: d.price,
                features: d.features,
                offer_type: d.offer_type,
            })
            .collect();

        let mut offer = Offer {
            id: offer_id,
            user_id: principal.user_id,
            title: payload.title,
            image: payload.image,
            description: payload.description,
            details,
            min_price: Decimal::ZERO,
            min_delivery_time: 0,
            created_at: now,
            updated_at: now,
        };
        offer.recompute_derived();

        let mut inner = self.inner.write();
        for detail in &offer.details {
            inner.detail_index.insert(detail.id, offer_id);
        }
        inner.offers.insert(offer_id, offer.clone());

        info!(offer_id, user_id = principal.user_id, "offer created");
        Ok(offer)
    }

    pub fn get_offer(&self, offer_id: i64) -> AppResult<Offer> {
        self.inner
            .read()
            .offers
            .get(&offer_id)
            .cloned()
            .ok_or_else(|| AppError::new(ErrorCode::OfferNotFound).with_detail("offer_id", offer_id))
    }

    pub fn get_detail(&self, detail_id: i64) -> AppResult<OfferDetail> {
        self.with_detail(detail_id, |_, detail| Ok(detail.clone()))
    }

    /// Run `f` with a consistent view of one detail and its parent offer.
    ///
    /// The catalog read lock is held for the duration of `f`. Callers that
    /// also touch the order ledger rely on this for the catalog-first lock
    /// order.
    pub fn with_detail<T>(
        &self,
        detail_id: i64,
        f: impl FnOnce(&Offer, &OfferDetail) -> AppResult<T>,
    ) -> AppResult<T> {
        let inner = self.inner.read();
        let offer_id = inner.detail_index.get(&detail_id).ok_or_else(|| {
            AppError::new(ErrorCode::OfferDetailNotFound).with_detail("detail_id", detail_id)
        })?;
        let offer = inner
            .offers
            .get(offer_id)
            .ok_or_else(|| AppError::new(ErrorCode::OfferNotFound))?;
        let detail = offer
            .details
            .iter()
            .find(|d| d.id == detail_id)
            .ok_or_else(|| AppError::new(ErrorCode::OfferDetailNotFound))?;
        f(offer, detail)
    }

    /// Patch an offer. Only the creator may do this.
    ///
    /// Detail patches are keyed by tier; the tier set itself is fixed, so
    /// a patch can change a tier's fields but never add or remove tiers.
    pub fn update_offer(
        &self,
        principal: &Principal,
        offer_id: i64,
        patch: OfferUpdate,
    ) -> AppResult<Offer> {
        let mut inner = self.inner.write();
        let offer = inner.offers.get_mut(&offer_id).ok_or_else(|| {
            AppError::new(ErrorCode::OfferNotFound).with_detail("offer_id", offer_id)
        })?;
        if !can_perform(principal, Action::UpdateOffer, Some(offer.user_id)) {
            return Err(AppError::with_message(
                ErrorCode::PermissionDenied,
                "only the offer creator can update it",
            ));
        }

        // Validate only after the permission gate
        validate_optional_text(&patch.title, "title", MAX_TITLE_LEN)?;
        validate_optional_text(&patch.description, "description", MAX_TEXT_LEN)?;
        validate_optional_text(&patch.image, "image", MAX_URL_LEN)?;
        if let Some(details) = &patch.details {
            for d in details {
                validate_detail_patch(d)?;
            }
        }

        if let Some(title) = patch.title {
            offer.title = title;
        }
        if let Some(image) = patch.image {
            offer.image = Some(image);
        }
        if let Some(description) = patch.description {
            offer.description = description;
        }
        if let Some(detail_patches) = patch.details {
            for dp in detail_patches {
                let detail = offer
                    .details
                    .iter_mut()
                    .find(|d| d.offer_type == dp.offer_type)
                    .ok_or_else(|| {
                        AppError::new(ErrorCode::OfferTierMissing)
                            .with_detail("tier", dp.offer_type.as_str())
                    })?;
                if let Some(title) = dp.title {
                    detail.title = title;
                }
                if let Some(revisions) = dp.revisions {
                    detail.revisions = revisions;
                }
                if let Some(days) = dp.delivery_time_in_days {
                    detail.delivery_time_in_days = days;
                }
                if let Some(price) = dp.price {
                    detail.price = price;
                }
                if let Some(features) = dp.features {
                    detail.features = features;
                }
            }
        }

        offer.recompute_derived();
        offer.updated_at = now_ms();

        info!(offer_id, "offer updated");
        Ok(offer.clone())
    }

    /// Delete an offer. Only the creator may do this.
    ///
    /// `in_use` is evaluated under the catalog write lock and should report
    /// whether any non-terminal order still references the offer; if it
    /// returns true the delete is rejected with `OfferInUse`. Taking the
    /// order ledger's read lock inside `in_use` is safe (catalog-first
    /// order).
    pub fn delete_offer(
        &self,
        principal: &Principal,
        offer_id: i64,
        in_use: impl FnOnce() -> bool,
    ) -> AppResult<()> {
        let mut inner = self.inner.write();
        let offer = inner.offers.get(&offer_id).ok_or_else(|| {
            AppError::new(ErrorCode::OfferNotFound).with_detail("offer_id", offer_id)
        })?;
        if !can_perform(principal, Action::DeleteOffer, Some(offer.user_id)) {
            return Err(AppError::with_message(
                ErrorCode::PermissionDenied,
                "only the offer creator can delete it",
            ));
        }
        if in_use() {
            return Err(AppError::new(ErrorCode::OfferInUse).with_detail("offer_id", offer_id));
        }

        // Checked present above
        if let Some(offer) = inner.offers.remove(&offer_id) {
            for detail in &offer.details {
                inner.detail_index.remove(&detail.id);
            }
        }

        info!(offer_id, "offer deleted");
        Ok(())
    }

    /// List offers matching `query`, sorted per its ordering.
    ///
    /// Returns a point-in-time snapshot; concurrent writes after the call
    /// are not reflected.
    pub fn list_offers(&self, query: &OfferQuery) -> Vec<Offer> {
        let inner = self.inner.read();
        let search = query.search.as_deref().map(str::to_lowercase);

        let mut offers: Vec<Offer> = inner
            .offers
            .values()
            .filter(|o| {
                if let Some(creator_id) = query.creator_id
                    && o.user_id != creator_id
                {
                    return false;
                }
                if let Some(min_price) = query.min_price
                    && !o.details.iter().any(|d| d.price >= min_price)
                {
                    return false;
                }
                if let Some(max_days) = query.max_delivery_time
                    && !o.details.iter().any(|d| d.delivery_time_in_days <= max_days)
                {
                    return false;
                }
                if let Some(needle) = &search
                    && !o.title.to_lowercase().contains(needle)
                    && !o.description.to_lowercase().contains(needle)
                {
                    return false;
                }
                true
            })
            .cloned()
            .collect();

        let ordering = query.ordering.unwrap_or(OfferOrdering::UpdatedAt);
        // updated_at defaults to newest first, min_price to cheapest first
        let descending = query
            .descending
            .unwrap_or(ordering == OfferOrdering::UpdatedAt);

        match (ordering, descending) {
            (OfferOrdering::UpdatedAt, true) => {
                offers.sort_by_key(|o| (Reverse(o.updated_at), o.id));
            }
            (OfferOrdering::UpdatedAt, false) => {
                offers.sort_by_key(|o| (o.updated_at, o.id));
            }
            (OfferOrdering::MinPrice, true) => {
                offers.sort_by(|a, b| b.min_price.cmp(&a.min_price).then(a.id.cmp(&b.id)));
            }
            (OfferOrdering::MinPrice, false) => {
                offers.sort_by(|a, b| a.min_price.cmp(&b.min_price).then(a.id.cmp(&b.id)));
            }
        }
        offers
    }

    pub fn offer_count(&self) -> usize {
        self.inner.read().offers.len()
    }
}

fn validate_tier_set(details: &[OfferDetailCreate]) -> AppResult<()> {
    let mut seen = HashSet::new();
    for detail in details {
        if !seen.insert(detail.offer_type) {
            return Err(AppError::new(ErrorCode::OfferTierDuplicate)
                .with_detail("tier", detail.offer_type.as_str()));
        }
    }
    for tier in OfferTier::ALL {
        if !seen.contains(&tier) {
            return Err(
                AppError::new(ErrorCode::OfferTierMissing).with_detail("tier", tier.as_str())
            );
        }
    }
    Ok(())
}

fn validate_detail_fields(
    title: &str,
    revisions: i32,
    delivery_time_in_days: i32,
    price: Decimal,
    features: &[String],
) -> AppResult<()> {
    validate_required_text(title, "detail title", MAX_TITLE_LEN)?;
    if revisions < -1 {
        return Err(
            AppError::new(ErrorCode::OfferInvalidRevisions).with_detail("revisions", revisions)
        );
    }
    if delivery_time_in_days < 1 {
        return Err(AppError::new(ErrorCode::OfferInvalidDeliveryTime)
            .with_detail("delivery_time_in_days", delivery_time_in_days));
    }
    if price <= Decimal::ZERO {
        return Err(
            AppError::new(ErrorCode::OfferInvalidPrice).with_detail("price", price.to_string())
        );
    }
    for feature in features {
        validate_required_text(feature, "feature", MAX_FEATURE_LEN)?;
    }
    Ok(())
}

fn validate_detail_patch(patch: &OfferDetailPatch) -> AppResult<()> {
    validate_optional_text(&patch.title, "detail title", MAX_TITLE_LEN)?;
    if let Some(revisions) = patch.revisions
        && revisions < -1
    {
        return Err(
            AppError::new(ErrorCode::OfferInvalidRevisions).with_detail("revisions", revisions)
        );
    }
    if let Some(days) = patch.delivery_time_in_days
        && days < 1
    {
        return Err(AppError::new(ErrorCode::OfferInvalidDeliveryTime)
            .with_detail("delivery_time_in_days", days));
    }
    if let Some(price) = patch.price
        && price <= Decimal::ZERO
    {
        return Err(
            AppError::new(ErrorCode::OfferInvalidPrice).with_detail("price", price.to_string())
        );
    }
    if let Some(features) = &patch.features {
        for feature in features {
            validate_required_text(feature, "feature", MAX_FEATURE_LEN)?;
        }
    }
    Ok(())
}
