//! Statistics aggregator
//!
//! Platform-wide counters computed from live store state on every call.
//! Nothing is cached; each field is read under the owning store's read
//! lock, so the snapshot is per-field consistent rather than global.

use std::sync::Arc;

use shared::models::PlatformStats;

use crate::accounts::AccountDirectory;
use crate::catalog::CatalogStore;
use crate::reviews::ReviewLedger;

/// On-demand platform statistics
pub struct StatsAggregator {
    accounts: Arc<AccountDirectory>,
    catalog: Arc<CatalogStore>,
    reviews: Arc<ReviewLedger>,
}

impl StatsAggregator {
    pub fn new(
        accounts: Arc<AccountDirectory>,
        catalog: Arc<CatalogStore>,
        reviews: Arc<ReviewLedger>,
    ) -> Self {
        Self {
            accounts,
            catalog,
            reviews,
        }
    }

    /// Current platform statistics.
    ///
    /// `average_rating` is the mean over all reviews rounded to one
    /// decimal, 0.0 when there are none.
    pub fn platform_stats(&self) -> PlatformStats {
        PlatformStats {
            review_count: self.reviews.review_count(),
            average_rating: self.reviews.average_rating(),
            business_profile_count: self.accounts.business_profile_count(),
            offer_count: self.catalog.offer_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::{
        OfferCreate, OfferDetailCreate, OfferTier, Principal, ReviewCreate, UserCreate, UserRole,
    };

    fn aggregator() -> (
        Arc<AccountDirectory>,
        Arc<CatalogStore>,
        Arc<ReviewLedger>,
        StatsAggregator,
    ) {
        let accounts = Arc::new(AccountDirectory::new());
        let catalog = Arc::new(CatalogStore::new());
        let reviews = Arc::new(ReviewLedger::new());
        let stats = StatsAggregator::new(accounts.clone(), catalog.clone(), reviews.clone());
        (accounts, catalog, reviews, stats)
    }

    #[test]
    fn test_empty_platform() {
        let (_, _, _, stats) = aggregator();
        let snapshot = stats.platform_stats();
        assert_eq!(snapshot.review_count, 0);
        assert_eq!(snapshot.average_rating, 0.0);
        assert_eq!(snapshot.business_profile_count, 0);
        assert_eq!(snapshot.offer_count, 0);
    }

    #[test]
    fn test_stats_reflect_current_state() {
        let (accounts, catalog, reviews, stats) = aggregator();

        let business = accounts
            .register(UserCreate {
                username: "studio".into(),
                first_name: None,
                last_name: None,
                email: "studio@example.com".into(),
                role: UserRole::Business,
            })
            .unwrap();
        accounts
            .register(UserCreate {
                username: "shopper".into(),
                first_name: None,
                last_name: None,
                email: "shopper@example.com".into(),
                role: UserRole::Customer,
            })
            .unwrap();

        catalog
            .create_offer(
                &Principal::business(business.id),
                OfferCreate {
                    title: "Logo design".into(),
                    image: None,
                    description: "Clean, modern logos".into(),
                    details: OfferTier::ALL
                        .iter()
                        .enumerate()
                        .map(|(i, tier)| OfferDetailCreate {
                            title: format!("{tier} package"),
                            revisions: 1,
                            delivery_time_in_days: (i as i32 + 1) * 2,
                            price: Decimal::from((i as i64 + 1) * 50),
                            features: vec![],
                            offer_type: *tier,
                        })
                        .collect(),
                },
            )
            .unwrap();

        reviews
            .create_review(
                &Principal::customer(2),
                ReviewCreate {
                    business_user_id: business.id,
                    rating: 4,
                    description: String::new(),
                },
            )
            .unwrap();

        let snapshot = stats.platform_stats();
        assert_eq!(snapshot.review_count, 1);
        assert_eq!(snapshot.average_rating, 4.0);
        assert_eq!(snapshot.business_profile_count, 1);
        assert_eq!(snapshot.offer_count, 1);
    }
}
