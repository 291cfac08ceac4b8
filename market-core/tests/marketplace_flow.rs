//! End-to-end marketplace flow and concurrency behavior

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::Rng;
use rust_decimal::Decimal;

use market_core::core::{AppState, Config};
use market_core::{ErrorCode, OrderLedger, ReviewLedger};
use shared::models::{
    OfferCreate, OfferDetailCreate, OfferDetailPatch, OfferOrdering, OfferQuery, OfferTier,
    OfferUpdate, OrderStatus, Principal, ProfileUpdate, ReviewCreate, ReviewQuery, ReviewUpdate,
    UserCreate, UserRole,
};

fn new_state() -> AppState {
    AppState::initialize(&Config {
        environment: "development".into(),
        log_level: "info".into(),
        log_dir: None,
    })
}

fn register(state: &AppState, username: &str, role: UserRole) -> i64 {
    state
        .accounts
        .register(UserCreate {
            username: username.into(),
            first_name: None,
            last_name: None,
            email: format!("{username}@example.com"),
            role,
        })
        .unwrap()
        .id
}

fn offer_payload(title: &str, base_price: i64) -> OfferCreate {
    OfferCreate {
        title: title.into(),
        image: None,
        description: format!("{title}, done properly"),
        details: OfferTier::ALL
            .iter()
            .enumerate()
            .map(|(i, tier)| OfferDetailCreate {
                title: format!("{tier} package"),
                revisions: if *tier == OfferTier::Premium { -1 } else { 2 },
                delivery_time_in_days: (i as i32 + 1) * 2,
                price: Decimal::from(base_price * (i as i64 + 1)),
                features: vec!["Source files".into()],
                offer_type: *tier,
            })
            .collect(),
    }
}

#[test]
fn full_marketplace_flow() {
    let state = new_state();

    // Registration creates empty profiles alongside the users
    let business_id = register(&state, "pixelworks", UserRole::Business);
    let customer_id = register(&state, "jane", UserRole::Customer);
    let business = Principal::business(business_id);
    let customer = Principal::customer(customer_id);

    state
        .accounts
        .update_profile(
            &business,
            business_id,
            ProfileUpdate {
                location: Some("Hamburg".into()),
                working_hours: Some("9-17".into()),
                ..Default::default()
            },
        )
        .unwrap();

    // Business publishes two offers
    let logo = state
        .catalog
        .create_offer(&business, offer_payload("Logo design", 50))
        .unwrap();
    let flyer = state
        .catalog
        .create_offer(&business, offer_payload("Flyer design", 20))
        .unwrap();
    assert_eq!(logo.min_price, Decimal::from(50));
    assert_eq!(logo.min_delivery_time, 2);

    // Browse: cheapest first
    let listed = state.catalog.list_offers(&OfferQuery {
        ordering: Some(OfferOrdering::MinPrice),
        ..Default::default()
    });
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, flyer.id);

    // Customer orders the standard tier of the logo offer
    let detail_id = logo.detail_for(OfferTier::Standard).unwrap().id;
    let order = state.place_order(&customer, detail_id).unwrap();
    assert_eq!(order.price, Decimal::from(100));
    assert_eq!(order.business_user_id, business_id);
    assert_eq!(order.status, OrderStatus::InProgress);

    // The snapshot survives a later price change
    state
        .catalog
        .update_offer(
            &business,
            logo.id,
            OfferUpdate {
                details: Some(vec![OfferDetailPatch {
                    offer_type: OfferTier::Standard,
                    title: None,
                    revisions: None,
                    delivery_time_in_days: None,
                    price: Some(Decimal::from(500)),
                    features: None,
                }]),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(
        state.orders.get_order(order.id).unwrap().price,
        Decimal::from(100)
    );

    // Offer deletion is blocked while the order is open
    let err = state.delete_offer(&business, logo.id).unwrap_err();
    assert_eq!(err.code, ErrorCode::OfferInUse);

    // Business completes the order
    state
        .orders
        .update_status(&business, order.id, OrderStatus::Completed)
        .unwrap();
    assert_eq!(
        state.completed_order_count(business_id).unwrap().order_count,
        1
    );
    assert_eq!(
        state
            .in_progress_order_count(business_id)
            .unwrap()
            .order_count,
        0
    );

    // Customer reviews the business, once
    let review = state
        .create_review(
            &customer,
            ReviewCreate {
                business_user_id: business_id,
                rating: 4,
                description: "Solid work, fast turnaround".into(),
            },
        )
        .unwrap();
    let err = state
        .create_review(
            &customer,
            ReviewCreate {
                business_user_id: business_id,
                rating: 5,
                description: String::new(),
            },
        )
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DuplicateReview);

    // But they may revise the existing one
    state
        .reviews
        .update_review(
            &customer,
            review.id,
            ReviewUpdate {
                rating: Some(5),
                ..Default::default()
            },
        )
        .unwrap();

    let stats = state.platform_stats();
    assert_eq!(stats.offer_count, 2);
    assert_eq!(stats.review_count, 1);
    assert_eq!(stats.average_rating, 5.0);
    assert_eq!(stats.business_profile_count, 1);

    // With the order completed, the offer can go
    state.delete_offer(&business, logo.id).unwrap();
    let err = state.catalog.get_offer(logo.id).unwrap_err();
    assert_eq!(err.code, ErrorCode::OfferNotFound);

    // The completed order outlives the offer, snapshot intact
    let kept = state.orders.get_order(order.id).unwrap();
    assert_eq!(kept.price, Decimal::from(100));
    assert_eq!(kept.status, OrderStatus::Completed);
    assert_eq!(kept.offer_id, logo.id);

    // Listings reflect the deletion
    assert_eq!(state.catalog.list_offers(&OfferQuery::default()).len(), 1);
    assert_eq!(state.platform_stats().offer_count, 1);
}

#[test]
fn review_listing_is_query_scoped() {
    let state = new_state();
    let biz_a = register(&state, "studio_a", UserRole::Business);
    let biz_b = register(&state, "studio_b", UserRole::Business);

    for (i, name) in ["u1", "u2", "u3"].iter().enumerate() {
        let id = register(&state, name, UserRole::Customer);
        state
            .create_review(
                &Principal::customer(id),
                ReviewCreate {
                    business_user_id: if i < 2 { biz_a } else { biz_b },
                    rating: (i as i32) + 3,
                    description: String::new(),
                },
            )
            .unwrap();
    }

    let for_a = state.reviews.list_reviews(&ReviewQuery {
        business_user_id: Some(biz_a),
        ..Default::default()
    });
    assert_eq!(for_a.len(), 2);
    assert!(for_a.iter().all(|r| r.business_user_id == biz_a));

    assert_eq!(state.reviews.review_count(), 3);
    // Ratings 3, 4, 5 across the platform
    assert_eq!(state.platform_stats().average_rating, 4.0);
}

#[test]
fn duplicate_review_race_has_one_winner() {
    let ledger = Arc::new(ReviewLedger::new());
    let threads = 8;

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let ledger = ledger.clone();
            thread::spawn(move || {
                let jitter = rand::thread_rng().gen_range(0..3);
                thread::sleep(Duration::from_millis(jitter));
                ledger.create_review(
                    &Principal::customer(2),
                    ReviewCreate {
                        business_user_id: 1,
                        rating: 5,
                        description: String::new(),
                    },
                )
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| e.code == ErrorCode::DuplicateReview)
    );
    assert_eq!(ledger.review_count(), 1);
}

#[test]
fn concurrent_terminal_transitions_have_one_winner() {
    let state = new_state();
    let business_id = register(&state, "studio", UserRole::Business);
    let customer_id = register(&state, "shopper", UserRole::Customer);
    let offer = state
        .catalog
        .create_offer(
            &Principal::business(business_id),
            offer_payload("Logo design", 50),
        )
        .unwrap();
    let detail_id = offer.detail_for(OfferTier::Basic).unwrap().id;
    let order_id = state
        .place_order(&Principal::customer(customer_id), detail_id)
        .unwrap()
        .id;

    let orders: Arc<OrderLedger> = state.orders.clone();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let orders = orders.clone();
            let target = if i % 2 == 0 {
                OrderStatus::Completed
            } else {
                OrderStatus::Cancelled
            };
            thread::spawn(move || {
                let jitter = rand::thread_rng().gen_range(0..3);
                thread::sleep(Duration::from_millis(jitter));
                orders.update_status(&Principal::business(business_id), order_id, target)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);

    let final_status = state.orders.get_order(order_id).unwrap().status;
    assert!(final_status.is_terminal());
    // Every loser saw the terminal state the winner produced
    let expected = match final_status {
        OrderStatus::Completed => ErrorCode::OrderAlreadyCompleted,
        _ => ErrorCode::OrderAlreadyCancelled,
    };
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| e.code == expected)
    );
}

#[test]
fn delete_vs_place_never_leaves_dangling_orders() {
    let state = new_state();
    let business_id = register(&state, "studio", UserRole::Business);
    let business = Principal::business(business_id);

    for round in 0..20 {
        let offer = state
            .catalog
            .create_offer(&business, offer_payload(&format!("Offer {round}"), 10))
            .unwrap();
        let offer_id = offer.id;
        let detail_id = offer.detail_for(OfferTier::Basic).unwrap().id;

        let placer = {
            let state = state.clone();
            thread::spawn(move || {
                let jitter = rand::thread_rng().gen_range(0..2);
                thread::sleep(Duration::from_millis(jitter));
                state.place_order(&Principal::customer(999), detail_id)
            })
        };
        let deleter = {
            let state = state.clone();
            thread::spawn(move || {
                let jitter = rand::thread_rng().gen_range(0..2);
                thread::sleep(Duration::from_millis(jitter));
                state.delete_offer(&Principal::business(business_id), offer_id)
            })
        };

        let placed = placer.join().unwrap();
        let deleted = deleter.join().unwrap();

        match (placed, deleted) {
            // Delete won: the placement must have lost
            (Err(e), Ok(())) => assert_eq!(e.code, ErrorCode::OfferDetailNotFound),
            // Placement won: the delete must have been blocked
            (Ok(order), Err(e)) => {
                assert_eq!(e.code, ErrorCode::OfferInUse);
                assert!(state.catalog.get_offer(offer_id).is_ok());
                // Clean up for the next round
                state
                    .orders
                    .update_status(&business, order.id, OrderStatus::Cancelled)
                    .unwrap();
                state.delete_offer(&business, offer_id).unwrap();
            }
            (placed, deleted) => panic!(
                "exactly one side must win: placed={:?} deleted={:?}",
                placed.map(|o| o.id),
                deleted
            ),
        }
    }

    // Nothing dangling: every surviving order references no live offer only
    // if it is terminal
    for order in state.orders.list_for_user(999) {
        if !order.status.is_terminal() {
            assert!(state.catalog.get_offer(order.offer_id).is_ok());
        }
    }
}
