//! Rollback, post-commit failure and concurrent gift card redemption

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use cleaning_booking::application::{Actor, BookingError, BookingStage, SubscriptionEffect};
use cleaning_booking::domain::catalog::CatalogRepository;
use cleaning_booking::domain::gift_card::GiftCardRepository;
use cleaning_booking::domain::order::{Order, OrderRepository};
use cleaning_booking::domain::promo::PromoCodeRepository;
use cleaning_booking::domain::subscription::SubscriptionRepository;
use cleaning_booking::domain::user::{User, UserRepository, UserRole};
use cleaning_booking::domain::{BookingUnitOfWork, DomainError, DomainResult, RepositoryProvider};
use cleaning_booking::SeaOrmRepositoryProvider;

use common::*;

// ── Fault injection ─────────────────────────────────────────────

struct FaultyUsers {
    inner: Arc<SeaOrmRepositoryProvider>,
    fail_updates: bool,
}

#[async_trait]
impl UserRepository for FaultyUsers {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        self.inner.users().find_by_id(id).await
    }

    async fn update_subscription_state(&self, user: &User) -> DomainResult<()> {
        if self.fail_updates {
            return Err(DomainError::Storage("attempt to write a readonly database".into()));
        }
        self.inner.users().update_subscription_state(user).await
    }
}

struct FaultyUnitOfWork {
    inner: Box<dyn BookingUnitOfWork>,
    fail_totals: bool,
    fail_commit: bool,
}

#[async_trait]
impl BookingUnitOfWork for FaultyUnitOfWork {
    async fn insert_order(&mut self, order: &Order) -> DomainResult<Order> {
        self.inner.insert_order(order).await
    }

    async fn apply_gift_card(
        &mut self,
        code: &str,
        order_total: Decimal,
        order_id: i32,
        user_id: &str,
    ) -> DomainResult<Decimal> {
        self.inner.apply_gift_card(code, order_total, order_id, user_id).await
    }

    async fn update_order_totals(
        &mut self,
        order_id: i32,
        gift_card_amount_used: Decimal,
        total: Decimal,
    ) -> DomainResult<()> {
        if self.fail_totals {
            return Err(DomainError::Storage("disk I/O error".into()));
        }
        self.inner
            .update_order_totals(order_id, gift_card_amount_used, total)
            .await
    }

    async fn increment_promo_usage(&mut self, promo_code_id: i32) -> DomainResult<()> {
        self.inner.increment_promo_usage(promo_code_id).await
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let FaultyUnitOfWork {
            inner, fail_commit, ..
        } = *self;
        if fail_commit {
            inner.rollback().await?;
            return Err(DomainError::Storage("database is locked".into()));
        }
        inner.commit().await
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        let FaultyUnitOfWork { inner, .. } = *self;
        inner.rollback().await
    }
}

struct FaultyProvider {
    inner: Arc<SeaOrmRepositoryProvider>,
    users: FaultyUsers,
    fail_totals: bool,
    fail_commit: bool,
}

impl FaultyProvider {
    fn new(inner: Arc<SeaOrmRepositoryProvider>, fail_totals: bool, fail_user_updates: bool) -> Self {
        Self {
            users: FaultyUsers {
                inner: inner.clone(),
                fail_updates: fail_user_updates,
            },
            inner,
            fail_totals,
            fail_commit: false,
        }
    }

    fn failing_commit(mut self) -> Self {
        self.fail_commit = true;
        self
    }
}

#[async_trait]
impl RepositoryProvider for FaultyProvider {
    fn catalog(&self) -> &dyn CatalogRepository {
        self.inner.catalog()
    }
    fn orders(&self) -> &dyn OrderRepository {
        self.inner.orders()
    }
    fn promo_codes(&self) -> &dyn PromoCodeRepository {
        self.inner.promo_codes()
    }
    fn gift_cards(&self) -> &dyn GiftCardRepository {
        self.inner.gift_cards()
    }
    fn subscriptions(&self) -> &dyn SubscriptionRepository {
        self.inner.subscriptions()
    }
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    async fn begin_booking(&self) -> DomainResult<Box<dyn BookingUnitOfWork>> {
        let inner = self.inner.begin_booking().await?;
        Ok(Box::new(FaultyUnitOfWork {
            inner,
            fail_totals: self.fail_totals,
            fail_commit: self.fail_commit,
        }))
    }
}

// ── Tests ───────────────────────────────────────────────────────

#[tokio::test]
async fn failed_write_rolls_back_order_and_gift_card_debit() {
    let app = TestApp::new().await;
    insert_user(&app.db, "u1", true).await;
    let card_id = insert_gift_card(&app.db, "ROLL-BACK-0001", 50_000).await;

    let service = TestApp::service_over(Arc::new(FaultyProvider::new(app.repos.clone(), true, false)));
    let err = service
        .create_booking(booking_request(with_code(super_deep_quote("u1"), "ROLL-BACK-0001")))
        .await
        .unwrap_err();
    match err {
        BookingError::Failed { stage, source } => {
            assert_eq!(stage, BookingStage::ApplyingGiftCard);
            assert!(matches!(source, DomainError::Storage(_)));
        }
        other => panic!("expected a failed booking, got {:?}", other),
    }

    let actor = Actor::new("u1", UserRole::Customer);
    assert!(app.service.list_orders(&actor).await.unwrap().is_empty());

    let card = app.repos.gift_cards().find_by_code("ROLL-BACK-0001").await.unwrap().unwrap();
    assert_eq!(card.current_balance, d("500"));
    assert!(app.repos.gift_cards().find_usages(card_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_commit_is_reported_as_commit_stage() {
    let app = TestApp::new().await;
    insert_user(&app.db, "u1", true).await;
    let card_id = insert_gift_card(&app.db, "COMMIT-FAIL-0001", 50_000).await;

    let provider = FaultyProvider::new(app.repos.clone(), false, false).failing_commit();
    let service = TestApp::service_over(Arc::new(provider));
    let mut quote = with_code(super_deep_quote("u1"), "COMMIT-FAIL-0001");
    quote.subscription_id = Some(WEEKLY_PLAN);
    let err = service.create_booking(booking_request(quote)).await.unwrap_err();
    match &err {
        BookingError::Failed { stage, source } => {
            assert_eq!(*stage, BookingStage::Committing);
            assert_eq!(stage.as_str(), "committing");
            assert!(matches!(source, DomainError::Storage(_)));
        }
        other => panic!("expected a failed booking, got {:?}", other),
    }
    assert_eq!(err.stage(), BookingStage::Committing);

    let actor = Actor::new("u1", UserRole::Customer);
    assert!(app.service.list_orders(&actor).await.unwrap().is_empty());
    let card = app.repos.gift_cards().find_by_code("COMMIT-FAIL-0001").await.unwrap().unwrap();
    assert_eq!(card.current_balance, d("500"));
    assert!(app.repos.gift_cards().find_usages(card_id).await.unwrap().is_empty());

    // subscription runs only after a successful commit
    let user = app.repos.users().find_by_id("u1").await.unwrap().unwrap();
    assert_eq!(user.subscription_id, None);
}

#[tokio::test]
async fn subscription_failure_after_commit_keeps_the_order() {
    let app = TestApp::new().await;
    insert_user(&app.db, "u1", true).await;

    let service = TestApp::service_over(Arc::new(FaultyProvider::new(app.repos.clone(), false, true)));
    let mut quote = super_deep_quote("u1");
    quote.subscription_id = Some(WEEKLY_PLAN);
    let outcome = service.create_booking(booking_request(quote)).await.unwrap();

    assert!(matches!(
        outcome.post_commit.subscription,
        Some(SubscriptionEffect::Failed(_))
    ));
    assert_eq!(outcome.post_commit.warnings().len(), 1);

    let actor = Actor::new("u1", UserRole::Customer);
    let stored = app.service.get_order(&actor, outcome.order.id).await.unwrap();
    assert_eq!(stored.subscription_id, Some(WEEKLY_PLAN));

    let user = app.repos.users().find_by_id("u1").await.unwrap().unwrap();
    assert_eq!(user.subscription_id, None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_redemptions_never_overdraw() {
    let path = temp_db_path("booking-race");
    let app = TestApp::on_file(&path).await;
    insert_user(&app.db, "u1", true).await;
    let card_id = insert_gift_card(&app.db, "RACE-CARD-0001", 30_000).await;

    let mut tasks = Vec::new();
    for _ in 0..6 {
        let service = app.service.clone();
        tasks.push(tokio::spawn(async move {
            service
                .create_booking(booking_request(with_code(super_deep_quote("u1"), "RACE-CARD-0001")))
                .await
        }));
    }

    let mut debited = Decimal::ZERO;
    let mut booked = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(outcome) => {
                assert!(outcome.order.gift_card_amount_used <= d("238.48"));
                assert_eq!(
                    outcome.order.total + outcome.order.gift_card_amount_used,
                    d("238.48")
                );
                debited += outcome.order.gift_card_amount_used;
                booked += 1;
            }
            Err(BookingError::Rejected(_)) => {}
            Err(BookingError::Failed { stage, source }) => {
                // lost the write race: busy database or a guarded update that matched nothing
                assert!(
                    matches!(
                        stage,
                        BookingStage::Persisting | BookingStage::ApplyingGiftCard | BookingStage::Committing
                    ),
                    "unexpected stage {}",
                    stage
                );
                assert!(
                    matches!(source, DomainError::Storage(_) | DomainError::Conflict(_)),
                    "unexpected cause {:?}",
                    source
                );
            }
        }
    }

    let card = app.repos.gift_cards().find_by_code("RACE-CARD-0001").await.unwrap().unwrap();
    let usages = app.repos.gift_cards().find_usages(card_id).await.unwrap();
    assert!(booked >= 1);
    assert!(card.current_balance >= Decimal::ZERO);
    assert_eq!(debited, d("300") - card.current_balance);
    assert!(card.ledger_is_consistent(&usages));

    let actor = Actor::new("u1", UserRole::Customer);
    let orders = app.service.list_orders(&actor).await.unwrap();
    assert_eq!(orders.len(), booked);
    for usage in &usages {
        assert_eq!(usage.balance_before - usage.amount_used, usage.balance_after);
        assert!(orders.iter().any(|o| o.id == usage.order_id));
    }

    drop(app);
    remove_db_files(&path);
}
