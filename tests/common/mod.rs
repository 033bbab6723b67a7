//! Shared fixtures: a migrated in-memory database with the seeded catalog
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Duration, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, NotSet, Set};

use cleaning_booking::application::pricing::{CartSelection, SelectedExtra, SelectedService};
use cleaning_booking::application::{BookingRequest, BookingService, PricingPolicy, QuoteRequest};
use cleaning_booking::domain::order::{ContactInfo, ServiceAddress};
use cleaning_booking::domain::{DiscountCode, NoopAuditSink, RepositoryProvider};
use cleaning_booking::infrastructure::database::entities::{gift_card, promo_code, user};
use cleaning_booking::{init_database, run_migrations, DatabaseConfig, SeaOrmRepositoryProvider};

/// Seeded ids
pub const STANDARD_CLEANING: i32 = 1;
pub const BEDROOMS: i32 = 1;
pub const SUPER_DEEP_CLEANING: i32 = 2;
/// Hourly extra, $30 per hour
pub const INSIDE_CABINETS: i32 = 5;
pub const WEEKLY_PLAN: i32 = 1;

pub struct TestApp {
    pub db: DatabaseConnection,
    pub repos: Arc<SeaOrmRepositoryProvider>,
    pub service: Arc<BookingService>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(&DatabaseConfig::in_memory()).await
    }

    /// File-backed database with a pool of several connections, so booking
    /// transactions really overlap.
    pub async fn on_file(path: &Path) -> Self {
        Self::with_config(&DatabaseConfig::sqlite(&path.to_string_lossy())).await
    }

    async fn with_config(config: &DatabaseConfig) -> Self {
        let db = init_database(config).await.expect("connect sqlite");
        run_migrations(&db).await.expect("migrations");
        let repos = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let service = Arc::new(Self::service_over(repos.clone()));
        Self { db, repos, service }
    }

    pub fn service_over(repos: Arc<dyn RepositoryProvider>) -> BookingService {
        BookingService::new(repos, Arc::new(NoopAuditSink), PricingPolicy::default())
    }
}

/// Fresh database file path under the system temp dir
pub fn temp_db_path(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{}-{}.db", prefix, uuid::Uuid::new_v4().simple()))
}

/// Remove a database file together with its WAL side files
pub fn remove_db_files(path: &Path) {
    for suffix in ["", "-wal", "-shm", "-journal"] {
        let mut name = path.as_os_str().to_owned();
        name.push(suffix);
        let _ = std::fs::remove_file(PathBuf::from(name));
    }
}

pub fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub async fn insert_user(db: &DatabaseConnection, id: &str, is_active: bool) {
    let now = Utc::now();
    user::ActiveModel {
        id: Set(id.to_string()),
        email: Set(format!("{}@example.com", id)),
        first_name: Set("Test".into()),
        last_name: Set("User".into()),
        role: Set(user::UserRole::Customer),
        is_active: Set(is_active),
        subscription_id: Set(None),
        subscription_start_date: Set(None),
        subscription_expiry_date: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert user");
}

pub async fn insert_gift_card(db: &DatabaseConnection, code: &str, cents: i64) -> i32 {
    let now = Utc::now();
    let model = gift_card::ActiveModel {
        id: NotSet,
        code: Set(code.to_string()),
        original_amount: Set(cents),
        current_balance: Set(cents),
        is_active: Set(true),
        is_paid: Set(true),
        purchaser_user_id: Set(None),
        recipient_email: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert gift card");
    model.id
}

pub async fn insert_promo(
    db: &DatabaseConnection,
    code: &str,
    percentage: f64,
    max_usage_count: Option<i32>,
    max_usage_per_user: Option<i32>,
) -> i32 {
    let now = Utc::now();
    let model = promo_code::ActiveModel {
        id: NotSet,
        code: Set(code.to_string()),
        description: Set(None),
        discount_type: Set(promo_code::DiscountType::Percentage),
        discount_value: Set(percentage),
        valid_from: Set(None),
        valid_to: Set(None),
        max_usage_count: Set(max_usage_count),
        max_usage_per_user: Set(max_usage_per_user),
        current_usage_count: Set(0),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert promo code");
    model.id
}

/// Two bedrooms with super deep cleaning and $10 tips: subtotal 210.00,
/// total 238.48 before discounts.
pub fn super_deep_quote(user_id: &str) -> QuoteRequest {
    QuoteRequest {
        user_id: user_id.to_string(),
        service_type_id: STANDARD_CLEANING,
        cart: CartSelection {
            services: vec![SelectedService {
                service_id: BEDROOMS,
                quantity: 2,
            }],
            extras: vec![SelectedExtra {
                extra_service_id: SUPER_DEEP_CLEANING,
                quantity: 1,
                hours: Decimal::ZERO,
            }],
            ..Default::default()
        },
        tips: d("10"),
        discount: None,
        subscription_id: None,
    }
}

pub fn with_code(mut quote: QuoteRequest, code: &str) -> QuoteRequest {
    quote.discount = DiscountCode::classify(code);
    quote
}

pub fn booking_request(quote: QuoteRequest) -> BookingRequest {
    BookingRequest {
        contact: ContactInfo {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.com".into(),
            phone: "555-0100".into(),
        },
        address: ServiceAddress {
            address: "1 Main St".into(),
            apt_suite: None,
            city: "Springfield".into(),
            state: "IL".into(),
            zip_code: "62701".into(),
        },
        service_date: Utc::now().date_naive() + Duration::days(7),
        service_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        entry_method: None,
        special_instructions: None,
        quote,
    }
}
