//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::BookingService;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::booking::{self, BookingState};
use crate::interfaces::http::modules::health::{self, HealthState};
use crate::interfaces::http::modules::metrics::{
    http_metrics_middleware, prometheus_metrics, MetricsState,
};
use crate::interfaces::http::modules::request_id::request_id_middleware;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        booking::create_booking,
        booking::calculate,
        booking::validate_promo,
        booking::apply_gift_card,
        booking::simulate_payment,
        booking::list_orders,
        booking::get_order,
        booking::cancel_order,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::ComponentHealth,
            booking::SelectedServiceDto,
            booking::SelectedExtraServiceDto,
            booking::CalculateRequest,
            booking::CreateBookingRequest,
            booking::ValidatePromoRequest,
            booking::ApplyGiftCardRequest,
            booking::CancelOrderRequest,
            booking::ServiceLineDto,
            booking::ExtraServiceLineDto,
            booking::DurationDiscrepancyDto,
            booking::QuoteDto,
            booking::OrderDto,
            booking::CreateBookingResponse,
            booking::ValidatePromoResponse,
            booking::GiftCardPreviewResponse,
            booking::SubscriptionEffectDto,
            booking::PaymentResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Booking", description = "Cart pricing, discount codes, booking creation and order lifecycle"),
    ),
    info(
        title = "Cleaning Booking API",
        version = "1.0.0",
        description = "Prices cleaning carts, applies promo codes, subscriptions and gift cards, and records orders",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Everything the router needs from the running service
#[derive(Clone)]
pub struct ApiContext {
    pub booking: Arc<BookingService>,
    pub db: DatabaseConnection,
    pub jwt_config: JwtConfig,
    /// `None` leaves `/metrics` unrouted (tests, `--check`)
    pub metrics: Option<PrometheusHandle>,
}

/// Create the API router with all routes
pub fn create_api_router(ctx: ApiContext) -> Router {
    let auth_state = AuthState {
        jwt_config: ctx.jwt_config.clone(),
    };

    let booking_routes = Router::new()
        .route("/create", post(booking::create_booking))
        .route("/calculate", post(booking::calculate))
        .route("/validate-promo", post(booking::validate_promo))
        .route("/apply-gift-card", post(booking::apply_gift_card))
        .route("/simulate-payment/{order_id}", post(booking::simulate_payment))
        .route("/orders", get(booking::list_orders))
        .route("/orders/{order_id}", get(booking::get_order))
        .route("/orders/{order_id}/cancel", post(booking::cancel_order))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(BookingState {
            service: ctx.booking.clone(),
        });

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(HealthState {
            db: ctx.db.clone(),
            started_at: Arc::new(Instant::now()),
        });

    let mut router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(health_routes)
        .nest("/api/v1/booking", booking_routes);

    if let Some(handle) = ctx.metrics {
        router = router.route(
            "/metrics",
            get(prometheus_metrics).with_state(MetricsState { handle }),
        );
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}
