//! Booking handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    ApplyGiftCardRequest, CalculateRequest, CancelOrderRequest, CreateBookingRequest,
    CreateBookingResponse, GiftCardPreviewResponse, OrderDto, PaymentResponse, QuoteDto,
    ValidatePromoRequest, ValidatePromoResponse,
};
use crate::application::{BookingRequest, BookingService};
use crate::interfaces::http::common::{ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Booking handler state
#[derive(Clone)]
pub struct BookingState {
    pub service: Arc<BookingService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/booking/create",
    tag = "Booking",
    security(("bearer_auth" = [])),
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<CreateBookingResponse>),
        (status = 400, description = "Invalid cart, discount code, or booking could not be stored"),
        (status = 401, description = "Missing or invalid token"),
        (status = 422, description = "Request validation failed")
    )
)]
pub async fn create_booking(
    State(state): State<BookingState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(body): ValidatedJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreateBookingResponse>>), ApiError> {
    let request = BookingRequest {
        quote: body.cart.to_quote_request(&user.user_id)?,
        contact: body.contact(),
        address: body.service_address(),
        service_date: body.service_date,
        service_time: body.service_time,
        entry_method: body.entry_method.clone(),
        special_instructions: body.special_instructions.clone(),
    };

    let outcome = state.service.create_booking(request).await?;
    let response = CreateBookingResponse {
        warnings: outcome.post_commit.warnings(),
        duration_discrepancy: outcome.discrepancy.map(Into::into),
        payment_handle: outcome.payment_handle,
        order: outcome.order.into(),
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(response, "Booking created")),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/booking/calculate",
    tag = "Booking",
    security(("bearer_auth" = [])),
    request_body = CalculateRequest,
    responses(
        (status = 200, description = "Price quote", body = ApiResponse<QuoteDto>),
        (status = 400, description = "Invalid cart or discount code"),
        (status = 404, description = "Unknown service type, service or subscription")
    )
)]
pub async fn calculate(
    State(state): State<BookingState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(body): ValidatedJson<CalculateRequest>,
) -> Result<Json<ApiResponse<QuoteDto>>, ApiError> {
    let request = body.to_quote_request(&user.user_id)?;
    let quote = state.service.calculate(&request).await?;
    Ok(Json(ApiResponse::success(quote.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/booking/validate-promo",
    tag = "Booking",
    security(("bearer_auth" = [])),
    request_body = ValidatePromoRequest,
    responses(
        (status = 200, description = "Validation result; unusable codes report is_valid = false", body = ApiResponse<ValidatePromoResponse>)
    )
)]
pub async fn validate_promo(
    State(state): State<BookingState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(body): ValidatedJson<ValidatePromoRequest>,
) -> Result<Json<ApiResponse<ValidatePromoResponse>>, ApiError> {
    let check = state
        .service
        .validate_promo(&body.code, &user.user_id, body.sub_total)
        .await?;
    Ok(Json(ApiResponse::success(check.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/booking/apply-gift-card",
    tag = "Booking",
    security(("bearer_auth" = [])),
    request_body = ApplyGiftCardRequest,
    responses(
        (status = 200, description = "Preview of the amount the card would cover", body = ApiResponse<GiftCardPreviewResponse>),
        (status = 400, description = "Negative order total")
    )
)]
pub async fn apply_gift_card(
    State(state): State<BookingState>,
    ValidatedJson(body): ValidatedJson<ApplyGiftCardRequest>,
) -> Result<Json<ApiResponse<GiftCardPreviewResponse>>, ApiError> {
    if body.order_total.is_sign_negative() {
        return Err(ApiError::BadRequest(
            "Order total cannot be negative".to_string(),
        ));
    }
    let preview = state
        .service
        .preview_gift_card(&body.code, body.order_total)
        .await?;
    Ok(Json(ApiResponse::success(preview.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/booking/simulate-payment/{order_id}",
    tag = "Booking",
    security(("bearer_auth" = [])),
    params(("order_id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order marked paid", body = ApiResponse<PaymentResponse>),
        (status = 403, description = "Order belongs to another user"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order already paid or cancelled")
    )
)]
pub async fn simulate_payment(
    State(state): State<BookingState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(order_id): Path<i32>,
) -> Result<Json<ApiResponse<PaymentResponse>>, ApiError> {
    let outcome = state
        .service
        .simulate_payment(&user.actor(), order_id)
        .await?;
    Ok(Json(ApiResponse::with_message(
        PaymentResponse {
            order: outcome.order.into(),
            subscription: outcome.subscription.map(Into::into),
        },
        "Payment successful",
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/booking/orders",
    tag = "Booking",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Orders of the caller, newest first", body = ApiResponse<Vec<OrderDto>>)
    )
)]
pub async fn list_orders(
    State(state): State<BookingState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<OrderDto>>>, ApiError> {
    let orders = state.service.list_orders(&user.actor()).await?;
    Ok(Json(ApiResponse::success(
        orders.into_iter().map(OrderDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/booking/orders/{order_id}",
    tag = "Booking",
    security(("bearer_auth" = [])),
    params(("order_id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with line items", body = ApiResponse<OrderDto>),
        (status = 403, description = "Order belongs to another user"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    State(state): State<BookingState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(order_id): Path<i32>,
) -> Result<Json<ApiResponse<OrderDto>>, ApiError> {
    let order = state.service.get_order(&user.actor(), order_id).await?;
    Ok(Json(ApiResponse::success(order.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/booking/orders/{order_id}/cancel",
    tag = "Booking",
    security(("bearer_auth" = [])),
    params(("order_id" = i32, Path, description = "Order ID")),
    request_body = CancelOrderRequest,
    responses(
        (status = 200, description = "Order cancelled", body = ApiResponse<OrderDto>),
        (status = 403, description = "Order belongs to another user"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order is already done or cancelled")
    )
)]
pub async fn cancel_order(
    State(state): State<BookingState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(order_id): Path<i32>,
    ValidatedJson(body): ValidatedJson<CancelOrderRequest>,
) -> Result<Json<ApiResponse<OrderDto>>, ApiError> {
    let order = state
        .service
        .cancel_order(&user.actor(), order_id, &body.reason)
        .await?;
    Ok(Json(ApiResponse::with_message(order.into(), "Order cancelled")))
}
