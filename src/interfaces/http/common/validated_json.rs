//! Validated JSON extractor for Axum
//!
//! `ValidatedJson<T>` deserializes like `axum::Json<T>` and then runs
//! `validator::Validate::validate()`. Failures are returned as [`ApiError`]
//! so they share the error envelope of every other handler failure.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use super::ApiError;

pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        value
            .validate()
            .map_err(|errors| ApiError::Unprocessable(describe(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
}

/// `field: message; other.nested[0].field: message`
fn describe(errors: &ValidationErrors) -> String {
    let mut out = Vec::new();
    collect(errors, "", &mut out);
    if out.is_empty() {
        "Validation failed".to_string()
    } else {
        out.join("; ")
    }
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                for e in errs {
                    let msg = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    out.push(format!("{}: {}", path, msg));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    collect(inner, &format!("{}[{}]", path, idx), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct Line {
        #[validate(range(min = 1))]
        quantity: i32,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Cart {
        #[validate(length(min = 1, max = 20))]
        reason: String,
        #[validate(nested)]
        lines: Vec<Line>,
    }

    async fn handler(ValidatedJson(_body): ValidatedJson<Cart>) -> &'static str {
        "ok"
    }

    fn app() -> Router {
        Router::new().route("/cart", post(handler))
    }

    fn json_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/cart")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn valid_body_passes() {
        let resp = app()
            .oneshot(json_request(r#"{"reason":"ok","lines":[{"quantity":2}]}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let resp = app().oneshot(json_request("{not json")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn nested_violation_is_unprocessable() {
        let resp = app()
            .oneshot(json_request(r#"{"reason":"ok","lines":[{"quantity":0}]}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn describe_includes_nested_path() {
        let cart = Cart {
            reason: String::new(),
            lines: vec![Line { quantity: 0 }],
        };
        let message = describe(&cart.validate().unwrap_err());
        assert!(message.contains("reason"));
        assert!(message.contains("lines[0].quantity"));
    }
}
