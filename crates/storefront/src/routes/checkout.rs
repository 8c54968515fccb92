//! Checkout route handlers.
//!
//! Checkout is the one flow with a user-visible failure path: the API
//! reports the outcome in its payload, and both outcomes render as an
//! alert fragment. A malformed email never reaches the API at all.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use cartwheel_core::Email;

use crate::filters;
use crate::shop::ShopApi;
use crate::shop::types::CheckoutOutcome;
use crate::state::AppState;

/// Fallback alert when the checkout request itself fails.
pub(crate) const CHECKOUT_FALLBACK_MESSAGE: &str = "Could not place the order";

/// Alert shown when the email field does not parse.
pub(crate) const INVALID_EMAIL_MESSAGE: &str = "Enter a valid email address";

// =============================================================================
// Templates
// =============================================================================

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutShowTemplate;

/// Checkout result alert fragment (HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/checkout_alert.html")]
pub struct CheckoutAlertTemplate {
    pub message: String,
    pub kind: &'static str,
}

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    /// Guest email field. Present-but-invalid blocks submission.
    pub email: Option<String>,
}

// =============================================================================
// Flow
// =============================================================================

/// Outcome of a checkout submission, from the view's perspective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CheckoutResponse {
    /// The email field did not validate; nothing was sent.
    Invalid { message: String },
    /// The API created an order.
    Placed { order_id: String, total: String },
    /// The API rejected the checkout, or the request failed.
    Rejected { message: String },
}

/// Validate the email field and submit the checkout.
///
/// An email field that is present but malformed aborts before any API
/// call. Transport and parse failures collapse into a generic rejection
/// message after being reported.
pub(crate) async fn submit<S: ShopApi>(shop: &S, email_field: Option<&str>) -> CheckoutResponse {
    let email = match email_field {
        Some(raw) => match Email::parse(raw.trim()) {
            Ok(email) => Some(email),
            Err(e) => {
                tracing::debug!(error = %e, "rejected checkout email");
                return CheckoutResponse::Invalid {
                    message: INVALID_EMAIL_MESSAGE.to_string(),
                };
            }
        },
        None => None,
    };

    match shop.checkout(email).await {
        Ok(CheckoutOutcome::Placed(order)) => CheckoutResponse::Placed {
            order_id: order.id.to_string(),
            total: order.total,
        },
        Ok(CheckoutOutcome::Rejected { detail }) => CheckoutResponse::Rejected { message: detail },
        Err(e) => {
            sentry::capture_error(&e);
            tracing::error!(error = %e, "checkout request failed");
            CheckoutResponse::Rejected {
                message: CHECKOUT_FALLBACK_MESSAGE.to_string(),
            }
        }
    }
}

/// Confirmation line for a placed order, naming id and total verbatim.
pub(crate) fn confirmation_message(order_id: &str, total: &str) -> String {
    format!("Order #{order_id} placed! Total: ${total}")
}

// =============================================================================
// Handlers
// =============================================================================

/// Display checkout page.
pub async fn show() -> CheckoutShowTemplate {
    CheckoutShowTemplate
}

/// Submit checkout (HTMX).
///
/// A placed order renders its confirmation and navigates to the site root
/// via `HX-Redirect`; every other outcome stays on the page.
#[instrument(skip(state))]
pub async fn submit_form(
    State(state): State<AppState>,
    Form(form): Form<CheckoutForm>,
) -> Response {
    match submit(state.shop(), form.email.as_deref()).await {
        CheckoutResponse::Placed { order_id, total } => {
            let alert = CheckoutAlertTemplate {
                message: confirmation_message(&order_id, &total),
                kind: "success",
            };
            (AppendHeaders([("HX-Redirect", "/")]), alert).into_response()
        }
        CheckoutResponse::Invalid { message } | CheckoutResponse::Rejected { message } => {
            CheckoutAlertTemplate {
                message,
                kind: "error",
            }
            .into_response()
        }
    }
}
