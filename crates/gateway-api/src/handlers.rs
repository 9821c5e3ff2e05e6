//! # Request Handlers
//!
//! Axum request handlers for the checkout views and the JSON API.
//! Every request builds its own controller; nothing survives between views
//! except the query string of the redirect.

use crate::pages;
use crate::state::AppState;
use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use gateway_core::{
    normalize_field, CardEntryController, CardField, CheckoutError, FormKind, Navigation,
    NavigationMessage, Outcome, ResultController, ResultParams, ValidationErrors,
    WalletEntryController, WalletField, WalletParams,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Card submit request (raw operator input, normalized server-side)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardSubmitRequest {
    pub card_number: String,
    pub card_holder_name: String,
    pub exp_month: String,
    pub exp_year: String,
    pub cvv: String,
    pub save_card: bool,
}

/// Wallet submit request; context keys are optional and fall back to defaults
#[derive(Debug, Default, Deserialize)]
pub struct WalletSubmitRequest {
    #[serde(flatten)]
    pub context: WalletParams,
    #[serde(default)]
    pub mpin: String,
    #[serde(default)]
    pub otp: String,
}

/// Successful submit: where to go next and what is carried there
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub location: String,
    pub message: NavigationMessage,
}

/// Outcome of the result view
#[derive(Debug, Serialize)]
pub struct ResultResponse {
    pub outcome: Outcome,
    pub title: &'static str,
    pub message: &'static str,
}

/// Normalize request
#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    pub form: FormKind,
    pub field: String,
    #[serde(default)]
    pub value: String,
}

/// Normalize response
#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub form: FormKind,
    pub field: String,
    pub value: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            errors: None,
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn checkout_error_to_response(err: CheckoutError) -> ApiError {
    let code = err.status_code();
    let mut response = ErrorResponse::new(err.to_string(), code);
    if let CheckoutError::Validation(errors) = err {
        response.errors = Some(errors);
    }
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn location_of(navigation: &Navigation) -> Result<String, ApiError> {
    navigation.location().map_err(|e| {
        error!("Failed to encode navigation: {}", e);
        checkout_error_to_response(e)
    })
}

// =============================================================================
// Form plumbing
// =============================================================================

/// Incoming view context; never rejects a request, whatever the query holds
fn wallet_params(query: Option<String>) -> WalletParams {
    WalletParams::from_query(query.as_deref().unwrap_or_default())
}

fn result_params(query: Option<String>) -> ResultParams {
    ResultParams::from_query(query.as_deref().unwrap_or_default())
}

/// Feed posted form fields through the card controller's normalization
///
/// Unknown keys are ignored. An unchecked checkbox is simply absent.
fn apply_card_form(controller: &mut CardEntryController, fields: &HashMap<String, String>) {
    for (name, value) in fields {
        match name.parse::<CardField>() {
            Ok(field) => {
                controller.update_field(field, value);
            }
            Err(_) => debug!(field = %name, "Ignoring unknown card form field"),
        }
    }
}

fn apply_wallet_form(controller: &mut WalletEntryController, fields: &HashMap<String, String>) {
    for (name, value) in fields {
        match name.parse::<WalletField>() {
            Ok(field) => {
                controller.update_field(field, value);
            }
            Err(_) => debug!(field = %name, "Ignoring unknown wallet form field"),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "mock-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Root redirects to the card flow
pub async fn index() -> Redirect {
    Redirect::to(gateway_core::View::Card.path())
}

/// Empty card form
pub async fn card_page(State(state): State<AppState>) -> Html<String> {
    let controller = state.card_controller();
    Html(pages::card_page(
        controller.state(),
        controller.errors(),
        &state.gateway,
    ))
}

/// Card form post: redirect to the result view, or re-render with errors
#[instrument(skip_all)]
pub async fn card_submit(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let mut controller = state.card_controller();
    apply_card_form(&mut controller, &fields);

    match controller.submit() {
        Ok(navigation) => Ok(Redirect::to(&location_of(&navigation)?).into_response()),
        Err(errors) => {
            info!(failed = errors.len(), "Card form rejected");
            let html = pages::card_page(controller.state(), &errors, &state.gateway);
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response())
        }
    }
}

/// Wallet form, with context from the query string
pub async fn wallet_page(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, ApiError> {
    let controller = state.wallet_controller(&wallet_params(query));
    pages::wallet_page(
        controller.context(),
        controller.state(),
        controller.errors(),
        &state.gateway,
    )
    .map(Html)
    .map_err(checkout_error_to_response)
}

/// Wallet form post: redirect to the result view, or re-render with errors
#[instrument(skip_all)]
pub async fn wallet_submit(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let mut controller = state.wallet_controller(&wallet_params(query));
    apply_wallet_form(&mut controller, &fields);

    match controller.submit() {
        Ok(navigation) => Ok(Redirect::to(&location_of(&navigation)?).into_response()),
        Err(errors) => {
            info!(failed = errors.len(), "Wallet form rejected");
            let html = pages::wallet_page(
                controller.context(),
                controller.state(),
                &errors,
                &state.gateway,
            )
            .map_err(checkout_error_to_response)?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response())
        }
    }
}

/// Approved / Declined page
pub async fn result_page(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Html<String> {
    let outcome = ResultController::new(&result_params(query)).outcome();
    Html(pages::result_page(outcome, &state.gateway))
}

/// JSON card submit
#[instrument(skip_all)]
pub async fn submit_card(
    State(state): State<AppState>,
    Json(request): Json<CardSubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let mut controller = state.card_controller();
    controller.update_field(CardField::CardNumber, &request.card_number);
    controller.update_field(CardField::CardHolderName, &request.card_holder_name);
    controller.update_field(CardField::ExpMonth, &request.exp_month);
    controller.update_field(CardField::ExpYear, &request.exp_year);
    controller.update_field(CardField::Cvv, &request.cvv);
    controller.set_save_card(request.save_card);

    let navigation = controller
        .submit()
        .map_err(|errors| checkout_error_to_response(errors.into()))?;

    Ok(Json(SubmitResponse {
        location: location_of(&navigation)?,
        message: navigation.message,
    }))
}

/// JSON wallet submit
#[instrument(skip_all)]
pub async fn submit_wallet(
    State(state): State<AppState>,
    Json(request): Json<WalletSubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let mut controller = state.wallet_controller(&request.context);
    controller.update_field(WalletField::Mpin, &request.mpin);
    controller.update_field(WalletField::Otp, &request.otp);

    let navigation = controller
        .submit()
        .map_err(|errors| checkout_error_to_response(errors.into()))?;

    Ok(Json(SubmitResponse {
        location: location_of(&navigation)?,
        message: navigation.message,
    }))
}

/// JSON outcome of the result view
pub async fn get_result(RawQuery(query): RawQuery) -> Json<ResultResponse> {
    let outcome = ResultController::new(&result_params(query)).outcome();
    Json(ResultResponse {
        outcome,
        title: outcome.title(),
        message: outcome.message(),
    })
}

/// Normalize one field value as it would be stored while typing
pub async fn normalize(
    Json(request): Json<NormalizeRequest>,
) -> Result<Json<NormalizeResponse>, ApiError> {
    let value = normalize_field(request.form, &request.field, &request.value)
        .map_err(checkout_error_to_response)?;

    Ok(Json(NormalizeResponse {
        form: request.form,
        field: request.field,
        value,
    }))
}
