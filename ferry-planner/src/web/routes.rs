//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::domain::{DataError, ItineraryError, Ledger, Location, ShareError};
use crate::planner::{Constraint, RankingCriterion, Trip, TripError};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/trip/evaluate", post(evaluate_trip))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Evaluate a round trip over the legs supplied in the request, or over the
/// server's dataset when the request has none.
async fn evaluate_trip(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<EvaluateTripResponse>, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: EvaluateTripRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!(body = %String::from_utf8_lossy(&body), "rejected request body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let sharing = cost_sharing(&req)?;

    // Bounded by the assembler ceiling, so run inline
    let evaluation = build_trip(&state, req)?.evaluate()?;

    let itineraries = evaluation
        .itineraries
        .iter()
        .map(|it| ItineraryResult::from_itinerary_shared(it, &sharing))
        .collect();

    Ok(Json(EvaluateTripResponse {
        itineraries,
        assembled: evaluation.assembled,
        survived: evaluation.survived,
    }))
}

/// Collect who shares the costs and what they have paid.
fn cost_sharing(req: &EvaluateTripRequest) -> Result<CostSharing, AppError> {
    let fuel_spent = req
        .fuel_spent
        .map(|amount| amount_in("fuel_spent", amount))
        .transpose()?;

    if req.people.is_empty() && req.expenses.is_empty() {
        return Ok(CostSharing {
            ledger: None,
            fuel_spent,
        });
    }

    let mut ledger = Ledger::new(&req.people)?;
    for expense in &req.expenses {
        let amount = amount_in(&expense.description, expense.amount)?;
        ledger.add_expense(&expense.person, &expense.description, amount)?;
    }

    Ok(CostSharing {
        ledger: Some(ledger),
        fuel_spent,
    })
}

/// Turn a request into a trip, applying the server's limits.
fn build_trip(state: &AppState, req: EvaluateTripRequest) -> Result<Trip, AppError> {
    let origin = Location::new(&req.origin).map_err(|_| AppError::BadRequest {
        message: format!("Invalid origin: {:?}", req.origin),
    })?;
    let destination = Location::new(&req.destination).map_err(|_| AppError::BadRequest {
        message: format!("Invalid destination: {:?}", req.destination),
    })?;

    let constraints = req
        .constraints
        .iter()
        .map(ConstraintDto::to_constraint)
        .collect::<Result<Vec<Constraint>, DataError>>()?;
    let criteria = req
        .ranking
        .iter()
        .map(CriterionDto::to_criterion)
        .collect::<Result<Vec<RankingCriterion>, _>>()
        .map_err(TripError::from)?;

    let mut builder = Trip::builder(origin, destination)
        .config((*state.config).clone())
        .constraints(constraints)
        .ranking(criteria);

    builder = match &state.dataset {
        Some(repo) if req.cars.is_empty() && req.ferries.is_empty() => {
            builder.repository(repo.clone())
        }
        _ => builder.car_records(req.cars).ferry_records(req.ferries),
    };

    if let Some(vehicle) = req.vehicle {
        builder = builder.vehicle(vehicle);
    }
    let named = req.people.len();
    let party_size = match req.party_size {
        Some(size) if named > 0 && usize::try_from(size).ok() != Some(named) => {
            return Err(AppError::BadRequest {
                message: format!("party_size {size} does not match {named} people"),
            });
        }
        Some(size) => Some(size),
        None if named > 0 => Some(u32::try_from(named).unwrap_or(u32::MAX)),
        None => None,
    };
    if let Some(party_size) = party_size {
        builder = builder.party_size(party_size);
    }
    if let Some(max_results) = req.max_results {
        builder = builder.max_results(max_results.min(state.config.max_results));
    }
    if let Some(dedup) = req.dedup {
        builder = builder.dedup(dedup);
    }

    Ok(builder.build()?)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Unprocessable { message: String },
    Internal { message: String },
}

impl From<TripError> for AppError {
    fn from(e: TripError) -> Self {
        let message = e.to_string();
        match e {
            TripError::Data(_) | TripError::Itinerary(ItineraryError::EmptyParty) => {
                AppError::BadRequest { message }
            }
            TripError::Assembly(_) | TripError::Rank(_) => AppError::Unprocessable { message },
            TripError::Itinerary(_) | TripError::Config(_) => AppError::Internal { message },
        }
    }
}

impl From<ShareError> for AppError {
    fn from(e: ShareError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<DataError> for AppError {
    fn from(e: DataError) -> Self {
        TripError::from(e).into()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Unprocessable { message } => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
