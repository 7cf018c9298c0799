use crate::error::VehicleError;
use crate::model::{NewVehicleRecord, Vehicle, VehicleRecord};
use crate::service::VehicleService;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

/// Shared state handed to every handler.
pub struct AppState {
    service: VehicleService,
}

impl AppState {
    pub fn new(service: VehicleService) -> Self {
        Self { service }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/vehicles", get(list_vehicles).post(create_vehicle))
        .route(
            "/vehicles/color/{color}/year/{year}",
            get(get_by_color_and_year),
        )
        .route("/vehicles/dimensions", get(get_by_dimensions))
        .route(
            "/vehicles/average_speed/brand/{brand}",
            get(get_average_speed_by_brand),
        )
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

async fn list_vehicles(State(state): State<Arc<AppState>>) -> Response {
    let vehicles = state.service.find_all();
    tracing::debug!(count = vehicles.len(), "listing vehicles");
    success(StatusCode::OK, to_records(&vehicles))
}

async fn create_vehicle(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewVehicleRecord>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return failure(StatusCode::BAD_REQUEST, "invalid body");
    };

    match state.service.create(body.into_attributes()) {
        Ok(vehicle) => success(StatusCode::CREATED, VehicleRecord::from(&vehicle)),
        Err(err) => service_failure(err),
    }
}

async fn get_by_color_and_year(
    State(state): State<Arc<AppState>>,
    Path((color, year)): Path<(String, String)>,
) -> Response {
    let Ok(year) = year.parse::<i32>() else {
        return failure(StatusCode::BAD_REQUEST, "invalid year");
    };

    match state.service.get_by_color_and_year(&color, year) {
        Ok(vehicles) => success(StatusCode::OK, to_records(&vehicles)),
        Err(err) => service_failure(err),
    }
}

/// Query shape for `/vehicles/dimensions?length=a-b&width=c-d`.
#[derive(Debug, Deserialize)]
struct DimensionsQuery {
    length: Option<String>,
    width: Option<String>,
}

async fn get_by_dimensions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DimensionsQuery>,
) -> Response {
    let (min_length, max_length) = parse_range(query.length.as_deref());
    let (min_width, max_width) = parse_range(query.width.as_deref());

    // Each of the four bounds is checked independently with its own message.
    let Some(min_length) = min_length else {
        return failure(StatusCode::BAD_REQUEST, "invalid min length");
    };
    let Some(max_length) = max_length else {
        return failure(StatusCode::BAD_REQUEST, "invalid max length");
    };
    let Some(min_width) = min_width else {
        return failure(StatusCode::BAD_REQUEST, "invalid min width");
    };
    let Some(max_width) = max_width else {
        return failure(StatusCode::BAD_REQUEST, "invalid max width");
    };

    match state
        .service
        .get_by_dimensions(min_length, max_length, min_width, max_width)
    {
        Ok(vehicles) => success(StatusCode::OK, to_records(&vehicles)),
        Err(err) => service_failure(err),
    }
}

async fn get_average_speed_by_brand(
    State(state): State<Arc<AppState>>,
    Path(brand): Path<String>,
) -> Response {
    if brand.trim().is_empty() {
        return failure(StatusCode::BAD_REQUEST, "invalid brand");
    }

    match state.service.get_average_speed_by_brand(&brand) {
        Ok(average) => success(StatusCode::OK, average),
        Err(err) => service_failure(err),
    }
}

/// Split a `"<min>-<max>"` query segment into its two float bounds. A missing
/// parameter or an un-splittable value yields two `None`s.
fn parse_range(raw: Option<&str>) -> (Option<f64>, Option<f64>) {
    let Some((min, max)) = raw.and_then(|value| value.split_once('-')) else {
        return (None, None);
    };
    (min.trim().parse().ok(), max.trim().parse().ok())
}

fn to_records(vehicles: &HashMap<u32, Vehicle>) -> HashMap<u32, VehicleRecord> {
    vehicles
        .iter()
        .map(|(id, vehicle)| (*id, VehicleRecord::from(vehicle)))
        .collect()
}

fn success<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(json!({"message": "success", "data": data}))).into_response()
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!(message))).into_response()
}

/// Map a wrapped service error onto a status code, branching strictly on the
/// underlying [`VehicleError`] kind.
fn service_failure(err: anyhow::Error) -> Response {
    match err.downcast_ref::<VehicleError>() {
        Some(error) if error.is_not_found() => {
            tracing::debug!(error = %err, "query matched no vehicles");
            failure(StatusCode::NOT_FOUND, "vehicles not found")
        }
        _ => {
            tracing::error!(error = ?err, "request failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
        }
    }
}
