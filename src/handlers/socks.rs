use crate::entities::sock;
use crate::errors::ServiceError;
use crate::filters::{ComparisonOperator, SortKey};
use crate::services::socks::{SockPatch, StockMovement};
use crate::AppState;
use axum::{
    extract::{Json, Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Arrival/departure/create request for one (color, cotton percentage) pair
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SockRequest {
    /// Sock color
    #[schema(example = "blue")]
    #[validate(length(min = 1))]
    pub color: String,
    /// Cotton share of the fabric, percent
    #[schema(example = 70, minimum = 0, maximum = 100)]
    #[validate(range(min = 0, max = 100))]
    pub cotton_percentage: i32,
    /// Number of pairs moved
    #[schema(example = 100, minimum = 1)]
    #[validate(range(min = 1))]
    pub amount: i32,
}

impl SockRequest {
    fn into_movement(self) -> StockMovement {
        StockMovement {
            color: self.color,
            cotton_percentage: self.cotton_percentage,
            amount: self.amount,
        }
    }
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateSockRequest {
    #[validate(length(min = 1))]
    pub color: Option<String>,
    #[validate(range(min = 0, max = 100))]
    pub cotton_percentage: Option<i32>,
    #[validate(range(min = 0))]
    pub amount: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SockResponse {
    pub id: i64,
    pub color: String,
    pub cotton_percentage: i32,
    pub amount: i32,
}

impl From<sock::Model> for SockResponse {
    fn from(model: sock::Model) -> Self {
        Self {
            id: model.id,
            color: model.color,
            cotton_percentage: model.cotton_percentage,
            amount: model.amount,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AmountResponse {
    pub amount: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SocksList {
    pub socks: Vec<SockResponse>,
}

impl SocksList {
    fn from_models(models: Vec<sock::Model>) -> Self {
        Self {
            socks: models.into_iter().map(SockResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AmountQuery {
    /// Exact color match
    pub color: String,
    /// One of `moreThan`, `lessThan`, `equal`
    pub operation: String,
    /// Cotton percentage threshold
    pub cotton: i32,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct CottonRangeQuery {
    /// Inclusive lower cotton percentage bound
    pub from: i32,
    /// Inclusive upper cotton percentage bound
    pub to: i32,
    /// Optional sort key: `color` or `cotton` (case-insensitive)
    pub sorted_by: Option<String>,
}

/// Create the socks router
pub fn socks_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_socks_amount))
        .route("/income", post(register_income))
        .route("/outcome", post(register_outcome))
        .route("/:id", put(update_sock))
        .route("/batch", post(upload_batch))
        .route("/filter-by-cotton", get(filter_by_cotton))
}

/// Register an arrival of socks
#[utoipa::path(
    post,
    path = "/socks/income",
    request_body = SockRequest,
    responses(
        (status = 200, description = "Arrival registered", body = SockResponse),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "socks"
)]
pub async fn register_income(
    State(state): State<AppState>,
    Json(payload): Json<SockRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    info!(color = %payload.color, amount = payload.amount, "received sock income request");

    let saved = state
        .sock_service
        .register_arrival(payload.into_movement())
        .await?;
    Ok((StatusCode::OK, Json(SockResponse::from(saved))))
}

/// Register a departure of socks
#[utoipa::path(
    post,
    path = "/socks/outcome",
    request_body = SockRequest,
    responses(
        (status = 200, description = "Departure registered", body = SockResponse),
        (status = 400, description = "Invalid input or insufficient stock", body = crate::errors::ErrorResponse),
        (status = 404, description = "No such sock pair", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "socks"
)]
pub async fn register_outcome(
    State(state): State<AppState>,
    Json(payload): Json<SockRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    info!(color = %payload.color, amount = payload.amount, "received sock outcome request");

    let departed = state
        .sock_service
        .register_departure(payload.into_movement())
        .await?;
    Ok((StatusCode::OK, Json(SockResponse::from(departed))))
}

/// Aggregate sock amount under a color + operator + threshold filter
#[utoipa::path(
    get,
    path = "/socks",
    params(AmountQuery),
    responses(
        (status = 200, description = "Aggregate amount returned", body = AmountResponse),
        (status = 400, description = "Unknown operation", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "socks"
)]
pub async fn get_socks_amount(
    State(state): State<AppState>,
    Query(query): Query<AmountQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let operator: ComparisonOperator = query.operation.parse()?;
    let amount = state
        .sock_service
        .socks_amount(&query.color, operator, query.cotton)
        .await?;
    Ok((StatusCode::OK, Json(AmountResponse { amount })))
}

/// Update fields of a stored sock record
#[utoipa::path(
    put,
    path = "/socks/{id}",
    params(("id" = i64, Path, description = "Sock record id")),
    request_body = UpdateSockRequest,
    responses(
        (status = 200, description = "Record updated", body = SockResponse),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
        (status = 404, description = "No record with this id", body = crate::errors::ErrorResponse),
        (status = 409, description = "Color/cotton pair already in use", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "socks"
)]
pub async fn update_sock(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateSockRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    info!(id, "received sock update request");

    let patch = SockPatch {
        color: payload.color,
        cotton_percentage: payload.cotton_percentage,
        amount: payload.amount,
    };
    let updated = state.sock_service.update_sock(id, patch).await?;
    Ok((StatusCode::OK, Json(SockResponse::from(updated))))
}

/// Bulk-import sock records from an uploaded CSV file
#[utoipa::path(
    post,
    path = "/socks/batch",
    responses(
        (status = 200, description = "Batch imported", body = SocksList),
        (status = 400, description = "Empty file, wrong format, wrong headers or unreadable rows", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "socks"
)]
pub async fn upload_batch(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ServiceError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::InvalidInput(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(ToString::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| ServiceError::FileRead(e.to_string()))?;

        info!(
            file_name = file_name.as_deref().unwrap_or("<unnamed>"),
            bytes = data.len(),
            "received sock batch upload"
        );
        let created = state
            .import_service
            .import_batch(file_name.as_deref(), &data)
            .await?;
        return Ok((StatusCode::OK, Json(SocksList::from_models(created))));
    }

    Err(ServiceError::InvalidInput(
        "multipart payload must contain a `file` part".to_string(),
    ))
}

/// List sock records in a cotton percentage range, optionally sorted
#[utoipa::path(
    get,
    path = "/socks/filter-by-cotton",
    params(CottonRangeQuery),
    responses(
        (status = 200, description = "Filtered list returned", body = SocksList),
        (status = 400, description = "Unknown sort field", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "socks"
)]
pub async fn filter_by_cotton(
    State(state): State<AppState>,
    Query(query): Query<CottonRangeQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let sort = query
        .sorted_by
        .as_deref()
        .map(str::parse::<SortKey>)
        .transpose()?;
    let socks = state
        .sock_service
        .socks_by_cotton_range(query.from, query.to, sort)
        .await?;
    Ok((StatusCode::OK, Json(SocksList::from_models(socks))))
}
