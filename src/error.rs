use axum::{Json, http::StatusCode, response::IntoResponse};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("invalid arguments: {0}")]
  InvalidArgs(String),
  /// Listing or upload against the object store failed. Kept distinct
  /// so a failed listing is never read as "zero usage"
  #[error("object storage unavailable: {0}")]
  StorageUnavailable(String),
  #[error(transparent)]
  Db(#[from] sea_orm::DbErr),
}

impl IntoResponse for Error {
  fn into_response(self) -> axum::response::Response {
    let status = match &self {
      Error::InvalidArgs(_) => StatusCode::BAD_REQUEST,
      Error::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
      Error::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
      tracing::error!("request failed: {self}");
    }

    let body = json::json!({ "success": false, "msg": self.to_string() });
    (status, Json(body)).into_response()
  }
}
