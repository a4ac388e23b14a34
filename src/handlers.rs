use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
  entity::{ReferralSource, referral_code, referral_event},
  prelude::*,
  state::AppState,
  sv,
};

#[derive(Serialize)]
pub struct Status {
  success: bool,
  msg: Option<String>,
}

pub async fn health() -> &'static str {
  "OK"
}

#[derive(Deserialize)]
pub struct AccountReq {
  pub account_id: String,
}

pub async fn referral_code(
  State(app): State<Arc<AppState>>,
  Json(req): Json<AccountReq>,
) -> Result<Json<referral_code::Model>> {
  let code =
    sv::Referral::new(&app.db).get_or_create_code(&req.account_id).await?;
  Ok(Json(code))
}

pub async fn referral_info(
  State(app): State<Arc<AppState>>,
  Json(req): Json<AccountReq>,
) -> Result<Response> {
  match sv::Referral::new(&app.db).code_info(&req.account_id).await? {
    Some(info) => Ok(Json(info).into_response()),
    None => Ok(
      (
        StatusCode::NOT_FOUND,
        Json(Status { success: false, msg: Some("no referral code".into()) }),
      )
        .into_response(),
    ),
  }
}

pub async fn referral_events(
  State(app): State<Arc<AppState>>,
  Json(req): Json<AccountReq>,
) -> Result<Json<Vec<referral_event::Model>>> {
  let events = sv::Referral::new(&app.db).events(&req.account_id).await?;
  Ok(Json(events))
}

#[derive(Deserialize)]
pub struct RegisterReq {
  pub code: String,
  pub referred_id: String,
  pub is_pro: bool,
  #[serde(default)]
  pub source: ReferralSource,
  pub social_platform: Option<String>,
  pub post_link: Option<String>,
}

pub async fn register_referral(
  State(app): State<Arc<AppState>>,
  Json(req): Json<RegisterReq>,
) -> Result<(StatusCode, Json<Status>)> {
  let ok = sv::Referral::new(&app.db)
    .register(
      &req.code,
      &req.referred_id,
      req.is_pro,
      req.source,
      req.social_platform,
      req.post_link,
    )
    .await?;

  if ok {
    Ok((StatusCode::OK, Json(Status { success: true, msg: None })))
  } else {
    Ok((
      StatusCode::UNPROCESSABLE_ENTITY,
      Json(Status { success: false, msg: Some("referral rejected".into()) }),
    ))
  }
}

#[derive(Deserialize)]
pub struct StatusReq {
  pub referred_id: String,
  pub is_pro_active: bool,
}

pub async fn referral_status(
  State(app): State<Arc<AppState>>,
  Json(req): Json<StatusReq>,
) -> Result<Json<Status>> {
  sv::Referral::new(&app.db)
    .update_referral_status(&req.referred_id, req.is_pro_active)
    .await?;
  Ok(Json(Status { success: true, msg: None }))
}

#[derive(Deserialize)]
pub struct StorageReq {
  pub account_id: String,
  pub is_pro: bool,
}

pub async fn storage_info(
  State(app): State<Arc<AppState>>,
  Json(req): Json<StorageReq>,
) -> Result<Json<sv::storage::StorageInfo>> {
  let info = sv::Storage::new(&app.db, app.store.as_ref())
    .info(&req.account_id, req.is_pro)
    .await?;
  Ok(Json(info))
}

#[derive(Deserialize)]
pub struct SpaceCheckReq {
  pub account_id: String,
  pub file_size: i64,
  pub is_pro: bool,
}

#[derive(Serialize)]
pub struct SpaceCheckResp {
  pub allowed: bool,
}

pub async fn storage_check(
  State(app): State<Arc<AppState>>,
  Json(req): Json<SpaceCheckReq>,
) -> Result<Json<SpaceCheckResp>> {
  let allowed = sv::Storage::new(&app.db, app.store.as_ref())
    .has_enough_space(&req.account_id, req.file_size, req.is_pro)
    .await?;
  Ok(Json(SpaceCheckResp { allowed }))
}
