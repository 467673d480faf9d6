use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use service::experience::{self, GetExperienceResponse, UpdateExperienceRequest};

use crate::errors::ApiError;
use crate::extract::CurrentMember;
use crate::routes::auth::ServerState;

#[utoipa::path(patch, path = "/api/experiences/{id}", tag = "experiences", params(("id" = Uuid, Path,)), request_body = crate::openapi::UpdateExperienceDoc, responses((status = 200, description = "Updated", body = crate::openapi::ExperienceDoc), (status = 400, description = "Not the owner"), (status = 404, description = "Not Found"), (status = 405, description = "Experience removed")))]
pub async fn update(
    State(state): State<ServerState>,
    CurrentMember(member): CurrentMember,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateExperienceRequest>,
) -> Result<Json<GetExperienceResponse>, ApiError> {
    Ok(Json(experience::update_experience(state.db.as_ref(), member.id, id, &req).await?))
}
