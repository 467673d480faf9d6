use axum::{extract::State, Json};

use service::tag::{self, FindTagResponse};

use crate::errors::ApiError;
use crate::extract::CurrentMember;
use crate::routes::auth::ServerState;

#[utoipa::path(get, path = "/api/tags", tag = "tags", responses((status = 200, description = "Member's active tags grouped by type", body = [crate::openapi::TagGroupDoc]), (status = 401, description = "Unauthorized")))]
pub async fn list(
    State(state): State<ServerState>,
    CurrentMember(member): CurrentMember,
) -> Result<Json<Vec<FindTagResponse>>, ApiError> {
    Ok(Json(tag::find_tag_list(state.db.as_ref(), member.id).await?))
}
