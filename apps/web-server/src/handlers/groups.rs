//! Staff-only group administration.

use actix_web::{HttpResponse, web};

use yatube_core::ports::AuthError;
use yatube_shared::dto::CreateGroupRequest;

use super::context;
use crate::middleware::auth::{Identity, STAFF_ROLE};
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn require_staff(identity: &Identity) -> AppResult<()> {
    if identity.has_role(STAFF_ROLE) {
        Ok(())
    } else {
        tracing::warn!(user = %identity.username, "Group administration denied");
        Err(AuthError::InsufficientPermissions.into())
    }
}

/// POST /admin/groups/
pub async fn create_group(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateGroupRequest>,
) -> AppResult<HttpResponse> {
    require_staff(&identity)?;
    let req = body.into_inner();

    let group = state
        .groups
        .create_group(&req.title, &req.slug, &req.description)
        .await?;

    Ok(HttpResponse::Created().json(context::group_item(group)))
}

/// DELETE /admin/groups/{slug}/
pub async fn delete_group(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    require_staff(&identity)?;
    state.groups.delete_group(&path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}
