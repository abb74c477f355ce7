//! Post pages: listings, detail and the shared create/edit form.

use actix_web::{HttpRequest, HttpResponse, http::header, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use yatube_core::domain::Actor;
use yatube_core::forms::PostForm;
use yatube_core::{DomainError, ValidationErrors};
use yatube_shared::ViewResponse;
use yatube_shared::view::{
    GroupContext, IndexContext, PostDetailContext, PostFormContext, ProfileContext,
};

use super::context;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

pub const INDEX_TEMPLATE: &str = "posts/index.html";
pub const GROUP_LIST_TEMPLATE: &str = "posts/group_list.html";
pub const PROFILE_TEMPLATE: &str = "posts/profile.html";
pub const POST_DETAIL_TEMPLATE: &str = "posts/post_detail.html";
pub const POST_FORM_TEMPLATE: &str = "posts/create_post.html";

/// `?page=` of the listing pages. Anything unparsable falls back to page 1.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

fn render<T: Serialize>(template: &str, context: T) -> HttpResponse {
    HttpResponse::Ok().json(ViewResponse::new(template, context))
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Send an anonymous visitor to the login page, remembering where they were.
fn login_redirect(state: &AppState, req: &HttpRequest) -> HttpResponse {
    redirect(&format!("{}?next={}", state.login_url, req.path()))
}

/// The submitted form, or an empty one when the body cannot be read.
///
/// Identity and ownership are settled before this is consulted, and an empty
/// form fails validation like any other incomplete submission.
fn submitted(form: Result<web::Form<PostForm>, actix_web::Error>) -> PostForm {
    match form {
        Ok(form) => form.into_inner(),
        Err(e) => {
            tracing::debug!(error = %e, "Unreadable post form body");
            PostForm::default()
        }
    }
}

fn profile_url(username: &str) -> String {
    format!("/profile/{}/", username)
}

fn post_url(post_id: Uuid) -> String {
    format!("/posts/{}/", post_id)
}

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state.posts.index(query.page.as_deref()).await?;

    Ok(render(
        INDEX_TEMPLATE,
        IndexContext {
            page_obj: context::page_obj(page),
        },
    ))
}

/// GET /group/{slug}/
pub async fn group_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let (group, page) = state
        .posts
        .group_posts(&path.into_inner(), query.page.as_deref())
        .await?;

    Ok(render(
        GROUP_LIST_TEMPLATE,
        GroupContext {
            group: context::group_item(group),
            page_obj: context::page_obj(page),
        },
    ))
}

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let (author, page) = state
        .posts
        .profile(&path.into_inner(), query.page.as_deref())
        .await?;

    Ok(render(
        PROFILE_TEMPLATE,
        ProfileContext {
            author: context::author_item(author),
            page_obj: context::page_obj(page),
        },
    ))
}

/// GET /posts/{post_id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let view = state.posts.post_detail(path.into_inner()).await?;

    Ok(render(
        POST_DETAIL_TEMPLATE,
        PostDetailContext {
            post: context::post_item(view),
        },
    ))
}

/// Render the form page, optionally with the errors of a rejected submission.
async fn form_page(
    state: &AppState,
    values: &PostForm,
    errors: Option<&ValidationErrors>,
    post_id: Option<Uuid>,
) -> AppResult<HttpResponse> {
    let groups = state.posts.group_choices().await?;
    let post = match post_id {
        Some(id) => Some(context::post_item(state.posts.post_detail(id).await?)),
        None => None,
    };

    Ok(render(
        POST_FORM_TEMPLATE,
        PostFormContext {
            form: context::post_form(values, errors, &groups),
            is_edit: post_id.is_some(),
            post,
        },
    ))
}

/// GET /create/
pub async fn create_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    if identity.0.is_none() {
        return Ok(login_redirect(&state, &req));
    }

    form_page(&state, &PostForm::default(), None, None).await
}

/// POST /create/
pub async fn create_submit(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    req: HttpRequest,
    form: Result<web::Form<PostForm>, actix_web::Error>,
) -> AppResult<HttpResponse> {
    let Some(actor) = identity.actor() else {
        return Ok(login_redirect(&state, &req));
    };
    let form = submitted(form);

    match state.posts.create_post(&actor, &form).await {
        Ok(_) => Ok(redirect(&profile_url(&actor.username))),
        Err(DomainError::Validation(errors)) => {
            form_page(&state, &form, Some(&errors), None).await
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /posts/{post_id}/edit/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let Some(actor) = identity.actor() else {
        return Ok(login_redirect(&state, &req));
    };
    let post_id = path.into_inner();

    match state.posts.post_for_edit(&actor, post_id).await {
        Ok(view) => {
            let groups = state.posts.group_choices().await?;
            let values = PostForm::from_post(&view.post);

            Ok(render(
                POST_FORM_TEMPLATE,
                PostFormContext {
                    form: context::post_form(&values, None, &groups),
                    is_edit: true,
                    post: Some(context::post_item(view)),
                },
            ))
        }
        Err(e) => not_owner_redirect(e, &actor, post_id),
    }
}

/// POST /posts/{post_id}/edit/
pub async fn edit_submit(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    req: HttpRequest,
    path: web::Path<Uuid>,
    form: Result<web::Form<PostForm>, actix_web::Error>,
) -> AppResult<HttpResponse> {
    let Some(actor) = identity.actor() else {
        return Ok(login_redirect(&state, &req));
    };
    let post_id = path.into_inner();
    let form = submitted(form);

    match state.posts.edit_post(&actor, post_id, &form).await {
        Ok(post) => Ok(redirect(&post_url(post.id))),
        Err(DomainError::Validation(errors)) => {
            form_page(&state, &form, Some(&errors), Some(post_id)).await
        }
        Err(e) => not_owner_redirect(e, &actor, post_id),
    }
}

/// Someone else's post sends the visitor to its detail page instead.
fn not_owner_redirect(err: DomainError, actor: &Actor, post_id: Uuid) -> AppResult<HttpResponse> {
    match err {
        DomainError::Forbidden => {
            tracing::debug!(%post_id, user = %actor.username, "Edit of foreign post redirected");
            Ok(redirect(&post_url(post_id)))
        }
        other => Err(other.into()),
    }
}
