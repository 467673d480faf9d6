use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use uuid::Uuid;

use service::file::FileService;
use service::member::domain::{LoginInput, RegisterInput};
use service::member::repo::seaorm::SeaOrmMemberRepository;
use service::member::service::{AuthConfig, AuthService};
use service::post::PostService;

use crate::errors::ApiError;
use crate::extract::CurrentMember;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerState {
    pub db: Arc<DatabaseConnection>,
    pub auth: Arc<AuthService<SeaOrmMemberRepository>>,
    pub posts: PostService,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, auth: AuthConfig, files: FileService) -> Self {
        let db = Arc::new(db);
        let repo = Arc::new(SeaOrmMemberRepository { db: db.clone() });
        Self {
            auth: Arc::new(AuthService::new(repo, auth)),
            posts: PostService::new(db.clone(), files),
            db,
        }
    }

    pub fn files(&self) -> &FileService { self.posts.files() }
}

#[derive(Serialize)]
pub struct RegisterOutput { pub member_id: Uuid }

#[derive(Serialize)]
pub struct MeOutput { pub member_id: Uuid, pub email: String, pub nickname: String }

#[derive(Serialize)]
pub struct LoginOutput { pub member_id: Uuid, pub email: String, pub nickname: String, pub token: String }

#[utoipa::path(post, path = "/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 200, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(State(state): State<ServerState>, Json(input): Json<RegisterInput>) -> Result<Json<RegisterOutput>, ApiError> {
    let member = state.auth.register(input).await?;
    Ok(Json(RegisterOutput { member_id: member.id }))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn login(State(state): State<ServerState>, jar: CookieJar, Json(input): Json<LoginInput>) -> Result<(CookieJar, Json<LoginOutput>), ApiError> {
    let session = state.auth.login(input).await?;
    let mut cookie = Cookie::new(AUTH_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    let jar = jar.add(cookie);
    let member = session.member;
    let out = LoginOutput { member_id: member.id, email: member.email, nickname: member.nickname, token: session.token };
    Ok((jar, Json(out)))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth", responses((status = 204, description = "Cookie cleared")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    let jar = jar.remove(cookie);
    (jar, StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/auth/me", tag = "auth", responses((status = 200, description = "Current member"), (status = 401, description = "Unauthorized")))]
pub async fn me(CurrentMember(member): CurrentMember) -> Json<MeOutput> {
    Json(MeOutput { member_id: member.id, email: member.email, nickname: member.nickname })
}
