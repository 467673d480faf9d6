use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::BaseStatus;

/// Registration input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub nickname: String,
    pub password: String,
}

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Domain member (business view)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberAccount {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    pub status: BaseStatus,
}

/// The authenticated member a request acts as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginMember {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
}

impl From<MemberAccount> for LoginMember {
    fn from(m: MemberAccount) -> Self {
        Self { id: m.id, email: m.email, nickname: m.nickname }
    }
}

/// Domain credentials (hashed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub member_id: Uuid,
    pub password_hash: String,
    pub password_algorithm: String,
}

/// Login result (session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub member: LoginMember,
    pub token: String,
}

/// JWT claims issued at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// member id
    pub sub: String,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}
