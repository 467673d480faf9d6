use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::domain::{AuthSession, Claims, LoginInput, LoginMember, MemberAccount, RegisterInput};
use super::errors::AuthError;
use super::repository::MemberRepository;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub password_algorithm: String,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, token_ttl_hours: i64) -> Self {
        Self { jwt_secret: jwt_secret.into(), token_ttl_hours, password_algorithm: "argon2".into() }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: MemberRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: MemberRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new member with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::member::{service::{AuthService, AuthConfig}, repository::mock::MockMemberRepository};
    /// use service::member::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockMemberRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::new("secret", 1));
    /// let input = RegisterInput { email: "user@example.com".into(), nickname: "Traveller".into(), password: "Secret123".into() };
    /// let member = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(member.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<MemberAccount, AuthError> {
        if input.password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!("password too short (>={MIN_PASSWORD_LEN})")));
        }
        models::member::validate_email(&input.email).map_err(|e| AuthError::Validation(e.to_string()))?;
        models::member::validate_nickname(&input.nickname).map_err(|e| AuthError::Validation(e.to_string()))?;
        let email = input.email.trim();
        if let Some(existing) = self.repo.find_by_email(email).await? {
            debug!("member exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        let member = self
            .repo
            .create_member(email, input.nickname.trim(), hash, self.cfg.password_algorithm.clone())
            .await?;
        info!(member_id = %member.id, email = %member.email, "member_registered");
        Ok(member)
    }

    /// Authenticate a member and issue a token.
    ///
    /// # Examples
    /// ```
    /// use service::member::{service::{AuthService, AuthConfig}, repository::mock::MockMemberRepository};
    /// use service::member::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockMemberRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig::new("secret", 1));
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { email: "u@e.com".into(), nickname: "N".into(), password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.member.email, "u@e.com");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let member = self.repo
            .find_by_email(input.email.trim())
            .await?
            .ok_or(AuthError::Unauthorized)?;
        if !member.status.is_active() {
            warn!(member_id = %member.id, "login_rejected_inactive_member");
            return Err(AuthError::Unauthorized);
        }

        let cred = self.repo
            .get_credentials(member.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let token = self.issue_token(&member)?;
        info!(member_id = %member.id, "member_logged_in");
        Ok(AuthSession { member: member.into(), token })
    }

    fn issue_token(&self, member: &MemberAccount) -> Result<String, AuthError> {
        let now = chrono::Utc::now();
        let exp = (now + chrono::Duration::hours(self.cfg.token_ttl_hours)).timestamp() as usize;
        let claims = Claims { sub: member.id.to_string(), email: member.email.clone(), iat: now.timestamp() as usize, exp };
        encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Validate signature and expiry; returns the member id carried in `sub`.
    pub fn verify_token(&self, token: &str) -> Result<Uuid, AuthError> {
        let key = DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let data = decode::<Claims>(token, &key, &validation).map_err(|e| AuthError::TokenError(e.to_string()))?;
        Uuid::parse_str(&data.claims.sub).map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Resolve the member behind a bearer token; inactive members are rejected.
    pub async fn resolve_login_member(&self, token: &str) -> Result<LoginMember, AuthError> {
        let member_id = self.verify_token(token)?;
        let member = self.repo.find_by_id(member_id).await?.ok_or(AuthError::NotFound)?;
        if !member.status.is_active() {
            return Err(AuthError::Unauthorized);
        }
        Ok(member.into())
    }
}
