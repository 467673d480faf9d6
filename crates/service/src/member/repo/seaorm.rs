use std::sync::Arc;

use sea_orm::{DatabaseConnection, EntityTrait, TransactionTrait};
use uuid::Uuid;

use models::errors::ModelError;

use crate::member::domain::{Credentials, MemberAccount};
use crate::member::errors::AuthError;
use crate::member::repository::MemberRepository;

pub struct SeaOrmMemberRepository {
    pub db: Arc<DatabaseConnection>,
}

fn to_account(m: models::member::Model) -> MemberAccount {
    MemberAccount { id: m.id, email: m.email, nickname: m.nickname, status: m.status }
}

fn from_model(e: ModelError) -> AuthError {
    match e {
        ModelError::Validation(msg) => AuthError::Validation(msg),
        ModelError::Conflict(_) => AuthError::Conflict,
        ModelError::Db(msg) => AuthError::Repository(msg),
    }
}

fn from_db(e: sea_orm::DbErr) -> AuthError { from_model(ModelError::from(e)) }

#[async_trait::async_trait]
impl MemberRepository for SeaOrmMemberRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<MemberAccount>, AuthError> {
        let res = models::member::find_by_email(self.db.as_ref(), email).await.map_err(from_model)?;
        Ok(res.map(to_account))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MemberAccount>, AuthError> {
        let res = models::member::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(from_db)?;
        Ok(res.map(to_account))
    }

    async fn create_member(
        &self,
        email: &str,
        nickname: &str,
        password_hash: String,
        password_algorithm: String,
    ) -> Result<MemberAccount, AuthError> {
        // rolled back on drop when either insert fails
        let txn = self.db.begin().await.map_err(from_db)?;
        let created = models::member::create(&txn, email, nickname).await.map_err(from_model)?;
        models::member_credentials::upsert_password(&txn, created.id, password_hash, &password_algorithm)
            .await
            .map_err(from_model)?;
        txn.commit().await.map_err(from_db)?;
        Ok(to_account(created))
    }

    async fn get_credentials(&self, member_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let res = models::member_credentials::find_by_member(self.db.as_ref(), member_id)
            .await
            .map_err(from_model)?;
        Ok(res.map(|c| Credentials { member_id: c.member_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm }))
    }
}
