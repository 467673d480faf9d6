use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{Credentials, MemberAccount};
use super::errors::AuthError;

/// Repository abstraction for member persistence.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<MemberAccount>, AuthError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<MemberAccount>, AuthError>;
    /// Insert the member together with its credentials; both rows or neither.
    async fn create_member(
        &self,
        email: &str,
        nickname: &str,
        password_hash: String,
        password_algorithm: String,
    ) -> Result<MemberAccount, AuthError>;

    async fn get_credentials(&self, member_id: Uuid) -> Result<Option<Credentials>, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use models::BaseStatus;

    #[derive(Default)]
    pub struct MockMemberRepository {
        members: Mutex<HashMap<Uuid, MemberAccount>>,
        creds: Mutex<HashMap<Uuid, Credentials>>, // key: member_id
    }

    impl MockMemberRepository {
        /// Flip a member's status, e.g. to simulate a withdrawn account.
        pub fn set_status(&self, id: Uuid, status: BaseStatus) {
            if let Some(m) = self.members.lock().unwrap().get_mut(&id) {
                m.status = status;
            }
        }
    }

    #[async_trait]
    impl MemberRepository for MockMemberRepository {
        async fn find_by_email(&self, email: &str) -> Result<Option<MemberAccount>, AuthError> {
            let members = self.members.lock().unwrap();
            Ok(members.values().find(|m| m.email == email).cloned())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<MemberAccount>, AuthError> {
            Ok(self.members.lock().unwrap().get(&id).cloned())
        }

        async fn create_member(
            &self,
            email: &str,
            nickname: &str,
            password_hash: String,
            password_algorithm: String,
        ) -> Result<MemberAccount, AuthError> {
            let mut members = self.members.lock().unwrap();
            if members.values().any(|m| m.email == email) {
                return Err(AuthError::Conflict);
            }
            let m = MemberAccount {
                id: Uuid::new_v4(),
                email: email.to_string(),
                nickname: nickname.to_string(),
                status: BaseStatus::Active,
            };
            members.insert(m.id, m.clone());
            let c = Credentials { member_id: m.id, password_hash, password_algorithm };
            self.creds.lock().unwrap().insert(m.id, c);
            Ok(m)
        }

        async fn get_credentials(&self, member_id: Uuid) -> Result<Option<Credentials>, AuthError> {
            let creds = self.creds.lock().unwrap();
            Ok(creds.get(&member_id).cloned())
        }
    }
}
