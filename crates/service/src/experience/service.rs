use sea_orm::{ConnectionTrait, EntityTrait};
use tracing::{info, instrument};
use uuid::Uuid;

use models::{experience, post, BaseStatus};

use super::dto::{CreateExperienceRequest, GetExperienceResponse, UpdateExperienceRequest};
use crate::errors::ServiceError;

pub async fn create_experiences<C: ConnectionTrait>(
    db: &C,
    post_id: Uuid,
    requests: &[CreateExperienceRequest],
) -> Result<Vec<Uuid>, ServiceError> {
    let mut ids = Vec::with_capacity(requests.len());
    for req in requests {
        let created = experience::create(db, post_id, &req.title, &req.content).await?;
        ids.push(created.id);
    }
    Ok(ids)
}

/// Active experiences of a post, oldest first.
pub async fn get_experiences<C: ConnectionTrait>(db: &C, post_id: Uuid) -> Result<Vec<GetExperienceResponse>, ServiceError> {
    let rows = experience::find_active_by_post(db, post_id).await?;
    Ok(rows.into_iter().map(GetExperienceResponse::from).collect())
}

/// Edit a single experience; only the owner of the parent post may do so.
#[instrument(skip(db, req), fields(member_id = %member_id, experience_id = %experience_id))]
pub async fn update_experience<C: ConnectionTrait>(
    db: &C,
    member_id: Uuid,
    experience_id: Uuid,
    req: &UpdateExperienceRequest,
) -> Result<GetExperienceResponse, ServiceError> {
    let found = experience::Entity::find_by_id(experience_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("experience"))?;
    let parent = post::Entity::find_by_id(found.post_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("post"))?;
    if !parent.is_owned_by(member_id) {
        return Err(ServiceError::not_owner("experience"));
    }
    if !found.status.is_active() || !parent.status.is_active() {
        return Err(ServiceError::inactive("experience"));
    }
    let updated = experience::update_content(db, found, req.title.as_deref(), req.content.as_deref()).await?;
    info!(experience_id = %updated.id, "experience_updated");
    Ok(updated.into())
}

pub async fn soft_delete_experiences<C: ConnectionTrait>(db: &C, post_id: Uuid) -> Result<u64, ServiceError> {
    Ok(experience::set_status_by_post(db, post_id, BaseStatus::Inactive).await?)
}

pub async fn update_experience_active<C: ConnectionTrait>(db: &C, post_id: Uuid) -> Result<u64, ServiceError> {
    Ok(experience::set_status_by_post(db, post_id, BaseStatus::Active).await?)
}

pub async fn hard_delete_experiences<C: ConnectionTrait>(db: &C, post_id: Uuid) -> Result<u64, ServiceError> {
    Ok(experience::delete_by_post(db, post_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use chrono::{NaiveDate, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn post_row(member_id: Uuid, status: BaseStatus) -> post::Model {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        post::Model {
            id: Uuid::new_v4(),
            member_id,
            title: "trip".into(),
            begin_at: day,
            finish_at: day,
            status,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn experience_row(post_id: Uuid, status: BaseStatus) -> experience::Model {
        experience::Model {
            id: Uuid::new_v4(),
            post_id,
            title: "swim".into(),
            content: "cold water".into(),
            status,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn missing_experience_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<experience::Model>::new()])
            .into_connection();
        let err = update_experience(&db, Uuid::new_v4(), Uuid::new_v4(), &UpdateExperienceRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn other_members_experience_is_bad_request() {
        let owner = Uuid::new_v4();
        let parent = post_row(owner, BaseStatus::Active);
        let exp = experience_row(parent.id, BaseStatus::Active);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![exp.clone()]])
            .append_query_results([vec![parent]])
            .into_connection();
        let err = update_experience(&db, Uuid::new_v4(), exp.id, &UpdateExperienceRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::BadRequest);
    }

    #[tokio::test]
    async fn inactive_experience_is_method_not_allowed() {
        let owner = Uuid::new_v4();
        let parent = post_row(owner, BaseStatus::Active);
        let exp = experience_row(parent.id, BaseStatus::Inactive);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![exp.clone()]])
            .append_query_results([vec![parent]])
            .into_connection();
        let err = update_experience(&db, owner, exp.id, &UpdateExperienceRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::MethodNotAllowed);
    }

    #[tokio::test]
    async fn owner_updates_title_only() {
        let owner = Uuid::new_v4();
        let parent = post_row(owner, BaseStatus::Active);
        let exp = experience_row(parent.id, BaseStatus::Active);
        let mut after = exp.clone();
        after.title = "dive".into();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![exp.clone()]])
            .append_query_results([vec![parent]])
            .append_query_results([vec![after]])
            .into_connection();
        let req = UpdateExperienceRequest { title: Some("dive".into()), content: None };
        let res = update_experience(&db, owner, exp.id, &req).await.unwrap();
        assert_eq!(res.title, "dive");
        assert_eq!(res.content, "cold water");
    }

    #[tokio::test]
    async fn update_round_trip_against_db() -> Result<(), anyhow::Error> {
        let Some(db) = crate::test_support::get_db().await else { return Ok(()) };
        let owner = crate::test_support::seed_member(&db).await;
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let parent = post::create(&db, owner.id, "trip", day, day).await?;
        let ids = create_experiences(
            &db,
            parent.id,
            &[CreateExperienceRequest { title: "swim".into(), content: "cold".into() }],
        )
        .await?;

        let req = UpdateExperienceRequest { title: None, content: Some("freezing".into()) };
        let updated = update_experience(&db, owner.id, ids[0], &req).await?;
        assert_eq!(updated.title, "swim");
        assert_eq!(updated.content, "freezing");
        assert_eq!(get_experiences(&db, parent.id).await?[0].content, "freezing");

        let err = update_experience(&db, Uuid::new_v4(), ids[0], &req).await.unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::BadRequest);
        let err = update_experience(&db, owner.id, Uuid::new_v4(), &req).await.unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::NotFound);

        soft_delete_experiences(&db, parent.id).await?;
        let err = update_experience(&db, owner.id, ids[0], &req).await.unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::MethodNotAllowed);
        Ok(())
    }
}
