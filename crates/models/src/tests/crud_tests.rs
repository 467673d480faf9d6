use crate::{experience, file, member, member_credentials, post, tag, BaseStatus};
use chrono::NaiveDate;
use sea_orm::EntityTrait;
use anyhow::Result;
use uuid::Uuid;

use super::setup_test_db;

fn day(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2024, 7, d).unwrap() }

#[tokio::test]
async fn test_member_and_credentials_crud() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let email = format!("crud_{}@example.com", Uuid::new_v4());
    let m = member::create(&db, &email, "Crud").await?;
    assert_eq!(m.status, BaseStatus::Active);

    let found = member::find_by_email(&db, &email).await?.expect("member by email");
    assert_eq!(found.id, m.id);

    let c1 = member_credentials::upsert_password(&db, m.id, "hash-1".into(), "argon2").await?;
    let c2 = member_credentials::upsert_password(&db, m.id, "hash-2".into(), "argon2").await?;
    assert_eq!(c1.id, c2.id);
    assert_eq!(c2.password_hash, "hash-2");

    member::Entity::delete_by_id(m.id).exec(&db).await?;
    assert!(member_credentials::find_by_member(&db, m.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_post_children_status_and_cascade() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let m = member::create(&db, &format!("post_{}@example.com", Uuid::new_v4()), "Poster").await?;
    let p = post::create(&db, m.id, "Busan", day(1), day(3)).await?;
    assert!(p.is_owned_by(m.id));

    tag::create(&db, p.id, m.id, tag::TagType::Place, "beach").await?;
    tag::create(&db, p.id, m.id, tag::TagType::Companion, "family").await?;
    experience::create(&db, p.id, "Swim", "cold water").await?;
    file::create(&db, file::NewFile {
        post_id: p.id,
        original_name: "sea.jpg",
        stored_name: &format!("{}.jpg", Uuid::new_v4()),
        content_type: "image/jpeg",
        size_bytes: 3,
    }).await?;

    assert_eq!(tag::set_status_by_post(&db, p.id, BaseStatus::Inactive).await?, 2);
    assert!(tag::find_active_by_post(&db, p.id).await?.is_empty());
    assert_eq!(experience::set_status_by_post(&db, p.id, BaseStatus::Inactive).await?, 1);
    assert!(experience::find_active_by_post(&db, p.id).await?.is_empty());
    assert_eq!(file::set_status_by_post(&db, p.id, BaseStatus::Inactive).await?, 1);
    assert!(file::find_active_by_post(&db, p.id).await?.is_empty());
    assert_eq!(file::find_by_post(&db, p.id).await?.len(), 1);

    let p = post::set_status(&db, p, BaseStatus::Inactive).await?;
    assert_eq!(p.status, BaseStatus::Inactive);
    assert!(p.updated_at >= p.created_at);

    let p = post::update_content(&db, p, "Busan again", day(2), day(4)).await?;
    assert_eq!(p.title, "Busan again");
    assert!(post::update_content(&db, p.clone(), "bad", day(4), day(2)).await.is_err());

    // FK cascade removes children with the post
    post::hard_delete(&db, p.id).await?;
    assert!(tag::Entity::find().all(&db).await?.iter().all(|t| t.post_id != p.id));
    assert!(file::find_by_post(&db, p.id).await?.is_empty());

    member::Entity::delete_by_id(m.id).exec(&db).await?;
    Ok(())
}
