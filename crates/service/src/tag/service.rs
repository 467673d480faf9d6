use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::debug;
use uuid::Uuid;

use models::tag::{self, TagType};
use models::BaseStatus;

use super::dto::{CreateTagRequest, CreateTagResponse, FindTagResponse};
use crate::errors::ServiceError;

/// Flatten requests into unique `(type, name)` pairs; names trimmed, blanks dropped.
pub fn flatten_requests(tags: &[CreateTagRequest]) -> Result<Vec<(TagType, String)>, ServiceError> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for req in tags {
        for raw in &req.tag_name {
            let Some(name) = tag::normalize_name(raw)? else { continue };
            if seen.insert((req.tag_type, name.clone())) {
                out.push((req.tag_type, name));
            }
        }
    }
    Ok(out)
}

/// Group names by type in type order, keeping the input order of names.
pub fn group_tags(tags: impl IntoIterator<Item = (TagType, String)>) -> Vec<FindTagResponse> {
    let mut grouped: BTreeMap<TagType, Vec<String>> = BTreeMap::new();
    for (tag_type, name) in tags {
        grouped.entry(tag_type).or_default().push(name);
    }
    grouped
        .into_iter()
        .map(|(tag_type, tag_name)| FindTagResponse { tag_type, tag_name })
        .collect()
}

pub async fn create_tag<C: ConnectionTrait>(
    db: &C,
    post_id: Uuid,
    tags: &[CreateTagRequest],
    member_id: Uuid,
) -> Result<CreateTagResponse, ServiceError> {
    let mut tag_ids = Vec::new();
    for (tag_type, name) in flatten_requests(tags)? {
        let created = tag::create(db, post_id, member_id, tag_type, &name).await?;
        tag_ids.push(created.id);
    }
    debug!(post_id = %post_id, count = tag_ids.len(), "tags_created");
    Ok(CreateTagResponse { tag_ids })
}

/// Replace the post's tags with `tags`.
pub async fn update_tags<C: ConnectionTrait>(
    db: &C,
    post_id: Uuid,
    tags: &[CreateTagRequest],
    member_id: Uuid,
) -> Result<CreateTagResponse, ServiceError> {
    delete_tags(db, post_id).await?;
    create_tag(db, post_id, tags, member_id).await
}

pub async fn delete_tags<C: ConnectionTrait>(db: &C, post_id: Uuid) -> Result<u64, ServiceError> {
    Ok(tag::delete_by_post(db, post_id).await?)
}

pub async fn soft_delete_tags<C: ConnectionTrait>(db: &C, post_id: Uuid) -> Result<u64, ServiceError> {
    Ok(tag::set_status_by_post(db, post_id, BaseStatus::Inactive).await?)
}

pub async fn update_tag_active<C: ConnectionTrait>(db: &C, post_id: Uuid) -> Result<u64, ServiceError> {
    Ok(tag::set_status_by_post(db, post_id, BaseStatus::Active).await?)
}

pub async fn hard_delete_tags<C: ConnectionTrait>(db: &C, post_id: Uuid) -> Result<u64, ServiceError> {
    delete_tags(db, post_id).await
}

/// Active tags of a post grouped by type.
pub async fn get_tags<C: ConnectionTrait>(db: &C, post_id: Uuid) -> Result<Vec<FindTagResponse>, ServiceError> {
    let rows = tag::find_active_by_post(db, post_id).await?;
    Ok(group_tags(rows.into_iter().map(|t| (t.tag_type, t.tag_name))))
}

/// Every active tag the member has used, distinct and sorted within each type.
pub async fn find_tag_list<C: ConnectionTrait>(db: &C, member_id: Uuid) -> Result<Vec<FindTagResponse>, ServiceError> {
    let rows = tag::Entity::find()
        .filter(tag::Column::MemberId.eq(member_id))
        .filter(tag::Column::Status.eq(BaseStatus::Active))
        .all(db)
        .await?;
    let mut grouped: BTreeMap<TagType, BTreeSet<String>> = BTreeMap::new();
    for t in rows {
        grouped.entry(t.tag_type).or_default().insert(t.tag_name);
    }
    Ok(grouped
        .into_iter()
        .map(|(tag_type, names)| FindTagResponse { tag_type, tag_name: names.into_iter().collect() })
        .collect())
}

/// Active tag names of one post owned by `member_id`.
pub async fn find_tag_name<C: ConnectionTrait>(db: &C, member_id: Uuid, post_id: Uuid) -> Result<Vec<String>, ServiceError> {
    let rows = tag::Entity::find()
        .filter(tag::Column::MemberId.eq(member_id))
        .filter(tag::Column::PostId.eq(post_id))
        .filter(tag::Column::Status.eq(BaseStatus::Active))
        .order_by_asc(tag::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|t| t.tag_name).collect())
}

/// Batch form of [`find_tag_name`] for a page of posts.
pub async fn find_tag_names_by_posts<C: ConnectionTrait>(
    db: &C,
    member_id: Uuid,
    post_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<String>>, ServiceError> {
    let mut out: HashMap<Uuid, Vec<String>> = HashMap::new();
    if post_ids.is_empty() {
        return Ok(out);
    }
    let rows = tag::Entity::find()
        .filter(tag::Column::MemberId.eq(member_id))
        .filter(tag::Column::PostId.is_in(post_ids.iter().copied()))
        .filter(tag::Column::Status.eq(BaseStatus::Active))
        .order_by_asc(tag::Column::CreatedAt)
        .all(db)
        .await?;
    for t in rows {
        out.entry(t.post_id).or_default().push(t.tag_name);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(tag_type: TagType, names: &[&str]) -> CreateTagRequest {
        CreateTagRequest { tag_type, tag_name: names.iter().map(|s| s.to_string()).collect() }
    }

    #[test]
    fn flatten_trims_skips_blank_and_dedupes() {
        let flat = flatten_requests(&[
            req(TagType::Place, &[" Jeju ", "", "Jeju", "Seoul"]),
            req(TagType::Mood, &["happy", "  "]),
            req(TagType::Place, &["Seoul"]),
        ])
        .unwrap();
        assert_eq!(
            flat,
            vec![
                (TagType::Place, "Jeju".to_string()),
                (TagType::Place, "Seoul".to_string()),
                (TagType::Mood, "happy".to_string()),
            ]
        );
    }

    #[test]
    fn same_name_under_different_types_is_kept() {
        let flat = flatten_requests(&[req(TagType::Place, &["sea"]), req(TagType::Mood, &["sea"])]).unwrap();
        assert_eq!(flat.len(), 2);
    }

    #[test]
    fn overlong_name_is_rejected() {
        let long = "x".repeat(tag::MAX_TAG_NAME_CHARS + 1);
        let err = flatten_requests(&[req(TagType::Etc, &[long.as_str()])]).unwrap_err();
        assert_eq!(err.error_code(), crate::errors::ErrorCode::BadRequest);
    }

    #[test]
    fn group_orders_types_and_keeps_name_order() {
        let grouped = group_tags(vec![
            (TagType::Mood, "calm".to_string()),
            (TagType::Place, "Busan".to_string()),
            (TagType::Mood, "tired".to_string()),
        ]);
        assert_eq!(
            grouped,
            vec![
                FindTagResponse { tag_type: TagType::Place, tag_name: vec!["Busan".into()] },
                FindTagResponse { tag_type: TagType::Mood, tag_name: vec!["calm".into(), "tired".into()] },
            ]
        );
    }

    #[test]
    fn request_tag_name_defaults_to_empty() {
        let r: CreateTagRequest = serde_json::from_str(r#"{"tag_type":"ETC"}"#).unwrap();
        assert!(r.tag_name.is_empty());
    }

    #[tokio::test]
    async fn member_tag_list_is_distinct_and_sorted() -> Result<(), anyhow::Error> {
        let Some(db) = crate::test_support::get_db().await else { return Ok(()) };
        let member = crate::test_support::seed_member(&db).await;
        let day = chrono::NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        let a = models::post::create(&db, member.id, "a", day, day).await?;
        let b = models::post::create(&db, member.id, "b", day, day).await?;

        create_tag(&db, a.id, &[req(TagType::Place, &["Seoul", "Busan"]), req(TagType::Mood, &["calm"])], member.id).await?;
        create_tag(&db, b.id, &[req(TagType::Place, &["Busan"])], member.id).await?;

        let list = find_tag_list(&db, member.id).await?;
        assert_eq!(
            list,
            vec![
                FindTagResponse { tag_type: TagType::Place, tag_name: vec!["Busan".into(), "Seoul".into()] },
                FindTagResponse { tag_type: TagType::Mood, tag_name: vec!["calm".into()] },
            ]
        );
        assert_eq!(find_tag_name(&db, member.id, b.id).await?, vec!["Busan".to_string()]);
        assert!(find_tag_name(&db, uuid::Uuid::new_v4(), b.id).await?.is_empty());

        soft_delete_tags(&db, a.id).await?;
        assert!(get_tags(&db, a.id).await?.is_empty());
        let by_post = find_tag_names_by_posts(&db, member.id, &[a.id, b.id]).await?;
        assert!(!by_post.contains_key(&a.id));
        update_tag_active(&db, a.id).await?;
        assert_eq!(get_tags(&db, a.id).await?.len(), 2);

        update_tags(&db, a.id, &[req(TagType::Etc, &["misc"])], member.id).await?;
        assert_eq!(find_tag_name(&db, member.id, a.id).await?, vec!["misc".to_string()]);
        assert_eq!(hard_delete_tags(&db, a.id).await?, 1);
        Ok(())
    }
}
