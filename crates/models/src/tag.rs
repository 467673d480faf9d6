use sea_orm::{entity::prelude::*, sea_query::{Expr, StringLen}, ConnectionTrait, QueryOrder, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, member, post, BaseStatus};

/// Classification of a tag; declaration order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TagType {
    #[sea_orm(string_value = "PLACE")]
    Place,
    #[sea_orm(string_value = "COMPANION")]
    Companion,
    #[sea_orm(string_value = "ACTIVITY")]
    Activity,
    #[sea_orm(string_value = "MOOD")]
    Mood,
    #[sea_orm(string_value = "ETC")]
    Etc,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tag")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub post_id: Uuid,
    pub member_id: Uuid,
    pub tag_type: TagType,
    pub tag_name: String,
    pub status: BaseStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Post,
    Member,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Post => Entity::belongs_to(post::Entity)
                .from(Column::PostId)
                .to(post::Column::Id)
                .into(),
            Relation::Member => Entity::belongs_to(member::Entity)
                .from(Column::MemberId)
                .to(member::Column::Id)
                .into(),
        }
    }
}

impl Related<post::Entity> for Entity {
    fn to() -> RelationDef { Relation::Post.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub const MAX_TAG_NAME_CHARS: usize = 64;

/// Trim a tag name; `None` for blank names.
pub fn normalize_name(name: &str) -> Result<Option<String>, errors::ModelError> {
    let n = name.trim();
    if n.is_empty() { return Ok(None); }
    if n.chars().count() > MAX_TAG_NAME_CHARS {
        return Err(errors::ModelError::Validation(format!("tag name too long (<={MAX_TAG_NAME_CHARS})")));
    }
    Ok(Some(n.to_string()))
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    post_id: Uuid,
    member_id: Uuid,
    tag_type: TagType,
    tag_name: &str,
) -> Result<Model, errors::ModelError> {
    let Some(name) = normalize_name(tag_name)? else {
        return Err(errors::ModelError::Validation("tag name required".into()));
    };
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        post_id: Set(post_id),
        member_id: Set(member_id),
        tag_type: Set(tag_type),
        tag_name: Set(name),
        status: Set(BaseStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_active_by_post<C: ConnectionTrait>(db: &C, post_id: Uuid) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::PostId.eq(post_id))
        .filter(Column::Status.eq(BaseStatus::Active))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Flip every tag of a post to `status`; returns affected rows.
pub async fn set_status_by_post<C: ConnectionTrait>(db: &C, post_id: Uuid, status: BaseStatus) -> Result<u64, errors::ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::Status, Expr::value(status.to_value()))
        .col_expr(Column::UpdatedAt, Expr::value(DateTimeWithTimeZone::from(Utc::now())))
        .filter(Column::PostId.eq(post_id))
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected)
}

pub async fn delete_by_post<C: ConnectionTrait>(db: &C, post_id: Uuid) -> Result<u64, errors::ModelError> {
    let res = Entity::delete_many()
        .filter(Column::PostId.eq(post_id))
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_skips_blank() {
        assert_eq!(normalize_name("  beach ").unwrap(), Some("beach".to_string()));
        assert_eq!(normalize_name("   ").unwrap(), None);
        assert!(normalize_name(&"x".repeat(MAX_TAG_NAME_CHARS + 1)).is_err());
    }

    #[test]
    fn tag_type_order_follows_declaration() {
        assert!(TagType::Place < TagType::Companion);
        assert!(TagType::Mood < TagType::Etc);
        assert_eq!(serde_json::to_string(&TagType::Companion).unwrap(), "\"COMPANION\"");
    }
}
