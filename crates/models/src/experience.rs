use sea_orm::{entity::prelude::*, sea_query::Expr, ConnectionTrait, QueryOrder, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, post, BaseStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "experience")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub post_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub status: BaseStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Post,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Post => Entity::belongs_to(post::Entity)
                .from(Column::PostId)
                .to(post::Column::Id)
                .into(),
        }
    }
}

impl Related<post::Entity> for Entity {
    fn to() -> RelationDef { Relation::Post.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_title(title: &str) -> Result<(), errors::ModelError> {
    let t = title.trim();
    if t.is_empty() { return Err(errors::ModelError::Validation("experience title required".into())); }
    if t.chars().count() > 255 { return Err(errors::ModelError::Validation("experience title too long (<=255)".into())); }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, post_id: Uuid, title: &str, content: &str) -> Result<Model, errors::ModelError> {
    validate_title(title)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        post_id: Set(post_id),
        title: Set(title.trim().to_string()),
        content: Set(content.to_string()),
        status: Set(BaseStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Apply whichever of `title`/`content` is present.
pub async fn update_content<C: ConnectionTrait>(
    db: &C,
    existing: Model,
    title: Option<&str>,
    content: Option<&str>,
) -> Result<Model, errors::ModelError> {
    let mut am: ActiveModel = existing.into();
    if let Some(t) = title {
        validate_title(t)?;
        am.title = Set(t.trim().to_string());
    }
    if let Some(c) = content {
        am.content = Set(c.to_string());
    }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
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
