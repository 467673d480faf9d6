use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{errors, experience, file, member, tag, BaseStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub member_id: Uuid,
    pub title: String,
    pub begin_at: Date,
    pub finish_at: Date,
    pub status: BaseStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Member,
    Tag,
    Experience,
    File,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Member => Entity::belongs_to(member::Entity)
                .from(Column::MemberId)
                .to(member::Column::Id)
                .into(),
            Relation::Tag => Entity::has_many(tag::Entity).into(),
            Relation::Experience => Entity::has_many(experience::Entity).into(),
            Relation::File => Entity::has_many(file::Entity).into(),
        }
    }
}

impl Related<member::Entity> for Entity {
    fn to() -> RelationDef { Relation::Member.def() }
}

impl Related<tag::Entity> for Entity {
    fn to() -> RelationDef { Relation::Tag.def() }
}

impl Related<experience::Entity> for Entity {
    fn to() -> RelationDef { Relation::Experience.def() }
}

impl Related<file::Entity> for Entity {
    fn to() -> RelationDef { Relation::File.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_owned_by(&self, member_id: Uuid) -> bool { self.member_id == member_id }
}

pub fn validate_title(title: &str) -> Result<(), errors::ModelError> {
    let t = title.trim();
    if t.is_empty() { return Err(errors::ModelError::Validation("title required".into())); }
    if t.chars().count() > 255 { return Err(errors::ModelError::Validation("title too long (<=255)".into())); }
    Ok(())
}

pub fn validate_period(begin_at: NaiveDate, finish_at: NaiveDate) -> Result<(), errors::ModelError> {
    if finish_at < begin_at {
        return Err(errors::ModelError::Validation("finish_at must not be before begin_at".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    member_id: Uuid,
    title: &str,
    begin_at: NaiveDate,
    finish_at: NaiveDate,
) -> Result<Model, errors::ModelError> {
    validate_title(title)?;
    validate_period(begin_at, finish_at)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        member_id: Set(member_id),
        title: Set(title.trim().to_string()),
        begin_at: Set(begin_at),
        finish_at: Set(finish_at),
        status: Set(BaseStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn update_content<C: ConnectionTrait>(
    db: &C,
    existing: Model,
    title: &str,
    begin_at: NaiveDate,
    finish_at: NaiveDate,
) -> Result<Model, errors::ModelError> {
    validate_title(title)?;
    validate_period(begin_at, finish_at)?;
    let mut am: ActiveModel = existing.into();
    am.title = Set(title.trim().to_string());
    am.begin_at = Set(begin_at);
    am.finish_at = Set(finish_at);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn set_status<C: ConnectionTrait>(db: &C, existing: Model, status: BaseStatus) -> Result<Model, errors::ModelError> {
    let mut am: ActiveModel = existing.into();
    am.status = Set(status);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn hard_delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<(), errors::ModelError> {
    Entity::delete_by_id(id).exec(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(())
}
