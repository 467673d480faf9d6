//! Paged post queries.
use sea_orm::sea_query::Query;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, Select};
use uuid::Uuid;

use common::pagination::Pagination;
use models::{post, tag, BaseStatus};

use super::dto::OrderType;
use crate::errors::ServiceError;

/// Column and direction a page is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostSort {
    Created(OrderType),
    /// most recently updated first
    RecentlyUpdated,
}

impl PostSort {
    fn apply(self, select: Select<post::Entity>) -> Select<post::Entity> {
        let sorted = match self {
            PostSort::Created(OrderType::Newest) => select.order_by(post::Column::CreatedAt, Order::Desc),
            PostSort::Created(OrderType::Oldest) => select.order_by(post::Column::CreatedAt, Order::Asc),
            PostSort::RecentlyUpdated => select.order_by(post::Column::UpdatedAt, Order::Desc),
        };
        // tie-breaker keeps pages stable
        sorted.order_by(post::Column::Id, Order::Asc)
    }
}

async fn fetch_page<C: ConnectionTrait>(
    db: &C,
    select: Select<post::Entity>,
    sort: PostSort,
    page: Pagination,
) -> Result<(Vec<post::Model>, u64), ServiceError> {
    let (idx, per_page) = page.normalize();
    let paginator = sort.apply(select).paginate(db, per_page);
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(idx).await?;
    Ok((rows, total))
}

/// The member's posts with the given status.
pub async fn find_page_by_member<C: ConnectionTrait>(
    db: &C,
    member_id: Uuid,
    status: BaseStatus,
    sort: PostSort,
    page: Pagination,
) -> Result<(Vec<post::Model>, u64), ServiceError> {
    let select = post::Entity::find()
        .filter(post::Column::MemberId.eq(member_id))
        .filter(post::Column::Status.eq(status));
    fetch_page(db, select, sort, page).await
}

/// The member's active posts carrying at least one active tag named in `tag_names`.
pub async fn find_page_by_tag_names<C: ConnectionTrait>(
    db: &C,
    member_id: Uuid,
    tag_names: &[String],
    order: OrderType,
    page: Pagination,
) -> Result<(Vec<post::Model>, u64), ServiceError> {
    let tagged = Query::select()
        .column(tag::Column::PostId)
        .from(tag::Entity)
        .and_where(tag::Column::MemberId.eq(member_id))
        .and_where(tag::Column::Status.eq(BaseStatus::Active))
        .and_where(tag::Column::TagName.is_in(tag_names.iter().cloned()))
        .to_owned();
    let select = post::Entity::find()
        .filter(post::Column::MemberId.eq(member_id))
        .filter(post::Column::Status.eq(BaseStatus::Active))
        .filter(post::Column::Id.in_subquery(tagged));
    fetch_page(db, select, PostSort::Created(order), page).await
}
