use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ExprTrait, QueryFilter,
    QueryOrder, Set,
    sea_query::{Expr, Func},
};

use super::entities::item;
use super::entities::prelude::Item;

/// Field set for a row the store has not assigned an id or timestamps to yet.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub list_id: i32,
    pub name: String,
    pub category: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub done: bool,
}

/// Optional filters for a list-scoped query. The default selects everything
/// in the list.
#[derive(Debug, Clone, Default)]
pub struct ItemQuery {
    pub open_only: bool,
    pub name_like: Option<String>,
}

pub async fn insert(
    db: &DatabaseConnection,
    draft: NewItem,
) -> Result<item::Model, sea_orm::DbErr> {
    let model = item::ActiveModel {
        list_id: Set(draft.list_id),
        name: Set(draft.name),
        category: Set(draft.category),
        quantity: Set(draft.quantity),
        unit: Set(draft.unit),
        done: Set(draft.done),
        ..Default::default()
    };
    model.insert(db).await
}

pub async fn find_scoped(
    db: &DatabaseConnection,
    list_id: i32,
    item_id: i32,
) -> Result<Option<item::Model>, sea_orm::DbErr> {
    Item::find()
        .filter(item::Column::Id.eq(item_id))
        .filter(item::Column::ListId.eq(list_id))
        .one(db)
        .await
}

pub async fn list_by_list(
    db: &DatabaseConnection,
    list_id: i32,
    query: &ItemQuery,
) -> Result<Vec<item::Model>, sea_orm::DbErr> {
    let mut select = Item::find()
        .filter(item::Column::ListId.eq(list_id))
        .order_by_desc(item::Column::CreatedAt);
    if query.open_only {
        select = select.filter(item::Column::Done.eq(false));
    }
    if let Some(fragment) = &query.name_like {
        let pattern = format!("%{}%", fragment.to_lowercase());
        select = select.filter(Expr::expr(Func::lower(Expr::col(item::Column::Name))).like(pattern));
    }
    select.all(db).await
}

/// Persists mutated fields of an existing row, refreshing `updated_at`.
pub async fn save(
    db: &DatabaseConnection,
    mut active: item::ActiveModel,
) -> Result<item::Model, sea_orm::DbErr> {
    active.updated_at = Set(Utc::now().fixed_offset());
    active.update(db).await
}

/// Deletes only when both `item_id` and `list_id` match, returning the rows
/// removed (0 or 1). The count is the caller's existence check; there is no
/// separate lookup, so no check-then-act window.
pub async fn delete_scoped(
    db: &DatabaseConnection,
    list_id: i32,
    item_id: i32,
) -> Result<u64, sea_orm::DbErr> {
    let result = Item::delete_many()
        .filter(item::Column::Id.eq(item_id))
        .filter(item::Column::ListId.eq(list_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
