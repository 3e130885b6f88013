//! Mutation core for shopping-list items: normalization, validation, and
//! store orchestration. Every operation against an existing row is scoped by
//! `(list_id, item_id)`; a wrong list and a missing id are indistinguishable
//! to callers.

use sea_orm::{DatabaseConnection, Set};

use crate::{
    db::{
        entities::item,
        item_repo::{self, ItemQuery, NewItem},
    },
    error::{ServiceError, ServiceResult},
};

use super::{
    normalize::{trim_or_null, trim_preserve_empty},
    patch::{FieldPatch, ItemPatch},
};

pub const NAME_MAX_CHARS: usize = 120;
pub const CATEGORY_MAX_CHARS: usize = 64;
pub const UNIT_MAX_CHARS: usize = 24;

/// Raw creation input as decoded at the boundary. `list_id` and `name` are
/// validated here, not at the edge.
#[derive(Debug, Clone, Default)]
pub struct CreateItem {
    pub list_id: Option<i32>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

pub async fn create_item(
    db: &DatabaseConnection,
    input: CreateItem,
) -> ServiceResult<item::Model> {
    let list_id = input
        .list_id
        .ok_or_else(|| ServiceError::invalid("listId", "listId is required"))?;
    let name = valid_name(input.name.as_deref())?;
    // Creation has no explicit-clear concept: blank optional text is absent.
    let category = checked_len(
        "category",
        trim_or_null(input.category.as_deref()),
        CATEGORY_MAX_CHARS,
    )?;
    let unit = checked_len("unit", trim_or_null(input.unit.as_deref()), UNIT_MAX_CHARS)?;
    let quantity = checked_quantity(input.quantity)?;

    let draft = NewItem {
        list_id,
        name,
        category,
        quantity,
        unit,
        done: false,
    };
    Ok(item_repo::insert(db, draft).await?)
}

pub async fn get_item(
    db: &DatabaseConnection,
    list_id: i32,
    item_id: i32,
) -> ServiceResult<item::Model> {
    require_item(db, list_id, item_id).await
}

pub async fn list_items(
    db: &DatabaseConnection,
    list_id: i32,
    query: ItemQuery,
) -> ServiceResult<Vec<item::Model>> {
    Ok(item_repo::list_by_list(db, list_id, &query).await?)
}

pub async fn update_item(
    db: &DatabaseConnection,
    list_id: i32,
    item_id: i32,
    patch: ItemPatch,
) -> ServiceResult<item::Model> {
    // Scoped fetch comes first: a missing row wins over an invalid patch.
    let existing = require_item(db, list_id, item_id).await?;
    let mut active: item::ActiveModel = existing.into();

    if let Some(raw) = patch.name.as_deref() {
        active.name = Set(valid_name(Some(raw))?);
    }
    if let Some(category) = patched_text("category", patch.category, CATEGORY_MAX_CHARS)? {
        active.category = Set(category);
    }
    if let Some(unit) = patched_text("unit", patch.unit, UNIT_MAX_CHARS)? {
        active.unit = Set(unit);
    }
    match patch.quantity {
        FieldPatch::Keep => {}
        FieldPatch::Clear => active.quantity = Set(None),
        FieldPatch::Set(quantity) => active.quantity = Set(checked_quantity(Some(quantity))?),
    }
    if let Some(done) = patch.done {
        active.done = Set(done);
    }

    Ok(item_repo::save(db, active).await?)
}

pub async fn toggle_done(
    db: &DatabaseConnection,
    list_id: i32,
    item_id: i32,
) -> ServiceResult<item::Model> {
    let existing = require_item(db, list_id, item_id).await?;
    let done = existing.done;
    let mut active: item::ActiveModel = existing.into();
    active.done = Set(!done);
    Ok(item_repo::save(db, active).await?)
}

pub async fn delete_item(
    db: &DatabaseConnection,
    list_id: i32,
    item_id: i32,
) -> ServiceResult<()> {
    let removed = item_repo::delete_scoped(db, list_id, item_id).await?;
    if removed == 0 {
        return Err(not_found(list_id, item_id));
    }
    Ok(())
}

async fn require_item(
    db: &DatabaseConnection,
    list_id: i32,
    item_id: i32,
) -> ServiceResult<item::Model> {
    item_repo::find_scoped(db, list_id, item_id)
        .await?
        .ok_or_else(|| not_found(list_id, item_id))
}

fn not_found(list_id: i32, item_id: i32) -> ServiceError {
    ServiceError::not_found(format!("item {item_id} not found in list {list_id}"))
}

fn valid_name(raw: Option<&str>) -> ServiceResult<String> {
    let name =
        trim_or_null(raw).ok_or_else(|| ServiceError::invalid("name", "name must not be blank"))?;
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(ServiceError::invalid(
            "name",
            format!("name must be at most {NAME_MAX_CHARS} characters"),
        ));
    }
    Ok(name)
}

/// Resolves a clearable text patch: `None` means leave the column alone,
/// `Some(value)` is the new column value. A supplied string that trims to
/// empty clears, same as an explicit null.
fn patched_text(
    field: &'static str,
    patch: FieldPatch<String>,
    max: usize,
) -> ServiceResult<Option<Option<String>>> {
    Ok(match patch {
        FieldPatch::Keep => None,
        FieldPatch::Clear => Some(None),
        FieldPatch::Set(raw) => {
            let value = trim_preserve_empty(Some(raw.as_str())).filter(|trimmed| !trimmed.is_empty());
            Some(checked_len(field, value, max)?)
        }
    })
}

fn checked_len(
    field: &'static str,
    value: Option<String>,
    max: usize,
) -> ServiceResult<Option<String>> {
    if let Some(value) = &value {
        if value.chars().count() > max {
            return Err(ServiceError::invalid(
                field,
                format!("{field} must be at most {max} characters"),
            ));
        }
    }
    Ok(value)
}

fn checked_quantity(quantity: Option<f64>) -> ServiceResult<Option<f64>> {
    match quantity {
        Some(quantity) if quantity < 0.0 => {
            Err(ServiceError::invalid("quantity", "quantity must be >= 0"))
        }
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use super::*;

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn item_model(id: i32, list_id: i32, name: &str, done: bool) -> item::Model {
        let now = ts();
        item::Model {
            id,
            list_id,
            name: name.to_string(),
            category: None,
            quantity: None,
            unit: None,
            done,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn valid_name_trims_surrounding_whitespace() {
        assert_eq!(valid_name(Some(" Milk ")).expect("name is valid"), "Milk");
    }

    #[test]
    fn valid_name_rejects_blank_and_overlong() {
        assert!(matches!(
            valid_name(Some("   ")),
            Err(ServiceError::InvalidArgument { field: "name", .. })
        ));
        assert!(matches!(
            valid_name(None),
            Err(ServiceError::InvalidArgument { field: "name", .. })
        ));
        let long = "x".repeat(NAME_MAX_CHARS + 1);
        assert!(matches!(
            valid_name(Some(&long)),
            Err(ServiceError::InvalidArgument { field: "name", .. })
        ));
    }

    #[test]
    fn patched_text_resolves_three_states() {
        assert_eq!(
            patched_text("category", FieldPatch::Keep, CATEGORY_MAX_CHARS).expect("keep"),
            None
        );
        assert_eq!(
            patched_text("category", FieldPatch::Clear, CATEGORY_MAX_CHARS).expect("clear"),
            Some(None)
        );
        assert_eq!(
            patched_text(
                "category",
                FieldPatch::Set(" DAIRY ".to_string()),
                CATEGORY_MAX_CHARS
            )
            .expect("set"),
            Some(Some("DAIRY".to_string()))
        );
    }

    #[test]
    fn patched_text_clears_on_empty_string() {
        assert_eq!(
            patched_text("unit", FieldPatch::Set("   ".to_string()), UNIT_MAX_CHARS)
                .expect("empty clears"),
            Some(None)
        );
    }

    #[test]
    fn patched_text_enforces_length_cap() {
        let long = "x".repeat(CATEGORY_MAX_CHARS + 1);
        assert!(matches!(
            patched_text("category", FieldPatch::Set(long), CATEGORY_MAX_CHARS),
            Err(ServiceError::InvalidArgument {
                field: "category",
                ..
            })
        ));
    }

    #[test]
    fn checked_quantity_rejects_negative_only() {
        assert!(matches!(
            checked_quantity(Some(-1.0)),
            Err(ServiceError::InvalidArgument {
                field: "quantity",
                ..
            })
        ));
        assert_eq!(checked_quantity(Some(0.0)).expect("zero is valid"), Some(0.0));
        assert_eq!(checked_quantity(None).expect("absent is valid"), None);
    }

    #[tokio::test]
    async fn create_item_rejects_blank_name_before_touching_store() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = create_item(
            &db,
            CreateItem {
                list_id: Some(1),
                name: Some("   ".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect_err("blank name should fail");
        assert!(matches!(
            err,
            ServiceError::InvalidArgument { field: "name", .. }
        ));
    }

    #[tokio::test]
    async fn create_item_requires_list_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = create_item(
            &db,
            CreateItem {
                name: Some("Milk".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect_err("missing list id should fail");
        assert!(matches!(
            err,
            ServiceError::InvalidArgument { field: "listId", .. }
        ));
    }

    #[tokio::test]
    async fn create_item_rejects_negative_quantity() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = create_item(
            &db,
            CreateItem {
                list_id: Some(1),
                name: Some("Milk".to_string()),
                quantity: Some(-1.0),
                ..Default::default()
            },
        )
        .await
        .expect_err("negative quantity should fail");
        assert!(matches!(
            err,
            ServiceError::InvalidArgument {
                field: "quantity",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn get_item_maps_missing_row_to_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<item::Model>::new()])
            .into_connection();
        let err = get_item(&db, 1, 7).await.expect_err("lookup should miss");
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_item_propagates_not_found_before_validation() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<item::Model>::new()])
            .into_connection();
        let patch = ItemPatch {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        let err = update_item(&db, 1, 7, patch)
            .await
            .expect_err("missing row should fail first");
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_item_rejects_blank_name_for_existing_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![item_model(7, 1, "Milk", false)]])
            .into_connection();
        let patch = ItemPatch {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        let err = update_item(&db, 1, 7, patch)
            .await
            .expect_err("blank name should fail");
        assert!(matches!(
            err,
            ServiceError::InvalidArgument { field: "name", .. }
        ));
    }

    #[tokio::test]
    async fn toggle_done_negates_flag() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![item_model(7, 1, "Milk", false)],
                vec![item_model(7, 1, "Milk", true)],
            ])
            .into_connection();
        let toggled = toggle_done(&db, 1, 7).await.expect("toggle should succeed");
        assert!(toggled.done);
    }

    #[tokio::test]
    async fn delete_item_maps_zero_rows_to_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let err = delete_item(&db, 1, 7).await.expect_err("nothing to delete");
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_item_succeeds_when_a_row_was_removed() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        delete_item(&db, 1, 7).await.expect("delete should succeed");
    }
}
