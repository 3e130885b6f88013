#[allow(unused_imports)]
pub mod prelude {
    pub use super::item::Entity as Item;
}

pub mod item {
    use sea_orm::entity::prelude::*;

    /// A shopping-list entry. `list_id` is the owning list and is never
    /// changed after creation; there is no `lists` table, the id is an
    /// opaque scope key. Cleared `category`/`unit` values persist as NULL.
    #[sea_orm::model]
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "items")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        #[sea_orm(indexed)]
        pub list_id: i32,
        pub name: String,
        pub category: Option<String>,
        pub quantity: Option<f64>,
        pub unit: Option<String>,
        #[sea_orm(default_value = false)]
        pub done: bool,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub created_at: DateTimeWithTimeZone,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub updated_at: DateTimeWithTimeZone,
    }

    impl ActiveModelBehavior for ActiveModel {}
}
