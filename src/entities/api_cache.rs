use sea_orm::entity::prelude::*;

/// Short-lived cache of upstream API responses, keyed by the call's own
/// parameters. Rows past `expires_at` are garbage.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "api_cache")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub cache_key: String,
    #[sea_orm(column_type = "Text")]
    pub payload: String,
    // ISO8601 strings; lexicographic comparison doubles as time comparison
    pub created_at: String,
    pub expires_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
