use sea_orm::entity::prelude::*;

/// Ranked placement of an anime within a named shelf. The (shelf, rank)
/// pair is the primary key, so at most one anime occupies a given rank.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "featured_anime")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub shelf: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub rank: i32,
    pub anime_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::anime::Entity",
        from = "Column::AnimeId",
        to = "super::anime::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Anime,
}

impl Related<super::anime::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Anime.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
