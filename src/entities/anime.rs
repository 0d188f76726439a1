use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "anime")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub external_id: String,
    pub data_id: String,
    pub title: String,
    pub japanese_title: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Large/hero poster variant.
    pub poster: Option<String>,
    /// Small/list-thumbnail poster variant.
    pub poster_small: Option<String>,
    pub show_type: Option<String>,
    pub duration: Option<String>,
    pub release_date: Option<String>,
    pub quality: Option<String>,
    pub sub_count: Option<String>,
    pub dub_count: Option<String>,
    pub total_episodes: Option<i32>,
    pub adult_content: bool,
    /// Public identifier; set to the external id at creation and never
    /// regenerated on update.
    #[sea_orm(unique)]
    pub slug: String,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::featured_anime::Entity")]
    FeaturedAnime,
    #[sea_orm(has_many = "super::episode::Entity")]
    Episode,
    #[sea_orm(has_many = "super::favorite::Entity")]
    Favorite,
}

impl Related<super::featured_anime::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeaturedAnime.def()
    }
}

impl Related<super::episode::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Episode.def()
    }
}

impl Related<super::favorite::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Favorite.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
