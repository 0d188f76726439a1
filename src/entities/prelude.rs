pub use super::anime::Entity as Anime;
pub use super::api_cache::Entity as ApiCache;
pub use super::episode::Entity as Episode;
pub use super::favorite::Entity as Favorite;
pub use super::featured_anime::Entity as FeaturedAnime;
pub use super::genre::Entity as Genre;
pub use super::user::Entity as User;
pub use super::watch_history::Entity as WatchHistory;
