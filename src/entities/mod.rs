pub mod prelude;

pub mod anime;
pub mod api_cache;
pub mod episode;
pub mod favorite;
pub mod featured_anime;
pub mod genre;
pub mod user;
pub mod watch_history;
