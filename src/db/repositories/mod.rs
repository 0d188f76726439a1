pub mod anime;
pub mod cache;
pub mod episode;
pub mod featured;
pub mod genre;
pub mod user;
