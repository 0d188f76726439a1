pub mod audio;
pub mod shelf;

pub use audio::AudioTrack;
pub use shelf::Shelf;
