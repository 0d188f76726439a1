pub mod stream;

pub use stream::{StreamResolver, StreamSource};
