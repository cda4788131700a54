pub mod engine;
pub mod result;

pub use engine::Resolver;
pub use result::{Resolution, Resolved};
