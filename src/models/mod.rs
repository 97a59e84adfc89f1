pub mod item;
pub mod post;

pub use item::*;
pub use post::*;
