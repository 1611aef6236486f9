mod comment;
mod post;
mod tag;

pub use comment::*;
pub use post::*;
pub use tag::*;
