pub mod blog;
pub mod comments;
pub mod media;
pub mod posts;
pub mod tags;

pub use blog::BlogService;
pub use comments::CommentStore;
pub use posts::PostStore;
pub use tags::TagStore;
