//! Domain entities - the core business objects.

mod user;

mod post;

pub use post::{Post, PostWithCreator};
pub use user::{DEFAULT_STATUS, User};
