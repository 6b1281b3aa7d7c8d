mod notification;
mod post;
mod reply;
mod user;

pub use notification::{Notification, NotificationKind, NotificationListQuery};
pub use post::{CreatePost, CreateRepost, Post, RepostSnapshot};
pub use reply::{CreateReply, Reply};
pub use user::{TaggedUser, UpsertUser, User};
