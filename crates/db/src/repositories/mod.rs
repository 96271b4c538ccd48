//! Database repositories.
//!
//! Each repository owns the typed queries for one entity. All relationship
//! loads are explicit; feed-style loads batch related rows with `IN` queries.

mod comment;
mod event;
mod friendship;
mod like;
mod news;
mod post;
mod post_media;
mod user;
mod view;

pub use comment::CommentRepository;
pub use event::{EventRepository, EventTimeFilter};
pub use friendship::FriendshipRepository;
pub use like::LikeRepository;
pub use news::NewsRepository;
pub use post::PostRepository;
pub use post_media::PostMediaRepository;
pub use user::UserRepository;
pub use view::ViewRepository;
