//! Business logic services.

pub mod comment;
pub mod engagement;
pub mod event;
pub mod feed;
pub mod friendship;
pub mod gate;
pub mod news;
pub mod post;
pub mod user;

pub use comment::{CommentService, CreateCommentInput};
pub use engagement::{EngagementService, LikeToggle};
pub use event::{CreateEventInput, EventService, UpdateEventInput};
pub use feed::{CommentView, FeedService, LikeView, MediaView, PostView, UserSummary};
pub use friendship::{FriendshipService, PendingRequest};
pub use news::{CreateNewsInput, NewsService, NewsWithAuthor, UpdateNewsInput};
pub use post::{CreatePostInput, MediaInput, PostService};
pub use user::{ChangePasswordInput, UpdateProfileInput, UserService};
