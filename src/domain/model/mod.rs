//! Entities of the social graph and the views built from them.

pub mod engagement;
pub mod post;
pub mod user;

pub use engagement::{Comment, CommentedPost, Like, LikedPost, NewComment};
pub use post::{CommentView, LikeView, NewPost, PostFilter, PostRecord, PostView};
pub use user::{DateOfBirth, NewUser, PhotoRef, ProfileChanges, User, UserRecord, UserSummary};
