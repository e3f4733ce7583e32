//! Database repositories.

mod comment;
mod friend;
mod like;
mod movie;
mod post;
mod review;
mod session;
mod user;
mod watch_event;
mod watchlist;

pub use comment::{CommentRepository, CommentWithAuthorRow};
pub use friend::FriendRepository;
pub use like::{LikeAction, LikeRepository};
pub use movie::{
    BrowseFilter, BrowseSort, MovieRepository, MovieSummaryRow, RecommendedMovieRow,
    SimilarMovieRow,
};
pub use post::{PostRepository, PostWithAuthorRow};
pub use review::{FavoriteGenreRow, FriendReviewRow, ReviewRepository};
pub use session::SessionRepository;
pub use user::UserRepository;
pub use watch_event::WatchEventRepository;
pub use watchlist::{WatchlistMovieRow, WatchlistRepository};
