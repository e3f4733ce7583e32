//! Business logic services.

#![allow(missing_docs)]

pub mod comment;
pub mod dashboard;
pub mod like;
pub mod movie;
pub mod post;
pub mod user;
pub mod watchlist;

pub use comment::CommentService;
pub use dashboard::{DashboardService, DashboardStats, Recommendations};
pub use like::LikeService;
pub use movie::{MovieDetail, MovieService, Pagination};
pub use post::{PostService, PostView};
pub use user::UserService;
pub use watchlist::{WatchlistService, WatchlistStatus};
