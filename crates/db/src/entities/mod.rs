//! Database entities.

pub mod comment;
pub mod friend;
pub mod genre;
pub mod movie;
pub mod movie_genre;
pub mod post;
pub mod post_like;
pub mod review_rating;
pub mod session;
pub mod user;
pub mod watch_event;
pub mod watchlist_entry;

pub use comment::Entity as Comment;
pub use friend::Entity as Friend;
pub use genre::Entity as Genre;
pub use movie::Entity as Movie;
pub use movie_genre::Entity as MovieGenre;
pub use post::Entity as Post;
pub use post_like::Entity as PostLike;
pub use review_rating::Entity as ReviewRating;
pub use session::Entity as Session;
pub use user::Entity as User;
pub use watch_event::Entity as WatchEvent;
pub use watchlist_entry::Entity as WatchlistEntry;
