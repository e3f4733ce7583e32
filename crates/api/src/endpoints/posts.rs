//! Discussion endpoints: posts, comments, and like-toggling.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use cinelog_common::AppResult;
use cinelog_core::PostView;
use cinelog_db::repositories::CommentWithAuthorRow;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Post or comment author info.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub user_id: i32,
    pub username: String,
    pub name: Option<String>,
}

/// Discussion post response, annotated for the viewer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub post_id: i32,
    pub content: String,
    pub like_count: i32,
    pub comment_count: i32,
    pub created_at: String,
    pub author: AuthorResponse,
    pub is_liked_by_current_user: bool,
    pub is_author: bool,
}

impl From<PostView> for PostResponse {
    fn from(view: PostView) -> Self {
        Self {
            post_id: view.post.id,
            content: view.post.content,
            like_count: view.post.like_count,
            comment_count: view.post.comment_count,
            created_at: view.post.created_at.to_rfc3339(),
            author: AuthorResponse {
                user_id: view.post.user_id,
                username: view.post.username,
                name: view.post.author_name,
            },
            is_liked_by_current_user: view.liked_by_viewer,
            is_author: view.is_author,
        }
    }
}

#[derive(Serialize)]
struct PostsPayload {
    posts: Vec<PostResponse>,
}

/// GET /movies/{movie_id}/posts - discussion posts, newest first.
async fn list_posts(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Path(movie_id): Path<i32>,
) -> AppResult<ApiResponse<PostsPayload>> {
    let posts = state
        .post_service
        .list_for_movie(movie_id, user.map(|u| u.id))
        .await?;

    Ok(ApiResponse::ok(PostsPayload {
        posts: posts.into_iter().map(Into::into).collect(),
    }))
}

/// Create post request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 8095, message = "Post content is required"))]
    pub content: String,
}

#[derive(Serialize)]
struct PostPayload {
    post: PostResponse,
}

/// POST /movies/{movie_id}/posts - create a post.
async fn create_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(movie_id): Path<i32>,
    Json(req): Json<CreatePostRequest>,
) -> AppResult<ApiResponse<PostPayload>> {
    req.validate()?;

    let view = state
        .post_service
        .create(movie_id, user.id, &req.content)
        .await?;

    Ok(ApiResponse::ok_with_message(
        PostPayload { post: view.into() },
        "Post created successfully",
    ))
}

/// DELETE /posts/{post_id} - delete one's own post.
async fn delete_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
) -> AppResult<ApiResponse<()>> {
    state.post_service.delete(post_id, user.id).await?;

    Ok(ApiResponse::message("Post deleted successfully"))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LikePayload {
    action: &'static str,
    like_count: i32,
}

/// POST /posts/{post_id}/like - toggle a like.
async fn toggle_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
) -> AppResult<ApiResponse<LikePayload>> {
    let (action, like_count) = state.like_service.toggle(post_id, user.id).await?;

    Ok(ApiResponse::ok(LikePayload {
        action: action.as_str(),
        like_count,
    }))
}

/// Comment response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub comment_id: i32,
    pub content: String,
    pub created_at: String,
    pub author: AuthorResponse,
    pub is_author: bool,
}

impl CommentResponse {
    fn for_viewer(comment: CommentWithAuthorRow, viewer: Option<i32>) -> Self {
        Self {
            comment_id: comment.id,
            content: comment.content,
            created_at: comment.created_at.to_rfc3339(),
            is_author: viewer == Some(comment.user_id),
            author: AuthorResponse {
                user_id: comment.user_id,
                username: comment.username,
                name: comment.author_name,
            },
        }
    }
}

#[derive(Serialize)]
struct CommentsPayload {
    comments: Vec<CommentResponse>,
}

/// GET /posts/{post_id}/comments - comments, oldest first.
async fn list_comments(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
) -> AppResult<ApiResponse<CommentsPayload>> {
    let viewer = user.map(|u| u.id);
    let comments = state.comment_service.list(post_id).await?;

    Ok(ApiResponse::ok(CommentsPayload {
        comments: comments
            .into_iter()
            .map(|c| CommentResponse::for_viewer(c, viewer))
            .collect(),
    }))
}

/// Create comment request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 8095, message = "Comment content is required"))]
    pub content: String,
}

#[derive(Serialize)]
struct CommentPayload {
    comment: CommentResponse,
}

/// POST /posts/{post_id}/comments - add a comment.
async fn create_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
    Json(req): Json<CreateCommentRequest>,
) -> AppResult<ApiResponse<CommentPayload>> {
    req.validate()?;

    let comment = state
        .comment_service
        .add(post_id, user.id, &req.content)
        .await?;

    Ok(ApiResponse::ok_with_message(
        CommentPayload {
            comment: CommentResponse::for_viewer(comment, Some(user.id)),
        },
        "Comment added successfully",
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/movies/{movie_id}/posts",
            get(list_posts).post(create_post),
        )
        .route("/posts/{post_id}", delete(delete_post))
        .route("/posts/{post_id}/like", post(toggle_like))
        .route(
            "/posts/{post_id}/comments",
            get(list_comments).post(create_comment),
        )
}
