/**
 * API Route Handlers
 *
 * This module wires the REST endpoints. Paths follow the forum client's
 * camelCase convention.
 *
 * # Public
 * - `GET /` - liveness
 * - `POST /register`, `POST /login`, `POST /logout`
 * - `GET /getAllUsers`, `GET /getUserById/{id}`, `GET /getUserPosts/{id}`, `GET /getUserComments/{id}`
 * - `GET /getFollowers/{id}`, `GET /getFollowing/{id}`
 * - `GET /getAllPosts`, `GET /getPostById/{id}`, `GET /getCommentsByPost/{id}`
 * - `GET /searchPosts?query=`
 *
 * # Authenticated
 * Everything else; see `protected_routes`.
 */

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::backend::auth::{check_auth, get_user_by_cookie, login, logout, register};
use crate::backend::comments::{
    create_comment, delete_comment, dislike_comment, get_comments_by_post, like_comment, reply_to_comment,
    update_comment,
};
use crate::backend::middleware::auth_middleware;
use crate::backend::posts::{create_post, downvote, get_all_posts, get_post_by_id, get_posts_by_cookie, get_vote_state, upvote};
use crate::backend::search::search_posts;
use crate::backend::server::state::AppState;
use crate::backend::users::{
    delete_user, edit_user, follow, get_all_users, get_followers, get_following, get_user_by_id_handler,
    get_user_comments, get_user_posts, unfollow,
};

async fn root() -> &'static str {
    "Agora API is running"
}

/// Configure API routes
///
/// Adds the public routes directly and the authenticated routes behind
/// `auth_middleware`.
pub fn configure_api_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    router
        .route("/", get(root))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/getAllUsers", get(get_all_users))
        .route("/getUserById/{id}", get(get_user_by_id_handler))
        .route("/getUserPosts/{id}", get(get_user_posts))
        .route("/getUserComments/{id}", get(get_user_comments))
        .route("/getFollowers/{id}", get(get_followers))
        .route("/getFollowing/{id}", get(get_following))
        .route("/getAllPosts", get(get_all_posts))
        .route("/getPostById/{id}", get(get_post_by_id))
        .route("/getCommentsByPost/{id}", get(get_comments_by_post))
        .route("/searchPosts", get(search_posts))
        .merge(protected_routes(app_state))
}

/// Routes that require a session token
fn protected_routes(app_state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/check-auth", get(check_auth))
        .route("/getUserByCookie", get(get_user_by_cookie))
        .route("/editUser", put(edit_user))
        .route("/deleteUser/{id}", delete(delete_user))
        .route("/follow/{id}", post(follow))
        .route("/unfollow/{id}", delete(unfollow))
        .route("/getPostsByCookie", get(get_posts_by_cookie))
        .route("/createPost", post(create_post))
        .route("/upvote", post(upvote))
        .route("/downvote", post(downvote))
        .route("/getVoteState", post(get_vote_state))
        .route("/createComment", post(create_comment))
        .route("/replyToComment/{parent_id}", post(reply_to_comment))
        .route("/updateComment/{id}", put(update_comment))
        .route("/deleteComment/{id}", delete(delete_comment))
        .route("/likeComment/{id}", put(like_comment))
        .route("/dislikeComment/{id}", put(dislike_comment))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), auth_middleware))
}
