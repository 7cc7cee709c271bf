//! Posts Module
//!
//! Forum posts and their up/down votes.
//!
//! - **`db`** - Post queries (joined with author and counters)
//! - **`handlers`** - HTTP handlers

pub mod db;

pub mod handlers;

pub use handlers::{create_post, downvote, get_all_posts, get_post_by_id, get_posts_by_cookie, get_vote_state, upvote};
