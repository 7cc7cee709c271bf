//! Comments Module
//!
//! Nested comments on posts and comment likes/dislikes.
//!
//! - **`db`** - Comment queries
//! - **`tree`** - Flat rows to nested `CommentNode`s
//! - **`handlers`** - HTTP handlers

pub mod db;

pub mod tree;

pub mod handlers;

pub use handlers::{
    create_comment, delete_comment, dislike_comment, get_comments_by_post, like_comment, reply_to_comment,
    update_comment,
};
pub use tree::build_comment_tree;
