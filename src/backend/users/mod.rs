//! Users Module
//!
//! Profile endpoints and the follow graph. The user model itself lives in
//! `auth::users`.

pub mod handlers;

pub mod follows;

pub use handlers::{delete_user, edit_user, get_all_users, get_user_by_id_handler, get_user_comments, get_user_posts};
pub use follows::{follow, get_followers, get_following, unfollow};
