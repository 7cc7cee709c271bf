/**
 * Forum Types
 *
 * Request and response bodies for the posts, comments, votes, follows and
 * search endpoints, plus the vote state machine shared by posts and
 * comments.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

/// Longest accepted post title
pub const MAX_TITLE_LEN: usize = 300;

/// Longest accepted comment body
pub const MAX_COMMENT_LEN: usize = 10_000;

/// Generic acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

// ── Posts ───────────────────────────────────────────────────────────────

/// Body of `POST /createPost`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Name of a file already placed in the uploads directory
    #[serde(default)]
    pub file_url: Option<String>,
}

impl CreatePostRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(SharedError::validation("title", "Title is required"));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(SharedError::validation(
                "title",
                format!("Title must be at most {} characters", MAX_TITLE_LEN),
            ));
        }
        if let Some(file) = &self.file_url {
            if file.contains("..") || file.contains('/') || file.contains('\\') {
                return Err(SharedError::validation("file_url", "File name must not contain a path"));
            }
        }
        Ok(())
    }
}

/// Author fields embedded in a post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostAuthor {
    pub id: Uuid,
    pub username: String,
    pub name: String,
}

/// A post as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub file_url: Option<String>,
    pub user: PostAuthor,
    pub upvotes: i64,
    pub downvotes: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Body of `/upvote`, `/downvote` and `/getVoteState`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostVoteRequest {
    pub post_id: Uuid,
}

/// Query of `GET /searchPosts`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

// ── Votes ───────────────────────────────────────────────────────────────

/// Which button the user pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Up,
    Down,
}

/// A user's standing vote on one item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoteState {
    Down,
    #[default]
    None,
    Up,
}

impl VoteState {
    /// Numeric form used in responses and in the `value` column
    pub fn as_i16(self) -> i16 {
        match self {
            VoteState::Down => -1,
            VoteState::None => 0,
            VoteState::Up => 1,
        }
    }

    /// Parse a stored value; anything other than ±1 means no vote
    pub fn from_i16(value: i16) -> Self {
        match value {
            1 => VoteState::Up,
            -1 => VoteState::Down,
            _ => VoteState::None,
        }
    }

    /// Apply a button press and report the transition
    ///
    /// Pressing the direction you already hold clears it; pressing the
    /// other direction switches to it.
    pub fn cast(self, direction: VoteDirection) -> VoteChange {
        let next = match (self, direction) {
            (VoteState::Up, VoteDirection::Up) => VoteState::None,
            (VoteState::Down, VoteDirection::Down) => VoteState::None,
            (_, VoteDirection::Up) => VoteState::Up,
            (_, VoteDirection::Down) => VoteState::Down,
        };
        VoteChange {
            number: next.as_i16() - self.as_i16(),
            vote_state: next.as_i16(),
        }
    }
}

/// Result of a vote: score delta and the caller's new state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteChange {
    pub number: i16,
    #[serde(rename = "voteState")]
    pub vote_state: i16,
}

impl VoteChange {
    pub fn next_state(&self) -> VoteState {
        VoteState::from_i16(self.vote_state)
    }
}

/// Body of `/getVoteState`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteStateResponse {
    #[serde(rename = "voteState")]
    pub vote_state: i16,
}

// ── Comments ────────────────────────────────────────────────────────────

/// Body of `POST /createComment`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub post_id: Uuid,
    pub comment: String,
}

/// Body of reply and edit requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentTextRequest {
    pub comment: String,
}

/// Check a comment body
pub fn validate_comment(text: &str) -> Result<(), SharedError> {
    if text.trim().is_empty() {
        return Err(SharedError::validation("comment", "Comment text is required"));
    }
    if text.chars().count() > MAX_COMMENT_LEN {
        return Err(SharedError::validation(
            "comment",
            format!("Comment must be at most {} characters", MAX_COMMENT_LEN),
        ));
    }
    Ok(())
}

/// Author fields embedded in a comment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentAuthor {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// A comment with its replies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentNode {
    pub id: Uuid,
    pub text: String,
    pub user: CommentAuthor,
    pub post_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
    pub score: i64,
    pub created_at: DateTime<Utc>,
    pub children: Vec<CommentNode>,
}

/// Body of `GET /getCommentsByPost/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentsResponse {
    pub comments: Vec<CommentNode>,
}

// ── Follows ─────────────────────────────────────────────────────────────

/// An entry in a followers/following list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FollowEntry {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub since: DateTime<Utc>,
}
