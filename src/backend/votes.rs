/**
 * Vote Storage
 *
 * Posts and comments share one voting model: each user holds at most one
 * vote per item, stored as `value = 1` or `value = -1`; no row means no
 * vote. A button press is applied with `VoteState::cast` inside a
 * transaction holding an advisory lock keyed by (item, user), so concurrent
 * presses by the same user on the same item serialize even before the vote
 * row exists.
 */

use sqlx::PgPool;
use uuid::Uuid;

use crate::shared::{VoteChange, VoteDirection, VoteState};

/// Item being voted on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteTarget {
    Post(Uuid),
    Comment(Uuid),
}

impl VoteTarget {
    fn table(&self) -> &'static str {
        match self {
            VoteTarget::Post(_) => "post_votes",
            VoteTarget::Comment(_) => "comment_votes",
        }
    }

    fn key_column(&self) -> &'static str {
        match self {
            VoteTarget::Post(_) => "post_id",
            VoteTarget::Comment(_) => "comment_id",
        }
    }

    fn id(&self) -> Uuid {
        match self {
            VoteTarget::Post(id) | VoteTarget::Comment(id) => *id,
        }
    }

    /// Advisory lock key text for one user's vote on this item
    fn lock_key(&self, user_id: Uuid) -> String {
        format!("{}:{}:{}", self.table(), self.id(), user_id)
    }
}

/// The caller's current vote on `target`
pub async fn vote_state(pool: &PgPool, target: VoteTarget, user_id: Uuid) -> Result<VoteState, sqlx::Error> {
    let query = format!(
        "SELECT value FROM {} WHERE {} = $1 AND user_id = $2",
        target.table(),
        target.key_column()
    );
    let value: Option<i16> = sqlx::query_scalar(&query)
        .bind(target.id())
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(value.map(VoteState::from_i16).unwrap_or_default())
}

/// Apply one button press and return the score delta and new state
pub async fn cast_vote(
    pool: &PgPool,
    target: VoteTarget,
    user_id: Uuid,
    direction: VoteDirection,
) -> Result<VoteChange, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(target.lock_key(user_id))
        .execute(&mut *tx)
        .await?;

    let select = format!(
        "SELECT value FROM {} WHERE {} = $1 AND user_id = $2 FOR UPDATE",
        target.table(),
        target.key_column()
    );
    let current: Option<i16> = sqlx::query_scalar(&select)
        .bind(target.id())
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

    let current = current.map(VoteState::from_i16).unwrap_or_default();
    let change = current.cast(direction);

    match change.next_state() {
        VoteState::None => {
            let delete = format!(
                "DELETE FROM {} WHERE {} = $1 AND user_id = $2",
                target.table(),
                target.key_column()
            );
            sqlx::query(&delete)
                .bind(target.id())
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }
        next => {
            let upsert = format!(
                r#"
                INSERT INTO {table} ({key}, user_id, value)
                VALUES ($1, $2, $3)
                ON CONFLICT ({key}, user_id) DO UPDATE SET value = EXCLUDED.value
                "#,
                table = target.table(),
                key = target.key_column()
            );
            sqlx::query(&upsert)
                .bind(target.id())
                .bind(user_id)
                .bind(next.as_i16())
                .execute(&mut *tx)
                .await?;
        }
    }

    tx.commit().await?;

    tracing::debug!(
        "[Votes] {:?} by {}: {:?} -> {} (delta {})",
        target,
        user_id,
        current,
        change.vote_state,
        change.number
    );
    Ok(change)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_columns() {
        let id = Uuid::new_v4();
        assert_eq!(VoteTarget::Post(id).table(), "post_votes");
        assert_eq!(VoteTarget::Post(id).key_column(), "post_id");
        assert_eq!(VoteTarget::Comment(id).table(), "comment_votes");
        assert_eq!(VoteTarget::Comment(id).key_column(), "comment_id");
        assert_eq!(VoteTarget::Comment(id).id(), id);
    }

    #[test]
    fn test_lock_key_separates_items_and_users() {
        let (item, alice, bob) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        assert_eq!(
            VoteTarget::Post(item).lock_key(alice),
            format!("post_votes:{}:{}", item, alice)
        );
        assert_ne!(VoteTarget::Post(item).lock_key(alice), VoteTarget::Comment(item).lock_key(alice));
        assert_ne!(VoteTarget::Post(item).lock_key(alice), VoteTarget::Post(item).lock_key(bob));
    }
}
