//! Per-user interactions with a media item.

use chrono::{DateTime, Utc};

use crate::ids::{LikeId, MediaId, ReviewId, UserId};
use crate::media::MediaKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Like {
    pub id: LikeId,
    pub user_id: UserId,
    pub username: String,
    pub media_id: MediaId,
    pub media_title: String,
    pub media_kind: MediaKind,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    pub username: String,
    pub media_id: MediaId,
    pub media_title: String,
    pub media_kind: MediaKind,
    /// Always within `1..=10`.
    pub score: i16,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewLike {
    pub user_id: UserId,
    pub media_id: MediaId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub user_id: UserId,
    pub media_id: MediaId,
    pub score: i16,
    pub text: String,
}

/// Field level patch: `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewPatch {
    pub score: Option<i16>,
    pub text: Option<String>,
}

impl ReviewPatch {
    pub fn apply(&self, review: &mut Review) {
        if let Some(score) = self.score {
            review.score = score;
        }
        if let Some(text) = &self.text {
            review.text = text.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review() -> Review {
        let now = Utc::now();
        Review {
            id: ReviewId(1),
            user_id: UserId(1),
            username: "ana".into(),
            media_id: MediaId(3),
            media_title: "zelda".into(),
            media_kind: MediaKind::Game,
            score: 5,
            text: "fine".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut target = review();
        ReviewPatch {
            score: Some(9),
            text: None,
        }
        .apply(&mut target);
        assert_eq!(target.score, 9);
        assert_eq!(target.text, "fine");
    }
}
