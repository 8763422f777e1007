use serde::Serialize;

use crate::model::ids::UserId;

/// Points needed to gain one level.
pub const POINTS_PER_LEVEL: u32 = 5;

/// Progress tracking for a single user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Level {
    user_id: UserId,
    level: u32,
    points: u32,
}

impl Level {
    /// Fresh progress: level 0 with no points.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            level: 0,
            points: 0,
        }
    }

    /// Rehydrate a stored progress row as-is.
    #[must_use]
    pub fn from_persisted(user_id: UserId, level: u32, points: u32) -> Self {
        Self {
            user_id,
            level,
            points,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    /// Add points and recompute the level from the new total.
    ///
    /// Levels only go up: a stored level above what the points imply is kept.
    /// Returns `true` if the level changed.
    pub fn award_points(&mut self, points: u32) -> bool {
        self.points = self.points.saturating_add(points);
        let earned = self.points / POINTS_PER_LEVEL;
        if earned > self.level {
            self.level = earned;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_level_starts_at_zero() {
        let level = Level::new(UserId::new(1));
        assert_eq!(level.level(), 0);
        assert_eq!(level.points(), 0);
    }

    #[test]
    fn awarding_points_crosses_level_boundary() {
        let mut level = Level::new(UserId::new(1));
        assert!(!level.award_points(4));
        assert_eq!(level.level(), 0);
        assert!(level.award_points(1));
        assert_eq!(level.level(), 1);
        assert_eq!(level.points(), 5);
    }

    #[test]
    fn stored_level_never_decreases() {
        let mut level = Level::from_persisted(UserId::new(1), 9, 25);
        assert!(!level.award_points(1));
        assert_eq!(level.level(), 9);
        assert_eq!(level.points(), 26);
    }

    #[test]
    fn points_saturate() {
        let mut level = Level::from_persisted(UserId::new(1), 0, u32::MAX - 1);
        level.award_points(10);
        assert_eq!(level.points(), u32::MAX);
    }
}
