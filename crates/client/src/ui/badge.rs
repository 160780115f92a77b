//! Unread-count badge view state.

use std::sync::RwLock;

/// The unread badge. Hidden entirely at zero, shows the raw count otherwise;
/// no cap, no truncation. Always overwritten by the latest poll result.
#[derive(Debug, Default)]
pub struct UnreadBadge {
    count: RwLock<usize>,
}

impl UnreadBadge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the badge with the latest fetched count.
    pub fn set(&self, count: usize) {
        *self.count.write().expect("badge lock poisoned") = count;
    }

    pub fn count(&self) -> usize {
        *self.count.read().expect("badge lock poisoned")
    }

    pub fn is_visible(&self) -> bool {
        self.count() > 0
    }

    /// Badge text, or None when the badge is hidden.
    pub fn text(&self) -> Option<String> {
        let count = self.count();
        (count > 0).then(|| count.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_hidden_at_zero() {
        let badge = UnreadBadge::new();
        assert!(!badge.is_visible());
        assert_eq!(badge.text(), None);
    }

    #[test]
    fn test_badge_shows_count() {
        let badge = UnreadBadge::new();
        badge.set(7);
        assert!(badge.is_visible());
        assert_eq!(badge.text(), Some("7".to_string()));
    }

    #[test]
    fn test_badge_last_write_wins() {
        let badge = UnreadBadge::new();
        badge.set(12);
        badge.set(3);
        assert_eq!(badge.count(), 3);

        badge.set(0);
        assert!(!badge.is_visible());
    }

    #[test]
    fn test_badge_no_cap() {
        let badge = UnreadBadge::new();
        badge.set(1_000_000);
        assert_eq!(badge.text(), Some("1000000".to_string()));
    }
}
