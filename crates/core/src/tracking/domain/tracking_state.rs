/// Where a tracked face is in its lifecycle.
///
/// `Lost` only reflects the most recent update; the owner decides when a
/// lost face should be re-detected or dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingState {
    /// No tracker has been initialized for the current bounds.
    #[default]
    Uninitialized,
    /// The last start or update located the face.
    Tracking,
    /// The last update failed to locate the face; bounds are stale.
    Lost,
}

impl TrackingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackingState::Uninitialized => "uninitialized",
            TrackingState::Tracking => "tracking",
            TrackingState::Lost => "lost",
        }
    }
}

impl std::fmt::Display for TrackingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_uninitialized() {
        assert_eq!(TrackingState::default(), TrackingState::Uninitialized);
    }

    #[test]
    fn test_display() {
        assert_eq!(TrackingState::Tracking.to_string(), "tracking");
        assert_eq!(TrackingState::Lost.to_string(), "lost");
        assert_eq!(TrackingState::Uninitialized.to_string(), "uninitialized");
    }
}
