//! Status markers for progress output
//!
//! Plain ASCII so they render on any terminal.

/// Icon constants
pub struct Icons;

impl Icons {
    pub const STATUS_SUCCESS: &'static str = "[OK]";
    pub const STATUS_INFO: &'static str = "[i]";
    pub const STATUS_HOOK: &'static str = "[*]";
    pub const STATUS_RUNNING: &'static str = "[>]";
}

/// Status icon type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIcon {
    /// Something was changed
    Success,
    /// Already in the desired state
    Info,
    /// Hook installation
    Hook,
    /// Work in progress
    Running,
}

impl StatusIcon {
    /// Get the text marker
    pub fn get(self) -> &'static str {
        match self {
            Self::Success => Icons::STATUS_SUCCESS,
            Self::Info => Icons::STATUS_INFO,
            Self::Hook => Icons::STATUS_HOOK,
            Self::Running => Icons::STATUS_RUNNING,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers() {
        assert_eq!(StatusIcon::Success.get(), "[OK]");
        assert_eq!(StatusIcon::Info.get(), "[i]");
        assert_eq!(StatusIcon::Hook.get(), "[*]");
        assert_eq!(StatusIcon::Running.get(), "[>]");
    }
}
