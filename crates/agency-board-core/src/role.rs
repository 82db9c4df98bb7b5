use serde::{Deserialize, Serialize};

/// Organizational role of the acting user, resolved by the identity layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Admin,
    Manager,
    AccountManager,
    Designer,
    VideoMaker,
    Developer,
    Producer,
    TrafficManager,
    Client,
    Viewer,
}

impl ActorRole {
    pub const ALL: [ActorRole; 10] = [
        Self::Admin,
        Self::Manager,
        Self::AccountManager,
        Self::Designer,
        Self::VideoMaker,
        Self::Developer,
        Self::Producer,
        Self::TrafficManager,
        Self::Client,
        Self::Viewer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::AccountManager => "account_manager",
            Self::Designer => "designer",
            Self::VideoMaker => "video_maker",
            Self::Developer => "developer",
            Self::Producer => "producer",
            Self::TrafficManager => "traffic_manager",
            Self::Client => "client",
            Self::Viewer => "viewer",
        }
    }

    /// Admins and managers can act on every board.
    pub fn is_privileged(self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }

    /// Roles that only ever look at boards.
    pub fn is_read_only(self) -> bool {
        matches!(self, Self::Client | Self::Viewer)
    }
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_snake_case_names() {
        assert_eq!(ActorRole::AccountManager.to_string(), "account_manager");
        assert_eq!(ActorRole::VideoMaker.as_str(), "video_maker");
    }

    #[test]
    fn privileged_and_read_only_are_disjoint() {
        for role in ActorRole::ALL {
            assert!(!(role.is_privileged() && role.is_read_only()), "{role}");
        }
    }
}
