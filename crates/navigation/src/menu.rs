//! The BusTix admin dashboard menu.

use std::path::Path;

use crate::{NavNode, NavSection, NavigationConfigError};

/// Navigation shown by the admin dashboard before filtering.
pub fn default_navigation() -> Vec<NavSection> {
    vec![
        NavSection::new(
            "General",
            vec![NavNode::new("Dashboard", "/dashboard").with_icon("home")],
        ),
        NavSection::new(
            "Operations",
            vec![
                NavNode::new("Events", "/events")
                    .with_icon("calendar")
                    .with_children(vec![
                        NavNode::new("All events", "/events"),
                        NavNode::new("New event", "/events/new"),
                    ]),
                NavNode::new("Trips", "/trips").with_icon("bus"),
                NavNode::new("Routes", "/routes").with_icon("map"),
                NavNode::new("Coupons", "/coupons").with_icon("ticket"),
                NavNode::new("Fleet", "/fleet")
                    .with_icon("truck")
                    .with_children(vec![NavNode::new("Units", "/fleet/units")]),
            ],
        ),
        NavSection::new(
            "Administration",
            vec![
                NavNode::new("Users", "/users")
                    .with_icon("users")
                    .with_auth(["Admin", "Manager"]),
                NavNode::new("Roles", "/roles")
                    .with_icon("shield")
                    .with_auth(["permission:roles:view", "permission:roles:manage"]),
                NavNode::new("Reports", "/reports")
                    .with_icon("chart")
                    .disabled(),
                NavNode::new("Landing preview", "/landing").hidden(),
            ],
        ),
    ]
}

/// Load a navigation tree from a JSON array of sections.
pub fn load_navigation(path: impl AsRef<Path>) -> Result<Vec<NavSection>, NavigationConfigError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| NavigationConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_navigation_round_trips_through_json() {
        let tree = default_navigation();
        let json = serde_json::to_string(&tree).unwrap();
        let back: Vec<NavSection> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn default_navigation_sections() {
        let names: Vec<String> = default_navigation().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["General", "Operations", "Administration"]);
    }
}
