//! `bustix-navigation`: the dashboard menu and who gets to see which parts.
//!
//! A menu entry is gated, in order of precedence, by:
//! - `hidden` (never shown) and `disabled` (always shown, inert),
//! - its own `auth` list (role names or `permission:`-prefixed permissions),
//! - the fallback [`PathPermissionTable`] keyed by the entry's path.
//!
//! Entries gated by none of these are visible to every signed-in user.

pub mod filter;
pub mod menu;
pub mod node;
pub mod permission_table;

#[cfg(test)]
mod testing;

pub use filter::{MenuFilter, has_any_role};
pub use menu::{default_navigation, load_navigation};
pub use node::{AuthEntry, NavNode, NavSection, PERMISSION_PREFIX};
pub use permission_table::{NavigationConfigError, PathPermissionTable};
