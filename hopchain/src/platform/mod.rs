//! Platform definitions: prompt patterns, privilege levels, failure markers.

mod definition;
mod privilege_level;
pub mod vendors;

pub use definition::PlatformDefinition;
pub use privilege_level::PrivilegeLevel;
