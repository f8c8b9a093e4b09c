//! Cisco IOS platform definition.
//!
//! Privilege levels:
//! - `exec` - User EXEC mode with `>` prompt
//! - `privilege_exec` - Privileged EXEC mode with `#` prompt
//! - `configuration` - Global and sub-configuration modes with `(config*)#` prompt
//!
//! # Prompt Examples
//!
//! ```text
//! R1>                      # exec mode
//! R1#                      # privilege_exec mode
//! R1(config)#              # configuration mode
//! R1(config-router)#       # config sub-mode (router rip / router ospf)
//! ```
//!
//! # Privilege Graph
//!
//! ```text
//! ┌──────┐  enable     ┌────────────────┐  configure terminal  ┌───────────────┐
//! │ exec ├──────────────► privilege_exec ├──────────────────────► configuration │
//! │  >   │   disable   │       #        │        end           │  (config*)#   │
//! └──────┘◄────────────┴────────────────┘◄─────────────────────┴───────────────┘
//! ```

use crate::platform::{PlatformDefinition, PrivilegeLevel};

/// Platform name used in logs.
pub const NAME: &str = "cisco_ios";

const EXEC_PROMPT: &str = r"(?m)^[\w.\-@/:]{1,63}>\s?$";
const PRIVILEGE_EXEC_PROMPT: &str = r"(?m)^[\w.\-@/:]{1,63}#\s?$";
const CONFIGURATION_PROMPT: &str = r"(?m)^[\w.\-@/:]{1,63}\(conf[\w.\-@/:+]{0,63}\)#\s?$";
const ENABLE_PASSWORD_PROMPT: &str = r"(?mi)^password:\s?$";

/// Create the Cisco IOS platform definition.
pub fn platform() -> PlatformDefinition {
    let exec = PrivilegeLevel::new("exec", EXEC_PROMPT).expect("exec prompt pattern");

    let privilege_exec = PrivilegeLevel::new("privilege_exec", PRIVILEGE_EXEC_PROMPT)
        .expect("privilege_exec prompt pattern")
        .with_parent("exec")
        .with_escalate("enable")
        .with_deescalate("disable")
        .with_auth(ENABLE_PASSWORD_PROMPT)
        .expect("enable password pattern")
        .with_not_contains("(conf");

    let configuration = PrivilegeLevel::new("configuration", CONFIGURATION_PROMPT)
        .expect("configuration prompt pattern")
        .with_parent("privilege_exec")
        .with_escalate("configure terminal")
        .with_deescalate("end");

    PlatformDefinition::new(NAME)
        .with_privilege(exec)
        .with_privilege(privilege_exec)
        .with_privilege(configuration)
        .with_default_privilege("privilege_exec")
        .with_failure_pattern("% Ambiguous command")
        .with_failure_pattern("% Incomplete command")
        .with_failure_pattern("% Invalid input")
        .with_failure_pattern("% Unknown command")
        .with_on_open_command("terminal length 0")
        .with_on_open_command("terminal width 511")
        .with_terminal_size(511, 24)
}
