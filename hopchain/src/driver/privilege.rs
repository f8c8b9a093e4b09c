//! Privilege level tracking and navigation.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexMap;
use regex::bytes::Regex;

use crate::error::{Result, SessionError};
use crate::platform::PrivilegeLevel;

/// One step between two adjacent privilege levels.
#[derive(Debug, Clone, Copy)]
pub struct Transition<'a> {
    /// Command that performs the step.
    pub command: &'a str,

    /// Password prompt the device may show after the command.
    pub auth_prompt: Option<&'a Regex>,
}

/// Tracks the current privilege level and finds paths between levels.
///
/// Levels and their parents form an undirected graph; paths are shortest
/// paths found by BFS.
#[derive(Debug)]
pub struct PrivilegeManager {
    levels: IndexMap<String, PrivilegeLevel>,

    /// Adjacency list for the privilege graph.
    graph: HashMap<String, HashSet<String>>,

    /// Current privilege level name.
    current: Option<String>,
}

impl PrivilegeManager {
    /// Create a manager with no current level.
    pub fn new(levels: IndexMap<String, PrivilegeLevel>) -> Self {
        let mut graph: HashMap<String, HashSet<String>> = HashMap::new();
        for (name, level) in &levels {
            graph.entry(name.clone()).or_default();
            if let Some(ref parent) = level.previous_priv {
                graph.entry(name.clone()).or_default().insert(parent.clone());
                graph.entry(parent.clone()).or_default().insert(name.clone());
            }
        }

        Self {
            levels,
            graph,
            current: None,
        }
    }

    /// Determine the privilege level a prompt belongs to.
    pub fn determine_from_prompt(&self, prompt: &str) -> Result<&PrivilegeLevel> {
        self.levels
            .values()
            .find(|level| level.matches(prompt))
            .ok_or_else(|| {
                SessionError::UnknownPrivilege {
                    prompt: prompt.to_string(),
                }
                .into()
            })
    }

    /// Update the current level from a prompt. Unknown prompts leave it unchanged.
    pub fn observe_prompt(&mut self, prompt: &str) -> Option<&str> {
        let name = self.determine_from_prompt(prompt).ok()?.name.clone();
        self.current = Some(name);
        self.current.as_deref()
    }

    /// Get the current privilege level.
    pub fn current(&self) -> Option<&PrivilegeLevel> {
        self.current.as_ref().and_then(|name| self.levels.get(name))
    }

    /// Shortest path between two levels, both ends included.
    pub fn find_path(&self, from: &str, to: &str) -> Result<Vec<String>> {
        if from == to {
            return Ok(vec![from.to_string()]);
        }

        let mut queue = VecDeque::from([from.to_string()]);
        let mut parent: HashMap<String, String> = HashMap::new();
        let mut visited = HashSet::from([from.to_string()]);

        while let Some(node) = queue.pop_front() {
            if node == to {
                let mut path = vec![to.to_string()];
                let mut cursor = to;
                while let Some(prev) = parent.get(cursor) {
                    path.push(prev.clone());
                    cursor = prev.as_str();
                }
                path.reverse();
                return Ok(path);
            }

            for neighbor in self.graph.get(&node).into_iter().flatten() {
                if visited.insert(neighbor.clone()) {
                    parent.insert(neighbor.clone(), node.clone());
                    queue.push_back(neighbor.clone());
                }
            }
        }

        Err(SessionError::NoPrivilegePath {
            from: from.to_string(),
            to: to.to_string(),
        }
        .into())
    }

    /// The command moving between two adjacent levels.
    pub fn transition(&self, from: &str, to: &str) -> Option<Transition<'_>> {
        let from_level = self.levels.get(from)?;
        let to_level = self.levels.get(to)?;

        if to_level.previous_priv.as_deref() == Some(from) {
            Some(Transition {
                command: to_level.escalate_command.as_deref()?,
                auth_prompt: to_level.escalate_prompt.as_ref(),
            })
        } else if from_level.previous_priv.as_deref() == Some(to) {
            Some(Transition {
                command: from_level.deescalate_command.as_deref()?,
                auth_prompt: None,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::vendors::cisco_ios;

    fn manager() -> PrivilegeManager {
        PrivilegeManager::new(cisco_ios::platform().privilege_levels)
    }

    #[test]
    fn test_determine_from_prompt() {
        let manager = manager();
        assert_eq!(manager.determine_from_prompt("R1>").unwrap().name, "exec");
        assert_eq!(manager.determine_from_prompt("R1#").unwrap().name, "privilege_exec");
        assert_eq!(
            manager.determine_from_prompt("R1(config-router)#").unwrap().name,
            "configuration"
        );
        assert!(manager.determine_from_prompt("login:").is_err());
    }

    #[test]
    fn test_observe_prompt_ignores_unknown() {
        let mut manager = manager();
        assert_eq!(manager.observe_prompt("R1#"), Some("privilege_exec"));
        assert_eq!(manager.observe_prompt("--More--"), None);
        assert_eq!(manager.current().unwrap().name, "privilege_exec");
    }

    #[test]
    fn test_find_path() {
        let manager = manager();
        assert_eq!(
            manager.find_path("exec", "configuration").unwrap(),
            vec!["exec", "privilege_exec", "configuration"]
        );
        assert_eq!(
            manager.find_path("configuration", "privilege_exec").unwrap(),
            vec!["configuration", "privilege_exec"]
        );
        assert_eq!(manager.find_path("exec", "exec").unwrap(), vec!["exec"]);
        assert!(manager.find_path("exec", "shell").is_err());
    }

    #[test]
    fn test_transitions() {
        let manager = manager();

        let up = manager.transition("exec", "privilege_exec").unwrap();
        assert_eq!(up.command, "enable");
        assert!(up.auth_prompt.is_some());

        let down = manager.transition("configuration", "privilege_exec").unwrap();
        assert_eq!(down.command, "end");
        assert!(down.auth_prompt.is_none());

        assert!(manager.transition("exec", "configuration").is_none());
    }
}
