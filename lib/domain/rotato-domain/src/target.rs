//! Maintenance targets and target-list construction.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a target address came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetOrigin {
    /// Reported by the cluster as a member node.
    Discovered,
    /// Listed under `extra_hosts` in the configuration file.
    Static,
}

impl TargetOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetOrigin::Discovered => "discovered",
            TargetOrigin::Static => "static",
        }
    }
}

/// One addressable maintenance unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    pub address: String,
    pub origin: TargetOrigin,
}

impl Target {
    pub fn discovered(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            origin: TargetOrigin::Discovered,
        }
    }

    pub fn configured(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            origin: TargetOrigin::Static,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

/// Build the processing order: discovered members first, in the order the
/// cluster reported them, then the configured extra hosts.
///
/// The list is neither sorted nor de-duplicated.
pub fn build_target_list<D, S>(discovered: D, extra_hosts: S) -> Vec<Target>
where
    D: IntoIterator,
    D::Item: Into<String>,
    S: IntoIterator,
    S::Item: Into<String>,
{
    discovered
        .into_iter()
        .map(Target::discovered)
        .chain(extra_hosts.into_iter().map(Target::configured))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_hosts_follow_discovered_members() {
        let targets = build_target_list(["10.0.0.1", "10.0.0.2"], ["10.0.9.9"]);
        let addresses: Vec<&str> = targets.iter().map(|t| t.address.as_str()).collect();
        assert_eq!(addresses, ["10.0.0.1", "10.0.0.2", "10.0.9.9"]);
        assert_eq!(targets[0].origin, TargetOrigin::Discovered);
        assert_eq!(targets[1].origin, TargetOrigin::Discovered);
        assert_eq!(targets[2].origin, TargetOrigin::Static);
    }

    #[test]
    fn construction_is_repeatable() {
        let discovered = vec!["10.0.0.3".to_string(), "10.0.0.1".to_string()];
        let extra = vec!["bastion.lan".to_string()];
        let first = build_target_list(discovered.clone(), extra.clone());
        let second = build_target_list(discovered, extra);
        assert_eq!(first, second);
    }

    #[test]
    fn order_is_kept_as_reported() {
        let targets = build_target_list(["10.0.0.9", "10.0.0.1"], Vec::<String>::new());
        assert_eq!(targets[0].address, "10.0.0.9");
        assert_eq!(targets[1].address, "10.0.0.1");
    }

    #[test]
    fn duplicates_are_not_collapsed() {
        let targets = build_target_list(["10.0.0.1"], ["10.0.0.1"]);
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[1].origin, TargetOrigin::Static);
    }
}
