//! Capability detection from provider and release version.
//!
//! A capability is available when the installation's provider has an entry
//! in the capability's table and the cluster's release is at least the
//! listed version.

use semver::Version;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("invalid release version {version:?}: {source}")]
    InvalidVersion {
        version: String,
        #[source]
        source: semver::Error,
    },
}

/// Minimum release for one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseProviderPair {
    pub provider: String,
    pub release_version: Version,
}

impl ReleaseProviderPair {
    fn new(provider: &str, major: u64, minor: u64) -> Self {
        Self {
            provider: provider.to_string(),
            release_version: Version::new(major, minor, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityDefinition {
    pub name: &'static str,
    pub required_release_per_provider: Vec<ReleaseProviderPair>,
}

/// Worker count managed within a min/max band.
pub fn autoscaling() -> CapabilityDefinition {
    CapabilityDefinition {
        name: "Autoscaling",
        required_release_per_provider: vec![ReleaseProviderPair::new("aws", 6, 3)],
    }
}

/// Workers spread over several availability zones.
pub fn availability_zones() -> CapabilityDefinition {
    CapabilityDefinition {
        name: "AvailabilityZones",
        required_release_per_provider: vec![ReleaseProviderPair::new("aws", 6, 1)],
    }
}

pub fn node_pools() -> CapabilityDefinition {
    CapabilityDefinition {
        name: "NodePools",
        required_release_per_provider: vec![ReleaseProviderPair::new("aws", 9, 0)],
    }
}

pub fn all() -> Vec<CapabilityDefinition> {
    vec![autoscaling(), availability_zones(), node_pools()]
}

/// Parse a release version, accepting a `v` prefix and missing minor/patch.
///
/// `"6.3"` parses as `6.3.0`, `"v9"` as `9.0.0`.
pub fn parse_release_version(raw: &str) -> Result<Version, CapabilityError> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);

    let split_at = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, suffix) = trimmed.split_at(split_at);

    let mut padded = core.to_string();
    for _ in core.split('.').count()..3 {
        padded.push_str(".0");
    }
    padded.push_str(suffix);

    Version::parse(&padded).map_err(|source| CapabilityError::InvalidVersion {
        version: raw.to_string(),
        source,
    })
}

/// Whether `provider` at `release_version` has `capability`.
pub fn has_capability(
    provider: &str,
    release_version: &str,
    capability: &CapabilityDefinition,
) -> Result<bool, CapabilityError> {
    let version = parse_release_version(release_version)?;

    Ok(capability
        .required_release_per_provider
        .iter()
        .any(|pair| pair.provider == provider && version >= pair.release_version))
}

/// All capabilities available for `provider` at `release_version`.
pub fn capabilities_for(
    provider: &str,
    release_version: &str,
) -> Result<Vec<CapabilityDefinition>, CapabilityError> {
    let mut found = Vec::new();
    for capability in all() {
        if has_capability(provider, release_version, &capability)? {
            found.push(capability);
        }
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pads_short_versions() {
        assert_eq!(parse_release_version("6.3").unwrap(), Version::new(6, 3, 0));
        assert_eq!(parse_release_version("v9").unwrap(), Version::new(9, 0, 0));
        assert_eq!(parse_release_version("8.1.2").unwrap(), Version::new(8, 1, 2));
    }

    #[test]
    fn parse_keeps_prerelease() {
        let v = parse_release_version("6.3-alpha").unwrap();
        assert_eq!(v.pre.as_str(), "alpha");
        assert!(v < Version::new(6, 3, 0));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            parse_release_version("latest"),
            Err(CapabilityError::InvalidVersion { .. })
        ));
        assert!(parse_release_version("").is_err());
    }

    #[test]
    fn autoscaling_on_aws() {
        let cap = autoscaling();
        assert!(!has_capability("aws", "6.2.9", &cap).unwrap());
        assert!(has_capability("aws", "6.3.0", &cap).unwrap());
        assert!(has_capability("aws", "8.0.0", &cap).unwrap());
    }

    #[test]
    fn autoscaling_not_on_other_providers() {
        let cap = autoscaling();
        assert!(!has_capability("azure", "10.0.0", &cap).unwrap());
        assert!(!has_capability("kvm", "10.0.0", &cap).unwrap());
    }

    #[test]
    fn capabilities_for_lists_matching() {
        let names: Vec<_> = capabilities_for("aws", "6.2.0")
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["AvailabilityZones"]);

        let names: Vec<_> = capabilities_for("aws", "9.0.1")
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Autoscaling", "AvailabilityZones", "NodePools"]);
    }
}
