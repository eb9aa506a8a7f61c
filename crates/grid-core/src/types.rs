//! API records shared across gridctl crates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Worker count bounds of a cluster, as sent to and received from the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalingRequest {
    pub min: i64,
    pub max: i64,
}

/// Body of a cluster modification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyClusterRequest {
    pub scaling: ScalingRequest,
}

/// Cluster details as returned by `GET /v4/clusters/{id}/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterDetails {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub release_version: String,
    #[serde(default)]
    pub scaling: ScalingRequest,
    #[serde(default)]
    pub workers: Vec<WorkerDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerDetails {
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

/// Cluster status as returned by `GET /v4/clusters/{id}/status/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterStatus {
    #[serde(default)]
    pub cluster: StatusCluster,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusCluster {
    #[serde(default)]
    pub scaling: StatusScaling,
    #[serde(default)]
    pub nodes: Vec<StatusNode>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusScaling {
    #[serde(default)]
    pub desired_capacity: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusNode {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl StatusNode {
    /// True if the node carries `role=master`.
    pub fn is_master(&self) -> bool {
        self.labels.get("role").is_some_and(|role| role == "master")
    }
}

impl ClusterStatus {
    /// Number of nodes not explicitly labelled as masters.
    pub fn worker_count(&self) -> i64 {
        self.cluster.nodes.iter().filter(|node| !node.is_master()).count() as i64
    }
}

/// Installation info as returned by `GET /v4/info/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstallationInfo {
    #[serde(default)]
    pub general: GeneralInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralInfo {
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub installation_name: String,
}

/// One entry of `GET /v4/clusters/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterListItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub release_version: String,
    #[serde(default)]
    pub create_date: String,
}

/// Body of `POST /v4/auth-tokens/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokenRequest {
    pub email: String,
    pub password_base64: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokenResponse {
    pub auth_token: String,
}
