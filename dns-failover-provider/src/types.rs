use std::fmt;

use serde::{Deserialize, Serialize};

// ============ Page Ceilings ============

/// Maximum number of hosted zones requested in a single `ListHostedZones` call.
pub const MAX_HOSTED_ZONES: u32 = 500;
/// Maximum number of record sets requested in a single `ListResourceRecordSets` call.
pub const MAX_RECORD_SETS: u32 = 1000;
/// Maximum number of health checks requested in a single `ListHealthChecks` call.
pub const MAX_HEALTH_CHECKS: u32 = 1000;

/// Strip a path-like resource prefix such as `/hostedzone/` or `/change/` from an ID.
///
/// Route 53 returns IDs as `/hostedzone/Z123`; everything downstream uses the bare `Z123`.
pub fn strip_resource_prefix(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}

// ============ Credentials ============

/// Access key pair for one account.
///
/// Every gateway call takes one of these explicitly; there is no ambient credential context.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsCredentials {
    /// Access key ID (`AKIA...`).
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
}

impl AwsCredentials {
    /// Creates a credential pair.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .finish()
    }
}

// ============ Hosted Zones ============

/// Optional hosted zone settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedZoneConfig {
    /// Free-form comment attached to the zone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Whether the zone is a private (VPC) zone.
    pub private_zone: bool,
}

/// A hosted zone as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedZone {
    /// Zone ID without the `/hostedzone/` prefix.
    pub id: String,
    /// Zone apex, with trailing dot (`example.com.`).
    pub name: String,
    /// Caller reference supplied when the zone was created.
    pub caller_reference: String,
    /// Zone settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<HostedZoneConfig>,
    /// Number of record sets in the zone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_record_set_count: Option<u64>,
}

// ============ Record Sets ============

/// DNS record type of a record set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
    Ns,
    Soa,
    Srv,
    Caa,
    Ptr,
    Spf,
    Naptr,
    Ds,
    /// Any type not listed above, kept verbatim.
    Other(String),
}

impl RecordType {
    /// Returns the wire representation (`"AAAA"`, `"CNAME"`, ...).
    pub fn as_str(&self) -> &str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Ns => "NS",
            Self::Soa => "SOA",
            Self::Srv => "SRV",
            Self::Caa => "CAA",
            Self::Ptr => "PTR",
            Self::Spf => "SPF",
            Self::Naptr => "NAPTR",
            Self::Ds => "DS",
            Self::Other(s) => s,
        }
    }

    /// Whether records of this type can take part in weighted failover (A, AAAA, CNAME).
    pub fn supports_failover(&self) -> bool {
        matches!(self, Self::A | Self::Aaaa | Self::Cname)
    }
}

impl From<String> for RecordType {
    fn from(value: String) -> Self {
        match value.to_uppercase().as_str() {
            "A" => Self::A,
            "AAAA" => Self::Aaaa,
            "CNAME" => Self::Cname,
            "MX" => Self::Mx,
            "TXT" => Self::Txt,
            "NS" => Self::Ns,
            "SOA" => Self::Soa,
            "SRV" => Self::Srv,
            "CAA" => Self::Caa,
            "PTR" => Self::Ptr,
            "SPF" => Self::Spf,
            "NAPTR" => Self::Naptr,
            "DS" => Self::Ds,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for RecordType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        match value {
            RecordType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value of a record set (an IP address, a hostname, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    pub value: String,
}

impl ResourceRecord {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Alias target of an alias record set. Alias records carry no TTL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasTarget {
    pub hosted_zone_id: String,
    pub dns_name: String,
    pub evaluate_target_health: bool,
}

/// A resource record set.
///
/// Weighted failover groups are record sets sharing `name` + `record_type` with distinct
/// `set_identifier`s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecordSet {
    /// Fully-qualified name with trailing dot.
    pub name: String,
    /// Record type.
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Failover group discriminator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_identifier: Option<String>,
    /// Routing weight (weighted routing policy only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u64>,
    /// DNS TTL in seconds. Absent on alias records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
    /// Associated health check ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_id: Option<String>,
    /// Record values.
    #[serde(default)]
    pub resource_records: Vec<ResourceRecord>,
    /// Alias target, for alias records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_target: Option<AliasTarget>,
}

// ============ Health Checks ============

/// Health check definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckConfig {
    /// Check type (`HTTP`, `HTTPS`, `TCP`, `CALCULATED`, ...).
    pub check_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fully_qualified_domain_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_threshold: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

/// A health check as reported by the provider. Read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    /// Health check ID without any path prefix.
    pub id: String,
    pub caller_reference: String,
    pub config: HealthCheckConfig,
    pub version: u64,
}

/// Latest status reported by one health checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_time: Option<String>,
}

/// One observer's view of a health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckObservation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_report: Option<StatusReport>,
}

// ============ Change Batches ============

/// Mutation applied to a record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    Create,
    Delete,
    Upsert,
}

impl ChangeAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Delete => "DELETE",
            Self::Upsert => "UPSERT",
        }
    }
}

/// One record set mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub action: ChangeAction,
    pub resource_record_set: ResourceRecordSet,
}

/// A batch of changes applied atomically by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeBatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub changes: Vec<Change>,
}

/// Propagation status of a submitted change batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeStatus {
    Pending,
    Insync,
}

/// Receipt for a submitted change batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeInfo {
    /// Change ID without the `/change/` prefix.
    pub id: String,
    pub status: ChangeStatus,
    /// Submission time as reported by the provider (ISO 8601).
    pub submitted_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}
