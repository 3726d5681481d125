//! Route 53 REST/XML type definition
//!
//! Field names follow the XML element names of the 2013-04-01 API. Repeated elements are
//! wrapped in a container struct (`<HostedZones><HostedZone/>...</HostedZones>`).

use serde::{Deserialize, Serialize};

use crate::types::{
    AliasTarget, Change, ChangeBatch, ChangeInfo, ChangeStatus, HealthCheck, HealthCheckConfig,
    HealthCheckObservation, HostedZone, HostedZoneConfig, ResourceRecord, ResourceRecordSet,
    StatusReport, strip_resource_prefix,
};

// ============ Errors ============

/// `<ErrorResponse>` returned by Route 53 and STS on failure.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "Error")]
    pub error: ErrorDetail,
    #[serde(rename = "RequestId")]
    pub request_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(rename = "Type")]
    pub error_type: Option<String>,
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Message")]
    pub message: Option<String>,
}

/// `<InvalidChangeBatch>` returned when a change batch is rejected.
#[derive(Debug, Deserialize)]
pub struct InvalidChangeBatchResponse {
    #[serde(rename = "Messages")]
    pub messages: Messages,
}

#[derive(Debug, Default, Deserialize)]
pub struct Messages {
    #[serde(rename = "Message", default)]
    pub items: Vec<String>,
}

// ============ Hosted Zones ============

/// Response payload for `ListHostedZones`.
#[derive(Debug, Deserialize)]
pub struct ListHostedZonesResponse {
    #[serde(rename = "HostedZones")]
    pub hosted_zones: Option<HostedZones>,
    #[serde(rename = "IsTruncated", default)]
    pub is_truncated: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct HostedZones {
    #[serde(rename = "HostedZone", default)]
    pub items: Vec<Route53HostedZone>,
}

#[derive(Debug, Deserialize)]
pub struct Route53HostedZone {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "CallerReference")]
    pub caller_reference: String,
    #[serde(rename = "Config")]
    pub config: Option<Route53HostedZoneConfig>,
    #[serde(rename = "ResourceRecordSetCount")]
    pub resource_record_set_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Route53HostedZoneConfig {
    #[serde(rename = "Comment")]
    pub comment: Option<String>,
    #[serde(rename = "PrivateZone", default)]
    pub private_zone: bool,
}

impl From<Route53HostedZone> for HostedZone {
    fn from(z: Route53HostedZone) -> Self {
        Self {
            id: strip_resource_prefix(&z.id).to_string(),
            name: z.name,
            caller_reference: z.caller_reference,
            config: z.config.map(|c| HostedZoneConfig {
                comment: c.comment,
                private_zone: c.private_zone,
            }),
            resource_record_set_count: z.resource_record_set_count,
        }
    }
}

// ============ Record Sets ============

/// Response payload for `ListResourceRecordSets`.
#[derive(Debug, Deserialize)]
pub struct ListResourceRecordSetsResponse {
    #[serde(rename = "ResourceRecordSets")]
    pub resource_record_sets: Option<ResourceRecordSets>,
    #[serde(rename = "IsTruncated", default)]
    pub is_truncated: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResourceRecordSets {
    #[serde(rename = "ResourceRecordSet", default)]
    pub items: Vec<Route53RecordSet>,
}

/// Record set element, used both in listings and in change batches.
///
/// Field order is the element order the API schema expects when serializing.
#[derive(Debug, Serialize, Deserialize)]
pub struct Route53RecordSet {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    #[serde(rename = "SetIdentifier", skip_serializing_if = "Option::is_none")]
    pub set_identifier: Option<String>,
    #[serde(rename = "Weight", skip_serializing_if = "Option::is_none")]
    pub weight: Option<u64>,
    #[serde(rename = "TTL", skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
    #[serde(rename = "ResourceRecords", skip_serializing_if = "Option::is_none")]
    pub resource_records: Option<Route53ResourceRecords>,
    #[serde(rename = "AliasTarget", skip_serializing_if = "Option::is_none")]
    pub alias_target: Option<Route53AliasTarget>,
    #[serde(rename = "HealthCheckId", skip_serializing_if = "Option::is_none")]
    pub health_check_id: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Route53ResourceRecords {
    #[serde(rename = "ResourceRecord", default)]
    pub items: Vec<Route53ResourceRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Route53ResourceRecord {
    #[serde(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Route53AliasTarget {
    #[serde(rename = "HostedZoneId")]
    pub hosted_zone_id: String,
    #[serde(rename = "DNSName")]
    pub dns_name: String,
    #[serde(rename = "EvaluateTargetHealth", default)]
    pub evaluate_target_health: bool,
}

impl From<Route53RecordSet> for ResourceRecordSet {
    fn from(r: Route53RecordSet) -> Self {
        Self {
            name: r.name,
            record_type: r.record_type.into(),
            set_identifier: r.set_identifier,
            weight: r.weight,
            ttl: r.ttl,
            health_check_id: r.health_check_id,
            resource_records: r
                .resource_records
                .unwrap_or_default()
                .items
                .into_iter()
                .map(|rr| ResourceRecord { value: rr.value })
                .collect(),
            alias_target: r.alias_target.map(|a| AliasTarget {
                hosted_zone_id: a.hosted_zone_id,
                dns_name: a.dns_name,
                evaluate_target_health: a.evaluate_target_health,
            }),
        }
    }
}

impl From<&ResourceRecordSet> for Route53RecordSet {
    fn from(r: &ResourceRecordSet) -> Self {
        let resource_records = if r.resource_records.is_empty() {
            None
        } else {
            Some(Route53ResourceRecords {
                items: r
                    .resource_records
                    .iter()
                    .map(|rr| Route53ResourceRecord {
                        value: rr.value.clone(),
                    })
                    .collect(),
            })
        };
        Self {
            name: r.name.clone(),
            record_type: r.record_type.as_str().to_string(),
            set_identifier: r.set_identifier.clone(),
            weight: r.weight,
            ttl: r.ttl,
            resource_records,
            alias_target: r.alias_target.as_ref().map(|a| Route53AliasTarget {
                hosted_zone_id: a.hosted_zone_id.clone(),
                dns_name: a.dns_name.clone(),
                evaluate_target_health: a.evaluate_target_health,
            }),
            health_check_id: r.health_check_id.clone(),
        }
    }
}

// ============ Health Checks ============

/// Response payload for `ListHealthChecks`.
#[derive(Debug, Deserialize)]
pub struct ListHealthChecksResponse {
    #[serde(rename = "HealthChecks")]
    pub health_checks: Option<HealthChecks>,
    #[serde(rename = "IsTruncated", default)]
    pub is_truncated: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct HealthChecks {
    #[serde(rename = "HealthCheck", default)]
    pub items: Vec<Route53HealthCheck>,
}

#[derive(Debug, Deserialize)]
pub struct Route53HealthCheck {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "CallerReference")]
    pub caller_reference: String,
    #[serde(rename = "HealthCheckConfig")]
    pub config: Route53HealthCheckConfig,
    #[serde(rename = "HealthCheckVersion", default)]
    pub version: u64,
}

#[derive(Debug, Deserialize)]
pub struct Route53HealthCheckConfig {
    #[serde(rename = "Type")]
    pub check_type: String,
    #[serde(rename = "IPAddress")]
    pub ip_address: Option<String>,
    #[serde(rename = "Port")]
    pub port: Option<u16>,
    #[serde(rename = "ResourcePath")]
    pub resource_path: Option<String>,
    #[serde(rename = "FullyQualifiedDomainName")]
    pub fully_qualified_domain_name: Option<String>,
    #[serde(rename = "SearchString")]
    pub search_string: Option<String>,
    #[serde(rename = "RequestInterval")]
    pub request_interval: Option<u32>,
    #[serde(rename = "FailureThreshold")]
    pub failure_threshold: Option<u32>,
    #[serde(rename = "Disabled")]
    pub disabled: Option<bool>,
}

impl From<Route53HealthCheck> for HealthCheck {
    fn from(h: Route53HealthCheck) -> Self {
        let c = h.config;
        Self {
            id: strip_resource_prefix(&h.id).to_string(),
            caller_reference: h.caller_reference,
            config: HealthCheckConfig {
                check_type: c.check_type,
                ip_address: c.ip_address,
                port: c.port,
                resource_path: c.resource_path,
                fully_qualified_domain_name: c.fully_qualified_domain_name,
                search_string: c.search_string,
                request_interval: c.request_interval,
                failure_threshold: c.failure_threshold,
                disabled: c.disabled,
            },
            version: h.version,
        }
    }
}

/// Response payload for `GetHealthCheckStatus`.
#[derive(Debug, Deserialize)]
pub struct GetHealthCheckStatusResponse {
    #[serde(rename = "HealthCheckObservations")]
    pub observations: Option<HealthCheckObservations>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HealthCheckObservations {
    #[serde(rename = "HealthCheckObservation", default)]
    pub items: Vec<Route53Observation>,
}

#[derive(Debug, Deserialize)]
pub struct Route53Observation {
    #[serde(rename = "Region")]
    pub region: Option<String>,
    #[serde(rename = "IPAddress")]
    pub ip_address: Option<String>,
    #[serde(rename = "StatusReport")]
    pub status_report: Option<Route53StatusReport>,
}

#[derive(Debug, Deserialize)]
pub struct Route53StatusReport {
    #[serde(rename = "Status", default)]
    pub status: String,
    #[serde(rename = "CheckedTime")]
    pub checked_time: Option<String>,
}

impl From<Route53Observation> for HealthCheckObservation {
    fn from(o: Route53Observation) -> Self {
        Self {
            region: o.region,
            ip_address: o.ip_address,
            status_report: o.status_report.map(|s| StatusReport {
                status: s.status,
                checked_time: s.checked_time,
            }),
        }
    }
}

// ============ Change Batches ============

/// Request body for `ChangeResourceRecordSets`.
#[derive(Debug, Serialize)]
#[serde(rename = "ChangeResourceRecordSetsRequest")]
pub struct ChangeResourceRecordSetsRequest {
    #[serde(rename = "@xmlns")]
    pub xmlns: &'static str,
    #[serde(rename = "ChangeBatch")]
    pub change_batch: Route53ChangeBatch,
}

#[derive(Debug, Serialize)]
pub struct Route53ChangeBatch {
    #[serde(rename = "Comment", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "Changes")]
    pub changes: Route53Changes,
}

#[derive(Debug, Serialize)]
pub struct Route53Changes {
    #[serde(rename = "Change")]
    pub items: Vec<Route53Change>,
}

#[derive(Debug, Serialize)]
pub struct Route53Change {
    #[serde(rename = "Action")]
    pub action: &'static str,
    #[serde(rename = "ResourceRecordSet")]
    pub resource_record_set: Route53RecordSet,
}

impl ChangeResourceRecordSetsRequest {
    pub fn new(xmlns: &'static str, batch: &ChangeBatch) -> Self {
        Self {
            xmlns,
            change_batch: Route53ChangeBatch {
                comment: batch.comment.clone(),
                changes: Route53Changes {
                    items: batch.changes.iter().map(Route53Change::from).collect(),
                },
            },
        }
    }
}

impl From<&Change> for Route53Change {
    fn from(c: &Change) -> Self {
        Self {
            action: c.action.as_str(),
            resource_record_set: Route53RecordSet::from(&c.resource_record_set),
        }
    }
}

/// Response payload for `ChangeResourceRecordSets`.
#[derive(Debug, Deserialize)]
pub struct ChangeResourceRecordSetsResponse {
    #[serde(rename = "ChangeInfo")]
    pub change_info: Route53ChangeInfo,
}

#[derive(Debug, Deserialize)]
pub struct Route53ChangeInfo {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "SubmittedAt")]
    pub submitted_at: String,
    #[serde(rename = "Comment")]
    pub comment: Option<String>,
}

impl From<Route53ChangeInfo> for ChangeInfo {
    fn from(c: Route53ChangeInfo) -> Self {
        Self {
            id: strip_resource_prefix(&c.id).to_string(),
            status: if c.status.eq_ignore_ascii_case("INSYNC") {
                ChangeStatus::Insync
            } else {
                ChangeStatus::Pending
            },
            submitted_at: c.submitted_at,
            comment: c.comment,
        }
    }
}
