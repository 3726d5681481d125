//! 类型定义模块

mod account;
mod activity;
mod failover;
mod site;

use std::collections::BTreeMap;

pub use account::{Account, CreateAccountRequest, UpdateAccountRequest};
pub use activity::{ActivityAction, ActivityEntry, ActivityScope, SYSTEM_ACTOR};
pub use failover::{FailoverOutcome, FailoverRequest, RejectReason};
pub use site::{normalize_fqdn, CreateSiteRequest, Site};

// Re-export provider 库的公共类型
pub use dns_failover_provider::{
    AliasTarget, AwsCredentials, Change, ChangeAction, ChangeBatch, ChangeInfo, ChangeStatus,
    HealthCheck, HealthCheckConfig, HealthCheckObservation, HostedZone, HostedZoneConfig,
    RecordType, ResourceRecord, ResourceRecordSet, StatusReport,
};

/// zone id -> zone（单账户）
pub type HostedZonesIndex = BTreeMap<String, HostedZone>;

/// health check id -> health check（单账户）
pub type HealthChecksIndex = BTreeMap<String, HealthCheck>;

/// account id -> zone id -> zone
pub type AccountZonesIndex = BTreeMap<String, HostedZonesIndex>;
