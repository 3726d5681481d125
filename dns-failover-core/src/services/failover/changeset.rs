//! 故障切换变更集生成（纯函数，不访问网络）

use crate::types::{Change, ChangeAction, RejectReason, ResourceRecordSet};

/// 目标端点的权重
pub const ACTIVE_WEIGHT: u64 = 100;
/// 其它端点的权重
pub const INACTIVE_WEIGHT: u64 = 0;

/// 可参与故障切换的记录：名称等于 `fqdn`、带权重、类型为 A/AAAA/CNAME
pub fn failover_candidates(records: &[ResourceRecordSet], fqdn: &str) -> Vec<ResourceRecordSet> {
    records
        .iter()
        .filter(|record| {
            record.name == fqdn && record.weight.is_some() && record.record_type.supports_failover()
        })
        .cloned()
        .collect()
}

/// 生成让 `destination` 成为唯一活动端点的 UPSERT 列表
///
/// 名称、类型、set identifier、记录值和别名目标原样保留；TTL 与健康检查 ID
/// 仅在原记录存在时保留。没有任何记录匹配 `destination` 时返回
/// [`RejectReason::NoActiveEndpoint`]。
pub fn generate_failover_changes(
    records: &[ResourceRecordSet],
    destination: &str,
) -> Result<Vec<Change>, RejectReason> {
    let changes: Vec<Change> = records
        .iter()
        .map(|record| {
            let is_destination = record.set_identifier.as_deref() == Some(destination);
            Change {
                action: ChangeAction::Upsert,
                resource_record_set: ResourceRecordSet {
                    weight: Some(if is_destination {
                        ACTIVE_WEIGHT
                    } else {
                        INACTIVE_WEIGHT
                    }),
                    ..record.clone()
                },
            }
        })
        .collect();

    let active = changes
        .iter()
        .filter(|change| change.resource_record_set.weight == Some(ACTIVE_WEIGHT))
        .count();
    if active == 0 {
        return Err(RejectReason::NoActiveEndpoint {
            destination: destination.to_string(),
        });
    }
    Ok(changes)
}
