//! Route 53 `DnsGateway` trait 实现

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::traits::{DnsGateway, ErrorContext, ProviderErrorMapper};
use crate::types::{
    AwsCredentials, ChangeBatch, ChangeInfo, HealthCheck, HealthCheckObservation, HostedZone,
    MAX_HEALTH_CHECKS, MAX_HOSTED_ZONES, MAX_RECORD_SETS, ResourceRecordSet,
    strip_resource_prefix,
};

use super::types::{
    ChangeResourceRecordSetsRequest, ChangeResourceRecordSetsResponse,
    GetHealthCheckStatusResponse, ListHealthChecksResponse, ListHostedZonesResponse,
    ListResourceRecordSetsResponse,
};
use super::{ROUTE53_XMLNS, Route53Gateway};

impl Route53Gateway {
    /// 列表被截断时直接失败，不返回部分结果
    fn ensure_complete(&self, is_truncated: bool, resource: &str, limit: u32) -> Result<()> {
        if is_truncated {
            log::error!(
                "[{}] {resource} listing truncated at {limit} items",
                self.provider_name()
            );
            return Err(ProviderError::Truncated {
                provider: self.provider_name().to_string(),
                resource: resource.to_string(),
                limit,
            });
        }
        Ok(())
    }

    /// 响应中缺少集合元素时视为空
    fn items_or_empty<T: Default>(&self, collection: Option<T>, what: &str) -> T {
        collection.unwrap_or_else(|| {
            log::warn!(
                "[{}] Response has no {what} element, treating as empty",
                self.provider_name()
            );
            T::default()
        })
    }
}

#[async_trait]
impl DnsGateway for Route53Gateway {
    fn id(&self) -> &'static str {
        "route53"
    }

    async fn list_hosted_zones(&self, credentials: &AwsCredentials) -> Result<Vec<HostedZone>> {
        let query = format!("maxitems={MAX_HOSTED_ZONES}");
        let response: ListHostedZonesResponse = self
            .get(
                credentials,
                &Self::api_path("hostedzone"),
                &query,
                ErrorContext::default(),
            )
            .await?;

        self.ensure_complete(response.is_truncated, "hosted zones", MAX_HOSTED_ZONES)?;

        Ok(self
            .items_or_empty(response.hosted_zones, "HostedZones")
            .items
            .into_iter()
            .map(HostedZone::from)
            .collect())
    }

    async fn list_resource_record_sets(
        &self,
        credentials: &AwsCredentials,
        zone_id: &str,
    ) -> Result<Vec<ResourceRecordSet>> {
        let zone_id = strip_resource_prefix(zone_id);
        let path = Self::api_path(&format!(
            "hostedzone/{}/rrset",
            urlencoding::encode(zone_id)
        ));
        let query = format!("maxitems={MAX_RECORD_SETS}");
        let response: ListResourceRecordSetsResponse = self
            .get(credentials, &path, &query, ErrorContext::zone(zone_id))
            .await?;

        self.ensure_complete(
            response.is_truncated,
            &format!("record sets in hosted zone {zone_id}"),
            MAX_RECORD_SETS,
        )?;

        Ok(self
            .items_or_empty(response.resource_record_sets, "ResourceRecordSets")
            .items
            .into_iter()
            .map(ResourceRecordSet::from)
            .collect())
    }

    async fn list_health_checks(&self, credentials: &AwsCredentials) -> Result<Vec<HealthCheck>> {
        let query = format!("maxitems={MAX_HEALTH_CHECKS}");
        let response: ListHealthChecksResponse = self
            .get(
                credentials,
                &Self::api_path("healthcheck"),
                &query,
                ErrorContext::default(),
            )
            .await?;

        self.ensure_complete(response.is_truncated, "health checks", MAX_HEALTH_CHECKS)?;

        Ok(self
            .items_or_empty(response.health_checks, "HealthChecks")
            .items
            .into_iter()
            .map(HealthCheck::from)
            .collect())
    }

    async fn get_health_check_status(
        &self,
        credentials: &AwsCredentials,
        health_check_id: &str,
    ) -> Result<Vec<HealthCheckObservation>> {
        let health_check_id = strip_resource_prefix(health_check_id);
        let path = Self::api_path(&format!(
            "healthcheck/{}/status",
            urlencoding::encode(health_check_id)
        ));
        let response: GetHealthCheckStatusResponse = self
            .get(
                credentials,
                &path,
                "",
                ErrorContext::health_check(health_check_id),
            )
            .await?;

        Ok(self
            .items_or_empty(response.observations, "HealthCheckObservations")
            .items
            .into_iter()
            .map(HealthCheckObservation::from)
            .collect())
    }

    async fn change_resource_record_sets(
        &self,
        credentials: &AwsCredentials,
        zone_id: &str,
        batch: &ChangeBatch,
    ) -> Result<ChangeInfo> {
        if batch.changes.is_empty() {
            return Err(ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "changes".to_string(),
                detail: "change batch must contain at least one change".to_string(),
            });
        }

        let zone_id = strip_resource_prefix(zone_id);
        let path = Self::api_path(&format!(
            "hostedzone/{}/rrset/",
            urlencoding::encode(zone_id)
        ));
        let body = ChangeResourceRecordSetsRequest::new(ROUTE53_XMLNS, batch);

        log::info!(
            "[{}] Submitting {} change(s) to hosted zone {zone_id}",
            self.provider_name(),
            batch.changes.len()
        );

        let response: ChangeResourceRecordSetsResponse = self
            .post(credentials, &path, &body, ErrorContext::zone(zone_id))
            .await?;

        Ok(ChangeInfo::from(response.change_info))
    }
}
