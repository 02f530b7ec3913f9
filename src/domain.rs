//! # Custom Domain Module
//!
//! Serves a composed gateway from a custom domain.
//!
//! Attaching a domain synthesizes a regional domain name bound to a
//! certificate, `A` and `AAAA` alias records pointing at the domain's
//! regional endpoint, and an API mapping to the default stage. The mapping
//! is only created once the domain, the stage and both records exist; that
//! ordering is declared as a [`DependencyGraph`] before any resource is
//! rendered.

use crate::compose::{Composition, API_LOGICAL_ID, STAGE_LOGICAL_ID};
use crate::dag::DependencyGraph;
use crate::error::{ComposeError, Result};
use crate::template::{get_att, reference, Resource};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

pub const DOMAIN_LOGICAL_ID: &str = "CustomDomain";
pub const A_RECORD_LOGICAL_ID: &str = "CustomDomainARecord";
pub const AAAA_RECORD_LOGICAL_ID: &str = "CustomDomainAaaaRecord";
pub const MAPPING_LOGICAL_ID: &str = "CustomDomainApiMapping";

/// Domain to serve the gateway from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomDomain {
    /// Fully qualified domain name, e.g. `api.example.com`
    pub domain_name: String,
    /// ARN of the certificate covering `domain_name`
    pub certificate_arn: String,
    /// Name of the hosted zone the records are created in, e.g. `example.com`
    pub zone_name: String,
}

impl CustomDomain {
    pub fn new(
        domain_name: impl Into<String>,
        certificate_arn: impl Into<String>,
        zone_name: impl Into<String>,
    ) -> Self {
        CustomDomain {
            domain_name: domain_name.into(),
            certificate_arn: certificate_arn.into(),
            zone_name: zone_name.into(),
        }
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("domain_name", &self.domain_name),
            ("certificate_arn", &self.certificate_arn),
            ("zone_name", &self.zone_name),
        ] {
            if value.trim().is_empty() {
                return Err(ComposeError::invalid_config(format!(
                    "custom domain {field} must not be empty"
                )));
            }
        }
        Ok(())
    }

    /// Hosted zone name with exactly one trailing dot
    fn hosted_zone_name(&self) -> String {
        format!("{}.", self.zone_name.trim_end_matches('.'))
    }
}

/// Resources synthesized for a custom domain
#[derive(Debug, Clone, PartialEq)]
pub struct DomainResources {
    pub domain_name: String,
    pub domain: Resource,
    pub a_record: Resource,
    pub aaaa_record: Resource,
    pub mapping: Resource,
    pub ordering: DomainOrdering,
}

/// Declared creation order of the domain resources
#[derive(Debug, Clone)]
pub struct DomainOrdering(DependencyGraph);

impl PartialEq for DomainOrdering {
    fn eq(&self, other: &Self) -> bool {
        self.0.topological_order().ok() == other.0.topological_order().ok()
    }
}

impl DomainOrdering {
    /// domain → records → mapping, stage → mapping
    fn declare(stage_logical_id: &str) -> Result<Self> {
        let graph = DependencyGraph::new()
            .node(stage_logical_id)
            .edge(DOMAIN_LOGICAL_ID, A_RECORD_LOGICAL_ID)
            .edge(DOMAIN_LOGICAL_ID, AAAA_RECORD_LOGICAL_ID)
            .edge(DOMAIN_LOGICAL_ID, MAPPING_LOGICAL_ID)
            .edge(stage_logical_id, MAPPING_LOGICAL_ID)
            .edge(A_RECORD_LOGICAL_ID, MAPPING_LOGICAL_ID)
            .edge(AAAA_RECORD_LOGICAL_ID, MAPPING_LOGICAL_ID);
        graph.validate()?;
        Ok(DomainOrdering(graph))
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.0
    }

    fn apply(&self, resource: Resource) -> Resource {
        let prerequisites = self.0.prerequisites(&resource.logical_id).to_vec();
        prerequisites
            .into_iter()
            .fold(resource, |r, p| r.depends_on(p))
    }
}

impl DomainResources {
    /// Synthesize the domain resources for `api_logical_id` served from `stage_logical_id`
    pub fn synthesize(
        domain: &CustomDomain,
        api_logical_id: &str,
        stage_logical_id: &str,
    ) -> Result<Self> {
        domain.validate()?;
        let ordering = DomainOrdering::declare(stage_logical_id)?;

        let domain_resource = Resource::new(DOMAIN_LOGICAL_ID, "AWS::ApiGatewayV2::DomainName")
            .property("DomainName", json!(domain.domain_name))
            .property(
                "DomainNameConfigurations",
                json!([{
                    "CertificateArn": domain.certificate_arn,
                    "EndpointType": "REGIONAL",
                    "SecurityPolicy": "TLS_1_2"
                }]),
            );

        let alias_target = json!({
            "DNSName": get_att(DOMAIN_LOGICAL_ID, "RegionalDomainName"),
            "HostedZoneId": get_att(DOMAIN_LOGICAL_ID, "RegionalHostedZoneId"),
        });
        let record = |logical_id: &str, record_type: &str| {
            Resource::new(logical_id, "AWS::Route53::RecordSet")
                .property("HostedZoneName", json!(domain.hosted_zone_name()))
                .property("Name", json!(domain.domain_name))
                .property("Type", json!(record_type))
                .property("AliasTarget", alias_target.clone())
        };
        let a_record = ordering.apply(record(A_RECORD_LOGICAL_ID, "A"));
        let aaaa_record = ordering.apply(record(AAAA_RECORD_LOGICAL_ID, "AAAA"));

        let mapping = ordering.apply(
            Resource::new(MAPPING_LOGICAL_ID, "AWS::ApiGatewayV2::ApiMapping")
                .property("ApiId", reference(api_logical_id))
                .property("DomainName", reference(DOMAIN_LOGICAL_ID))
                .property("Stage", reference(stage_logical_id)),
        );

        Ok(DomainResources {
            domain_name: domain.domain_name.clone(),
            domain: ordering.apply(domain_resource),
            a_record,
            aaaa_record,
            mapping,
            ordering,
        })
    }

    /// Resources in declared creation order
    pub fn resources(&self) -> Result<Vec<Resource>> {
        let order = self.ordering.graph().topological_order()?;
        Ok(order
            .iter()
            .filter_map(|id| match id.as_str() {
                DOMAIN_LOGICAL_ID => Some(self.domain.clone()),
                A_RECORD_LOGICAL_ID => Some(self.a_record.clone()),
                AAAA_RECORD_LOGICAL_ID => Some(self.aaaa_record.clone()),
                MAPPING_LOGICAL_ID => Some(self.mapping.clone()),
                // the stage belongs to the composition
                _ => None,
            })
            .collect())
    }
}

impl Composition {
    /// Serve this composition's default stage from a custom domain
    ///
    /// # Errors
    ///
    /// * [`ComposeError::InvalidConfig`] if a field is empty or a domain is
    ///   already attached
    pub fn attach_custom_domain(&mut self, domain: &CustomDomain) -> Result<()> {
        if self.custom_domain.is_some() {
            return Err(ComposeError::invalid_config(
                "a custom domain is already attached",
            ));
        }
        let resources = DomainResources::synthesize(domain, API_LOGICAL_ID, STAGE_LOGICAL_ID)?;
        info!(domain = %domain.domain_name, zone = %domain.zone_name, "attached custom domain");
        self.custom_domain = Some(resources);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn domain() -> CustomDomain {
        CustomDomain::new(
            "api.example.com",
            "arn:aws:acm:eu-west-1:123456789012:certificate/abc",
            "example.com",
        )
    }

    #[test]
    fn test_mapping_depends_on_all_four() {
        let res = DomainResources::synthesize(&domain(), "HttpApi", "DefaultStage").unwrap();
        let mut deps = res.mapping.depends_on.clone();
        deps.sort();
        assert_eq!(
            deps,
            vec![
                "CustomDomain",
                "CustomDomainARecord",
                "CustomDomainAaaaRecord",
                "DefaultStage"
            ]
        );
    }

    #[test]
    fn test_records_alias_regional_endpoint() {
        let res = DomainResources::synthesize(&domain(), "HttpApi", "DefaultStage").unwrap();
        assert_eq!(res.a_record.get("Type"), Some(&json!("A")));
        assert_eq!(res.aaaa_record.get("Type"), Some(&json!("AAAA")));
        assert_eq!(res.a_record.get("HostedZoneName"), Some(&json!("example.com.")));
        assert_eq!(
            res.aaaa_record.get("AliasTarget").unwrap()["DNSName"],
            get_att("CustomDomain", "RegionalDomainName")
        );
        assert_eq!(res.a_record.depends_on, vec!["CustomDomain"]);
        assert!(res.domain.depends_on.is_empty());
    }

    #[test]
    fn test_resources_in_creation_order() {
        let res = DomainResources::synthesize(&domain(), "HttpApi", "DefaultStage").unwrap();
        let ids: Vec<_> = res
            .resources()
            .unwrap()
            .into_iter()
            .map(|r| r.logical_id)
            .collect();
        assert_eq!(ids.first().map(String::as_str), Some("CustomDomain"));
        assert_eq!(ids.last().map(String::as_str), Some("CustomDomainApiMapping"));
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_zone_name_trailing_dot_not_doubled() {
        let mut d = domain();
        d.zone_name = "example.com.".into();
        assert_eq!(d.hosted_zone_name(), "example.com.");
    }

    #[test]
    fn test_empty_certificate_rejected() {
        let mut d = domain();
        d.certificate_arn = String::new();
        assert!(DomainResources::synthesize(&d, "HttpApi", "DefaultStage").is_err());
    }
}
