//! Template backend over the NDO client
//!
//! Binds one fabric policy template to the reconciler's
//! [`TemplateBackend`] trait. Client failures are passed through as
//! transport errors without being retried.

use declarative::{PatchOperation, TemplateBackend, TemplateDocument};
use ndo::{Client, TemplateSummary, TemplateType};

/// One validated fabric policy template
pub struct NdoTemplate {
    client: Client,
    summary: TemplateSummary,
}

impl NdoTemplate {
    /// Locate `name` and make sure it is a fabric policy template
    pub fn open(client: Client, name: &str) -> ndo::Result<Self> {
        let summary = client.find_template(name, &TemplateType::FabricPolicy)?;
        Ok(Self { client, summary })
    }

    pub fn summary(&self) -> &TemplateSummary {
        &self.summary
    }
}

impl TemplateBackend for NdoTemplate {
    fn fetch_template(&self) -> declarative::Result<TemplateDocument> {
        self.client
            .get_template(&self.summary.template_id)
            .map(TemplateDocument::new)
            .map_err(declarative::Error::transport)
    }

    fn submit(&self, operations: &[PatchOperation]) -> declarative::Result<TemplateDocument> {
        let body = serde_json::to_value(operations).map_err(declarative::Error::transport)?;
        self.client
            .patch_template(&self.summary.template_id, &body)
            .map(TemplateDocument::new)
            .map_err(declarative::Error::transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::{DesiredState, PHYSICAL_DOMAINS, ReconcileRequest, Reconciler};
    use ndo::MockBackend;
    use serde_json::json;

    fn mock() -> MockBackend {
        let mock = MockBackend::new();
        mock.set_response(
            "templates/summaries",
            json!([
                {"templateId": "t-1", "templateName": "fabric", "templateType": "fabricPolicy"},
                {"templateId": "t-2", "templateName": "tenant", "templateType": "tenantPolicy"}
            ]),
        );
        mock.set_response(
            "templates/t-1",
            json!({
                "templateId": "t-1",
                "fabricPolicyTemplate": {"template": {
                    "vlanPools": [{"name": "poolA", "uuid": "p-a"}],
                    "domains": [{"name": "dom1", "uuid": "u-1", "pool": "p-a"}]
                }}
            }),
        );
        mock
    }

    #[test]
    fn test_open_rejects_other_template_types() {
        let client = Client::with_backend(Box::new(mock()));
        assert!(matches!(
            NdoTemplate::open(client, "tenant"),
            Err(ndo::Error::TemplateTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_fetch_template() {
        let client = Client::with_backend(Box::new(mock()));
        let template = NdoTemplate::open(client, "fabric").unwrap();
        assert_eq!(template.summary().template_id, "t-1");

        let document = template.fetch_template().unwrap();
        assert_eq!(document.str_field("templateId"), Some("t-1"));
    }

    #[test]
    fn test_remove_sends_one_patch() {
        let backend = mock();
        let client = Client::with_backend(Box::new(backend.clone()));
        let template = NdoTemplate::open(client, "fabric").unwrap();
        let reconciler = Reconciler::new(&template, PHYSICAL_DOMAINS);

        let outcome = reconciler
            .reconcile(&ReconcileRequest::new(DesiredState::Absent).name("dom1"))
            .unwrap();

        assert!(outcome.changed);
        let patches = backend.patches();
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].0, "templates/t-1");
        assert_eq!(
            patches[0].1,
            json!([{"op": "remove", "path": "/fabricPolicyTemplate/template/domains/0"}])
        );
    }

    #[test]
    fn test_client_errors_become_transport_errors() {
        let backend = mock();
        let client = Client::with_backend(Box::new(backend));
        let mut template = NdoTemplate::open(client, "fabric").unwrap();
        template.summary.template_id = "gone".to_string();

        let err = template.fetch_template().unwrap_err();
        assert!(matches!(err, declarative::Error::Transport(_)));
    }
}
