//! # ndo
//!
//! Blocking client for Nexus Dashboard Orchestrator templates.
//!
//! This crate provides functionality for:
//! - Logging in to Nexus Dashboard and keeping a bearer token
//! - Locating a template by name and type through `templates/summaries`
//! - Fetching a template document and patching it with JSON patch operations
//!
//! Supported on ND 3.1 (NDO 4.3) and later.
//!
//! ## Example
//!
//! ```no_run
//! use ndo::{Client, Connection, TemplateType};
//! use serde_json::json;
//!
//! let conn = Connection::new("nd.example.com", "admin", "secret");
//! let client = Client::connect(&conn).expect("login failed");
//!
//! let summary = client
//!     .find_template("fabric-policies", &TemplateType::FabricPolicy)
//!     .expect("template not found");
//! let template = client.get_template(&summary.template_id).unwrap();
//! println!("{}", template["displayName"]);
//!
//! let ops = json!([{"op": "remove", "path": "/fabricPolicyTemplate/template/domains/0"}]);
//! client.patch_template(&summary.template_id, &ops).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod types;

pub use error::{Error, ErrorCategory, Result};
pub use types::{Connection, TemplateSummary, TemplateType};

use backend::Backend;
pub use backend::MockBackend;
use backend::http::HttpBackend;
use serde_json::Value;

/// High-level client for orchestrator template operations.
///
/// # Example
///
/// ```
/// use ndo::{Client, MockBackend, TemplateType};
/// use serde_json::json;
///
/// let mock = MockBackend::new();
/// mock.set_response(
///     "templates/summaries",
///     json!([{"templateId": "t-1", "templateName": "fabric", "templateType": "fabricPolicy"}]),
/// );
/// let client = Client::with_backend(Box::new(mock));
///
/// let summary = client.find_template("fabric", &TemplateType::FabricPolicy).unwrap();
/// assert_eq!(summary.template_id, "t-1");
/// ```
pub struct Client {
    backend: Box<dyn Backend>,
}

impl Client {
    /// Log in and create a client using the HTTPS backend.
    pub fn connect(conn: &Connection) -> Result<Self> {
        Ok(Self {
            backend: Box::new(HttpBackend::connect(conn)?),
        })
    }

    /// Create a client with a custom backend (useful for testing).
    #[must_use]
    pub fn with_backend(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    // =========================================================================
    // Template Lookup
    // =========================================================================

    /// List all template summaries.
    pub fn list_templates(&self) -> Result<Vec<TemplateSummary>> {
        let body = self.backend.get("templates/summaries")?;
        Ok(serde_json::from_value(body)?)
    }

    /// Find the template called `name`, which must be of type `kind`.
    ///
    /// # Errors
    ///
    /// - [`Error::TemplateNotFound`] when no template has that name
    /// - [`Error::TemplateTypeMismatch`] when the only templates with that
    ///   name are of another type
    /// - [`Error::AmbiguousTemplate`] when several templates of that type
    ///   share the name
    pub fn find_template(&self, name: &str, kind: &TemplateType) -> Result<TemplateSummary> {
        let named: Vec<TemplateSummary> = self
            .list_templates()?
            .into_iter()
            .filter(|t| t.template_name == name)
            .collect();

        let mut typed: Vec<TemplateSummary> = named
            .iter()
            .filter(|t| &t.kind() == kind)
            .cloned()
            .collect();

        match typed.len() {
            1 => {
                let summary = typed.remove(0);
                log::debug!("template '{}' is {}", name, summary.template_id);
                Ok(summary)
            }
            0 => match named.first() {
                Some(other) => Err(Error::TemplateTypeMismatch {
                    name: name.to_string(),
                    expected: kind.to_string(),
                    actual: other.template_type.clone(),
                }),
                None => Err(Error::TemplateNotFound {
                    name: name.to_string(),
                }),
            },
            count => Err(Error::AmbiguousTemplate {
                name: name.to_string(),
                count,
            }),
        }
    }

    // =========================================================================
    // Template Documents
    // =========================================================================

    /// Fetch a template document by id.
    pub fn get_template(&self, template_id: &str) -> Result<Value> {
        self.backend.get(&template_path(template_id))
    }

    /// Apply patch operations to a template and return the updated document.
    pub fn patch_template(&self, template_id: &str, operations: &Value) -> Result<Value> {
        self.backend.patch(&template_path(template_id), operations)
    }
}

fn template_path(template_id: &str) -> String {
    format!("templates/{}", template_id)
}
