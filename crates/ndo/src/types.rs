//! Core types for talking to the orchestrator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default login domain for local users.
pub const DEFAULT_LOGIN_DOMAIN: &str = "DefaultAuth";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Kinds of NDO templates.
///
/// Only the kinds this crate can tell apart by their `templateType` value
/// are listed; anything else is kept as [`TemplateType::Other`].
///
/// # Example
///
/// ```
/// use ndo::TemplateType;
///
/// assert_eq!(TemplateType::FabricPolicy.as_str(), "fabricPolicy");
/// assert_eq!(TemplateType::from_api("tenantPolicy"), TemplateType::TenantPolicy);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TemplateType {
    /// Fabric policies: domains, VLAN pools, interface policies.
    FabricPolicy,
    /// Fabric resources: port channels, node profiles.
    FabricResource,
    /// Tenant policies: route maps, DHCP relays.
    TenantPolicy,
    /// Monitoring policies.
    Monitoring,
    /// Service device templates.
    ServiceDevice,
    /// Any other value reported by the API.
    Other(String),
}

impl TemplateType {
    /// The value used by the API.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::FabricPolicy => "fabricPolicy",
            Self::FabricResource => "fabricResource",
            Self::TenantPolicy => "tenantPolicy",
            Self::Monitoring => "monitoring",
            Self::ServiceDevice => "serviceDevice",
            Self::Other(s) => s,
        }
    }

    /// Parse the API value.
    #[must_use]
    pub fn from_api(value: &str) -> Self {
        match value {
            "fabricPolicy" => Self::FabricPolicy,
            "fabricResource" => Self::FabricResource,
            "tenantPolicy" => Self::TenantPolicy,
            "monitoring" => Self::Monitoring,
            "serviceDevice" => Self::ServiceDevice,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of `templates/summaries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    /// Template identifier.
    pub template_id: String,
    /// Template name.
    pub template_name: String,
    /// Raw template type.
    pub template_type: String,
    /// Owning schema, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<String>,
}

impl TemplateSummary {
    /// Parsed template type.
    #[must_use]
    pub fn kind(&self) -> TemplateType {
        TemplateType::from_api(&self.template_type)
    }
}

/// Connection settings for an orchestrator.
///
/// # Example
///
/// ```
/// use ndo::Connection;
///
/// let conn = Connection::new("nd.example.com", "admin", "secret")
///     .login_domain("local")
///     .validate_certs(false);
/// assert_eq!(conn.api_base(), "https://nd.example.com/mso/api/v1");
/// ```
#[derive(Clone)]
pub struct Connection {
    /// Host name or address, optionally with a port.
    pub host: String,
    /// User name.
    pub username: String,
    /// Password.
    pub password: String,
    /// Login domain.
    pub login_domain: String,
    /// Whether to verify TLS certificates.
    pub validate_certs: bool,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Connection {
    /// Create connection settings with defaults for everything else.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            login_domain: DEFAULT_LOGIN_DOMAIN.to_string(),
            validate_certs: true,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set the login domain.
    #[must_use]
    pub fn login_domain(mut self, domain: impl Into<String>) -> Self {
        self.login_domain = domain.into();
        self
    }

    /// Set whether TLS certificates are verified.
    #[must_use]
    pub fn validate_certs(mut self, validate: bool) -> Self {
        self.validate_certs = validate;
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL of the host.
    #[must_use]
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        }
    }

    /// Base URL of the orchestrator API.
    #[must_use]
    pub fn api_base(&self) -> String {
        format!("{}/mso/api/v1", self.base_url())
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"********")
            .field("login_domain", &self.login_domain)
            .field("validate_certs", &self.validate_certs)
            .field("timeout", &self.timeout)
            .finish()
    }
}
