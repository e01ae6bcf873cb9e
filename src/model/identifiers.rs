//! Core identifier newtypes with smart constructors.
//!
//! Plain identifiers validate non-empty strings at construction time.
//! [`WidgetInstanceId`] is a tagged union that records where a floating widget
//! instance came from; it is decided once (at creation or when a stored string
//! is parsed) and carried through instead of being re-derived at each use.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix marking instance ids that only exist on this device.
pub const LOCAL_ID_PREFIX: &str = "floating-";

/// Identifier of a dashboard template (a saved arrangement).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TemplateId(String);

impl TemplateId {
    /// Smart constructor: validates non-empty template id
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidTemplateId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidTemplateId::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TemplateId {
    type Error = InvalidTemplateId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TemplateId> for String {
    fn from(id: TemplateId) -> Self {
        id.0
    }
}

/// Identifier of a widget content type in the widget catalog (e.g. "cot-chart-view").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CatalogWidgetId(String);

impl CatalogWidgetId {
    /// Smart constructor: validates non-empty catalog id
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidCatalogWidgetId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidCatalogWidgetId::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CatalogWidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CatalogWidgetId {
    type Error = InvalidCatalogWidgetId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CatalogWidgetId> for String {
    fn from(id: CatalogWidgetId) -> Self {
        id.0
    }
}

/// Identifier the remote store uses to address one placed widget instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BackendWidgetId(String);

impl BackendWidgetId {
    /// Smart constructor: validates non-empty backend id
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidWidgetId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidWidgetId::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BackendWidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Instance id of a widget that was never synced to the remote store.
///
/// Rendered as `floating-<catalogId>-<epochMillis>-<token>`. The raw text is
/// kept verbatim so ids read back from storage round-trip exactly, even when
/// they were written by an older build with a different token format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalInstanceId(String);

impl LocalInstanceId {
    /// Build a fresh local id.
    pub fn generate(catalog_id: &CatalogWidgetId, created_at_millis: i64, token: &str) -> Self {
        Self(format!(
            "{LOCAL_ID_PREFIX}{catalog_id}-{created_at_millis}-{token}"
        ))
    }

    /// Catalog id embedded in the instance id, if the id is well formed.
    pub fn catalog_id(&self) -> Option<&str> {
        let body = self.0.strip_prefix(LOCAL_ID_PREFIX)?;
        let mut parts = body.rsplitn(3, '-');
        let _token = parts.next()?;
        let millis = parts.next()?;
        millis.parse::<i64>().ok()?;
        parts.next().filter(|catalog| !catalog.is_empty())
    }

    /// Creation time embedded in the instance id, if the id is well formed.
    pub fn created_at_millis(&self) -> Option<i64> {
        let body = self.0.strip_prefix(LOCAL_ID_PREFIX)?;
        body.rsplitn(3, '-').nth(1)?.parse().ok()
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identity of one floating widget instance, tagged by provenance.
///
/// # Shapes
/// - `Local`: created on this device and never synced. Remote calls for this
///   id are always skipped.
/// - `Composite`: `<templateId>-<backendId>`, produced when a saved template is
///   loaded from the server. The backend id is the text after the last hyphen.
/// - `Remote`: a bare backend id, used as-is.
///
/// Strings that match none of the shapes cleanly fall back to `Remote` (use
/// as-is); if that is wrong the server rejects the call and it is logged like
/// any other remote failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WidgetInstanceId {
    /// Local-only instance.
    Local(LocalInstanceId),
    /// Template-scoped instance known to the server.
    Composite {
        /// Owning template.
        template_id: TemplateId,
        /// Server-side id.
        backend_id: BackendWidgetId,
    },
    /// Bare server-side id.
    Remote(BackendWidgetId),
}

impl WidgetInstanceId {
    /// Build a composite id for a widget loaded from a saved template.
    pub fn composite(template_id: TemplateId, backend_id: BackendWidgetId) -> Self {
        Self::Composite {
            template_id,
            backend_id,
        }
    }

    /// Backend id to send to remote collaborators, or `None` for local-only ids.
    pub fn backend_id(&self) -> Option<&BackendWidgetId> {
        match self {
            Self::Local(_) => None,
            Self::Composite { backend_id, .. } => Some(backend_id),
            Self::Remote(backend_id) => Some(backend_id),
        }
    }

    /// Whether this id must never be sent to the remote store.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

impl FromStr for WidgetInstanceId {
    type Err = InvalidWidgetId;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.is_empty() {
            return Err(InvalidWidgetId::Empty);
        }

        if raw.starts_with(LOCAL_ID_PREFIX) {
            return Ok(Self::Local(LocalInstanceId(raw.to_string())));
        }

        if let Some((template, backend)) = raw.rsplit_once('-') {
            if let (Ok(template_id), Ok(backend_id)) =
                (TemplateId::new(template), BackendWidgetId::new(backend))
            {
                return Ok(Self::composite(template_id, backend_id));
            }
        }

        Ok(Self::Remote(BackendWidgetId(raw.to_string())))
    }
}

impl fmt::Display for WidgetInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(local) => f.write_str(local.as_str()),
            Self::Composite {
                template_id,
                backend_id,
            } => write!(f, "{template_id}-{backend_id}"),
            Self::Remote(backend_id) => f.write_str(backend_id.as_str()),
        }
    }
}

impl TryFrom<String> for WidgetInstanceId {
    type Error = InvalidWidgetId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WidgetInstanceId> for String {
    fn from(id: WidgetInstanceId) -> Self {
        id.to_string()
    }
}

// ===== Error Types =====

/// Errors from [`TemplateId::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidTemplateId {
    /// Empty input.
    #[error("Template ID cannot be empty")]
    Empty,
}

/// Errors from [`CatalogWidgetId::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidCatalogWidgetId {
    /// Empty input.
    #[error("Catalog widget ID cannot be empty")]
    Empty,
}

/// Errors from widget id constructors and parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidWidgetId {
    /// Empty input.
    #[error("Widget ID cannot be empty")]
    Empty,
}

// ===== Tests =====
