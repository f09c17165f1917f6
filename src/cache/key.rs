//! Namespaced Key Module
//!
//! Qualifies application keys with a namespace so tenants sharing one
//! backing cache never collide.

use crate::error::{CacheError, Result};

/// Maximum namespace length in characters.
pub const MAX_NAMESPACE_LENGTH: usize = 100;

// == Namespaced Key ==
/// The composite key actually stored in the backing cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespacedKey {
    namespace: String,
    key: String,
}

impl NamespacedKey {
    pub(crate) fn new(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

// == Request Context ==
/// Per-request scope carried into every service call.
///
/// Holds the request's namespace; the service's own namespace, when set,
/// takes precedence over it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    namespace: Option<String>,
}

impl RequestContext {
    /// Context in the default (empty) namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context bound to `namespace`, validated against the namespace grammar.
    pub fn with_namespace(namespace: impl Into<String>) -> Result<Self> {
        let namespace = namespace.into();
        validate_namespace(&namespace)?;
        Ok(Self {
            namespace: Some(namespace),
        })
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

// == Key Codec ==
/// Derives namespaced keys from application keys.
#[derive(Debug, Clone, Default)]
pub struct KeyCodec {
    namespace: Option<String>,
}

impl KeyCodec {
    pub fn new(namespace: Option<String>) -> Result<Self> {
        if let Some(ns) = &namespace {
            validate_namespace(ns)?;
        }
        Ok(Self { namespace })
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Qualifies `key`: the codec's namespace, else the request's, else "".
    ///
    /// Any key is accepted, the empty key included.
    pub fn wrap(&self, key: &str, ctx: &RequestContext) -> NamespacedKey {
        let namespace = self
            .namespace
            .as_deref()
            .or_else(|| ctx.namespace())
            .unwrap_or("");
        NamespacedKey::new(namespace, key)
    }
}

// == Validation ==
/// Namespaces are up to 100 characters of `[0-9A-Za-z._-]`.
pub fn validate_namespace(namespace: &str) -> Result<()> {
    if namespace.chars().count() > MAX_NAMESPACE_LENGTH {
        return Err(CacheError::InvalidArgument(format!(
            "Namespace exceeds maximum length of {} characters",
            MAX_NAMESPACE_LENGTH
        )));
    }
    if let Some(bad) = namespace
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(CacheError::InvalidArgument(format!(
            "Namespace '{}' contains illegal character '{}'",
            namespace, bad
        )));
    }
    Ok(())
}
