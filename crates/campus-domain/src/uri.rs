//! URI module - interned identifiers for relationship types and roles
//!
//! A URI here is not a network address. It is an inert, comparable token
//! naming a relationship type (`http://schooltool.org/ns/membership`) or a
//! role within one (`.../membership/member`). Equality and hashing only look
//! at the URI string, so two independently constructed values with the same
//! string interoperate as the same identifier.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Errors raised while constructing a URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriError {
    /// The string does not look like a URI (`scheme:rest`)
    Malformed(String),
}

impl fmt::Display for UriError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UriError::Malformed(s) => write!(f, "This does not look like a URI: {:?}", s),
        }
    }
}

impl std::error::Error for UriError {}

/// Identifier of a relationship type or role
///
/// Values built with [`Uri::from_static`] can live in `const` items, which is
/// how the standard vocabulary in [`crate::uris`] is declared. Cloning a
/// static URI never allocates.
#[derive(Clone)]
pub struct Uri {
    uri: Cow<'static, str>,
    name: Option<Cow<'static, str>>,
    description: Option<Cow<'static, str>>,
}

impl Uri {
    /// Declare a URI from static strings
    ///
    /// The string is not validated here; [`crate::UriRegistry::register`]
    /// rejects malformed values when the vocabulary is registered.
    pub const fn from_static(uri: &'static str, name: &'static str, description: &'static str) -> Self {
        Self {
            uri: Cow::Borrowed(uri),
            name: Some(Cow::Borrowed(name)),
            description: Some(Cow::Borrowed(description)),
        }
    }

    /// Create a URI from a runtime string
    ///
    /// # Errors
    /// Returns [`UriError::Malformed`] if the string does not look like a URI
    ///
    /// # Examples
    ///
    /// ```
    /// use campus_domain::Uri;
    ///
    /// let uri = Uri::new("example:Friendship").unwrap();
    /// assert_eq!(uri.as_str(), "example:Friendship");
    /// assert!(Uri::new("no colon").is_err());
    /// ```
    pub fn new(uri: impl Into<String>) -> Result<Self, UriError> {
        let uri = uri.into();
        if !looks_like_a_uri(&uri) {
            return Err(UriError::Malformed(uri));
        }
        Ok(Self {
            uri: Cow::Owned(uri),
            name: None,
            description: None,
        })
    }

    /// Attach a human-readable name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(Cow::Owned(name.into()));
        self
    }

    /// Attach a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Cow::Owned(description.into()));
        self
    }

    /// The URI string
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// Human-readable name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Description, if any
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Name if present, otherwise the URI string
    pub fn label(&self) -> &str {
        self.name().unwrap_or_else(|| self.as_str())
    }

    /// Full identity comparison, including name and description
    ///
    /// `==` only compares URI strings. The registry uses this stricter check
    /// to tell a harmless re-registration from a conflicting definition.
    pub fn same_identity(&self, other: &Uri) -> bool {
        self.uri == other.uri && self.name == other.name && self.description == other.description
    }
}

impl PartialEq for Uri {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
    }
}

impl Eq for Uri {}

impl Hash for Uri {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri.hash(state);
    }
}

impl PartialOrd for Uri {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Uri {
    fn cmp(&self, other: &Self) -> Ordering {
        self.uri.cmp(&other.uri)
    }
}

impl fmt::Debug for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Uri {}>", self.label())
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

/// Check if the argument looks like a URI string
///
/// Approximates RFC 2396: a scheme starting with a letter and made of
/// letters, digits, `+`, `,`, `-` or `.`, then a colon, then at least one
/// character with no whitespace anywhere.
pub fn looks_like_a_uri(s: &str) -> bool {
    let Some((scheme, rest)) = s.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | ',' | '-' | '.')) {
        return false;
    }
    !rest.is_empty() && !rest.chars().any(char::is_whitespace)
}
