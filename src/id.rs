//! Identifiers for compiled schemas.
//!
//! Every schema handed to the engine gets an `$id` that is unique for the
//! lifetime of the process: a random nonce drawn once at first use, plus a
//! monotonically increasing counter, plus a readable label. Two calls with the
//! same locator never share an identifier.

use std::fmt::{self, Display};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

const URN_PREFIX: &str = "urn:autopsy:schema";

static NONCE: OnceLock<u64> = OnceLock::new();
static COUNTER: AtomicU64 = AtomicU64::new(0);

/// A process-unique schema identifier, rendered as a `urn:` URI so the
/// engine accepts it as a base for `#/...` references.
///
/// # Example
///
/// ```rust
/// use autopsy::SchemaId;
///
/// let a = SchemaId::generate("/users:get:200");
/// let b = SchemaId::generate("/users:get:200");
///
/// assert_ne!(a, b);
/// assert!(a.as_str().starts_with("urn:autopsy:schema:"));
/// assert_eq!(a.label(), "/users:get:200");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaId {
    uri: String,
    label: String,
}

impl SchemaId {
    /// Generates a fresh identifier tagged with `label`.
    pub fn generate(label: impl Into<String>) -> Self {
        let label = label.into();
        let nonce = *NONCE.get_or_init(rand::random::<u64>);
        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        let uri = format!(
            "{}:{:016x}-{}:{}",
            URN_PREFIX,
            nonce,
            seq,
            urlencoding::encode(&label)
        );
        Self { uri, label }
    }

    /// Generates an identifier for an `endpoint:method:status` locator.
    pub fn for_locator(endpoint: &str, method: &str, status: u16) -> Self {
        Self::generate(format!("{}:{}:{}", endpoint, method, status))
    }

    /// Returns the URI form, suitable for `$id`.
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// Returns the human-readable label this identifier was generated for.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl AsRef<str> for SchemaId {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}
