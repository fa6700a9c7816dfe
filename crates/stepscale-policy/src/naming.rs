//! Unique-name generators for policies declared without a name.
//!
//! The compiler never reaches for ambient identity. Whoever constructs a
//! policy passes in a [`NameGenerator`] scoped to the deployment the policy
//! will live in.

use std::collections::HashSet;

use sha2::{Digest, Sha256};
use tracing::warn;

/// Produces names unique within one deployment scope.
pub trait NameGenerator {
    /// A name for the construct identified by `id`.
    fn unique_name(&mut self, id: &str) -> String;
}

/// Names derived from the construct path, e.g. `StackServiceScaleOut1A2B3C4D`.
///
/// Path components are stripped to ASCII alphanumerics and concatenated,
/// then suffixed with the first 8 hex digits (upper-case) of the SHA-256 of
/// the `/`-joined path. The same path always yields the same name.
#[derive(Debug, Clone, Default)]
pub struct PathNames {
    scope: Vec<String>,
    issued: HashSet<String>,
}

impl PathNames {
    /// A generator for constructs nested under `scope` (outermost first).
    pub fn new(scope: Vec<String>) -> Self {
        Self {
            scope,
            issued: HashSet::new(),
        }
    }
}

impl NameGenerator for PathNames {
    fn unique_name(&mut self, id: &str) -> String {
        let components: Vec<&str> = self
            .scope
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(id))
            .collect();

        let readable: String = components
            .iter()
            .flat_map(|c| c.chars())
            .filter(char::is_ascii_alphanumeric)
            .collect();
        let digest = hex::encode_upper(Sha256::digest(components.join("/").as_bytes()));
        let name = format!("{readable}{}", &digest[..8]);

        if !self.issued.insert(name.clone()) {
            warn!(id, name = %name, "construct id reused within scope; generated name is not unique");
        }
        name
    }
}

/// Names of the form `{prefix}{id}{n}` with a per-generator counter.
#[derive(Debug, Clone)]
pub struct SequentialNames {
    prefix: String,
    next: u64,
}

impl SequentialNames {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl NameGenerator for SequentialNames {
    fn unique_name(&mut self, id: &str) -> String {
        let name = format!("{}{}{}", self.prefix, id, self.next);
        self.next += 1;
        name
    }
}
