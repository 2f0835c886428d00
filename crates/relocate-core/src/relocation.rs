//! Relocation target for chart images

use serde::{Deserialize, Serialize};

/// Top-level values key shared by a chart and its sub-charts
pub const GLOBAL_KEY: &str = "global";

/// Sub-key of `global` holding the image registry host
pub const IMAGE_REGISTRY_KEY: &str = "imageRegistry";

/// Sub-key of `global` holding the image namespace
pub const IMAGE_NAMESPACE_KEY: &str = "imageNamespace";

/// Where the chart's images should be pulled from after relocation
///
/// Both values are written verbatim; an empty string is written as an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relocation {
    /// New registry, e.g. `registry.example.com:5000`
    pub registry: String,
    /// New namespace (path prefix) under the registry
    pub namespace: String,
}

impl Relocation {
    pub fn new(registry: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            registry: registry.into(),
            namespace: namespace.into(),
        }
    }

    /// Image prefix the relocated chart resolves to, `<registry>/<namespace>/`
    #[must_use]
    pub fn image_prefix(&self) -> String {
        [self.registry.as_str(), self.namespace.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| format!("{}/", part.trim_end_matches('/')))
            .collect()
    }
}
