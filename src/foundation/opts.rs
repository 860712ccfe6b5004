use crate::foundation::error::{LoadError, LoadResult};

/// How the reference resolver treats a layer whose asset id is not in the document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveMode {
    /// Leave the link unset and keep going.
    #[default]
    Lenient,
    /// Fail the load with [`LoadError::DanglingReference`].
    Strict,
}

/// Loader configuration.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderOpts {
    /// Dangling reference policy.
    pub resolve_mode: ResolveMode,
    /// Upper bound on image fetches in flight within one batch.
    pub max_concurrent_fetches: usize,
}

impl Default for LoaderOpts {
    fn default() -> Self {
        Self {
            resolve_mode: ResolveMode::Lenient,
            max_concurrent_fetches: 8,
        }
    }
}

impl LoaderOpts {
    /// Parse options from a JSON object; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> LoadResult<Self> {
        serde_json::from_str(s).map_err(|e| LoadError::serde(format!("parse loader opts: {e}")))
    }

    /// Fetch concurrency actually used; zero is treated as one.
    pub fn fetch_concurrency(&self) -> usize {
        self.max_concurrent_fetches.max(1)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/opts.rs"]
mod tests;
