//! OG drop allocations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options of [`DropsOg::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropsOgOptions<T = Value> {
    #[serde(default)]
    pub allocations: Option<T>,
}

impl<T> Default for DropsOgOptions<T> {
    fn default() -> Self {
        Self { allocations: None }
    }
}

/// Holder of the OG drop allocations the caller was configured with.
#[derive(Debug, Clone, PartialEq)]
pub struct DropsOg<T = Value> {
    allocations: Option<T>,
}

impl<T> DropsOg<T> {
    pub fn new(options: DropsOgOptions<T>) -> Self {
        Self {
            allocations: options.allocations,
        }
    }

    pub fn allocations(&self) -> Option<&T> {
        self.allocations.as_ref()
    }
}
