//! Static asset configuration.

use super::defaults::default_static_root;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StaticFilesConfig {
    /// Directory the `index.html`, `doc/`, `js/` and `sdk/` roots are resolved against
    #[serde(default = "default_static_root")]
    pub root_dir: String,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root_dir: default_static_root(),
        }
    }
}
