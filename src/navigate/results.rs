//! Result types for path resolution

use serde::Serialize;

/// One ancestor in a breadcrumb trail, identifier obfuscated
#[derive(Debug, Clone, Serialize)]
pub struct Breadcrumb {
    pub id: String,
    pub name: String,
}
