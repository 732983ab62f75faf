//! Fully-qualified dbt manifest node keys.
//!
//! dbt keys every node in `manifest.json` as `<resource_type>.<project>.<name>`,
//! e.g. `model.jaffle_shop.orders`. Only model nodes are ever looked up here.

use std::fmt;

use crate::model_name::ModelName;

/// Resource type prefix of model nodes.
pub const MODEL_RESOURCE_TYPE: &str = "model";

/// A fully-qualified manifest key for a model node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeKey {
    project: String,
    name: ModelName,
}

impl NodeKey {
    /// Key for a model node in `project`.
    pub fn model(project: &str, name: &ModelName) -> Self {
        Self {
            project: project.to_string(),
            name: name.clone(),
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", MODEL_RESOURCE_TYPE, self.project, self.name)
    }
}
