//! Node-level error type.

use thiserror::Error;

use crate::NodeType;

/// Errors raised while decoding a persisted node graph.
///
/// Nodes are stored as loosely-shaped JSON; these variants describe the
/// ways a stored node can fail to map onto [`crate::NodeProperties`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// The properties bag names neither a trigger nor an action definition.
    #[error("node properties carry neither a triggerDefinition nor an actionDefinition")]
    MissingDefinition,

    /// The node's declared `type` disagrees with its properties.
    #[error("node '{node_id}' is declared as {declared} but its properties describe {actual}")]
    TypeMismatch {
        node_id: String,
        declared: NodeType,
        actual: NodeType,
    },
}
