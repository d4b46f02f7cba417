/// Errors raised while building or querying a network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    /// Malformed construction input.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Unsupported state initialization keyword.
    #[error(
        "invalid value '{0}' for the initialization, supported values are 'random', 'plus' and 'minus'"
    )]
    InvalidInitialization(String),

    /// A query needed a component (hamiltonian or state transform) which has not been set.
    #[error("no {0} has been set on the network")]
    NotConfigured(&'static str),

    /// Node id outside of `[0, num_nodes)`.
    #[error("unknown node {node}, network has {num_nodes} nodes")]
    UnknownNode {
        /// The requested node.
        node: usize,
        /// Number of nodes in the network.
        num_nodes: usize,
    },
}

/// Result type for network operations.
pub type Result<T> = std::result::Result<T, NetworkError>;
