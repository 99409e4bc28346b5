//! Edge list text format
//!
//! One undirected edge per line as two comma-separated integers, optionally
//! wrapped in parentheses:
//!
//! ```text
//! # a comment
//! 0,1
//! (1, 2)
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. A line that cannot be
//! read as an edge is skipped and reported as a [`ParseWarning`]; the rest of
//! the file still loads. Parsing only collects edges, building adjacency is
//! left to [`Topology`](crate::graph::Topology).

use crate::core_types::NodeId;
use crate::error::TopologyError;
use std::fs;
use std::path::Path;
use tracing::warn;

/// A line that was skipped while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// 1-based line number
    pub line: usize,
    /// Trimmed line content
    pub content: String,
    pub reason: String,
}

/// Result of parsing an edge list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeList {
    pub edges: Vec<(NodeId, NodeId)>,
    pub warnings: Vec<ParseWarning>,
}

impl EdgeList {
    /// Number of distinct nodes referenced by the parsed edges.
    #[must_use]
    pub fn node_count(&self) -> usize {
        let mut nodes: Vec<NodeId> = self.edges.iter().flat_map(|&(a, b)| [a, b]).collect();
        nodes.sort_unstable();
        nodes.dedup();
        nodes.len()
    }
}

/// Parse edge list text. Never fails; bad lines become warnings.
#[must_use]
pub fn parse_edge_list(text: &str) -> EdgeList {
    let mut list = EdgeList::default();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_edge(line) {
            Ok(edge) => list.edges.push(edge),
            Err(reason) => {
                warn!(line = index + 1, content = line, %reason, "skipping edge list entry");
                list.warnings.push(ParseWarning {
                    line: index + 1,
                    content: line.to_string(),
                    reason,
                });
            }
        }
    }

    list
}

fn parse_edge(line: &str) -> Result<(NodeId, NodeId), String> {
    let inner = line.trim_matches(|c| c == '(' || c == ')');
    let parts: Vec<&str> = inner.split(',').collect();
    if parts.len() != 2 {
        return Err(format!("expected 2 comma-separated values, found {}", parts.len()));
    }

    let a = parse_node(parts[0])?;
    let b = parse_node(parts[1])?;
    if a == b {
        return Err(format!("self-loop on node {a}"));
    }
    Ok((a, b))
}

fn parse_node(field: &str) -> Result<NodeId, String> {
    let field = field.trim();
    field
        .parse::<u32>()
        .map(NodeId)
        .map_err(|e| format!("invalid node id {field:?}: {e}"))
}

/// Read and parse an edge list file.
///
/// # Errors
/// Returns [`TopologyError::Io`] if the file cannot be read. Malformed lines
/// are not errors; see [`EdgeList::warnings`].
pub fn load_edge_list<P: AsRef<Path>>(path: P) -> Result<EdgeList, TopologyError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| TopologyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_edge_list(&text))
}
