//! Node list to JSON output conversion

use crate::NodeList;

/// Convert selected nodes to a JSON array.
///
/// With `with_paths`, each element is `{"path": ..., "value": ...}`;
/// otherwise the values alone.
pub fn nodes_to_json(nodes: &NodeList<'_>, with_paths: bool) -> serde_json::Value {
    let items = nodes
        .iter()
        .map(|node| {
            let value = serde_json::Value::from(node.value);
            if with_paths {
                serde_json::json!({"path": node.path(), "value": value})
            } else {
                value
            }
        })
        .collect();
    serde_json::Value::Array(items)
}
