//! ASCII tree rendering for derivative manifests.

use crate::models::{Manifest, ManifestNode, NodeKind, ViewableType};

const GEOMETRY_3D: char = '◆';
const GEOMETRY_2D: char = '□';
const VIEW: char = '○';
const OTHER: char = '·';

/// Get the symbol for a manifest node.
fn node_symbol(node: &ManifestNode) -> char {
    match (node.kind, node.viewable_type()) {
        (NodeKind::Geometry, Some(ViewableType::ThreeD)) => GEOMETRY_3D,
        (NodeKind::Geometry, Some(ViewableType::TwoD)) => GEOMETRY_2D,
        (NodeKind::View, _) => VIEW,
        _ => OTHER,
    }
}

fn node_label(node: &ManifestNode) -> String {
    let mut label = node.kind.as_str().to_string();
    if let Some(role) = &node.role {
        label.push_str(&format!(" [{}]", role));
    }
    if let Some(name) = &node.name {
        label.push_str(&format!(" {}", name));
    }
    if let Some(guid) = &node.guid {
        label.push_str(&format!(" ({})", guid));
    }
    label
}

/// Render a manifest as ASCII art, one line per node.
///
/// Example output:
/// ```text
/// manifest: complete (complete)
/// ├── ◆ geometry [3d] {3D} (g-3d)
/// │   └── ○ view [3d] Home (v-1)
/// └── □ geometry [2d] Sheet A1 (g-2d)
/// ```
pub fn render_manifest(manifest: &Manifest) -> String {
    let mut output = format!("manifest: {}", manifest.status);
    if let Some(progress) = &manifest.progress {
        output.push_str(&format!(" ({})", progress));
    }
    output.push('\n');
    // Derivatives themselves are containers; their children are listed at the top level.
    let nodes: Vec<&ManifestNode> = manifest
        .derivatives
        .iter()
        .flat_map(|d| d.children.iter())
        .collect();
    for (i, node) in nodes.iter().enumerate() {
        let is_last = i == nodes.len() - 1;
        render_node(&mut output, node, "", is_last);
    }
    output
}

/// Recursively render a node and its children.
fn render_node(output: &mut String, node: &ManifestNode, prefix: &str, is_last: bool) {
    let branch = if is_last { "└── " } else { "├── " };
    output.push_str(prefix);
    output.push_str(branch);
    output.push(node_symbol(node));
    output.push(' ');
    output.push_str(&node_label(node));
    output.push('\n');

    let continuation = if is_last { "    " } else { "│   " };
    let child_prefix = format!("{}{}", prefix, continuation);

    for (i, child) in node.children.iter().enumerate() {
        let child_is_last = i == node.children.len() - 1;
        render_node(output, child, &child_prefix, child_is_last);
    }
}
