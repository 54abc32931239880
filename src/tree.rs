//! Nested view of the flat catalog, as the sidebar shows it.

use crate::core::menu::{CatalogGroup, MenuItem};
use crate::core::store::Store;

#[derive(Debug, Clone, PartialEq)]
pub struct MenuNode<'a> {
    pub item: &'a MenuItem,
    pub children: Vec<MenuNode<'a>>,
}

/// Nests the store's items under their parents, siblings in list order.
pub fn build(store: &Store) -> Vec<MenuNode<'_>> {
    build_level(store, None)
}

fn build_level<'a>(store: &'a Store, parent_id: Option<&'a str>) -> Vec<MenuNode<'a>> {
    store
        .children(parent_id)
        .map(|item| MenuNode {
            item,
            children: build_level(store, Some(item.id.as_str())),
        })
        .collect()
}

/// Top-level nodes of one catalog group.
pub fn group<'a>(nodes: &[MenuNode<'a>], group: CatalogGroup) -> Vec<MenuNode<'a>> {
    nodes
        .iter()
        .filter(|node| node.item.kind.group() == group)
        .cloned()
        .collect()
}

/// Keeps nodes whose name contains `word` (case-insensitive) plus their
/// ancestors. A matching folder keeps its whole subtree. An empty word
/// keeps everything.
pub fn filter<'a>(nodes: Vec<MenuNode<'a>>, word: &str) -> Vec<MenuNode<'a>> {
    let needle = word.trim().to_lowercase();
    if needle.is_empty() {
        return nodes;
    }
    filter_level(nodes, &needle)
}

fn filter_level<'a>(nodes: Vec<MenuNode<'a>>, needle: &str) -> Vec<MenuNode<'a>> {
    nodes
        .into_iter()
        .filter_map(|mut node| {
            if node.item.name.to_lowercase().contains(needle) {
                return Some(node);
            }
            node.children = filter_level(node.children, needle);
            (!node.children.is_empty()).then_some(node)
        })
        .collect()
}

/// Renders nodes as an indented outline, one item per line.
pub fn render(nodes: &[MenuNode<'_>]) -> String {
    let mut out = String::new();
    render_level(nodes, "", &mut out);
    out
}

fn render_level(nodes: &[MenuNode<'_>], prefix: &str, out: &mut String) {
    for (idx, node) in nodes.iter().enumerate() {
        let last = idx + 1 == nodes.len();
        let branch = if last { "└── " } else { "├── " };
        let marker = if node.item.is_folder() { "/" } else { "" };
        out.push_str(&format!(
            "{prefix}{branch}{}{marker}  [{}] {}\n",
            node.item.name,
            node.item.kind.label(),
            node.item.id
        ));
        let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
        render_level(&node.children, &child_prefix, out);
    }
}
