//! The inspected widget hierarchy for one scan.
//!
//! `WidgetTree` is an id-keyed node table. Parent links are plain
//! `WidgetId`s so the whole tree can be dropped and rebuilt on every scan
//! without any lifetime coupling to the previous snapshot.

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::InspectError;
use crate::pack::PackArgs;

use super::{WidgetHandle, WidgetId, WidgetRect};

#[derive(Debug, Clone)]
pub struct WidgetNode {
    id: WidgetId,
    handle: Rc<dyn WidgetHandle>,
    parent: Option<WidgetId>,
    children: Vec<WidgetId>,
    pack_args: PackArgs,
    needs_packing: bool,
    depth: usize,
}

impl WidgetNode {
    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn handle(&self) -> &dyn WidgetHandle {
        self.handle.as_ref()
    }

    pub fn handle_rc(&self) -> Rc<dyn WidgetHandle> {
        self.handle.clone()
    }

    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    /// Children in attachment order.
    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    pub fn pack_args(&self) -> &PackArgs {
        &self.pack_args
    }

    pub fn needs_packing(&self) -> bool {
        self.needs_packing
    }

    /// A widget that should be packed but reported no pack options.
    pub fn is_unpacked_warning(&self) -> bool {
        self.needs_packing && self.pack_args.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.handle.class_name(), self.handle.path())
    }
}

#[derive(Debug, Clone)]
pub struct WidgetTree {
    root: WidgetId,
    nodes: HashMap<WidgetId, WidgetNode>,
}

impl WidgetTree {
    /// Build a tree from `root` and an enumeration of its descendants.
    ///
    /// Every descendant's declared parent must already have been seen, which
    /// holds for both depth-first and breadth-first walks. Children are
    /// attached in the order they are enumerated.
    pub fn build<I>(root: Rc<dyn WidgetHandle>, descendants: I) -> Result<Self, InspectError>
    where
        I: IntoIterator<Item = Rc<dyn WidgetHandle>>,
    {
        let root_id = root.id();
        let mut nodes = HashMap::new();
        nodes.insert(root_id, Self::make_node(root, None, 0)?);

        for handle in descendants {
            let id = handle.id();
            if nodes.contains_key(&id) {
                return Err(InspectError::DuplicateHandle(id));
            }
            let Some(parent) = handle.parent_id() else {
                return Err(InspectError::DetachedWidget(id));
            };
            let depth = match nodes.get_mut(&parent) {
                Some(parent_node) => {
                    parent_node.children.push(id);
                    parent_node.depth + 1
                }
                None => {
                    return Err(InspectError::StructuralInconsistency { child: id, parent });
                }
            };
            nodes.insert(id, Self::make_node(handle, Some(parent), depth)?);
        }

        tracing::debug!(root = %root_id, widgets = nodes.len(), "built widget tree");
        Ok(Self {
            root: root_id,
            nodes,
        })
    }

    fn make_node(
        handle: Rc<dyn WidgetHandle>,
        parent: Option<WidgetId>,
        depth: usize,
    ) -> Result<WidgetNode, InspectError> {
        let id = handle.id();
        let pack_args = PackArgs::from_options(&handle.pack_info())
            .map_err(|source| InspectError::InvalidPackOption { widget: id, source })?;
        Ok(WidgetNode {
            id,
            needs_packing: handle.needs_packing(),
            handle,
            parent,
            children: Vec::new(),
            pack_args,
            depth,
        })
    }

    pub fn root(&self) -> &WidgetNode {
        &self.nodes[&self.root]
    }

    pub fn root_id(&self) -> WidgetId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: WidgetId) -> Option<&WidgetNode> {
        self.nodes.get(&id)
    }

    pub fn node(&self, id: WidgetId) -> Result<&WidgetNode, InspectError> {
        self.get(id).ok_or(InspectError::UnknownWidget(id))
    }

    pub fn parent_of(&self, id: WidgetId) -> Option<&WidgetNode> {
        self.get(id)?.parent.and_then(|p| self.get(p))
    }

    /// Node ids in pre-order, matching the line order of `format_tree`.
    pub fn preorder(&self) -> Vec<WidgetId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(node) = self.nodes.get(&id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        order
    }

    /// Siblings attached before `id`, in attachment order.
    pub fn preceding_siblings(&self, id: WidgetId) -> Vec<WidgetId> {
        let Some(parent) = self.parent_of(id) else {
            return Vec::new();
        };
        parent
            .children
            .iter()
            .copied()
            .take_while(|&child| child != id)
            .collect()
    }

    /// Live rectangle of `id` relative to the root's screen origin.
    pub fn rect_of(&self, id: WidgetId) -> Result<WidgetRect, InspectError> {
        let root = self.root();
        if !root.handle.exists() {
            return Err(InspectError::StaleHandle(root.id));
        }
        let node = self.node(id)?;
        if !node.handle.exists() {
            return Err(InspectError::StaleHandle(id));
        }
        let origin = root.handle.screen_origin();
        let pos = node.handle.screen_origin();
        let size = node.handle.size();
        Ok(WidgetRect::new(
            pos.x.saturating_sub(origin.x),
            pos.y.saturating_sub(origin.y),
            size.width,
            size.height,
        ))
    }
}

/// Pretty-print the tree, one line per widget in pre-order.
pub fn format_tree(tree: &WidgetTree) -> Vec<String> {
    let mut lines = Vec::with_capacity(tree.len());
    let root = tree.root();
    lines.push(root.label());
    let children = root.children();
    for (i, child) in children.iter().enumerate() {
        format_subtree(tree, *child, "", i + 1 == children.len(), &mut lines);
    }
    lines
}

fn format_subtree(tree: &WidgetTree, id: WidgetId, prefix: &str, last: bool, out: &mut Vec<String>) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let connector = if last { "└── " } else { "├── " };
    out.push(format!("{prefix}{connector}{}", node.label()));
    let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
    let children = node.children();
    for (i, child) in children.iter().enumerate() {
        format_subtree(tree, *child, &child_prefix, i + 1 == children.len(), out);
    }
}
