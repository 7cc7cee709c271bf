/**
 * Comment Tree
 *
 * Nests a flat list of comments under their parents. Siblings keep
 * creation order. A comment whose parent is not in the list becomes a root.
 */

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::shared::forum::CommentNode;

pub fn build_comment_tree(mut flat: Vec<CommentNode>) -> Vec<CommentNode> {
    flat.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

    let ids: HashSet<Uuid> = flat.iter().map(|c| c.id).collect();
    let mut root_ids = Vec::new();
    let mut child_ids: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    let mut nodes: HashMap<Uuid, CommentNode> = HashMap::with_capacity(flat.len());

    for comment in flat {
        match comment.parent_id {
            Some(parent) if ids.contains(&parent) => child_ids.entry(parent).or_default().push(comment.id),
            _ => root_ids.push(comment.id),
        }
        nodes.insert(comment.id, comment);
    }

    // Pre-order walk; attaching in reverse fills every child before its parent.
    let mut order = Vec::with_capacity(nodes.len());
    let mut stack: Vec<Uuid> = root_ids.iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        order.push(id);
        if let Some(kids) = child_ids.get(&id) {
            stack.extend(kids.iter().rev().copied());
        }
    }

    for id in order.iter().rev() {
        if let Some(kids) = child_ids.remove(id) {
            let attached: Vec<CommentNode> = kids.iter().filter_map(|kid| nodes.remove(kid)).collect();
            if let Some(node) = nodes.get_mut(id) {
                node.children = attached;
            }
        }
    }

    root_ids.iter().filter_map(|id| nodes.remove(id)).collect()
}
