//! Depth-first traversal of nested layer trees

use uuid::Uuid;

use crate::layer::Layer;

/// How many matches a traversal collects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkMode {
    /// Stop at the first match
    First,
    /// Collect every match
    All,
}

/// Walk `layers` depth-first in document order (bottom-most first, a group
/// before its children) and collect layers matching `pred`.
pub fn find_layers<'a, F>(layers: &'a [Layer], pred: F, mode: WalkMode) -> Vec<&'a Layer>
where
    F: Fn(&Layer) -> bool,
{
    let mut found = Vec::new();
    let mut stack: Vec<&'a Layer> = layers.iter().rev().collect();

    while let Some(layer) = stack.pop() {
        if pred(layer) {
            found.push(layer);
            if mode == WalkMode::First {
                break;
            }
        }
        stack.extend(layer.children().iter().rev());
    }

    found
}

/// Index path from the root list down to the layer with `id`
pub fn find_layer_path(layers: &[Layer], id: Uuid) -> Option<Vec<usize>> {
    let mut stack: Vec<(Vec<usize>, &Layer)> = layers
        .iter()
        .enumerate()
        .rev()
        .map(|(i, layer)| (vec![i], layer))
        .collect();

    while let Some((path, layer)) = stack.pop() {
        if layer.id == id {
            return Some(path);
        }
        for (i, child) in layer.children().iter().enumerate().rev() {
            let mut child_path = path.clone();
            child_path.push(i);
            stack.push((child_path, child));
        }
    }

    None
}
