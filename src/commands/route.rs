//! Option routing: turns a nested option tree into a sub-command path.

use crate::interaction::{Arguments, Options};

/// Resolve the selected sub-command path and the leaf arguments of an option tree.
///
/// Only the first entry of each level is inspected, since a user selects exactly
/// one sub-command path per interaction. When that entry is an object, its key
/// joins the path and routing descends into it. Otherwise the whole current level
/// is the argument mapping of the selected node.
///
/// The returned path has 0 (flat command), 1 (sub-command) or 2 (group +
/// sub-command) elements for well-formed trees.
pub fn options_as_route(options: &Options) -> (Vec<String>, Arguments) {
    let mut path = Vec::new();
    let mut current = options;

    while let Some((name, value)) = current.iter().next() {
        match value.as_object() {
            Some(nested) => {
                path.push(name.clone());
                current = nested;
            }
            None => break,
        }
    }

    (path, current.clone())
}
