//! Variable trees in the libsdd format.
//!
//! ```text
//! vtree <number of nodes>
//! L <id> <variable>
//! I <id> <left child> <right child>
//! ```
//! Children appear before their parents and the last node is the root.

use super::{check_count, lines, Line};
use crate::error::{DiagramError, Result};
use crate::lit::Var;
use hashbrown::HashMap;
use std::path::Path;

enum VtreeNode {
    Leaf(Var),
    Internal(usize, usize),
}

/// Returns the variables of the vtree from left to right, which is the variable order
/// of the diagrams it was used for.
pub fn parse_vtree(input: &str) -> Result<Vec<Var>> {
    let mut nodes = HashMap::new();
    let mut root = None;
    let mut header = None;
    for mut line in lines(input) {
        match line.tag {
            "vtree" => header = Some((line.number, line.next::<usize>("node count")?)),
            "L" => {
                let id = new_id(&nodes, &mut line)?;
                let var = line.next::<Var>("variable")?;
                if var == 0 {
                    return Err(line.error("variable 0 is not allowed"));
                }
                line.end()?;
                nodes.insert(id, VtreeNode::Leaf(var));
                root = Some(id);
            }
            "I" => {
                let id = new_id(&nodes, &mut line)?;
                let left = line.next("left child")?;
                let right = line.next("right child")?;
                for child in [left, right] {
                    if !nodes.contains_key(&child) {
                        return Err(line.error(format!("undefined vtree node {child}")));
                    }
                }
                line.end()?;
                nodes.insert(id, VtreeNode::Internal(left, right));
                root = Some(id);
            }
            tag => return Err(line.error(format!("unknown vtree line \"{tag}\""))),
        }
    }
    if let Some((line, count)) = header {
        check_count(line, count, nodes.len(), "vtree nodes")?;
    }
    let root = root.ok_or(DiagramError::Empty)?;

    // in-order traversal
    let mut order = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        match nodes[&id] {
            VtreeNode::Leaf(var) => order.push(var),
            VtreeNode::Internal(left, right) => {
                stack.push(right);
                stack.push(left);
            }
        }
    }
    Ok(order)
}

fn new_id(nodes: &HashMap<usize, VtreeNode>, line: &mut Line) -> Result<usize> {
    let id = line.next("node id")?;
    if nodes.contains_key(&id) {
        return Err(line.error(format!("vtree node {id} defined twice")));
    }
    Ok(id)
}

pub fn read_vtree(path: impl AsRef<Path>) -> Result<Vec<Var>> {
    let input = std::fs::read_to_string(path)?;
    parse_vtree(&input)
}
