//! Sentential decision diagrams in the libsdd format.
//!
//! ```text
//! sdd <number of nodes>
//! F <id>
//! T <id>
//! L <id> <vtree node> <literal>
//! D <id> <vtree node> <number of elements> {<prime> <sub>}*
//! ```
//! Nodes appear bottom-up and the last one is the root. A decision node denotes the disjunction
//! of the conjunctions of its (prime, sub) elements. Vtree nodes are ignored: the variable order
//! is given to the [`Manager`](crate::Manager) compiling the circuit.

use super::{check_count, lines, Line};
use crate::circuit::{Circuit, Gate};
use crate::error::{DiagramError, Result};
use crate::lit::Lit;
use hashbrown::HashMap;
use itertools::Itertools;
use std::path::Path;

/// Reads the SDD described by `input` as a circuit whose output is its root.
pub fn parse_sdd(input: &str) -> Result<Circuit> {
    let mut gates = Vec::new();
    // gate of each sdd node
    let mut nodes: HashMap<usize, usize> = HashMap::new();
    let mut header = None;

    for mut line in lines(input) {
        let (id, gate) = match line.tag {
            "sdd" => {
                header = Some((line.number, line.next::<usize>("node count")?));
                line.end()?;
                continue;
            }
            "F" | "T" => {
                let id = new_id(&nodes, &mut line)?;
                let value = line.tag == "T";
                line.end()?;
                (id, Gate::Const(value))
            }
            "L" => {
                let id = new_id(&nodes, &mut line)?;
                let _vtree: usize = line.next("vtree node")?;
                let lit = line.next::<i32>("literal")?;
                let lit = Lit::from_signed(lit).ok_or_else(|| line.error("literal 0 is not allowed"))?;
                line.end()?;
                (id, Gate::Lit(lit))
            }
            "D" => {
                let id = new_id(&nodes, &mut line)?;
                let _vtree: usize = line.next("vtree node")?;
                let size: usize = line.next("number of elements")?;
                let expected = size
                    .checked_mul(2)
                    .ok_or_else(|| line.error(format!("invalid number of elements {size}")))?;
                let children = line.rest::<usize>("element")?;
                if children.len() != expected {
                    return Err(line.error(format!(
                        "expected {expected} element ids, found {}",
                        children.len()
                    )));
                }
                let child = |c: usize| {
                    nodes
                        .get(&c)
                        .copied()
                        .ok_or_else(|| line.error(format!("undefined sdd node {c}")))
                };
                let mut elements = Vec::new();
                for (prime, sub) in children.into_iter().tuples() {
                    gates.push(Gate::And(vec![child(prime)?, child(sub)?]));
                    elements.push(gates.len() - 1);
                }
                (id, Gate::Or(elements))
            }
            tag => return Err(line.error(format!("unknown sdd line \"{tag}\""))),
        };
        gates.push(gate);
        nodes.insert(id, gates.len() - 1);
    }
    if let Some((line, count)) = header {
        check_count(line, count, nodes.len(), "sdd nodes")?;
    }
    if gates.is_empty() {
        return Err(DiagramError::Empty);
    }
    let circuit = Circuit::new(gates, 0);
    tracing::debug!(
        "loaded sdd: {} nodes, {} gates, {} variables",
        nodes.len(),
        circuit.num_gates(),
        circuit.num_vars()
    );
    Ok(circuit)
}

fn new_id(nodes: &HashMap<usize, usize>, line: &mut Line) -> Result<usize> {
    let id = line.next("node id")?;
    if nodes.contains_key(&id) {
        return Err(line.error(format!("sdd node {id} defined twice")));
    }
    Ok(id)
}

pub fn read_sdd(path: impl AsRef<Path>) -> Result<Circuit> {
    let input = std::fs::read_to_string(path)?;
    parse_sdd(&input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Manager;

    fn lit(i: i32) -> Lit {
        Lit::from_signed(i).unwrap()
    }

    /// (x1 & x2) | (!x1 & x3)
    const MUX: &str = "\
c ids of sdd nodes start at 0
sdd 8
L 1 0 1
L 2 2 2
L 3 0 -1
L 4 2 3
D 0 1 2 1 2 3 4
";

    #[test]
    fn decision_nodes_are_disjunctions_of_elements() {
        let circuit = parse_sdd(&MUX.replace("sdd 8", "sdd 5")).unwrap();
        assert_eq!(circuit.num_vars(), 3);
        assert_eq!(circuit.gates().last(), Some(&Gate::Or(vec![4, 5])));

        let m = Manager::new(3).unwrap();
        let [a, b, c] = [1, 2, 3].map(|i| m.literal(lit(i)).unwrap());
        let expected = a.and(&b).or(&a.not().and(&c));
        assert_eq!(m.compile(&circuit).unwrap(), expected);
    }

    #[test]
    fn constants() {
        let m = Manager::new(4).unwrap();
        let t = parse_sdd("sdd 1\nT 0\n").unwrap();
        assert!(m.compile(&t).unwrap().is_true());
        let f = parse_sdd("sdd 3\nF 0\nL 1 0 4\nD 2 1 1 1 0\n").unwrap();
        assert!(m.compile(&f).unwrap().is_false());
    }

    #[test]
    fn malformed_files() {
        let line_of = |input: &str| match parse_sdd(input) {
            Err(DiagramError::Parse { line, .. }) => line,
            other => panic!("unexpected result {other:?}"),
        };
        assert_eq!(line_of(MUX), 2);
        assert_eq!(line_of("sdd 2\nL 0 0 1\nD 1 1 1 0 5\n"), 3);
        assert_eq!(line_of("sdd 2\nL 0 0 1\nD 1 1 2 0 0\n"), 3);
        assert_eq!(line_of("sdd 1\nL 0 0 0\n"), 2);
        assert_eq!(line_of("sdd 1\nX 0\n"), 2);
        assert_eq!(line_of("sdd 2\nT 0\nF 0\n"), 3);
        assert!(matches!(parse_sdd(""), Err(DiagramError::Empty)));
    }

    #[test]
    fn oversized_element_counts() {
        let line_of = |input: &str| match parse_sdd(input) {
            Err(DiagramError::Parse { line, .. }) => line,
            other => panic!("unexpected result {other:?}"),
        };
        assert_eq!(line_of("sdd 1\nD 0 0 9223372036854775808\n"), 2);
        assert_eq!(line_of(&format!("sdd 1\nD 0 0 {}\n", usize::MAX)), 2);
    }
}
