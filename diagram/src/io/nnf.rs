//! Decomposable negation normal form circuits in the c2d format.
//!
//! ```text
//! nnf <number of nodes> <number of edges> <number of variables>
//! L <literal>
//! A <number of children> <child>*
//! O <decision variable or 0> <number of children> <child>*
//! ```
//! Nodes are numbered from 0 in order of appearance, children appear before their parents and the
//! last node is the root. `A 0` is true and `O 0 0` is false.

use super::{check_count, lines, Line};
use crate::circuit::{Circuit, Gate};
use crate::error::{DiagramError, Result};
use crate::lit::{Lit, Var};
use std::path::Path;

/// Reads the circuit described by `input`.
pub fn parse_nnf(input: &str) -> Result<Circuit> {
    let mut gates = Vec::new();
    let mut header = None;

    for mut line in lines(input) {
        let gate = match line.tag {
            "nnf" => {
                let num_nodes: usize = line.next("node count")?;
                let num_edges: usize = line.next("edge count")?;
                let num_vars: Var = line.next("variable count")?;
                header = Some((line.number, num_nodes, num_edges, num_vars));
                line.end()?;
                continue;
            }
            "L" => {
                let lit = line.next::<i32>("literal")?;
                let lit = Lit::from_signed(lit).ok_or_else(|| line.error("literal 0 is not allowed"))?;
                if let Some((_, _, _, num_vars)) = header {
                    if lit.var() > num_vars {
                        return Err(line.error(format!(
                            "variable {} exceeds the declared {num_vars}",
                            lit.var()
                        )));
                    }
                }
                line.end()?;
                Gate::Lit(lit)
            }
            "A" => Gate::And(children(gates.len(), &mut line)?),
            "O" => {
                let _decision: Var = line.next("decision variable")?;
                Gate::Or(children(gates.len(), &mut line)?)
            }
            tag => return Err(line.error(format!("unknown nnf line \"{tag}\""))),
        };
        gates.push(gate);
    }
    if gates.is_empty() {
        return Err(DiagramError::Empty);
    }
    let mut declared_vars = 0;
    if let Some((line, num_nodes, _, num_vars)) = header {
        check_count(line, num_nodes, gates.len(), "nnf nodes")?;
        declared_vars = num_vars;
    }
    let circuit = Circuit::new(gates, declared_vars);
    tracing::debug!(
        "loaded nnf: {} nodes, {} variables",
        circuit.num_gates(),
        circuit.num_vars()
    );
    Ok(circuit)
}

/// Children of a gate, which must all be among the `num_previous` gates already read.
fn children(num_previous: usize, line: &mut Line) -> Result<Vec<usize>> {
    let count: usize = line.next("number of children")?;
    let ids = line.rest::<usize>("child")?;
    if ids.len() != count {
        return Err(line.error(format!("expected {count} children, found {}", ids.len())));
    }
    if let Some(i) = ids.iter().find(|&&i| i >= num_previous) {
        return Err(line.error(format!("child {i} is not a previous node")));
    }
    Ok(ids)
}

pub fn read_nnf(path: impl AsRef<Path>) -> Result<Circuit> {
    let input = std::fs::read_to_string(path)?;
    parse_nnf(&input)
}
