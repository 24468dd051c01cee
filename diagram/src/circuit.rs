use crate::lit::{Lit, Var};

/// A gate of a [`Circuit`]. Children are indices of previous gates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Gate {
    Const(bool),
    Lit(Lit),
    And(Vec<usize>),
    Or(Vec<usize>),
}

/// Negation normal form circuit, as read from a classifier file.
///
/// Gates are stored in topological order: the children of a gate always come before it, and the
/// last gate is the output. A circuit has at least one gate.
#[derive(Clone, Debug)]
pub struct Circuit {
    gates: Vec<Gate>,
    num_vars: Var,
}

impl Circuit {
    pub(crate) fn new(gates: Vec<Gate>, declared_vars: Var) -> Circuit {
        debug_assert!(!gates.is_empty());
        let used = gates
            .iter()
            .filter_map(|g| match g {
                Gate::Lit(l) => Some(l.var()),
                _ => None,
            })
            .max()
            .unwrap_or(0);
        Circuit {
            gates,
            num_vars: declared_vars.max(used),
        }
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    /// Largest variable of the circuit, or the number of variables its file declares if larger.
    pub fn num_vars(&self) -> Var {
        self.num_vars
    }
}
