//! Binary decision diagrams over the variables of a classifier.
//!
//! Diagrams are [`Bdd`] values of `biodivine_lib_bdd`: reduced, ordered and self-contained, so
//! that equivalent functions over the same [`Manager`] compare equal and conditioning never
//! invalidates a previously obtained diagram. The manager only fixes the set of variables and
//! their order, and translates the signed literals of the file formats.

use crate::circuit::{Circuit, Gate};
use crate::error::{DiagramError, Result};
use crate::lit::{Lit, Var};
use biodivine_lib_bdd::{Bdd, BddVariable, BddVariableSet, BddVariableSetBuilder};

pub struct Manager {
    vars: BddVariableSet,
    /// BDD variable of each variable of the classifier, indexed by [`Var`].
    bdd_vars: Vec<Option<BddVariable>>,
}

impl Manager {
    /// A manager for the variables `1..=num_vars`, ordered by increasing index.
    pub fn new(num_vars: Var) -> Result<Manager> {
        Self::with_order(&(1..=num_vars).collect::<Vec<_>>())
    }

    /// A manager for the variables of `order`, the first one being the top-most.
    pub fn with_order(order: &[Var]) -> Result<Manager> {
        if order.len() > u16::MAX as usize {
            return Err(DiagramError::TooManyVariables(order.len()));
        }
        let mut builder = BddVariableSetBuilder::new();
        let mut bdd_vars = Vec::new();
        for &v in order {
            let index = v as usize;
            if bdd_vars.len() <= index {
                bdd_vars.resize(index + 1, None);
            }
            if bdd_vars[index].is_some() {
                return Err(DiagramError::DuplicateVariable(v));
            }
            bdd_vars[index] = Some(builder.make_variable(&format!("x{v}")));
        }
        Ok(Manager {
            vars: builder.build(),
            bdd_vars,
        })
    }

    pub fn num_vars(&self) -> usize {
        self.vars.num_vars() as usize
    }

    fn bdd_var(&self, var: Var) -> Option<BddVariable> {
        self.bdd_vars.get(var as usize).copied().flatten()
    }

    pub fn constant(&self, value: bool) -> Bdd {
        if value {
            self.vars.mk_true()
        } else {
            self.vars.mk_false()
        }
    }

    pub fn literal(&self, lit: Lit) -> Result<Bdd> {
        let var = self
            .bdd_var(lit.var())
            .ok_or(DiagramError::UnknownVariable(lit.var()))?;
        Ok(self.vars.mk_literal(var, lit.is_positive()))
    }

    /// Restriction of `f` to the assignments where `lit` holds. Conditioning on a variable
    /// unknown to the manager leaves `f` unchanged, as `f` cannot depend on it.
    pub fn condition(&self, f: &Bdd, lit: Lit) -> Bdd {
        match self.bdd_var(lit.var()) {
            Some(var) => f.var_restrict(var, lit.is_positive()),
            None => f.clone(),
        }
    }

    /// Builds the diagram of the output of `circuit`.
    pub fn compile(&self, circuit: &Circuit) -> Result<Bdd> {
        let mut done: Vec<Bdd> = Vec::with_capacity(circuit.num_gates());
        for gate in circuit.gates() {
            let f = match gate {
                Gate::Const(value) => self.constant(*value),
                Gate::Lit(lit) => self.literal(*lit)?,
                Gate::And(children) => children
                    .iter()
                    .fold(self.vars.mk_true(), |acc, &c| acc.and(&done[c])),
                Gate::Or(children) => children
                    .iter()
                    .fold(self.vars.mk_false(), |acc, &c| acc.or(&done[c])),
            };
            done.push(f);
        }
        done.pop().ok_or(DiagramError::Empty)
    }
}
