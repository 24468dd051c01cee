use crate::all::Lit;
use std::fmt::{Display, Error, Formatter};
use std::ops::{Index, IndexMut};

pub struct ClausesParams {
    cla_inc: f64,
    cla_decay: f64,
}
impl Default for ClausesParams {
    fn default() -> Self {
        ClausesParams {
            cla_inc: 1_f64,
            cla_decay: 0.999_f64,
        }
    }
}

pub struct Clause {
    pub activity: f64,
    pub learnt: bool,
    pub disjuncts: Vec<Lit>,
}
impl Clause {
    pub fn new(lits: &[Lit], learnt: bool) -> Self {
        Clause {
            activity: 0_f64,
            learnt,
            disjuncts: Vec::from(lits),
        }
    }

    /// Sorts and deduplicates the literals.
    /// Returns false if the clause contains a literal and its negation (trivially satisfied).
    pub fn simplify(&mut self) -> bool {
        self.disjuncts.sort();
        self.disjuncts.dedup();

        // a literal and its negation are adjacent in the sorted vector
        !self.disjuncts.windows(2).any(|w| w[0].variable() == w[1].variable())
    }

    pub fn len(&self) -> usize {
        self.disjuncts.len()
    }
    pub fn is_empty(&self) -> bool {
        self.disjuncts.is_empty()
    }
}
impl Display for Clause {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "[")?;
        for (i, l) in self.disjuncts.iter().enumerate() {
            if i != 0 {
                write!(f, " ")?;
            }
            write!(f, "{l}")?;
        }
        write!(f, "]")
    }
}

#[derive(Eq, Hash, PartialOrd, Ord, PartialEq, Debug, Clone, Copy)]
pub struct ClauseId(u32);

impl ClauseId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for ClauseId {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "{}", self.0)
    }
}

pub struct ClauseDb {
    params: ClausesParams,
    num_learnt: usize,
    clauses: Vec<Clause>,
}

impl ClauseDb {
    pub fn new(params: ClausesParams) -> ClauseDb {
        ClauseDb {
            params,
            num_learnt: 0,
            clauses: Vec::new(),
        }
    }

    pub fn add_clause(&mut self, cl: Clause) -> ClauseId {
        if cl.learnt {
            self.num_learnt += 1;
        }
        self.clauses.push(cl);
        ClauseId((self.clauses.len() - 1) as u32)
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }
    pub fn num_learnt(&self) -> usize {
        self.num_learnt
    }

    pub fn all_clauses(&self) -> impl Iterator<Item = ClauseId> + '_ {
        (0..self.clauses.len()).map(|i| ClauseId(i as u32))
    }

    pub fn bump_activity(&mut self, cl: ClauseId) {
        self[cl].activity += self.params.cla_inc;
        if self[cl].activity > 1e100_f64 {
            self.rescale_activities()
        }
    }

    pub fn decay_activities(&mut self) {
        self.params.cla_inc /= self.params.cla_decay;
    }

    fn rescale_activities(&mut self) {
        self.clauses.iter_mut().for_each(|c| c.activity *= 1e-100_f64);
        self.params.cla_inc *= 1e-100_f64;
    }

    /// Rebuilds the database, keeping only the clauses accepted by `keep` (possibly after modifying them).
    /// Clause identifiers are NOT stable across this operation, so the caller must drop any
    /// reference to them.
    pub fn retain(&mut self, mut keep: impl FnMut(&mut Clause) -> bool) {
        self.clauses.retain_mut(|c| keep(c));
        self.num_learnt = self.clauses.iter().filter(|c| c.learnt).count();
    }

    /// Returns the `n` learnt clauses with the lowest activity, ignoring binary clauses.
    pub fn least_active_learnt(&self, n: usize) -> Vec<ClauseId> {
        let mut learnt = self
            .all_clauses()
            .filter(|&id| self[id].learnt && self[id].len() > 2)
            .collect::<Vec<_>>();
        learnt.sort_by(|&a, &b| self[a].activity.total_cmp(&self[b].activity));
        learnt.truncate(n);
        learnt
    }
}

impl Index<ClauseId> for ClauseDb {
    type Output = Clause;
    fn index(&self, k: ClauseId) -> &Self::Output {
        &self.clauses[k.index()]
    }
}
impl IndexMut<ClauseId> for ClauseDb {
    fn index_mut(&mut self, k: ClauseId) -> &mut Self::Output {
        &mut self.clauses[k.index()]
    }
}
