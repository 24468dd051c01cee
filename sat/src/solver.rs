use crate::all::{Assignments, BVal, BVar, DecLvl, Lit};
use crate::clause::{Clause, ClauseDb, ClauseId, ClausesParams};
use crate::heuristic::{Heur, HeurParams};
use crate::stats::Stats;
use env_param::EnvParam;
use std::time::Instant;

static VAR_DECAY: EnvParam<f64> = EnvParam::new("XDD_SAT_VAR_DECAY", "0.95");
static RESTART_BASE: EnvParam<u64> = EnvParam::new("XDD_SAT_RESTART_BASE", "100");
static LEARNT_BASE: EnvParam<usize> = EnvParam::new("XDD_SAT_LEARNT_BASE", "2000");

#[derive(Clone, Debug)]
pub struct SearchParams {
    /// Decay factor of the variable activities.
    pub var_decay: f64,
    /// Number of conflicts allowed before the first restart, scaled by the Luby sequence afterwards.
    pub restart_base: u64,
    /// Number of learnt clauses above which the database is reduced on the next restart.
    pub learnt_base: usize,
    /// Value given to a variable when the solver branches on it.
    pub default_polarity: bool,
}
impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            var_decay: VAR_DECAY.get(),
            restart_base: RESTART_BASE.get(),
            learnt_base: LEARNT_BASE.get(),
            default_polarity: false,
        }
    }
}

/// An incremental CDCL solver.
///
/// Clauses may be added between two calls to [`SatSolver::solve`]; the solver always returns to the
/// root level before giving control back, keeping the last model found (if any) on the side.
pub struct SatSolver {
    params: SearchParams,
    clauses: ClauseDb,
    /// `watches[l]` holds the clauses watching `!l`, to be visited when `l` becomes true.
    watches: Vec<Vec<ClauseId>>,
    assignment: Assignments,
    /// Index in the trail of the next literal to propagate.
    propagation_head: usize,
    heuristic: Heur,
    polarity: Vec<bool>,
    /// False once the clauses were proven unsatisfiable at the root level.
    consistent: bool,
    model: Vec<BVal>,
    /// Working buffer for conflict analysis.
    seen: Vec<bool>,
    pub stats: Stats,
}

impl Default for SatSolver {
    fn default() -> Self {
        Self::new(SearchParams::default())
    }
}

impl SatSolver {
    pub fn new(params: SearchParams) -> Self {
        let heuristic = Heur::new(HeurParams {
            var_decay: params.var_decay,
            ..Default::default()
        });
        SatSolver {
            params,
            clauses: ClauseDb::new(ClausesParams::default()),
            watches: vec![Vec::new(); 2],
            assignment: Assignments::new(),
            propagation_head: 0,
            heuristic,
            polarity: vec![false],
            consistent: true,
            model: Vec::new(),
            seen: vec![false],
            stats: Stats::default(),
        }
    }

    pub fn new_var(&mut self) -> BVar {
        let v = self.assignment.declare();
        self.watches.push(Vec::new());
        self.watches.push(Vec::new());
        self.polarity.push(self.params.default_polarity);
        self.seen.push(false);
        self.heuristic.record_new_var(v);
        v
    }

    pub fn num_vars(&self) -> usize {
        self.assignment.num_vars()
    }
    pub fn num_clauses(&self) -> usize {
        self.clauses.num_clauses()
    }

    /// Sets the value the solver tries first when branching on `var`.
    pub fn set_polarity(&mut self, var: BVar, value: bool) {
        self.polarity[var.index()] = value;
    }

    /// Adds a clause to the problem.
    /// Returns false if the problem is now known to be unsatisfiable.
    pub fn add_clause(&mut self, lits: &[Lit]) -> bool {
        debug_assert_eq!(self.assignment.decision_level(), DecLvl::ROOT);
        debug_assert!(lits.iter().all(|l| l.variable().index() <= self.num_vars()));
        if !self.consistent {
            return false;
        }
        let mut clause = Clause::new(lits, false);
        if !clause.simplify() {
            return true;
        }
        // root level assignments are permanent
        if clause.disjuncts.iter().any(|&l| self.assignment.value_of(l) == BVal::True) {
            return true;
        }
        clause.disjuncts.retain(|&l| self.assignment.value_of(l) != BVal::False);

        match clause.len() {
            0 => self.consistent = false,
            1 => {
                self.assignment.set(clause.disjuncts[0], None);
                if self.propagate().is_some() {
                    self.consistent = false;
                }
            }
            _ => {
                let id = self.clauses.add_clause(clause);
                self.attach(id);
            }
        }
        self.consistent
    }

    fn attach(&mut self, id: ClauseId) {
        let c = &self.clauses[id].disjuncts;
        debug_assert!(c.len() >= 2);
        self.watches[(!c[0]).index()].push(id);
        self.watches[(!c[1]).index()].push(id);
    }

    /// Value of the literal in the last model found, if any.
    pub fn value(&self, lit: Lit) -> Option<bool> {
        let v = self.model.get(lit.variable().index())?.to_bool()?;
        Some(if lit.is_positive() { v } else { !v })
    }

    /// Searches for a model of the current clauses.
    pub fn solve(&mut self) -> bool {
        let start = Instant::now();
        self.stats.solves += 1;
        let result = self.solve_impl();
        self.stats.solve_time += start.elapsed();
        tracing::trace!(
            "sat solve #{}: {} ({} vars, {} clauses)",
            self.stats.solves,
            if result { "SAT" } else { "UNSAT" },
            self.num_vars(),
            self.num_clauses()
        );
        result
    }

    fn solve_impl(&mut self) -> bool {
        self.model.clear();
        if !self.consistent {
            return false;
        }
        if self.propagate().is_some() {
            self.consistent = false;
            return false;
        }
        let mut restarts = 0;
        loop {
            let budget = luby(restarts) * self.params.restart_base;
            match self.search(budget) {
                Some(true) => {
                    self.model = (0..=self.num_vars())
                        .map(|i| {
                            if i == 0 {
                                BVal::Undef
                            } else {
                                self.assignment.get(BVar::from_bits(i as u32))
                            }
                        })
                        .collect();
                    self.backtrack_to(DecLvl::ROOT);
                    return true;
                }
                Some(false) => {
                    self.backtrack_to(DecLvl::ROOT);
                    self.consistent = false;
                    return false;
                }
                None => {
                    restarts += 1;
                    self.stats.restarts += 1;
                    self.backtrack_to(DecLvl::ROOT);
                    if self.clauses.num_learnt() >= self.params.learnt_base {
                        self.reduce_db();
                    }
                }
            }
        }
    }

    /// Returns `Some(true)` if a model was found, `Some(false)` if the problem is unsatisfiable and
    /// `None` if the conflict budget was exhausted.
    fn search(&mut self, budget: u64) -> Option<bool> {
        let mut conflicts = 0;
        loop {
            if let Some(conflict) = self.propagate() {
                self.stats.conflicts += 1;
                conflicts += 1;
                if self.assignment.decision_level() == DecLvl::ROOT {
                    return Some(false);
                }
                let (learnt, backtrack_level) = self.analyze(conflict);
                self.backtrack_to(backtrack_level);
                self.stats.learnt_literals += learnt.len() as u64;
                if learnt.len() == 1 {
                    self.assignment.set(learnt[0], None);
                } else {
                    let asserted = learnt[0];
                    let id = self.clauses.add_clause(Clause::new(&learnt, true));
                    self.attach(id);
                    self.clauses.bump_activity(id);
                    self.assignment.set(asserted, Some(id));
                }
                self.heuristic.decay_activities();
                self.clauses.decay_activities();
            } else {
                if conflicts >= budget {
                    return None;
                }
                match self.pick_branch_lit() {
                    Some(decision) => {
                        self.stats.decisions += 1;
                        self.assignment.new_level();
                        self.assignment.set(decision, None);
                    }
                    None => return Some(true),
                }
            }
        }
    }

    fn pick_branch_lit(&mut self) -> Option<Lit> {
        while let Some(v) = self.heuristic.pop_next_var() {
            if self.assignment.get(v) == BVal::Undef {
                return Some(v.lit(self.polarity[v.index()]));
            }
        }
        None
    }

    /// Unit propagation over the watched literals.
    /// Returns the violated clause, if any.
    fn propagate(&mut self) -> Option<ClauseId> {
        while self.propagation_head < self.assignment.trail().len() {
            let p = self.assignment.trail()[self.propagation_head];
            self.propagation_head += 1;
            self.stats.propagations += 1;
            let false_lit = !p;

            // take ownership of the watch list, new watches are never placed on `p` while visiting it
            let mut watchers = std::mem::take(&mut self.watches[p.index()]);
            let mut conflict = None;
            let mut i = 0;
            while i < watchers.len() {
                let id = watchers[i];
                let clause = &mut self.clauses[id].disjuncts;
                if clause[0] == false_lit {
                    clause.swap(0, 1);
                }
                debug_assert_eq!(clause[1], false_lit);

                let first = clause[0];
                if self.assignment.value_of(first) == BVal::True {
                    i += 1;
                    continue;
                }
                // look for a replacement of the falsified watch
                let replacement =
                    (2..clause.len()).find(|&k| self.assignment.value_of(clause[k]) != BVal::False);
                if let Some(k) = replacement {
                    clause.swap(1, k);
                    let new_watch = clause[1];
                    self.watches[(!new_watch).index()].push(id);
                    watchers.swap_remove(i);
                    continue;
                }
                // clause is unit or violated, the watch stays in place
                i += 1;
                match self.assignment.value_of(first) {
                    BVal::False => {
                        conflict = Some(id);
                        break;
                    }
                    _ => self.assignment.set(first, Some(id)),
                }
            }
            self.watches[p.index()] = watchers;

            if conflict.is_some() {
                self.propagation_head = self.assignment.trail().len();
                return conflict;
            }
        }
        None
    }

    /// First-UIP conflict analysis.
    /// Returns the learnt clause, whose first literal is asserting, and the level to backtrack to.
    fn analyze(&mut self, conflict: ClauseId) -> (Vec<Lit>, DecLvl) {
        let current_level = self.assignment.decision_level();
        // placeholder for the asserting literal
        let mut learnt = vec![Lit::from_signed_int(1)];
        let mut pending = 0;
        let mut reason = Some(conflict);
        let mut implied: Option<Lit> = None;
        let mut index = self.assignment.trail().len();

        loop {
            let id = reason.expect("a propagated literal always has a reason");
            if self.clauses[id].learnt {
                self.clauses.bump_activity(id);
            }
            // the implied literal is always the first of its reason
            let skip = if implied.is_some() { 1 } else { 0 };
            for k in skip..self.clauses[id].len() {
                let q = self.clauses[id].disjuncts[k];
                let v = q.variable();
                if !self.seen[v.index()] && self.assignment.level(v) > DecLvl::ROOT {
                    self.seen[v.index()] = true;
                    self.heuristic.var_bump_activity(v);
                    if self.assignment.level(v) == current_level {
                        pending += 1;
                    } else {
                        learnt.push(q);
                    }
                }
            }
            // next literal of the current level to explain
            loop {
                index -= 1;
                if self.seen[self.assignment.trail()[index].variable().index()] {
                    break;
                }
            }
            let p = self.assignment.trail()[index];
            self.seen[p.variable().index()] = false;
            implied = Some(p);
            reason = self.assignment.reason(p.variable());
            pending -= 1;
            if pending == 0 {
                learnt[0] = !p;
                break;
            }
        }
        for l in &learnt[1..] {
            self.seen[l.variable().index()] = false;
        }

        // the literal with the highest level (below the current one) becomes the second watch
        let backtrack_level = if learnt.len() == 1 {
            DecLvl::ROOT
        } else {
            let level = |l: Lit| self.assignment.level(l.variable());
            let mut max_i = 1;
            for i in 2..learnt.len() {
                if level(learnt[i]) > level(learnt[max_i]) {
                    max_i = i;
                }
            }
            learnt.swap(1, max_i);
            self.assignment.level(learnt[1].variable())
        };
        (learnt, backtrack_level)
    }

    fn backtrack_to(&mut self, lvl: DecLvl) {
        let heuristic = &mut self.heuristic;
        self.assignment.backtrack_to(lvl, |v| heuristic.var_insert(v));
        self.propagation_head = self.propagation_head.min(self.assignment.trail().len());
    }

    /// Removes half of the learnt clauses (the least active ones) and simplifies the database
    /// with respect to the root level assignments. Must be called at the root level, after propagation.
    fn reduce_db(&mut self) {
        debug_assert_eq!(self.assignment.decision_level(), DecLvl::ROOT);
        self.stats.reductions += 1;
        let to_remove = self.clauses.least_active_learnt(self.clauses.num_learnt() / 2);
        let mut removed = vec![false; self.clauses.num_clauses()];
        for id in to_remove {
            removed[id.index()] = true;
        }

        let assignment = &self.assignment;
        let mut position = 0;
        self.clauses.retain(|clause| {
            let keep = !removed[position];
            position += 1;
            if !keep || clause.disjuncts.iter().any(|&l| assignment.value_of(l) == BVal::True) {
                return false;
            }
            clause.disjuncts.retain(|&l| assignment.value_of(l) != BVal::False);
            debug_assert!(clause.len() >= 2, "unit clauses should have been propagated at the root");
            true
        });
        // clause ids changed: rebuild the watches
        self.assignment.clear_reasons();
        self.watches.iter_mut().for_each(|w| w.clear());
        let ids = self.clauses.all_clauses().collect::<Vec<_>>();
        for id in ids {
            self.attach(id);
        }
        tracing::trace!("sat db reduced to {} clauses", self.clauses.num_clauses());
    }
}

/// Luby sequence 1, 1, 2, 1, 1, 2, 4, 1, ... used to schedule restarts.
fn luby(i: u64) -> u64 {
    let mut size = 1;
    let mut seq = 0;
    while size < i + 1 {
        seq += 1;
        size = 2 * size + 1;
    }
    let mut x = i;
    while size - 1 != x {
        size = (size - 1) >> 1;
        seq -= 1;
        x %= size;
    }
    1 << seq
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn lits(ls: &[i32]) -> Vec<Lit> {
        ls.iter().map(|&l| Lit::from_signed_int(l)).collect()
    }

    fn with_vars(n: usize) -> SatSolver {
        let mut s = SatSolver::default();
        for _ in 0..n {
            s.new_var();
        }
        s
    }

    fn satisfies(s: &SatSolver, clauses: &[Vec<i32>]) -> bool {
        clauses
            .iter()
            .all(|c| c.iter().any(|&l| s.value(Lit::from_signed_int(l)) == Some(true)))
    }

    fn brute_force_sat(num_vars: usize, clauses: &[Vec<i32>]) -> bool {
        (0..(1u32 << num_vars)).any(|m| {
            clauses.iter().all(|c| {
                c.iter().any(|&l| {
                    let v = (m >> (l.unsigned_abs() - 1)) & 1 == 1;
                    if l > 0 {
                        v
                    } else {
                        !v
                    }
                })
            })
        })
    }

    #[test]
    fn luby_sequence() {
        let seq = (0..15).map(luby).collect::<Vec<_>>();
        assert_eq!(seq, vec![1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8]);
    }

    #[test]
    fn first_model_follows_default_polarity() {
        let mut s = with_vars(3);
        assert!(s.solve());
        for v in 1..=3 {
            assert_eq!(s.value(Lit::from_signed_int(v)), Some(false));
        }
        s.set_polarity(BVar::from_bits(2), true);
        assert!(s.solve());
        assert_eq!(s.value(Lit::from_signed_int(2)), Some(true));
    }

    #[test]
    fn incremental_blocking_enumerates_all_models() {
        // x1 v x2, enumerate by blocking each model
        let mut s = with_vars(2);
        assert!(s.add_clause(&lits(&[1, 2])));
        let mut models = 0;
        while s.solve() {
            models += 1;
            let block = (1..=2)
                .map(|v| {
                    let l = Lit::from_signed_int(v);
                    if s.value(l) == Some(true) {
                        !l
                    } else {
                        l
                    }
                })
                .collect::<Vec<_>>();
            s.add_clause(&block);
            assert!(models <= 3);
        }
        assert_eq!(models, 3);
        assert!(!s.solve());
    }

    #[test]
    fn empty_clause_is_unsat() {
        let mut s = with_vars(1);
        assert!(!s.add_clause(&[]));
        assert!(!s.solve());
        assert_eq!(s.value(Lit::from_signed_int(1)), None);
    }

    #[test]
    fn contradicting_units() {
        let mut s = with_vars(2);
        assert!(s.add_clause(&lits(&[1])));
        assert!(s.add_clause(&lits(&[-1, 2])));
        assert!(s.solve());
        assert_eq!(s.value(Lit::from_signed_int(2)), Some(true));
        assert!(!s.add_clause(&lits(&[-2])));
        assert!(!s.solve());
    }

    #[test]
    fn pigeon_hole_is_unsat() {
        // 4 pigeons, 3 holes: var p*3 + h + 1
        let mut s = with_vars(12);
        let var = |p: i32, h: i32| p * 3 + h + 1;
        for p in 0..4 {
            s.add_clause(&lits(&[var(p, 0), var(p, 1), var(p, 2)]));
        }
        for h in 0..3 {
            for p1 in 0..4 {
                for p2 in (p1 + 1)..4 {
                    s.add_clause(&lits(&[-var(p1, h), -var(p2, h)]));
                }
            }
        }
        assert!(!s.solve());
        assert!(s.stats.conflicts > 0);
    }

    #[test]
    fn random_3sat_agrees_with_brute_force() {
        let mut rng = SmallRng::seed_from_u64(0xD1CE);
        for _ in 0..200 {
            let num_vars = rng.random_range(3..=8);
            let num_clauses = rng.random_range(1..=(num_vars * 5));
            let clauses = (0..num_clauses)
                .map(|_| {
                    (0..3)
                        .map(|_| {
                            let v = rng.random_range(1..=num_vars as i32);
                            if rng.random_bool(0.5) {
                                v
                            } else {
                                -v
                            }
                        })
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>();

            let mut s = with_vars(num_vars);
            for c in &clauses {
                s.add_clause(&lits(c));
            }
            let expected = brute_force_sat(num_vars, &clauses);
            assert_eq!(s.solve(), expected, "{clauses:?}");
            if expected {
                assert!(satisfies(&s, &clauses), "{clauses:?}");
            }
        }
    }

    #[test]
    fn reduction_preserves_satisfiability() {
        let params = SearchParams {
            restart_base: 1,
            learnt_base: 1,
            ..Default::default()
        };
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..50 {
            let num_vars = 10;
            let clauses = (0..42)
                .map(|_| {
                    (0..3)
                        .map(|_| {
                            let v = rng.random_range(1..=num_vars as i32);
                            if rng.random_bool(0.5) {
                                v
                            } else {
                                -v
                            }
                        })
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>();
            let mut s = SatSolver::new(params.clone());
            for _ in 0..num_vars {
                s.new_var();
            }
            for c in &clauses {
                s.add_clause(&lits(c));
            }
            let expected = brute_force_sat(num_vars, &clauses);
            assert_eq!(s.solve(), expected);
            if expected {
                assert!(satisfies(&s, &clauses));
            }
        }
    }
}
