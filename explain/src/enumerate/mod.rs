//! Enumeration of all AXps and CXps of an instance with the MARCO algorithm.
//!
//! Seeds are subsets of universal features proposed by a SAT solver (the map solver).
//! A seed from which the other prediction is reachable is shrunk into a CXp, and every seed
//! releasing all of its features is blocked. Otherwise the fixed features of the seed entail the
//! prediction: they are shrunk into an AXp, and every seed fixing all of its features is blocked.
//! The enumeration ends when no seed remains.

mod mapsolver;

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use env_param::EnvParam;
use tracing::Level;

use crate::error::Result;
use crate::verify::{Verdict, Verifier};
use crate::{Assignment, Axp, Cxp, Explainer, Oracle, Xp};
use mapsolver::MapSolver;
pub use mapsolver::{MapSolverMode, MAP_SOLVER_MODE};

/// When true, every explanation found is checked to be new and valid, even in release builds.
/// Such checks are always performed in debug builds.
pub static CHECK_ENUMERATION: EnvParam<bool> = EnvParam::new("XDD_CHECK_ENUMERATION", "false");

/// Both families of explanations of an instance.
#[derive(Clone, Debug, Default)]
pub struct Enumeration {
    /// AXps, in the order they were found.
    pub axps: Vec<Axp>,
    /// CXps, in the order they were found.
    pub cxps: Vec<Cxp>,
    pub run_time: Duration,
}

pub struct Marco<'a, O: Oracle> {
    explainer: Explainer<'a, O>,
    assignment: &'a Assignment,
    /// Prediction of the classifier on the instance.
    pred: bool,
    map_solver: MapSolver,
    num_axps: usize,
    num_cxps: usize,

    check: bool,
    found_axps: BTreeSet<Axp>,
    found_cxps: BTreeSet<Cxp>,
}

impl<O: Oracle> Iterator for Marco<'_, O> {
    type Item = Xp;

    fn next(&mut self) -> Option<Self::Item> {
        self._next()
    }
}

impl<'a, O: Oracle> Marco<'a, O> {
    /// Enumerator biased as configured by [`MAP_SOLVER_MODE`].
    pub fn new(explainer: Explainer<'a, O>, assignment: &'a Assignment) -> Result<Self> {
        Self::with_mode(explainer, assignment, MAP_SOLVER_MODE.get())
    }

    pub fn with_mode(
        explainer: Explainer<'a, O>,
        assignment: &'a Assignment,
        mode: MapSolverMode,
    ) -> Result<Self> {
        let pred = explainer.predict(assignment)?;
        Ok(Marco {
            explainer,
            assignment,
            pred,
            map_solver: MapSolver::new(assignment.num_features(), mode),
            num_axps: 0,
            num_cxps: 0,
            check: cfg!(debug_assertions) || CHECK_ENUMERATION.get(),
            found_axps: BTreeSet::new(),
            found_cxps: BTreeSet::new(),
        })
    }

    pub fn prediction(&self) -> bool {
        self.pred
    }

    /// Enumerates all remaining explanations, calling the given functions as they are found.
    pub fn run(&mut self, mut on_axp: impl FnMut(&Axp), mut on_cxp: impl FnMut(&Cxp)) -> Enumeration {
        let _span = tracing::span!(Level::TRACE, "enumerate").entered();
        let start = Instant::now();
        let mut res = Enumeration::default();
        while let Some(xp) = self._next() {
            match xp {
                Xp::Axp(axp) => {
                    on_axp(&axp);
                    res.axps.push(axp);
                }
                Xp::Cxp(cxp) => {
                    on_cxp(&cxp);
                    res.cxps.push(cxp);
                }
            }
        }
        res.run_time = start.elapsed();
        tracing::info!(
            "#AXp: {}, #CXp: {} ({:.4}s)",
            res.axps.len(),
            res.cxps.len(),
            res.run_time.as_secs_f64()
        );
        res
    }

    fn _next(&mut self) -> Option<Xp> {
        let Some(universal) = self.map_solver.find_unexplored_seed() else {
            tracing::debug!(
                "no seed left after {} AXps and {} CXps\n{}",
                self.num_axps,
                self.num_cxps,
                self.map_solver.stats()
            );
            return None;
        };
        // the other prediction is reachable from the seed
        let fixed = universal.complement();
        if !self.explainer.entails(self.assignment, &fixed, self.pred) {
            let cxp = self.explainer.shrink_universal(self.assignment, &universal, self.pred);
            self.map_solver.block_cxp(&cxp);
            self.num_cxps += 1;
            self.check_cxp_is_new_and_correct(&cxp);
            Some(Xp::Cxp(cxp))
        } else {
            let axp = self.explainer.shrink_fixed(self.assignment, fixed, self.pred);
            self.map_solver.block_axp(&axp);
            self.num_axps += 1;
            self.check_axp_is_new_and_correct(&axp);
            Some(Xp::Axp(axp))
        }
    }

    fn check_axp_is_new_and_correct(&mut self, axp: &Axp) {
        if !self.check {
            return;
        }
        assert!(self.found_axps.insert(axp.clone()), "AXp {axp:?} found twice");
        let verdict = Verifier::new(self.explainer.oracle()).check_axp(self.assignment, axp);
        assert!(matches!(verdict, Ok(Verdict::Valid)), "invalid AXp {axp:?}: {verdict:?}");
    }

    fn check_cxp_is_new_and_correct(&mut self, cxp: &Cxp) {
        if !self.check {
            return;
        }
        assert!(self.found_cxps.insert(cxp.clone()), "CXp {cxp:?} found twice");
        let verdict = Verifier::new(self.explainer.oracle()).check_cxp(self.assignment, cxp);
        assert!(matches!(verdict, Ok(Verdict::Valid)), "invalid CXp {cxp:?}: {verdict:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::check_family_duality;
    use xdd_diagram::{Lit, Manager, Session};

    fn all_true(n: u32) -> Assignment {
        Assignment::from_literals((1..=n).map(|v| [Lit::new(v, true)])).unwrap()
    }

    fn sorted(mut family: Vec<BTreeSet<usize>>) -> Vec<BTreeSet<usize>> {
        family.sort();
        family
    }

    #[test]
    fn conjunction_of_a_disjunction() {
        // f = a & (b | c)
        let m = Manager::new(3).unwrap();
        let [a, b, c] = [1, 2, 3].map(|v| m.literal(Lit::new(v, true)).unwrap());
        let session = Session::new(&m, a.and(&b.or(&c)));
        let inst = all_true(3);

        for mode in [MapSolverMode::LowPreferredValues, MapSolverMode::HighPreferredValues] {
            let mut marco = Marco::with_mode(Explainer::new(&session), &inst, mode).unwrap();
            assert!(marco.prediction());
            let (mut seen_axps, mut seen_cxps) = (0, 0);
            let res = marco.run(|_| seen_axps += 1, |_| seen_cxps += 1);
            assert_eq!((seen_axps, seen_cxps), (2, 2));
            assert_eq!(sorted(res.axps.clone()), vec![Axp::from([0, 1]), Axp::from([0, 2])]);
            assert_eq!(sorted(res.cxps.clone()), vec![Cxp::from([0]), Cxp::from([1, 2])]);
            assert!(check_family_duality(&res.axps, &res.cxps).is_valid());
            // exhausted
            assert_eq!(marco.next(), None);
        }
    }

    #[test]
    fn constant_classifier() {
        let m = Manager::new(2).unwrap();
        let session = Session::new(&m, m.constant(true));
        let inst = all_true(2);
        let res = Marco::new(Explainer::new(&session), &inst).unwrap().run(|_| {}, |_| {});
        assert_eq!(res.axps, vec![Axp::new()]);
        assert!(res.cxps.is_empty());
        assert!(check_family_duality(&res.axps, &res.cxps).is_valid());
    }

    #[test]
    fn iterating_over_explanations() {
        // f = x1 | x2 with both true: each feature alone is an AXp, both must be released
        let m = Manager::new(2).unwrap();
        let [a, b] = [1, 2].map(|v| m.literal(Lit::new(v, true)).unwrap());
        let session = Session::new(&m, a.or(&b));
        let inst = all_true(2);
        let marco = Marco::new(Explainer::new(&session), &inst).unwrap();
        let xps: Vec<Xp> = marco.collect();
        assert_eq!(xps.len(), 3);
        assert!(xps.contains(&Xp::Axp([0].into())));
        assert!(xps.contains(&Xp::Axp([1].into())));
        assert!(xps.contains(&Xp::Cxp([0, 1].into())));
    }
}
