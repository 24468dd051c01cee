//! Checks shared by the integration tests.

#![allow(dead_code)]

use itertools::Itertools;
use std::collections::BTreeSet;
use xdd_explain::verify::check_family_duality;
use xdd_explain::{Assignment, Axp, Cxp, Explainer, MapSolverMode, Marco, Mask, Oracle, Verifier};

fn minimal(set: &[usize], weak: impl Fn(&[usize]) -> bool) -> bool {
    weak(set)
        && set
            .iter()
            .all(|&i| !weak(&set.iter().copied().filter(|&j| j != i).collect_vec()))
}

/// All AXps and CXps of the instance, by going through every subset of features.
pub fn brute_force<O: Oracle>(
    explainer: Explainer<O>,
    assignment: &Assignment,
) -> (BTreeSet<Axp>, BTreeSet<Cxp>) {
    let n = assignment.num_features();
    let pred = explainer.predict(assignment).unwrap();
    let other_reachable = |universal: Mask| explainer.reachable(assignment, &universal, !pred).unwrap();
    let weak_axp = |s: &[usize]| !other_reachable(Mask::from_features(n, s.iter().copied()).complement());
    let weak_cxp = |s: &[usize]| other_reachable(Mask::from_features(n, s.iter().copied()));

    let mut axps = BTreeSet::new();
    let mut cxps = BTreeSet::new();
    for subset in (0..n).powerset() {
        if minimal(&subset, &weak_axp) {
            axps.insert(subset.iter().copied().collect());
        }
        if minimal(&subset, &weak_cxp) {
            cxps.insert(subset.iter().copied().collect());
        }
    }
    (axps, cxps)
}

/// Enumerates the explanations of the instance in both modes and checks them against the
/// exhaustive search, the verifier and the single explanation searches.
pub fn check_instance<O: Oracle>(oracle: &O, assignment: &Assignment) {
    let explainer = Explainer::new(oracle);
    let verifier = Verifier::new(oracle);
    let (expected_axps, expected_cxps) = brute_force(explainer, assignment);

    for mode in [MapSolverMode::LowPreferredValues, MapSolverMode::HighPreferredValues] {
        let res = Marco::with_mode(explainer, assignment, mode).unwrap().run(|_| {}, |_| {});
        assert!(res.axps.iter().all_unique());
        assert!(res.cxps.iter().all_unique());
        assert_eq!(res.axps.iter().cloned().collect::<BTreeSet<_>>(), expected_axps);
        assert_eq!(res.cxps.iter().cloned().collect::<BTreeSet<_>>(), expected_cxps);
        assert!(check_family_duality(&res.axps, &res.cxps).is_valid());
    }

    for axp in &expected_axps {
        assert!(verifier.check_axp(assignment, axp).unwrap().is_valid());
    }
    for cxp in &expected_cxps {
        assert!(verifier.check_cxp(assignment, cxp).unwrap().is_valid());
    }
    assert!(expected_axps.contains(&explainer.find_axp(assignment, None).unwrap()));
    if !expected_cxps.is_empty() {
        assert!(expected_cxps.contains(&explainer.find_cxp(assignment, None).unwrap()));
    }
}
