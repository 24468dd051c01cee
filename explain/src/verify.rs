//! Certification of explanations.
//!
//! The checks are independent of the way explanations are computed: a single explanation is
//! checked against the classifier, and a pair of explanation families is checked for the
//! minimal hitting set duality that relates all AXps and all CXps of an instance.
//! Failures are values ([`Verdict::Invalid`]), logged as warnings.

use crate::error::{Result, XpError};
use crate::{Assignment, Axp, Cxp, Explainer, Mask, Oracle};
use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum XpKind {
    Axp,
    Cxp,
}

impl Display for XpKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            XpKind::Axp => write!(f, "AXp"),
            XpKind::Cxp => write!(f, "CXp"),
        }
    }
}

/// Reason for rejecting an explanation or a family of explanations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Defect {
    /// The fixed features do not entail the prediction.
    NotWeakAxp(Axp),
    /// Releasing the features still entails the prediction.
    NotWeakCxp(Cxp),
    /// The explanation remains valid without `redundant`.
    NotSubsetMinimal {
        kind: XpKind,
        xp: BTreeSet<usize>,
        redundant: usize,
    },
    /// One explanation of the family includes another one.
    NotUnique {
        kind: XpKind,
        first: BTreeSet<usize>,
        second: BTreeSet<usize>,
    },
    NotHitting { axp: Axp, cxp: Cxp },
    /// Without `redundant`, the explanation still hits all explanations of the other kind.
    NotMinimalHittingSet {
        kind: XpKind,
        xp: BTreeSet<usize>,
        redundant: usize,
    },
    /// The family of the given kind is empty while the other is not `{∅}`.
    EmptyFamily(XpKind),
}

impl Display for Defect {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Defect::NotWeakAxp(axp) => write!(f, "{axp:?} is not a weak AXp"),
            Defect::NotWeakCxp(cxp) => write!(f, "{cxp:?} is not a weak CXp"),
            Defect::NotSubsetMinimal { kind, xp, redundant } => {
                write!(f, "{kind} {xp:?} is not subset-minimal: {redundant} is redundant")
            }
            Defect::NotUnique { kind, first, second } => {
                write!(f, "{kind} is not unique: {first:?}, {second:?}")
            }
            Defect::NotHitting { axp, cxp } => write!(f, "not a hitting set: AXp {axp:?}, CXp {cxp:?}"),
            Defect::NotMinimalHittingSet { kind, xp, redundant } => write!(
                f,
                "{kind} {xp:?} is not a minimal hitting set: {redundant} is redundant"
            ),
            Defect::EmptyFamily(kind) => write!(f, "empty {kind} family"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid(Defect),
}

impl Verdict {
    fn invalid(defect: Defect) -> Verdict {
        tracing::warn!("{defect}");
        Verdict::Invalid(defect)
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }
}

/// Checks single explanations against a classifier.
pub struct Verifier<'o, O: Oracle> {
    explainer: Explainer<'o, O>,
}

impl<'o, O: Oracle> Verifier<'o, O> {
    pub fn new(oracle: &'o O) -> Self {
        Verifier {
            explainer: Explainer::new(oracle),
        }
    }

    fn mask(assignment: &Assignment, features: &BTreeSet<usize>) -> Result<Mask> {
        let n = assignment.num_features();
        if let Some(&i) = features.iter().find(|&&i| i >= n) {
            return Err(XpError::malformed(format!(
                "feature {i} is out of range for an instance of {n} features"
            )));
        }
        Ok(Mask::from_features(n, features.iter().copied()))
    }

    /// A valid AXp entails the prediction, and no feature can be released from it.
    pub fn check_axp(&self, assignment: &Assignment, candidate: &Axp) -> Result<Verdict> {
        let pred = self.explainer.predict(assignment)?;
        let mut fixed = Self::mask(assignment, candidate)?;
        if !self.explainer.entails(assignment, &fixed, pred) {
            return Ok(Verdict::invalid(Defect::NotWeakAxp(candidate.clone())));
        }
        for &i in candidate {
            fixed.set(i, false);
            let still_entailed = self.explainer.entails(assignment, &fixed, pred);
            fixed.set(i, true);
            if still_entailed {
                return Ok(Verdict::invalid(Defect::NotSubsetMinimal {
                    kind: XpKind::Axp,
                    xp: candidate.clone(),
                    redundant: i,
                }));
            }
        }
        Ok(Verdict::Valid)
    }

    /// A valid CXp allows another prediction once released, and fixing back any of its features
    /// entails the prediction again.
    pub fn check_cxp(&self, assignment: &Assignment, candidate: &Cxp) -> Result<Verdict> {
        let pred = self.explainer.predict(assignment)?;
        let mut fixed = Self::mask(assignment, candidate)?.complement();
        if self.explainer.entails(assignment, &fixed, pred) {
            return Ok(Verdict::invalid(Defect::NotWeakCxp(candidate.clone())));
        }
        for &i in candidate {
            fixed.set(i, true);
            let restored = self.explainer.entails(assignment, &fixed, pred);
            fixed.set(i, false);
            if !restored {
                return Ok(Verdict::invalid(Defect::NotSubsetMinimal {
                    kind: XpKind::Cxp,
                    xp: candidate.clone(),
                    redundant: i,
                }));
            }
        }
        Ok(Verdict::Valid)
    }
}

/// Checks that two families of explanations are the minimal hitting sets of each other.
///
/// An empty family is only dual to `{∅}`, the AXps of a constant classifier.
pub fn check_family_duality(axps: &[Axp], cxps: &[Cxp]) -> Verdict {
    let only_empty_set = |family: &[BTreeSet<usize>]| family.len() == 1 && family[0].is_empty();
    if axps.is_empty() && !only_empty_set(cxps) {
        return Verdict::invalid(Defect::EmptyFamily(XpKind::Axp));
    }
    if cxps.is_empty() && !only_empty_set(axps) {
        return Verdict::invalid(Defect::EmptyFamily(XpKind::Cxp));
    }

    for (kind, family) in [(XpKind::Axp, axps), (XpKind::Cxp, cxps)] {
        for (first, second) in family.iter().tuple_combinations() {
            if first.is_subset(second) || first.is_superset(second) {
                return Verdict::invalid(Defect::NotUnique {
                    kind,
                    first: first.clone(),
                    second: second.clone(),
                });
            }
        }
    }

    for (axp, cxp) in axps.iter().cartesian_product(cxps) {
        if axp.is_disjoint(cxp) {
            return Verdict::invalid(Defect::NotHitting {
                axp: axp.clone(),
                cxp: cxp.clone(),
            });
        }
    }

    for (kind, family, others) in [(XpKind::Axp, axps, cxps), (XpKind::Cxp, cxps, axps)] {
        for xp in family {
            for &redundant in xp {
                let hits_all = others
                    .iter()
                    .all(|other| other.iter().any(|f| *f != redundant && xp.contains(f)));
                if hits_all {
                    return Verdict::invalid(Defect::NotMinimalHittingSet {
                        kind,
                        xp: xp.clone(),
                        redundant,
                    });
                }
            }
        }
    }
    Verdict::Valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use xdd_diagram::{Lit, Manager, Session};

    fn sets(family: &[&[usize]]) -> Vec<BTreeSet<usize>> {
        family.iter().map(|s| s.iter().copied().collect()).collect()
    }

    #[test]
    fn duality_of_families() {
        // f = a & (b | c)
        let axps = sets(&[&[0, 1], &[0, 2]]);
        let cxps = sets(&[&[0], &[1, 2]]);
        assert_eq!(check_family_duality(&axps, &cxps), Verdict::Valid);
        assert_eq!(check_family_duality(&cxps, &axps), Verdict::Valid);

        let missing = sets(&[&[0]]);
        assert!(matches!(
            check_family_duality(&axps, &missing),
            Verdict::Invalid(Defect::NotMinimalHittingSet { kind: XpKind::Axp, .. })
        ));
        let not_hitting = sets(&[&[0], &[1]]);
        assert!(matches!(
            check_family_duality(&axps, &not_hitting),
            Verdict::Invalid(Defect::NotHitting { .. })
        ));
        let duplicated = sets(&[&[0, 1], &[0, 1, 2]]);
        assert!(matches!(
            check_family_duality(&duplicated, &cxps),
            Verdict::Invalid(Defect::NotUnique { kind: XpKind::Axp, .. })
        ));
    }

    #[test]
    fn empty_families() {
        let empty_set = sets(&[&[]]);
        assert!(check_family_duality(&empty_set, &[]).is_valid());
        assert!(check_family_duality(&[], &empty_set).is_valid());
        assert_eq!(
            check_family_duality(&[], &[]),
            Verdict::Invalid(Defect::EmptyFamily(XpKind::Axp))
        );
        assert_eq!(
            check_family_duality(&sets(&[&[1]]), &[]),
            Verdict::Invalid(Defect::EmptyFamily(XpKind::Cxp))
        );
    }

    #[test]
    fn single_explanations() {
        // f = x1 | (x2 & x3), one variable per feature, all true
        let m = Manager::new(3).unwrap();
        let [a, b, c] = [1, 2, 3].map(|v| m.literal(Lit::new(v, true)).unwrap());
        let session = Session::new(&m, a.or(&b.and(&c)));
        let verifier = Verifier::new(&session);
        let inst = Assignment::from_literals((1..=3).map(|v| [Lit::new(v, true)])).unwrap();

        let check_axp = |s: &[usize]| verifier.check_axp(&inst, &s.iter().copied().collect()).unwrap();
        let check_cxp = |s: &[usize]| verifier.check_cxp(&inst, &s.iter().copied().collect()).unwrap();
        assert!(check_axp(&[0]).is_valid());
        assert!(check_axp(&[1, 2]).is_valid());
        assert_eq!(check_axp(&[1]), Verdict::Invalid(Defect::NotWeakAxp([1].into())));
        assert!(matches!(
            check_axp(&[0, 1]),
            Verdict::Invalid(Defect::NotSubsetMinimal { redundant: 1, .. })
        ));
        assert!(check_cxp(&[0, 1]).is_valid());
        assert!(check_cxp(&[0, 2]).is_valid());
        assert_eq!(check_cxp(&[1, 2]), Verdict::Invalid(Defect::NotWeakCxp([1, 2].into())));
        assert!(matches!(
            check_cxp(&[0, 1, 2]),
            Verdict::Invalid(Defect::NotSubsetMinimal { kind: XpKind::Cxp, .. })
        ));

        let out_of_range = verifier.check_axp(&inst, &[5].into()).unwrap_err();
        assert_eq!(out_of_range.kind(), crate::ErrorKind::MalformedInput);
    }
}
