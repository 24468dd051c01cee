use crate::error::{Result, XpError};
use crate::{Assignment, Axp, Cxp, Mask, Oracle};
use std::time::Instant;
use tracing::Level;

/// Computes explanations of the predictions of a classifier.
///
/// The explainer holds no state besides the classifier: the instance is given to each call, and
/// each test of a candidate set re-conditions the classifier from its root on the literals of
/// the fixed features.
pub struct Explainer<'o, O: Oracle> {
    oracle: &'o O,
}

impl<O: Oracle> Clone for Explainer<'_, O> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<O: Oracle> Copy for Explainer<'_, O> {}

impl<'o, O: Oracle> Explainer<'o, O> {
    pub fn new(oracle: &'o O) -> Self {
        Explainer { oracle }
    }

    pub fn oracle(&self) -> &'o O {
        self.oracle
    }

    fn condition_fixed(&self, assignment: &Assignment, fixed: &Mask) -> O::Node {
        assignment
            .fixed_literals(fixed)
            .fold(self.oracle.root(), |node, lit| self.oracle.condition(&node, lit))
    }

    /// True if the literals of the fixed features decide the classifier to `pred`.
    pub(crate) fn entails(&self, assignment: &Assignment, fixed: &Mask, pred: bool) -> bool {
        let node = self.condition_fixed(assignment, fixed);
        if pred {
            self.oracle.is_true(&node)
        } else {
            self.oracle.is_false(&node)
        }
    }

    /// Prediction of the classifier on the instance.
    pub fn predict(&self, assignment: &Assignment) -> Result<bool> {
        let node = self.condition_fixed(assignment, &Mask::all(assignment.num_features()));
        if self.oracle.is_true(&node) {
            Ok(true)
        } else if self.oracle.is_false(&node) {
            Ok(false)
        } else {
            Err(XpError::UndecidedCircuit)
        }
    }

    /// True if, when all features of `universal` are released, the classifier may still
    /// predict `desired`.
    pub fn reachable(&self, assignment: &Assignment, universal: &Mask, desired: bool) -> Result<bool> {
        assignment.check_mask(universal)?;
        Ok(!self.entails(assignment, &universal.complement(), !desired))
    }

    /// Computes an AXp, included in the `fixed` features (all of them by default).
    ///
    /// Features are considered in increasing order, each being released for good if the remaining
    /// fixed features still entail the prediction. Fails if the features of the seed do not entail
    /// the prediction in the first place.
    pub fn find_axp(&self, assignment: &Assignment, fixed: Option<&Mask>) -> Result<Axp> {
        let _span = tracing::span!(Level::TRACE, "find_axp").entered();
        let start = Instant::now();
        let pred = self.predict(assignment)?;
        let fixed = match fixed {
            Some(mask) => {
                assignment.check_mask(mask)?;
                mask.clone()
            }
            None => Mask::all(assignment.num_features()),
        };
        if !self.entails(assignment, &fixed, pred) {
            return Err(XpError::malformed(format!(
                "the fixed features {fixed} do not entail the prediction"
            )));
        }
        let axp = self.shrink_fixed(assignment, fixed, pred);
        tracing::debug!("AXp: {:?} ({:.4}s)", axp, start.elapsed().as_secs_f64());
        Ok(axp)
    }

    /// Computes a CXp, included in the `universal` features (all of them by default).
    ///
    /// Features are considered in increasing order, each being fixed back for good if the other
    /// prediction remains reachable. Fails if the other prediction is not reachable when releasing
    /// all features of the seed.
    pub fn find_cxp(&self, assignment: &Assignment, universal: Option<&Mask>) -> Result<Cxp> {
        let _span = tracing::span!(Level::TRACE, "find_cxp").entered();
        let start = Instant::now();
        let pred = self.predict(assignment)?;
        let universal = match universal {
            Some(mask) => {
                assignment.check_mask(mask)?;
                mask.clone()
            }
            None => Mask::all(assignment.num_features()),
        };
        if !self.reachable(assignment, &universal, !pred)? {
            return Err(XpError::malformed(format!(
                "releasing the features {universal} does not allow another prediction"
            )));
        }
        let cxp = self.shrink_universal(assignment, &universal, pred);
        tracing::debug!("CXp: {:?} ({:.4}s)", cxp, start.elapsed().as_secs_f64());
        Ok(cxp)
    }

    /// Deletion-based minimization of a set of fixed features entailing `pred`.
    pub(crate) fn shrink_fixed(&self, assignment: &Assignment, mut fixed: Mask, pred: bool) -> Axp {
        for i in 0..fixed.len() {
            if fixed.contains(i) {
                fixed.set(i, false);
                if !self.entails(assignment, &fixed, pred) {
                    fixed.set(i, true);
                } else {
                    tracing::trace!("released feature {i}");
                }
            }
        }
        fixed.ones().collect()
    }

    /// Deletion-based minimization of a set of universal features that does not entail `pred`.
    pub(crate) fn shrink_universal(&self, assignment: &Assignment, universal: &Mask, pred: bool) -> Cxp {
        let mut fixed = universal.complement();
        for i in 0..fixed.len() {
            if !fixed.contains(i) {
                fixed.set(i, true);
                if self.entails(assignment, &fixed, pred) {
                    fixed.set(i, false);
                } else {
                    tracing::trace!("fixed feature {i}");
                }
            }
        }
        (0..fixed.len()).filter(|&i| !fixed.contains(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use xdd_diagram::{Lit, Manager, Session};

    fn lit(i: i32) -> Lit {
        Lit::from_signed(i).unwrap()
    }

    /// One variable per feature, all set to true.
    fn all_true(n: u32) -> Assignment {
        Assignment::from_literals((1..=n).map(|v| [Lit::new(v, true)])).unwrap()
    }

    #[test]
    fn majority_of_three() {
        let m = Manager::new(3).unwrap();
        let [a, b, c] = [1, 2, 3].map(|v| m.literal(lit(v)).unwrap());
        let f = a.and(&b).or(&a.and(&c)).or(&b.and(&c));
        let session = Session::new(&m, f);
        let xp = Explainer::new(&session);
        let inst = all_true(3);

        assert!(xp.predict(&inst).unwrap());
        assert_eq!(xp.find_axp(&inst, None).unwrap(), Axp::from([1, 2]));
        assert_eq!(xp.find_cxp(&inst, None).unwrap(), Cxp::from([1, 2]));
        // seeded searches stay within their seed
        let seed = Mask::from_features(3, [0, 2]);
        assert_eq!(xp.find_axp(&inst, Some(&seed)).unwrap(), Axp::from([0, 2]));
        assert_eq!(xp.find_cxp(&inst, Some(&seed)).unwrap(), Cxp::from([0, 2]));
        // deterministic
        assert_eq!(xp.find_axp(&inst, None).unwrap(), xp.find_axp(&inst, None).unwrap());

        assert!(xp.reachable(&inst, &Mask::from_features(3, [0, 1]), false).unwrap());
        assert!(!xp.reachable(&inst, &Mask::from_features(3, [0]), false).unwrap());
        assert!(xp.reachable(&inst, &Mask::none(3), true).unwrap());
    }

    #[test]
    fn contract_violations() {
        let m = Manager::new(2).unwrap();
        let f = m.literal(lit(1)).unwrap().and(&m.literal(lit(2)).unwrap());
        let session = Session::new(&m, f);
        let xp = Explainer::new(&session);

        let inst = all_true(2);
        let err = xp.find_axp(&inst, Some(&Mask::all(3))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        let err = xp.reachable(&inst, &Mask::none(1), true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        // a single fixed feature does not entail the prediction
        assert!(xp.find_axp(&inst, Some(&Mask::from_features(2, [0]))).is_err());
        // releasing nothing never allows the other prediction
        assert!(xp.find_cxp(&inst, Some(&Mask::none(2))).is_err());

        // the second feature has no literal: the classifier remains undecided
        let partial = Assignment::from_literals([vec![lit(1)], vec![]]).unwrap();
        let err = xp.predict(&partial).unwrap_err();
        assert!(matches!(err, XpError::UndecidedCircuit));
        assert_eq!(err.kind(), ErrorKind::InconsistentLiteralSet);
    }

    #[test]
    fn negative_predictions() {
        // f = x1 & x2 with x1 false, x2 false: each feature alone forces false
        let m = Manager::new(2).unwrap();
        let f = m.literal(lit(1)).unwrap().and(&m.literal(lit(2)).unwrap());
        let session = Session::new(&m, f);
        let xp = Explainer::new(&session);
        let inst = Assignment::from_literals([[lit(-1)], [lit(-2)]]).unwrap();

        assert!(!xp.predict(&inst).unwrap());
        assert_eq!(xp.find_axp(&inst, None).unwrap(), Axp::from([1]));
        assert_eq!(xp.find_cxp(&inst, None).unwrap(), Cxp::from([0, 1]));
    }
}
