//! Formal explanations of the predictions of classifiers compiled into decision diagrams.
//!
//! For an instance, an *abductive explanation* (AXp) is a subset-minimal set of features whose
//! values alone guarantee the prediction, and a *contrastive explanation* (CXp) is a
//! subset-minimal set of features whose values, once released, allow the other prediction.
//! Each AXp is a minimal hitting set of the family of CXps and conversely, which the
//! [`Marco`] enumerator exploits to compute both families.
//!
//! ```
//! use xdd_diagram::{Lit, Manager, Session};
//! use xdd_explain::{Assignment, Axp, Cxp, Explainer};
//!
//! let manager = Manager::new(2).unwrap();
//! let a = manager.literal(Lit::new(1, true)).unwrap();
//! let b = manager.literal(Lit::new(2, true)).unwrap();
//! let session = Session::new(&manager, a.or(&b));
//!
//! // two features, each described by a single variable: x1 = true, x2 = false
//! let instance = Assignment::from_literals([[Lit::new(1, true)], [Lit::new(2, false)]]).unwrap();
//! let explainer = Explainer::new(&session);
//! assert!(explainer.predict(&instance).unwrap());
//! assert_eq!(explainer.find_axp(&instance, None).unwrap(), Axp::from([0]));
//! assert_eq!(explainer.find_cxp(&instance, None).unwrap(), Cxp::from([0]));
//! ```

mod engine;
mod enumerate;
mod error;
pub mod features;
mod instance;
mod mask;
mod oracle;
pub mod verify;

use std::collections::BTreeSet;

pub use engine::Explainer;
pub use enumerate::{Enumeration, MapSolverMode, Marco, CHECK_ENUMERATION, MAP_SOLVER_MODE};
pub use error::{ErrorKind, Result, XpError};
pub use features::FeatureMap;
pub use instance::{parse_instances, read_instances, Assignment};
pub use mask::Mask;
pub use oracle::Oracle;
pub use verify::{Defect, Verdict, Verifier};

/// Abductive explanation: indices of the features it fixes.
pub type Axp = BTreeSet<usize>;

/// Contrastive explanation: indices of the features it releases.
pub type Cxp = BTreeSet<usize>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Xp {
    Axp(Axp),
    Cxp(Cxp),
}
