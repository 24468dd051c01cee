use std::fmt::Debug;
use xdd_diagram::{Bdd, Lit, Session};

/// A compiled boolean classifier, queried by conditioning.
///
/// Conditioning must be pure: the same node and literal always give the same result, and nodes
/// returned by previous calls stay valid for the lifetime of the oracle.
pub trait Oracle {
    type Node: Clone + Debug;

    fn root(&self) -> Self::Node;

    /// Restriction of `node` to the assignments where `lit` holds.
    fn condition(&self, node: &Self::Node, lit: Lit) -> Self::Node;

    /// True if the node is decided to the positive class.
    fn is_true(&self, node: &Self::Node) -> bool;

    /// True if the node is decided to the negative class.
    fn is_false(&self, node: &Self::Node) -> bool;
}

impl Oracle for Session<'_> {
    type Node = Bdd;

    fn root(&self) -> Bdd {
        Session::root(self).clone()
    }

    fn condition(&self, node: &Bdd, lit: Lit) -> Bdd {
        Session::condition(self, node, lit)
    }

    fn is_true(&self, node: &Bdd) -> bool {
        Session::is_true(self, node)
    }

    fn is_false(&self, node: &Bdd) -> bool {
        Session::is_false(self, node)
    }
}
