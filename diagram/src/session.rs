use crate::lit::Lit;
use crate::manager::Manager;
use biodivine_lib_bdd::Bdd;

/// A compiled classifier opened for querying.
///
/// The root and every diagram obtained by conditioning are immutable values: however many
/// queries are made, none of them invalidates or simplifies away a diagram still held by the
/// caller.
///
/// ```
/// use xdd_diagram::{Lit, Manager, Session};
/// let manager = Manager::new(2).unwrap();
/// let a = manager.literal(Lit::new(1, true)).unwrap();
/// let b = manager.literal(Lit::new(2, true)).unwrap();
/// let session = Session::new(&manager, a.or(&b));
/// let g = session.condition(session.root(), Lit::new(1, false));
/// assert!(!session.is_true(&g) && !session.is_false(&g));
/// assert!(session.is_true(&session.condition(&g, Lit::new(2, true))));
/// ```
pub struct Session<'m> {
    manager: &'m Manager,
    root: Bdd,
}

impl<'m> Session<'m> {
    pub fn new(manager: &'m Manager, root: Bdd) -> Self {
        tracing::debug!("session opened on a diagram of {} nodes", root.size());
        Session { manager, root }
    }

    pub fn manager(&self) -> &'m Manager {
        self.manager
    }

    pub fn root(&self) -> &Bdd {
        &self.root
    }

    pub fn condition(&self, node: &Bdd, lit: Lit) -> Bdd {
        self.manager.condition(node, lit)
    }

    pub fn is_true(&self, node: &Bdd) -> bool {
        node.is_true()
    }

    pub fn is_false(&self, node: &Bdd) -> bool {
        node.is_false()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conditioning_keeps_previous_results() {
        let m = Manager::new(2).unwrap();
        let root = m.literal(Lit::new(1, true)).unwrap().and(&m.literal(Lit::new(2, false)).unwrap());
        let session = Session::new(&m, root.clone());
        let half = session.condition(session.root(), Lit::new(1, true));
        let full = session.condition(&half, Lit::new(2, false));
        assert!(session.is_true(&full));
        // `half` and the root are still usable
        assert!(session.is_false(&session.condition(&half, Lit::new(2, true))));
        assert_eq!(session.root(), &root);
        assert!(session.is_false(&session.condition(session.root(), Lit::new(1, false))));
    }
}
