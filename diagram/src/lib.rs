//! Decision diagrams used as classifiers: readers for the libsdd (`.sdd`, `.vtree`) and c2d
//! (`.nnf`) formats, compilation into binary decision diagrams and scoped query sessions.
//!
//! ```
//! use xdd_diagram::{io, Lit, Manager, Session};
//! let order = io::vtree::parse_vtree("vtree 3\nL 0 2\nL 2 1\nI 1 0 2\n").unwrap();
//! let manager = Manager::with_order(&order).unwrap();
//! let circuit = io::sdd::parse_sdd("sdd 3\nL 0 0 1\nL 1 2 2\nD 2 1 1 0 1\n").unwrap();
//! let session = Session::new(&manager, manager.compile(&circuit).unwrap());
//! let f = session.condition(session.root(), Lit::new(1, true));
//! assert!(session.is_true(&session.condition(&f, Lit::new(2, true))));
//! ```

mod circuit;
mod error;
pub mod io;
mod lit;
mod manager;
mod session;

pub use biodivine_lib_bdd::Bdd;
pub use circuit::{Circuit, Gate};
pub use error::{DiagramError, Result};
pub use lit::{Lit, Var};
pub use manager::Manager;
pub use session::Session;
