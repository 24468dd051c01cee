use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};
use std::num::NonZeroI32;
use std::ops::Not;

/// Identifier of a boolean variable of a diagram. Variables are numbered from 1.
pub type Var = u32;

/// A variable or its negation, in the signed integer convention of the diagram file formats.
///
/// Literals are ordered by variable first, then by polarity (negative first).
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Lit(NonZeroI32);

impl Lit {
    pub fn new(var: Var, positive: bool) -> Lit {
        assert!(var > 0 && var <= i32::MAX as u32, "invalid variable {var}");
        let v = var as i32;
        Lit(NonZeroI32::new(if positive { v } else { -v }).expect("non zero variable"))
    }

    /// Returns `None` for zero, which does not denote a literal.
    pub fn from_signed(i: i32) -> Option<Lit> {
        if i == i32::MIN {
            return None;
        }
        NonZeroI32::new(i).map(Lit)
    }

    pub fn to_signed(self) -> i32 {
        self.0.get()
    }

    pub fn var(self) -> Var {
        self.0.get().unsigned_abs()
    }

    pub fn is_positive(self) -> bool {
        self.0.get() > 0
    }
}

impl Not for Lit {
    type Output = Lit;
    fn not(self) -> Lit {
        Lit(-self.0)
    }
}

impl Ord for Lit {
    fn cmp(&self, other: &Self) -> Ordering {
        self.var()
            .cmp(&other.var())
            .then(self.is_positive().cmp(&other.is_positive()))
    }
}
impl PartialOrd for Lit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Lit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl Debug for Lit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_by_variable() {
        let mut lits = [3, -1, 2, -4].map(|i| Lit::from_signed(i).unwrap());
        lits.sort();
        assert_eq!(lits.map(Lit::to_signed), [-1, 2, 3, -4]);
        assert_eq!(!lits[0], Lit::new(1, true));
        assert_eq!(Lit::from_signed(0), None);
    }
}
