use std::fmt::{Debug, Display, Error, Formatter};
use std::num::NonZeroU32;
use std::ops::Not;

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
pub struct DecLvl(u32);

impl DecLvl {
    pub const ROOT: DecLvl = DecLvl(0);

    pub fn new(num_levels: usize) -> Self {
        DecLvl(num_levels as u32)
    }
    pub fn offset(self) -> usize {
        self.0 as usize
    }
}

impl Display for DecLvl {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "DecLvl({})", self.0)
    }
}

/// A boolean variable of the solver. Identifiers start at 1.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct BVar {
    id: NonZeroU32,
}

/// A literal, encoded as `(var << 1) | polarity`.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct Lit {
    id: NonZeroU32,
}

impl BVar {
    pub fn from_bits(id: u32) -> BVar {
        debug_assert!(id <= (u32::MAX >> 1), "The ID should fit on 31 bits.");
        BVar {
            id: NonZeroU32::new(id).expect("Zero is not allowed. First valid ID is 1."),
        }
    }
    pub fn to_bits(self) -> u32 {
        self.id.get()
    }
    pub fn index(self) -> usize {
        self.to_bits() as usize
    }

    pub fn true_lit(self) -> Lit {
        Lit::new(self, true)
    }
    pub fn false_lit(self) -> Lit {
        Lit::new(self, false)
    }
    pub fn lit(self, value: bool) -> Lit {
        Lit::new(self, value)
    }
}

impl Display for BVar {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "{}", self.to_bits())
    }
}

impl Debug for BVar {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "{self}")
    }
}

impl Lit {
    fn new(var: BVar, value: bool) -> Lit {
        Lit {
            id: NonZeroU32::new((var.to_bits() << 1) | value as u32).expect("variable ids start at 1"),
        }
    }

    /// Builds a literal from its DIMACS representation.
    pub fn from_signed_int(i: i32) -> Lit {
        assert_ne!(i, 0);
        let v = BVar::from_bits(i.unsigned_abs());
        v.lit(i > 0)
    }
    pub fn to_signed_int(self) -> i32 {
        let v = self.variable().to_bits() as i32;
        if self.is_positive() {
            v
        } else {
            -v
        }
    }

    pub fn variable(self) -> BVar {
        BVar::from_bits(self.id.get() >> 1)
    }
    pub fn is_positive(self) -> bool {
        self.id.get() & 1 == 1
    }
    pub fn is_negative(self) -> bool {
        !self.is_positive()
    }
    /// Dense index of the literal, suitable for indexing watch lists.
    pub fn index(self) -> usize {
        self.id.get() as usize
    }
}

impl Not for Lit {
    type Output = Lit;

    fn not(self) -> Self::Output {
        Lit {
            id: NonZeroU32::new(self.id.get() ^ 1).expect("variable ids start at 1"),
        }
    }
}

impl Display for Lit {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        if self.is_negative() {
            write!(f, "-")?;
        }
        write!(f, "{}", self.variable())
    }
}
impl Debug for Lit {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{self}")
    }
}

#[derive(PartialEq, Eq, Clone, Copy)]
pub enum BVal {
    Undef,
    True,
    False,
}

impl BVal {
    pub fn from_bool(v: bool) -> Self {
        if v {
            BVal::True
        } else {
            BVal::False
        }
    }
    pub fn to_bool(self) -> Option<bool> {
        match self {
            BVal::Undef => None,
            BVal::True => Some(true),
            BVal::False => Some(false),
        }
    }
}

impl Not for BVal {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            BVal::Undef => BVal::Undef,
            BVal::True => BVal::False,
            BVal::False => BVal::True,
        }
    }
}

impl Debug for BVal {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        let c = match self {
            BVal::Undef => '?',
            BVal::True => '⊤',
            BVal::False => '⊥',
        };
        write!(f, "{c}")
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct VarState {
    pub value: BVal,
    pub level: DecLvl,
    pub reason: Option<crate::clause::ClauseId>,
}
impl VarState {
    pub const INIT: VarState = VarState {
        value: BVal::Undef,
        level: DecLvl::ROOT,
        reason: None,
    };
}

/// Current partial assignment of the solver, with the trail of assigned literals
/// and the position in the trail at which each decision level starts.
pub(crate) struct Assignments {
    states: Vec<VarState>,
    trail: Vec<Lit>,
    levels: Vec<usize>,
}

impl Assignments {
    pub fn new() -> Self {
        Assignments {
            // index 0 is never used
            states: vec![VarState::INIT],
            trail: Vec::new(),
            levels: Vec::new(),
        }
    }

    pub fn declare(&mut self) -> BVar {
        self.states.push(VarState::INIT);
        BVar::from_bits((self.states.len() - 1) as u32)
    }
    pub fn num_vars(&self) -> usize {
        self.states.len() - 1
    }

    pub fn set(&mut self, l: Lit, reason: Option<crate::clause::ClauseId>) {
        let level = self.decision_level();
        let state = &mut self.states[l.variable().index()];
        debug_assert_eq!(state.value, BVal::Undef);
        state.value = BVal::from_bool(l.is_positive());
        state.level = level;
        state.reason = reason;
        self.trail.push(l);
    }

    pub fn get(&self, var: BVar) -> BVal {
        self.states[var.index()].value
    }
    pub fn value_of(&self, lit: Lit) -> BVal {
        let v = self.get(lit.variable());
        if lit.is_positive() {
            v
        } else {
            !v
        }
    }
    pub fn level(&self, var: BVar) -> DecLvl {
        self.states[var.index()].level
    }
    pub fn reason(&self, var: BVar) -> Option<crate::clause::ClauseId> {
        self.states[var.index()].reason
    }
    /// Forgets all reasons. Only valid at the root level, where reasons are never inspected.
    pub fn clear_reasons(&mut self) {
        debug_assert_eq!(self.decision_level(), DecLvl::ROOT);
        for s in &mut self.states {
            s.reason = None;
        }
    }

    pub fn trail(&self) -> &[Lit] {
        &self.trail
    }
    pub fn decision_level(&self) -> DecLvl {
        DecLvl::new(self.levels.len())
    }
    pub fn new_level(&mut self) {
        self.levels.push(self.trail.len());
    }

    /// Undoes all assignments made above `lvl`, calling `on_restore` on every unassigned variable.
    pub fn backtrack_to(&mut self, lvl: DecLvl, mut on_restore: impl FnMut(BVar)) {
        if self.decision_level() <= lvl {
            return;
        }
        let point = self.levels[lvl.offset()];
        for &lit in &self.trail[point..] {
            self.states[lit.variable().index()] = VarState::INIT;
            on_restore(lit.variable());
        }
        self.trail.truncate(point);
        self.levels.truncate(lvl.offset());
    }
}
