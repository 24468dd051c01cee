use std::str::FromStr;

use env_param::EnvParam;
use itertools::Itertools;
use xdd_sat::{BVar, SatSolver, Stats};

use crate::{Axp, Cxp, Mask};

/// Default bias of the map solver, one of `low` or `high`.
pub static MAP_SOLVER_MODE: EnvParam<MapSolverMode> = EnvParam::new("XDD_MAP_SOLVER_MODE", "low");

/// A seed assigns each feature to be either fixed or universal.
///
/// - "High" bias approaches release as many features as possible, and are thus more likely to
///   reach the other prediction, favoring finding CXps early.
/// - "Low" bias approaches keep as many features fixed as possible, and are thus more likely to
///   entail the prediction, favoring finding AXps early.
///
/// Both are implemented with the preferred value of the solver's decisions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MapSolverMode {
    #[default]
    LowPreferredValues,
    HighPreferredValues,
}

impl FromStr for MapSolverMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(MapSolverMode::LowPreferredValues),
            "high" => Ok(MapSolverMode::HighPreferredValues),
            other => Err(format!("unknown map solver mode \"{other}\" (expected low or high)")),
        }
    }
}

/// Keeps track of the seeds that remain to be explored.
pub(crate) struct MapSolver {
    /// `universal[i]` is true in a seed iff feature `i` is released.
    universal: Vec<BVar>,
    solver: SatSolver,
}

impl MapSolver {
    pub fn new(num_features: usize, mode: MapSolverMode) -> Self {
        let mut solver = SatSolver::default();
        let universal = (0..num_features).map(|_| solver.new_var()).collect_vec();
        let preferred = match mode {
            MapSolverMode::LowPreferredValues => false,
            MapSolverMode::HighPreferredValues => true,
        };
        for &v in &universal {
            solver.set_polarity(v, preferred);
        }
        MapSolver { universal, solver }
    }

    /// Solve for a new seed, returned as the set of its universal features.
    /// In the MARCO algorithm, it will always result in a new seed, thanks to `block_cxp` and `block_axp`.
    pub fn find_unexplored_seed(&mut self) -> Option<Mask> {
        if !self.solver.solve() {
            return None;
        }
        let mut seed = Mask::none(self.universal.len());
        for (i, v) in self.universal.iter().enumerate() {
            if self.solver.value(v.true_lit()) == Some(true) {
                seed.set(i, true);
            }
        }
        Some(seed)
    }

    /// Mark all seeds releasing every feature of the CXp as explored.
    pub fn block_cxp(&mut self, cxp: &Cxp) {
        let clause = cxp.iter().map(|&i| self.universal[i].false_lit()).collect_vec();
        self.solver.add_clause(&clause);
    }

    /// Mark all seeds fixing every feature of the AXp as explored.
    /// Blocking the empty AXp leaves no seed to explore.
    pub fn block_axp(&mut self, axp: &Axp) {
        let clause = axp.iter().map(|&i| self.universal[i].true_lit()).collect_vec();
        self.solver.add_clause(&clause);
    }

    pub fn stats(&self) -> &Stats {
        &self.solver.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_modes() {
        assert_eq!("low".parse::<MapSolverMode>(), Ok(MapSolverMode::LowPreferredValues));
        assert_eq!("HIGH".parse::<MapSolverMode>(), Ok(MapSolverMode::HighPreferredValues));
        assert!("medium".parse::<MapSolverMode>().is_err());
    }

    #[test]
    fn seeds_follow_the_bias() {
        let mut low = MapSolver::new(3, MapSolverMode::LowPreferredValues);
        assert_eq!(low.find_unexplored_seed(), Some(Mask::none(3)));
        let mut high = MapSolver::new(3, MapSolverMode::HighPreferredValues);
        assert_eq!(high.find_unexplored_seed(), Some(Mask::all(3)));
    }

    #[test]
    fn blocking_exhausts_the_seeds() {
        let mut map = MapSolver::new(2, MapSolverMode::LowPreferredValues);
        map.block_axp(&Axp::from([0, 1]));
        let seed = map.find_unexplored_seed().unwrap();
        assert!(seed.count() >= 1);
        map.block_cxp(&Cxp::from([0]));
        map.block_cxp(&Cxp::from([1]));
        assert_eq!(map.find_unexplored_seed(), None);

        let mut map = MapSolver::new(2, MapSolverMode::HighPreferredValues);
        map.block_axp(&Axp::new());
        assert_eq!(map.find_unexplored_seed(), None);
    }
}
