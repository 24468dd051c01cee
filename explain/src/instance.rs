use crate::error::{Result, XpError};
use crate::features::FeatureMap;
use crate::mask::Mask;
use smallvec::SmallVec;
use std::path::Path;
use xdd_diagram::Lit;

/// The literals implied by the values of an instance, grouped by feature.
///
/// The literals of a feature are sorted by variable, without duplicates and never contain both a
/// literal and its negation. An empty group leaves the feature unconstrained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    lits: Vec<SmallVec<[Lit; 4]>>,
}

impl Assignment {
    /// Encodes the raw values of an instance, given in the order of the features of the map.
    pub fn encode(map: &FeatureMap, values: &[impl AsRef<str>]) -> Result<Assignment> {
        if values.len() != map.len() {
            return Err(XpError::malformed(format!(
                "instance has {} values for {} features",
                values.len(),
                map.len()
            )));
        }
        let lits = map
            .features()
            .iter()
            .zip(values)
            .map(|(feature, value)| feature.encode(value.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Assignment { lits })
    }

    /// Builds an assignment from its literals, given per feature.
    pub fn from_literals(
        features: impl IntoIterator<Item = impl IntoIterator<Item = Lit>>,
    ) -> Result<Assignment> {
        let mut lits = Vec::new();
        for (i, group) in features.into_iter().enumerate() {
            let mut group = group.into_iter().collect::<SmallVec<[Lit; 4]>>();
            group.sort();
            group.dedup();
            if let Some(w) = group.windows(2).find(|w| w[0].var() == w[1].var()) {
                return Err(XpError::InconsistentLiterals {
                    feature: i.to_string(),
                    lit: w[1],
                });
            }
            lits.push(group);
        }
        Ok(Assignment { lits })
    }

    pub fn num_features(&self) -> usize {
        self.lits.len()
    }

    /// Literals of all features of the mask, in feature order.
    pub fn fixed_literals<'a>(&'a self, fixed: &'a Mask) -> impl Iterator<Item = Lit> + 'a {
        fixed.ones().flat_map(move |i| self.lits[i].iter().copied())
    }

    pub(crate) fn check_mask(&self, mask: &Mask) -> Result<()> {
        if mask.len() != self.num_features() {
            Err(XpError::malformed(format!(
                "mask over {} features for an instance of {} features",
                mask.len(),
                self.num_features()
            )))
        } else {
            Ok(())
        }
    }
}

/// Splits the lines of an instance file into raw values.
/// Blank lines and lines starting with `#` are ignored.
pub fn parse_instances(input: &str) -> Vec<Vec<String>> {
    input
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| l.split(',').map(|v| v.trim().to_string()).collect())
        .collect()
}

pub fn read_instances(path: impl AsRef<Path>) -> Result<Vec<Vec<String>>> {
    Ok(parse_instances(&std::fs::read_to_string(path)?))
}
