use fixedbitset::FixedBitSet;
use std::fmt::{Debug, Display, Formatter};

/// A set of features, given by their index.
///
/// Used either as the set of *fixed* features (contributing their literals when conditioning the
/// classifier) or as the set of *universal* features (left free), the two being complements.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Mask(FixedBitSet);

impl Mask {
    /// Mask containing all of the `num_features` features.
    pub fn all(num_features: usize) -> Mask {
        let mut bits = FixedBitSet::with_capacity(num_features);
        bits.insert_range(..);
        Mask(bits)
    }

    /// Mask containing none of the `num_features` features.
    pub fn none(num_features: usize) -> Mask {
        Mask(FixedBitSet::with_capacity(num_features))
    }

    /// # Panics
    /// Panics if a feature is out of range.
    pub fn from_features(num_features: usize, features: impl IntoIterator<Item = usize>) -> Mask {
        let mut mask = Mask::none(num_features);
        for f in features {
            mask.set(f, true);
        }
        mask
    }

    /// Number of features the mask is defined over.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_clear()
    }

    /// Number of features in the mask.
    pub fn count(&self) -> usize {
        self.0.count_ones(..)
    }

    pub fn contains(&self, feature: usize) -> bool {
        self.0.contains(feature)
    }

    pub fn set(&mut self, feature: usize, value: bool) {
        self.0.set(feature, value)
    }

    pub fn complement(&self) -> Mask {
        let mut bits = self.0.clone();
        bits.toggle_range(..);
        Mask(bits)
    }

    /// Features of the mask, in increasing order.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.ones()
    }
}

impl Display for Mask {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.len() {
            write!(f, "{}", if self.contains(i) { '1' } else { '0' })?;
        }
        Ok(())
    }
}

impl Debug for Mask {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mask({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn complement_stays_in_range() {
        let m = Mask::from_features(5, [1, 3]);
        assert_eq!(m.count(), 2);
        let c = m.complement();
        assert_eq!(c.len(), 5);
        assert_eq!(c.ones().collect_vec(), vec![0, 2, 4]);
        assert_eq!(c.complement(), m);
        assert_eq!(format!("{m:?}"), "Mask(01010)");
        assert_eq!(Mask::all(3).complement(), Mask::none(3));
        assert!(Mask::none(3).is_empty());
    }
}
