//! Fuzzified input variables and their automatic partitions.

use crate::membership::Triangle;

/// Number of overlapping linguistic levels an input domain is split into.
///
/// The level names follow the conventional ordering used by automatic
/// membership generation, from worst to best.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Levels {
    Three,
    Five,
}

impl Levels {
    /// Ordered labels for this partition size.
    pub const fn labels(self) -> &'static [&'static str] {
        match self {
            Levels::Three => &["poor", "average", "good"],
            Levels::Five => &["poor", "mediocre", "average", "decent", "good"],
        }
    }
}

/// One linguistic term of a partition: a label paired with its region.
#[derive(Clone, Copy, Debug)]
pub struct Term {
    pub label: &'static str,
    pub shape: Triangle,
}

/// An input variable fuzzified into overlapping triangular regions.
#[derive(Clone, Debug)]
pub struct Partition {
    name: &'static str,
    lo: f64,
    hi: f64,
    terms: Vec<Term>,
}

impl Partition {
    /// Splits `[lo, hi]` into equal triangular regions, one per level.
    ///
    /// Peaks are evenly spaced across the domain; the first and last terms
    /// are shoulders so the domain edges carry full membership. This mirrors
    /// the standard automatic partition of a numeric universe.
    ///
    /// # Panics
    ///
    /// Panics if `lo >= hi`.
    pub fn automatic(name: &'static str, lo: f64, hi: f64, levels: Levels) -> Self {
        assert!(lo < hi, "partition domain must be a non-empty range");

        let labels = levels.labels();
        let step = (hi - lo) / (labels.len() - 1) as f64;

        let terms = labels
            .iter()
            .enumerate()
            .map(|(i, &label)| {
                let peak = lo + step * i as f64;
                Term {
                    label,
                    shape: Triangle::new((peak - step).max(lo), peak, (peak + step).min(hi)),
                }
            })
            .collect();

        Self {
            name,
            lo,
            hi,
            terms,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// True if this partition defines the given level label.
    pub fn has_level(&self, label: &str) -> bool {
        self.terms.iter().any(|term| term.label == label)
    }

    /// Membership degree of `value` in the named level.
    ///
    /// The value is clamped into the domain first: observations outside the
    /// declared universe are treated as saturated rather than rejected, so a
    /// stale or extreme reading can never poison the whole evaluation.
    pub fn membership(&self, label: &str, value: f64) -> Option<f64> {
        let clamped = value.clamp(self.lo, self.hi);
        self.terms
            .iter()
            .find(|term| term.label == label)
            .map(|term| term.shape.membership(clamped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_level_partition_covers_domain() {
        let part = Partition::automatic("distance", 0.0, 10.0, Levels::Three);

        assert_eq!(part.membership("poor", 0.0), Some(1.0));
        assert_eq!(part.membership("average", 5.0), Some(1.0));
        assert_eq!(part.membership("good", 10.0), Some(1.0));
        // Midpoints split membership between neighboring terms.
        assert_eq!(part.membership("poor", 2.5), Some(0.5));
        assert_eq!(part.membership("average", 2.5), Some(0.5));
    }

    #[test]
    fn five_level_partition_has_all_labels() {
        let part = Partition::automatic("energy", 0.0, 255.0, Levels::Five);
        for label in Levels::Five.labels() {
            assert!(part.has_level(label));
        }
        assert_eq!(part.membership("poor", 0.0), Some(1.0));
        assert_eq!(part.membership("good", 255.0), Some(1.0));
    }

    #[test]
    fn out_of_domain_values_are_clamped() {
        let part = Partition::automatic("distance", 0.0, 10.0, Levels::Three);
        assert_eq!(part.membership("good", 40.0), Some(1.0));
        assert_eq!(part.membership("poor", -3.0), Some(1.0));
    }

    #[test]
    fn unknown_label_is_none() {
        let part = Partition::automatic("distance", 0.0, 10.0, Levels::Three);
        assert_eq!(part.membership("decent", 5.0), None);
    }
}
