//! Banded output scale shared by all rules of one control system.

use crate::membership::Triangle;

/// One output category: a contiguous slice of the output scale.
///
/// The region ramps up across the band and peaks at its upper edge, so
/// adjacent bands stay disjoint while every point of the scale belongs to
/// exactly one category.
#[derive(Clone, Copy, Debug)]
pub struct Band {
    pub label: &'static str,
    pub lo: f64,
    pub hi: f64,
    pub shape: Triangle,
}

/// The output scale, partitioned into contiguous equal-width bands in
/// declaration order.
#[derive(Clone, Debug)]
pub struct OutputSpace {
    name: &'static str,
    lo: f64,
    hi: f64,
    bands: Vec<Band>,
}

impl OutputSpace {
    /// Splits `[lo, hi]` into one equal-width band per label.
    ///
    /// # Panics
    ///
    /// Panics if `lo >= hi` or `labels` is empty.
    pub fn banded(name: &'static str, lo: f64, hi: f64, labels: &[&'static str]) -> Self {
        assert!(lo < hi, "output domain must be a non-empty range");
        assert!(!labels.is_empty(), "output space needs at least one band");

        let width = (hi - lo) / labels.len() as f64;
        let bands = labels
            .iter()
            .enumerate()
            .map(|(i, &label)| {
                let band_lo = lo + width * i as f64;
                let band_hi = band_lo + width;
                Band {
                    label,
                    lo: band_lo,
                    hi: band_hi,
                    shape: Triangle::new(band_lo, band_hi, band_hi),
                }
            })
            .collect();

        Self {
            name,
            lo,
            hi,
            bands,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// True if some band carries the given label.
    pub fn has_category(&self, label: &str) -> bool {
        self.bands.iter().any(|band| band.label == label)
    }

    /// Resolves a crisp scalar to the band containing it.
    ///
    /// A value exactly on a shared edge resolves to the lower band, so the
    /// mapping is total over `[lo, hi]` and free of overlap.
    pub fn band_of(&self, crisp: f64) -> Option<(usize, &'static str)> {
        if crisp < self.lo || crisp > self.hi {
            return None;
        }
        self.bands
            .iter()
            .enumerate()
            .find(|(_, band)| crisp <= band.hi)
            .map(|(index, band)| (index, band.label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_tile_the_scale_in_declaration_order() {
        let out = OutputSpace::banded("output", 0.0, 40.0, &["kill", "flag", "recharge", "safe"]);

        assert_eq!(out.band_of(5.0), Some((0, "kill")));
        assert_eq!(out.band_of(15.0), Some((1, "flag")));
        assert_eq!(out.band_of(25.0), Some((2, "recharge")));
        assert_eq!(out.band_of(35.0), Some((3, "safe")));
    }

    #[test]
    fn shared_edge_resolves_to_lower_band() {
        let out = OutputSpace::banded("output", 0.0, 40.0, &["kill", "flag", "recharge", "safe"]);

        assert_eq!(out.band_of(10.0), Some((0, "kill")));
        assert_eq!(out.band_of(20.0), Some((1, "flag")));
        assert_eq!(out.band_of(40.0), Some((3, "safe")));
    }

    #[test]
    fn outside_the_scale_is_none() {
        let out = OutputSpace::banded("output", 0.0, 40.0, &["kill", "flag"]);
        assert_eq!(out.band_of(-0.1), None);
        assert_eq!(out.band_of(40.1), None);
    }
}
