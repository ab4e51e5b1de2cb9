//! Rule-table validation and Mamdani-style evaluation.

use crate::error::FuzzyError;
use crate::output::OutputSpace;
use crate::rule::{Condition, Rule};
use crate::variable::Partition;

/// A crisp observation: one value per declared input variable.
#[derive(Clone, Debug, Default)]
pub struct Sample {
    values: Vec<(&'static str, f64)>,
}

impl Sample {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or overwrites) the value of one variable.
    pub fn with(mut self, variable: &'static str, value: f64) -> Self {
        if let Some(entry) = self.values.iter_mut().find(|(name, _)| *name == variable) {
            entry.1 = value;
        } else {
            self.values.push((variable, value));
        }
        self
    }

    fn get(&self, variable: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(name, _)| *name == variable)
            .map(|(_, value)| *value)
    }
}

/// The outcome of one evaluation: the defuzzified scalar and its band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Verdict {
    pub crisp: f64,
    pub band_index: usize,
    pub band: &'static str,
}

/// A validated fuzzy inference system: input partitions, banded output,
/// and the rule table connecting them.
///
/// # Determinism
///
/// Evaluation is a pure function of the sample. No randomness, no
/// accumulated state between calls: the same inputs always yield the
/// same [`Verdict`].
#[derive(Clone, Debug)]
pub struct ControlSystem {
    inputs: Vec<Partition>,
    output: OutputSpace,
    rules: Vec<Rule>,
    resolution: f64,
}

impl ControlSystem {
    /// Builds a system, rejecting rules that reference undeclared variables,
    /// levels, or output categories.
    pub fn new(
        inputs: Vec<Partition>,
        output: OutputSpace,
        rules: Vec<Rule>,
    ) -> Result<Self, FuzzyError> {
        let system = Self {
            inputs,
            output,
            rules,
            resolution: 1.0,
        };

        for rule in &system.rules {
            system.check_condition(&rule.when)?;
            if !system.output.has_category(rule.category) {
                return Err(FuzzyError::UnknownCategory {
                    category: rule.category,
                });
            }
        }

        Ok(system)
    }

    /// Overrides the sampling step used for centroid integration.
    ///
    /// # Panics
    ///
    /// Panics if `step` is not strictly positive.
    pub fn with_resolution(mut self, step: f64) -> Self {
        assert!(step > 0.0, "centroid resolution must be positive");
        self.resolution = step;
        self
    }

    pub fn output(&self) -> &OutputSpace {
        &self.output
    }

    fn check_condition(&self, condition: &Condition) -> Result<(), FuzzyError> {
        match condition {
            Condition::Is { variable, level } => {
                let (variable, level) = (*variable, *level);
                let partition = self
                    .inputs
                    .iter()
                    .find(|p| p.name() == variable)
                    .ok_or(FuzzyError::UnknownVariable { variable })?;
                if !partition.has_level(level) {
                    return Err(FuzzyError::UnknownLevel { variable, level });
                }
                Ok(())
            }
            Condition::All(children) | Condition::Any(children) => {
                children.iter().try_for_each(|child| self.check_condition(child))
            }
        }
    }

    /// Firing strength of a condition tree against a sample.
    fn strength(&self, condition: &Condition, sample: &Sample) -> Result<f64, FuzzyError> {
        match condition {
            Condition::Is { variable, level } => {
                let (variable, level) = (*variable, *level);
                let partition = self
                    .inputs
                    .iter()
                    .find(|p| p.name() == variable)
                    .ok_or(FuzzyError::UnknownVariable { variable })?;
                let value = sample
                    .get(variable)
                    .ok_or(FuzzyError::MissingInput { variable })?;
                partition
                    .membership(level, value)
                    .ok_or(FuzzyError::UnknownLevel { variable, level })
            }
            Condition::All(children) => {
                let mut degree = 1.0_f64;
                for child in children {
                    degree = degree.min(self.strength(child, sample)?);
                }
                Ok(degree)
            }
            Condition::Any(children) => {
                let mut degree = 0.0_f64;
                for child in children {
                    degree = degree.max(self.strength(child, sample)?);
                }
                Ok(degree)
            }
        }
    }

    /// Runs the full inference pipeline for one sample.
    ///
    /// Rule strengths are composed with min/max, aggregated per category by
    /// maximum, clipped onto the category regions, and defuzzified with the
    /// centroid of the aggregated area. The crisp result resolves to exactly
    /// one output band (lower band wins on exact edges).
    pub fn evaluate(&self, sample: &Sample) -> Result<Verdict, FuzzyError> {
        let bands = self.output.bands();
        let mut activation = vec![0.0_f64; bands.len()];

        for rule in &self.rules {
            let strength = self.strength(&rule.when, sample)? * rule.weight;
            if strength <= 0.0 {
                continue;
            }
            // Constructor validated the category, so the position exists.
            if let Some(index) = bands.iter().position(|band| band.label == rule.category) {
                activation[index] = activation[index].max(strength);
            }
        }

        // Centroid of the aggregated (clipped) output area.
        let mut numerator = 0.0_f64;
        let mut denominator = 0.0_f64;
        let mut x = self.output.lo();
        while x <= self.output.hi() {
            let mut mu = 0.0_f64;
            for (band, act) in bands.iter().zip(&activation) {
                if *act > 0.0 {
                    mu = mu.max(act.min(band.shape.membership(x)));
                }
            }
            numerator += mu * x;
            denominator += mu;
            x += self.resolution;
        }

        if denominator == 0.0 {
            return Err(FuzzyError::NoActivation);
        }

        let crisp = numerator / denominator;
        let (band_index, band) = self
            .output
            .band_of(crisp)
            .expect("centroid of a bounded area stays inside the output scale");

        Ok(Verdict {
            crisp,
            band_index,
            band,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{all, any, term};
    use crate::variable::Levels;

    fn two_band_system() -> ControlSystem {
        ControlSystem::new(
            vec![
                Partition::automatic("threat", 0.0, 10.0, Levels::Three),
                Partition::automatic("energy", 0.0, 100.0, Levels::Three),
            ],
            OutputSpace::banded("output", 0.0, 20.0, &["fight", "flee"]),
            vec![
                Rule::new(
                    all([term("threat", "poor"), term("energy", "good")]),
                    "fight",
                ),
                Rule::new(
                    any([term("threat", "good"), term("energy", "poor")]),
                    "flee",
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn picks_the_dominant_band() {
        let system = two_band_system();

        let close_and_strong = Sample::new().with("threat", 0.0).with("energy", 100.0);
        assert_eq!(system.evaluate(&close_and_strong).unwrap().band, "fight");

        let far_and_drained = Sample::new().with("threat", 10.0).with("energy", 0.0);
        assert_eq!(system.evaluate(&far_and_drained).unwrap().band, "flee");
    }

    #[test]
    fn evaluation_is_deterministic() {
        let system = two_band_system();
        let sample = Sample::new().with("threat", 3.0).with("energy", 60.0);

        let first = system.evaluate(&sample).unwrap();
        let second = system.evaluate(&sample).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn finer_resolution_keeps_the_same_band() {
        let coarse = two_band_system();
        let fine = two_band_system().with_resolution(0.25);
        let sample = Sample::new().with("threat", 8.0).with("energy", 20.0);

        let a = coarse.evaluate(&sample).unwrap();
        let b = fine.evaluate(&sample).unwrap();
        assert_eq!(a.band, b.band);
    }

    #[test]
    fn no_firing_rule_is_an_error() {
        let system = ControlSystem::new(
            vec![Partition::automatic("threat", 0.0, 10.0, Levels::Three)],
            OutputSpace::banded("output", 0.0, 10.0, &["fight"]),
            vec![Rule::new(term("threat", "good"), "fight")],
        )
        .unwrap();

        let sample = Sample::new().with("threat", 0.0);
        assert_eq!(system.evaluate(&sample), Err(FuzzyError::NoActivation));
    }

    #[test]
    fn missing_input_is_an_error() {
        let system = two_band_system();
        let sample = Sample::new().with("threat", 3.0);
        assert_eq!(
            system.evaluate(&sample),
            Err(FuzzyError::MissingInput { variable: "energy" })
        );
    }

    #[test]
    fn construction_rejects_unknown_references() {
        let inputs = vec![Partition::automatic("threat", 0.0, 10.0, Levels::Three)];
        let output = OutputSpace::banded("output", 0.0, 10.0, &["fight"]);

        let bad_level = ControlSystem::new(
            inputs.clone(),
            output.clone(),
            vec![Rule::new(term("threat", "decent"), "fight")],
        );
        assert_eq!(
            bad_level.unwrap_err(),
            FuzzyError::UnknownLevel {
                variable: "threat",
                level: "decent"
            }
        );

        let bad_category = ControlSystem::new(
            inputs,
            output,
            vec![Rule::new(term("threat", "good"), "surrender")],
        );
        assert_eq!(
            bad_category.unwrap_err(),
            FuzzyError::UnknownCategory {
                category: "surrender"
            }
        );
    }

    #[test]
    fn zero_weight_mutes_a_rule() {
        let system = ControlSystem::new(
            vec![Partition::automatic("threat", 0.0, 10.0, Levels::Three)],
            OutputSpace::banded("output", 0.0, 20.0, &["fight", "flee"]),
            vec![
                Rule::new(term("threat", "good"), "fight").with_weight(0.0),
                Rule::new(term("threat", "good"), "flee"),
            ],
        )
        .unwrap();

        let verdict = system.evaluate(&Sample::new().with("threat", 10.0)).unwrap();
        assert_eq!(verdict.band, "flee");
    }
}
