use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Tolerance on the sum of the species fractions in a mixture
pub const FRACTION_TOLERANCE: f64 = 1e-6;

/// A single residual-gas species
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GasComponent {
    /// Label of the species, e.g. `"CO"`
    pub species: String,
    /// Molar fraction of the species in the mixture, in (0, 1]
    pub fraction: f64,
    /// Molar mass in g/mol
    pub molar_mass: f64,
    /// Nuclear charge. May be fractional for a molecule averaged over its atoms
    pub atomic_number: f64,
    /// Number of atoms in one molecule
    pub atoms_per_molecule: f64,
}

/// A residual-gas composition
///
/// Fractions must sum to one within [`FRACTION_TOLERANCE`]; they are never renormalised.
#[derive(Clone, Debug, PartialEq)]
pub struct GasMixture {
    components: Vec<GasComponent>,
}

/// Effective scalars of a [`GasMixture`] consumed by the scattering models
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MixtureSummary {
    /// Fraction-weighted mean nuclear charge $\sum_i f_i Z_i$
    pub z_avg: f64,
    /// RMS nuclear charge $\sqrt{\sum_i f_i Z_i^2}$
    ///
    /// Scattering and radiation cross-sections scale with $Z^2$, so this is the charge to use in
    /// those formulas.
    pub z_eff: f64,
    /// Fraction-weighted molar mass in g/mol
    pub a_avg: f64,
    /// Fraction-weighted number of atoms per molecule
    pub nz_avg: f64,
}

impl GasMixture {
    /// Validate a set of components as a mixture
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] if the mixture is empty, a species is repeated, any
    /// fraction, mass or charge is non-positive, a molecule has fewer than one atom, or the
    /// fractions do not sum to one.
    pub fn new(components: Vec<GasComponent>) -> Result<Self> {
        if components.is_empty() {
            return Err(Error::configuration("gas mixture has no components"));
        }

        let mut seen = HashSet::new();
        for component in &components {
            if !seen.insert(component.species.as_str()) {
                return Err(Error::configuration(format!(
                    "species {} appears more than once in the mixture",
                    component.species
                )));
            }
            component.validate()?;
        }

        // The sum itself carries rounding error of a few ulp
        let total: f64 = components.iter().map(|c| c.fraction).sum();
        if (total - 1.).abs() > FRACTION_TOLERANCE + 4. * f64::EPSILON {
            return Err(Error::configuration(format!(
                "gas fractions sum to {total}, expected 1 ± {FRACTION_TOLERANCE}"
            )));
        }

        Ok(Self { components })
    }

    #[must_use]
    pub fn components(&self) -> &[GasComponent] {
        &self.components
    }

    /// Reduce the mixture to its effective scalars
    #[must_use]
    pub fn summarise(&self) -> MixtureSummary {
        MixtureSummary {
            z_avg: self.weighted(|c| c.atomic_number),
            z_eff: self.weighted(|c| c.atomic_number.powi(2)).sqrt(),
            a_avg: self.weighted(|c| c.molar_mass),
            nz_avg: self.weighted(|c| c.atoms_per_molecule),
        }
    }

    fn weighted(&self, property: impl Fn(&GasComponent) -> f64) -> f64 {
        self.components
            .iter()
            .map(|c| c.fraction * property(c))
            .sum()
    }
}

impl GasComponent {
    fn validate(&self) -> Result<()> {
        let positive = [
            ("fraction", self.fraction),
            ("molar mass", self.molar_mass),
            ("atomic number", self.atomic_number),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.) {
                return Err(Error::configuration(format!(
                    "{name} of {} must be positive, got {value}",
                    self.species
                )));
            }
        }
        if self.fraction > 1. {
            return Err(Error::configuration(format!(
                "fraction of {} exceeds one: {}",
                self.species, self.fraction
            )));
        }
        if !(self.atoms_per_molecule >= 1.) {
            return Err(Error::configuration(format!(
                "{} must have at least one atom per molecule, got {}",
                self.species, self.atoms_per_molecule
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{GasComponent, GasMixture};
    use crate::{Error, Result};

    fn component(species: &str, fraction: f64, molar_mass: f64, z: f64, nz: f64) -> GasComponent {
        GasComponent {
            species: species.to_owned(),
            fraction,
            molar_mass,
            atomic_number: z,
            atoms_per_molecule: nz,
        }
    }

    fn vacuum_chamber_mixture() -> Vec<GasComponent> {
        vec![
            component("H2", 0.7, 2.016, 1., 2.),
            component("CO", 0.2, 28.010, 7., 2.),
            component("H2O", 0.1, 18.015, 3.33, 3.),
        ]
    }

    #[test]
    fn residual_gas_mixture_reduces_to_expected_scalars() -> Result<()> {
        let summary = GasMixture::new(vacuum_chamber_mixture())?.summarise();

        approx::assert_relative_eq!(summary.z_avg, 2.433, max_relative = 1e-9);
        approx::assert_relative_eq!(summary.a_avg, 8.8147, max_relative = 1e-9);
        approx::assert_relative_eq!(
            summary.z_eff,
            (0.7 + 0.2 * 49. + 0.1 * 11.0889_f64).sqrt(),
            max_relative = 1e-12
        );
        approx::assert_relative_eq!(summary.z_eff, 3.4072, epsilon = 1e-4);
        approx::assert_relative_eq!(summary.nz_avg, 2.1, max_relative = 1e-12);
        Ok(())
    }

    #[test]
    fn fractions_far_from_unity_are_rejected() {
        for total in [0.9, 1.1] {
            let mixture = vec![
                component("N2", total - 0.5, 28.014, 7., 2.),
                component("H2", 0.5, 2.016, 1., 2.),
            ];
            assert!(matches!(
                GasMixture::new(mixture),
                Err(Error::Configuration(_))
            ));
        }
    }

    #[test]
    fn fractions_within_tolerance_are_accepted() -> Result<()> {
        for total in [0.999_999, 1.000_001] {
            let mixture = vec![
                component("N2", total - 0.5, 28.014, 7., 2.),
                component("H2", 0.5, 2.016, 1., 2.),
            ];
            GasMixture::new(mixture)?;
        }
        Ok(())
    }

    #[test]
    fn non_positive_properties_are_rejected() {
        let cases = [
            component("X", 1., 0., 1., 1.),
            component("X", 1., 2., -1., 1.),
            component("X", 1., 2., 1., 0.5),
            component("X", 1., f64::NAN, 1., 1.),
        ];
        for case in cases {
            assert!(matches!(
                GasMixture::new(vec![case]),
                Err(Error::Configuration(_))
            ));
        }
        assert!(matches!(GasMixture::new(vec![]), Err(Error::Configuration(_))));
    }

    #[test]
    fn repeated_species_are_rejected() {
        let mixture = vec![
            component("H2", 0.5, 2.016, 1., 2.),
            component("H2", 0.5, 2.016, 1., 2.),
        ];
        assert!(matches!(
            GasMixture::new(mixture),
            Err(Error::Configuration(_))
        ));
    }

    proptest! {
        #[test]
        fn rms_charge_bounds_mean_charge(
            z_a in 0.5f64..20.,
            z_b in 0.5f64..20.,
            fraction in 0.01f64..0.99,
        ) {
            let mixture = GasMixture::new(vec![
                component("A", fraction, 10., z_a, 1.),
                component("B", 1. - fraction, 10., z_b, 1.),
            ]).unwrap();
            let summary = mixture.summarise();

            prop_assert!(summary.z_eff >= summary.z_avg * (1. - 1e-12));
            if (z_a - z_b).abs() > 1e-3 {
                prop_assert!(summary.z_eff > summary.z_avg);
            }
        }

        #[test]
        fn identical_charges_have_equal_mean_and_rms(z in 0.5f64..20., fraction in 0.01f64..0.99) {
            let mixture = GasMixture::new(vec![
                component("A", fraction, 10., z, 1.),
                component("B", 1. - fraction, 20., z, 2.),
            ]).unwrap();
            let summary = mixture.summarise();

            prop_assert!((summary.z_eff - summary.z_avg).abs() <= 1e-12 * z);
        }
    }
}
