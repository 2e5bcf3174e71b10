//! Chemical species bookkeeping.
//!
//! The optimizer only consumes the numeric outputs of this module: the formula
//! matrix (mass-balance coefficients) and the per-species charge and molar mass
//! vectors.

use ndarray::{Array1, Array2};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// A chemical element, identified by its symbol.
///
/// Equality and ordering use the symbol only.
#[derive(Debug, Clone)]
pub struct Element {
    symbol: String,
    molar_mass: f64,
}

impl Element {
    /// `molar_mass` in kg/mol.
    pub fn new(symbol: impl Into<String>, molar_mass: f64) -> Self {
        Self {
            symbol: symbol.into(),
            molar_mass,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn molar_mass(&self) -> f64 {
        self.molar_mass
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

impl Eq for Element {}

impl PartialOrd for Element {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Element {
    fn cmp(&self, other: &Self) -> Ordering {
        self.symbol.cmp(&other.symbol)
    }
}

/// A chemical species: its elemental composition, charge and molar mass.
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    name: String,
    formula: String,
    elements: Vec<(Element, f64)>,
    charge: f64,
    molar_mass: Option<f64>,
}

impl Species {
    /// A neutral species with no elements yet.
    pub fn new(name: impl Into<String>, formula: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            formula: formula.into(),
            elements: Vec::new(),
            charge: 0.0,
            molar_mass: None,
        }
    }

    /// Adds `atoms` of `element` to the composition. Repeating an element
    /// accumulates its coefficient.
    pub fn with_element(mut self, element: Element, atoms: f64) -> Self {
        match self.elements.iter_mut().find(|(e, _)| *e == element) {
            Some((_, coefficient)) => *coefficient += atoms,
            None => self.elements.push((element, atoms)),
        }
        self
    }

    pub fn with_charge(mut self, charge: f64) -> Self {
        self.charge = charge;
        self
    }

    /// Overrides the molar mass derived from the composition.
    pub fn with_molar_mass(mut self, molar_mass: f64) -> Self {
        self.molar_mass = Some(molar_mass);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn formula(&self) -> &str {
        &self.formula
    }

    pub fn elements(&self) -> &[(Element, f64)] {
        &self.elements
    }

    pub fn charge(&self) -> f64 {
        self.charge
    }

    /// Molar mass in kg/mol: the explicit value if one was set, otherwise
    /// the sum over the composition.
    pub fn molar_mass(&self) -> f64 {
        self.molar_mass.unwrap_or_else(|| {
            self.elements
                .iter()
                .map(|(e, atoms)| atoms * e.molar_mass())
                .sum()
        })
    }

    /// Stoichiometric coefficient of `element` in this species, `0` if absent.
    pub fn atoms(&self, element: &Element) -> f64 {
        self.elements
            .iter()
            .find(|(e, _)| e == element)
            .map_or(0.0, |(_, atoms)| *atoms)
    }
}

/// Formula matrix with one row per element and one column per species; entry
/// `(j, i)` is the number of atoms of `elements[j]` in `species[i]`.
pub fn formula_matrix(species: &[Species], elements: &[Element]) -> Array2<f64> {
    Array2::from_shape_fn((elements.len(), species.len()), |(j, i)| {
        species[i].atoms(&elements[j])
    })
}

/// Distinct elements appearing in `species`, sorted by symbol.
pub fn collect_elements(species: &[Species]) -> Vec<Element> {
    species
        .iter()
        .flat_map(|s| s.elements().iter().map(|(e, _)| e.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn collect_charges(species: &[Species]) -> Array1<f64> {
    species.iter().map(Species::charge).collect()
}

pub fn collect_molar_masses(species: &[Species]) -> Array1<f64> {
    species.iter().map(Species::molar_mass).collect()
}

#[cfg(test)]
mod tests {
    use super::{
        Element, Species, collect_charges, collect_elements, collect_molar_masses,
        formula_matrix,
    };
    use ndarray::array;
    use spectral::prelude::*;

    fn carbon() -> Element {
        Element::new("C", 0.012011)
    }
    fn hydrogen() -> Element {
        Element::new("H", 0.001008)
    }
    fn oxygen() -> Element {
        Element::new("O", 0.015999)
    }

    fn water() -> Species {
        Species::new("H2O(l)", "H2O")
            .with_element(hydrogen(), 2.0)
            .with_element(oxygen(), 1.0)
    }

    fn carbon_dioxide() -> Species {
        Species::new("CO2(g)", "CO2")
            .with_element(carbon(), 1.0)
            .with_element(oxygen(), 2.0)
    }

    #[test]
    fn formula_matrix_has_a_row_per_element_and_a_column_per_species() {
        let species = [water(), carbon_dioxide()];
        let elements = [carbon(), hydrogen(), oxygen()];
        let a = formula_matrix(&species, &elements);
        assert_that!(a).is_equal_to(array![[0.0, 1.0], [2.0, 0.0], [1.0, 2.0]]);
    }

    #[test]
    fn collected_elements_are_unique_and_sorted() {
        let species = [water(), carbon_dioxide()];
        let symbols: Vec<String> = collect_elements(&species)
            .iter()
            .map(|e| e.symbol().to_string())
            .collect();
        assert_that!(symbols).is_equal_to(vec!["C".to_string(), "H".into(), "O".into()]);
    }

    #[test]
    fn absent_element_has_zero_atoms() {
        assert_that!(water().atoms(&carbon())).is_equal_to(0.0);
        assert_that!(carbon_dioxide().atoms(&oxygen())).is_equal_to(2.0);
    }

    #[test]
    fn repeated_element_accumulates() {
        let acetic = Species::new("CH3COOH(aq)", "CH3COOH")
            .with_element(carbon(), 1.0)
            .with_element(hydrogen(), 3.0)
            .with_element(carbon(), 1.0)
            .with_element(oxygen(), 2.0)
            .with_element(hydrogen(), 1.0);
        assert_that!(acetic.elements().len()).is_equal_to(3);
        assert_that!(acetic.atoms(&carbon())).is_equal_to(2.0);
        assert_that!(acetic.atoms(&hydrogen())).is_equal_to(4.0);
    }

    #[test]
    fn charges_and_molar_masses_follow_species_order() {
        let hydroxide = Species::new("OH-", "OH-")
            .with_element(oxygen(), 1.0)
            .with_element(hydrogen(), 1.0)
            .with_charge(-1.0);
        let species = [water(), hydroxide, carbon_dioxide().with_molar_mass(0.044)];
        assert_that!(collect_charges(&species)).is_equal_to(array![0.0, -1.0, 0.0]);

        let masses = collect_molar_masses(&species);
        assert_that!(masses[0]).is_close_to(0.018015, 1e-12);
        assert_that!(masses[1]).is_close_to(0.017007, 1e-12);
        assert_that!(masses[2]).is_equal_to(0.044);
    }
}
