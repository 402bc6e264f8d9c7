//! Type definitions.

/// A quadrature rule on the reference triangle.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadratureRule {
    /// The points of the rule, as reference coordinates (x, y).
    pub points: Vec<[f64; 2]>,
    /// The weights of the rule. They sum to one.
    pub weights: Vec<f64>,
}

impl QuadratureRule {
    /// Number of points.
    pub fn npoints(&self) -> usize {
        self.points.len()
    }

    /// Iterate over (point, weight) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&[f64; 2], f64)> + '_ {
        self.points.iter().zip(self.weights.iter().copied())
    }
}

/// The pair of rules used during assembly.
#[derive(Debug, Clone)]
pub struct QuadratureRules {
    /// Rule for elements that do not contain the collocation point
    pub regular: QuadratureRule,
    /// Rule for the element that contains the collocation point
    pub singular: QuadratureRule,
}

impl QuadratureRules {
    /// Build the regular 7-point rule and the derived 21-point singular rule.
    pub fn new() -> Self {
        let regular = super::simplex_rules::regular_rule();
        let singular = super::singular::singular_rule(&regular);
        Self { regular, singular }
    }

    /// Select the rule for a collocation point that is, or is not, on the integrated element.
    pub fn rule(&self, on_element: bool) -> &QuadratureRule {
        if on_element {
            &self.singular
        } else {
            &self.regular
        }
    }
}

impl Default for QuadratureRules {
    fn default() -> Self {
        Self::new()
    }
}
