//! Fixed rule for regular integrals on the triangle.

use crate::quadrature::types::QuadratureRule;

lazy_static! {
    /// The 7-point rule of degree 5. Entries are (x, y, weight).
    static ref REGULAR_TRIANGLE_RULE: [(f64, f64, f64); 7] = {
        let a1 = 0.0597158717897698;
        let b1 = 0.470142064105115;
        let w1 = 0.132394152788506;
        let a2 = 0.797426985353087;
        let b2 = 0.101286507323456;
        let w2 = 0.125939180544827;
        [
            (1.0 / 3.0, 1.0 / 3.0, 0.225),
            (a2, b2, w2),
            (b2, a2, w2),
            (b2, b2, w2),
            (b1, a1, w1),
            (a1, b1, w1),
            (b1, b1, w1),
        ]
    };
}

/// Return the regular 7-point rule.
///
/// The rule integrates every polynomial of degree at most 5 exactly.
pub fn regular_rule() -> QuadratureRule {
    QuadratureRule {
        points: REGULAR_TRIANGLE_RULE.iter().map(|&(x, y, _)| [x, y]).collect(),
        weights: REGULAR_TRIANGLE_RULE.iter().map(|&(_, _, w)| w).collect(),
    }
}
