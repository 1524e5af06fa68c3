use crate::element::ComponentElement;
use crate::Real;
use eyre::bail;
use nalgebra::{Point2, U2};

/// Lowest-order Raviart-Thomas normal-trace component on the unit triangle.
///
/// Flux-trace forms only ever see an H(div) component through its normal
/// trace on element facets, so this element exposes exactly that: basis
/// function `i` has unit normal flux density on facet `i` and vanishing
/// normal trace on the other facets. Facets are ordered (v0, v1), (v1, v2),
/// (v2, v0) like the facets of the affine triangle geometry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct RaviartThomasTriangleElement;

impl<T: Real> ComponentElement<T, U2> for RaviartThomasTriangleElement {
    fn num_dofs(&self) -> usize {
        3
    }

    fn degree(&self) -> usize {
        0
    }

    fn populate_basis(&self, _result: &mut [T], _xi: &Point2<T>) -> eyre::Result<()> {
        bail!("normal-trace elements do not provide scalar basis values; use the facet normal trace")
    }

    fn populate_facet_normal_trace(
        &self,
        facet: usize,
        result: &mut [T],
        _xi: &Point2<T>,
    ) -> eyre::Result<()> {
        if facet >= 3 {
            bail!("facet index {} out of bounds for a triangle", facet);
        }
        if result.len() != 3 {
            bail!(
                "normal trace buffer has length {}, element has 3 degrees of freedom",
                result.len()
            );
        }
        for (i, value) in result.iter_mut().enumerate() {
            *value = if i == facet { T::one() } else { T::zero() };
        }
        Ok(())
    }
}
