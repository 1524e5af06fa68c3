use crate::element::{check_basis_buffer_len, ComponentElement};
use crate::Real;
use eyre::bail;
use nalgebra::{DMatrixSliceMut, Point1, U1};
use numeric_literals::replace_float_literals;

/// Piecewise constant component on the unit segment.
///
/// This is the boundary-trace element of a lowest-order normal-flux
/// component: its single basis function is the unit normal flux density on
/// the facet.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct P0SegmentElement;

impl<T: Real> ComponentElement<T, U1> for P0SegmentElement {
    fn num_dofs(&self) -> usize {
        1
    }

    fn degree(&self) -> usize {
        0
    }

    fn populate_basis(&self, result: &mut [T], _xi: &Point1<T>) -> eyre::Result<()> {
        check_basis_buffer_len(result.len(), 1)?;
        result[0] = T::one();
        Ok(())
    }
}

/// Linear Lagrange component on the unit segment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct P1SegmentElement;

impl<T: Real> ComponentElement<T, U1> for P1SegmentElement {
    fn num_dofs(&self) -> usize {
        2
    }

    fn degree(&self) -> usize {
        1
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn populate_basis(&self, result: &mut [T], xi: &Point1<T>) -> eyre::Result<()> {
        check_basis_buffer_len(result.len(), 2)?;
        result[0] = 1.0 - xi.x;
        result[1] = xi.x;
        Ok(())
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn populate_basis_gradients(&self, mut result: DMatrixSliceMut<T>, _xi: &Point1<T>) -> eyre::Result<()> {
        if result.nrows() != 1 || result.ncols() != 2 {
            bail!("gradient buffer must be 1 x 2 for a P1 segment element");
        }
        result[(0, 0)] = -1.0;
        result[(0, 1)] = 1.0;
        Ok(())
    }
}
