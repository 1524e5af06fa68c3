use crate::element::{check_basis_buffer_len, ComponentElement};
use crate::Real;
use eyre::bail;
use nalgebra::{DMatrixSliceMut, Point2, U2};
use numeric_literals::replace_float_literals;

/// Piecewise constant component on the unit triangle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct P0TriangleElement;

impl<T: Real> ComponentElement<T, U2> for P0TriangleElement {
    fn num_dofs(&self) -> usize {
        1
    }

    fn degree(&self) -> usize {
        0
    }

    fn populate_basis(&self, result: &mut [T], _xi: &Point2<T>) -> eyre::Result<()> {
        check_basis_buffer_len(result.len(), 1)?;
        result[0] = T::one();
        Ok(())
    }

    fn populate_basis_gradients(&self, mut result: DMatrixSliceMut<T>, _xi: &Point2<T>) -> eyre::Result<()> {
        result.fill(T::zero());
        Ok(())
    }
}

/// Linear Lagrange component on the unit triangle.
///
/// Degrees of freedom are the vertex values at (0,0), (1,0), (0,1).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct P1TriangleElement;

impl<T: Real> ComponentElement<T, U2> for P1TriangleElement {
    fn num_dofs(&self) -> usize {
        3
    }

    fn degree(&self) -> usize {
        1
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn populate_basis(&self, result: &mut [T], xi: &Point2<T>) -> eyre::Result<()> {
        check_basis_buffer_len(result.len(), 3)?;
        result[0] = 1.0 - xi.x - xi.y;
        result[1] = xi.x;
        result[2] = xi.y;
        Ok(())
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn populate_basis_gradients(&self, mut result: DMatrixSliceMut<T>, _xi: &Point2<T>) -> eyre::Result<()> {
        if result.nrows() != 2 || result.ncols() != 3 {
            bail!("gradient buffer must be 2 x 3 for a P1 triangle element");
        }
        result[(0, 0)] = -1.0;
        result[(1, 0)] = -1.0;
        result[(0, 1)] = 1.0;
        result[(1, 1)] = 0.0;
        result[(0, 2)] = 0.0;
        result[(1, 2)] = 1.0;
        Ok(())
    }
}

/// Quadratic Lagrange component on the unit triangle.
///
/// Degrees of freedom are the three vertex values followed by the three edge
/// midpoint values, with edges ordered (v0, v1), (v1, v2), (v2, v0).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct P2TriangleElement;

impl<T: Real> ComponentElement<T, U2> for P2TriangleElement {
    fn num_dofs(&self) -> usize {
        6
    }

    fn degree(&self) -> usize {
        2
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn populate_basis(&self, result: &mut [T], xi: &Point2<T>) -> eyre::Result<()> {
        check_basis_buffer_len(result.len(), 6)?;
        let l0 = 1.0 - xi.x - xi.y;
        let l1 = xi.x;
        let l2 = xi.y;
        result[0] = l0 * (2.0 * l0 - 1.0);
        result[1] = l1 * (2.0 * l1 - 1.0);
        result[2] = l2 * (2.0 * l2 - 1.0);
        result[3] = 4.0 * l0 * l1;
        result[4] = 4.0 * l1 * l2;
        result[5] = 4.0 * l2 * l0;
        Ok(())
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn populate_basis_gradients(&self, mut result: DMatrixSliceMut<T>, xi: &Point2<T>) -> eyre::Result<()> {
        if result.nrows() != 2 || result.ncols() != 6 {
            bail!("gradient buffer must be 2 x 6 for a P2 triangle element");
        }
        let l0 = 1.0 - xi.x - xi.y;
        let l1 = xi.x;
        let l2 = xi.y;
        // Barycentric gradients: grad l0 = (-1, -1), grad l1 = (1, 0), grad l2 = (0, 1)
        let g0 = [-1.0, -1.0];
        let g1 = [1.0, 0.0];
        let g2 = [0.0, 1.0];
        for r in 0..2 {
            result[(r, 0)] = (4.0 * l0 - 1.0) * g0[r];
            result[(r, 1)] = (4.0 * l1 - 1.0) * g1[r];
            result[(r, 2)] = (4.0 * l2 - 1.0) * g2[r];
            result[(r, 3)] = 4.0 * (l1 * g0[r] + l0 * g1[r]);
            result[(r, 4)] = 4.0 * (l2 * g1[r] + l1 * g2[r]);
            result[(r, 5)] = 4.0 * (l0 * g2[r] + l2 * g0[r]);
        }
        Ok(())
    }
}
