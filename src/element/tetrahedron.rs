use crate::element::{check_basis_buffer_len, ComponentElement};
use crate::Real;
use eyre::bail;
use nalgebra::{DMatrixSliceMut, Point3, U3};
use numeric_literals::replace_float_literals;

/// Linear Lagrange component on the unit tetrahedron.
///
/// Degrees of freedom are the vertex values at (0,0,0), (1,0,0), (0,1,0),
/// (0,0,1).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct P1TetrahedronElement;

impl<T: Real> ComponentElement<T, U3> for P1TetrahedronElement {
    fn num_dofs(&self) -> usize {
        4
    }

    fn degree(&self) -> usize {
        1
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn populate_basis(&self, result: &mut [T], xi: &Point3<T>) -> eyre::Result<()> {
        check_basis_buffer_len(result.len(), 4)?;
        result[0] = 1.0 - xi.x - xi.y - xi.z;
        result[1] = xi.x;
        result[2] = xi.y;
        result[3] = xi.z;
        Ok(())
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn populate_basis_gradients(&self, mut result: DMatrixSliceMut<T>, _xi: &Point3<T>) -> eyre::Result<()> {
        if result.nrows() != 3 || result.ncols() != 4 {
            bail!("gradient buffer must be 3 x 4 for a P1 tetrahedron element");
        }
        result.fill(T::zero());
        for r in 0..3 {
            result[(r, 0)] = -1.0;
            result[(r, r + 1)] = 1.0;
        }
        Ok(())
    }
}
