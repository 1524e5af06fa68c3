//! Reusable buffers for intermediate assembly data.
use crate::allocators::DimAllocator;
use crate::geometry::{SurfaceGeometry, VolumeGeometry};
use crate::{Real, SmallDim};
use nalgebra::{DMatrix, DMatrixSlice, DMatrixSliceMut, DefaultAllocator, OMatrix, OPoint};

/// Storage for basis values and gradients of the trial and test components
/// of a paired-component form.
#[derive(Debug)]
pub struct BasisFunctionBuffer<T: Real> {
    trial_values: Vec<T>,
    test_values: Vec<T>,
    trial_gradients: DMatrix<T>,
    test_gradients: DMatrix<T>,
    trial_gradients_phys: DMatrix<T>,
    test_gradients_phys: DMatrix<T>,
}

impl<T: Real> Default for BasisFunctionBuffer<T> {
    fn default() -> Self {
        Self {
            trial_values: Vec::new(),
            test_values: Vec::new(),
            trial_gradients: DMatrix::zeros(0, 0),
            test_gradients: DMatrix::zeros(0, 0),
            trial_gradients_phys: DMatrix::zeros(0, 0),
            test_gradients_phys: DMatrix::zeros(0, 0),
        }
    }
}

impl<T: Real> BasisFunctionBuffer<T> {
    pub fn resize(&mut self, trial_dofs: usize, test_dofs: usize, reference_dim: usize) {
        self.trial_values.resize(trial_dofs, T::zero());
        self.test_values.resize(test_dofs, T::zero());
        self.trial_gradients
            .resize_mut(reference_dim, trial_dofs, T::zero());
        self.test_gradients
            .resize_mut(reference_dim, test_dofs, T::zero());
        self.trial_gradients_phys
            .resize_mut(reference_dim, trial_dofs, T::zero());
        self.test_gradients_phys
            .resize_mut(reference_dim, test_dofs, T::zero());
    }

    pub fn trial_values(&self) -> &[T] {
        &self.trial_values
    }

    pub fn trial_values_mut(&mut self) -> &mut [T] {
        &mut self.trial_values
    }

    pub fn test_values(&self) -> &[T] {
        &self.test_values
    }

    pub fn test_values_mut(&mut self) -> &mut [T] {
        &mut self.test_values
    }

    pub fn trial_gradients_mut(&mut self) -> DMatrixSliceMut<T> {
        DMatrixSliceMut::from(&mut self.trial_gradients)
    }

    pub fn test_gradients_mut(&mut self) -> DMatrixSliceMut<T> {
        DMatrixSliceMut::from(&mut self.test_gradients)
    }

    pub fn trial_physical_gradients(&self) -> DMatrixSlice<T> {
        DMatrixSlice::from(&self.trial_gradients_phys)
    }

    pub fn test_physical_gradients(&self) -> DMatrixSlice<T> {
        DMatrixSlice::from(&self.test_gradients_phys)
    }

    /// Transforms the stored reference trial gradients to physical gradients
    /// by applying `J^{-T}`.
    pub fn transform_trial_gradients_to_physical<D>(&mut self, jacobian_inv_t: &OMatrix<T, D, D>)
    where
        D: SmallDim,
        DefaultAllocator: DimAllocator<T, D>,
    {
        transform_gradients(
            &self.trial_gradients,
            &mut self.trial_gradients_phys,
            jacobian_inv_t,
        );
    }

    /// Transforms the stored reference test gradients to physical gradients
    /// by applying `J^{-T}`.
    pub fn transform_test_gradients_to_physical<D>(&mut self, jacobian_inv_t: &OMatrix<T, D, D>)
    where
        D: SmallDim,
        DefaultAllocator: DimAllocator<T, D>,
    {
        transform_gradients(
            &self.test_gradients,
            &mut self.test_gradients_phys,
            jacobian_inv_t,
        );
    }
}

fn transform_gradients<T, D>(
    reference: &DMatrix<T>,
    physical: &mut DMatrix<T>,
    jacobian_inv_t: &OMatrix<T, D, D>,
) where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    let d = D::dim();
    assert_eq!(reference.nrows(), d, "Gradient buffer dimension mismatch");
    assert_eq!(physical.nrows(), d, "Gradient buffer dimension mismatch");
    assert_eq!(reference.ncols(), physical.ncols());
    for col in 0..reference.ncols() {
        for row in 0..d {
            let mut value = T::zero();
            for k in 0..d {
                value += jacobian_inv_t[(row, k)] * reference[(k, col)];
            }
            physical[(row, col)] = value;
        }
    }
}

/// Storage for quadrature weights and points, populated from an element
/// geometry.
#[derive(Debug)]
pub struct QuadratureBuffer<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    weights: Vec<T>,
    points: Vec<OPoint<T, D>>,
}

impl<T, D> Default for QuadratureBuffer<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    fn default() -> Self {
        Self {
            weights: Vec::new(),
            points: Vec::new(),
        }
    }
}

impl<T, D> QuadratureBuffer<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    /// Populates the buffer with a volume rule of the given strength.
    pub fn populate_volume(
        &mut self,
        geometry: &dyn VolumeGeometry<T, D>,
        strength: usize,
    ) -> eyre::Result<()> {
        geometry.populate_quadrature(strength, &mut self.weights, &mut self.points)
    }

    /// Populates the buffer with a facet rule of the given strength, with
    /// points embedded in the element's reference coordinates.
    pub fn populate_facet(
        &mut self,
        geometry: &dyn VolumeGeometry<T, D>,
        facet: usize,
        strength: usize,
    ) -> eyre::Result<()> {
        geometry.populate_facet_quadrature(facet, strength, &mut self.weights, &mut self.points)
    }

    /// Populates the buffer with a rule on a standalone boundary facet.
    pub fn populate_surface(
        &mut self,
        geometry: &dyn SurfaceGeometry<T, D>,
        strength: usize,
    ) -> eyre::Result<()> {
        geometry.populate_quadrature(strength, &mut self.weights, &mut self.points)
    }

    pub fn weights(&self) -> &[T] {
        &self.weights
    }

    pub fn points(&self) -> &[OPoint<T, D>] {
        &self.points
    }

    pub fn weights_and_points(&self) -> (&[T], &[OPoint<T, D>]) {
        (&self.weights, &self.points)
    }
}
