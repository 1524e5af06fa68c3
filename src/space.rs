//! Element-local views of compound finite element spaces.
//!
//! A compound space is an ordered collection of component spaces. On a single
//! element, an integrator sees the compound space as a list of
//! [`ComponentElement`]s sharing one geometry; the element's degrees of
//! freedom are the concatenation of the component degrees of freedom in
//! component order. [`CompoundLayout`] describes the same concatenation at
//! the level of global solution vectors.
use crate::allocators::DimAllocator;
use crate::element::ComponentElement;
use crate::geometry::{SurfaceGeometry, VolumeGeometry};
use crate::{Real, SmallDim};
use eyre::bail;
use nalgebra::DefaultAllocator;
use serde::{Deserialize, Serialize};
use std::ops::Range;

fn check_component_index(index: usize, num_components: usize) -> eyre::Result<()> {
    if index >= num_components {
        bail!(
            "component index {} out of bounds: compound space has {} components",
            index,
            num_components
        );
    }
    Ok(())
}

/// A compound volume element: component elements sharing one volume geometry.
pub struct CompoundVolumeElement<'a, T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    geometry: &'a dyn VolumeGeometry<T, D>,
    components: Vec<&'a dyn ComponentElement<T, D>>,
}

impl<'a, T, D> CompoundVolumeElement<'a, T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    pub fn new(
        geometry: &'a dyn VolumeGeometry<T, D>,
        components: Vec<&'a dyn ComponentElement<T, D>>,
    ) -> Self {
        Self {
            geometry,
            components,
        }
    }

    pub fn geometry(&self) -> &'a dyn VolumeGeometry<T, D> {
        self.geometry
    }

    pub fn num_components(&self) -> usize {
        self.components.len()
    }

    /// Total number of degrees of freedom across all components.
    pub fn num_dofs(&self) -> usize {
        self.components.iter().map(|c| c.num_dofs()).sum()
    }

    pub fn component(&self, index: usize) -> eyre::Result<&'a dyn ComponentElement<T, D>> {
        check_component_index(index, self.components.len())?;
        Ok(self.components[index])
    }

    /// Offset of the given component's first degree of freedom within the
    /// element's concatenated dof numbering.
    pub fn component_dof_offset(&self, index: usize) -> eyre::Result<usize> {
        check_component_index(index, self.components.len())?;
        Ok(self.components[..index].iter().map(|c| c.num_dofs()).sum())
    }
}

/// A compound boundary facet element: component elements sharing one surface
/// geometry.
pub struct CompoundSurfaceElement<'a, T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    geometry: &'a dyn SurfaceGeometry<T, D>,
    components: Vec<&'a dyn ComponentElement<T, D>>,
}

impl<'a, T, D> CompoundSurfaceElement<'a, T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    pub fn new(
        geometry: &'a dyn SurfaceGeometry<T, D>,
        components: Vec<&'a dyn ComponentElement<T, D>>,
    ) -> Self {
        Self {
            geometry,
            components,
        }
    }

    pub fn geometry(&self) -> &'a dyn SurfaceGeometry<T, D> {
        self.geometry
    }

    pub fn num_components(&self) -> usize {
        self.components.len()
    }

    pub fn num_dofs(&self) -> usize {
        self.components.iter().map(|c| c.num_dofs()).sum()
    }

    pub fn component(&self, index: usize) -> eyre::Result<&'a dyn ComponentElement<T, D>> {
        check_component_index(index, self.components.len())?;
        Ok(self.components[index])
    }

    pub fn component_dof_offset(&self, index: usize) -> eyre::Result<usize> {
        check_component_index(index, self.components.len())?;
        Ok(self.components[..index].iter().map(|c| c.num_dofs()).sum())
    }
}

/// Layout of a compound space's global degrees of freedom: the number of
/// degrees of freedom of each component, in component order. Component
/// vectors are stored flattened back to back in this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundLayout {
    sizes: Vec<usize>,
}

impl CompoundLayout {
    pub fn from_component_sizes(sizes: Vec<usize>) -> Self {
        Self { sizes }
    }

    pub fn num_components(&self) -> usize {
        self.sizes.len()
    }

    pub fn component_size(&self, index: usize) -> eyre::Result<usize> {
        check_component_index(index, self.sizes.len())?;
        Ok(self.sizes[index])
    }

    /// Range of the given component within the flattened compound vector.
    pub fn component_range(&self, index: usize) -> eyre::Result<Range<usize>> {
        check_component_index(index, self.sizes.len())?;
        let offset: usize = self.sizes[..index].iter().sum();
        Ok(offset..offset + self.sizes[index])
    }

    /// Total length of the flattened compound vector.
    pub fn total_len(&self) -> usize {
        self.sizes.iter().sum()
    }
}
