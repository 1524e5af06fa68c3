//! Extraction of a single component from a compound solution.
//!
//! Compound solutions are stored as one flattened vector with the component
//! vectors laid out back to back (see
//! [`CompoundLayout`](crate::space::CompoundLayout)). The utility here copies
//! one component into a standalone grid function, optionally projecting
//! complex entries to their real or imaginary part. It operates directly on
//! the flattened vectors, entry by entry, without any element loop.
use crate::space::CompoundLayout;
use crate::Real;
use eyre::bail;
use nalgebra::DVector;
use num::Complex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The values of a grid function, real or complex depending on the scalar
/// type of the assembled problem.
#[derive(Debug, Clone, PartialEq)]
pub enum GridFunctionValues<T: Real> {
    Real(DVector<T>),
    Complex(DVector<Complex<T>>),
}

impl<T: Real> GridFunctionValues<T> {
    pub fn len(&self) -> usize {
        match self {
            GridFunctionValues::Real(values) => values.len(),
            GridFunctionValues::Complex(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A solution vector together with the component layout of its space.
///
/// A standalone (non-compound) grid function has a single-component layout.
#[derive(Debug, Clone, PartialEq)]
pub struct GridFunction<T: Real> {
    layout: CompoundLayout,
    values: GridFunctionValues<T>,
}

impl<T: Real> GridFunction<T> {
    pub fn new(layout: CompoundLayout, values: GridFunctionValues<T>) -> eyre::Result<Self> {
        if layout.total_len() != values.len() {
            bail!(
                "grid function values have length {} but the space layout has {} degrees of freedom",
                values.len(),
                layout.total_len()
            );
        }
        Ok(Self { layout, values })
    }

    /// A standalone real-valued grid function.
    pub fn standalone_real(values: DVector<T>) -> Self {
        Self {
            layout: CompoundLayout::from_component_sizes(vec![values.len()]),
            values: GridFunctionValues::Real(values),
        }
    }

    /// A standalone complex-valued grid function.
    pub fn standalone_complex(values: DVector<Complex<T>>) -> Self {
        Self {
            layout: CompoundLayout::from_component_sizes(vec![values.len()]),
            values: GridFunctionValues::Complex(values),
        }
    }

    pub fn layout(&self) -> &CompoundLayout {
        &self.layout
    }

    pub fn values(&self) -> &GridFunctionValues<T> {
        &self.values
    }
}

/// Options of a component extraction, mirroring the configuration surface:
/// source and destination grid function names, a 1-based component index and
/// the optional real/imaginary projection flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetComponentOptions {
    pub compound_gf: String,
    pub component: usize,
    pub component_gf: String,
    #[serde(default)]
    pub re: bool,
    #[serde(default)]
    pub im: bool,
}

/// Copies component `options.component` (1-based) of `source` into
/// `destination`, entry by entry.
///
/// Setting both projection flags is rejected as a configuration error, as is
/// copying a complex component into a real destination without a projection
/// flag, and any length mismatch between the component and the destination.
pub fn get_component<T: Real>(
    source: &GridFunction<T>,
    destination: &mut GridFunction<T>,
    options: &GetComponentOptions,
) -> eyre::Result<()> {
    if options.re && options.im {
        bail!("the real and imaginary projection flags are mutually exclusive");
    }
    if options.component < 1 {
        bail!("component indices are 1-based, got 0");
    }
    let range = source.layout.component_range(options.component - 1)?;
    if destination.values.len() != range.len() {
        bail!(
            "destination grid function has {} degrees of freedom but component {} has {}",
            destination.values.len(),
            options.component,
            range.len()
        );
    }

    match (&source.values, &mut destination.values) {
        (GridFunctionValues::Real(source), GridFunctionValues::Real(destination)) => {
            // The imaginary part of a real solution vanishes identically.
            for (dest, &src) in destination.iter_mut().zip(source.rows_range(range).iter()) {
                *dest = if options.im { T::zero() } else { src };
            }
        }
        (GridFunctionValues::Real(source), GridFunctionValues::Complex(destination)) => {
            for (dest, &src) in destination.iter_mut().zip(source.rows_range(range).iter()) {
                let value = if options.im { T::zero() } else { src };
                *dest = Complex::new(value, T::zero());
            }
        }
        (GridFunctionValues::Complex(source), GridFunctionValues::Real(destination)) => {
            if !options.re && !options.im {
                bail!(
                    "cannot copy a complex component into a real grid function \
                     without a real or imaginary projection flag"
                );
            }
            for (dest, src) in destination.iter_mut().zip(source.rows_range(range).iter()) {
                *dest = if options.re { src.re } else { src.im };
            }
        }
        (GridFunctionValues::Complex(source), GridFunctionValues::Complex(destination)) => {
            for (dest, src) in destination.iter_mut().zip(source.rows_range(range).iter()) {
                *dest = if options.re {
                    Complex::new(src.re, T::zero())
                } else if options.im {
                    Complex::new(src.im, T::zero())
                } else {
                    *src
                };
            }
        }
    }
    Ok(())
}

/// A name-keyed store of grid functions, standing in for the host
/// framework's solution registry.
#[derive(Debug, Default)]
pub struct GridFunctionStore<T: Real> {
    functions: HashMap<String, GridFunction<T>>,
}

impl<T: Real> GridFunctionStore<T> {
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, function: GridFunction<T>) {
        self.functions.insert(name.into(), function);
    }

    pub fn get(&self, name: &str) -> Option<&GridFunction<T>> {
        self.functions.get(name)
    }

    /// Runs a component extraction between two named grid functions in the
    /// store.
    pub fn run_get_component(&mut self, options: &GetComponentOptions) -> eyre::Result<()> {
        // Take the destination out so source and destination can be borrowed
        // at the same time.
        let mut destination = self
            .functions
            .remove(&options.component_gf)
            .ok_or_else(|| eyre::eyre!("no grid function named {}", options.component_gf))?;
        let result = match self.functions.get(&options.compound_gf) {
            Some(source) => get_component(source, &mut destination, options),
            None => Err(eyre::eyre!("no grid function named {}", options.compound_gf)),
        };
        self.functions
            .insert(options.component_gf.clone(), destination);
        result
    }
}
