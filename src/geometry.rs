//! Element geometries for volume and boundary integration.
//!
//! Integrators see geometry through two traits. [`VolumeGeometry`] describes
//! a volume element: the reference-to-physical map, its Jacobian, and the
//! element's facets (including facet quadrature embedded in the element's
//! reference coordinates, which is what facet-restricted terms integrate
//! over). [`SurfaceGeometry`] describes a standalone boundary facet element
//! of one dimension less than the ambient space.
//!
//! The concrete types in this module are affine simplices; curved geometries
//! can be supplied by the host framework through the same traits.
use crate::allocators::DimAllocator;
use crate::quadrature;
use crate::{Real, SmallDim};
use eyre::{bail, eyre};
use nalgebra::{
    DefaultAllocator, Matrix2, Matrix3, OMatrix, OPoint, OVector, Point1, Point2, Point3,
    Vector2, Vector3, U1, U2, U3,
};
use numeric_literals::replace_float_literals;
use serde::{Deserialize, Serialize};

/// Geometry of a single volume element of reference dimension `D`.
pub trait VolumeGeometry<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    /// Maps a reference point to physical coordinates.
    fn map_reference_coords(&self, xi: &OPoint<T, D>) -> OPoint<T, D>;

    /// Jacobian of the reference-to-physical map at a reference point.
    fn jacobian(&self, xi: &OPoint<T, D>) -> OMatrix<T, D, D>;

    /// Number of facets of the reference element.
    fn num_facets(&self) -> usize;

    /// Outward unit normal of the given facet, in reference coordinates.
    fn reference_facet_normal(&self, facet: usize) -> eyre::Result<OVector<T, D>>;

    /// Whether the given facet lies on the domain boundary.
    fn facet_on_boundary(&self, facet: usize) -> bool;

    /// Volume quadrature of the given polynomial strength, in reference
    /// coordinates. Existing buffer contents are replaced.
    fn populate_quadrature(
        &self,
        strength: usize,
        weights: &mut Vec<T>,
        points: &mut Vec<OPoint<T, D>>,
    ) -> eyre::Result<()>;

    /// Facet quadrature of the given polynomial strength, with points
    /// embedded in the *element's* reference coordinates and weights scaled
    /// so they sum to the reference facet measure. Existing buffer contents
    /// are replaced.
    fn populate_facet_quadrature(
        &self,
        facet: usize,
        strength: usize,
        weights: &mut Vec<T>,
        points: &mut Vec<OPoint<T, D>>,
    ) -> eyre::Result<()>;
}

/// Geometry of a single boundary facet element of reference dimension `D`,
/// embedded in an ambient space of dimension `D + 1`.
///
/// The ambient dimension is erased from the type so that boundary
/// integrators can stay generic over the facet's reference dimension alone;
/// physical coordinates are written to a plain slice of length
/// [`dim_space`](SurfaceGeometry::dim_space).
pub trait SurfaceGeometry<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    /// Dimension of the ambient physical space.
    fn dim_space(&self) -> usize;

    /// Maps a reference point to physical coordinates.
    ///
    /// `result` must have length `dim_space()`.
    fn map_reference_coords(&self, xi: &OPoint<T, D>, result: &mut [T]) -> eyre::Result<()>;

    /// Ratio of physical to reference surface measure at a reference point.
    fn integration_measure(&self, xi: &OPoint<T, D>) -> T;

    /// Reference quadrature of the given polynomial strength. Existing
    /// buffer contents are replaced.
    fn populate_quadrature(
        &self,
        strength: usize,
        weights: &mut Vec<T>,
        points: &mut Vec<OPoint<T, D>>,
    ) -> eyre::Result<()>;
}

/// Computes the physical outward unit normal of a facet and the scaling from
/// reference to physical facet measure.
///
/// For an element map with Jacobian `J` and a reference facet with unit
/// normal `n_ref`, the physical normal direction is `J^{-T} n_ref` and the
/// physical facet measure per unit reference facet measure is
/// `|det J| |J^{-T} n_ref|`.
pub fn facet_normal_and_scaling<T, D>(
    jacobian: &OMatrix<T, D, D>,
    reference_normal: &OVector<T, D>,
) -> eyre::Result<(OVector<T, D>, T)>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    let det = jacobian.determinant();
    let inverse = jacobian
        .clone_owned()
        .try_inverse()
        .ok_or_else(|| eyre!("Singular element Jacobian encountered"))?;
    let cotangent = inverse.transpose() * reference_normal;
    let norm = cotangent.norm();
    if norm == T::zero() || det == T::zero() {
        bail!("Singular element Jacobian encountered");
    }
    Ok((cotangent / norm, det.abs() * norm))
}

/// An affine triangle element.
///
/// Facets are ordered (v0, v1), (v1, v2), (v2, v0).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffineTriangle<T>
where
    T: Real,
{
    vertices: [Point2<T>; 3],
    boundary_facets: [bool; 3],
}

impl<T> AffineTriangle<T>
where
    T: Real,
{
    pub fn from_vertices(vertices: [Point2<T>; 3]) -> Self {
        Self {
            vertices,
            boundary_facets: [false; 3],
        }
    }

    /// The unit reference triangle with vertices (0, 0), (1, 0), (0, 1).
    pub fn reference() -> Self {
        Self::from_vertices([
            Point2::new(T::zero(), T::zero()),
            Point2::new(T::one(), T::zero()),
            Point2::new(T::zero(), T::one()),
        ])
    }

    pub fn with_boundary_facets(self, boundary_facets: [bool; 3]) -> Self {
        Self {
            boundary_facets,
            ..self
        }
    }

    pub fn vertices(&self) -> &[Point2<T>; 3] {
        &self.vertices
    }

    /// Reference endpoints of the given facet.
    fn reference_facet_endpoints(facet: usize) -> (Point2<T>, Point2<T>) {
        let corners = [
            Point2::new(T::zero(), T::zero()),
            Point2::new(T::one(), T::zero()),
            Point2::new(T::zero(), T::one()),
        ];
        (corners[facet], corners[(facet + 1) % 3])
    }
}

impl<T> VolumeGeometry<T, U2> for AffineTriangle<T>
where
    T: Real,
{
    fn map_reference_coords(&self, xi: &Point2<T>) -> Point2<T> {
        let [a, b, c] = &self.vertices;
        a + (b - a) * xi.x + (c - a) * xi.y
    }

    fn jacobian(&self, _xi: &Point2<T>) -> Matrix2<T> {
        let [a, b, c] = &self.vertices;
        Matrix2::from_columns(&[b - a, c - a])
    }

    fn num_facets(&self) -> usize {
        3
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn reference_facet_normal(&self, facet: usize) -> eyre::Result<Vector2<T>> {
        let inv_sqrt2 = 1.0 / 2.0.sqrt();
        match facet {
            0 => Ok(Vector2::new(0.0, -1.0)),
            1 => Ok(Vector2::new(inv_sqrt2, inv_sqrt2)),
            2 => Ok(Vector2::new(-1.0, 0.0)),
            _ => bail!("facet index {} out of bounds for a triangle", facet),
        }
    }

    fn facet_on_boundary(&self, facet: usize) -> bool {
        facet < 3 && self.boundary_facets[facet]
    }

    fn populate_quadrature(
        &self,
        strength: usize,
        weights: &mut Vec<T>,
        points: &mut Vec<Point2<T>>,
    ) -> eyre::Result<()> {
        let (w, p) = quadrature::triangle(strength)?;
        *weights = w;
        *points = p;
        Ok(())
    }

    fn populate_facet_quadrature(
        &self,
        facet: usize,
        strength: usize,
        weights: &mut Vec<T>,
        points: &mut Vec<Point2<T>>,
    ) -> eyre::Result<()> {
        if facet >= 3 {
            bail!("facet index {} out of bounds for a triangle", facet);
        }
        let (a, b) = Self::reference_facet_endpoints(facet);
        let edge = b - a;
        let length = edge.norm();
        let (w, p) = quadrature::interval::<T>(strength)?;
        weights.clear();
        points.clear();
        for (weight, point) in w.into_iter().zip(p) {
            weights.push(weight * length);
            points.push(a + edge * point.x);
        }
        Ok(())
    }
}

/// An affine tetrahedron element.
///
/// Facets are ordered: the z = 0, y = 0 and x = 0 reference planes, then the
/// plane x + y + z = 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffineTetrahedron<T>
where
    T: Real,
{
    vertices: [Point3<T>; 4],
    boundary_facets: [bool; 4],
}

impl<T> AffineTetrahedron<T>
where
    T: Real,
{
    pub fn from_vertices(vertices: [Point3<T>; 4]) -> Self {
        Self {
            vertices,
            boundary_facets: [false; 4],
        }
    }

    /// The unit reference tetrahedron with vertices (0,0,0), (1,0,0),
    /// (0,1,0), (0,0,1).
    pub fn reference() -> Self {
        Self::from_vertices([
            Point3::new(T::zero(), T::zero(), T::zero()),
            Point3::new(T::one(), T::zero(), T::zero()),
            Point3::new(T::zero(), T::one(), T::zero()),
            Point3::new(T::zero(), T::zero(), T::one()),
        ])
    }

    pub fn with_boundary_facets(self, boundary_facets: [bool; 4]) -> Self {
        Self {
            boundary_facets,
            ..self
        }
    }

    pub fn vertices(&self) -> &[Point3<T>; 4] {
        &self.vertices
    }

    /// Reference corners of the given facet, ordered so that the first
    /// corner is the local origin of the facet parameterization.
    fn reference_facet_corners(facet: usize) -> eyre::Result<[Point3<T>; 3]> {
        let zero = T::zero();
        let one = T::one();
        match facet {
            0 => Ok([
                Point3::new(zero, zero, zero),
                Point3::new(one, zero, zero),
                Point3::new(zero, one, zero),
            ]),
            1 => Ok([
                Point3::new(zero, zero, zero),
                Point3::new(one, zero, zero),
                Point3::new(zero, zero, one),
            ]),
            2 => Ok([
                Point3::new(zero, zero, zero),
                Point3::new(zero, one, zero),
                Point3::new(zero, zero, one),
            ]),
            3 => Ok([
                Point3::new(one, zero, zero),
                Point3::new(zero, one, zero),
                Point3::new(zero, zero, one),
            ]),
            _ => bail!("facet index {} out of bounds for a tetrahedron", facet),
        }
    }
}

impl<T> VolumeGeometry<T, U3> for AffineTetrahedron<T>
where
    T: Real,
{
    fn map_reference_coords(&self, xi: &Point3<T>) -> Point3<T> {
        let [a, b, c, d] = &self.vertices;
        a + (b - a) * xi.x + (c - a) * xi.y + (d - a) * xi.z
    }

    fn jacobian(&self, _xi: &Point3<T>) -> Matrix3<T> {
        let [a, b, c, d] = &self.vertices;
        Matrix3::from_columns(&[b - a, c - a, d - a])
    }

    fn num_facets(&self) -> usize {
        4
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn reference_facet_normal(&self, facet: usize) -> eyre::Result<Vector3<T>> {
        let inv_sqrt3 = 1.0 / 3.0.sqrt();
        match facet {
            0 => Ok(Vector3::new(0.0, 0.0, -1.0)),
            1 => Ok(Vector3::new(0.0, -1.0, 0.0)),
            2 => Ok(Vector3::new(-1.0, 0.0, 0.0)),
            3 => Ok(Vector3::new(inv_sqrt3, inv_sqrt3, inv_sqrt3)),
            _ => bail!("facet index {} out of bounds for a tetrahedron", facet),
        }
    }

    fn facet_on_boundary(&self, facet: usize) -> bool {
        facet < 4 && self.boundary_facets[facet]
    }

    fn populate_quadrature(
        &self,
        strength: usize,
        weights: &mut Vec<T>,
        points: &mut Vec<Point3<T>>,
    ) -> eyre::Result<()> {
        let (w, p) = quadrature::tetrahedron(strength)?;
        *weights = w;
        *points = p;
        Ok(())
    }

    fn populate_facet_quadrature(
        &self,
        facet: usize,
        strength: usize,
        weights: &mut Vec<T>,
        points: &mut Vec<Point3<T>>,
    ) -> eyre::Result<()> {
        let [a, b, c] = Self::reference_facet_corners(facet)?;
        let u = b - a;
        let v = c - a;
        // Reference facet area relative to the unit triangle's area 1/2.
        let area_ratio = u.cross(&v).norm();
        let (w, p) = quadrature::triangle::<T>(strength)?;
        weights.clear();
        points.clear();
        for (weight, point) in w.into_iter().zip(p) {
            weights.push(weight * area_ratio);
            points.push(a + u * point.x + v * point.y);
        }
        Ok(())
    }
}

/// An affine segment on the boundary of a two-dimensional domain.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffineSegmentSurface<T>
where
    T: Real,
{
    endpoints: [Point2<T>; 2],
}

impl<T> AffineSegmentSurface<T>
where
    T: Real,
{
    pub fn from_endpoints(endpoints: [Point2<T>; 2]) -> Self {
        Self { endpoints }
    }

    pub fn endpoints(&self) -> &[Point2<T>; 2] {
        &self.endpoints
    }
}

impl<T> SurfaceGeometry<T, U1> for AffineSegmentSurface<T>
where
    T: Real,
{
    fn dim_space(&self) -> usize {
        2
    }

    fn map_reference_coords(&self, xi: &Point1<T>, result: &mut [T]) -> eyre::Result<()> {
        if result.len() != 2 {
            bail!("coordinate buffer must have length 2 for a segment in the plane");
        }
        let [a, b] = &self.endpoints;
        let x = a + (b - a) * xi.x;
        result[0] = x.x;
        result[1] = x.y;
        Ok(())
    }

    fn integration_measure(&self, _xi: &Point1<T>) -> T {
        let [a, b] = &self.endpoints;
        (b - a).norm()
    }

    fn populate_quadrature(
        &self,
        strength: usize,
        weights: &mut Vec<T>,
        points: &mut Vec<Point1<T>>,
    ) -> eyre::Result<()> {
        let (w, p) = quadrature::interval(strength)?;
        *weights = w;
        *points = p;
        Ok(())
    }
}

/// An affine triangle on the boundary of a three-dimensional domain.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffineTriangleSurface<T>
where
    T: Real,
{
    vertices: [Point3<T>; 3],
}

impl<T> AffineTriangleSurface<T>
where
    T: Real,
{
    pub fn from_vertices(vertices: [Point3<T>; 3]) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Point3<T>; 3] {
        &self.vertices
    }
}

impl<T> SurfaceGeometry<T, U2> for AffineTriangleSurface<T>
where
    T: Real,
{
    fn dim_space(&self) -> usize {
        3
    }

    fn map_reference_coords(&self, xi: &Point2<T>, result: &mut [T]) -> eyre::Result<()> {
        if result.len() != 3 {
            bail!("coordinate buffer must have length 3 for a triangle in space");
        }
        let [a, b, c] = &self.vertices;
        let x = a + (b - a) * xi.x + (c - a) * xi.y;
        result[0] = x.x;
        result[1] = x.y;
        result[2] = x.z;
        Ok(())
    }

    fn integration_measure(&self, _xi: &Point2<T>) -> T {
        let [a, b, c] = &self.vertices;
        (b - a).cross(&(c - a)).norm()
    }

    fn populate_quadrature(
        &self,
        strength: usize,
        weights: &mut Vec<T>,
        points: &mut Vec<Point2<T>>,
    ) -> eyre::Result<()> {
        let (w, p) = quadrature::triangle(strength)?;
        *weights = w;
        *points = p;
        Ok(())
    }
}
