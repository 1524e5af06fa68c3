use dpg::assembly::local::{
    DpgIntegrator, EyeEye, FluxFluxBoundary, FluxTrace, FluxTraceBoundary, GradGrad,
    IntegrationDomain, NeumannVolume, RobinVolume, TraceTrace, TraceTraceBoundary,
};
use dpg::element::{
    ComponentElement, P0SegmentElement, P1SegmentElement, P1TetrahedronElement, P1TriangleElement,
    P2TriangleElement, P0TriangleElement, RaviartThomasTriangleElement,
};
use dpg::geometry::{AffineSegmentSurface, AffineTetrahedron, AffineTriangle};
use dpg::registry::IntegratorRegistry;
use dpg::space::{CompoundSurfaceElement, CompoundVolumeElement};
use dpg::Coefficient;
use matrixcompare::assert_matrix_eq;
use nalgebra::{DMatrix, DMatrixSliceMut, DVector, DVectorSliceMut, Point2, U1, U2, U3};
use num::Complex;
use proptest::prelude::*;

fn indices(ind1: usize, ind2: usize) -> [Coefficient<f64>; 2] {
    [
        Coefficient::constant(ind1 as f64),
        Coefficient::constant(ind2 as f64),
    ]
}

fn unit_coeffs(ind1: usize, ind2: usize) -> [Coefficient<f64>; 3] {
    let [c1, c2] = indices(ind1, ind2);
    [c1, c2, Coefficient::constant(1.0)]
}

fn assemble_volume_matrix<D: dpg::SmallDim>(
    integrator: &DpgIntegrator<f64>,
    element: &CompoundVolumeElement<f64, D>,
) -> DMatrix<f64>
where
    nalgebra::DefaultAllocator: dpg::allocators::DimAllocator<f64, D>,
{
    let n = element.num_dofs();
    let mut output = DMatrix::zeros(n, n);
    integrator
        .assemble_element_matrix_into(element, DMatrixSliceMut::from(&mut output))
        .unwrap();
    output
}

fn assemble_boundary_matrix<D: dpg::SmallDim>(
    integrator: &DpgIntegrator<f64>,
    element: &CompoundSurfaceElement<f64, D>,
) -> DMatrix<f64>
where
    nalgebra::DefaultAllocator: dpg::allocators::DimAllocator<f64, D>,
{
    let n = element.num_dofs();
    let mut output = DMatrix::zeros(n, n);
    integrator
        .assemble_boundary_matrix_into(element, DMatrixSliceMut::from(&mut output))
        .unwrap();
    output
}

#[test]
fn grad_grad_matches_reference_triangle_stiffness() {
    let geometry = AffineTriangle::<f64>::reference();
    let component = P1TriangleElement;
    let element = CompoundVolumeElement::<f64, U2>::new(&geometry, vec![&component]);
    let integrator = DpgIntegrator::GradGrad(GradGrad::new(2, &unit_coeffs(1, 1)).unwrap());

    let output = assemble_volume_matrix(&integrator, &element);
    #[rustfmt::skip]
    let expected = DMatrix::from_row_slice(3, 3, &[
         1.0, -0.5, -0.5,
        -0.5,  0.5,  0.0,
        -0.5,  0.0,  0.5,
    ]);
    assert_matrix_eq!(output, expected, comp = abs, tol = 1e-14);
}

#[test]
fn grad_grad_stiffness_is_invariant_under_uniform_scaling() {
    // In 2D the stiffness matrix does not change under a uniform scaling of
    // the element.
    let geometry = AffineTriangle::from_vertices([
        Point2::new(0.0, 0.0),
        Point2::new(2.0, 0.0),
        Point2::new(0.0, 2.0),
    ]);
    let component = P1TriangleElement;
    let element = CompoundVolumeElement::<f64, U2>::new(&geometry, vec![&component]);
    let integrator = DpgIntegrator::GradGrad(GradGrad::new(2, &unit_coeffs(1, 1)).unwrap());

    let output = assemble_volume_matrix(&integrator, &element);
    #[rustfmt::skip]
    let expected = DMatrix::from_row_slice(3, 3, &[
         1.0, -0.5, -0.5,
        -0.5,  0.5,  0.0,
        -0.5,  0.0,  0.5,
    ]);
    assert_matrix_eq!(output, expected, comp = abs, tol = 1e-14);
}

#[test]
fn grad_grad_matches_reference_tetrahedron_stiffness() {
    let geometry = AffineTetrahedron::<f64>::reference();
    let component = P1TetrahedronElement;
    let element = CompoundVolumeElement::<f64, U3>::new(&geometry, vec![&component]);
    let integrator = DpgIntegrator::GradGrad(GradGrad::new(3, &unit_coeffs(1, 1)).unwrap());

    let output = assemble_volume_matrix(&integrator, &element);
    let expected = DMatrix::from_row_slice(
        4,
        4,
        &[
            0.5,
            -1.0 / 6.0,
            -1.0 / 6.0,
            -1.0 / 6.0,
            -1.0 / 6.0,
            1.0 / 6.0,
            0.0,
            0.0,
            -1.0 / 6.0,
            0.0,
            1.0 / 6.0,
            0.0,
            -1.0 / 6.0,
            0.0,
            0.0,
            1.0 / 6.0,
        ],
    );
    assert_matrix_eq!(output, expected, comp = abs, tol = 1e-14);
}

#[test]
fn eye_eye_matches_reference_triangle_mass() {
    let geometry = AffineTriangle::<f64>::reference();
    let component = P1TriangleElement;
    let element = CompoundVolumeElement::<f64, U2>::new(&geometry, vec![&component]);
    let integrator = DpgIntegrator::EyeEye(EyeEye::new(2, &unit_coeffs(1, 1)).unwrap());

    let output = assemble_volume_matrix(&integrator, &element);
    let expected = DMatrix::from_row_slice(3, 3, &[2.0, 1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 1.0, 2.0]) / 24.0;
    assert_matrix_eq!(output, expected, comp = abs, tol = 1e-14);
}

#[test]
fn eye_eye_pairs_different_degree_components() {
    // Trial P2, test P0: the test row holds the integrals of the P2 basis,
    // which vanish for vertex functions and are 1/6 for edge functions.
    let geometry = AffineTriangle::<f64>::reference();
    let trial = P2TriangleElement;
    let test = P0TriangleElement;
    let element = CompoundVolumeElement::<f64, U2>::new(&geometry, vec![&trial, &test]);
    let integrator = DpgIntegrator::EyeEye(EyeEye::new(2, &unit_coeffs(1, 2)).unwrap());

    let output = assemble_volume_matrix(&integrator, &element);
    let mut expected = DMatrix::zeros(7, 7);
    for col in 3..6 {
        expected[(6, col)] = 1.0 / 6.0;
    }
    assert_matrix_eq!(output, expected, comp = abs, tol = 1e-14);
}

#[test]
fn flux_trace_matches_hand_computed_boundary_integrals() {
    // Compound space (H(div) flux q, scalar trace w). Entry (j, i) of the
    // nonzero block is the integral of w_j over facet i, since basis i of the
    // flux has unit normal flux density on facet i and none elsewhere.
    let geometry = AffineTriangle::<f64>::reference();
    let flux = RaviartThomasTriangleElement;
    let trace = P1TriangleElement;
    let element = CompoundVolumeElement::<f64, U2>::new(&geometry, vec![&flux, &trace]);
    let integrator = DpgIntegrator::FluxTrace(FluxTrace::new(2, &unit_coeffs(1, 2)).unwrap());

    let output = assemble_volume_matrix(&integrator, &element);
    let s = 2f64.sqrt() / 2.0;
    let mut expected = DMatrix::zeros(6, 6);
    #[rustfmt::skip]
    let block = [
        [0.5, 0.0, 0.5],
        [0.5,   s, 0.0],
        [0.0,   s, 0.5],
    ];
    for (j, row) in block.iter().enumerate() {
        for (i, &value) in row.iter().enumerate() {
            expected[(3 + j, i)] = value;
        }
    }
    assert_matrix_eq!(output, expected, comp = abs, tol = 1e-14);
}

#[test]
fn trace_trace_integrates_over_all_facets() {
    let geometry = AffineTriangle::<f64>::reference();
    let trial = P1TriangleElement;
    let test = P1TriangleElement;
    let element = CompoundVolumeElement::<f64, U2>::new(&geometry, vec![&trial, &test]);
    let integrator = DpgIntegrator::TraceTrace(TraceTrace::new(2, &unit_coeffs(1, 2)).unwrap());

    let output = assemble_volume_matrix(&integrator, &element);
    let r = 2f64.sqrt();
    let mut expected = DMatrix::zeros(6, 6);
    #[rustfmt::skip]
    let block = [
        [2.0 / 3.0,       1.0 / 6.0,       1.0 / 6.0      ],
        [1.0 / 6.0,       (1.0 + r) / 3.0, r / 6.0        ],
        [1.0 / 6.0,       r / 6.0,         (1.0 + r) / 3.0],
    ];
    for (j, row) in block.iter().enumerate() {
        for (i, &value) in row.iter().enumerate() {
            expected[(3 + j, i)] = value;
        }
    }
    assert_matrix_eq!(output, expected, comp = abs, tol = 1e-14);
}

#[test]
fn robin_volume_only_sees_boundary_facets() {
    let geometry =
        AffineTriangle::<f64>::reference().with_boundary_facets([true, false, false]);
    let component = P1TriangleElement;
    let element = CompoundVolumeElement::<f64, U2>::new(&geometry, vec![&component]);
    let integrator = DpgIntegrator::RobinVolume(RobinVolume::new(2, &unit_coeffs(1, 1)).unwrap());

    let output = assemble_volume_matrix(&integrator, &element);
    #[rustfmt::skip]
    let expected = DMatrix::from_row_slice(3, 3, &[
        1.0 / 3.0, 1.0 / 6.0, 0.0,
        1.0 / 6.0, 1.0 / 3.0, 0.0,
        0.0,       0.0,       0.0,
    ]);
    assert_matrix_eq!(output, expected, comp = abs, tol = 1e-14);

    // With no boundary facets the element block vanishes entirely.
    let interior = AffineTriangle::<f64>::reference();
    let element = CompoundVolumeElement::<f64, U2>::new(&interior, vec![&component]);
    let output = assemble_volume_matrix(&integrator, &element);
    assert_matrix_eq!(output, DMatrix::zeros(3, 3), comp = abs, tol = 1e-14);
}

#[test]
fn neumann_volume_matches_hand_computed_vector() {
    // g = 2 and G = (3, 5) on the bottom facet, whose outward normal is
    // (0, -1): the integrand is g + G.n = -3, tested against P1 hat
    // functions whose facet integrals are 1/2, 1/2 and 0.
    let geometry =
        AffineTriangle::<f64>::reference().with_boundary_facets([true, false, false]);
    let component = P1TriangleElement;
    let element = CompoundVolumeElement::<f64, U2>::new(&geometry, vec![&component]);
    let coeffs = [
        Coefficient::constant(1.0),
        Coefficient::constant(2.0),
        Coefficient::constant(3.0),
        Coefficient::constant(5.0),
    ];
    let integrator = NeumannVolume::new(2, &coeffs).unwrap();

    let mut output = DVector::zeros(3);
    integrator
        .assemble_element_vector_into(&element, DVectorSliceMut::from(&mut output))
        .unwrap();
    let expected = DVector::from_column_slice(&[-1.5, -1.5, 0.0]);
    assert_matrix_eq!(output, expected, comp = abs, tol = 1e-14);
}

#[test]
fn boundary_pairings_on_a_stretched_segment() {
    // A boundary segment of length 2 in the plane.
    let geometry = AffineSegmentSurface::from_endpoints([
        Point2::new(0.0, 0.0),
        Point2::new(2.0, 0.0),
    ]);
    let flux = P0SegmentElement;
    let trace = P1SegmentElement;

    let element = CompoundSurfaceElement::<f64, U1>::new(&geometry, vec![&flux]);
    let integrator =
        DpgIntegrator::FluxFluxBoundary(FluxFluxBoundary::new(2, &unit_coeffs(1, 1)).unwrap());
    let output = assemble_boundary_matrix(&integrator, &element);
    assert_matrix_eq!(output, DMatrix::from_element(1, 1, 2.0), comp = abs, tol = 1e-14);

    let element = CompoundSurfaceElement::<f64, U1>::new(&geometry, vec![&trace]);
    let integrator = DpgIntegrator::TraceTraceBoundary(
        TraceTraceBoundary::new(2, &unit_coeffs(1, 1)).unwrap(),
    );
    let output = assemble_boundary_matrix(&integrator, &element);
    let expected = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 2.0]) / 3.0;
    assert_matrix_eq!(output, expected, comp = abs, tol = 1e-14);

    let element = CompoundSurfaceElement::<f64, U1>::new(&geometry, vec![&flux, &trace]);
    let integrator = DpgIntegrator::FluxTraceBoundary(
        FluxTraceBoundary::new(2, &unit_coeffs(1, 2)).unwrap(),
    );
    let output = assemble_boundary_matrix(&integrator, &element);
    let mut expected = DMatrix::zeros(3, 3);
    expected[(1, 0)] = 1.0;
    expected[(2, 0)] = 1.0;
    assert_matrix_eq!(output, expected, comp = abs, tol = 1e-14);
}

#[test]
fn complex_coefficient_scales_the_mass_matrix() {
    let geometry = AffineTriangle::<f64>::reference();
    let component = P1TriangleElement;
    let element = CompoundVolumeElement::<f64, U2>::new(&geometry, vec![&component]);
    let factor = Complex::new(1.0, 2.0);
    let coeffs = [
        Coefficient::constant(1.0),
        Coefficient::constant(1.0),
        Coefficient::complex_constant(factor),
    ];
    let integrator = EyeEye::new(2, &coeffs).unwrap();
    assert!(!integrator.is_symmetric());

    let mut output = DMatrix::<Complex<f64>>::zeros(3, 3);
    integrator
        .assemble_element_matrix_into(&element, DMatrixSliceMut::from(&mut output))
        .unwrap();

    let mass = DMatrix::from_row_slice(3, 3, &[2.0, 1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 1.0, 2.0]) / 24.0;
    for j in 0..3 {
        for i in 0..3 {
            let expected = factor * mass[(i, j)];
            assert!((output[(i, j)] - expected).norm() < 1e-14);
        }
    }
}

#[test]
fn complex_coefficient_is_rejected_in_real_assembly() {
    let geometry = AffineTriangle::<f64>::reference();
    let component = P1TriangleElement;
    let element = CompoundVolumeElement::<f64, U2>::new(&geometry, vec![&component]);
    let coeffs = [
        Coefficient::constant(1.0),
        Coefficient::constant(1.0),
        Coefficient::complex_constant(Complex::new(1.0, 2.0)),
    ];
    let integrator = EyeEye::new(2, &coeffs).unwrap();

    let mut output = DMatrix::<f64>::zeros(3, 3);
    let result = integrator.assemble_element_matrix_into(&element, DMatrixSliceMut::from(&mut output));
    assert!(result.is_err());
}

#[test]
fn spatially_varying_coefficient_is_evaluated_at_physical_points() {
    // EyeEye with a(x, y) = x on the reference triangle against P0 trial and
    // test functions: the matrix entry is the first moment of the triangle,
    // 1/6.
    let geometry = AffineTriangle::<f64>::reference();
    let component = P0TriangleElement;
    let element = CompoundVolumeElement::<f64, U2>::new(&geometry, vec![&component]);
    let coeffs = [
        Coefficient::constant(1.0),
        Coefficient::constant(1.0),
        Coefficient::from_fn(|x: &[f64]| x[0]),
    ];
    let integrator = EyeEye::new(2, &coeffs).unwrap();

    let mut output = DMatrix::<f64>::zeros(1, 1);
    integrator
        .assemble_element_matrix_into(&element, DMatrixSliceMut::from(&mut output))
        .unwrap();
    assert!((output[(0, 0)] - 1.0 / 6.0).abs() < 1e-14);
}

#[test]
fn construction_rejects_bad_arguments() {
    // Unsupported spatial dimension.
    assert!(GradGrad::new(4, &unit_coeffs(1, 2)).is_err());
    assert!(GradGrad::new(1, &unit_coeffs(1, 2)).is_err());

    // Wrong coefficient count.
    assert!(GradGrad::new(2, &indices(1, 2)).is_err());
    let four = [
        Coefficient::constant(1.0),
        Coefficient::constant(2.0),
        Coefficient::constant(1.0),
        Coefficient::constant(1.0),
    ];
    assert!(TraceTrace::new(2, &four).is_err());

    // Spatially varying coefficients in the boundary-restricted volume
    // forms.
    let varying = [
        Coefficient::constant(1.0),
        Coefficient::constant(1.0),
        Coefficient::from_fn(|x: &[f64]| x[0]),
    ];
    assert!(RobinVolume::new(2, &varying).is_err());
    let neumann_varying = [
        Coefficient::constant(1.0),
        Coefficient::from_fn(|x: &[f64]| x[0]),
        Coefficient::constant(0.0),
        Coefficient::constant(0.0),
    ];
    assert!(NeumannVolume::new(2, &neumann_varying).is_err());

    // NeumannVolume coefficient count depends on the spatial dimension.
    let four = [
        Coefficient::constant(1.0),
        Coefficient::constant(1.0),
        Coefficient::constant(0.0),
        Coefficient::constant(0.0),
    ];
    assert!(NeumannVolume::new(2, &four).is_ok());
    assert!(NeumannVolume::new(3, &four).is_err());
}

#[test]
fn volume_and_boundary_assembly_entry_points_are_exclusive() {
    let registry = IntegratorRegistry::<f64>::with_dpg_integrators();
    let geometry = AffineTriangle::<f64>::reference();
    let component = P1TriangleElement;
    let volume_element = CompoundVolumeElement::<f64, U2>::new(&geometry, vec![&component]);

    let boundary_form = registry
        .create_bilinear("tracetraceboundary", 2, &unit_coeffs(1, 1))
        .unwrap();
    assert_eq!(boundary_form.integration_domain(), IntegrationDomain::Boundary);
    assert!(boundary_form.boundary_form());
    assert_eq!(boundary_form.dim_element(), 1);
    assert_eq!(boundary_form.dim_space(), 2);
    let mut output = DMatrix::<f64>::zeros(3, 3);
    assert!(boundary_form
        .assemble_element_matrix_into(&volume_element, DMatrixSliceMut::from(&mut output))
        .is_err());

    let volume_form = registry.create_bilinear("gradgrad", 2, &unit_coeffs(1, 1)).unwrap();
    assert_eq!(volume_form.integration_domain(), IntegrationDomain::Volume);
    assert!(!volume_form.boundary_form());
    assert_eq!(volume_form.dim_element(), 2);
    let surface = AffineSegmentSurface::from_endpoints([
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
    ]);
    let trace = P1SegmentElement;
    let surface_element = CompoundSurfaceElement::<f64, U1>::new(&surface, vec![&trace]);
    let mut output = DMatrix::<f64>::zeros(2, 2);
    assert!(volume_form
        .assemble_boundary_matrix_into(&surface_element, DMatrixSliceMut::from(&mut output))
        .is_err());
}

#[test]
fn assembly_dimension_must_match_construction() {
    let geometry = AffineTriangle::<f64>::reference();
    let component = P1TriangleElement;
    let element = CompoundVolumeElement::<f64, U2>::new(&geometry, vec![&component]);
    let integrator = GradGrad::new(3, &unit_coeffs(1, 1)).unwrap();
    let mut output = DMatrix::<f64>::zeros(3, 3);
    assert!(integrator
        .assemble_element_matrix_into(&element, DMatrixSliceMut::from(&mut output))
        .is_err());
}

#[test]
fn component_index_out_of_bounds_fails_at_assembly() {
    let geometry = AffineTriangle::<f64>::reference();
    let component = P1TriangleElement;
    let element = CompoundVolumeElement::<f64, U2>::new(&geometry, vec![&component]);
    let integrator = EyeEye::new(2, &unit_coeffs(1, 2)).unwrap();
    let mut output = DMatrix::<f64>::zeros(3, 3);
    assert!(integrator
        .assemble_element_matrix_into(&element, DMatrixSliceMut::from(&mut output))
        .is_err());
}

macro_rules! symmetry_flag_tests {
    ($($name:ident => $keyword:literal),* $(,)?) => {
        $(
            paste::paste! {
                #[test]
                fn [<$name _symmetry_follows_coefficient>]() {
                    let registry = IntegratorRegistry::<f64>::with_dpg_integrators();
                    let real = unit_coeffs(1, 2);
                    let complex = [
                        Coefficient::constant(1.0),
                        Coefficient::constant(2.0),
                        Coefficient::complex_constant(Complex::new(1.0, 1.0)),
                    ];
                    let integrator = registry.create_bilinear($keyword, 2, &real).unwrap();
                    assert!(integrator.is_symmetric());
                    let integrator = registry.create_bilinear($keyword, 2, &complex).unwrap();
                    assert!(!integrator.is_symmetric());
                }
            }
        )*
    };
}

symmetry_flag_tests!(
    grad_grad => "gradgrad",
    flux_trace => "fluxtrace",
    eye_eye => "eyeeye",
    trace_trace => "tracetrace",
    robin_volume => "robinvolume",
    flux_flux_boundary => "fluxfluxboundary",
    trace_trace_boundary => "tracetraceboundary",
    flux_trace_boundary => "fluxtraceboundary",
);

proptest! {
    #[test]
    fn one_based_index_arguments_resolve_to_zero_based_components(
        ind1 in 1usize..=16,
        ind2 in 1usize..=16,
    ) {
        let integrator = GradGrad::new(2, &unit_coeffs(ind1, ind2)).unwrap();
        prop_assert_eq!(integrator.components().trial_component(), ind1 - 1);
        prop_assert_eq!(integrator.components().test_component(), ind2 - 1);
    }
}
