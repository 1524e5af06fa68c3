use dpg::element::{
    ComponentElement, P0SegmentElement, P1SegmentElement, P1TetrahedronElement, P1TriangleElement,
    P2TriangleElement, RaviartThomasTriangleElement,
};
use matrixcompare::assert_scalar_eq;
use nalgebra::{DMatrix, DMatrixSliceMut, Point1, Point2, Point3};

fn triangle_basis_at<E: ComponentElement<f64, nalgebra::U2>>(element: &E, xi: &Point2<f64>) -> Vec<f64> {
    let mut values = vec![0.0; element.num_dofs()];
    element.populate_basis(&mut values, xi).unwrap();
    values
}

#[test]
fn p1_triangle_partition_of_unity_and_gradients() {
    let element = P1TriangleElement;
    for xi in [
        Point2::new(0.2, 0.3),
        Point2::new(0.0, 0.0),
        Point2::new(0.5, 0.5),
    ] {
        let values = triangle_basis_at(&element, &xi);
        let sum: f64 = values.iter().sum();
        assert_scalar_eq!(sum, 1.0, comp = abs, tol = 1e-14);
    }

    let mut gradients = DMatrix::zeros(2, 3);
    element
        .populate_basis_gradients(DMatrixSliceMut::from(&mut gradients), &Point2::new(0.1, 0.1))
        .unwrap();
    // Gradients of a partition of unity sum to zero.
    for r in 0..2 {
        let sum: f64 = (0..3).map(|col| gradients[(r, col)]).sum();
        assert_scalar_eq!(sum, 0.0, comp = abs, tol = 1e-14);
    }
}

#[test]
fn p2_triangle_is_nodal() {
    let element = P2TriangleElement;
    let nodes = [
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(0.0, 1.0),
        Point2::new(0.5, 0.0),
        Point2::new(0.5, 0.5),
        Point2::new(0.0, 0.5),
    ];
    for (node_index, node) in nodes.iter().enumerate() {
        let values = triangle_basis_at(&element, node);
        for (basis_index, &value) in values.iter().enumerate() {
            let expected = if basis_index == node_index { 1.0 } else { 0.0 };
            assert_scalar_eq!(value, expected, comp = abs, tol = 1e-14);
        }
    }
}

#[test]
fn p2_triangle_gradients_sum_to_zero() {
    let element = P2TriangleElement;
    let mut gradients = DMatrix::zeros(2, 6);
    element
        .populate_basis_gradients(DMatrixSliceMut::from(&mut gradients), &Point2::new(0.3, 0.4))
        .unwrap();
    for r in 0..2 {
        let sum: f64 = (0..6).map(|col| gradients[(r, col)]).sum();
        assert_scalar_eq!(sum, 0.0, comp = abs, tol = 1e-14);
    }
}

#[test]
fn p1_tetrahedron_partition_of_unity() {
    let element = P1TetrahedronElement;
    let mut values = vec![0.0; 4];
    element
        .populate_basis(&mut values, &Point3::new(0.1, 0.2, 0.3))
        .unwrap();
    let sum: f64 = values.iter().sum();
    assert_scalar_eq!(sum, 1.0, comp = abs, tol = 1e-14);
    assert_scalar_eq!(values[1], 0.1, comp = abs, tol = 1e-14);
    assert_scalar_eq!(values[2], 0.2, comp = abs, tol = 1e-14);
    assert_scalar_eq!(values[3], 0.3, comp = abs, tol = 1e-14);
}

#[test]
fn p1_segment_basis() {
    let element = P1SegmentElement;
    let mut values = vec![0.0; 2];
    element.populate_basis(&mut values, &Point1::new(0.25)).unwrap();
    assert_scalar_eq!(values[0], 0.75, comp = abs, tol = 1e-14);
    assert_scalar_eq!(values[1], 0.25, comp = abs, tol = 1e-14);

    let constant = P0SegmentElement;
    let mut value = vec![0.0; 1];
    constant.populate_basis(&mut value, &Point1::new(0.7)).unwrap();
    assert_eq!(value[0], 1.0);
}

#[test]
fn raviart_thomas_normal_traces_are_facet_indicators() {
    let element = RaviartThomasTriangleElement;
    let xi = Point2::new(0.5, 0.0);
    let mut traces = vec![0.0; 3];
    for facet in 0..3 {
        element.populate_facet_normal_trace(facet, &mut traces, &xi).unwrap();
        for (i, &value) in traces.iter().enumerate() {
            let expected = if i == facet { 1.0 } else { 0.0 };
            assert_eq!(value, expected);
        }
    }
}

#[test]
fn raviart_thomas_rejects_unsupported_queries() {
    let element = RaviartThomasTriangleElement;
    let mut values = vec![0.0; 3];
    assert!(element.populate_basis(&mut values, &Point2::new(0.2, 0.2)).is_err());
    assert!(element
        .populate_facet_normal_trace(3, &mut values, &Point2::new(0.2, 0.2))
        .is_err());

    // Scalar elements in turn do not provide normal traces.
    let scalar: &dyn ComponentElement<f64, nalgebra::U2> = &P1TriangleElement;
    assert!(scalar
        .populate_facet_normal_trace(0, &mut values, &Point2::new(0.2, 0.2))
        .is_err());
}

#[test]
fn buffer_length_mismatch_is_rejected() {
    let element = P1TriangleElement;
    let mut too_short = vec![0.0; 2];
    assert!(element.populate_basis(&mut too_short, &Point2::new(0.2, 0.2)).is_err());
}
