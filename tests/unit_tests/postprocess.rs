use dpg::postprocess::{
    get_component, GetComponentOptions, GridFunction, GridFunctionStore, GridFunctionValues,
};
use dpg::space::CompoundLayout;
use nalgebra::DVector;
use num::Complex;

fn options(component: usize, re: bool, im: bool) -> GetComponentOptions {
    GetComponentOptions {
        compound_gf: "u".to_string(),
        component,
        component_gf: "u2".to_string(),
        re,
        im,
    }
}

fn complex_compound() -> GridFunction<f64> {
    // Two components of sizes 2 and 3; the second holds a + bi entries.
    let layout = CompoundLayout::from_component_sizes(vec![2, 3]);
    let values = DVector::from_column_slice(&[
        Complex::new(9.0, 9.0),
        Complex::new(8.0, 8.0),
        Complex::new(1.0, -4.0),
        Complex::new(2.0, -5.0),
        Complex::new(3.0, -6.0),
    ]);
    GridFunction::new(layout, GridFunctionValues::Complex(values)).unwrap()
}

#[test]
fn real_projection_extracts_real_parts() {
    let source = complex_compound();
    let mut destination = GridFunction::standalone_real(DVector::zeros(3));
    get_component(&source, &mut destination, &options(2, true, false)).unwrap();
    let expected = DVector::from_column_slice(&[1.0, 2.0, 3.0]);
    assert_eq!(destination.values(), &GridFunctionValues::Real(expected));
}

#[test]
fn imaginary_projection_extracts_imaginary_parts() {
    let source = complex_compound();
    let mut destination = GridFunction::standalone_real(DVector::zeros(3));
    get_component(&source, &mut destination, &options(2, false, true)).unwrap();
    let expected = DVector::from_column_slice(&[-4.0, -5.0, -6.0]);
    assert_eq!(destination.values(), &GridFunctionValues::Real(expected));
}

#[test]
fn unprojected_copy_preserves_complex_values() {
    let source = complex_compound();
    let mut destination = GridFunction::standalone_complex(DVector::zeros(3));
    get_component(&source, &mut destination, &options(2, false, false)).unwrap();
    let expected = DVector::from_column_slice(&[
        Complex::new(1.0, -4.0),
        Complex::new(2.0, -5.0),
        Complex::new(3.0, -6.0),
    ]);
    assert_eq!(destination.values(), &GridFunctionValues::Complex(expected));
}

#[test]
fn real_compound_extraction_round_trips() {
    let layout = CompoundLayout::from_component_sizes(vec![1, 2]);
    let values = DVector::from_column_slice(&[7.0, 1.5, 2.5]);
    let source = GridFunction::new(layout, GridFunctionValues::Real(values)).unwrap();
    let mut destination = GridFunction::standalone_real(DVector::zeros(2));
    get_component(&source, &mut destination, &options(2, false, false)).unwrap();
    let expected = DVector::from_column_slice(&[1.5, 2.5]);
    assert_eq!(destination.values(), &GridFunctionValues::Real(expected));

    // The imaginary part of a real solution is identically zero.
    get_component(&source, &mut destination, &options(2, false, true)).unwrap();
    assert_eq!(
        destination.values(),
        &GridFunctionValues::Real(DVector::zeros(2))
    );
}

#[test]
fn conflicting_and_missing_projection_flags_are_rejected() {
    let source = complex_compound();
    let mut destination = GridFunction::standalone_real(DVector::zeros(3));
    assert!(get_component(&source, &mut destination, &options(2, true, true)).is_err());
    // A complex component cannot land in a real destination unprojected.
    assert!(get_component(&source, &mut destination, &options(2, false, false)).is_err());
}

#[test]
fn shape_mismatches_are_rejected() {
    let source = complex_compound();
    let mut too_short = GridFunction::standalone_real(DVector::zeros(2));
    assert!(get_component(&source, &mut too_short, &options(2, true, false)).is_err());

    let mut destination = GridFunction::standalone_real(DVector::zeros(3));
    assert!(get_component(&source, &mut destination, &options(3, true, false)).is_err());
    assert!(get_component(&source, &mut destination, &options(0, true, false)).is_err());

    let bad_layout = CompoundLayout::from_component_sizes(vec![2, 2]);
    assert!(GridFunction::new(
        bad_layout,
        GridFunctionValues::Real(DVector::<f64>::zeros(5))
    )
    .is_err());
}

#[test]
fn store_runs_extractions_by_name() {
    let mut store = GridFunctionStore::new();
    store.insert("u", complex_compound());
    store.insert("u2", GridFunction::standalone_real(DVector::zeros(3)));

    store.run_get_component(&options(2, true, false)).unwrap();
    let extracted = store.get("u2").unwrap();
    let expected = DVector::from_column_slice(&[1.0, 2.0, 3.0]);
    assert_eq!(extracted.values(), &GridFunctionValues::Real(expected));

    // Unknown names are reported, and a failed run leaves the store intact.
    let mut bad = options(2, true, false);
    bad.compound_gf = "missing".to_string();
    assert!(store.run_get_component(&bad).is_err());
    assert!(store.get("u2").is_some());
}
