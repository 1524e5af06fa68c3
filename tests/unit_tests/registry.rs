use dpg::assembly::local::DpgIntegrator;
use dpg::registry::IntegratorRegistry;
use dpg::Coefficient;

fn pairing_coeffs() -> [Coefficient<f64>; 3] {
    [
        Coefficient::constant(1.0),
        Coefficient::constant(2.0),
        Coefficient::constant(1.0),
    ]
}

#[test]
fn stock_registry_constructs_every_bilinear_integrator_in_both_dimensions() {
    let registry = IntegratorRegistry::<f64>::with_dpg_integrators();
    let names = [
        ("gradgrad", "GradGrad"),
        ("fluxtrace", "FluxTrace"),
        ("eyeeye", "EyeEye"),
        ("tracetrace", "TraceTrace"),
        ("robinvolume", "RobinVolume"),
        ("fluxfluxboundary", "FluxFluxBoundary"),
        ("tracetraceboundary", "TraceTraceBoundary"),
        ("fluxtraceboundary", "FluxTraceBoundary"),
    ];
    for dim in [2, 3] {
        for (keyword, display_name) in names {
            let integrator = registry
                .create_bilinear(keyword, dim, &pairing_coeffs())
                .unwrap();
            assert_eq!(integrator.name(), display_name);
            assert_eq!(integrator.dim_space(), dim);
            assert_eq!(integrator.components().trial_component(), 0);
            assert_eq!(integrator.components().test_component(), 1);
        }
    }
    assert_eq!(registry.bilinear_names().len(), names.len());
}

#[test]
fn stock_registry_constructs_the_neumann_source_integrator() {
    let registry = IntegratorRegistry::<f64>::with_dpg_integrators();
    let coeffs_2d = [
        Coefficient::constant(1.0),
        Coefficient::constant(2.0),
        Coefficient::constant(3.0),
        Coefficient::constant(5.0),
    ];
    let source = registry.create_source("neumannvol", 2, &coeffs_2d).unwrap();
    assert_eq!(source.name(), "NeumannVolume");
    assert_eq!(source.component(), 0);
    assert_eq!(source.dim_space(), 2);

    // The 3D variant takes one more flux component.
    assert!(registry.create_source("neumannvol", 3, &coeffs_2d).is_err());
    let coeffs_3d = [
        Coefficient::constant(1.0),
        Coefficient::constant(2.0),
        Coefficient::constant(3.0),
        Coefficient::constant(5.0),
        Coefficient::constant(7.0),
    ];
    assert!(registry.create_source("neumannvol", 3, &coeffs_3d).is_ok());
}

#[test]
fn unknown_names_and_dimensions_are_rejected() {
    let registry = IntegratorRegistry::<f64>::with_dpg_integrators();
    assert!(registry.create_bilinear("nosuchform", 2, &pairing_coeffs()).is_err());
    assert!(registry.create_bilinear("gradgrad", 4, &pairing_coeffs()).is_err());
    assert!(registry.create_source("gradgrad", 2, &pairing_coeffs()).is_err());
}

#[test]
fn duplicate_registration_is_rejected() {
    let mut registry = IntegratorRegistry::<f64>::with_dpg_integrators();
    let result = registry.register_bilinear("gradgrad", 2, |dim, coeffs| {
        dpg::assembly::local::GradGrad::new(dim, coeffs).map(DpgIntegrator::GradGrad)
    });
    assert!(result.is_err());

    // A fresh name is fine.
    registry
        .register_bilinear("gradgrad2", 2, |dim, coeffs| {
            dpg::assembly::local::GradGrad::new(dim, coeffs).map(DpgIntegrator::GradGrad)
        })
        .unwrap();
    assert!(registry.create_bilinear("gradgrad2", 2, &pairing_coeffs()).is_ok());
}
