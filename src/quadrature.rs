//! Quadrature rules on reference domains.
//!
//! Rules are parameterized by *polynomial strength*: a rule of strength `p`
//! integrates polynomials of total degree `p` exactly on its reference
//! domain. Reference domains are the unit interval `[0, 1]`, the unit
//! triangle with vertices (0,0), (1,0), (0,1) and the unit tetrahedron with
//! vertices (0,0,0), (1,0,0), (0,1,0), (0,0,1).
use crate::Real;
use eyre::bail;
use nalgebra::{OPoint, Point1, Point2, Point3, U1, U2, U3};
use numeric_literals::replace_float_literals;

/// Weights and points of a quadrature rule.
pub type QuadraturePair<T, D> = (Vec<T>, Vec<OPoint<T, D>>);

pub type QuadraturePair1d<T> = QuadraturePair<T, U1>;
pub type QuadraturePair2d<T> = QuadraturePair<T, U2>;
pub type QuadraturePair3d<T> = QuadraturePair<T, U3>;

/// Gauss-Legendre quadrature on the unit interval `[0, 1]`.
///
/// Supports strengths up to 9 (five points).
pub fn interval<T: Real>(strength: usize) -> eyre::Result<QuadraturePair1d<T>> {
    // Nodes and weights are tabulated on [-1, 1] and mapped to [0, 1].
    let rule: (&[f64], &[f64]) = match strength {
        0 | 1 => (&[0.0], &[2.0]),
        2 | 3 => (&[-0.5773502691896258, 0.5773502691896258], &[1.0, 1.0]),
        4 | 5 => (
            &[-0.7745966692414834, 0.0, 0.7745966692414834],
            &[0.5555555555555556, 0.8888888888888889, 0.5555555555555556],
        ),
        6 | 7 => (
            &[
                -0.8611363115940526,
                -0.3399810435848563,
                0.3399810435848563,
                0.8611363115940526,
            ],
            &[
                0.3478548451374538,
                0.6521451548625461,
                0.6521451548625461,
                0.3478548451374538,
            ],
        ),
        8 | 9 => (
            &[
                -0.9061798459386640,
                -0.5384693101056831,
                0.0,
                0.5384693101056831,
                0.9061798459386640,
            ],
            &[
                0.2369268850561891,
                0.4786286704993665,
                0.5688888888888889,
                0.4786286704993665,
                0.2369268850561891,
            ],
        ),
        _ => bail!("no interval quadrature rule of strength {} available", strength),
    };
    let (nodes, weights) = rule;
    let from_f64 = |x: f64| T::from_f64(x).expect("Literal must fit in T");
    let points = nodes
        .iter()
        .map(|&node| Point1::new(from_f64((node + 1.0) * 0.5)))
        .collect();
    let weights = weights.iter().map(|&weight| from_f64(weight * 0.5)).collect();
    Ok((weights, points))
}

/// Symmetric quadrature on the unit triangle.
///
/// Supports strengths up to 5. Weights sum to the reference area 1/2.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn triangle<T: Real>(strength: usize) -> eyre::Result<QuadraturePair2d<T>> {
    let third = 1.0 / 3.0;
    match strength {
        0 | 1 => Ok((vec![0.5], vec![Point2::new(third, third)])),
        2 => Ok((
            vec![1.0 / 6.0; 3],
            vec![
                Point2::new(1.0 / 6.0, 1.0 / 6.0),
                Point2::new(2.0 / 3.0, 1.0 / 6.0),
                Point2::new(1.0 / 6.0, 2.0 / 3.0),
            ],
        )),
        3 => Ok((
            vec![-27.0 / 96.0, 25.0 / 96.0, 25.0 / 96.0, 25.0 / 96.0],
            vec![
                Point2::new(third, third),
                Point2::new(0.2, 0.2),
                Point2::new(0.6, 0.2),
                Point2::new(0.2, 0.6),
            ],
        )),
        4 | 5 => {
            let alpha = 0.0597158717897698;
            let beta = 0.4701420641051151;
            let gamma = 0.7974269853530873;
            let delta = 0.1012865073234563;
            Ok((
                vec![
                    0.1125,
                    0.0661970763942530,
                    0.0661970763942530,
                    0.0661970763942530,
                    0.0629695902724136,
                    0.0629695902724136,
                    0.0629695902724136,
                ],
                vec![
                    Point2::new(third, third),
                    Point2::new(beta, beta),
                    Point2::new(alpha, beta),
                    Point2::new(beta, alpha),
                    Point2::new(delta, delta),
                    Point2::new(gamma, delta),
                    Point2::new(delta, gamma),
                ],
            ))
        }
        _ => bail!("no triangle quadrature rule of strength {} available", strength),
    }
}

/// Symmetric quadrature on the unit tetrahedron.
///
/// Supports strengths up to 3. Weights sum to the reference volume 1/6.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn tetrahedron<T: Real>(strength: usize) -> eyre::Result<QuadraturePair3d<T>> {
    match strength {
        0 | 1 => Ok((vec![1.0 / 6.0], vec![Point3::new(0.25, 0.25, 0.25)])),
        2 => {
            let a = 0.5854101966249685;
            let b = 0.1381966011250105;
            Ok((
                vec![1.0 / 24.0; 4],
                vec![
                    Point3::new(b, b, b),
                    Point3::new(a, b, b),
                    Point3::new(b, a, b),
                    Point3::new(b, b, a),
                ],
            ))
        }
        3 => Ok((
            vec![-2.0 / 15.0, 3.0 / 40.0, 3.0 / 40.0, 3.0 / 40.0, 3.0 / 40.0],
            vec![
                Point3::new(0.25, 0.25, 0.25),
                Point3::new(1.0 / 6.0, 1.0 / 6.0, 1.0 / 6.0),
                Point3::new(0.5, 1.0 / 6.0, 1.0 / 6.0),
                Point3::new(1.0 / 6.0, 0.5, 1.0 / 6.0),
                Point3::new(1.0 / 6.0, 1.0 / 6.0, 0.5),
            ],
        )),
        _ => bail!(
            "no tetrahedron quadrature rule of strength {} available",
            strength
        ),
    }
}

/// The quadrature strength required to integrate a product of two basis
/// families of the given polynomial degrees.
///
/// Rules of strength 0 do not exist, so the result is at least 1.
pub fn required_strength(trial_degree: usize, test_degree: usize) -> usize {
    (trial_degree + test_degree).max(1)
}
