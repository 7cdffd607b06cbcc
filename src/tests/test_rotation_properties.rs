use std::f64::consts::PI;

use nalgebra::{Matrix3, Quaternion, UnitQuaternion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::algebra::{evaluate_matrix, Algebra, Bindings, NumericAlgebra, SymbolicAlgebra, TimeVariable};
use crate::chain::GeneralizedCoordinates;
use crate::derivation_config::SymbolNames;
use crate::expression::Expr;
use crate::rotation::{pitch_rotation, quaternion_rotation, JointQuaternion};
use crate::tests::test_utils::{are_matrices_approx_equal, random_unit_quaternion, SMALL};

fn symbolic_shoulder_rotation() -> Matrix3<Expr> {
    let algebra = SymbolicAlgebra;
    let names = SymbolNames::default();
    let coordinates =
        GeneralizedCoordinates::declare(&algebra, &names, &TimeVariable::new("t")).unwrap();
    quaternion_rotation(&algebra, &coordinates.shoulder)
}

fn quaternion_bindings(q: &[f64; 4]) -> Bindings {
    Bindings::new()
        .with("q1w", q[0])
        .with("q1x", q[1])
        .with("q1y", q[2])
        .with("q1z", q[3])
}

#[test]
fn test_unit_quaternion_gives_orthonormal_matrix() {
    let r = symbolic_shoulder_rotation();
    let mut rng = StdRng::seed_from_u64(20240611);
    for _ in 0..200 {
        let q = random_unit_quaternion(&mut rng);
        let m = evaluate_matrix(&r, &quaternion_bindings(&q)).unwrap();

        assert!(
            are_matrices_approx_equal(&(m.transpose() * m), &Matrix3::identity(), SMALL),
            "Not orthonormal for {:?}:\n{}", q, m
        );
        assert!((m.determinant() - 1.0).abs() < SMALL, "Determinant {} for {:?}", m.determinant(), q);
    }
}

#[test]
fn test_quaternion_rotation_matches_nalgebra() {
    let r = symbolic_shoulder_rotation();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..100 {
        let q = random_unit_quaternion(&mut rng);
        let m = evaluate_matrix(&r, &quaternion_bindings(&q)).unwrap();
        let expected = UnitQuaternion::from_quaternion(Quaternion::new(q[0], q[1], q[2], q[3]))
            .to_rotation_matrix()
            .into_inner();
        assert!(are_matrices_approx_equal(&m, &expected, SMALL), "{}\nvs\n{}", m, expected);
    }
}

#[test]
fn test_symbolic_and_numeric_backends_agree() {
    let r = symbolic_shoulder_rotation();
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..20 {
        let q = random_unit_quaternion(&mut rng);
        let numeric = quaternion_rotation(
            &NumericAlgebra::default(),
            &JointQuaternion::from_components(&q).unwrap(),
        );
        let substituted = evaluate_matrix(&r, &quaternion_bindings(&q)).unwrap();
        assert!(are_matrices_approx_equal(&numeric, &substituted, 1e-14));
    }
}

#[test]
fn test_non_unit_quaternion_is_not_checked() {
    // (1, 1, 0, 0) has norm sqrt(2). No error, but the result is not a rotation.
    let m = quaternion_rotation(
        &NumericAlgebra::default(),
        &JointQuaternion::new(1.0, 1.0, 0.0, 0.0),
    );
    let expected = Matrix3::new(
        1.0, 0.0, 0.0,
        0.0, -1.0, -2.0,
        0.0, 2.0, -1.0,
    );
    assert_eq!(m, expected);
    assert!((m.determinant() - 5.0).abs() < SMALL);
}

#[test]
fn test_pitch_at_zero_is_identity() {
    let r = pitch_rotation(&SymbolicAlgebra, &Expr::number(0.0));
    assert_eq!(r, Matrix3::<Expr>::identity());

    let r = pitch_rotation(&NumericAlgebra::default(), &0.0);
    assert_eq!(r, Matrix3::identity());
}

#[test]
fn test_pitch_is_periodic() {
    let algebra = SymbolicAlgebra;
    let theta = algebra.coordinate("theta2", &TimeVariable::new("t")).unwrap();
    let full_turn = algebra.add(&theta, &algebra.constant(2.0 * PI));

    let r = pitch_rotation(&algebra, &theta);
    let r_turned = pitch_rotation(&algebra, &full_turn);

    for step in -8..=8 {
        let bindings = Bindings::new().with("theta2", step as f64 * PI / 8.0);
        let m = evaluate_matrix(&r, &bindings).unwrap();
        let m_turned = evaluate_matrix(&r_turned, &bindings).unwrap();
        assert!(are_matrices_approx_equal(&m, &m_turned, SMALL));
    }
}

#[test]
fn test_pitch_is_orthonormal() {
    for step in 0..16 {
        let theta = step as f64 * PI / 8.0;
        let m = pitch_rotation(&NumericAlgebra::default(), &theta);
        assert!(are_matrices_approx_equal(&(m.transpose() * m), &Matrix3::identity(), SMALL));
        assert!((m.determinant() - 1.0).abs() < SMALL);
        // Rotation about y leaves y unchanged
        assert_eq!(m[(1, 1)], 1.0);
    }
}
