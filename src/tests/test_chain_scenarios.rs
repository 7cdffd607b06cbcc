use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2};

use nalgebra::{Matrix3, Vector3};
use num_traits::Zero;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::algebra::{evaluate_matrix, evaluate_vector, Bindings, NumericAlgebra, SymbolicAlgebra, TimeVariable};
use crate::chain::{derive_symbolic, ChainComposer, CenterOfMassPositions, GeneralizedCoordinates, LinkParameters};
use crate::derivation_config::SymbolNames;
use crate::expression::Expr;
use crate::kinematics_error::KinematicsError;
use crate::tests::test_utils::{
    are_matrices_approx_equal, are_vectors_approx_equal, random_configuration, Configuration, SMALL,
};

fn compose_numeric(configuration: &Configuration) -> CenterOfMassPositions<f64> {
    let names = SymbolNames::default();
    let algebra = NumericAlgebra::new(configuration.bindings(&names));
    let links = LinkParameters::declare(&algebra, &names).unwrap();
    let coordinates = GeneralizedCoordinates::declare(&algebra, &names, &TimeVariable::new("t")).unwrap();
    ChainComposer::new(&algebra).compose(&links, &coordinates)
}

fn straight_arm(theta2: f64) -> Configuration {
    Configuration {
        l1: 1.0,
        lg1: 0.5,
        lg2: 0.3,
        q: [1.0, 0.0, 0.0, 0.0],
        theta2,
    }
}

#[test]
fn test_straight_arm_elbow_at_zero() {
    let positions = compose_numeric(&straight_arm(0.0));

    assert!(are_vectors_approx_equal(&positions.link1, &Vector3::new(0.5, 0.0, 0.0), SMALL));
    assert!(are_vectors_approx_equal(&positions.elbow_origin, &Vector3::new(1.0, 0.0, 0.0), SMALL));
    assert!(are_vectors_approx_equal(&positions.link2, &Vector3::new(1.3, 0.0, 0.0), SMALL));
}

#[test]
fn test_straight_arm_elbow_at_right_angle() {
    let positions = compose_numeric(&straight_arm(FRAC_PI_2));

    let expected_rotation = Matrix3::new(
        0.0, 0.0, 1.0,
        0.0, 1.0, 0.0,
        -1.0, 0.0, 0.0,
    );
    assert!(are_matrices_approx_equal(&positions.elbow_rotation, &expected_rotation, SMALL));
    assert!(are_vectors_approx_equal(&positions.elbow_origin, &Vector3::new(1.0, 0.0, 0.0), SMALL));
    assert!(are_vectors_approx_equal(&positions.link2, &Vector3::new(1.0, 0.0, -0.3), SMALL));
}

#[test]
fn test_symbolic_substitution_matches_scenarios() {
    let names = SymbolNames::default();
    let positions = derive_symbolic(&names).unwrap();

    for (theta2, expected_c2) in [(0.0, Vector3::new(1.3, 0.0, 0.0)), (FRAC_PI_2, Vector3::new(1.0, 0.0, -0.3))] {
        let bindings = straight_arm(theta2).bindings(&names);
        let c1 = evaluate_vector(&positions.link1, &bindings).unwrap();
        let o2 = evaluate_vector(&positions.elbow_origin, &bindings).unwrap();
        let c2 = evaluate_vector(&positions.link2, &bindings).unwrap();

        assert!(are_vectors_approx_equal(&c1, &Vector3::new(0.5, 0.0, 0.0), SMALL));
        assert!(are_vectors_approx_equal(&o2, &Vector3::new(1.0, 0.0, 0.0), SMALL));
        assert!(are_vectors_approx_equal(&c2, &expected_c2, SMALL), "theta2 = {}: {}", theta2, c2);
    }
}

#[test]
fn test_zero_link1_puts_link1_com_at_origin() {
    let algebra = SymbolicAlgebra;
    let names = SymbolNames::default();
    let links = LinkParameters::new(Expr::number(0.0), Expr::number(0.0), Expr::symbol("lg2"));
    let coordinates = GeneralizedCoordinates::declare(&algebra, &names, &TimeVariable::new("t")).unwrap();

    let positions = ChainComposer::new(&algebra).compose(&links, &coordinates);
    for e in positions.link1.iter().chain(positions.elbow_origin.iter()) {
        assert!(e.is_zero(), "Expected zero, found {}", e);
    }
}

#[test]
fn test_zero_link1_any_orientation_numeric() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..50 {
        let mut configuration = random_configuration(&mut rng);
        configuration.l1 = 0.0;
        configuration.lg1 = 0.0;
        let positions = compose_numeric(&configuration);
        assert_eq!(positions.link1, Vector3::zeros());
    }
}

#[test]
fn test_elbow_at_zero_offsets_link2_along_x() {
    let algebra = SymbolicAlgebra;
    let names = SymbolNames::default();
    let links = LinkParameters::declare(&algebra, &names).unwrap();
    let time = TimeVariable::new("t");
    let mut coordinates = GeneralizedCoordinates::declare(&algebra, &names, &time).unwrap();
    coordinates.elbow_pitch = Expr::number(0.0);

    let positions = ChainComposer::new(&algebra).compose(&links, &coordinates);
    assert_eq!(positions.elbow_rotation, Matrix3::identity());

    let o2 = &positions.elbow_origin;
    assert_eq!(positions.link2[0], Expr::sum([o2[0].clone(), Expr::symbol("lg2")]));
    assert_eq!(positions.link2[1], o2[1]);
    assert_eq!(positions.link2[2], o2[2]);
}

#[test]
fn test_link2_offset_ignores_shoulder_orientation() {
    // Shoulder turned by 90 degrees about z. The elbow moves with the shoulder,
    // but the link 2 offset is rotated by the elbow pitch only.
    let configuration = Configuration {
        l1: 1.0,
        lg1: 0.5,
        lg2: 0.3,
        q: [FRAC_1_SQRT_2, 0.0, 0.0, FRAC_1_SQRT_2],
        theta2: 0.4,
    };
    let positions = compose_numeric(&configuration);

    assert!(are_vectors_approx_equal(&positions.elbow_origin, &Vector3::new(0.0, 1.0, 0.0), SMALL));

    let offset = positions.link2 - positions.elbow_origin;
    let pitch_only = positions.elbow_rotation * Vector3::new(0.3, 0.0, 0.0);
    assert!(are_vectors_approx_equal(&offset, &pitch_only, SMALL));

    let fully_chained = positions.shoulder_rotation * positions.elbow_rotation * Vector3::new(0.3, 0.0, 0.0);
    assert!(!are_vectors_approx_equal(&offset, &fully_chained, 1e-3));
}

#[test]
fn test_symbolic_and_numeric_composition_agree() {
    let names = SymbolNames::default();
    let symbolic = derive_symbolic(&names).unwrap();
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..50 {
        let configuration = random_configuration(&mut rng);
        let bindings = configuration.bindings(&names);
        let numeric = compose_numeric(&configuration);

        let checks = [
            (evaluate_vector(&symbolic.link1, &bindings).unwrap(), numeric.link1),
            (evaluate_vector(&symbolic.link2, &bindings).unwrap(), numeric.link2),
            (evaluate_vector(&symbolic.elbow_origin, &bindings).unwrap(), numeric.elbow_origin),
        ];
        for (substituted, computed) in checks.iter() {
            assert!(are_vectors_approx_equal(substituted, computed, SMALL));
        }
        let r1 = evaluate_matrix(&symbolic.shoulder_rotation, &bindings).unwrap();
        assert!(are_matrices_approx_equal(&r1, &numeric.shoulder_rotation, SMALL));
    }
}

#[test]
fn test_composition_is_repeatable() {
    let names = SymbolNames::default();
    assert_eq!(derive_symbolic(&names).unwrap(), derive_symbolic(&names).unwrap());
}

#[test]
fn test_custom_names() {
    let names = SymbolNames {
        time: "tau".to_string(),
        link2_com_offset: "forearm_com".to_string(),
        elbow_pitch: "elbow".to_string(),
        ..SymbolNames::default()
    };
    let positions = derive_symbolic(&names).unwrap();
    assert_eq!(
        positions.link2[2].to_string(),
        "2*(q1x(tau)*q1z(tau) - q1w(tau)*q1y(tau))*l1 - sin(elbow(tau))*forearm_com"
    );
}

#[test]
fn test_missing_binding_fails() {
    let names = SymbolNames::default();
    let algebra = NumericAlgebra::new(Bindings::new().with("l1", 1.0).with("lg1", 0.5));
    match LinkParameters::declare(&algebra, &names) {
        Err(KinematicsError::UndefinedSymbol(name)) => assert_eq!(name, "lg2"),
        other => panic!("Expected undefined lg2, got {:?}", other),
    }
}

#[test]
fn test_wrong_quaternion_arity_fails() {
    let names = SymbolNames {
        shoulder_quaternion: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        ..SymbolNames::default()
    };
    assert!(matches!(
        derive_symbolic(&names),
        Err(KinematicsError::MalformedInput { expected: 4, found: 3 })
    ));
}
