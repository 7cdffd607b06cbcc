//! Rotation matrices of the two joints: the shoulder orientation given by a quaternion and
//! the elbow pitch about the y axis.

use nalgebra::Matrix3;

use crate::algebra::Algebra;
use crate::kinematics_error::KinematicsError;

/// Orientation quaternion with components in (w, x, y, z) order. The components are not
/// required to be normalized and are never checked. A quaternion that is not unit produces
/// a matrix that is not orthonormal.
#[derive(Debug, Clone, PartialEq)]
pub struct JointQuaternion<S> {
    pub w: S,
    pub x: S,
    pub y: S,
    pub z: S,
}

impl<S: Clone> JointQuaternion<S> {
    pub fn new(w: S, x: S, y: S, z: S) -> Self {
        Self { w, x, y, z }
    }

    /// Takes the components from the slice in (w, x, y, z) order. The slice must have
    /// exactly four elements.
    pub fn from_components(components: &[S]) -> Result<Self, KinematicsError> {
        match components {
            [w, x, y, z] => Ok(Self::new(w.clone(), x.clone(), y.clone(), z.clone())),
            _ => Err(KinematicsError::MalformedInput { expected: 4, found: components.len() }),
        }
    }
}

/// Rotation matrix of the quaternion:
/// ```text
/// [[1-2(y²+z²),   2(xy-wz),     2(xz+wy)],
///  [2(xy+wz),     1-2(x²+z²),   2(yz-wx)],
///  [2(xz-wy),     2(yz+wx),     1-2(x²+y²)]]
/// ```
pub fn quaternion_rotation<A: Algebra>(algebra: &A, q: &JointQuaternion<A::Scalar>) -> Matrix3<A::Scalar> {
    let (w, x, y, z) = (&q.w, &q.x, &q.y, &q.z);
    let one = algebra.one();
    let two = algebra.constant(2.0);

    // 1 - 2(a² + b²)
    let diagonal = |a: &A::Scalar, b: &A::Scalar| {
        let squares = algebra.add(&algebra.square(a), &algebra.square(b));
        algebra.sub(&one, &algebra.mul(&two, &squares))
    };
    // 2(ab - cd) and 2(ab + cd)
    let twice_difference = |a: &A::Scalar, b: &A::Scalar, c: &A::Scalar, d: &A::Scalar| {
        algebra.mul(&two, &algebra.sub(&algebra.mul(a, b), &algebra.mul(c, d)))
    };
    let twice_sum = |a: &A::Scalar, b: &A::Scalar, c: &A::Scalar, d: &A::Scalar| {
        algebra.mul(&two, &algebra.add(&algebra.mul(a, b), &algebra.mul(c, d)))
    };

    Matrix3::new(
        diagonal(y, z), twice_difference(x, y, w, z), twice_sum(x, z, w, y),
        twice_sum(x, y, w, z), diagonal(x, z), twice_difference(y, z, w, x),
        twice_difference(x, z, w, y), twice_sum(y, z, w, x), diagonal(x, y),
    )
}

/// Rotation about the y axis (pitch) by the angle:
/// ```text
/// [[ cos θ, 0, sin θ],
///  [ 0,     1, 0    ],
///  [-sin θ, 0, cos θ]]
/// ```
pub fn pitch_rotation<A: Algebra>(algebra: &A, theta: &A::Scalar) -> Matrix3<A::Scalar> {
    let (sin, cos) = (algebra.sin(theta), algebra.cos(theta));
    Matrix3::new(
        cos.clone(), algebra.zero(), sin.clone(),
        algebra.zero(), algebra.one(), algebra.zero(),
        algebra.neg(&sin), algebra.zero(), cos,
    )
}
