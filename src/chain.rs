//! Center of mass positions of the two-link arm.
//!
//! The chain is Base -> shoulder (quaternion) -> elbow (pitch). Both links extend along
//! their local x axis. Positions are expressed in the base frame:
//!
//! ```text
//! O1 = 0
//! C1 = O1 + R1 * (lg1, 0, 0)
//! O2 = O1 + R1 * (l1, 0, 0)
//! C2 = O2 + R2 * (lg2, 0, 0)
//! ```
//!
//! The link 2 offset is rotated by the elbow pitch R2 only, not by R1 * R2. This is how the
//! model used downstream has been derived and must be kept, even if the link 2 center of
//! mass then does not follow the shoulder orientation.

use nalgebra::{Matrix3, Vector3};
use tracing::debug;

use crate::algebra::{Algebra, SymbolicAlgebra, TimeVariable};
use crate::derivation_config::SymbolNames;
use crate::expression::Expr;
use crate::kinematics_error::KinematicsError;
use crate::rotation::{pitch_rotation, quaternion_rotation, JointQuaternion};

/// Geometry of the links.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkParameters<S> {
    /// Length of link 1 (shoulder to elbow).
    pub l1: S,

    /// Offset of the link 1 center of mass along its local x axis.
    pub lg1: S,

    /// Offset of the link 2 center of mass along its local x axis.
    pub lg2: S,
}

impl<S> LinkParameters<S> {
    pub fn new(l1: S, lg1: S, lg2: S) -> Self {
        Self { l1, lg1, lg2 }
    }

    /// Declares the link parameters as named constants of the algebra.
    pub fn declare<A: Algebra<Scalar = S>>(algebra: &A, names: &SymbolNames) -> Result<Self, KinematicsError> {
        Ok(Self {
            l1: algebra.symbol(&names.link1_length)?,
            lg1: algebra.symbol(&names.link1_com_offset)?,
            lg2: algebra.symbol(&names.link2_com_offset)?,
        })
    }
}

/// Joint state of the arm.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralizedCoordinates<S> {
    pub shoulder: JointQuaternion<S>,
    pub elbow_pitch: S,
}

impl<S: Clone> GeneralizedCoordinates<S> {
    pub fn new(shoulder: JointQuaternion<S>, elbow_pitch: S) -> Self {
        Self { shoulder, elbow_pitch }
    }

    /// Declares the coordinates as functions of the given time variable.
    pub fn declare<A: Algebra<Scalar = S>>(
        algebra: &A,
        names: &SymbolNames,
        time: &TimeVariable,
    ) -> Result<Self, KinematicsError> {
        let shoulder = names
            .shoulder_quaternion
            .iter()
            .map(|name| algebra.coordinate(name, time))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            shoulder: JointQuaternion::from_components(&shoulder)?,
            elbow_pitch: algebra.coordinate(&names.elbow_pitch, time)?,
        })
    }
}

/// Result of the chain composition. Besides the centers of mass, the elbow origin and both
/// rotation matrices are kept for inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct CenterOfMassPositions<S> {
    /// C1, center of mass of link 1
    pub link1: Vector3<S>,

    /// C2, center of mass of link 2
    pub link2: Vector3<S>,

    /// O2, origin of link 2 (the elbow joint)
    pub elbow_origin: Vector3<S>,

    /// R1
    pub shoulder_rotation: Matrix3<S>,

    /// R2
    pub elbow_rotation: Matrix3<S>,
}

/// Walks the chain frame by frame using the given algebra.
pub struct ChainComposer<'a, A: Algebra> {
    algebra: &'a A,
}

impl<'a, A: Algebra> ChainComposer<'a, A> {
    pub fn new(algebra: &'a A) -> Self {
        Self { algebra }
    }

    pub fn compose(
        &self,
        links: &LinkParameters<A::Scalar>,
        coordinates: &GeneralizedCoordinates<A::Scalar>,
    ) -> CenterOfMassPositions<A::Scalar> {
        let algebra = self.algebra;
        let along_x = |length: &A::Scalar| algebra.vector(length.clone(), algebra.zero(), algebra.zero());

        let shoulder_origin = algebra.vector(algebra.zero(), algebra.zero(), algebra.zero());
        let shoulder_rotation = quaternion_rotation(algebra, &coordinates.shoulder);

        let link1 = algebra.vector_add(
            &shoulder_origin,
            &algebra.transform(&shoulder_rotation, &along_x(&links.lg1)),
        );
        let elbow_origin = algebra.vector_add(
            &shoulder_origin,
            &algebra.transform(&shoulder_rotation, &along_x(&links.l1)),
        );
        debug!("Link 1 center of mass: {}", algebra.render_vector(&link1));
        debug!("Elbow origin: {}", algebra.render_vector(&elbow_origin));

        // R2 alone, without R1
        let elbow_rotation = pitch_rotation(algebra, &coordinates.elbow_pitch);
        let link2 = algebra.vector_add(
            &elbow_origin,
            &algebra.transform(&elbow_rotation, &along_x(&links.lg2)),
        );
        debug!("Link 2 center of mass: {}", algebra.render_vector(&link2));

        CenterOfMassPositions {
            link1,
            link2,
            elbow_origin,
            shoulder_rotation,
            elbow_rotation,
        }
    }
}

/// Declares all parameters and coordinates under the given names and derives the symbolic
/// center of mass positions.
pub fn derive_symbolic(names: &SymbolNames) -> Result<CenterOfMassPositions<Expr>, KinematicsError> {
    let algebra = SymbolicAlgebra;
    let time = TimeVariable::new(names.time.as_str());
    let links = LinkParameters::declare(&algebra, names)?;
    let coordinates = GeneralizedCoordinates::declare(&algebra, names, &time)?;
    Ok(ChainComposer::new(&algebra).compose(&links, &coordinates))
}
