//! Text report with the derived center of mass positions.
//!
//! ```text
//! Link 1 Center of Mass:
//! Matrix([[...], [...], [...]])
//!
//! Link 2 Center of Mass:
//! Matrix([[...], [...], [...]])
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Vector3;
use tracing::info;

use crate::algebra::Algebra;
use crate::chain::CenterOfMassPositions;
use crate::expression::Expr;
use crate::expression_parser::parse_column_vector;
use crate::kinematics_error::KinematicsError;

const LINK1_HEADER: &str = "Link 1 Center of Mass:";
const LINK2_HEADER: &str = "Link 2 Center of Mass:";

/// Formats the report text for the positions.
pub fn render_report<A: Algebra>(algebra: &A, positions: &CenterOfMassPositions<A::Scalar>) -> String {
    format!(
        "{}\n{}\n\n{}\n{}\n",
        LINK1_HEADER,
        algebra.render_vector(&positions.link1),
        LINK2_HEADER,
        algebra.render_vector(&positions.link2)
    )
}

/// Writes the report text into the file, replacing any previous content. The file is closed
/// when this function returns, also on error.
pub fn write_report<P: AsRef<Path>>(path: P, text: &str) -> Result<(), KinematicsError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    info!("Center of mass positions written to {}", path.display());
    Ok(())
}

/// Reads the link 1 and link 2 center of mass vectors back from the report text.
pub fn parse_report(text: &str) -> Result<(Vector3<Expr>, Vector3<Expr>), KinematicsError> {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
    let mut section = |header: &str| -> Result<Vector3<Expr>, KinematicsError> {
        match lines.next() {
            Some(line) if line == header => {}
            other => {
                return Err(KinematicsError::ParseError(format!(
                    "expected '{}', found {:?}", header, other
                )));
            }
        }
        let vector = lines.next().ok_or_else(|| {
            KinematicsError::ParseError(format!("no vector after '{}'", header))
        })?;
        parse_column_vector(vector)
    };
    let link1 = section(LINK1_HEADER)?;
    let link2 = section(LINK2_HEADER)?;
    if let Some(extra) = lines.next() {
        return Err(KinematicsError::ParseError(format!("unexpected line '{}'", extra)));
    }
    Ok((link1, link2))
}
