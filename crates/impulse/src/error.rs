use thiserror::Error;

/// Reasons a structural edit (adding a joint) was refused.
///
/// The simulation itself never fails; these only surface from the `try_`
/// builders. The plain builders log the error and return `None` instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhysicsError {
    #[error("part id {id} out of range (composite has {len} parts)")]
    InvalidPart { id: usize, len: usize },
    #[error("body index {index} out of range (scene has {len} bodies)")]
    InvalidBody { index: usize, len: usize },
    #[error("a joint needs two distinct bodies, got {0} twice")]
    SelfJoint(usize),
}
