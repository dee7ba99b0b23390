pub mod calculations;
pub mod models;

pub use calculations::{
    JointEstimator, PersonalAdjustment, ReducedEstimator, ReducedProfile, ReducedProfileError,
};
pub use models::*;
