//! Geometric value types and rotation helpers for the movement core.
//!
//! Vector and rotation algebra comes from nalgebra; this module adds the
//! thin domain types on top: wraparound-safe angles, 2D/6D poses, the
//! top-view projection and the kickable-footprint area.

pub mod angle;
pub mod area;
pub mod pose2;
pub mod pose6;
pub mod rotation;

pub use angle::Angle;
pub use area::Area2D;
pub use pose2::{Pose2D, PoseSpeed2D};
pub use pose6::{Pose6D, RotationOrder};
pub use rotation::{
    leaning_vector, rot_x, rot_y, rot_z, rotation_xyz, top_view_orientation, top_view_z_angle,
    xyz_angles_deg,
};
