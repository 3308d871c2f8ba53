//! Commonly used types, re-exported for convenient `use crate::prelude::*`.

pub use crate::math::mat3::Mat3;
pub use crate::math::mat4::Mat4;
pub use crate::math::vec2::Vec2;
pub use crate::math::vec3::Vec3;
pub use crate::math::vec4::Vec4;
