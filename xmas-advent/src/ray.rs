//! This module turns a cursor position into a ray through the scene, for picking decorations.

use glam::{Mat4, Vec2, Vec3};

/// Cast a ray from the camera through the cursor.
///
/// `cursor` is in logical pixels measured from the bottom left corner of a viewport that is
/// `viewport_size` logical pixels big. `camera_to_world` is the camera's transform and
/// `projection` is its projection matrix, which must map the near plane to an NDC depth of 1 and
/// infinity to 0, like Bevy's perspective projection.
///
/// Return the origin of the ray on the near plane and its normalised direction, or `None` if the
/// viewport is empty or the matrices can't be inverted.
pub fn cursor_ray(
    cursor: Vec2,
    viewport_size: Vec2,
    camera_to_world: Mat4,
    projection: Mat4,
) -> Option<(Vec3, Vec3)> {
    if !(viewport_size.x > 0. && viewport_size.y > 0.) {
        return None;
    }

    let ndc = cursor / viewport_size * 2. - Vec2::ONE;
    let ndc_to_world = camera_to_world * projection.inverse();

    let near = ndc_to_world.project_point3(ndc.extend(1.));
    let far = ndc_to_world.project_point3(ndc.extend(f32::EPSILON));
    let direction = (far - near).try_normalize()?;

    near.is_finite().then_some((near, direction))
}
