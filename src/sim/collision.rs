//! Circle collision tests

use glam::Vec2;

use super::entity::Body;

/// Two circles overlap when their centres are closer than the sum of their
/// radii. Touching circles do not collide.
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a.distance_squared(b) < reach * reach
}

/// Collision test between two entity bodies
#[inline]
pub fn bodies_collide(a: &Body, b: &Body) -> bool {
    circles_overlap(a.pos, a.radius, b.pos, b.radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_touching_circles_do_not_collide() {
        assert!(!circles_overlap(Vec2::ZERO, 3.0, Vec2::new(5.0, 0.0), 2.0));
        assert!(circles_overlap(Vec2::ZERO, 3.0, Vec2::new(4.999, 0.0), 2.0));
    }

    #[test]
    fn test_diagonal_overlap() {
        // Distance 5 (3-4-5 triangle)
        let a = Vec2::new(1.0, 1.0);
        let b = Vec2::new(4.0, 5.0);
        assert!(!circles_overlap(a, 2.5, b, 2.5));
        assert!(circles_overlap(a, 2.5, b, 2.6));
    }

    #[test]
    fn test_bodies_collide() {
        let a = Body::new(Vec2::ZERO, Vec2::ZERO, 1.0);
        let b = Body::new(Vec2::new(1.5, 0.0), Vec2::new(9.0, 9.0), 1.0);
        assert!(bodies_collide(&a, &b));
    }

    proptest! {
        #[test]
        fn prop_collision_is_symmetric(
            ax in -1000.0f32..1000.0, ay in -1000.0f32..1000.0, ar in 0.1f32..50.0,
            bx in -1000.0f32..1000.0, by in -1000.0f32..1000.0, br in 0.1f32..50.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assert_eq!(circles_overlap(a, ar, b, br), circles_overlap(b, br, a, ar));
        }

        #[test]
        fn prop_boundary_is_strict(
            r1 in 1u32..50, r2 in 1u32..50, dir in prop::sample::select(vec![(1.0f32, 0.0f32), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)]),
        ) {
            // Integer radii keep the touching distance exact in f32
            let (r1, r2) = (r1 as f32, r2 as f32);
            let d = Vec2::new(dir.0, dir.1);
            prop_assert!(!circles_overlap(Vec2::ZERO, r1, d * (r1 + r2), r2));
            prop_assert!(circles_overlap(Vec2::ZERO, r1, d * (r1 + r2 - 0.01), r2));
        }
    }
}
