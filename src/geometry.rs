/// Geometry primitives shared by every entity: positions, boxes and the
/// closed-interval AABB overlap test.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ONE: Vector2 = Vector2 { x: 1.0, y: 1.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Top-left anchored axis-aligned box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Negative extents are clamped to zero.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Closed-interval overlap: boxes that only touch at an edge collide.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }
}

/// Free-function form of [`Rect::intersects`].
pub fn is_colliding(a: &Rect, b: &Rect) -> bool {
    a.intersects(b)
}

/// `min` wins when the range is inverted, so a play area narrower than a
/// sprite still yields a finite position.
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    min.max(value.min(max))
}

/// Cubic ease-out on `t` in `0..=1`.
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = clamp(t, 0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_touching_boxes_collide() {
        let bullet = Rect::new(0.0, 0.0, 5.0, 10.0);
        let alien = Rect::new(5.0, 0.0, 25.0, 25.0);
        assert!(is_colliding(&bullet, &alien));
        assert!(is_colliding(&alien, &bullet));
    }

    #[test]
    fn separated_boxes_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 5.0, 5.0);
        let b = Rect::new(5.1, 0.0, 5.0, 5.0);
        assert!(!is_colliding(&a, &b));
        let c = Rect::new(0.0, 5.5, 5.0, 5.0);
        assert!(!is_colliding(&a, &c));
    }

    #[test]
    fn collision_is_symmetric() {
        let boxes = [
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(10.0, 10.0, 1.0, 1.0),
            Rect::new(3.0, -4.0, 2.0, 20.0),
            Rect::new(-50.0, 2.0, 49.0, 3.0),
            Rect::new(4.0, 4.0, 0.0, 0.0),
        ];
        for a in &boxes {
            for b in &boxes {
                assert_eq!(is_colliding(a, b), is_colliding(b, a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn clamp_keeps_inside_range() {
        assert_eq!(clamp(-3.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(13.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp(4.0, 0.0, 10.0), 4.0);
        assert_eq!(clamp(4.0, 10.0, 0.0), 10.0);
    }

    #[test]
    fn ease_out_hits_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!(ease_out_cubic(0.5) > 0.5);
    }
}
