/// Axis-aligned geometry shared by every entity.
///
/// Coordinates are continuous pixels, origin top-left, y grows downward.
/// An entity's position is the CENTER of its hitbox, so the box is always
/// derived on demand from (x, y, w, h) and never cached.

/// Width and height of a hitbox (taken from the active sprite).
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    pub const fn new(w: f64, h: f64) -> Self {
        Size { w, h }
    }
}

/// Axis-aligned rectangle stored as top-left corner + extent.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Rectangle of `size` centered on (cx, cy).
    pub fn centered(cx: f64, cy: f64, size: Size) -> Self {
        Rect {
            left: cx - size.w / 2.0,
            top: cy - size.h / 2.0,
            width: size.w,
            height: size.h,
        }
    }

    #[inline]
    pub fn right(&self) -> f64 { self.left + self.width }

    #[inline]
    pub fn bottom(&self) -> f64 { self.top + self.height }

    /// Strict overlap: rectangles that only share an edge do NOT intersect.
    /// An entity resting exactly on a platform is therefore not colliding with it.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right()
            && self.right() > other.left
            && self.top < other.bottom()
            && self.bottom() > other.top
    }

    /// Half-open containment: left/top edges inclusive, right/bottom exclusive.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.left && px < self.right() && py >= self.top && py < self.bottom()
    }
}

/// Horizontal facing, shared by the player, monkeys and projectiles.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1.0 for left, +1.0 for right.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// Playfield dimensions, passed explicitly to whoever clamps against them.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Screen {
    pub width: f64,
    pub height: f64,
}

/// Position + hitbox extent of a single entity.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Body {
    pub x: f64,
    pub y: f64,
    pub size: Size,
}

impl Body {
    pub fn new(x: f64, y: f64, size: Size) -> Self {
        Body { x, y, size }
    }

    /// Current bounding box, recomputed from position and size.
    #[inline]
    pub fn bounding_box(&self) -> Rect {
        Rect::centered(self.x, self.y, self.size)
    }

    #[inline]
    pub fn overlaps(&self, other: &Body) -> bool {
        self.bounding_box().intersects(&other.bounding_box())
    }

    #[inline]
    pub fn half_w(&self) -> f64 { self.size.w / 2.0 }

    #[inline]
    pub fn half_h(&self) -> f64 { self.size.h / 2.0 }

    #[inline]
    pub fn left(&self) -> f64 { self.x - self.half_w() }

    #[inline]
    pub fn right(&self) -> f64 { self.x + self.half_w() }

    #[inline]
    pub fn top(&self) -> f64 { self.y - self.half_h() }

    #[inline]
    pub fn bottom(&self) -> f64 { self.y + self.half_h() }

    /// Move vertically so the bottom edge sits at `bottom`.
    #[inline]
    pub fn set_bottom(&mut self, bottom: f64) {
        self.y = bottom - self.half_h();
    }

    /// Swap the hitbox extent, keeping the bottom edge where it was.
    ///
    /// Post-condition: `self.bottom()` is unchanged. A taller sprite grows
    /// upward instead of sinking into the surface it stands on.
    pub fn resize_keep_bottom(&mut self, size: Size) {
        let bottom = self.bottom();
        self.size = size;
        self.set_bottom(bottom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(l: f64, t: f64, w: f64, h: f64) -> Rect {
        Rect { left: l, top: t, width: w, height: h }
    }

    #[test]
    fn centered_rect_extents() {
        let r = Rect::centered(50.0, 40.0, Size::new(20.0, 10.0));
        assert_eq!(r.left, 40.0);
        assert_eq!(r.top, 35.0);
        assert_eq!(r.right(), 60.0);
        assert_eq!(r.bottom(), 45.0);
    }

    #[test]
    fn overlapping_rects_intersect() {
        assert!(rect(0.0, 0.0, 10.0, 10.0).intersects(&rect(5.0, 5.0, 10.0, 10.0)));
    }

    #[test]
    fn edge_contact_is_not_intersection() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&rect(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.intersects(&rect(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn contained_rect_intersects() {
        assert!(rect(0.0, 0.0, 100.0, 100.0).intersects(&rect(40.0, 40.0, 1.0, 1.0)));
    }

    #[test]
    fn contains_is_half_open() {
        let r = rect(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(0.0, 0.0));
        assert!(r.contains(9.9, 9.9));
        assert!(!r.contains(10.0, 5.0));
        assert!(!r.contains(5.0, 10.0));
    }

    #[test]
    fn facing_sign_and_flip() {
        assert_eq!(Facing::Left.sign(), -1.0);
        assert_eq!(Facing::Right.sign(), 1.0);
        assert_eq!(Facing::Left.flipped(), Facing::Right);
    }

    #[test]
    fn bounding_box_tracks_position() {
        let mut b = Body::new(10.0, 10.0, Size::new(4.0, 4.0));
        b.x += 5.0;
        assert_eq!(b.bounding_box().left, 13.0);
    }

    #[test]
    fn resize_preserves_bottom_edge() {
        let mut b = Body::new(100.0, 200.0, Size::new(30.0, 40.0));
        let before = b.bottom();
        b.resize_keep_bottom(Size::new(48.0, 56.0));
        assert_eq!(b.bottom(), before);
        assert_eq!(b.size.h, 56.0);
        b.resize_keep_bottom(Size::new(20.0, 20.0));
        assert_eq!(b.bottom(), before);
    }
}
