use std::ops::{Add, Div, Mul, Sub};

/// Lightweight 2D vector for screen and raster coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean length of the vector.
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl Div<f32> for Vec2 {
    type Output = Self;
    fn div(self, scalar: f32) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl From<eframe::egui::Pos2> for Vec2 {
    fn from(p: eframe::egui::Pos2) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<eframe::egui::Vec2> for Vec2 {
    fn from(v: eframe::egui::Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// Convenience helper to measure the distance between two positions.
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Shortest distance from `p` to the segment `a..b`.
///
/// Points past either end measure to the nearest endpoint, which is what
/// gives stroked segments their round caps.
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.dot(ab);
    if len_sq <= f32::EPSILON {
        return distance(p, a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    distance(p, a + ab * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_distance_inside_and_past_the_caps() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert!((distance_to_segment(Vec2::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-5);
        assert!((distance_to_segment(Vec2::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-5);
        assert!((distance_to_segment(Vec2::new(-3.0, 0.0), a, b) - 3.0).abs() < 1e-5);
    }

    #[test]
    fn degenerate_segment_is_a_point() {
        let a = Vec2::new(2.0, 2.0);
        assert!((distance_to_segment(Vec2::new(5.0, 6.0), a, a) - 5.0).abs() < 1e-5);
    }
}
