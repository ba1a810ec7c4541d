//! Basic geometry types for widget bounds and hit testing

/// A 2D size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }
}

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// A rectangle defined by position and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Create a new rectangle with padding applied (inset from all sides).
    /// Returns a smaller rectangle inside this one.
    pub fn with_padding(&self, padding: f32) -> Rectangle {
        Rectangle::new(
            self.x + padding,
            self.y + padding,
            (self.width - padding * 2.0).max(0.0),
            (self.height - padding * 2.0).max(0.0),
        )
    }

    /// Get the center point of this rectangle.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_contains() {
        let rect = Rectangle::new(10.0, 20.0, 40.0, 18.0);
        assert!(rect.contains(Point::new(10.0, 20.0)));
        assert!(rect.contains(Point::new(30.0, 29.0)));
        assert!(rect.contains(Point::new(50.0, 38.0)));
        assert!(!rect.contains(Point::new(9.9, 25.0)));
        assert!(!rect.contains(Point::new(30.0, 38.1)));
    }

    #[test]
    fn test_rectangle_with_padding() {
        let rect = Rectangle::new(0.0, 0.0, 40.0, 18.0);
        let inner = rect.with_padding(3.0);
        assert_eq!(inner, Rectangle::new(3.0, 3.0, 34.0, 12.0));

        // Padding larger than the rect clamps to zero size
        let tiny = Rectangle::new(0.0, 0.0, 4.0, 4.0).with_padding(3.0);
        assert_eq!(tiny.width, 0.0);
        assert_eq!(tiny.height, 0.0);
    }

    #[test]
    fn test_rectangle_center() {
        let rect = Rectangle::new(10.0, 10.0, 20.0, 10.0);
        assert_eq!(rect.center(), Point::new(20.0, 15.0));
    }
}
