pub type Vector2F = Vector2X<f32>;
pub type Vector2U = Vector2X<u32>;
pub type Vector2I = Vector2X<i32>;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Vector2X<T> {
    pub x: T,
    pub y: T,
}

pub type Rect2I = Rect2X<i32>;

/// Axis aligned rectangle, `pos` is the top-left corner in screen space.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rect2X<T> {
    pub pos: Vector2X<T>,
    pub size: Vector2X<T>,
}

impl<T: std::fmt::Display> std::fmt::Display for Vector2X<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{}]", self.x, self.y)
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Rect2X<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[({},{}), ({},{})]", self.pos.x, self.pos.y, self.size.x, self.size.y)
    }
}

impl<T> Vector2X<T>
where
    T: Default
{
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: T::default(), y: T::default() }
    }
}

impl<T> std::ops::Add for Vector2X<T>
where
    T: std::ops::Add<Output = T>
{
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y
        }
    }
}

impl<T> std::ops::AddAssign for Vector2X<T>
where
    T: std::ops::AddAssign
{
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl<T> std::ops::Sub for Vector2X<T>
where
    T: std::ops::Sub<Output = T>
{
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: T::sub(self.x, rhs.x),
            y: T::sub(self.y, rhs.y)
        }
    }
}

impl<T> std::ops::Neg for Vector2X<T>
where
    T: std::ops::Neg<Output = T>
{
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self {
            x: T::neg(self.x),
            y: T::neg(self.y),
        }
    }
}

impl<T> std::ops::Mul<T> for Vector2X<T>
where
    T: std::ops::Mul<Output = T> + Copy
{
    type Output = Self;
    fn mul(self, rhs: T) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs
        }
    }
}

impl From<Vector2X<u32>> for Vector2X<i32> {
    fn from(value: Vector2X<u32>) -> Self {
        Self { x: value.x as i32, y: value.y as i32 }
    }
}

impl From<Vector2X<i32>> for Vector2X<f32> {
    fn from(value: Vector2X<i32>) -> Self {
        Self { x: value.x as f32, y: value.y as f32 }
    }
}

impl<T> Rect2X<T> {
    pub fn new(x: T, y: T, w: T, h: T) -> Self {
        Self { pos: Vector2X { x, y }, size: Vector2X { x: w, y: h } }
    }
}

impl<T> Rect2X<T>
where
    T: PartialOrd + std::ops::Add<Output = T> + Copy
{
    pub fn right(&self) -> T {
        self.pos.x + self.size.x
    }

    pub fn bottom(&self) -> T {
        self.pos.y + self.size.y
    }

    pub fn contains(&self, point: &Vector2X<T>) -> bool {
        point.x >= self.pos.x
            && point.y >= self.pos.y
            && point.x < self.right()
            && point.y < self.bottom()
    }

    /// Edges may touch, `other` must not stick out on any side.
    pub fn contains_rect(&self, other: &Rect2X<T>) -> bool {
        other.pos.x >= self.pos.x
            && other.pos.y >= self.pos.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

#[test]
fn test_vector_creation() {
    let v1 = Vector2I::new(1, 2);
    assert_eq!(v1.x, 1);
    assert_eq!(v1.y, 2);
    assert_eq!(Vector2I::zero(), Vector2I::new(0, 0));
}

#[test]
fn test_vector_add_assign() {
    let v1 = Vector2I::new(10, -10);
    let mut v2 = Vector2I::new(1, 2);
    v2 += v1;
    assert_eq!(v2, Vector2I::new(11, -8));
}

#[test]
fn test_vector_sub_and_negation() {
    let v1 = Vector2I::new(5, 7);
    assert_eq!(v1 - Vector2I::new(5, 7), Vector2I::zero());
    assert_eq!(-v1, Vector2I::new(-5, -7));
}

#[test]
fn test_vector_mul_scalar() {
    let v1 = Vector2I::new(1, -2);
    assert_eq!(v1 * 10, Vector2I::new(10, -20));
}

#[test]
fn test_vector_casting() {
    let v1 = Vector2U::new(640, 480);
    let v1_i32 = Vector2I::from(v1);
    assert_eq!(v1_i32, Vector2I::new(640, 480));

    let v1_f32 = Vector2F::from(v1_i32);
    assert_eq!(v1_f32, Vector2F::new(640.0, 480.0));
}

#[test]
fn test_rect_edges() {
    let rect = Rect2I::new(10, 20, 30, 40);
    assert_eq!(rect.right(), 40);
    assert_eq!(rect.bottom(), 60);
}

#[test]
fn test_rect_containing_point() {
    let rect = Rect2I::new(0, 0, 20, 20);
    assert!(rect.contains(&Vector2I::new(0, 0)));
    assert!(rect.contains(&Vector2I::new(19, 19)));
    assert!(!rect.contains(&Vector2I::new(20, 0)));
    assert!(!rect.contains(&Vector2I::new(0, 20)));
    assert!(!rect.contains(&Vector2I::new(-1, 5)));
}

#[test]
fn test_rect_containing_rect() {
    let screen = Rect2I::new(0, 0, 640, 480);
    assert!(screen.contains_rect(&Rect2I::new(620, 460, 20, 20)));
    assert!(screen.contains_rect(&Rect2I::new(0, 0, 640, 480)));
    assert!(!screen.contains_rect(&Rect2I::new(621, 0, 20, 20)));
    assert!(!screen.contains_rect(&Rect2I::new(-1, 0, 20, 20)));
    assert!(!screen.contains_rect(&Rect2I::new(0, 461, 20, 20)));
}
