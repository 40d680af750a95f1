use serde::{Deserialize, Serialize};

/// Axis-aligned box in normalized image coordinates (`[0,1]` on both axes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Region {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Region {
            x,
            y,
            width,
            height,
        }
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    /// Smallest region covering both `self` and `other`.
    pub fn union(&self, other: &Region) -> Region {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Region {
            x,
            y,
            width: self.max_x().max(other.max_x()) - x,
            height: self.max_y().max(other.max_y()) - y,
        }
    }

    pub fn union_all<'a, I>(regions: I) -> Option<Region>
    where
        I: IntoIterator<Item = &'a Region>,
    {
        regions
            .into_iter()
            .fold(None, |acc: Option<Region>, region| match acc {
                Some(current) => Some(current.union(region)),
                None => Some(*region),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_union_covers_both() {
        let top = Region::new(0.1, 0.70, 0.8, 0.05);
        let bottom = Region::new(0.05, 0.80, 0.85, 0.06);
        let u = top.union(&bottom);
        assert!(approx(u.x, 0.05));
        assert!(approx(u.y, 0.70));
        assert!(approx(u.max_x(), 0.9));
        assert!(approx(u.max_y(), 0.86));
    }

    #[test]
    fn test_union_all_empty() {
        assert_eq!(Region::union_all(std::iter::empty()), None);
    }

    #[test]
    fn test_union_all_single() {
        let only = Region::new(0.2, 0.3, 0.4, 0.1);
        assert_eq!(Region::union_all([only].iter()), Some(only));
    }
}
