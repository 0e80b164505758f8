//! Data-to-pixel mappings

/// Continuous mapping from a data extent onto a pixel range
///
/// The range may be inverted (`(height, 0.0)`) so larger values sit higher
/// on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f32,
    range_max: f32,
}

impl LinearScale {
    /// Create a scale; a zero-width domain is widened by half a unit each side
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        let (mut lo, mut hi) = domain;
        if (hi - lo).abs() < f64::EPSILON {
            lo -= 0.5;
            hi += 0.5;
        }
        Self {
            domain_min: lo,
            domain_max: hi,
            range_min: range.0,
            range_max: range.1,
        }
    }

    /// Scale over the finite extent of `values`, `None` when there is none
    pub fn from_values(values: impl IntoIterator<Item = f64>, range: (f32, f32)) -> Option<Self> {
        extent(values).map(|domain| Self::new(domain, range))
    }

    pub fn scale(&self, value: f64) -> f32 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t as f32 * (self.range_max - self.range_min)
    }

    /// Range to domain
    pub fn invert(&self, pixel: f32) -> f64 {
        let t = (pixel - self.range_min) / (self.range_max - self.range_min);
        self.domain_min + t as f64 * (self.domain_max - self.domain_min)
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    pub fn range(&self) -> (f32, f32) {
        (self.range_min, self.range_max)
    }

    /// `count` evenly spaced domain values, ends included
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        match count {
            0 => Vec::new(),
            1 => vec![self.domain_min],
            _ => {
                let step = (self.domain_max - self.domain_min) / (count - 1) as f64;
                (0..count).map(|i| self.domain_min + step * i as f64).collect()
            }
        }
    }
}

/// Discrete bands over an ordered domain
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale<K> {
    domain: Vec<K>,
    start: f32,
    step: f32,
    bandwidth: f32,
}

impl<K: PartialEq> BandScale<K> {
    /// `padding` is the fraction of each step left empty
    pub fn new(domain: Vec<K>, range: (f32, f32), padding: f32) -> Self {
        let padding = padding.clamp(0.0, 0.99);
        let n = domain.len() as f32;
        let length = range.1 - range.0;
        let step = if domain.is_empty() { 0.0 } else { length / (n + padding) };
        Self {
            domain,
            start: range.0 + step * padding,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    /// Leading edge of a band
    pub fn position(&self, key: &K) -> Option<f32> {
        let idx = self.domain.iter().position(|k| k == key)?;
        Some(self.start + self.step * idx as f32)
    }

    pub fn center(&self, key: &K) -> Option<f32> {
        self.position(key).map(|p| p + self.bandwidth / 2.0)
    }

    pub fn bandwidth(&self) -> f32 {
        self.bandwidth
    }

    pub fn domain(&self) -> &[K] {
        &self.domain
    }
}

/// Evenly spaced points with one step of padding at each end
pub fn point_positions(count: usize, range: (f32, f32)) -> Vec<f32> {
    let step = (range.1 - range.0) / (count as f32 + 1.0);
    (0..count).map(|i| range.0 + step * (i as f32 + 1.0)).collect()
}

/// Min and max of the finite values
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_scale_inverted_range() {
        let scale = LinearScale::new((90.0, 100.0), (330.0, 0.0));
        assert_eq!(scale.scale(90.0), 330.0);
        assert_eq!(scale.scale(100.0), 0.0);
        assert!((scale.invert(165.0) - 95.0).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_domain_is_widened() {
        let scale = LinearScale::from_values([3.0, 3.0, f64::NAN], (0.0, 100.0)).unwrap();
        assert_eq!(scale.domain(), (2.5, 3.5));
        assert_eq!(scale.scale(3.0), 50.0);
        assert!(LinearScale::from_values([f64::NAN], (0.0, 1.0)).is_none());
    }

    #[test]
    fn test_band_scale() {
        let bands = BandScale::new(vec![1, 2, 3, 4], (0.0, 100.0), 0.0);
        assert_eq!(bands.bandwidth(), 25.0);
        assert_eq!(bands.position(&3), Some(50.0));
        assert_eq!(bands.center(&1), Some(12.5));
        assert_eq!(bands.position(&9), None);

        let padded = BandScale::new(vec!["A", "B"], (0.0, 21.0), 0.1);
        assert!((padded.bandwidth() - 9.0).abs() < 1e-4);
        assert!((padded.position(&"A").unwrap() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_point_positions_and_ticks() {
        assert_eq!(point_positions(4, (0.0, 500.0)), vec![100.0, 200.0, 300.0, 400.0]);
        let scale = LinearScale::new((0.0, 10.0), (0.0, 1.0));
        assert_eq!(scale.ticks(3), vec![0.0, 5.0, 10.0]);
    }
}
