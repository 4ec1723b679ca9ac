use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BAND_PADDING: f64 = 0.3;

/// Categorical scale that splits a pixel range into equal slots.
///
/// Slot `i` spans `[start + i * step, start + (i + 1) * step)`. The drawn band
/// occupies the leading `bandwidth()` pixels of its slot; the remaining
/// `padding * step` pixels separate it from the next slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandScale {
    categories: IndexSet<String>,
    range_start: f64,
    range_end: f64,
    padding: f64,
}

impl BandScale {
    /// Builds a band scale; duplicate categories keep their first position.
    ///
    /// `padding` is clamped into `[0, 1)`; a reversed range is reordered.
    #[must_use]
    pub fn new<I, S>(categories: I, range: (f64, f64), padding: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let padding = if padding.is_finite() {
            padding.clamp(0.0, 0.999)
        } else {
            DEFAULT_BAND_PADDING
        };
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            range_start: range.0.min(range.1),
            range_end: range.0.max(range.1),
            padding,
        }
    }

    #[must_use]
    pub fn with_range(mut self, range: (f64, f64)) -> Self {
        self.range_start = range.0.min(range.1);
        self.range_end = range.0.max(range.1);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// Slot width including padding. Zero when there are no categories.
    #[must_use]
    pub fn step(&self) -> f64 {
        if self.categories.is_empty() {
            return 0.0;
        }
        (self.range_end - self.range_start) / self.categories.len() as f64
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    /// Start pixel of the slot for `category`.
    #[must_use]
    pub fn project(&self, category: &str) -> Option<f64> {
        self.categories
            .get_index_of(category)
            .and_then(|index| self.project_index(index))
    }

    #[must_use]
    pub fn project_index(&self, index: usize) -> Option<f64> {
        (index < self.categories.len()).then(|| self.range_start + self.step() * index as f64)
    }

    #[must_use]
    pub fn category(&self, index: usize) -> Option<&str> {
        self.categories.get_index(index).map(String::as_str)
    }

    #[must_use]
    pub fn index_of(&self, category: &str) -> Option<usize> {
        self.categories.get_index_of(category)
    }

    /// Slot index under `pixel`, padding included.
    #[must_use]
    pub fn slot_at(&self, pixel: f64) -> Option<usize> {
        let step = self.step();
        if step <= 0.0 || !pixel.is_finite() || pixel < self.range_start || pixel > self.range_end
        {
            return None;
        }
        let index = ((pixel - self.range_start) / step).floor() as usize;
        Some(index.min(self.categories.len() - 1))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::BandScale;

    #[test]
    fn slots_partition_the_range() {
        let scale = BandScale::new(["Docker", "AWS", "GraphQL"], (0.0, 300.0), 0.3);
        assert_eq!(scale.step(), 100.0);
        assert!((scale.bandwidth() - 70.0).abs() <= 1e-9);
        assert_eq!(scale.project("Docker"), Some(0.0));
        assert_eq!(scale.project("AWS"), Some(100.0));
        assert_eq!(scale.project("GraphQL"), Some(200.0));
        assert_eq!(scale.project("Rust"), None);
    }

    #[test]
    fn empty_scale_has_no_slots() {
        let scale = BandScale::new(Vec::<String>::new(), (0.0, 300.0), 0.3);
        assert_eq!(scale.step(), 0.0);
        assert_eq!(scale.bandwidth(), 0.0);
        assert_eq!(scale.slot_at(10.0), None);
    }

    #[test]
    fn slot_lookup_includes_padding_and_last_edge() {
        let scale = BandScale::new(["a", "b"], (0.0, 100.0), 0.5);
        assert_eq!(scale.slot_at(40.0), Some(0));
        assert_eq!(scale.slot_at(50.0), Some(1));
        assert_eq!(scale.slot_at(100.0), Some(1));
        assert_eq!(scale.slot_at(-1.0), None);
    }
}
