use std::fmt::Debug;

use crate::error::{Error, Result};
use crate::na::NA;

/// One-dimensional named array of values that may be missing
#[derive(Debug, Clone, PartialEq)]
pub struct Series<T>
where
    T: Debug + Clone,
{
    /// Values wrapped in NA
    values: Vec<NA<T>>,

    /// Column name
    name: String,
}

impl<T> Series<T>
where
    T: Debug + Clone,
{
    /// Create a Series from NA-wrapped values
    pub fn new(values: Vec<NA<T>>, name: impl Into<String>) -> Self {
        Series {
            values,
            name: name.into(),
        }
    }

    /// Create a Series without missing values
    pub fn from_vec(values: Vec<T>, name: impl Into<String>) -> Self {
        Self::new(values.into_iter().map(NA::Value).collect(), name)
    }

    /// Create a Series where `None` marks a missing value
    pub fn from_options(values: Vec<Option<T>>, name: impl Into<String>) -> Self {
        Self::new(values.into_iter().map(NA::from).collect(), name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[NA<T>] {
        &self.values
    }

    /// Value at a position, `None` when out of bounds
    pub fn get(&self, pos: usize) -> Option<&NA<T>> {
        self.values.get(pos)
    }

    /// Number of missing values
    pub fn na_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_na()).count()
    }

    /// Element-wise transformation over present values; NA stays NA
    pub fn map<U, F>(&self, f: F) -> Series<U>
    where
        U: Debug + Clone,
        F: Fn(&T) -> U,
    {
        Series::new(self.values.iter().map(|v| v.map(&f)).collect(), self.name.clone())
    }

    /// Combine two Series of equal length element by element
    pub fn zip_with<U, R, F>(&self, other: &Series<U>, f: F) -> Result<Series<R>>
    where
        U: Debug + Clone,
        R: Debug + Clone,
        F: Fn(&NA<T>, &NA<U>) -> NA<R>,
    {
        if self.len() != other.len() {
            return Err(Error::InconsistentRowCount {
                expected: self.len(),
                found: other.len(),
            });
        }
        let values = self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| f(a, b))
            .collect();
        Ok(Series::new(values, self.name.clone()))
    }

    /// Boolean mask from a predicate over present values; NA never matches
    pub fn mask<F>(&self, predicate: F) -> Vec<bool>
    where
        F: Fn(&T) -> bool,
    {
        self.values
            .iter()
            .map(|v| v.value().map_or(false, &predicate))
            .collect()
    }

    /// Gather the values at the given positions
    pub(crate) fn take(&self, positions: &[usize]) -> Series<T> {
        let values = positions.iter().map(|&i| self.values[i].clone()).collect();
        Series::new(values, self.name.clone())
    }
}

impl Series<f64> {
    /// Create a float Series where `NaN` marks a missing value
    pub fn from_floats(values: Vec<f64>, name: impl Into<String>) -> Self {
        Self::new(values.into_iter().map(NA::from_float).collect(), name)
    }

    /// Values with NA rendered as `NaN`
    pub fn to_vec_f64(&self) -> Vec<f64> {
        self.values.iter().map(|v| v.to_float()).collect()
    }

    /// A Series of the same length holding a single constant
    pub fn constant(value: f64, len: usize, name: impl Into<String>) -> Self {
        Self::new(vec![NA::Value(value); len], name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_skips_missing() {
        let s = Series::from_options(vec![Some(1.0), None, Some(-1.0)], "x");
        assert_eq!(s.mask(|v| *v >= 0.0), vec![true, false, false]);
        assert_eq!(s.na_count(), 1);
    }

    #[test]
    fn test_zip_with_length_mismatch() {
        let a = Series::from_vec(vec![1.0, 2.0], "a");
        let b = Series::from_vec(vec![1.0], "b");
        let result = a.zip_with(&b, |x, y| *x + *y);
        assert!(matches!(
            result,
            Err(Error::InconsistentRowCount { expected: 2, found: 1 })
        ));
    }

    #[test]
    fn test_take_keeps_name() {
        let s = Series::from_vec(vec![10.0, 20.0, 30.0], "v").take(&[2, 0]);
        assert_eq!(s.name(), "v");
        assert_eq!(s.values(), &[NA::Value(30.0), NA::Value(10.0)]);
    }
}
