//! Base implementation of records for logging.
use crate::error::CrError;
use std::collections::{hash_map::Iter, HashMap};

/// Represents possible types of values that can be stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single floating-point value, typically used for metrics like returns.
    Scalar(f32),

    /// A 1-dimensional array of floating-point values.
    Array1(Vec<f32>),

    /// A text value.
    String(String),

    /// An exact step count, like the global step of a record.
    Step(usize),
}

/// A container for storing key-value pairs of various data types.
#[derive(Debug, Default, Clone)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record containing a single step count.
    pub fn from_step(name: impl Into<String>, step: usize) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Step(step))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Gets a reference to the value associated with the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Gets a scalar value from the record.
    pub fn get_scalar(&self, k: &str) -> Result<f32, CrError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(CrError::RecordValueTypeError("Scalar".to_string())),
            None => Err(CrError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a 1-dimensional array from the record.
    pub fn get_array1(&self, k: &str) -> Result<Vec<f32>, CrError> {
        match self.0.get(k) {
            Some(RecordValue::Array1(v)) => Ok(v.clone()),
            Some(_) => Err(CrError::RecordValueTypeError("Array1".to_string())),
            None => Err(CrError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a string value from the record.
    pub fn get_string(&self, k: &str) -> Result<String, CrError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(CrError::RecordValueTypeError("String".to_string())),
            None => Err(CrError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a step count from the record.
    pub fn get_step(&self, k: &str) -> Result<usize, CrError> {
        match self.0.get(k) {
            Some(RecordValue::Step(v)) => Ok(*v),
            Some(_) => Err(CrError::RecordValueTypeError("Step".to_string())),
            None => Err(CrError::RecordKeyError(k.to_string())),
        }
    }

    /// Checks if the record is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_pairs_overwrite_earlier_ones() {
        let mut r = Record::from_slice(&[
            ("a", RecordValue::Scalar(1.0)),
            ("b", RecordValue::Scalar(2.0)),
            ("b", RecordValue::Scalar(3.0)),
        ]);
        assert_eq!(r.get_scalar("a"), Ok(1.0));
        assert_eq!(r.get_scalar("b"), Ok(3.0));

        r.insert("a", RecordValue::Scalar(4.0));
        assert_eq!(r.get_scalar("a"), Ok(4.0));
        assert_eq!(r.iter().count(), 2);
    }

    #[test]
    fn test_typed_getters() {
        let mut r = Record::empty();
        r.insert("name", RecordValue::String("pong".to_string()));
        r.insert("fov_loc", RecordValue::Array1(vec![10.0, 20.0]));

        assert_eq!(r.get_string("name"), Ok("pong".to_string()));
        assert_eq!(r.get_array1("fov_loc"), Ok(vec![10.0, 20.0]));
        assert_eq!(
            r.get_scalar("name"),
            Err(CrError::RecordValueTypeError("Scalar".to_string()))
        );
        assert_eq!(
            r.get_step("name"),
            Err(CrError::RecordValueTypeError("Step".to_string()))
        );
        assert_eq!(
            r.get_scalar("missing"),
            Err(CrError::RecordKeyError("missing".to_string()))
        );
    }

    #[test]
    fn test_step_is_exact_beyond_f32_precision() {
        let step = 20_000_001;
        assert_ne!(step as f32 as usize, step);
        let r = Record::from_step("global_step", step);
        assert_eq!(r.get_step("global_step"), Ok(step));
    }
}
