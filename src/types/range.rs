//! Integer ranges written as `START:STOP:STEP`.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// A half-open integer range with a step, e.g. `0:100:10`.
///
/// `STOP` alone means `0:STOP:1`; `START:STOP` means a step of 1. The step
/// may be negative but never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArgRange {
    /// First value.
    pub start: i64,
    /// Exclusive bound.
    pub stop: i64,
    /// Increment between values.
    pub step: i64,
}

impl ArgRange {
    /// Build a range.
    ///
    /// # Errors
    ///
    /// Fails when `step` is zero.
    pub fn new(start: i64, stop: i64, step: i64) -> Result<Self, ValueError> {
        if step == 0 {
            return Err(ValueError::new("range step must not be zero"));
        }
        Ok(Self { start, stop, step })
    }

    /// Number of values in the range.
    pub fn len(&self) -> usize {
        let (start, stop, step) = (
            i128::from(self.start),
            i128::from(self.stop),
            i128::from(self.step),
        );
        let count = if step > 0 && start < stop {
            (stop - start + step - 1) / step
        } else if step < 0 && start > stop {
            (start - stop - step - 1) / -step
        } else {
            0
        };
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    /// Whether the range yields no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `value` is one of the range's values.
    pub fn contains(&self, value: i64) -> bool {
        let in_bounds = if self.step > 0 {
            self.start <= value && value < self.stop
        } else {
            self.stop < value && value <= self.start
        };
        in_bounds && (i128::from(value) - i128::from(self.start)) % i128::from(self.step) == 0
    }

    /// Iterate the values.
    pub fn iter(&self) -> RangeIter {
        RangeIter {
            next: self.start,
            step: self.step,
            remaining: self.len(),
        }
    }
}

impl FromStr for ArgRange {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() > 3 {
            return Err(ValueError::new(format!(
                "invalid range '{s}': expected at most 3 parts (START:STOP:STEP)"
            )));
        }
        let numbers = parts
            .iter()
            .map(|part| {
                part.trim().parse::<i64>().map_err(|_| {
                    ValueError::new(format!("invalid range '{s}': '{part}' is not an integer"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        match numbers[..] {
            [stop] => ArgRange::new(0, stop, 1),
            [start, stop] => ArgRange::new(start, stop, 1),
            [start, stop, step] => ArgRange::new(start, stop, step),
            _ => Err(ValueError::new(format!("invalid range '{s}'"))),
        }
    }
}

impl fmt::Display for ArgRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.start, self.stop, self.step)
    }
}

/// Iterator over the values of an [`ArgRange`].
#[derive(Debug, Clone)]
pub struct RangeIter {
    next: i64,
    step: i64,
    remaining: usize,
}

impl Iterator for RangeIter {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.remaining == 0 {
            return None;
        }
        let value = self.next;
        self.remaining -= 1;
        // the last value may sit within one step of i64 bounds
        self.next = self.next.wrapping_add(self.step);
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for RangeIter {}

impl IntoIterator for ArgRange {
    type Item = i64;
    type IntoIter = RangeIter;

    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

impl IntoIterator for &ArgRange {
    type Item = i64;
    type IntoIter = RangeIter;

    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_parts() {
        let r: ArgRange = "0:100:10".parse().unwrap();
        assert_eq!(r, ArgRange { start: 0, stop: 100, step: 10 });
        assert_eq!(r.len(), 10);
        assert_eq!(r.iter().last(), Some(90));
    }

    #[test]
    fn test_short_forms() {
        assert_eq!("5".parse::<ArgRange>().unwrap().iter().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        assert_eq!("2:4".parse::<ArgRange>().unwrap().iter().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_negative_step() {
        let r: ArgRange = "10:0:-3".parse().unwrap();
        assert_eq!(r.iter().collect::<Vec<_>>(), vec![10, 7, 4, 1]);
        assert!(r.contains(4));
        assert!(!r.contains(0));
        assert!(!r.contains(5));
    }

    #[test]
    fn test_empty_when_direction_disagrees() {
        let r: ArgRange = "5:0".parse().unwrap();
        assert!(r.is_empty());
        assert_eq!(r.iter().count(), 0);
    }

    #[test]
    fn test_rejects_malformed() {
        assert!("1:2:3:4".parse::<ArgRange>().is_err());
        assert!("a:2".parse::<ArgRange>().is_err());
        assert!("".parse::<ArgRange>().is_err());
        assert!("1:2:0".parse::<ArgRange>().is_err());
    }
}
