use alloc::format;
use core::cmp::Ordering;
use core::fmt;
use core::ops::Bound;
use core::str::FromStr;

use crate::error::CollectError;

// -----------------------------------------------------------------------------
// BoundType

/// Whether an endpoint belongs to its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BoundType {
    /// The endpoint is excluded.
    Open,
    /// The endpoint is included.
    Closed,
}

impl BoundType {
    /// The wire name, `"OPEN"` or `"CLOSED"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            BoundType::Open => "OPEN",
            BoundType::Closed => "CLOSED",
        }
    }
}

impl FromStr for BoundType {
    type Err = CollectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(BoundType::Open),
            "CLOSED" => Ok(BoundType::Closed),
            _ => Err(CollectError::InvalidRange(format!(
                "unknown bound type `{s}`, expected `OPEN` or `CLOSED`"
            ))),
        }
    }
}

// -----------------------------------------------------------------------------
// Range

/// A contiguous interval over an ordered type.
///
/// Each side is either unbounded or an endpoint with a [`BoundType`].
///
/// # Examples
///
/// ```
/// use vc_collections::{BoundType, Range};
///
/// let range = Range::closed_open(1, 5).unwrap();
/// assert!(range.contains(&1));
/// assert!(!range.contains(&5));
/// assert_eq!(range.to_string(), "[1..5)");
///
/// assert!(Range::closed(5, 1).is_err());
/// assert_eq!(Range::at_least(3).upper_bound_type(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Range<T> {
    lower: Option<(T, BoundType)>,
    upper: Option<(T, BoundType)>,
}

impl<T> Range<T> {
    /// The range containing every value.
    #[inline]
    pub const fn all() -> Self {
        Self {
            lower: None,
            upper: None,
        }
    }

    #[inline]
    pub fn has_lower_bound(&self) -> bool {
        self.lower.is_some()
    }

    #[inline]
    pub fn has_upper_bound(&self) -> bool {
        self.upper.is_some()
    }

    #[inline]
    pub fn lower_endpoint(&self) -> Option<&T> {
        self.lower.as_ref().map(|(v, _)| v)
    }

    #[inline]
    pub fn upper_endpoint(&self) -> Option<&T> {
        self.upper.as_ref().map(|(v, _)| v)
    }

    #[inline]
    pub fn lower_bound_type(&self) -> Option<BoundType> {
        self.lower.as_ref().map(|(_, b)| *b)
    }

    #[inline]
    pub fn upper_bound_type(&self) -> Option<BoundType> {
        self.upper.as_ref().map(|(_, b)| *b)
    }

    /// The lower side as a [`Bound`].
    pub fn lower_bound(&self) -> Bound<&T> {
        as_bound(self.lower.as_ref())
    }

    /// The upper side as a [`Bound`].
    pub fn upper_bound(&self) -> Bound<&T> {
        as_bound(self.upper.as_ref())
    }
}

fn as_bound<T>(side: Option<&(T, BoundType)>) -> Bound<&T> {
    match side {
        None => Bound::Unbounded,
        Some((v, BoundType::Closed)) => Bound::Included(v),
        Some((v, BoundType::Open)) => Bound::Excluded(v),
    }
}

impl<T: Ord + fmt::Debug> Range<T> {
    /// Builds a range from optional endpoints.
    ///
    /// Fails if the lower endpoint is above the upper one, or if both sides
    /// are open on the same endpoint.
    pub fn new(
        lower: Option<(T, BoundType)>,
        upper: Option<(T, BoundType)>,
    ) -> Result<Self, CollectError> {
        if let (Some((lo, lo_type)), Some((hi, hi_type))) = (&lower, &upper) {
            match lo.cmp(hi) {
                Ordering::Greater => {
                    return Err(CollectError::InvalidRange(format!(
                        "lower endpoint {lo:?} is above upper endpoint {hi:?}"
                    )));
                }
                Ordering::Equal if *lo_type == BoundType::Open && *hi_type == BoundType::Open => {
                    return Err(CollectError::InvalidRange(format!(
                        "open range on a single endpoint {lo:?}"
                    )));
                }
                _ => {}
            }
        }
        Ok(Self { lower, upper })
    }

    pub fn closed(lower: T, upper: T) -> Result<Self, CollectError> {
        Self::new(
            Some((lower, BoundType::Closed)),
            Some((upper, BoundType::Closed)),
        )
    }

    pub fn open(lower: T, upper: T) -> Result<Self, CollectError> {
        Self::new(
            Some((lower, BoundType::Open)),
            Some((upper, BoundType::Open)),
        )
    }

    pub fn closed_open(lower: T, upper: T) -> Result<Self, CollectError> {
        Self::new(
            Some((lower, BoundType::Closed)),
            Some((upper, BoundType::Open)),
        )
    }

    pub fn at_least(lower: T) -> Self {
        Self {
            lower: Some((lower, BoundType::Closed)),
            upper: None,
        }
    }

    pub fn at_most(upper: T) -> Self {
        Self {
            lower: None,
            upper: Some((upper, BoundType::Closed)),
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        let above_lower = match &self.lower {
            None => true,
            Some((lo, BoundType::Closed)) => lo <= value,
            Some((lo, BoundType::Open)) => lo < value,
        };
        let below_upper = match &self.upper {
            None => true,
            Some((hi, BoundType::Closed)) => value <= hi,
            Some((hi, BoundType::Open)) => value < hi,
        };
        above_lower && below_upper
    }

    /// `true` for ranges like `[a..a)` that contain nothing.
    pub fn is_empty(&self) -> bool {
        match (&self.lower, &self.upper) {
            (Some((lo, lo_type)), Some((hi, hi_type))) => lo == hi && lo_type != hi_type,
            _ => false,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Range<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.lower {
            None => f.write_str("(-\u{221e}")?,
            Some((v, BoundType::Closed)) => write!(f, "[{v}")?,
            Some((v, BoundType::Open)) => write!(f, "({v}")?,
        }
        f.write_str("..")?;
        match &self.upper {
            None => f.write_str("+\u{221e})"),
            Some((v, BoundType::Closed)) => write!(f, "{v}]"),
            Some((v, BoundType::Open)) => write!(f, "{v})"),
        }
    }
}
