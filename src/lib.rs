#![forbid(unsafe_code)]
#![doc(html_root_url = "https://docs.rs/ipv4-range-union/0.1.0")]

//! Maintains a dynamic set of IPv4 address ranges and answers membership
//! queries against the coalesced form of the set. Ranges are added as
//! dotted-quad start/end pairs or as CIDR blocks, and overlapping or
//! touching ranges are collapsed into the minimal sorted set of disjoint
//! intervals.
//!
//! Example usage:
//! ```
//! # use ipv4_range_union::*;
//! let mut blocklist = Ipv4RangeUnion::new();
//! blocklist.add_cidr("192.168.1.0/24")?;
//! blocklist.add_range("10.0.0.1", "10.0.0.9")?;
//! assert!(blocklist.contains_address("192.168.1.77"));
//! assert!(blocklist.contains_address("10.0.0.9"));
//! assert!(!blocklist.contains_address("10.0.0.10"));
//! # Ok::<(), ipv4_range_union::AddressError>(())
//! ```
//!
//! The core structure [`RangeUnion`] is generic over any primitive integer;
//! the IPv4 text entry points are provided on the `u32` instantiation,
//! aliased as [`Ipv4RangeUnion`]. The structure is built for single-threaded
//! build-then-query usage and provides no concurrency guarantees.

use std::iter::FromIterator;
use std::ops::{BitOr, BitOrAssign, RangeInclusive};

use num_traits::PrimInt;

use std::fmt;

pub mod addr;
pub use addr::AddressError;

/// A closed interval `[start, end]` over a primitive integer type.
///
/// `start <= end` is expected of well-formed intervals but is not enforced
/// here; callers constructing intervals directly are responsible for
/// ordering the bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval<T: PrimInt> {
    pub start: T,
    pub end: T,
}

impl<T: PrimInt> Interval<T> {
    /// Constructs an interval with the given inclusive bounds.
    pub fn new(start: T, end: T) -> Self {
        Interval { start, end }
    }
    /// Returns whether `value` lies inside the interval, ends included.
    #[inline]
    pub fn contains(&self, value: T) -> bool {
        value >= self.start && value <= self.end
    }
}

impl<T: PrimInt> From<(T, T)> for Interval<T> {
    fn from(pair: (T, T)) -> Self {
        Interval::new(pair.0, pair.1)
    }
}
impl<T: PrimInt> From<RangeInclusive<T>> for Interval<T> {
    fn from(range: RangeInclusive<T>) -> Self {
        let (start, end) = range.into_inner();
        Interval::new(start, end)
    }
}

#[derive(Default, Clone, PartialEq, Eq, Hash)]
/*
 * Keeps two orderings of the inserted intervals:
 * intervals        - append-only log in insertion order, never mutated
 * merged_intervals - sorted ascending by start, pairwise disjoint, and
 *                    minimal under the merge rule (intervals sharing a
 *                    value coalesce; a one-unit gap does not)
 * merged_intervals is rebuilt by every insert and by merge(). Interval is
 * a Copy value type, so the two orderings never share state.
 */
/// Struct representing a union of integer ranges built from an insertion
/// log and a maintained merged view.
pub struct RangeUnion<T>
where
    T: PrimInt
{
    intervals: Vec<Interval<T>>,
    merged_intervals: Vec<Interval<T>>,
}

impl<T> RangeUnion<T>
where
    T: PrimInt
{
    /// Constructs a new empty [`RangeUnion`] object.
    pub fn new() -> Self {
        RangeUnion {
            intervals: Vec::new(),
            merged_intervals: Vec::new(),
        }
    }

    /// Inserts the interval, incrementally re-merging the merged view.
    ///
    /// The interval is appended to the raw log unconditionally, then folded
    /// into the merged view in a single O(k) walk: intervals strictly left
    /// or right of it are copied through, and any overlapping or touching
    /// run widens its bounds before it is placed.
    ///
    /// # Example
    ///
    /// ```
    /// # use ipv4_range_union::*;
    /// let mut union_obj = RangeUnion::new();
    /// union_obj.insert(Interval::new(1u32, 10));
    /// union_obj.insert(Interval::new(10, 20));
    /// union_obj.insert(Interval::new(30, 40));
    /// assert_eq!(format!("{:?}", union_obj), "[1..=20, 30..=40]");
    /// ```
    pub fn insert(&mut self, new_interval: Interval<T>) {
        self.intervals.push(new_interval);
        let mut left = new_interval.start;
        let mut right = new_interval.end;
        let mut placed = false;
        let mut result = Vec::with_capacity(self.merged_intervals.len() + 1);
        for existing in &self.merged_intervals {
            if existing.start > right {
                if !placed {
                    result.push(Interval::new(left, right));
                    placed = true;
                }
                result.push(*existing);
            } else if existing.end < left {
                result.push(*existing);
            } else {
                // Overlapping run is contiguous in a sorted disjoint list
                left = left.min(existing.start);
                right = right.max(existing.end);
            }
        }
        if !placed {
            result.push(Interval::new(left, right));
        }
        self.merged_intervals = result;
    }

    /// Rebuilds the merged view from the raw log with a sort-and-sweep pass.
    ///
    /// Sorts a copy of the log by `(start, end)` and sweeps it once, opening
    /// a new output interval whenever the next start exceeds the current
    /// output end. O(n log n) over the log length; the log itself keeps its
    /// insertion order.
    ///
    /// The result is identical to what incremental insertion of the same
    /// intervals produces, in any insertion order.
    pub fn merge(&mut self) {
        let mut sorted = self.intervals.clone();
        sorted.sort_unstable_by_key(|iv| (iv.start, iv.end));
        let mut result: Vec<Interval<T>> = Vec::new();
        for interval in sorted {
            match result.last_mut() {
                Some(last) if last.end >= interval.start => {
                    last.end = last.end.max(interval.end);
                }
                _ => result.push(interval),
            }
        }
        self.merged_intervals = result;
    }

    /// Returns whether `value` is covered by one of the merged intervals.
    pub fn contains(&self, value: T) -> bool {
        self.merged_intervals.iter().any(|iv| iv.contains(value))
    }

    /// Returns the merged view: sorted ascending by start, pairwise
    /// disjoint, and minimal under the merge rule.
    pub fn merged_intervals(&self) -> &[Interval<T>] {
        &self.merged_intervals
    }

    /// Creates a collection of [`RangeInclusive`] from the merged view.
    pub fn to_collection<U>(&self) -> U
    where
        U: FromIterator<RangeInclusive<T>>
    {
        self.merged_intervals.iter()
            .map(|iv| iv.start..=iv.end)
            .collect()
    }
    /// Converts a [`RangeUnion`] object into a collection of
    /// [`RangeInclusive`].
    pub fn into_collection<U>(self) -> U
    where
        U: FromIterator<RangeInclusive<T>>
    {
        self.to_collection()
    }
}

/// Union of IPv4 address ranges, with textual entry points for dotted-quad
/// pairs and CIDR blocks.
pub type Ipv4RangeUnion = RangeUnion<u32>;

impl RangeUnion<u32> {
    /// Parses two dotted-quad addresses and inserts the inclusive range
    /// between them.
    ///
    /// # Example
    ///
    /// ```
    /// # use ipv4_range_union::*;
    /// let mut union_obj = Ipv4RangeUnion::new();
    /// union_obj.add_range("10.0.0.1", "10.0.0.9")?;
    /// assert!(union_obj.contains_address("10.0.0.5"));
    /// # Ok::<(), AddressError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`AddressError`] if either address fails to parse; the union
    /// is left unchanged in that case.
    pub fn add_range(&mut self, start: &str, end: &str) -> Result<(), AddressError> {
        let start = addr::parse_address(start)?;
        let end = addr::parse_address(end)?;
        self.insert(Interval::new(start, end));
        Ok(())
    }

    /// Parses a CIDR block and inserts its network range.
    ///
    /// The text must contain a `.` at a position after the first byte
    /// before CIDR parsing is attempted.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError`] on malformed input; the union is left
    /// unchanged in that case.
    pub fn add_cidr(&mut self, cidr: &str) -> Result<(), AddressError> {
        match cidr.find('.') {
            Some(pos) if pos > 0 => (),
            _ => return Err(AddressError::InvalidAddress),
        }
        let (start, end) = addr::parse_cidr(cidr)?;
        self.insert(Interval::new(start, end));
        Ok(())
    }

    /// Parses a dotted-quad address and looks it up in the merged view.
    /// A malformed address yields `false` rather than an error.
    pub fn contains_address(&self, text: &str) -> bool {
        match addr::parse_address(text) {
            Ok(value) => self.contains(value),
            Err(_) => false,
        }
    }
}

impl<T> fmt::Debug for RangeUnion<T>
where
    T: PrimInt + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        let pairs: Vec<String> = self.merged_intervals.iter()
            .map(|iv| format!("{:?}..={:?}", iv.start, iv.end))
            .collect();
        write!(f, "{}", pairs.join(", "))?;
        write!(f, "]")
    }
}

impl<T, U> Extend<U> for RangeUnion<T>
where
    T: PrimInt,
    U: Into<Interval<T>>
{
    /// Calls [`Self::insert`] for each interval in the iterator.
    fn extend<I: IntoIterator<Item=U>>(&mut self, iter: I) {
        for interval in iter {
            self.insert(interval.into());
        }
    }
}

impl<T, U> FromIterator<U> for RangeUnion<T>
where
    T: PrimInt,
    U: Into<Interval<T>>
{
    /// Calls [`Self::insert`] for each interval in the iterator.
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = U>
    {
        let mut new_union_obj = RangeUnion::new();
        new_union_obj.extend(iter);
        new_union_obj
    }
}

impl<T: PrimInt> BitOrAssign for RangeUnion<T> {
    /// Extends the [`RangeUnion`] object with the raw log of `rhs`.
    fn bitor_assign(&mut self, rhs: Self) {
        self.extend(rhs.intervals.into_iter().map(|iv| (iv.start, iv.end)));
    }
}

impl<T: PrimInt> BitOr for RangeUnion<T> {
    type Output = Self;
    /// Computes the union of the two [`RangeUnion`] objects.
    fn bitor(self, rhs: Self) -> Self::Output {
        let mut dup_obj = self;
        dup_obj |= rhs;
        dup_obj
    }
}
