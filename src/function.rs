//! Composition helpers for predicates, functions and consumers.
//!
//! Predicates are plain `Fn(&T) -> bool` closures, functions are
//! `Fn(T) -> R`, consumers are `Fn(&T)`. Everything here takes closures by
//! value and hands back a new closure, so the helpers nest freely:
//!
//! ```rust
//! use almost_functional::function::{and, is_equal, negate, PredicateExt};
//!
//! let small = |v: &i32| *v < 10;
//! let not_three = negate(is_equal(3));
//! let p = and(small, not_three);
//! assert!(p(&4));
//! assert!(!p(&3));
//!
//! let q = (|v: &i32| *v > 0).and(|v: &i32| v % 2 == 0).negate();
//! assert!(q(&3));
//! ```

use crate::iter;

// ============================================================================
// Predicates
// ============================================================================

/// Matches values equal to `target`.
pub fn is_equal<T: PartialEq>(target: T) -> impl Fn(&T) -> bool {
  move |value: &T| *value == target
}

/// Matches values contained in `collection`. The collection is drained once,
/// up front.
pub fn contains<T: PartialEq>(collection: impl IntoIterator<Item = T>) -> impl Fn(&T) -> bool {
  let members: Vec<T> = collection.into_iter().collect();
  move |value: &T| iter::contains(&members, value)
}

/// Whether `one` and `two` agree on `key`. Two absent values are equal, an
/// absent and a present one never are. Several fields compare as a tuple:
///
/// ```rust
/// use almost_functional::function::equal_by;
///
/// struct Bean { a: i32, b: i32, c: &'static str }
/// let one = Bean { a: 4, b: 2, c: "one" };
/// let two = Bean { a: 4, b: 2, c: "two" };
///
/// assert!(equal_by(Some(&one), Some(&two), |v| (v.a, v.b)));
/// assert!(!equal_by(Some(&one), Some(&two), |v| (v.a, v.b, v.c)));
/// assert!(!equal_by(Some(&one), None, |v| v.a));
/// ```
pub fn equal_by<T: ?Sized, K: PartialEq>(
  one: Option<&T>,
  two: Option<&T>,
  key: impl Fn(&T) -> K,
) -> bool {
  match (one, two) {
    (None, None) => true,
    (Some(one), Some(two)) => std::ptr::eq(one, two) || key(one) == key(two),
    _ => false,
  }
}

/// Matches strings holding at least one non-whitespace character.
pub fn not_empty_string() -> impl Fn(&str) -> bool {
  |value: &str| value.chars().any(|c| !c.is_whitespace())
}

pub fn negate<T: ?Sized>(predicate: impl Fn(&T) -> bool) -> impl Fn(&T) -> bool {
  move |value: &T| !predicate(value)
}

/// Short-circuiting conjunction: `second` is not evaluated when `first`
/// fails.
pub fn and<T: ?Sized>(
  first: impl Fn(&T) -> bool,
  second: impl Fn(&T) -> bool,
) -> impl Fn(&T) -> bool {
  move |value: &T| first(value) && second(value)
}

/// Short-circuiting disjunction: `second` is not evaluated when `first`
/// holds.
pub fn or<T: ?Sized>(
  first: impl Fn(&T) -> bool,
  second: impl Fn(&T) -> bool,
) -> impl Fn(&T) -> bool {
  move |value: &T| first(value) || second(value)
}

/// Method syntax for [`and`], [`or`] and [`negate`].
pub trait PredicateExt<T: ?Sized>: Fn(&T) -> bool + Sized {
  fn and<P>(self, other: P) -> impl Fn(&T) -> bool
  where
    P: Fn(&T) -> bool,
  {
    and(self, other)
  }

  fn or<P>(self, other: P) -> impl Fn(&T) -> bool
  where
    P: Fn(&T) -> bool,
  {
    or(self, other)
  }

  fn negate(self) -> impl Fn(&T) -> bool { negate(self) }
}

impl<T: ?Sized, F> PredicateExt<T> for F where F: Fn(&T) -> bool {}

// ============================================================================
// Functions and consumers
// ============================================================================

/// `second(first(x))`.
pub fn compose<T, R, V>(first: impl Fn(T) -> R, second: impl Fn(R) -> V) -> impl Fn(T) -> V {
  move |argument: T| second(first(argument))
}

/// `second(first(a, b))`.
pub fn and_then_bi<A, B, R, V>(
  first: impl Fn(A, B) -> R,
  second: impl Fn(R) -> V,
) -> impl Fn(A, B) -> V {
  move |a: A, b: B| second(first(a, b))
}

/// A consumer invoking `first` then `second` with the same value.
pub fn and_then<T: ?Sized>(first: impl Fn(&T), second: impl Fn(&T)) -> impl Fn(&T) {
  move |value: &T| {
    first(value);
    second(value);
  }
}
