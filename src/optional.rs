//! A container which may or may not hold a value.
//!
//! [`Optional`] is a thin wrapper over [`Option`] that adds the fallible
//! accessors used across the crate ([`Optional::get`],
//! [`Optional::or_else_fail`]) and converts freely in both directions.
//!
//! ```rust
//! use almost_functional::optional::Optional;
//!
//! let name = Optional::of("feature.toml").filter(|n| n.ends_with(".toml"));
//! assert_eq!(name.get().ok(), Some(&"feature.toml"));
//! assert!(Optional::<i32>::empty().get().is_err());
//! ```

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Optional<T>(Option<T>);

impl<T> Optional<T> {
  /// An absent value.
  #[inline]
  pub const fn empty() -> Self { Optional(None) }

  /// A present value.
  #[inline]
  pub const fn of(value: T) -> Self { Optional(Some(value)) }

  /// Present if `value` is `Some`, absent otherwise.
  #[inline]
  pub fn of_nullable(value: Option<T>) -> Self { Optional(value) }

  #[inline]
  pub fn is_present(&self) -> bool { self.0.is_some() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.0.is_none() }

  /// Borrow the value, failing with [`Error::NotFound`] when absent.
  pub fn get(&self) -> Result<&T> {
    self.0.as_ref().ok_or_else(|| Error::not_found("attempting to get an empty Optional"))
  }

  /// Take the value, failing with [`Error::NotFound`] when absent.
  pub fn into_value(self) -> Result<T> {
    self.0.ok_or_else(|| Error::not_found("attempting to get an empty Optional"))
  }

  /// Invoke `consumer` with the value if one is present.
  pub fn if_present(&self, consumer: impl FnOnce(&T)) {
    if let Some(value) = &self.0 {
      consumer(value);
    }
  }

  /// Keep the value only if it satisfies `predicate`.
  pub fn filter(self, predicate: impl FnOnce(&T) -> bool) -> Self {
    match self.0 {
      Some(value) if predicate(&value) => Optional(Some(value)),
      _ => Optional(None),
    }
  }

  /// Transform the value, if present.
  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Optional<U> { Optional(self.0.map(f)) }

  /// Transform the value with a function that may itself produce nothing.
  /// A `None` result yields an empty Optional.
  pub fn map_nullable<U>(self, f: impl FnOnce(T) -> Option<U>) -> Optional<U> {
    Optional(self.0.and_then(f))
  }

  /// The value, or `other` when absent.
  #[inline]
  pub fn or_else(self, other: T) -> T { self.0.unwrap_or(other) }

  /// The value, or the result of `supplier` when absent. The supplier is
  /// only called when needed.
  #[inline]
  pub fn or_else_compute(self, supplier: impl FnOnce() -> T) -> T {
    self.0.unwrap_or_else(supplier)
  }

  /// The value, or [`Error::NotFound`] carrying `msg` when absent.
  ///
  /// A blank message is rejected with [`Error::InvalidArgument`] whether or
  /// not a value is present.
  pub fn or_else_fail(self, msg: &str) -> Result<T> {
    if msg.trim().is_empty() {
      return Err(Error::invalid_argument("a non-blank message is required"));
    }
    self.0.ok_or_else(|| Error::not_found(msg))
  }

  #[inline]
  pub fn as_ref(&self) -> Optional<&T> { Optional(self.0.as_ref()) }

  #[inline]
  pub fn into_option(self) -> Option<T> { self.0 }
}

impl<T> Default for Optional<T> {
  #[inline]
  fn default() -> Self { Self::empty() }
}

impl<T> From<Option<T>> for Optional<T> {
  #[inline]
  fn from(value: Option<T>) -> Self { Optional(value) }
}

impl<T> From<Optional<T>> for Option<T> {
  #[inline]
  fn from(value: Optional<T>) -> Self { value.0 }
}

impl<T> IntoIterator for Optional<T> {
  type Item = T;
  type IntoIter = std::option::IntoIter<T>;

  fn into_iter(self) -> Self::IntoIter { self.0.into_iter() }
}

impl<'a, T> IntoIterator for &'a Optional<T> {
  type Item = &'a T;
  type IntoIter = std::option::Iter<'a, T>;

  fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}
