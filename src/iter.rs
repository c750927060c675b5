//! Lazy combinators over iterables.
//!
//! The wrappers ([`Map`], [`Filter`], [`SupplierIterable`]) hold a source and
//! a transformation, never the transformed elements. Borrowing a wrapper
//! (`&wrapper`) starts a fresh traversal of its source each time, which is
//! what lets the same pipeline be walked more than once:
//!
//! ```rust
//! use almost_functional::iter;
//!
//! let words = vec!["alpha", "", "beta", "gamma"];
//! let lengths = iter::map(iter::filter(words, |w: &&&str| !w.is_empty()), |w: &&str| w.len());
//!
//! assert_eq!(iter::reduce(&lengths, 0, |sum, len| sum + len), 14);
//! assert_eq!(iter::find(&lengths, |len| *len == 4).into_option(), Some(4));
//! ```
//!
//! The free functions accept anything implementing [`IntoIterator`], so they
//! work the same on wrappers, std collections and plain iterators.

use std::borrow::Borrow;

use crate::{error::Result, optional::Optional};

mod batch;
mod concat;
mod filter;
mod map;
#[cfg(feature = "parallel")]
mod parallel;
mod supplier;

pub use batch::{next, Next};
pub use concat::{concat, Concat};
pub use filter::{filter, Filter, FilterIter};
pub use map::{map, Map, MapIter};
#[cfg(feature = "parallel")]
pub use parallel::{parallel_batch, parallel_batch_on, Chunk, WorkerPool, WorkerPoolBuilder};
pub use supplier::{SupplierIter, SupplierIterable};

/// An iterator that can be asked whether another element exists without
/// handing it out.
///
/// Implementors buffer at most one element to answer [`has_next`]; the
/// buffered element is what the following [`Iterator::next`] returns.
///
/// [`has_next`]: Cursor::has_next
pub trait Cursor: Iterator {
  fn has_next(&mut self) -> bool;

  /// Like [`Iterator::next`], but running past the end is an error.
  fn try_next(&mut self) -> Result<Self::Item>;
}

/// The first element satisfying `predicate`.
pub fn find<I, P>(iterable: I, mut predicate: P) -> Optional<I::Item>
where
  I: IntoIterator,
  P: FnMut(&I::Item) -> bool,
{
  Optional::of_nullable(iterable.into_iter().find(|v| predicate(v)))
}

/// The first element satisfying `predicate`, or `default`.
pub fn find_or<I, P>(iterable: I, predicate: P, default: I::Item) -> I::Item
where
  I: IntoIterator,
  P: FnMut(&I::Item) -> bool,
{
  find(iterable, predicate).or_else(default)
}

/// Whether any element satisfies `predicate`. Stops at the first match.
pub fn any<I, P>(iterable: I, predicate: P) -> bool
where
  I: IntoIterator,
  P: FnMut(&I::Item) -> bool,
{
  find(iterable, predicate).is_present()
}

/// Whether some element equals `value`.
pub fn contains<I, T>(iterable: I, value: &T) -> bool
where
  I: IntoIterator,
  I::Item: Borrow<T>,
  T: PartialEq + ?Sized,
{
  any(iterable, |v| <I::Item as Borrow<T>>::borrow(v) == value)
}

/// Strict left fold. Returns `initial` for an empty iterable.
pub fn reduce<I, R, F>(iterable: I, initial: R, accumulator: F) -> R
where
  I: IntoIterator,
  F: FnMut(R, I::Item) -> R,
{
  iterable.into_iter().fold(initial, accumulator)
}

pub fn for_each<I, F>(iterable: I, consumer: F)
where
  I: IntoIterator,
  F: FnMut(I::Item),
{
  iterable.into_iter().for_each(consumer)
}

/// Apply `func` to every element in order and keep the last result. Empty
/// for an empty iterable.
pub fn apply_last<I, R, F>(iterable: I, mut func: F) -> Optional<R>
where
  I: IntoIterator,
  F: FnMut(I::Item) -> R,
{
  Optional::of_nullable(iterable.into_iter().fold(None, |_, v| Some(func(v))))
}

/// The element at `index`, counting from zero.
pub fn get<I: IntoIterator>(iterable: I, index: usize) -> Optional<I::Item> {
  Optional::of_nullable(iterable.into_iter().nth(index))
}
