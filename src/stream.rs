use std::{iter::FromIterator, mem};

use smallvec::SmallVec;

use crate::{
  iter::{concat, FilterIter, MapIter},
  optional::Optional,
  util::catch_panic,
};

type Elements<'a, T> = Box<dyn Iterator<Item = T> + 'a>;
type CloseHandlers<'a> = SmallVec<[Box<dyn FnOnce() + 'a>; 2]>;

/// A single pass pipeline over a sequence of elements.
///
/// `map`, `filter` and `concat` are lazy: they wrap the remaining elements
/// without pulling any. The terminal operations consume the stream; dropping
/// a stream, by a terminal operation or otherwise, runs its close handlers.
///
/// # Example
///
/// ```
/// use almost_functional::stream::Stream;
///
/// let sum = Stream::of(vec![1, 2, 3, 4])
///   .filter(|v: &i32| v % 2 == 0)
///   .map(|v| v * v)
///   .reduce(0, |acc, v| acc + v);
/// assert_eq!(sum, 20);
/// ```
pub struct Stream<'a, T> {
  elements: Elements<'a, T>,
  close_handlers: CloseHandlers<'a>,
}

impl<'a, T: 'a> Stream<'a, T> {
  pub fn of<I>(source: I) -> Self
  where
    I: IntoIterator<Item = T>,
    I::IntoIter: 'a,
  {
    Stream { elements: Box::new(source.into_iter()), close_handlers: SmallVec::new() }
  }

  pub fn empty() -> Self { Self::of(std::iter::empty()) }

  pub fn map<R: 'a>(self, func: impl FnMut(T) -> R + 'a) -> Stream<'a, R> {
    let (elements, close_handlers) = self.into_parts();
    Stream { elements: Box::new(MapIter::new(elements, func)), close_handlers }
  }

  pub fn filter(self, predicate: impl FnMut(&T) -> bool + 'a) -> Stream<'a, T> {
    let (elements, close_handlers) = self.into_parts();
    Stream { elements: Box::new(FilterIter::new(elements, predicate)), close_handlers }
  }

  /// The remaining elements of `first`, then those of `second`. The close
  /// handlers of both are kept.
  pub fn concat(first: Stream<'a, T>, second: Stream<'a, T>) -> Stream<'a, T> {
    let (a, mut close_handlers) = first.into_parts();
    let (b, more) = second.into_parts();
    close_handlers.extend(more);
    Stream { elements: Box::new(concat([a, b])), close_handlers }
  }

  /// Register a handler to run when the stream is closed.
  pub fn on_close(mut self, handler: impl FnOnce() + 'a) -> Self {
    self.close_handlers.push(Box::new(handler));
    self
  }

  pub fn for_each(mut self, consumer: impl FnMut(T)) { self.elements.by_ref().for_each(consumer) }

  /// Left fold of the remaining elements, starting from `initial`.
  pub fn reduce<R>(mut self, initial: R, accumulator: impl FnMut(R, T) -> R) -> R {
    self.elements.by_ref().fold(initial, accumulator)
  }

  /// Left fold seeded with the first element; empty for an empty stream.
  pub fn reduce_first(mut self, accumulator: impl FnMut(T, T) -> T) -> Optional<T> {
    Optional::of_nullable(self.elements.by_ref().reduce(accumulator))
  }

  /// Stops at the first element that matches.
  pub fn any_match(mut self, mut predicate: impl FnMut(&T) -> bool) -> bool {
    self.elements.by_ref().any(|v| predicate(&v))
  }

  /// Stops at the first element that does not match.
  pub fn all_match(mut self, mut predicate: impl FnMut(&T) -> bool) -> bool {
    self.elements.by_ref().all(|v| predicate(&v))
  }

  pub fn none_match(self, predicate: impl FnMut(&T) -> bool) -> bool { !self.any_match(predicate) }

  pub fn count(mut self) -> usize { self.elements.by_ref().count() }

  /// Run every close handler once, in registration order. A handler that
  /// panics is logged and the remaining handlers still run.
  pub fn close(mut self) { self.run_close_handlers(); }

  fn into_parts(mut self) -> (Elements<'a, T>, CloseHandlers<'a>) {
    let elements = mem::replace(&mut self.elements, Box::new(std::iter::empty()));
    (elements, mem::take(&mut self.close_handlers))
  }
}

impl<T> Stream<'_, T> {
  fn run_close_handlers(&mut self) {
    for handler in mem::take(&mut self.close_handlers) {
      if let Err(err) = catch_panic(handler) {
        log::warn!("exception on stream close: {err}");
      }
    }
  }
}

impl<T> Iterator for Stream<'_, T> {
  type Item = T;

  #[inline]
  fn next(&mut self) -> Option<T> { self.elements.next() }

  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) { self.elements.size_hint() }
}

impl<T> Drop for Stream<'_, T> {
  fn drop(&mut self) { self.run_close_handlers(); }
}

impl<'a, T: 'a> From<Vec<T>> for Stream<'a, T> {
  fn from(values: Vec<T>) -> Self { Stream::of(values) }
}

impl<'a, T: 'a> FromIterator<T> for Stream<'a, T> {
  fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
    Stream::of(iter.into_iter().collect::<Vec<_>>())
  }
}
