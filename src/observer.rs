//! Observer trait and adapters
//!
//! An observer watches a single deferred computation: it receives at most
//! one value or error, followed by exactly one completion notification.

// ============================================================================
// Observer Trait
// ============================================================================

/// Receives the outcome of a computation.
///
/// `next` or `error` may be called before `completed`; `completed` is always
/// the last call and consumes the observer.
pub trait Observer<Item, Err> {
  /// Receive a value.
  fn next(&mut self, value: Item);

  /// Receive a failure.
  fn error(&mut self, err: Err);

  /// Terminal notification. `without_error` is `false` when `error` was the
  /// preceding call.
  fn completed(self, without_error: bool);
}

// ============================================================================
// FnMutObserver - Closure adapter
// ============================================================================

/// A closure used as the `next` handler. Errors and completion are ignored.
#[derive(Clone)]
pub struct FnMutObserver<F>(pub F);

impl<F, Item, Err> Observer<Item, Err> for FnMutObserver<F>
where
  F: FnMut(Item),
{
  #[inline]
  fn next(&mut self, v: Item) { (self.0)(v); }

  #[inline]
  fn error(&mut self, _err: Err) {}

  #[inline]
  fn completed(self, _without_error: bool) {}
}

// ============================================================================
// Option
// ============================================================================

/// `None` ignores all events, `Some` delegates to the inner observer.
impl<O, Item, Err> Observer<Item, Err> for Option<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if let Some(inner) = self {
      inner.next(value);
    }
  }

  fn error(&mut self, err: Err) {
    if let Some(inner) = self {
      inner.error(err);
    }
  }

  fn completed(self, without_error: bool) {
    if let Some(inner) = self {
      inner.completed(without_error);
    }
  }
}

// ============================================================================
// Tests
// ============================================================================
