use std::{any::type_name, sync::Arc};

use crate::{consumers::Consumers, error::Error, observer::Observer};

type NextConsumer<'a, T> = dyn Fn(&T) + Send + Sync + 'a;
type ErrorConsumer<'a, E> = dyn Fn(&E) + Send + Sync + 'a;
type CompletedConsumer<'a> = dyn Fn(bool) + Send + Sync + 'a;

/// An observer that fans every notification out to any number of consumers.
///
/// Each channel (next, error, completed) keeps its own consumer list; clones
/// share the lists. Once `completed` has been delivered, all three lists are
/// cleared, so the broadcaster goes quiet: later notifications reach nobody.
///
/// A consumer that panics is logged and does not keep the remaining
/// consumers of its channel from being informed.
///
/// # Example
///
/// ```
/// use std::sync::{
///   atomic::{AtomicBool, Ordering},
///   Arc,
/// };
///
/// use almost_functional::broadcast::BroadcastObserver;
///
/// let flag = Arc::new(AtomicBool::new(false));
/// let seen = flag.clone();
/// let broadcast = BroadcastObserver::<bool>::new();
/// broadcast.add_next_consumer(move |v: &bool| seen.store(*v, Ordering::SeqCst));
///
/// broadcast.inform_next(&true);
/// assert!(flag.load(Ordering::SeqCst));
///
/// broadcast.inform_completed(true);
/// broadcast.inform_next(&false);
/// assert!(flag.load(Ordering::SeqCst));
/// ```
pub struct BroadcastObserver<'a, T, E = Error> {
  next: Consumers<NextConsumer<'a, T>>,
  error: Consumers<ErrorConsumer<'a, E>>,
  completed: Consumers<CompletedConsumer<'a>>,
}

impl<'a, T, E> BroadcastObserver<'a, T, E> {
  pub fn new() -> Self {
    Self {
      next: Consumers::default(),
      error: Consumers::default(),
      completed: Consumers::default(),
    }
  }

  pub fn add_next_consumer(&self, consumer: impl Fn(&T) + Send + Sync + 'a) -> &Self {
    self.next.add(Arc::new(consumer));
    self
  }

  pub fn add_error_consumer(&self, consumer: impl Fn(&E) + Send + Sync + 'a) -> &Self {
    self.error.add(Arc::new(consumer));
    self
  }

  pub fn add_completed_consumer(&self, consumer: impl Fn(bool) + Send + Sync + 'a) -> &Self {
    self.completed.add(Arc::new(consumer));
    self
  }

  pub fn inform_next(&self, value: &T) {
    self.next.inform("next", type_name::<T>(), |consumer| consumer(value));
  }

  pub fn inform_error(&self, err: &E) {
    self.error.inform("error", type_name::<E>(), |consumer| consumer(err));
  }

  /// Inform the completed consumers, then release every consumer of every
  /// channel.
  pub fn inform_completed(&self, without_error: bool) {
    self.completed.inform("completed", "bool", |consumer| consumer(without_error));
    self.next.clear();
    self.error.clear();
    self.completed.clear();
  }

  /// Whether any consumer is still registered on any channel.
  pub fn has_consumers(&self) -> bool {
    !(self.next.is_empty() && self.error.is_empty() && self.completed.is_empty())
  }
}

impl<T, E> Default for BroadcastObserver<'_, T, E> {
  fn default() -> Self { Self::new() }
}

impl<T, E> Clone for BroadcastObserver<'_, T, E> {
  fn clone(&self) -> Self {
    Self { next: self.next.clone(), error: self.error.clone(), completed: self.completed.clone() }
  }
}

impl<T, E> Observer<T, E> for BroadcastObserver<'_, T, E> {
  fn next(&mut self, value: T) { self.inform_next(&value); }

  fn error(&mut self, err: E) { self.inform_error(&err); }

  fn completed(self, without_error: bool) { self.inform_completed(without_error); }
}
