//! Single-shot deferred computations.
//!
//! A promise wraps a supplier that is run at most once, on the thread that
//! calls `run`. The outcome is pushed to whoever registered interest:
//!
//! - [`Promise`] keeps three consumer lists (fulfilled, rejected, settled),
//! - [`ObservedPromise`] hands the outcome to a single [`Observer`].
//!
//! ```rust
//! use std::sync::{
//!   atomic::{AtomicI32, Ordering},
//!   Arc,
//! };
//!
//! use almost_functional::promise::{Promise, State};
//!
//! let answer = Arc::new(AtomicI32::new(0));
//! let seen = answer.clone();
//! let promise = Promise::from_fn(|| 42);
//! promise.on_fulfilled(move |v: &i32| seen.store(*v, Ordering::SeqCst));
//!
//! promise.run().unwrap();
//! assert_eq!(promise.state(), State::Fulfilled);
//! assert_eq!(answer.load(Ordering::SeqCst), 42);
//! assert!(promise.run().unwrap_err().is_invalid_state());
//! ```

use std::{
  any::type_name,
  sync::{
    atomic::{AtomicU8, Ordering},
    Arc, Mutex, PoisonError,
  },
};

use crate::{
  consumers::Consumers,
  error::{BoxError, Error, Result},
  observer::Observer,
  util::catch_panic,
};

/// Lifecycle of a promise. Transitions only move forward:
/// `Created -> Pending -> Fulfilled | Rejected`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum State {
  /// Not run yet.
  Created,
  /// The supplier is running.
  Pending,
  /// The supplier produced a value.
  Fulfilled,
  /// The supplier failed.
  Rejected,
}

impl State {
  pub fn is_settled(self) -> bool { matches!(self, State::Fulfilled | State::Rejected) }

  fn from_u8(raw: u8) -> State {
    match raw {
      0 => State::Created,
      1 => State::Pending,
      2 => State::Fulfilled,
      _ => State::Rejected,
    }
  }
}

// ============================================================================
// Deferred - supplier + exactly-once state machine
// ============================================================================

type Supplier<'a, T> = Box<dyn FnOnce() -> std::result::Result<T, BoxError> + Send + 'a>;

struct Deferred<'a, T> {
  supplier: Mutex<Option<Supplier<'a, T>>>,
  state: AtomicU8,
}

impl<'a, T> Deferred<'a, T> {
  fn new(supplier: Supplier<'a, T>) -> Self {
    Deferred { supplier: Mutex::new(Some(supplier)), state: AtomicU8::new(State::Created as u8) }
  }

  fn state(&self) -> State { State::from_u8(self.state.load(Ordering::Acquire)) }

  /// Claim the single run, call the supplier and record the settlement.
  ///
  /// The outer `Result` is the contract check; the inner one is the outcome
  /// of the supplier.
  fn settle(&self) -> Result<Result<T>> {
    self
      .state
      .compare_exchange(
        State::Created as u8,
        State::Pending as u8,
        Ordering::AcqRel,
        Ordering::Acquire,
      )
      .map_err(|_| Error::invalid_state("can only run a promise in the CREATED state"))?;

    let supplier = self
      .supplier
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .take()
      .ok_or_else(|| Error::invalid_state("promise supplier already consumed"))?;

    let outcome = match catch_panic(supplier) {
      Ok(Ok(value)) => Ok(value),
      Ok(Err(err)) => Err(Error::Rejected(err)),
      Err(panicked) => Err(panicked),
    };
    let settled = if outcome.is_ok() { State::Fulfilled } else { State::Rejected };
    self.state.store(settled as u8, Ordering::Release);
    log::debug!("promise of {} settled as {settled:?}", type_name::<T>());
    Ok(outcome)
  }
}

fn boxed<'a, T, E, F>(supplier: F) -> Supplier<'a, T>
where
  F: FnOnce() -> std::result::Result<T, E> + Send + 'a,
  E: Into<BoxError>,
{
  Box::new(move || supplier().map_err(Into::into))
}

// ============================================================================
// Promise - consumer lists
// ============================================================================

type FulfilledConsumer<'a, T> = dyn Fn(&T) + Send + Sync + 'a;
type RejectedConsumer<'a> = dyn Fn(&Error) + Send + Sync + 'a;
type SettledConsumer<'a, T> = dyn Fn(Option<&T>) + Send + Sync + 'a;

/// A deferred computation with fulfilled, rejected and settled consumers.
///
/// Consumers can be registered from any thread through `&self`, also while
/// another thread runs the promise. Each list is informed in registration
/// order; fulfilled or rejected consumers are always informed before the
/// settled ones. A consumer that panics is logged and skipped.
///
/// Consumers are released once the promise has settled; registering after
/// that point has no effect.
pub struct Promise<'a, T> {
  deferred: Deferred<'a, T>,
  fulfilled: Consumers<FulfilledConsumer<'a, T>>,
  rejected: Consumers<RejectedConsumer<'a>>,
  settled: Consumers<SettledConsumer<'a, T>>,
}

impl<'a, T> Promise<'a, T> {
  /// A promise of the value returned by `supplier`. An `Err` rejects it.
  pub fn new<F, E>(supplier: F) -> Self
  where
    F: FnOnce() -> std::result::Result<T, E> + Send + 'a,
    E: Into<BoxError>,
  {
    Promise {
      deferred: Deferred::new(boxed(supplier)),
      fulfilled: Consumers::default(),
      rejected: Consumers::default(),
      settled: Consumers::default(),
    }
  }

  /// A promise of an infallible supplier. It is only rejected if the
  /// supplier panics.
  pub fn from_fn<F>(supplier: F) -> Self
  where
    F: FnOnce() -> T + Send + 'a,
  {
    Self::new(move || Ok::<_, BoxError>(supplier()))
  }

  pub fn on_fulfilled(&self, consumer: impl Fn(&T) + Send + Sync + 'a) -> &Self {
    self.fulfilled.add(Arc::new(consumer));
    self
  }

  /// Receives [`Error::Rejected`] with the supplier's error, or
  /// [`Error::Panicked`] if the supplier panicked.
  pub fn on_rejected(&self, consumer: impl Fn(&Error) + Send + Sync + 'a) -> &Self {
    self.rejected.add(Arc::new(consumer));
    self
  }

  /// Receives the value on fulfilment, `None` on rejection.
  pub fn on_settled(&self, consumer: impl Fn(Option<&T>) + Send + Sync + 'a) -> &Self {
    self.settled.add(Arc::new(consumer));
    self
  }

  pub fn state(&self) -> State { self.deferred.state() }

  /// Run the supplier and inform the consumers, all on the calling thread.
  ///
  /// Returns `Ok(())` whether the promise was fulfilled or rejected; the
  /// outcome goes to the consumers and is visible through [`state`].
  ///
  /// # Errors
  ///
  /// [`Error::InvalidState`] if the promise has already been run. When
  /// several threads race, exactly one of them runs the supplier.
  ///
  /// [`state`]: Promise::state
  pub fn run(&self) -> Result<()> {
    let what = type_name::<T>();
    match self.deferred.settle()? {
      Ok(value) => {
        self.fulfilled.inform("fulfilled", what, |consumer| consumer(&value));
        self.settled.inform("settled", what, |consumer| consumer(Some(&value)));
      }
      Err(err) => {
        if self.rejected.is_empty() && self.settled.is_empty() {
          log::debug!("unobserved rejection of promise of {what}: {err}");
        }
        let reason = format!("{what} ({err})");
        self.rejected.inform("rejected", &reason, |consumer| consumer(&err));
        self.settled.inform("settled", what, |consumer| consumer(None));
      }
    }
    self.fulfilled.clear();
    self.rejected.clear();
    self.settled.clear();
    Ok(())
  }
}

// ============================================================================
// ObservedPromise - single observer
// ============================================================================

/// A deferred computation reporting to one [`Observer`].
///
/// On success the observer receives `next(value)` then `completed(true)`; on
/// failure `error(err)` then `completed(false)`. The observer is dropped
/// right after, releasing whatever it captured.
///
/// ```rust
/// use std::sync::{Arc, Mutex};
///
/// use almost_functional::{broadcast::BroadcastObserver, promise::ObservedPromise};
///
/// let log = Arc::new(Mutex::new(Vec::new()));
/// let observer = BroadcastObserver::<String>::new();
/// let (next, done) = (log.clone(), log.clone());
/// observer
///   .add_next_consumer(move |v: &String| next.lock().unwrap().push(v.clone()))
///   .add_completed_consumer(move |ok: bool| done.lock().unwrap().push(ok.to_string()));
///
/// let promise = ObservedPromise::from_fn(|| "hello".to_owned(), observer);
/// promise.run().unwrap();
/// assert_eq!(*log.lock().unwrap(), vec!["hello", "true"]);
/// ```
pub struct ObservedPromise<'a, T, O> {
  deferred: Deferred<'a, T>,
  observer: Mutex<Option<O>>,
}

impl<'a, T, O> ObservedPromise<'a, T, O>
where
  O: Observer<T, Error>,
{
  pub fn new<F, E>(supplier: F, observer: O) -> Self
  where
    F: FnOnce() -> std::result::Result<T, E> + Send + 'a,
    E: Into<BoxError>,
  {
    ObservedPromise {
      deferred: Deferred::new(boxed(supplier)),
      observer: Mutex::new(Some(observer)),
    }
  }

  pub fn from_fn<F>(supplier: F, observer: O) -> Self
  where
    F: FnOnce() -> T + Send + 'a,
  {
    Self::new(move || Ok::<_, BoxError>(supplier()), observer)
  }

  pub fn state(&self) -> State { self.deferred.state() }

  /// Whether the observer is still held, that is the promise has not run.
  pub fn has_observer(&self) -> bool {
    self.observer.lock().unwrap_or_else(PoisonError::into_inner).is_some()
  }

  /// Run the supplier and notify the observer on the calling thread.
  ///
  /// # Errors
  ///
  /// [`Error::InvalidState`] if the promise has already been run.
  pub fn run(&self) -> Result<()> {
    let outcome = self.deferred.settle()?;
    let observer = self.observer.lock().unwrap_or_else(PoisonError::into_inner).take();
    let Some(mut observer) = observer else {
      return Ok(());
    };

    let what = type_name::<T>();
    let without_error = outcome.is_ok();
    let delivered = match outcome {
      Ok(value) => catch_panic(|| observer.next(value)),
      Err(err) => catch_panic(|| observer.error(err)),
    };
    if let Err(err) = delivered {
      log::warn!("observer of promise of {what} failed: {err}");
    }
    if let Err(err) = catch_panic(move || observer.completed(without_error)) {
      log::warn!("observer of promise of {what} failed on completion: {err}");
    }
    Ok(())
  }
}
