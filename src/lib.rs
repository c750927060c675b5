//! # almost-functional: small functional building blocks
//!
//! Lazy iterable combinators, an optional container, a single pass stream
//! and single-shot promises with fan-out notification.
//!
//! ## Quick Start
//!
//! ```rust
//! use almost_functional::prelude::*;
//!
//! // Lazy pipelines: nothing is pulled until the result is walked.
//! let odds = iter::filter(1..=9, |v: &i32| v % 2 == 1);
//! let squares = iter::map(odds, |v: i32| v * v);
//! assert_eq!(iter::reduce(squares, 0, |acc, v| acc + v), 165);
//!
//! // Deferred computations settle exactly once.
//! let promise = Promise::new(|| "42".parse::<i32>());
//! promise.on_settled(|v: Option<&i32>| assert_eq!(v, Some(&42)));
//! promise.run().unwrap();
//! assert_eq!(promise.state(), State::Fulfilled);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Optional`] | Zero or one value |
//! | [`iter`] | Lazy `map`, `filter`, `concat`, supplier driven and batched iteration |
//! | [`Stream`] | Single pass pipeline with close handlers |
//! | [`Promise`] / [`ObservedPromise`] | Single-shot deferred computation |
//! | [`BroadcastObserver`] | Fan-out of next, error and completed notifications |
//!
//! ## Feature Flags
//!
//! - **`parallel`** (default): [`iter::parallel_batch`] and the worker pool
//!   it runs on.
//!
//! ## Logging
//!
//! Failures inside user callbacks never propagate out of a notification;
//! they are reported through the [`log`] facade at `warn` level. Install any
//! `log` implementation to see them.
//!
//! [`Optional`]: optional::Optional
//! [`Stream`]: stream::Stream
//! [`Promise`]: promise::Promise
//! [`ObservedPromise`]: promise::ObservedPromise
//! [`BroadcastObserver`]: broadcast::BroadcastObserver

pub mod broadcast;
pub mod error;
pub mod function;
pub mod iter;
pub mod observer;
pub mod optional;
pub mod prelude;
pub mod promise;
pub mod stream;

mod consumers;
mod rc;
mod util;

pub use error::{Error, Result};
