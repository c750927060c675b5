//! Prelude module for convenient imports
//!
//! Brings the core types, the composition helpers and the [`iter`] module
//! into scope.

pub use crate::{
  broadcast::BroadcastObserver,
  error::{BoxError, Error},
  function::{self, PredicateExt},
  iter::{self, Cursor},
  observer::{FnMutObserver, Observer},
  optional::Optional,
  promise::{ObservedPromise, Promise, State},
  stream::Stream,
};
