use std::{
  any::Any,
  panic::{self, AssertUnwindSafe},
};

use crate::error::Error;

/// Run `f`, turning a panic into [`Error::Panicked`].
///
/// User callbacks are treated as opaque: whatever state they touched is
/// theirs to keep consistent, so the closure is asserted unwind safe.
pub(crate) fn catch_panic<R>(f: impl FnOnce() -> R) -> Result<R, Error> {
  panic::catch_unwind(AssertUnwindSafe(f))
    .map_err(|payload| Error::Panicked(panic_message(&*payload)))
}

/// Best effort extraction of the message a panic was raised with.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
  if let Some(msg) = payload.downcast_ref::<&'static str>() {
    (*msg).to_owned()
  } else if let Some(msg) = payload.downcast_ref::<String>() {
    msg.clone()
  } else {
    "Box<dyn Any>".to_owned()
  }
}
