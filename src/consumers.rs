use std::sync::Arc;

use smallvec::SmallVec;

use crate::{rc::MutArc, util::catch_panic};

/// A list of consumers that can be added to and informed concurrently.
///
/// Informing works on a snapshot taken under a short lock, so a consumer may
/// register further consumers (or clear the list) without deadlocking, and
/// those changes only affect later notifications. A consumer that panics is
/// logged and skipped; the rest are still informed.
pub(crate) struct Consumers<F: ?Sized> {
  inner: MutArc<SmallVec<[Arc<F>; 2]>>,
}

impl<F: ?Sized> Default for Consumers<F> {
  fn default() -> Self { Self { inner: MutArc::own(SmallVec::new()) } }
}

impl<F: ?Sized> Clone for Consumers<F> {
  fn clone(&self) -> Self { Self { inner: self.inner.clone() } }
}

impl<F: ?Sized> Consumers<F> {
  #[inline]
  pub(crate) fn add(&self, consumer: Arc<F>) { self.inner.rc_deref_mut().push(consumer); }

  /// Drop every registered consumer.
  pub(crate) fn clear(&self) {
    let released = std::mem::take(&mut *self.inner.rc_deref_mut());
    // Release outside the lock; dropping a consumer may run arbitrary code.
    drop(released);
  }

  #[inline]
  pub(crate) fn len(&self) -> usize { self.inner.rc_deref_mut().len() }

  #[inline]
  pub(crate) fn is_empty(&self) -> bool { self.len() == 0 }

  /// Call every consumer in registration order.
  ///
  /// `channel` and `subject` only label the warning logged for a consumer
  /// that panics.
  pub(crate) fn inform(&self, channel: &str, subject: &str, call: impl Fn(&F)) {
    let snapshot = self.inner.rc_deref_mut().clone();
    for consumer in snapshot.iter() {
      if let Err(err) = catch_panic(|| call(&**consumer)) {
        log::warn!("failed informing {channel} consumer of {subject}: {err}");
      }
    }
  }
}
