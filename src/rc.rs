use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared, thread safe, mutable cell.
///
/// Locks never report poisoning. A user callback that panics while the cell
/// is locked must not make the cell unusable for every other holder.
pub struct MutArc<T>(Arc<Mutex<T>>);

impl<T> MutArc<T> {
  pub fn own(t: T) -> Self { Self(Arc::new(Mutex::new(t))) }

  #[inline]
  pub fn rc_deref_mut(&self) -> MutexGuard<'_, T> {
    self.0.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl<T> Clone for MutArc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}
