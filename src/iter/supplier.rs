use std::marker::PhantomData;

use super::Cursor;
use crate::{
  error::{Error, Result},
  optional::Optional,
  rc::MutArc,
  util::catch_panic,
};

/// An iterable driven by a supplier of optional values.
///
/// Every cursor calls the shared supplier for its next element; an empty
/// [`Optional`] marks the end of the sequence. Cursors created from the same
/// iterable draw from the same supplier, so they interleave rather than
/// restart.
///
/// # Example
///
/// ```
/// use almost_functional::{iter::SupplierIterable, optional::Optional};
///
/// let mut lines = vec!["Manifest-Version: 1.0", "Created-By: hand"].into_iter();
/// let manifest = SupplierIterable::new(move || Optional::of_nullable(lines.next()));
///
/// let read: Vec<_> = manifest.into_iter().collect();
/// assert_eq!(read, vec!["Manifest-Version: 1.0", "Created-By: hand"]);
/// ```
pub struct SupplierIterable<F> {
  supplier: MutArc<F>,
}

impl<F> SupplierIterable<F> {
  pub fn new<T>(supplier: F) -> Self
  where
    F: FnMut() -> Optional<T>,
  {
    SupplierIterable { supplier: MutArc::own(supplier) }
  }

  /// A cursor drawing from the shared supplier.
  pub fn iter<T>(&self) -> SupplierIter<F, T>
  where
    F: FnMut() -> Optional<T>,
  {
    SupplierIter { supplier: self.supplier.clone(), lookahead: None, _item: PhantomData }
  }
}

impl<'a, F, T> IntoIterator for &'a SupplierIterable<F>
where
  F: FnMut() -> Optional<T>,
{
  type Item = T;
  type IntoIter = SupplierIter<F, T>;

  fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl<F, T> IntoIterator for SupplierIterable<F>
where
  F: FnMut() -> Optional<T>,
{
  type Item = T;
  type IntoIter = SupplierIter<F, T>;

  fn into_iter(self) -> Self::IntoIter { self.iter() }
}

/// Cursor of a [`SupplierIterable`].
///
/// The answer of the supplier is cached from [`Cursor::has_next`] until
/// [`Iterator::next`] hands it out.
pub struct SupplierIter<F, T> {
  supplier: MutArc<F>,
  lookahead: Option<Optional<T>>,
  _item: PhantomData<fn() -> T>,
}

impl<F, T> SupplierIter<F, T>
where
  F: FnMut() -> Optional<T>,
{
  fn fill(&mut self) -> &Optional<T> {
    let supplier = &self.supplier;
    self.lookahead.get_or_insert_with(|| {
      let mut supplier = supplier.rc_deref_mut();
      (*supplier)()
    })
  }

  /// Like [`Cursor::has_next`], but a supplier that panics is reported as a
  /// broken contract instead of unwinding through the caller.
  pub fn try_has_next(&mut self) -> Result<bool> {
    if self.lookahead.is_none() {
      let supplier = &self.supplier;
      let supplied = catch_panic(|| {
        let mut supplier = supplier.rc_deref_mut();
        (*supplier)()
      })
      .map_err(|err| Error::invalid_state(format!("supplier failed to provide a value: {err}")))?;
      self.lookahead = Some(supplied);
    }
    Ok(self.lookahead.as_ref().is_some_and(Optional::is_present))
  }
}

impl<F, T> Iterator for SupplierIter<F, T>
where
  F: FnMut() -> Optional<T>,
{
  type Item = T;

  fn next(&mut self) -> Option<T> {
    self.fill();
    // An empty answer stays cached so the supplier is not asked again.
    match self.lookahead.take() {
      Some(supplied) if supplied.is_present() => supplied.into_option(),
      ended => {
        self.lookahead = ended;
        None
      }
    }
  }
}

impl<F, T> Cursor for SupplierIter<F, T>
where
  F: FnMut() -> Optional<T>,
{
  fn has_next(&mut self) -> bool { self.fill().is_present() }

  fn try_next(&mut self) -> Result<T> {
    self
      .next()
      .ok_or_else(|| Error::invalid_state("next invoked on iterator where has_next is false"))
  }
}
