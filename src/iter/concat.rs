use super::Cursor;
use crate::error::{Error, Result};

/// Walks a sequence of iterators in order, skipping exhausted ones.
pub struct Concat<I: Iterator> {
  pending: std::vec::IntoIter<I>,
  current: Option<I>,
  lookahead: Option<I::Item>,
}

/// Chains `iterators` one after the other.
///
/// Iterators of different types can be chained by boxing them as
/// `Box<dyn Iterator<Item = T>>`.
///
/// # Example
///
/// ```
/// use almost_functional::iter::{self, Cursor};
///
/// let parts = vec![vec![1, 2, 3], vec![], vec![4]];
/// let mut all = iter::concat(parts.into_iter().map(Vec::into_iter));
/// assert_eq!(all.by_ref().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
/// assert!(!all.has_next());
/// assert!(all.try_next().unwrap_err().is_not_found());
/// ```
pub fn concat<I>(iterators: impl IntoIterator<Item = I>) -> Concat<I>
where
  I: Iterator,
{
  let pending: Vec<I> = iterators.into_iter().collect();
  Concat { pending: pending.into_iter(), current: None, lookahead: None }
}

impl<I: Iterator> Concat<I> {
  fn advance(&mut self) -> Option<I::Item> {
    loop {
      if let Some(value) = self.current.as_mut().and_then(Iterator::next) {
        return Some(value);
      }
      match self.pending.next() {
        Some(next) => self.current = Some(next),
        None => {
          self.current = None;
          return None;
        }
      }
    }
  }
}

impl<I: Iterator> Iterator for Concat<I> {
  type Item = I::Item;

  fn next(&mut self) -> Option<I::Item> {
    match self.lookahead.take() {
      Some(value) => Some(value),
      None => self.advance(),
    }
  }
}

impl<I: Iterator> Cursor for Concat<I> {
  fn has_next(&mut self) -> bool {
    if self.lookahead.is_none() {
      self.lookahead = self.advance();
    }
    self.lookahead.is_some()
  }

  fn try_next(&mut self) -> Result<I::Item> {
    self.next().ok_or_else(|| Error::not_found("all concatenated iterators are exhausted"))
  }
}
