use super::Cursor;
use crate::error::{Error, Result};

/// Lazily keeps only the elements of the source that satisfy a predicate.
///
/// Iterating `&Filter` starts a fresh traversal of the source each time;
/// iterating `Filter` by value consumes it.
#[derive(Clone)]
pub struct Filter<I, P> {
  source: I,
  predicate: P,
}

/// Creates a [`Filter`] over `source`.
///
/// # Example
///
/// ```
/// use almost_functional::iter;
///
/// let odds = iter::filter(vec![1, 2, 3, 4, 5, 6], |v: &&i32| *v % 2 == 1);
///
/// assert_eq!((&odds).into_iter().copied().collect::<Vec<_>>(), vec![1, 3, 5]);
/// ```
pub fn filter<I, P>(source: I, predicate: P) -> Filter<I, P> { Filter { source, predicate } }

impl<'a, I, P> IntoIterator for &'a Filter<I, P>
where
  &'a I: IntoIterator,
  P: Fn(&<&'a I as IntoIterator>::Item) -> bool,
{
  type Item = <&'a I as IntoIterator>::Item;
  type IntoIter = FilterIter<<&'a I as IntoIterator>::IntoIter, &'a P>;

  fn into_iter(self) -> Self::IntoIter {
    FilterIter::new(self.source.into_iter(), &self.predicate)
  }
}

impl<I, P> IntoIterator for Filter<I, P>
where
  I: IntoIterator,
  P: FnMut(&I::Item) -> bool,
{
  type Item = I::Item;
  type IntoIter = FilterIter<I::IntoIter, P>;

  fn into_iter(self) -> Self::IntoIter {
    FilterIter::new(self.source.into_iter(), self.predicate)
  }
}

/// Cursor of a [`Filter`].
///
/// Holds at most one matching element that has been pulled from the source
/// to answer [`Cursor::has_next`] but not yet handed out.
pub struct FilterIter<It: Iterator, P> {
  source: It,
  predicate: P,
  lookahead: Option<It::Item>,
}

impl<It: Iterator, P> FilterIter<It, P> {
  pub fn new(source: It, predicate: P) -> Self {
    FilterIter { source, predicate, lookahead: None }
  }
}

impl<It, P> FilterIter<It, P>
where
  It: Iterator,
  P: FnMut(&It::Item) -> bool,
{
  fn advance(&mut self) -> Option<It::Item> {
    let predicate = &mut self.predicate;
    self.source.find(|v| predicate(v))
  }
}

impl<It, P> Iterator for FilterIter<It, P>
where
  It: Iterator,
  P: FnMut(&It::Item) -> bool,
{
  type Item = It::Item;

  fn next(&mut self) -> Option<It::Item> {
    match self.lookahead.take() {
      Some(value) => Some(value),
      None => self.advance(),
    }
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    let buffered = usize::from(self.lookahead.is_some());
    let (_, upper) = self.source.size_hint();
    (buffered, upper.and_then(|u| u.checked_add(buffered)))
  }
}

impl<It, P> Cursor for FilterIter<It, P>
where
  It: Iterator,
  P: FnMut(&It::Item) -> bool,
{
  fn has_next(&mut self) -> bool {
    if self.lookahead.is_none() {
      self.lookahead = self.advance();
    }
    self.lookahead.is_some()
  }

  fn try_next(&mut self) -> Result<It::Item> {
    self
      .next()
      .ok_or_else(|| Error::invalid_state("next called on a filter with no further match"))
  }
}
