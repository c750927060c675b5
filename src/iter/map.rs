/// Lazily applies a function to every element of the source.
///
/// Iterating `&Map` starts a fresh traversal of the source each time;
/// iterating `Map` by value consumes it.
#[derive(Clone)]
pub struct Map<I, F> {
  source: I,
  func: F,
}

/// Creates a [`Map`] over `source`.
///
/// # Example
///
/// ```
/// use almost_functional::iter;
///
/// let squares = iter::map(vec![2, 4, 6, 8], |v: &i32| v * v);
///
/// assert_eq!((&squares).into_iter().collect::<Vec<_>>(), vec![4, 16, 36, 64]);
/// // A second traversal starts from the beginning again.
/// assert_eq!((&squares).into_iter().count(), 4);
/// ```
pub fn map<I, F>(source: I, func: F) -> Map<I, F> { Map { source, func } }

impl<'a, I, F, B> IntoIterator for &'a Map<I, F>
where
  &'a I: IntoIterator,
  F: Fn(<&'a I as IntoIterator>::Item) -> B,
{
  type Item = B;
  type IntoIter = MapIter<<&'a I as IntoIterator>::IntoIter, &'a F>;

  fn into_iter(self) -> Self::IntoIter { MapIter::new(self.source.into_iter(), &self.func) }
}

impl<I, F, B> IntoIterator for Map<I, F>
where
  I: IntoIterator,
  F: FnMut(I::Item) -> B,
{
  type Item = B;
  type IntoIter = MapIter<I::IntoIter, F>;

  fn into_iter(self) -> Self::IntoIter { MapIter::new(self.source.into_iter(), self.func) }
}

/// Cursor of a [`Map`].
pub struct MapIter<It, F> {
  source: It,
  func: F,
}

impl<It, F> MapIter<It, F> {
  pub fn new(source: It, func: F) -> Self { MapIter { source, func } }
}

impl<B, It, F> Iterator for MapIter<It, F>
where
  It: Iterator,
  F: FnMut(It::Item) -> B,
{
  type Item = B;

  #[inline]
  fn next(&mut self) -> Option<B> { self.source.next().map(&mut self.func) }

  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) { self.source.size_hint() }
}
