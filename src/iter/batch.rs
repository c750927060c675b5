/// At most `count` further elements of a shared iterator.
///
/// Advancing the returned cursor advances `iterator` itself, so consecutive
/// calls carve consecutive batches out of the same source.
///
/// # Example
///
/// ```
/// use almost_functional::iter;
///
/// let mut numbers = vec![1, 2, 3, 4, 5].into_iter();
/// assert_eq!(iter::next(&mut numbers, 4).count(), 4);
/// assert_eq!(iter::next(&mut numbers, 4).count(), 1);
/// assert_eq!(iter::next(&mut numbers, 4).count(), 0);
/// ```
pub fn next<I: Iterator>(iterator: &mut I, count: usize) -> Next<'_, I> {
  Next { iterator, remaining: count }
}

/// Cursor returned by [`next`].
pub struct Next<'a, I> {
  iterator: &'a mut I,
  remaining: usize,
}

impl<I: Iterator> Iterator for Next<'_, I> {
  type Item = I::Item;

  fn next(&mut self) -> Option<I::Item> {
    if self.remaining == 0 {
      return None;
    }
    match self.iterator.next() {
      Some(value) => {
        self.remaining -= 1;
        Some(value)
      }
      None => {
        self.remaining = 0;
        None
      }
    }
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    let (lower, upper) = self.iterator.size_hint();
    let upper = upper.map_or(self.remaining, |u| u.min(self.remaining));
    (lower.min(self.remaining), Some(upper))
  }
}

/// Splits `iterator` into consecutive vectors of at most `size` elements.
pub(crate) fn chunks<I: Iterator>(
  mut iterator: I,
  size: usize,
) -> impl Iterator<Item = Vec<I::Item>> {
  std::iter::from_fn(move || {
    let chunk: Vec<_> = next(&mut iterator, size).collect();
    if chunk.is_empty() { None } else { Some(chunk) }
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn drains_shared_cursor() {
    let mut numbers = vec![1, 2, 3, 4, 5].into_iter();
    assert_eq!(next(&mut numbers, 4).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    assert_eq!(next(&mut numbers, 4).collect::<Vec<_>>(), vec![5]);
    assert_eq!(numbers.next(), None);
  }

  #[test]
  fn partial_consumption_leaves_rest() {
    let mut letters = "abcdef".chars();
    {
      let mut batch = next(&mut letters, 3);
      assert_eq!(batch.next(), Some('a'));
    }
    assert_eq!(letters.next(), Some('b'));
  }

  #[test]
  fn zero_count_takes_nothing() {
    let mut numbers = 0..3;
    assert_eq!(next(&mut numbers, 0).count(), 0);
    assert_eq!(numbers.next(), Some(0));
  }

  #[test]
  fn chunks_of_size() {
    let batches: Vec<_> = chunks(1..=5, 2).collect();
    assert_eq!(batches, vec![vec![1, 2], vec![3, 4], vec![5]]);
    assert_eq!(chunks(0..0, 2).count(), 0);
  }
}
