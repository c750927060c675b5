//! Parallel dispatch of fixed size batches.
//!
//! This is the only place in the crate where work leaves the calling
//! thread. Batches run on a [`WorkerPool`]; the caller blocks until every
//! batch has been handled.

use std::sync::Arc;

use futures::{
  executor::{block_on, ThreadPool},
  future::{self, join_all},
  task::SpawnExt,
};
use once_cell::sync::OnceCell;

use super::batch::chunks;
use crate::{
  error::{BoxError, Error, Result},
  util::catch_panic,
};

/// The elements of one batch, handed to the batch consumer.
pub type Chunk<T> = std::vec::IntoIter<T>;

static SHARED_POOL: OnceCell<WorkerPool> = OnceCell::new();

/// A fixed size pool of worker threads.
#[derive(Clone, Debug)]
pub struct WorkerPool {
  pool: ThreadPool,
  size: usize,
}

impl WorkerPool {
  pub fn builder() -> WorkerPoolBuilder { WorkerPoolBuilder::default() }

  /// The process wide pool, created on first use with one worker per
  /// logical CPU. It is never torn down.
  pub fn shared() -> Result<&'static WorkerPool> {
    SHARED_POOL.get_or_try_init(|| WorkerPool::builder().create())
  }

  /// Number of worker threads.
  pub fn size(&self) -> usize { self.size }
}

/// Configuration for a [`WorkerPool`].
#[derive(Clone, Debug)]
pub struct WorkerPoolBuilder {
  pool_size: usize,
  name_prefix: String,
}

impl Default for WorkerPoolBuilder {
  fn default() -> Self {
    WorkerPoolBuilder { pool_size: num_cpus::get(), name_prefix: "almost-functional-".to_owned() }
  }
}

impl WorkerPoolBuilder {
  pub fn pool_size(mut self, size: usize) -> Self {
    self.pool_size = size;
    self
  }

  /// Prefix of the worker thread names; the worker index is appended.
  pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
    self.name_prefix = prefix.into();
    self
  }

  pub fn create(&self) -> Result<WorkerPool> {
    if self.pool_size == 0 {
      return Err(Error::invalid_argument("a worker pool needs at least one thread"));
    }
    let pool = ThreadPool::builder()
      .pool_size(self.pool_size)
      .name_prefix(self.name_prefix.clone())
      .create()?;
    log::debug!("created worker pool of {} threads", self.pool_size);
    Ok(WorkerPool { pool, size: self.pool_size })
  }
}

/// Partition `iterator` into batches of `batch_size` elements and hand every
/// batch to `consumer` on the shared [`WorkerPool`].
///
/// Blocks until all batches are processed. If any batch fails, by returning
/// an error or by panicking, the first failing batch (in source order) is
/// reported as [`Error::Batch`]; the remaining batches still run to
/// completion.
///
/// Must not be called from inside a worker of the same pool: the caller
/// would occupy the thread it waits on.
///
/// # Example
///
/// ```
/// use std::sync::{
///   atomic::{AtomicUsize, Ordering},
///   Arc,
/// };
///
/// use almost_functional::iter;
///
/// let seen = Arc::new(AtomicUsize::new(0));
/// let counter = seen.clone();
/// iter::parallel_batch(
///   1..=5,
///   move |batch: iter::Chunk<i32>| {
///     counter.fetch_add(batch.count(), Ordering::SeqCst);
///     Ok::<_, std::convert::Infallible>(())
///   },
///   2,
/// )
/// .unwrap();
/// assert_eq!(seen.load(Ordering::SeqCst), 5);
/// ```
pub fn parallel_batch<I, F, E>(iterator: I, consumer: F, batch_size: usize) -> Result<()>
where
  I: IntoIterator,
  I::Item: Send + 'static,
  F: Fn(Chunk<I::Item>) -> std::result::Result<(), E> + Send + Sync + 'static,
  E: Into<BoxError>,
{
  parallel_batch_on(WorkerPool::shared()?, iterator, consumer, batch_size)
}

/// [`parallel_batch`] on a caller provided pool.
pub fn parallel_batch_on<I, F, E>(
  pool: &WorkerPool,
  iterator: I,
  consumer: F,
  batch_size: usize,
) -> Result<()>
where
  I: IntoIterator,
  I::Item: Send + 'static,
  F: Fn(Chunk<I::Item>) -> std::result::Result<(), E> + Send + Sync + 'static,
  E: Into<BoxError>,
{
  if batch_size == 0 {
    return Err(Error::invalid_argument("batch size must be greater than zero"));
  }

  let consumer = Arc::new(consumer);
  let mut handles = Vec::new();
  for (index, chunk) in chunks(iterator.into_iter(), batch_size).enumerate() {
    let consumer = consumer.clone();
    let task = future::lazy(move |_| run_chunk(index, &*consumer, chunk));
    handles.push(pool.pool.spawn_with_handle(task)?);
  }

  let total = handles.len();
  let mut failures = block_on(join_all(handles)).into_iter().filter_map(|r| r.err());
  match failures.next() {
    None => Ok(()),
    Some(first) => {
      let failed = 1 + failures.count();
      Err(Error::Batch { failed, total, source: Box::new(first) })
    }
  }
}

fn run_chunk<T, F, E>(index: usize, consumer: &F, chunk: Vec<T>) -> Result<()>
where
  F: Fn(Chunk<T>) -> std::result::Result<(), E>,
  E: Into<BoxError>,
{
  let result = match catch_panic(|| consumer(chunk.into_iter())) {
    Ok(Ok(())) => Ok(()),
    Ok(Err(err)) => Err(Error::rejected(err)),
    Err(panicked) => Err(panicked),
  };
  if let Err(err) = &result {
    log::warn!("batch {index} failed: {err}");
  }
  result
}

#[cfg(test)]
mod tests {
  use std::{
    collections::HashSet,
    convert::Infallible,
    sync::{
      atomic::{AtomicUsize, Ordering},
      Mutex,
    },
    thread,
  };

  use super::*;

  fn pool(size: usize) -> WorkerPool { WorkerPool::builder().pool_size(size).create().unwrap() }

  #[test]
  fn every_element_in_some_batch() {
    let batches = Arc::new(AtomicUsize::new(0));
    let count = Arc::new(AtomicUsize::new(0));
    let (b, c) = (batches.clone(), count.clone());

    parallel_batch(
      vec![1, 2, 3, 4, 5],
      move |chunk: Chunk<i32>| {
        b.fetch_add(1, Ordering::SeqCst);
        c.fetch_add(chunk.count(), Ordering::SeqCst);
        Ok::<_, Infallible>(())
      },
      2,
    )
    .unwrap();

    assert_eq!(batches.load(Ordering::SeqCst), 3);
    assert_eq!(count.load(Ordering::SeqCst), 5);
  }

  #[test]
  fn runs_off_the_calling_thread() {
    let threads = Arc::new(Mutex::new(HashSet::new()));
    let seen = threads.clone();
    parallel_batch_on(
      &pool(2),
      0..8,
      move |_: Chunk<i32>| {
        seen.lock().unwrap().insert(thread::current().id());
        Ok::<_, Infallible>(())
      },
      1,
    )
    .unwrap();

    let threads = threads.lock().unwrap();
    assert!(!threads.is_empty());
    assert!(!threads.contains(&thread::current().id()));
  }

  #[test]
  fn first_failure_surfaces_and_others_still_run() {
    let processed = Arc::new(AtomicUsize::new(0));
    let p = processed.clone();
    let err = parallel_batch_on(
      &pool(2),
      1..=6,
      move |chunk: Chunk<i32>| {
        let values: Vec<_> = chunk.collect();
        p.fetch_add(values.len(), Ordering::SeqCst);
        if values.contains(&3) {
          Err("three is not welcome")
        } else {
          Ok(())
        }
      },
      2,
    )
    .unwrap_err();

    match err {
      Error::Batch { failed, total, source } => {
        assert_eq!((failed, total), (1, 3));
        assert!(source.is_rejected());
      }
      other => panic!("unexpected error {other}"),
    }
    assert_eq!(processed.load(Ordering::SeqCst), 6);
  }

  #[test]
  fn panicking_batch_is_reported() {
    let err = parallel_batch_on(
      &pool(1),
      0..4,
      |chunk: Chunk<i32>| -> std::result::Result<(), Infallible> {
        if chunk.len() > 1 {
          panic!("too big");
        }
        Ok(())
      },
      2,
    )
    .unwrap_err();

    match err {
      Error::Batch { failed, total, source } => {
        assert_eq!((failed, total), (2, 2));
        assert!(source.is_panicked());
      }
      other => panic!("unexpected error {other}"),
    }
  }

  #[test]
  fn empty_source_is_ok() {
    parallel_batch(Vec::<u8>::new(), |_: Chunk<u8>| Ok::<_, Infallible>(()), 3).unwrap();
  }

  #[test]
  fn zero_batch_size_is_rejected() {
    let err = parallel_batch(0..3, |_: Chunk<i32>| Ok::<_, Infallible>(()), 0).unwrap_err();
    assert!(err.is_invalid_argument());
  }

  #[test]
  fn zero_sized_pool_is_rejected() {
    assert!(WorkerPool::builder().pool_size(0).create().unwrap_err().is_invalid_argument());
  }

  #[test]
  fn shared_pool_is_reused() {
    let a = WorkerPool::shared().unwrap();
    let b = WorkerPool::shared().unwrap();
    assert!(std::ptr::eq(a, b));
    assert_eq!(a.size(), num_cpus::get());
  }
}
