//! Integration tests for almost-functional
//!
//! Exercises the public API end to end: lazy pipelines, optional values,
//! streams and promise settlement across threads.

use std::{
  sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Barrier, Mutex,
  },
  thread,
};

use almost_functional::{iter::SupplierIterable, prelude::*};

// ============================================================================
// Optional
// ============================================================================

#[test]
fn optional_presence() {
  assert_eq!(Optional::of(5).get().ok(), Some(&5));
  assert!(Optional::<u8>::empty().get().unwrap_err().is_not_found());
  assert!(Optional::<u8>::of_nullable(None).is_empty());
  assert_eq!(Optional::of_nullable(Some("x")), Optional::of("x"));
}

#[test]
fn optional_mapping() {
  assert!(Optional::<i32>::empty().map(|v| v + 1).is_empty());
  assert!(Optional::of(1).map_nullable(|_| None::<i32>).is_empty());
  assert_eq!(Optional::of(1).map(|v| v + 1), Optional::of(2));
  assert_eq!(Optional::<i32>::empty().or_else_compute(|| 9), 9);
}

// ============================================================================
// Lazy pipelines
// ============================================================================

#[test]
fn filter_map_reduce_pipeline() {
  let words = vec!["lazy", "", "iterables", "", "compose"];
  let lengths = iter::map(iter::filter(words, |w: &&&str| !w.is_empty()), |w: &&str| w.len());

  assert_eq!((&lengths).into_iter().collect::<Vec<_>>(), vec![4, 9, 7]);
  // The same pipeline can be walked again.
  assert_eq!(iter::reduce(&lengths, 0, |acc, len| acc + len), 20);
  assert!(iter::any(&lengths, |len| *len > 8));
  assert_eq!(iter::get(&lengths, 2), Optional::of(7));
}

#[test]
fn membership_predicates() {
  let vowel = function::contains(vec!['a', 'e', 'i', 'o', 'u']);
  assert!(vowel(&'e'));
  let consonants = iter::filter("functional".chars(), function::negate(vowel));
  assert_eq!(consonants.into_iter().collect::<String>(), "fnctnl");
  assert_eq!(iter::apply_last("abc".chars(), |c| c.to_ascii_uppercase()), Optional::of('C'));
}

#[test]
fn concat_walks_every_source() {
  let mut letters = iter::concat(vec![vec!['a', 'b'].into_iter(), vec!['c'].into_iter()]);
  assert_eq!(letters.by_ref().collect::<String>(), "abc");
  assert!(!letters.has_next());
  assert!(letters.try_next().unwrap_err().is_not_found());
}

#[test]
fn supplier_reads_until_empty() {
  let mut lines = "Manifest-Version: 1.0\nMain-Class: app.Main\n".lines();
  let manifest = SupplierIterable::new(move || Optional::of_nullable(lines.next()));
  let main_class = iter::find(&manifest, |line| line.starts_with("Main-Class"))
    .map(|line| line.trim_start_matches("Main-Class: "));
  assert_eq!(main_class, Optional::of("app.Main"));
}

#[test]
fn batches_from_a_shared_cursor() {
  let mut numbers = 1..=10;
  let mut sizes = Vec::new();
  loop {
    let batch: Vec<_> = iter::next(&mut numbers, 4).collect();
    if batch.is_empty() {
      break;
    }
    sizes.push(batch.len());
  }
  assert_eq!(sizes, vec![4, 4, 2]);
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_batch_visits_everything() {
  let sum = Arc::new(AtomicUsize::new(0));
  let batches = Arc::new(AtomicUsize::new(0));
  let (s, b) = (sum.clone(), batches.clone());

  iter::parallel_batch(
    1..=100usize,
    move |chunk: iter::Chunk<usize>| {
      b.fetch_add(1, Ordering::SeqCst);
      s.fetch_add(chunk.sum::<usize>(), Ordering::SeqCst);
      Ok::<_, std::convert::Infallible>(())
    },
    7,
  )
  .unwrap();

  assert_eq!(sum.load(Ordering::SeqCst), 5050);
  assert_eq!(batches.load(Ordering::SeqCst), 15);
}

// ============================================================================
// Stream
// ============================================================================

#[test]
fn stream_pipeline_closes_once() {
  let closed = AtomicUsize::new(0);
  let total = Stream::of(1..=6)
    .on_close(|| {
      closed.fetch_add(1, Ordering::SeqCst);
    })
    .filter(|v: &i32| v % 3 == 0)
    .map(|v| v * 2)
    .reduce(0, |acc, v| acc + v);
  assert_eq!(total, 18);
  assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[test]
fn failing_close_handler_does_not_stop_others() {
  let closed = AtomicBool::new(false);
  Stream::from(vec![1, 2])
    .on_close(|| panic!("cleanup failed"))
    .on_close(|| closed.store(true, Ordering::SeqCst))
    .close();
  assert!(closed.load(Ordering::SeqCst));
}

// ============================================================================
// Promise
// ============================================================================

#[test]
fn promise_of_forty_two() {
  let fulfilled = Arc::new(Mutex::new(None));
  let settled = Arc::new(Mutex::new(None));
  let (f, s) = (fulfilled.clone(), settled.clone());

  let promise = Promise::from_fn(|| 42);
  promise
    .on_fulfilled(move |v: &i32| *f.lock().unwrap() = Some(*v))
    .on_settled(move |v: Option<&i32>| *s.lock().unwrap() = Some(v.copied()));

  promise.run().unwrap();
  assert_eq!(promise.state(), State::Fulfilled);
  assert_eq!(*fulfilled.lock().unwrap(), Some(42));
  assert_eq!(*settled.lock().unwrap(), Some(Some(42)));
}

#[test]
fn promise_rejection_is_delivered_not_returned() {
  let rejected = Arc::new(Mutex::new(None));
  let settled = Arc::new(Mutex::new(None));
  let (r, s) = (rejected.clone(), settled.clone());

  let promise = Promise::<i32>::new(|| Err("supplier failed"));
  promise
    .on_rejected(move |e: &Error| *r.lock().unwrap() = Some(e.to_string()))
    .on_settled(move |v: Option<&i32>| *s.lock().unwrap() = Some(v.copied()));

  assert!(promise.run().is_ok());
  assert_eq!(promise.state(), State::Rejected);
  assert_eq!(rejected.lock().unwrap().as_deref(), Some("rejected: supplier failed"));
  assert_eq!(*settled.lock().unwrap(), Some(None));
}

#[test]
fn promise_runs_once() {
  let promise = Promise::from_fn(|| ());
  promise.run().unwrap();
  let err = promise.run().unwrap_err();
  assert!(err.is_invalid_state());
  assert_eq!(err.to_string(), "invalid state: can only run a promise in the CREATED state");
}

#[test]
fn throwing_consumer_is_isolated() {
  let informed = Arc::new(AtomicBool::new(false));
  let i = informed.clone();
  let promise = Promise::from_fn(|| "done");
  promise
    .on_fulfilled(|_: &&str| panic!("consumer failed"))
    .on_fulfilled(move |_: &&str| i.store(true, Ordering::SeqCst));

  promise.run().unwrap();
  assert!(informed.load(Ordering::SeqCst));
}

#[test]
fn racing_runs_settle_once() {
  const THREADS: usize = 16;
  let executions = Arc::new(AtomicUsize::new(0));
  let informed = Arc::new(AtomicUsize::new(0));
  let (e, i) = (executions.clone(), informed.clone());

  let promise = Arc::new(Promise::from_fn(move || e.fetch_add(1, Ordering::SeqCst)));
  promise.on_fulfilled(move |_: &usize| {
    i.fetch_add(1, Ordering::SeqCst);
  });

  let barrier = Arc::new(Barrier::new(THREADS));
  let winners: usize = (0..THREADS)
    .map(|_| {
      let (promise, barrier) = (promise.clone(), barrier.clone());
      thread::spawn(move || {
        barrier.wait();
        promise.run().is_ok()
      })
    })
    .collect::<Vec<_>>()
    .into_iter()
    .map(|handle| usize::from(handle.join().unwrap()))
    .sum();

  assert_eq!(winners, 1);
  assert_eq!(executions.load(Ordering::SeqCst), 1);
  assert_eq!(informed.load(Ordering::SeqCst), 1);
}

#[test]
fn consumers_added_while_running() {
  const ADDERS: usize = 4;
  const PER_ADDER: usize = 50;
  let informed = Arc::new(AtomicUsize::new(0));
  let promise = Arc::new(Promise::from_fn(|| 5usize));
  let barrier = Arc::new(Barrier::new(ADDERS + 1));

  let adders: Vec<_> = (0..ADDERS)
    .map(|_| {
      let (promise, barrier, informed) = (promise.clone(), barrier.clone(), informed.clone());
      thread::spawn(move || {
        barrier.wait();
        for _ in 0..PER_ADDER {
          let informed = informed.clone();
          promise.on_fulfilled(move |v: &usize| {
            informed.fetch_add(*v, Ordering::SeqCst);
          });
        }
      })
    })
    .collect();

  barrier.wait();
  promise.run().unwrap();
  for adder in adders {
    adder.join().unwrap();
  }

  // Each consumer is informed at most once; late ones never.
  assert_eq!(promise.state(), State::Fulfilled);
  let total = informed.load(Ordering::SeqCst);
  assert_eq!(total % 5, 0);
  assert!(total <= 5 * ADDERS * PER_ADDER);
}

// ============================================================================
// BroadcastObserver
// ============================================================================

#[test]
fn broadcast_is_quiet_after_completion() {
  let next = Arc::new(AtomicUsize::new(0));
  let completed = Arc::new(AtomicBool::new(false));
  let (n, c) = (next.clone(), completed.clone());

  let broadcast = BroadcastObserver::<bool>::new();
  broadcast
    .add_next_consumer(move |v: &bool| {
      if *v {
        n.fetch_add(1, Ordering::SeqCst);
      }
    })
    .add_completed_consumer(move |v: bool| c.store(v, Ordering::SeqCst));

  broadcast.inform_next(&true);
  assert_eq!(next.load(Ordering::SeqCst), 1);
  broadcast.inform_completed(true);
  assert!(completed.load(Ordering::SeqCst));

  broadcast.inform_next(&true);
  assert_eq!(next.load(Ordering::SeqCst), 1);
}

#[test]
fn broadcast_registers_and_informs_concurrently() {
  const THREADS: usize = 8;
  const ROUNDS: usize = 100;
  let hits = Arc::new(AtomicUsize::new(0));
  let broadcast = BroadcastObserver::<usize>::new();
  let barrier = Arc::new(Barrier::new(THREADS));

  let workers: Vec<_> = (0..THREADS)
    .map(|id| {
      let (broadcast, barrier, hits) = (broadcast.clone(), barrier.clone(), hits.clone());
      thread::spawn(move || {
        barrier.wait();
        for round in 0..ROUNDS {
          if id % 2 == 0 {
            let hits = hits.clone();
            broadcast.add_next_consumer(move |v: &usize| {
              hits.fetch_add(*v, Ordering::SeqCst);
            });
          } else {
            broadcast.inform_next(&round);
          }
        }
      })
    })
    .collect();
  for worker in workers {
    worker.join().unwrap();
  }

  // Every consumer registered by any thread is in place afterwards.
  let before = hits.load(Ordering::SeqCst);
  broadcast.inform_next(&1);
  assert_eq!(hits.load(Ordering::SeqCst) - before, THREADS / 2 * ROUNDS);
}

#[test]
fn observed_promise_feeds_broadcast() {
  let seen = Arc::new(Mutex::new(Vec::new()));
  let (on_next, on_error, on_done) = (seen.clone(), seen.clone(), seen.clone());

  let observer = BroadcastObserver::<u32>::new();
  observer
    .add_next_consumer(move |v: &u32| on_next.lock().unwrap().push(format!("next {v}")))
    .add_error_consumer(move |e: &Error| on_error.lock().unwrap().push(format!("error {e}")))
    .add_completed_consumer(move |ok: bool| on_done.lock().unwrap().push(format!("done {ok}")));

  let failing = ObservedPromise::new(|| "x".parse::<u32>(), observer.clone());
  failing.run().unwrap();
  assert_eq!(failing.state(), State::Rejected);

  let log = seen.lock().unwrap().clone();
  assert_eq!(log.len(), 2);
  assert!(log[0].starts_with("error rejected: "));
  assert_eq!(log[1], "done false");
  // Completion released the consumers of every clone.
  assert!(!observer.has_consumers());
}
