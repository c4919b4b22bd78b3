use std::collections::HashSet;
use std::env;
use std::fmt::{Display, Formatter};

use rstest::*;
use tracing_subscriber::EnvFilter;

use crate::collections::{FifoQueue, QueueBase, QueueError, QueueReader, QueueRw, QueueSize, QueueWriter};

fn init_tracing() {
  env::set_var("RUST_LOG", "debug");
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .try_init();
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
  Int(i64),
  Bool(bool),
  Text(String),
}

#[derive(Debug)]
struct Mismatch(&'static str, Value);

impl Display for Mismatch {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "expected {}, got {:?}", self.0, self.1)
  }
}

impl TryFrom<Value> for i64 {
  type Error = Mismatch;

  fn try_from(value: Value) -> Result<Self, Self::Error> {
    match value {
      Value::Int(v) => Ok(v),
      Value::Text(ref s) => s.parse().map_err(|_| Mismatch("int", value.clone())),
      other => Err(Mismatch("int", other)),
    }
  }
}

impl TryFrom<Value> for bool {
  type Error = Mismatch;

  fn try_from(value: Value) -> Result<Self, Self::Error> {
    match value {
      Value::Bool(v) => Ok(v),
      other => Err(Mismatch("bool", other)),
    }
  }
}

#[test]
fn test_new_queue_is_empty() {
  let queue = FifoQueue::<i32>::new();
  assert!(queue.is_empty());
  assert_eq!(queue.size(), 0);
  assert_eq!(queue.len(), QueueSize::Limited(0));
  assert_eq!(queue.capacity(), QueueSize::Limitless);
}

#[test]
fn test_push_pop_preserves_insertion_order() {
  init_tracing();
  let queue = FifoQueue::new();
  queue.push("x");
  queue.push("y");
  queue.push("z");
  assert_eq!(queue.size(), 3);

  assert_eq!(queue.pop(), Some("x"));
  assert_eq!(queue.pop(), Some("y"));
  assert_eq!(queue.pop(), Some("z"));
  assert!(queue.is_empty());
}

#[test]
fn test_pop_on_empty_does_not_change_size() {
  let queue = FifoQueue::<i32>::new();
  assert_eq!(queue.pop(), None);
  assert_eq!(queue.size(), 0);

  queue.push(1);
  assert_eq!(queue.pop(), Some(1));
  assert_eq!(queue.pop(), None);
  assert_eq!(queue.size(), 0);
  assert!(queue.is_empty());
}

#[rstest]
#[case(1)]
#[case(16)]
#[case(10000)]
fn test_fifo_order_for_many_values(#[case] count: usize) {
  let queue = FifoQueue::with_capacity(4);
  for i in 0..count {
    queue.push(i);
  }
  assert_eq!(queue.size(), count);
  for i in 0..count {
    assert_eq!(queue.pop(), Some(i));
  }
  assert_eq!(queue.pop(), None);
}

#[test]
fn test_interleaved_push_and_pop() {
  let queue = FifoQueue::new();
  queue.push(1);
  queue.push(2);
  assert_eq!(queue.pop(), Some(1));
  queue.push(3);
  assert_eq!(queue.pop(), Some(2));
  assert_eq!(queue.pop(), Some(3));
  assert_eq!(queue.pop(), None);
}

#[test]
fn test_clones_share_state() {
  let queue = FifoQueue::new();
  let cloned = queue.clone();
  queue.push(10);
  cloned.push(11);

  assert_eq!(queue.size(), 2);
  assert_eq!(cloned.pop(), Some(10));
  assert_eq!(queue.pop(), Some(11));
}

#[test]
fn test_clear_and_drain_all() {
  let queue = FifoQueue::new();
  for i in 0..5 {
    queue.push(i);
  }
  assert_eq!(queue.drain_all(), vec![0, 1, 2, 3, 4]);
  assert!(queue.is_empty());

  queue.push(9);
  queue.clear();
  assert_eq!(queue.pop(), None);
}

#[test]
fn test_pop_as_distinguishes_empty_from_mismatch() {
  init_tracing();
  let queue = FifoQueue::new();
  assert_eq!(queue.pop_as::<i64>(), Ok(None));

  queue.push(Value::Int(42));
  queue.push(Value::Text("17".to_string()));
  queue.push(Value::Bool(true));
  queue.push(Value::Text("yes".to_string()));

  assert_eq!(queue.pop_as::<i64>(), Ok(Some(42)));
  assert_eq!(queue.pop_as::<i64>(), Ok(Some(17)));
  assert_eq!(queue.pop_as::<bool>(), Ok(Some(true)));

  match queue.pop_as::<bool>() {
    Err(QueueError::ConversionError(msg)) => assert!(msg.contains("expected bool")),
    other => panic!("Expected ConversionError, got {:?}", other),
  }
  // the mismatched element is consumed
  assert_eq!(queue.size(), 0);
  assert_eq!(queue.pop_as::<bool>(), Ok(None));
}

#[test]
fn test_queue_traits() {
  let mut queue = FifoQueue::<i32>::new();
  queue.offer_all_mut(vec![1, 2, 3]).unwrap();
  assert_eq!(queue.len(), QueueSize::Limited(3));
  assert!(queue.non_empty());

  assert_eq!(queue.poll_mut().unwrap(), Some(1));
  queue.offer(4).unwrap();
  assert_eq!(queue.poll().unwrap(), Some(2));

  queue.clean_up_mut();
  assert!(QueueBase::is_empty(&queue));

  queue.offer_mut(5).unwrap();
  queue.clean_up();
  assert_eq!(queue.poll().unwrap(), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_pushes() {
  init_tracing();
  const PRODUCERS: usize = 8;
  const PER_PRODUCER: usize = 500;

  let queue = FifoQueue::new();
  let mut handles = vec![];
  for p in 0..PRODUCERS {
    let q = queue.clone();
    handles.push(tokio::spawn(async move {
      for i in 0..PER_PRODUCER {
        q.push(p * PER_PRODUCER + i);
      }
    }));
  }
  for handle in handles {
    handle.await.unwrap();
  }

  assert_eq!(queue.size(), PRODUCERS * PER_PRODUCER);

  let mut seen = HashSet::new();
  while let Some(value) = queue.pop() {
    assert!(seen.insert(value), "duplicate value {}", value);
  }
  assert_eq!(seen.len(), PRODUCERS * PER_PRODUCER);
  assert!(queue.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_producers_and_consumers() {
  const PRODUCERS: usize = 4;
  const CONSUMERS: usize = 4;
  const PER_PRODUCER: usize = 250;

  let queue = FifoQueue::new();
  let mut producers = vec![];
  for p in 0..PRODUCERS {
    let q = queue.clone();
    producers.push(tokio::spawn(async move {
      for i in 0..PER_PRODUCER {
        q.push((p, i));
        tokio::task::yield_now().await;
      }
    }));
  }

  let mut consumers = vec![];
  for _ in 0..CONSUMERS {
    let q = queue.clone();
    consumers.push(tokio::spawn(async move {
      let mut taken = vec![];
      while taken.len() < PER_PRODUCER {
        match q.pop() {
          Some(item) => taken.push(item),
          None => tokio::task::yield_now().await,
        }
      }
      taken
    }));
  }

  for handle in producers {
    handle.await.unwrap();
  }
  let mut all = HashSet::new();
  for handle in consumers {
    let taken = handle.await.unwrap();
    // each consumer sees any single producer's values in push order
    for p in 0..PRODUCERS {
      let from_p: Vec<usize> = taken.iter().filter(|(q, _)| *q == p).map(|(_, i)| *i).collect();
      assert!(from_p.windows(2).all(|w| w[0] < w[1]));
    }
    all.extend(taken);
  }

  assert_eq!(all.len(), PRODUCERS * PER_PRODUCER);
  assert!(queue.is_empty());
}
