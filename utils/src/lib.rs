//! Generic container utilities: an indexed binary max-heap priority queue and a
//! mutex-guarded FIFO queue.

pub mod collections;

pub use collections::{
  Element, FifoQueue, Item, ItemHandle, PriorityQueue, PriorityQueueError, QueueBase, QueueError, QueueReader,
  QueueRw, QueueSize, QueueWriter,
};
