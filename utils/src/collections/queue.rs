use std::fmt::Debug;

use thiserror::Error;

mod fifo_queue;
mod priority_queue;

pub use self::{fifo_queue::*, priority_queue::*};

/// An error that occurs when a queue operation fails.<br/>
/// キューの操作に失敗した場合に発生するエラー。
///
/// Polling an empty queue is not an error; readers report it as `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError<E> {
  /// The element could not be inserted. The rejected element is handed back.
  #[error("Failed to offer an element: {0:?}")]
  OfferError(E),
  /// An element was dequeued but could not be converted into the requested type.
  #[error("Failed to convert an element: {0}")]
  ConversionError(String),
}

/// The size of the queue.<br/>
/// キューのサイズ。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueSize {
  /// The queue has no capacity limit.<br/>
  /// キューに容量制限がない。
  Limitless,
  /// The queue holds (or can hold) the given number of elements.<br/>
  /// キューに容量制限がある。
  Limited(usize),
}

impl QueueSize {
  pub const fn limitless() -> Self {
    Self::Limitless
  }

  pub const fn limited(value: usize) -> Self {
    Self::Limited(value)
  }

  /// Returns whether the queue has no capacity limit.<br/>
  /// キューに容量制限がないかどうかを返します。
  pub const fn is_limitless(&self) -> bool {
    matches!(self, Self::Limitless)
  }

  /// Converts to a usize type. `Limitless` maps to `usize::MAX`.<br/>
  /// usize型に変換します。
  pub const fn to_usize(self) -> usize {
    match self {
      Self::Limitless => usize::MAX,
      Self::Limited(value) => value,
    }
  }
}

impl Default for QueueSize {
  fn default() -> Self {
    QueueSize::limited(0)
  }
}

/// A trait that defines the size-observing behavior of a queue.<br/>
/// キューの振る舞いを定義するトレイト。
pub trait QueueBase<E>: Debug {
  /// Returns the number of elements currently held.
  fn len(&self) -> QueueSize;

  /// Returns the capacity of this queue. `QueueSize::Limitless` for unbounded queues.
  fn capacity(&self) -> QueueSize;

  /// Returns whether this queue is empty.<br/>
  /// このキューが空かどうかを返します。
  fn is_empty(&self) -> bool {
    self.len() == QueueSize::Limited(0)
  }

  /// Returns whether this queue is non-empty.<br/>
  /// このキューが空でないかどうかを返します。
  fn non_empty(&self) -> bool {
    !self.is_empty()
  }
}

/// Write access through a mutable reference.
pub trait QueueWriter<E>: QueueBase<E> {
  /// Inserts the specified element into this queue.<br/>
  /// 指定された要素をこのキューに挿入します。
  ///
  /// # Return Value / 戻り値
  /// - `Ok(())` - If the element is inserted successfully. / 要素が正常に挿入された場合。
  /// - `Err(QueueError::OfferError(element))` - If the element cannot be inserted. / 要素を挿入できなかった場合。
  fn offer_mut(&mut self, element: E) -> Result<(), QueueError<E>>;

  /// Inserts every element in order, stopping at the first failure.
  fn offer_all_mut(&mut self, elements: Vec<E>) -> Result<(), QueueError<E>> {
    for e in elements {
      self.offer_mut(e)?;
    }
    Ok(())
  }
}

/// Read access through a mutable reference.
pub trait QueueReader<E>: QueueBase<E> {
  /// Retrieves and deletes the head of the queue. Returns None if the queue is empty.<br/>
  /// キューの先頭を取得および削除します。キューが空の場合は None を返します。
  fn poll_mut(&mut self) -> Result<Option<E>, QueueError<E>>;

  /// Discards every element.
  fn clean_up_mut(&mut self);
}

/// Read/write access through a shared reference. Implementors synchronize internally.
pub trait QueueRw<E>: QueueBase<E> {
  fn offer(&self, element: E) -> Result<(), QueueError<E>>;

  fn poll(&self) -> Result<Option<E>, QueueError<E>>;

  fn clean_up(&self);
}
