use std::collections::VecDeque;
use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::collections::element::Element;
use crate::collections::{QueueBase, QueueError, QueueReader, QueueRw, QueueSize, QueueWriter};

#[cfg(test)]
mod tests;

/// A first-in-first-out queue guarded by a single mutex.<br/>
/// 単一のミューテックスで保護された FIFO キュー。
///
/// Every operation takes the lock for its whole duration, so pushes and pops from
/// any number of threads are serialized. No operation waits for data: popping an
/// empty queue returns `None` immediately.
///
/// Cloning yields another handle to the same queue.
#[derive(Debug)]
pub struct FifoQueue<E> {
  inner: Arc<Mutex<VecDeque<E>>>,
}

impl<E> Clone for FifoQueue<E> {
  fn clone(&self) -> Self {
    Self {
      inner: self.inner.clone(),
    }
  }
}

impl<E> Default for FifoQueue<E> {
  fn default() -> Self {
    Self::new()
  }
}

impl<E> FifoQueue<E> {
  pub fn new() -> Self {
    Self::with_capacity(0)
  }

  /// Creates a queue whose buffer is pre-allocated for `capacity` elements.
  /// The queue still grows without bound.
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
    }
  }

  // Every critical section leaves the buffer consistent, so a poisoned lock is safe to reuse.
  fn lock(&self) -> MutexGuard<'_, VecDeque<E>> {
    self.inner.lock().unwrap_or_else(|poisoned| {
      tracing::debug!("FifoQueue::lock: recovering poisoned lock");
      poisoned.into_inner()
    })
  }

  /// Appends a value at the tail of the queue.<br/>
  /// 値をキューの末尾に追加します。
  pub fn push(&self, value: E) {
    let mut buffer = self.lock();
    buffer.push_back(value);
    tracing::trace!("FifoQueue::push: size = {}", buffer.len());
  }

  /// Removes and returns the oldest value, or `None` if the queue is empty.<br/>
  /// 最も古い値を取り出します。キューが空の場合は None を返します。
  pub fn pop(&self) -> Option<E> {
    let mut buffer = self.lock();
    if buffer.is_empty() {
      return None;
    }
    let value = buffer.pop_front();
    tracing::trace!("FifoQueue::pop: size = {}", buffer.len());
    value
  }

  /// Removes the oldest value and converts it into `T`.
  ///
  /// # Return Value / 戻り値
  /// - `Ok(Some(value))` - An element was available and converted. / 要素を取得し変換できた場合。
  /// - `Ok(None)` - The queue was empty. / キューが空の場合。
  /// - `Err(QueueError::ConversionError(_))` - An element was available but is not a `T`; it is consumed. / 要素は取得できたが変換に失敗した場合。
  pub fn pop_as<T>(&self) -> Result<Option<T>, QueueError<E>>
  where
    T: TryFrom<E>,
    T::Error: Display, {
    let Some(value) = self.pop() else {
      return Ok(None);
    };
    match T::try_from(value) {
      Ok(converted) => Ok(Some(converted)),
      Err(err) => {
        tracing::debug!("FifoQueue::pop_as: conversion failed: {}", err);
        Err(QueueError::ConversionError(err.to_string()))
      }
    }
  }

  pub fn is_empty(&self) -> bool {
    self.lock().is_empty()
  }

  pub fn size(&self) -> usize {
    self.lock().len()
  }

  pub fn clear(&self) {
    self.lock().clear();
  }

  /// Removes every value, oldest first, under a single lock acquisition.
  pub fn drain_all(&self) -> Vec<E> {
    self.lock().drain(..).collect()
  }
}

impl<E: Element> QueueBase<E> for FifoQueue<E> {
  fn len(&self) -> QueueSize {
    QueueSize::limited(self.size())
  }

  fn capacity(&self) -> QueueSize {
    QueueSize::limitless()
  }

  fn is_empty(&self) -> bool {
    FifoQueue::is_empty(self)
  }
}

impl<E: Element> QueueWriter<E> for FifoQueue<E> {
  fn offer_mut(&mut self, element: E) -> Result<(), QueueError<E>> {
    self.push(element);
    Ok(())
  }
}

impl<E: Element> QueueReader<E> for FifoQueue<E> {
  fn poll_mut(&mut self) -> Result<Option<E>, QueueError<E>> {
    Ok(self.pop())
  }

  fn clean_up_mut(&mut self) {
    self.clear();
  }
}

impl<E: Element> QueueRw<E> for FifoQueue<E> {
  fn offer(&self, element: E) -> Result<(), QueueError<E>> {
    self.push(element);
    Ok(())
  }

  fn poll(&self) -> Result<Option<E>, QueueError<E>> {
    Ok(self.pop())
  }

  fn clean_up(&self) {
    self.clear();
  }
}
