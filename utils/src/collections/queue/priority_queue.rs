use std::iter::FusedIterator;

use thiserror::Error;

mod item;

pub use self::item::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriorityQueueError {
  /// The handle does not refer to an item currently held by the queue.
  #[error("Stale item handle: {0:?}")]
  StaleHandle(ItemHandle),
}

#[derive(Debug, Clone)]
struct Entry<V> {
  item: Item<V>,
  slot: usize,
}

// Back-pointer from a handle to the item's position in `heap`.
#[derive(Debug, Clone)]
struct Slot {
  heap_index: Option<usize>,
  generation: u64,
}

/// A max-priority queue backed by an array-based binary heap.<br/>
/// 二分ヒープによる最大優先度キュー。
///
/// `push` returns an [`ItemHandle`] that can later be used to change the item's value
/// and priority in `O(log n)` with [`update`](Self::update), or to take it out with
/// [`remove`](Self::remove). Items with equal priority come out in no particular order.
///
/// The queue performs no synchronization of its own. All mutation goes through
/// `&mut self`; to share one queue between threads, wrap it in a lock.
#[derive(Debug, Clone)]
pub struct PriorityQueue<V> {
  heap: Vec<Entry<V>>,
  slots: Vec<Slot>,
  free_slots: Vec<usize>,
}

impl<V> Default for PriorityQueue<V> {
  fn default() -> Self {
    Self::new()
  }
}

impl<V> PriorityQueue<V> {
  pub fn new() -> Self {
    Self::with_capacity(0)
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      heap: Vec::with_capacity(capacity),
      slots: Vec::with_capacity(capacity),
      free_slots: Vec::new(),
    }
  }

  /// Builds a queue from an initial set of items in `O(n)`.<br/>
  /// 初期要素から `O(n)` でキューを構築します。
  ///
  /// The returned handles are in the same order as `items`.
  pub fn from_items<I>(items: I) -> (Self, Vec<ItemHandle>)
  where
    I: IntoIterator,
    I::Item: Into<Item<V>>, {
    let iter = items.into_iter();
    let mut queue = Self::with_capacity(iter.size_hint().0);
    let handles = iter
      .map(|item| {
        let position = queue.heap.len();
        let handle = queue.allocate_slot(position);
        queue.heap.push(Entry {
          item: item.into(),
          slot: handle.slot,
        });
        handle
      })
      .collect();
    queue.heapify();
    (queue, handles)
  }

  pub fn len(&self) -> usize {
    self.heap.len()
  }

  pub fn is_empty(&self) -> bool {
    self.heap.is_empty()
  }

  pub fn push(&mut self, value: V, priority: i64) -> ItemHandle {
    self.push_item(Item::new(value, priority))
  }

  /// Inserts an item and sifts it up to its place.<br/>
  /// 要素を挿入し、ヒープ条件を満たす位置まで移動します。
  pub fn push_item(&mut self, item: Item<V>) -> ItemHandle {
    let position = self.heap.len();
    let handle = self.allocate_slot(position);
    tracing::trace!("PriorityQueue::push: priority = {}, len = {}", item.priority, position + 1);
    self.heap.push(Entry {
      item,
      slot: handle.slot,
    });
    self.sift_up(position);
    handle
  }

  /// Removes and returns the item with the highest priority.<br/>
  /// 最大優先度の要素を取り出します。
  ///
  /// Returns `None` if the queue is empty.
  pub fn pop(&mut self) -> Option<Item<V>> {
    if self.heap.is_empty() {
      return None;
    }
    let item = self.take_at(0);
    tracing::trace!("PriorityQueue::pop: priority = {}, len = {}", item.priority, self.heap.len());
    Some(item)
  }

  pub fn peek(&self) -> Option<&Item<V>> {
    self.heap.first().map(|entry| &entry.item)
  }

  pub fn get(&self, handle: ItemHandle) -> Option<&Item<V>> {
    self.position_of(handle).map(|position| &self.heap[position].item)
  }

  pub fn contains(&self, handle: ItemHandle) -> bool {
    self.position_of(handle).is_some()
  }

  /// Replaces the value and priority of a held item and restores heap order.<br/>
  /// 要素の値と優先度を更新し、ヒープ条件を回復します。
  ///
  /// # Return Value / 戻り値
  /// - `Ok(())` - The item was updated. / 更新に成功した場合。
  /// - `Err(PriorityQueueError::StaleHandle(_))` - The item is no longer in the queue; nothing changes. / 要素がキューに存在しない場合。
  pub fn update(&mut self, handle: ItemHandle, value: V, priority: i64) -> Result<(), PriorityQueueError> {
    let position = self.checked_position(handle)?;
    tracing::debug!(
      "PriorityQueue::update: position = {}, priority = {} -> {}",
      position,
      self.heap[position].item.priority,
      priority
    );
    let item = &mut self.heap[position].item;
    item.value = value;
    item.priority = priority;
    self.fix(position);
    Ok(())
  }

  /// Changes only the priority of a held item.
  pub fn update_priority(&mut self, handle: ItemHandle, priority: i64) -> Result<(), PriorityQueueError> {
    let position = self.checked_position(handle)?;
    self.heap[position].item.priority = priority;
    self.fix(position);
    Ok(())
  }

  /// Removes an arbitrary held item.
  pub fn remove(&mut self, handle: ItemHandle) -> Result<Item<V>, PriorityQueueError> {
    let position = self.checked_position(handle)?;
    tracing::debug!("PriorityQueue::remove: position = {}", position);
    Ok(self.take_at(position))
  }

  /// Removes every item. All outstanding handles become stale.
  pub fn clear(&mut self) {
    while let Some(entry) = self.heap.pop() {
      self.release_slot(entry.slot);
    }
  }

  /// Iterates over the held items in heap order, which is not sorted.
  pub fn iter(&self) -> impl Iterator<Item = &Item<V>> + '_ {
    self.heap.iter().map(|entry| &entry.item)
  }

  /// Removes items in extraction order, highest priority first.
  /// Items left unconsumed when the iterator is dropped are discarded.
  pub fn drain(&mut self) -> Drain<'_, V> {
    Drain { queue: self }
  }

  /// Consumes the queue and returns its items by non-increasing priority.
  pub fn into_sorted_vec(mut self) -> Vec<Item<V>> {
    let mut sorted = Vec::with_capacity(self.len());
    while let Some(item) = self.pop() {
      sorted.push(item);
    }
    sorted
  }

  fn position_of(&self, handle: ItemHandle) -> Option<usize> {
    self
      .slots
      .get(handle.slot)
      .filter(|slot| slot.generation == handle.generation)
      .and_then(|slot| slot.heap_index)
  }

  fn checked_position(&self, handle: ItemHandle) -> Result<usize, PriorityQueueError> {
    self.position_of(handle).ok_or_else(|| {
      tracing::debug!("PriorityQueue: stale handle {:?}", handle);
      PriorityQueueError::StaleHandle(handle)
    })
  }

  fn allocate_slot(&mut self, heap_index: usize) -> ItemHandle {
    match self.free_slots.pop() {
      Some(slot) => {
        let state = &mut self.slots[slot];
        state.heap_index = Some(heap_index);
        ItemHandle {
          slot,
          generation: state.generation,
        }
      }
      None => {
        self.slots.push(Slot {
          heap_index: Some(heap_index),
          generation: 0,
        });
        ItemHandle {
          slot: self.slots.len() - 1,
          generation: 0,
        }
      }
    }
  }

  fn release_slot(&mut self, slot: usize) {
    let state = &mut self.slots[slot];
    state.heap_index = None;
    state.generation = state.generation.wrapping_add(1);
    self.free_slots.push(slot);
  }

  // `position` must be in bounds.
  fn take_at(&mut self, position: usize) -> Item<V> {
    let last = self.heap.len() - 1;
    if position != last {
      self.swap(position, last);
    }
    let entry = self.heap.swap_remove(last);
    self.release_slot(entry.slot);
    if position < self.heap.len() {
      self.fix(position);
    }
    entry.item
  }

  fn heapify(&mut self) {
    tracing::debug!("PriorityQueue::heapify: len = {}", self.heap.len());
    for position in (0..self.heap.len() / 2).rev() {
      self.sift_down(position);
    }
  }

  fn higher(&self, a: usize, b: usize) -> bool {
    self.heap[a].item.priority > self.heap[b].item.priority
  }

  fn swap(&mut self, a: usize, b: usize) {
    self.heap.swap(a, b);
    self.slots[self.heap[a].slot].heap_index = Some(a);
    self.slots[self.heap[b].slot].heap_index = Some(b);
  }

  fn fix(&mut self, position: usize) {
    if !self.sift_down(position) {
      self.sift_up(position);
    }
  }

  fn sift_up(&mut self, mut position: usize) {
    while position > 0 {
      let parent = (position - 1) / 2;
      if !self.higher(position, parent) {
        break;
      }
      self.swap(position, parent);
      position = parent;
    }
  }

  // Returns whether the entry moved.
  fn sift_down(&mut self, start: usize) -> bool {
    let len = self.heap.len();
    let mut position = start;
    loop {
      let left = 2 * position + 1;
      if left >= len {
        break;
      }
      let right = left + 1;
      let child = if right < len && self.higher(right, left) { right } else { left };
      if !self.higher(child, position) {
        break;
      }
      self.swap(position, child);
      position = child;
    }
    position > start
  }
}

impl<V> FromIterator<Item<V>> for PriorityQueue<V> {
  fn from_iter<I: IntoIterator<Item = Item<V>>>(iter: I) -> Self {
    Self::from_items(iter).0
  }
}

impl<V> FromIterator<(V, i64)> for PriorityQueue<V> {
  fn from_iter<I: IntoIterator<Item = (V, i64)>>(iter: I) -> Self {
    Self::from_items(iter).0
  }
}

/// Draining iterator returned by [`PriorityQueue::drain`].
#[derive(Debug)]
pub struct Drain<'a, V> {
  queue: &'a mut PriorityQueue<V>,
}

impl<V> Iterator for Drain<'_, V> {
  type Item = Item<V>;

  fn next(&mut self) -> Option<Self::Item> {
    self.queue.pop()
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    let len = self.queue.len();
    (len, Some(len))
  }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}

impl<V> FusedIterator for Drain<'_, V> {}

impl<V> Drop for Drain<'_, V> {
  fn drop(&mut self) {
    self.queue.clear();
  }
}
