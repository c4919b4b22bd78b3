/// A value paired with the priority it is ordered by.<br/>
/// 優先度付きの値。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item<V> {
  pub value: V,
  pub priority: i64,
}

impl<V> Item<V> {
  pub fn new(value: V, priority: i64) -> Self {
    Self { value, priority }
  }

  pub fn value(&self) -> &V {
    &self.value
  }

  pub fn priority(&self) -> i64 {
    self.priority
  }

  pub fn into_value(self) -> V {
    self.value
  }

  pub fn into_parts(self) -> (V, i64) {
    (self.value, self.priority)
  }
}

impl<V> From<(V, i64)> for Item<V> {
  fn from((value, priority): (V, i64)) -> Self {
    Self::new(value, priority)
  }
}

/// Identifies one item held by a [`PriorityQueue`](super::PriorityQueue).
///
/// A handle stays valid until its item leaves the queue through `pop`, `remove`,
/// `clear` or `drain`. After that the queue rejects it, even if the underlying
/// slot has been reused by a newer item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemHandle {
  pub(super) slot: usize,
  pub(super) generation: u64,
}
