// src/acquisition/sliding_window.rs
//! Bounded, arrival-ordered window of recent items

use std::collections::VecDeque;
use thiserror::Error;

/// Sliding window error types
#[derive(Debug, PartialEq, Error)]
pub enum WindowError {
    #[error("Invalid window capacity (must be greater than zero)")]
    InvalidCapacity,
}

/// Fixed-capacity FIFO that evicts its oldest item on overflow.
///
/// Items are stored by value and never handed out mutably, so once pushed
/// they stay exactly as appended until evicted.
#[derive(Debug, Clone)]
pub struct SlidingWindow<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> SlidingWindow<T> {
    /// Create a window holding at most `capacity` items
    pub fn new(capacity: usize) -> Result<Self, WindowError> {
        if capacity == 0 {
            return Err(WindowError::InvalidCapacity);
        }

        Ok(Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Append an item, returning the evicted oldest item if the window was full
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.len() == self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    /// Most recently appended item
    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }

    /// Oldest retained item
    pub fn oldest(&self) -> Option<&T> {
        self.items.front()
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Fraction of the capacity in use (0.0 to 1.0)
    pub fn utilization(&self) -> f64 {
        self.items.len() as f64 / self.capacity as f64
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: Clone> SlidingWindow<T> {
    /// Copy of the retained items, oldest first
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}
