use std::collections::VecDeque;

use crate::{sequence_less_than, TransitionIndex};

/// Reorder buffer keyed by wrap-safe transition index.
pub(crate) struct OrderedIds<P> {
    // front small, back big
    inner: VecDeque<(TransitionIndex, P)>,
}

impl<P> OrderedIds<P> {
    pub(crate) fn new() -> Self {
        Self {
            inner: VecDeque::new(),
        }
    }

    /// Inserts in index order, scanning from the back since arrivals are
    /// mostly in order. Returns `false` for a duplicate index.
    pub(crate) fn insert(&mut self, index: TransitionIndex, item: P) -> bool {
        let mut current = self.inner.len();

        loop {
            if current == 0 {
                self.inner.push_front((index, item));
                return true;
            }

            current -= 1;

            let Some((old_index, _)) = self.inner.get(current) else {
                return false;
            };
            if *old_index == index {
                return false;
            }
            if sequence_less_than(*old_index, index) {
                self.inner.insert(current + 1, (index, item));
                return true;
            }
        }
    }

    pub(crate) fn peek_front_index(&self) -> Option<TransitionIndex> {
        self.inner.front().map(|(index, _)| *index)
    }

    pub(crate) fn pop_front(&mut self) -> Option<(TransitionIndex, P)> {
        self.inner.pop_front()
    }

    /// Drops every entry strictly older than `index`.
    pub(crate) fn pop_front_until_and_excluding(&mut self, index: TransitionIndex) {
        while let Some(front) = self.peek_front_index() {
            if !sequence_less_than(front, index) {
                return;
            }
            self.inner.pop_front();
        }
    }

    pub(crate) fn clear(&mut self) {
        self.inner.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.len()
    }
}
