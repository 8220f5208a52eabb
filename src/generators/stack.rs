use crate::maze::Position;

/// Fixed-capacity LIFO of packed positions backed by a circular buffer.
///
/// `push` never fails: once the write index wraps, the oldest slot is
/// overwritten while `len` keeps counting past `capacity`. A stack in that
/// state can no longer be trusted to retrace its path, which callers detect
/// through [`BoundedStack::is_overflowed`].
#[derive(Debug, Clone)]
pub struct BoundedStack {
    slots: Box<[u32]>,
    /// Slot the next push writes to.
    index: usize,
    /// Live count. May exceed `slots.len()`.
    len: usize,
    peak: usize,
}

impl BoundedStack {
    /// # Panics
    /// If `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "stack capacity must be non-zero");
        BoundedStack {
            slots: vec![0; capacity].into_boxed_slice(),
            index: 0,
            len: 0,
            peak: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Largest `len` seen since the last reset.
    pub fn peak(&self) -> usize {
        self.peak
    }

    pub fn is_overflowed(&self) -> bool {
        self.len > self.slots.len()
    }

    pub fn reset(&mut self) {
        self.slots.fill(0);
        self.index = 0;
        self.len = 0;
        self.peak = 0;
    }

    pub fn push(&mut self, pos: Position) {
        self.slots[self.index] = pos.pack();
        self.index = (self.index + 1) % self.slots.len();
        self.len += 1;
        self.peak = self.peak.max(self.len);
        tracing::trace!("[stack] push {:?}, len {}", pos, self.len);
    }

    /// Pops the most recent position, or `None` if the stack is empty.
    pub fn pop(&mut self) -> Option<Position> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        self.index = match self.index {
            0 => self.slots.len() - 1,
            i => i - 1,
        };
        let pos = Position::unpack(self.slots[self.index]);
        tracing::trace!("[stack] pop {:?}, len {}", pos, self.len);
        Some(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifo_order() {
        let mut stack = BoundedStack::new(4);
        stack.push(Position::new(1, 1));
        stack.push(Position::new(3, 1));
        stack.push(Position::new(3, 3));
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.pop(), Some(Position::new(3, 3)));
        assert_eq!(stack.pop(), Some(Position::new(3, 1)));
        assert_eq!(stack.pop(), Some(Position::new(1, 1)));
        assert!(stack.is_empty());
        assert_eq!(stack.peak(), 3);
    }

    #[test]
    fn test_pop_empty_is_none() {
        let mut stack = BoundedStack::new(2);
        assert_eq!(stack.pop(), None);
        stack.push(Position::new(5, 5));
        assert_eq!(stack.pop(), Some(Position::new(5, 5)));
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.len(), 0);
    }

    #[test]
    fn test_fill_to_capacity_is_not_overflow() {
        let mut stack = BoundedStack::new(3);
        for x in 0..3 {
            stack.push(Position::new(x, 0));
        }
        assert!(!stack.is_overflowed());
        // The write index has wrapped; popping still walks back correctly
        for x in (0..3).rev() {
            assert_eq!(stack.pop(), Some(Position::new(x, 0)));
        }
    }

    #[test]
    fn test_overflow_wraps_and_aliases() {
        let mut stack = BoundedStack::new(2);
        stack.push(Position::new(1, 0));
        stack.push(Position::new(2, 0));
        stack.push(Position::new(3, 0));
        assert!(stack.is_overflowed());
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.pop(), Some(Position::new(3, 0)));
        assert_eq!(stack.pop(), Some(Position::new(2, 0)));
        // The oldest entry was overwritten by the third push
        assert_eq!(stack.pop(), Some(Position::new(3, 0)));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_reset() {
        let mut stack = BoundedStack::new(2);
        stack.push(Position::new(1, 1));
        stack.push(Position::new(1, 1));
        stack.push(Position::new(1, 1));
        stack.reset();
        assert!(stack.is_empty());
        assert!(!stack.is_overflowed());
        assert_eq!(stack.peak(), 0);
        assert_eq!(stack.capacity(), 2);
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn test_zero_capacity_panics() {
        BoundedStack::new(0);
    }
}
