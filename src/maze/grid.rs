use std::fmt;
use std::sync::mpsc::Sender;

use super::cell::Cell;

/// A change to the grid, emitted to a [`GridEventSink`] so rendering can follow
/// mutation without the grid knowing about any display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEvent {
    /// Every cell was reset to uncarved.
    Cleared { width: u16, height: u16 },
    /// A single cell changed state.
    Update { coord: (u16, u16), cell: Cell },
}

/// Receiver of grid events. The renderer is injected through this trait.
pub trait GridEventSink {
    fn send_event(&mut self, event: GridEvent);
}

/// Discards every event, for headless generation.
impl GridEventSink for () {
    fn send_event(&mut self, _event: GridEvent) {}
}

impl GridEventSink for Sender<GridEvent> {
    fn send_event(&mut self, event: GridEvent) {
        // A dropped receiver just means nobody is watching anymore
        let _ = self.send(event);
    }
}

impl<S: GridEventSink + ?Sized> GridEventSink for &mut S {
    fn send_event(&mut self, event: GridEvent) {
        (**self).send_event(event);
    }
}

/// Packed boolean matrix of carved cells.
///
/// Each row is stored as `words_per_row` 32-bit words. Cell `x` lives in word
/// `x / 32` at bit `31 - x % 32`, so the leftmost cell of a word is its most
/// significant bit. Bits of the last word beyond `width` are padding and are
/// always zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitGrid {
    words: Box<[u32]>,
    width: u16,
    height: u16,
    words_per_row: usize,
}

impl BitGrid {
    pub const WORD_BITS: u16 = u32::BITS as u16;

    pub fn new(width: u16, height: u16) -> Self {
        let words_per_row = (width as usize).div_ceil(Self::WORD_BITS as usize);
        BitGrid {
            words: vec![0; words_per_row * height as usize].into_boxed_slice(),
            width,
            height,
            words_per_row,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn words_per_row(&self) -> usize {
        self.words_per_row
    }

    pub fn is_in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    /// Returns the word holding `(x, y)` and the mask selecting its bit.
    ///
    /// # Panics
    /// If `(x, y)` is outside the grid.
    fn locate(&self, x: u16, y: u16) -> (usize, u32) {
        assert!(
            self.is_in_bounds(x, y),
            "cell ({}, {}) is outside the {}x{} grid",
            x,
            y,
            self.width,
            self.height
        );
        let word = y as usize * self.words_per_row + (x / Self::WORD_BITS) as usize;
        let mask = 0x8000_0000u32 >> (x % Self::WORD_BITS);
        (word, mask)
    }

    pub fn is_carved(&self, x: u16, y: u16) -> bool {
        let (word, mask) = self.locate(x, y);
        self.words[word] & mask != 0
    }

    pub fn cell(&self, x: u16, y: u16) -> Cell {
        Cell::from(self.is_carved(x, y))
    }

    /// Sets a cell and returns whether its state changed.
    pub fn set_carved(&mut self, x: u16, y: u16, carved: bool) -> bool {
        let (word, mask) = self.locate(x, y);
        let old = self.words[word];
        if carved {
            self.words[word] |= mask;
        } else {
            self.words[word] &= !mask;
        }
        old != self.words[word]
    }

    /// Resets every cell, padding bits included.
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Raw words of row `y`, leftmost word first.
    pub fn row_words(&self, y: u16) -> &[u32] {
        let start = y as usize * self.words_per_row;
        &self.words[start..start + self.words_per_row]
    }

    /// Number of meaningful bits in word `col` of any row.
    pub fn valid_bits(&self, col: usize) -> u16 {
        let first = col * Self::WORD_BITS as usize;
        (self.width as usize - first).min(Self::WORD_BITS as usize) as u16
    }

    pub fn carved_count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Whether any padding bit past the right edge is set.
    pub fn has_dirty_padding(&self) -> bool {
        let last = self.words_per_row - 1;
        let valid = self.valid_bits(last);
        if valid == Self::WORD_BITS {
            return false;
        }
        let pad_mask = u32::MAX >> valid;
        (0..self.height).any(|y| self.row_words(y)[last] & pad_mask != 0)
    }
}

impl fmt::Display for BitGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                write!(f, "{}", self.cell(x, y))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_query() {
        let mut grid = BitGrid::new(40, 3);
        assert!(!grid.is_carved(33, 1));
        assert!(grid.set_carved(33, 1, true));
        assert!(grid.is_carved(33, 1));
        // Setting the same value again is not a change
        assert!(!grid.set_carved(33, 1, true));
        assert!(grid.set_carved(33, 1, false));
        assert!(!grid.is_carved(33, 1));
    }

    #[test]
    fn test_bit_layout_is_msb_first() {
        let mut grid = BitGrid::new(40, 2);
        grid.set_carved(0, 1, true);
        grid.set_carved(33, 1, true);
        assert_eq!(grid.row_words(1), &[0x8000_0000, 0x4000_0000]);
        assert_eq!(grid.row_words(0), &[0, 0]);
    }

    #[test]
    fn test_row_packing_and_padding() {
        let grid = BitGrid::new(240, 160);
        assert_eq!(grid.words_per_row(), 8);
        assert_eq!(grid.valid_bits(0), 32);
        assert_eq!(grid.valid_bits(7), 16);

        let exact = BitGrid::new(64, 1);
        assert_eq!(exact.words_per_row(), 2);
        assert_eq!(exact.valid_bits(1), 32);
        assert!(!exact.has_dirty_padding());
    }

    #[test]
    fn test_padding_stays_clear() {
        let mut grid = BitGrid::new(240, 4);
        for x in 0..240 {
            grid.set_carved(x, 3, true);
        }
        assert_eq!(grid.row_words(3)[7], 0xffff_0000);
        assert!(!grid.has_dirty_padding());
        assert_eq!(grid.carved_count(), 240);
    }

    #[test]
    fn test_clear() {
        let mut grid = BitGrid::new(10, 10);
        grid.set_carved(9, 9, true);
        grid.set_carved(0, 0, true);
        grid.clear();
        assert_eq!(grid.carved_count(), 0);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_out_of_bounds_panics() {
        let grid = BitGrid::new(8, 8);
        grid.is_carved(8, 0);
    }

    #[test]
    fn test_display() {
        let mut grid = BitGrid::new(3, 2);
        grid.set_carved(1, 0, true);
        grid.set_carved(2, 1, true);
        assert_eq!(grid.to_string(), ".#.\n..#\n");
    }

    #[test]
    fn test_channel_sink() {
        let (tx, rx) = std::sync::mpsc::channel();
        let mut sink = tx;
        sink.send_event(GridEvent::Cleared {
            width: 4,
            height: 4,
        });
        drop(sink);
        assert_eq!(
            rx.iter().collect::<Vec<_>>(),
            vec![GridEvent::Cleared {
                width: 4,
                height: 4
            }]
        );
    }
}
