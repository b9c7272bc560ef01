/// Home-row columns holding a lily pad. The outermost columns stay water.
pub const PAD_COLS: [i32; 5] = [2, 4, 6, 8, 10];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pads {
    filled: [bool; PAD_COLS.len()],
}

impl Pads {
    fn index_of(col: i32) -> Option<usize> {
        PAD_COLS.iter().position(|&pad| pad == col)
    }

    pub fn is_pad(col: i32) -> bool {
        Self::index_of(col).is_some()
    }

    pub fn is_free(&self, col: i32) -> bool {
        Self::index_of(col).is_some_and(|index| !self.filled[index])
    }

    /// Marks the pad at `col` as taken. Returns false when `col` is not a free
    /// pad.
    pub fn fill(&mut self, col: i32) -> bool {
        match Self::index_of(col) {
            Some(index) if !self.filled[index] => {
                self.filled[index] = true;
                true
            }
            _ => false,
        }
    }

    pub fn filled_count(&self) -> usize {
        self.filled.iter().filter(|&&taken| taken).count()
    }

    pub fn all_filled(&self) -> bool {
        self.filled.iter().all(|&taken| taken)
    }

    pub fn occupied_cols(&self) -> impl Iterator<Item = i32> + '_ {
        PAD_COLS
            .iter()
            .zip(self.filled.iter())
            .filter(|(_, &taken)| taken)
            .map(|(&col, _)| col)
    }

    pub fn reset(&mut self) {
        self.filled = [false; PAD_COLS.len()];
    }
}
