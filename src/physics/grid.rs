use serde::Serialize;

/// Row-major 2-D field over the puck: `rows` along z (inlet → exit),
/// `cols` along r (axis → wall). Cell (z, r) lives at `z * cols + r`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }
}

impl<T> Grid<T> {
    /// Build a grid by evaluating `f(z, r)` in row-major order
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for z in 0..rows {
            for r in 0..cols {
                data.push(f(z, r));
            }
        }
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn offset(&self, z: usize, r: usize) -> usize {
        assert!(
            z < self.rows && r < self.cols,
            "cell ({}, {}) outside {}x{} grid",
            z, r, self.rows, self.cols
        );
        z * self.cols + r
    }

    pub fn get(&self, z: usize, r: usize) -> Option<&T> {
        if z < self.rows && r < self.cols {
            self.data.get(z * self.cols + r)
        } else {
            None
        }
    }

    /// One row (fixed z) as a slice
    pub fn row(&self, z: usize) -> &[T] {
        let start = self.offset(z, 0);
        &self.data[start..start + self.cols]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Apply `f` to every cell, keeping the layout
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl Grid<f64> {
    /// Largest value, or 0.0 for an empty grid
    pub fn max_value(&self) -> f64 {
        self.data.iter().copied().fold(0.0_f64, f64::max)
    }
}

impl<T> std::ops::Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (z, r): (usize, usize)) -> &T {
        let i = self.offset(z, r);
        &self.data[i]
    }
}

impl<T> std::ops::IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (z, r): (usize, usize)) -> &mut T {
        let i = self.offset(z, r);
        &mut self.data[i]
    }
}
