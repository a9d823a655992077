//! The glyph grid the animator paints each tick and serializes into a frame.

/// Fixed-size row-major glyph buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    w: u16,
    h: u16,
    cells: Vec<char>,
}

impl Grid {
    pub fn new(w: u16, h: u16, fill: char) -> Self {
        Self {
            w,
            h,
            cells: vec![fill; w as usize * h as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.w
    }

    pub fn height(&self) -> u16 {
        self.h
    }

    fn idx(&self, x: u16, y: u16) -> usize {
        y as usize * self.w as usize + x as usize
    }

    pub fn set(&mut self, x: u16, y: u16, ch: char) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = ch;
        }
    }

    pub fn get(&self, x: u16, y: u16) -> Option<char> {
        if x < self.w && y < self.h {
            Some(self.cells[self.idx(x, y)])
        } else {
            None
        }
    }

    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.cells.chunks(self.w.max(1) as usize)
    }

    /// Rows joined by `\n`, no trailing newline.
    pub fn to_frame_string(&self) -> String {
        let mut s = String::with_capacity(self.cells.len() + self.h as usize);
        self.write_frame(&mut s);
        s
    }

    /// Same as `to_frame_string`, reusing `out`'s allocation.
    pub fn write_frame(&self, out: &mut String) {
        out.clear();
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.extend(row.iter());
        }
    }
}
