use crate::geometry::Point;

/// Horizontal alignment of multi-line text around the object center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    pub const fn svg_anchor(self) -> &'static str {
        match self {
            Self::Left => "start",
            Self::Center => "middle",
            Self::Right => "end",
        }
    }
}

const LINE_HEIGHT_FACTOR: f64 = 1.3;
const CHAR_WIDTH_FACTOR: f64 = 0.62;
const MIN_FONT_SIZE: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TextContent {
    pub content: String,
    pub font_family: String,
    pub font_size: f64,
    pub align: TextAlign,
    cursor_chars: usize,
}

impl TextContent {
    pub fn new(
        content: impl Into<String>,
        font_family: impl Into<String>,
        font_size: f64,
        align: TextAlign,
    ) -> Self {
        let content = content.into();
        let cursor_chars = content.chars().count();
        Self {
            content,
            font_family: font_family.into(),
            font_size: font_size.max(MIN_FONT_SIZE),
            align,
            cursor_chars,
        }
    }

    pub fn lines(&self) -> Vec<&str> {
        if self.content.is_empty() {
            vec![""]
        } else {
            self.content.split('\n').collect()
        }
    }

    pub fn line_height(&self) -> f64 {
        (self.font_size * LINE_HEIGHT_FACTOR).max(2.0)
    }

    /// Estimated box for the current content, without consulting a font.
    ///
    /// Hit-testing and selection chrome use this; the rasterizer shapes real glyphs.
    pub fn measure(&self) -> (f64, f64) {
        let char_width = self.char_width();
        let lines = self.lines();
        let widest = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let width = (widest as f64 * char_width).max(char_width);
        let height = (lines.len() as f64 * self.line_height()).max(self.font_size);
        (width, height)
    }

    pub fn char_width(&self) -> f64 {
        (self.font_size * CHAR_WIDTH_FACTOR).max(1.0)
    }

    /// Caret as a vertical segment (top, bottom) in the local frame of the measured box.
    pub fn caret_segment(&self) -> (Point, Point) {
        let (width, height) = self.measure();
        let (line, column) = self.cursor_line_column();
        let char_width = self.char_width();
        let line_chars = self
            .lines()
            .get(line)
            .map(|text| text.chars().count())
            .unwrap_or(0);
        let line_width = line_chars as f64 * char_width;
        let line_start = match self.align {
            TextAlign::Left => -width / 2.0,
            TextAlign::Center => -line_width / 2.0,
            TextAlign::Right => width / 2.0 - line_width,
        };
        let x = line_start + column as f64 * char_width;
        let top = -height / 2.0 + line as f64 * self.line_height();
        (Point::new(x, top), Point::new(x, top + self.line_height()))
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_index = self.byte_index_for_cursor(self.cursor_chars);
        self.content.insert(byte_index, c);
        self.cursor_chars = self.cursor_chars.saturating_add(1);
    }

    pub fn delete_backward(&mut self) -> bool {
        if self.cursor_chars() == 0 {
            return false;
        }
        let end = self.byte_index_for_cursor(self.cursor_chars);
        let start = self.byte_index_for_cursor(self.cursor_chars.saturating_sub(1));
        if start >= end || end > self.content.len() {
            return false;
        }
        self.content.drain(start..end);
        self.cursor_chars = self.cursor_chars.saturating_sub(1);
        true
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn cursor_chars(&self) -> usize {
        self.cursor_chars.min(self.content.chars().count())
    }

    pub fn move_cursor_left(&mut self) -> bool {
        if self.cursor_chars() == 0 {
            return false;
        }
        self.cursor_chars = self.cursor_chars().saturating_sub(1);
        true
    }

    pub fn move_cursor_right(&mut self) -> bool {
        if self.cursor_chars() >= self.content.chars().count() {
            return false;
        }
        self.cursor_chars = self.cursor_chars().saturating_add(1);
        true
    }

    pub fn move_cursor_up(&mut self) -> bool {
        self.move_cursor_vertically(-1)
    }

    pub fn move_cursor_down(&mut self) -> bool {
        self.move_cursor_vertically(1)
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor_chars = self.content.chars().count();
    }

    /// Line index and column of the cursor, in characters.
    pub fn cursor_line_column(&self) -> (usize, usize) {
        let mut line = 0_usize;
        let mut column = 0_usize;
        let cursor = self.cursor_chars();
        for (index, ch) in self.content.chars().enumerate() {
            if index >= cursor {
                break;
            }
            if ch == '\n' {
                line = line.saturating_add(1);
                column = 0;
            } else {
                column = column.saturating_add(1);
            }
        }
        (line, column)
    }

    fn byte_index_for_cursor(&self, cursor_chars: usize) -> usize {
        let cursor_chars = cursor_chars.min(self.content.chars().count());
        self.content
            .char_indices()
            .nth(cursor_chars)
            .map(|(index, _)| index)
            .unwrap_or(self.content.len())
    }

    fn cursor_index_for_line_column(&self, target_line: usize, target_column: usize) -> usize {
        let mut line = 0_usize;
        let mut column = 0_usize;
        for (index, ch) in self.content.chars().enumerate() {
            if line == target_line && column == target_column {
                return index;
            }
            if ch == '\n' {
                if line == target_line {
                    return index;
                }
                line = line.saturating_add(1);
                column = 0;
            } else {
                column = column.saturating_add(1);
            }
        }
        self.content.chars().count()
    }

    fn move_cursor_vertically(&mut self, delta_lines: i32) -> bool {
        let lines = self.lines();
        if lines.len() <= 1 {
            return false;
        }
        let (line, column) = self.cursor_line_column();
        let target_line = if delta_lines < 0 {
            line.saturating_sub(delta_lines.unsigned_abs() as usize)
        } else {
            line.saturating_add(delta_lines as usize)
        }
        .min(lines.len().saturating_sub(1));
        if target_line == line {
            return false;
        }

        let target_column = column.min(lines[target_line].chars().count());
        let next_cursor = self.cursor_index_for_line_column(target_line, target_column);
        if next_cursor == self.cursor_chars() {
            return false;
        }
        self.cursor_chars = next_cursor;
        true
    }
}
