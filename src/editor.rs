//! Cursor movement and editing over the editor buffer
//!
//! The cursor is a byte offset that always sits on a char boundary.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    position: usize,
}

impl Cursor {
    pub fn at_end(text: &str) -> Self {
        Cursor {
            position: text.len(),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Pull the cursor back inside `text` after the buffer was replaced
    pub fn clamp(&mut self, text: &str) {
        let mut pos = self.position.min(text.len());
        while !text.is_char_boundary(pos) {
            pos -= 1;
        }
        self.position = pos;
    }

    pub fn insert_char(&mut self, text: &mut String, c: char) {
        text.insert(self.position, c);
        self.position += c.len_utf8();
    }

    pub fn backspace(&mut self, text: &mut String) {
        if let Some(c) = text[..self.position].chars().next_back() {
            self.position -= c.len_utf8();
            text.remove(self.position);
        }
    }

    pub fn delete(&mut self, text: &mut String) {
        if self.position < text.len() {
            text.remove(self.position);
        }
    }

    pub fn left(&mut self, text: &str) {
        if let Some(c) = text[..self.position].chars().next_back() {
            self.position -= c.len_utf8();
        }
    }

    pub fn right(&mut self, text: &str) {
        if let Some(c) = text[self.position..].chars().next() {
            self.position += c.len_utf8();
        }
    }

    pub fn home(&mut self, text: &str) {
        self.position = line_start(text, self.position);
    }

    pub fn end(&mut self, text: &str) {
        self.position = text[self.position..]
            .find('\n')
            .map(|i| self.position + i)
            .unwrap_or(text.len());
    }

    /// Same column on the previous line, clamped to its length
    pub fn up(&mut self, text: &str) {
        let current_start = line_start(text, self.position);
        if current_start == 0 {
            return;
        }
        let column = text[current_start..self.position].chars().count();
        let prev_end = current_start - 1;
        let prev_start = line_start(text, prev_end);
        self.position = prev_start + byte_offset(&text[prev_start..prev_end], column);
    }

    /// Same column on the next line, clamped to its length
    pub fn down(&mut self, text: &str) {
        let Some(newline) = text[self.position..].find('\n') else {
            return;
        };
        let current_start = line_start(text, self.position);
        let column = text[current_start..self.position].chars().count();
        let next_start = self.position + newline + 1;
        let next_end = text[next_start..]
            .find('\n')
            .map(|i| next_start + i)
            .unwrap_or(text.len());
        self.position = next_start + byte_offset(&text[next_start..next_end], column);
    }
}

fn line_start(text: &str, pos: usize) -> usize {
    text[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

/// Byte offset of the `chars`-th character in `line`, or its length
fn byte_offset(line: &str, chars: usize) -> usize {
    line.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}
