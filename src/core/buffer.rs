use crate::error::{NaturalDocsError, Result};

/// Line-oriented view of a source file that keeps every line's own ending
#[derive(Debug, Clone)]
pub struct SourceBuffer {
    lines: Vec<String>,
    endings: Vec<&'static str>,
}

impl SourceBuffer {
    pub fn parse(content: &str) -> Self {
        let mut lines = Vec::new();
        let mut endings = Vec::new();

        for piece in content.split_inclusive('\n') {
            let (line, ending) = if let Some(line) = piece.strip_suffix("\r\n") {
                (line, "\r\n")
            } else if let Some(line) = piece.strip_suffix('\n') {
                (line, "\n")
            } else {
                (piece, "")
            };
            lines.push(line.to_string());
            endings.push(ending);
        }

        Self { lines, endings }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Text of a 1-based line
    pub fn line(&self, number: usize) -> Result<&str> {
        self.check_line(number)?;
        Ok(&self.lines[number - 1])
    }

    /// Insert a block of text directly above a 1-based line.
    ///
    /// Inserted lines take the ending of the line they are placed above; above
    /// an unterminated last line they take the first ending found in the file.
    pub fn insert_above(&mut self, number: usize, block: &str) -> Result<()> {
        self.check_line(number)?;
        let index = number - 1;

        let ending = match self.endings[index] {
            "" => self.endings.iter().copied().find(|e| !e.is_empty()).unwrap_or("\n"),
            ending => ending,
        };

        let new_lines: Vec<String> = block.lines().map(str::to_string).collect();
        let count = new_lines.len();
        self.lines.splice(index..index, new_lines);
        self.endings.splice(index..index, std::iter::repeat(ending).take(count));
        Ok(())
    }

    fn check_line(&self, number: usize) -> Result<()> {
        if number == 0 || number > self.lines.len() {
            return Err(NaturalDocsError::LineOutOfRange {
                line: number,
                total: self.lines.len(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for SourceBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (line, ending) in self.lines.iter().zip(&self.endings) {
            f.write_str(line)?;
            f.write_str(ending)?;
        }
        Ok(())
    }
}
