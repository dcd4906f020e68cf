use std::fmt;

/// Accumulated output of a module or step, one entry per line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputLog {
    lines: Vec<String>,
}

impl OutputLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `message`, splitting multi-line text (e.g. terraform stderr)
    /// into separate lines.
    pub fn log(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        if message.is_empty() {
            self.lines.push(String::new());
            return;
        }
        self.lines
            .extend(message.lines().map(|line| line.trim_end().to_string()));
    }

    /// Appends another log under a header line.
    pub fn push_section(&mut self, header: &str, other: &OutputLog) {
        self.lines.push(header.to_string());
        self.lines
            .extend(other.lines.iter().map(|line| format!("    {}", line)));
    }

    /// Moves every line of `other` into this log.
    pub fn absorb(&mut self, other: OutputLog) {
        self.lines.extend(other.lines);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

impl fmt::Display for OutputLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
