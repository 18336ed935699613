//! Source text as the compiler receives it: named modules made of numbered lines.

use std::fmt;
use std::sync::Arc;

/// One line of a module. Every AST node and diagnostic points back at one of these.
///
/// Cloning is cheap (two reference-count bumps), so nodes keep their own copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLine {
    module: Arc<str>,
    number: usize,
    content: Arc<str>,
}

impl SourceLine {
    pub fn new(module: impl Into<Arc<str>>, number: usize, content: impl Into<Arc<str>>) -> Self {
        Self {
            module: module.into(),
            number,
            content: content.into(),
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    /// 1-based line number inside the module.
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl fmt::Display for SourceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.number)
    }
}

/// A named unit of source, e.g. one file or one editor buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceModule {
    name: Arc<str>,
    lines: Vec<SourceLine>,
}

impl SourceModule {
    pub fn new<I, S>(name: &str, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        let name: Arc<str> = Arc::from(name);
        let lines = lines
            .into_iter()
            .enumerate()
            .map(|(index, content)| SourceLine::new(name.clone(), index + 1, content))
            .collect();
        Self { name, lines }
    }

    /// Splits `text` on line breaks (`\n` or `\r\n`).
    pub fn from_text(name: &str, text: &str) -> Self {
        Self::new(name, text.lines())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lines(&self) -> &[SourceLine] {
        &self.lines
    }

    /// Line used for diagnostics that are not tied to a particular token.
    pub fn last_line(&self) -> SourceLine {
        self.lines
            .last()
            .cloned()
            .unwrap_or_else(|| SourceLine::new(self.name.clone(), 1, ""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_lines_from_one() {
        let module = SourceModule::from_text("main", "first\r\nsecond\n");
        let numbers = module
            .lines()
            .iter()
            .map(SourceLine::number)
            .collect::<Vec<_>>();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(module.lines()[1].content(), "second");
        assert_eq!(module.lines()[1].to_string(), "main:2");
    }

    #[test]
    fn empty_module_still_has_a_diagnostic_line() {
        let module = SourceModule::new("empty", Vec::<String>::new());
        assert_eq!(module.last_line().number(), 1);
        assert_eq!(module.last_line().module(), "empty");
    }
}
