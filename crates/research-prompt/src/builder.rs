//! Fluent prompt builder
//!
//! Research prompts share one layout: an instruction line, labelled data
//! blocks, and a numbered list of what the answer has to cover.
//! [`PromptBuilder`] assembles that layout as template source.

/// A fluent builder for report-style prompts
///
/// # Examples
///
/// ```
/// use research_prompt::PromptBuilder;
///
/// let prompt = PromptBuilder::new()
///     .line("Perform technical analysis for {{ ticker }}:")
///     .blank_line()
///     .section("Technical Indicators")
///     .line("{{ technical_indicators }}")
///     .blank_line()
///     .line("Analyze:")
///     .numbered(["Trend Analysis", "Volume Analysis"])
///     .build();
///
/// assert!(prompt.starts_with("Perform technical analysis"));
/// assert!(prompt.contains("Technical Indicators:\n{{ technical_indicators }}"));
/// assert!(prompt.ends_with("2. Volume Analysis"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    buffer: String,
}

impl PromptBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw text
    pub fn text(mut self, content: impl AsRef<str>) -> Self {
        self.buffer.push_str(content.as_ref());
        self
    }

    /// Append text followed by a newline
    pub fn line(self, content: impl AsRef<str>) -> Self {
        self.text(content).text("\n")
    }

    /// Append an empty line
    pub fn blank_line(self) -> Self {
        self.text("\n")
    }

    /// Append a `Title:` label line
    pub fn section(self, title: impl AsRef<str>) -> Self {
        let label = format!("{}:", title.as_ref());
        self.line(label)
    }

    /// Append a numbered list starting from 1
    pub fn numbered<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (i, item) in items.into_iter().enumerate() {
            self = self.line(format!("{}. {}", i + 1, item.as_ref()));
        }
        self
    }

    /// Check if nothing has been appended
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Build the final prompt text, without trailing whitespace
    pub fn build(self) -> String {
        self.buffer.trim_end().to_string()
    }
}

impl From<PromptBuilder> for String {
    fn from(builder: PromptBuilder) -> Self {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_and_blank_lines() {
        let prompt = PromptBuilder::new()
            .line("Paragraph 1")
            .blank_line()
            .line("Paragraph 2")
            .build();
        assert_eq!(prompt, "Paragraph 1\n\nParagraph 2");
    }

    #[test]
    fn test_section_label() {
        let prompt = PromptBuilder::new()
            .section("Valuation Metrics")
            .text("{{ valuation_metrics }}")
            .build();
        assert_eq!(prompt, "Valuation Metrics:\n{{ valuation_metrics }}");
    }

    #[test]
    fn test_numbered_list() {
        let prompt = PromptBuilder::new()
            .numbered(vec!["Investment thesis", "Price targets", "Suggested position size"])
            .build();
        assert_eq!(
            prompt,
            "1. Investment thesis\n2. Price targets\n3. Suggested position size"
        );
    }

    #[test]
    fn test_empty() {
        let builder = PromptBuilder::new();
        assert!(builder.is_empty());
        assert_eq!(String::from(builder), "");
    }
}
