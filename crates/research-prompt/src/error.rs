//! Error types for prompt operations

use thiserror::Error;

/// Result type for prompt operations
pub type Result<T> = std::result::Result<T, PromptError>;

/// Errors that can occur during prompt operations
#[derive(Error, Debug)]
pub enum PromptError {
    /// Template source is not valid MiniJinja
    #[error("Failed to parse template '{name}': {detail}")]
    TemplateParseFailed { name: String, detail: String },

    /// Template references a variable it does not declare
    #[error("Template '{name}' uses undeclared variable '{variable}'")]
    UndeclaredVariable { name: String, variable: String },

    /// Declared input variables were not provided at render time
    #[error("Template '{name}' is missing variables: {}", .missing.join(", "))]
    MissingVariables { name: String, missing: Vec<String> },

    /// Template rendering failed
    #[error("Failed to render template '{name}': {detail}")]
    RenderError { name: String, detail: String },

    /// Template not registered in registry
    #[error("Template '{0}' not registered")]
    TemplateNotRegistered(String),
}

impl From<PromptError> for research_core::Error {
    fn from(err: PromptError) -> Self {
        match err {
            PromptError::MissingVariables { missing, .. } => {
                research_core::Error::MissingVariable(missing.join(", "))
            }
            other => research_core::Error::ProcessingFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_variables_message() {
        let err = PromptError::MissingVariables {
            name: "research.technical".to_string(),
            missing: vec!["price_data".to_string(), "ticker".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Template 'research.technical' is missing variables: price_data, ticker"
        );

        let core: research_core::Error = err.into();
        assert!(matches!(core, research_core::Error::MissingVariable(ref v) if v == "price_data, ticker"));
    }
}
