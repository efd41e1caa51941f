//! Prompt templates with declared input variables
//!
//! A [`PromptTemplate`] is a MiniJinja template plus the list of variables it
//! expects. The declaration is checked twice: when the template is built (it
//! may not reference anything undeclared) and when it is rendered (every
//! declared variable has to be present).

use crate::{PromptError, Result};
use minijinja::{Environment, UndefinedBehavior};

/// A named prompt template
///
/// # Template Syntax
///
/// Standard Jinja2 syntax via MiniJinja:
/// - Variables: `{{ variable }}`
/// - Filters: `{{ name | upper }}`
/// - Conditionals: `{% if condition %}...{% endif %}`
///
/// # Examples
///
/// ```
/// use research_prompt::PromptTemplate;
/// use serde_json::json;
///
/// let template = PromptTemplate::new(
///     "greeting",
///     ["ticker"],
///     "Analyze the following stock ticker: {{ ticker }}",
/// )
/// .unwrap();
///
/// let prompt = template.render(&json!({ "ticker": "TSLA" })).unwrap();
/// assert_eq!(prompt, "Analyze the following stock ticker: TSLA");
/// ```
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    name: String,
    input_variables: Vec<String>,
    template: String,
}

impl PromptTemplate {
    /// Build a template, validating syntax and variable declarations
    pub fn new<I, S>(name: impl Into<String>, input_variables: I, template: impl Into<String>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let template = template.into();
        let input_variables: Vec<String> = input_variables.into_iter().map(Into::into).collect();

        let mut referenced: Vec<String> = {
            let env = environment();
            let compiled = env
                .template_from_str(&template)
                .map_err(|e| PromptError::TemplateParseFailed {
                    name: name.clone(),
                    detail: e.to_string(),
                })?;
            compiled.undeclared_variables(false).into_iter().collect()
        };
        referenced.sort();
        if let Some(variable) = referenced
            .into_iter()
            .find(|var| !input_variables.contains(var))
        {
            return Err(PromptError::UndeclaredVariable { name, variable });
        }

        Ok(Self {
            name,
            input_variables,
            template,
        })
    }

    /// Template name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variables the template expects
    pub fn input_variables(&self) -> &[String] {
        &self.input_variables
    }

    /// Raw template source
    pub fn source(&self) -> &str {
        &self.template
    }

    /// Render the template
    ///
    /// `vars` must be a JSON object holding every declared input variable.
    pub fn render(&self, vars: &serde_json::Value) -> Result<String> {
        let missing: Vec<String> = self
            .input_variables
            .iter()
            .filter(|var| vars.get(var.as_str()).is_none())
            .cloned()
            .collect();

        if !missing.is_empty() {
            return Err(PromptError::MissingVariables {
                name: self.name.clone(),
                missing,
            });
        }

        let env = environment();
        let context = minijinja::Value::from_serialize(vars);

        env.render_str(&self.template, context)
            .map_err(|e| PromptError::RenderError {
                name: self.name.clone(),
                detail: e.to_string(),
            })
    }
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env
}
