//! Prompt builder for rendering templates.

use crate::types::{BuiltPrompt, PromptDefinition};
use docseek_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Build a prompt from a definition and input variables.
///
/// Renders both the optional system template and the user template with the
/// same variables and returns a `BuiltPrompt` ready for LLM execution.
///
/// # Example
/// ```no_run
/// use docseek_prompt::{build_prompt, PromptDefinition};
/// use std::collections::HashMap;
///
/// # fn example(def: PromptDefinition) -> Result<(), Box<dyn std::error::Error>> {
/// let mut vars = HashMap::new();
/// vars.insert("question".to_string(), "When is the meeting?".to_string());
///
/// let built = build_prompt(&def, vars)?;
/// println!("User prompt: {}", built.user);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    variables: HashMap<String, String>,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    let handlebars = registry();

    let system = match definition.system {
        Some(ref template) => Some(render_template(&handlebars, template, &variables)?),
        None => None,
    };
    let user = render_template(&handlebars, &definition.template, &variables)?;

    Ok(BuiltPrompt::new(
        system.map(|s| s.trim_end().to_string()),
        user.trim_end().to_string(),
        definition.id.clone(),
        variables,
    ))
}

fn registry() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();
    // Plain text prompts: document snippets must reach the model verbatim
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars
}

/// Render a Handlebars template with variables.
fn render_template(
    handlebars: &Handlebars<'_>,
    template: &str,
    variables: &HashMap<String, String>,
) -> AppResult<String> {
    handlebars
        .render_template(template, variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PromptOutputSpec;

    fn create_test_definition(system: Option<&str>) -> PromptDefinition {
        PromptDefinition {
            id: "test.prompt".to_string(),
            title: "Test".to_string(),
            api_version: "1.0".to_string(),
            system: system.map(str::to_string),
            template: "Question: {{question}}\nContext: {{context}}\n".to_string(),
            output: PromptOutputSpec {
                format: "markdown".to_string(),
            },
        }
    }

    #[test]
    fn test_render_simple_template() {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "Hello, world!".to_string());

        let result = render_template(&registry(), "Question: {{question}}", &vars);
        assert_eq!(result.unwrap(), "Question: Hello, world!");
    }

    #[test]
    fn test_build_prompt_does_not_escape_html() {
        let def = create_test_definition(Some("System for {{question}}"));
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "a < b & c".to_string());
        vars.insert("context".to_string(), "<p>\"quoted\"</p>".to_string());

        let built = build_prompt(&def, vars).unwrap();
        assert_eq!(
            built.user,
            "Question: a < b & c\nContext: <p>\"quoted\"</p>"
        );
        assert_eq!(built.system.as_deref(), Some("System for a < b & c"));
        assert_eq!(built.metadata.source_prompt_id, "test.prompt");
    }

    #[test]
    fn test_build_prompt_without_system() {
        let def = create_test_definition(None);
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "q".to_string());

        let built = build_prompt(&def, vars).unwrap();
        assert!(built.system.is_none());
    }

    #[test]
    fn test_render_template_missing_variable() {
        let vars = HashMap::new();
        // Handlebars renders missing variables as empty string
        let result = render_template(&registry(), "Question: {{missing}}", &vars);
        assert_eq!(result.unwrap(), "Question: ");
    }

    #[test]
    fn test_render_template_syntax_error() {
        let vars = HashMap::new();
        let result = render_template(&registry(), "Question: {{#if}}", &vars);
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }
}
