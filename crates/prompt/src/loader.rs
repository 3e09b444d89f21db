//! Prompt loader for built-in and workspace YAML prompt definitions.

use crate::types::{PromptDefinition, PromptListing, PromptOrigin};
use docseek_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Prompt used to turn a question into search keywords.
pub const KEYWORDS_PROMPT_ID: &str = "keywords.extract";

/// Prompt used to answer a question from snippet context.
pub const ANSWER_PROMPT_ID: &str = "answer.grounded";

const BUILTIN_PROMPTS: [(&str, &str); 2] = [
    (
        KEYWORDS_PROMPT_ID,
        include_str!("../prompts/keywords.extract.yml"),
    ),
    (
        ANSWER_PROMPT_ID,
        include_str!("../prompts/answer.grounded.yml"),
    ),
];

/// Load a prompt definition by ID.
///
/// A file named `<id>.yml` in the workspace's `.docseek/prompts/` directory
/// takes precedence over the built-in definition with the same ID.
///
/// # Example
/// ```no_run
/// use docseek_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), "answer.grounded")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir(workspace_path).join(format!("{}.yml", prompt_id));

    let (contents, source) = if prompt_file.exists() {
        tracing::debug!("Loading prompt from: {:?}", prompt_file);
        let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
            AppError::Prompt(format!(
                "Failed to read prompt file {:?}: {}",
                prompt_file, e
            ))
        })?;
        (contents, format!("{:?}", prompt_file))
    } else if let Some(builtin) = builtin_source(prompt_id) {
        (builtin.to_string(), format!("built-in {}", prompt_id))
    } else {
        return Err(AppError::Prompt(format!(
            "Prompt not found: {} (looked in {:?})",
            prompt_id, prompt_file
        )));
    };

    let definition: PromptDefinition = serde_yaml::from_str(&contents)
        .map_err(|e| AppError::Prompt(format!("Failed to parse prompt YAML {}: {}", source, e)))?;

    validate_prompt(&definition)?;

    tracing::debug!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// List every prompt ID that `load_prompt` can resolve, sorted by ID.
///
/// Workspace files shadow built-ins with the same ID.
pub fn list_prompts(workspace_path: &Path) -> AppResult<Vec<PromptListing>> {
    let mut listings: Vec<PromptListing> = BUILTIN_PROMPTS
        .iter()
        .map(|(id, _)| PromptListing {
            id: id.to_string(),
            origin: PromptOrigin::Builtin,
        })
        .collect();

    let prompts_dir = prompts_dir(workspace_path);
    if prompts_dir.exists() {
        for entry in walkdir::WalkDir::new(&prompts_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yml") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    listings.retain(|listing| listing.id != stem);
                    listings.push(PromptListing {
                        id: stem.to_string(),
                        origin: PromptOrigin::Workspace,
                    });
                }
            }
        }
    }

    listings.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(listings)
}

fn prompts_dir(workspace_path: &Path) -> PathBuf {
    workspace_path.join(".docseek").join("prompts")
}

fn builtin_source(prompt_id: &str) -> Option<&'static str> {
    BUILTIN_PROMPTS
        .iter()
        .find(|(id, _)| *id == prompt_id)
        .map(|(_, source)| *source)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    Ok(())
}
