//! Prompt template loading and rendering via `minijinja`.
//!
//! Each operation has a system and a user template, named
//! `{stem}_system.j2` and `{stem}_user.j2` where the stem comes from
//! [`Operation::template_stem`]. The defaults are compiled into the
//! crate; operators can point `generation.prompts_dir` at a directory
//! holding all six files to tune prompts without recompiling.

use std::path::Path;

use minijinja::Environment;
use serde::Serialize;

use crate::error::{GenAiError, Operation};

/// Every operation, for template validation.
const OPERATIONS: [Operation; 3] = [
    Operation::GenerateTwin,
    Operation::OptimizeTwin,
    Operation::AnalyzeFile,
];

/// The compiled-in templates, keyed by file name.
const BUILTIN_TEMPLATES: [(&str, &str); 6] = [
    ("generate_system.j2", include_str!("../templates/generate_system.j2")),
    ("generate_user.j2", include_str!("../templates/generate_user.j2")),
    ("optimize_system.j2", include_str!("../templates/optimize_system.j2")),
    ("optimize_user.j2", include_str!("../templates/optimize_user.j2")),
    ("analyze_system.j2", include_str!("../templates/analyze_system.j2")),
    ("analyze_user.j2", include_str!("../templates/analyze_user.j2")),
];

/// The complete rendered prompt ready to send to a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    /// System instruction describing the role and the output format.
    pub system: String,
    /// User message carrying the request details.
    pub user: String,
}

/// Manages prompt template loading and rendering.
pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    /// An engine using the compiled-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::Template`] if a built-in template fails to
    /// parse.
    pub fn builtin() -> Result<Self, GenAiError> {
        let mut env = Environment::new();
        for (name, source) in BUILTIN_TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// An engine loading templates from `dir`.
    ///
    /// All six templates are loaded eagerly so a missing or broken file is
    /// reported at startup rather than on the first request.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::Template`] if any template is missing or
    /// fails to parse.
    pub fn from_dir(dir: &Path) -> Result<Self, GenAiError> {
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(dir));
        for operation in OPERATIONS {
            env.get_template(&system_name(operation))?;
            env.get_template(&user_name(operation))?;
        }
        Ok(Self { env })
    }

    /// Render the system and user prompt for `operation` from `context`.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::Template`] if rendering fails.
    pub fn render<S: Serialize>(
        &self,
        operation: Operation,
        context: &S,
    ) -> Result<RenderedPrompt, GenAiError> {
        let system = self
            .env
            .get_template(&system_name(operation))?
            .render(context)?;
        let user = self
            .env
            .get_template(&user_name(operation))?
            .render(context)?;
        Ok(RenderedPrompt { system, user })
    }
}

fn system_name(operation: Operation) -> String {
    format!("{}_system.j2", operation.template_stem())
}

fn user_name(operation: Operation) -> String {
    format!("{}_user.j2", operation.template_stem())
}

#[cfg(test)]
mod tests {
    use minijinja::context;

    use super::*;

    #[test]
    fn builtin_templates_render() {
        let engine = PromptEngine::builtin();
        assert!(engine.is_ok());
        let Ok(engine) = engine else { return };

        let prompt = engine.render(
            Operation::GenerateTwin,
            &context! {
                prompt => "a three-storey library",
                twin_type => "architecture",
                specifications => "{\"materials\":[\"brick\"]}",
            },
        );
        let prompt = prompt.ok();
        assert!(prompt.as_ref().is_some_and(|p| p.system.contains("digital twin")));
        assert!(prompt.as_ref().is_some_and(|p| p.user.contains("a three-storey library")));
        assert!(prompt.is_some_and(|p| p.user.contains("brick")));
    }

    #[test]
    fn optional_sections_are_omitted() {
        let Ok(engine) = PromptEngine::builtin() else {
            return;
        };
        let prompt = engine
            .render(
                Operation::AnalyzeFile,
                &context! {
                    file_name => "plan.dwg",
                    mime_type => "application/acad",
                    size_bytes => 1024,
                },
            )
            .ok();
        assert!(prompt.as_ref().is_some_and(|p| p.user.contains("plan.dwg")));
        assert!(prompt.is_some_and(|p| !p.user.contains("Content preview")));
    }

    #[test]
    fn from_dir_requires_every_template() {
        let unique = format!(
            "twinforge_prompts_{}_{:?}",
            std::process::id(),
            std::thread::current().id(),
        );
        let dir = std::env::temp_dir().join(unique);
        std::fs::create_dir_all(&dir).ok();
        std::fs::write(dir.join("generate_system.j2"), "Only one template").ok();

        assert!(PromptEngine::from_dir(&dir).is_err());

        for (name, source) in BUILTIN_TEMPLATES {
            std::fs::write(dir.join(name), source).ok();
        }
        std::fs::write(dir.join("optimize_user.j2"), "Custom: {{ use_case }}").ok();

        let engine = PromptEngine::from_dir(&dir);
        assert!(engine.is_ok());
        let rendered = engine.ok().and_then(|e| {
            e.render(Operation::OptimizeTwin, &context! { use_case => "cut energy" })
                .ok()
        });
        assert_eq!(rendered.map(|p| p.user), Some("Custom: cut energy".to_owned()));

        std::fs::remove_dir_all(&dir).ok();
    }
}
