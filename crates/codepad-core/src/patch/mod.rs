//! Pattern-matched code edits for the chat assistant
//!
//! The engine is a pure function of (instruction, active file, project
//! files). It never fails: anything it cannot apply comes back as
//! [`PatchEffect::NoChange`] with a message for the user.

pub mod rules;

use crate::tree;
use codepad_types::FileNode;

pub const SUCCESS_MESSAGE: &str = "Changes applied successfully!";
pub const GUIDANCE_MESSAGE: &str = "I've processed your request but didn't make changes to your code. Could you be more specific, or select a different file?";

/// Condition on the project state a rule needs besides its intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// The active file has this extension
    ActiveExtension(&'static str),
    /// No file with this name exists anywhere in the project
    NoFileNamed(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    InsertBefore {
        anchor: &'static str,
        snippet: &'static str,
    },
    InsertAfter {
        anchor: &'static str,
        snippet: &'static str,
    },
    Append {
        snippet: &'static str,
    },
    CreateFile {
        name: &'static str,
        content: &'static str,
    },
}

/// One row of the rule table
#[derive(Clone)]
pub struct PatchRule {
    pub name: &'static str,
    /// Tested against the lowercased instruction
    pub intent: fn(&str) -> bool,
    pub guard: Guard,
    pub transform: Transform,
}

/// What the caller sees of the project when applying an instruction
#[derive(Debug, Clone, Copy)]
pub struct PatchContext<'a> {
    pub active: Option<&'a FileNode>,
    pub files: &'a [FileNode],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoChange {
    /// No rule matched, or the matching rule's guard failed
    NoApplicableIntent,
    /// The insertion point is not in the file
    AnchorMissing { anchor: &'static str, file: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchEffect {
    /// Replace the content of an existing file
    Edit { file_id: String, content: String },
    /// Add a new file at the project root and make it active
    CreateFile { name: String, content: String },
    NoChange(NoChange),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    /// Rule that produced the effect, if any matched
    pub rule: Option<&'static str>,
    pub effect: PatchEffect,
    pub message: String,
}

impl PatchOutcome {
    fn unchanged(rule: Option<&'static str>, reason: NoChange) -> Self {
        let message = match &reason {
            NoChange::NoApplicableIntent => GUIDANCE_MESSAGE.to_string(),
            NoChange::AnchorMissing { anchor, file } => {
                format!("I couldn't find {} in {}, so I left it unchanged.", anchor, file)
            }
        };
        Self {
            rule,
            effect: PatchEffect::NoChange(reason),
            message,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self.effect, PatchEffect::NoChange(_))
    }
}

/// Ordered rule table; the first rule whose intent and guard both pass wins
pub struct PatchEngine {
    rules: Vec<PatchRule>,
}

impl Default for PatchEngine {
    fn default() -> Self {
        Self::new(rules::builtin_rules())
    }
}

impl PatchEngine {
    pub fn new(rules: Vec<PatchRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[PatchRule] {
        &self.rules
    }

    pub fn apply(&self, instruction: &str, ctx: PatchContext<'_>) -> PatchOutcome {
        let text = instruction.to_lowercase();

        let Some(rule) = self
            .rules
            .iter()
            .find(|rule| (rule.intent)(&text) && guard_passes(rule.guard, &ctx))
        else {
            return PatchOutcome::unchanged(None, NoChange::NoApplicableIntent);
        };

        let effect = match rule.transform {
            Transform::CreateFile { name, content } => PatchEffect::CreateFile {
                name: name.to_string(),
                content: content.to_string(),
            },
            edit => {
                // Extension guards imply an active file; a rule without one
                // cannot edit anything.
                let Some(active) = ctx.active else {
                    return PatchOutcome::unchanged(Some(rule.name), NoChange::NoApplicableIntent);
                };
                match apply_edit(edit, &active.content) {
                    Ok(content) => PatchEffect::Edit {
                        file_id: active.id.clone(),
                        content,
                    },
                    Err(anchor) => {
                        return PatchOutcome::unchanged(
                            Some(rule.name),
                            NoChange::AnchorMissing {
                                anchor,
                                file: active.name.clone(),
                            },
                        )
                    }
                }
            }
        };

        PatchOutcome {
            rule: Some(rule.name),
            effect,
            message: SUCCESS_MESSAGE.to_string(),
        }
    }
}

fn guard_passes(guard: Guard, ctx: &PatchContext<'_>) -> bool {
    match guard {
        Guard::ActiveExtension(ext) => ctx.active.is_some_and(|f| f.has_extension(ext)),
        Guard::NoFileNamed(name) => !tree::contains_file_named(ctx.files, name),
    }
}

/// Literal first-occurrence splice. `Err` carries the missing anchor.
fn apply_edit(transform: Transform, content: &str) -> Result<String, &'static str> {
    match transform {
        Transform::InsertBefore { anchor, snippet } => {
            let pos = content.find(anchor).ok_or(anchor)?;
            Ok(format!("{}{}{}", &content[..pos], snippet, &content[pos..]))
        }
        Transform::InsertAfter { anchor, snippet } => {
            let pos = content.find(anchor).ok_or(anchor)? + anchor.len();
            Ok(format!("{}{}{}", &content[..pos], snippet, &content[pos..]))
        }
        Transform::Append { snippet } => Ok(format!("{}{}", content, snippet)),
        Transform::CreateFile { .. } => Ok(content.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::rules::STYLESHEET_NAME;
    use super::*;

    const PAGE: &str = "<html>\n<head></head>\n<body>\n  <h1>Hi</h1>\n</body>\n</html>";

    fn html() -> FileNode {
        FileNode::file("index", "index.html", PAGE)
    }

    fn apply_to(engine: &PatchEngine, instruction: &str, active: &FileNode) -> PatchOutcome {
        let files = vec![active.clone()];
        engine.apply(
            instruction,
            PatchContext {
                active: Some(active),
                files: &files,
            },
        )
    }

    fn edited(outcome: &PatchOutcome) -> &str {
        match &outcome.effect {
            PatchEffect::Edit { content, .. } => content,
            other => panic!("expected edit, got {:?}", other),
        }
    }

    #[test]
    fn test_button_inserted_before_body_close() {
        let engine = PatchEngine::default();
        let outcome = apply_to(&engine, "add a button", &html());

        assert_eq!(outcome.message, SUCCESS_MESSAGE);
        assert_eq!(outcome.rule, Some("html-button"));
        let content = edited(&outcome);
        assert_eq!(content.matches("<button").count(), 1);
        assert!(content.contains("Click Me</button>\n</body>"));
    }

    #[test]
    fn test_button_is_not_idempotent() {
        let engine = PatchEngine::default();
        let once = edited(&apply_to(&engine, "add a button", &html())).to_string();
        let twice_file = FileNode::file("index", "index.html", once);
        let twice = apply_to(&engine, "add a button", &twice_file);

        assert_eq!(edited(&twice).matches("<button").count(), 2);
    }

    #[test]
    fn test_button_in_js_appends_handler() {
        let engine = PatchEngine::default();
        let js = FileNode::file("app", "app.js", "const x = 1;");
        let outcome = apply_to(&engine, "Make the BUTTON do something", &js);

        assert_eq!(outcome.rule, Some("js-button-handler"));
        let content = edited(&outcome);
        assert!(content.starts_with("const x = 1;"));
        assert!(content.contains("console.log('Button clicked!')"));
    }

    #[test]
    fn test_header_after_body_open() {
        let engine = PatchEngine::default();
        let content = edited(&apply_to(&engine, "add a header", &html())).to_string();

        assert!(content.contains("<body>\n  <header"));
        assert!(content.find("<header").unwrap() < content.find("<h1>").unwrap());
    }

    #[test]
    fn test_footer_before_body_close() {
        let engine = PatchEngine::default();
        let content = edited(&apply_to(&engine, "add a footer", &html())).to_string();

        assert!(content.contains("</footer>\n</body>"));
    }

    #[test]
    fn test_vague_instruction_is_guidance() {
        let engine = PatchEngine::default();
        let outcome = apply_to(&engine, "do something vague", &html());

        assert_eq!(outcome.effect, PatchEffect::NoChange(NoChange::NoApplicableIntent));
        assert_eq!(outcome.message, GUIDANCE_MESSAGE);
        assert!(outcome.rule.is_none());
        assert!(!outcome.is_change());
    }

    #[test]
    fn test_wrong_file_type_is_guidance() {
        let engine = PatchEngine::default();
        let css = FileNode::file("s", "site.css", "body{}");
        let outcome = apply_to(&engine, "add a footer", &css);

        assert_eq!(outcome.message, GUIDANCE_MESSAGE);
    }

    #[test]
    fn test_missing_anchor_is_no_op() {
        let engine = PatchEngine::default();
        let fragment = FileNode::file("f", "partial.html", "<div></div>");
        let outcome = apply_to(&engine, "add a button", &fragment);

        assert_eq!(
            outcome.effect,
            PatchEffect::NoChange(NoChange::AnchorMissing {
                anchor: "</body>",
                file: "partial.html".to_string()
            })
        );
        assert!(outcome.message.contains("</body>"));
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let engine = PatchEngine::default();
        let outcome = apply_to(&engine, "add a header with a button", &html());
        assert_eq!(outcome.rule, Some("html-button"));
    }

    #[test]
    fn test_create_stylesheet_once() {
        let engine = PatchEngine::default();
        let files = vec![html()];
        let ctx = PatchContext {
            active: Some(&files[0]),
            files: &files,
        };

        let outcome = engine.apply("create a css file", ctx);
        match &outcome.effect {
            PatchEffect::CreateFile { name, content } => {
                assert_eq!(name, STYLESHEET_NAME);
                assert!(!content.is_empty());
            }
            other => panic!("expected new file, got {:?}", other),
        }

        let mut nested = FileNode::folder("d", "css");
        nested.children = Some(vec![FileNode::file("s", STYLESHEET_NAME, "")]);
        let with_sheet = vec![html(), nested];
        let again = engine.apply(
            "create a css file",
            PatchContext {
                active: Some(&with_sheet[0]),
                files: &with_sheet,
            },
        );
        assert_eq!(again.message, GUIDANCE_MESSAGE);
    }

    #[test]
    fn test_same_input_same_output() {
        let engine = PatchEngine::default();
        let a = apply_to(&engine, "add a footer", &html());
        let b = apply_to(&engine, "add a footer", &html());
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_active_file() {
        let engine = PatchEngine::default();
        let outcome = engine.apply(
            "add a button",
            PatchContext {
                active: None,
                files: &[],
            },
        );
        assert_eq!(outcome.message, GUIDANCE_MESSAGE);

        // Stylesheet creation does not need an active file
        let created = engine.apply(
            "Create CSS",
            PatchContext {
                active: None,
                files: &[],
            },
        );
        assert!(created.is_change());
    }
}
