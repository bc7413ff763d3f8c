//! Editor session
//!
//! Ties the project store, the preview and the patch engine together the way
//! the editor page uses them: one project, one active file, one chat
//! transcript and at most one instruction in flight.

use crate::config::{CodepadConfig, StorageKeys, DEFAULT_SCRATCH_PROJECT_NAME};
use crate::error::{CodepadError, Result};
use crate::export::{self, ExportArtifact};
use crate::patch::{PatchContext, PatchEffect, PatchEngine, PatchOutcome};
use crate::ports::{KeyValueStore, RenderTarget};
use crate::preview::{ConsoleChannel, Previewer};
use crate::project_store::ProjectStore;
use crate::tree;
use codepad_types::{new_id, ChatMessage, FileKind, FileNode, Project};
use std::future::Future;
use tracing::{debug, info, warn};

/// Reply used when applying an instruction failed
pub const ERROR_MESSAGE: &str = "Sorry, there was an error processing your request.";

/// Id of the in-memory project backing a scratch session
pub const SCRATCH_PROJECT_ID: &str = "scratch";

pub const STARTER_DOCUMENT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>My App</title>
  <style>
    body {
      font-family: sans-serif;
      max-width: 800px;
      margin: 0 auto;
      padding: 20px;
    }
    h1 {
      color: #333;
    }
  </style>
</head>
<body>
  <h1>Hello World!</h1>
  <p>Edit this code to start building your app.</p>
</body>
</html>"#;

/// Which project an editor session works on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAddress {
    /// A project in the named collection
    Project(String),
    /// Ephemeral session kept under the scratch keys only
    Scratch,
}

impl SessionAddress {
    /// Read the `project` parameter from a URL query string such as
    /// `?project=123&tab=preview`. The value is used as written; see
    /// [`SessionAddress::from_query_with`] for encoded values.
    pub fn from_query(query: &str) -> Self {
        Self::from_query_with(query, |value| Some(value.to_string()))
    }

    /// Like [`SessionAddress::from_query`], passing the raw value through
    /// `decode` (the browser's `decodeURIComponent`). `+` reads as a space.
    /// A value that fails to decode addresses the scratch session.
    pub fn from_query_with<F>(query: &str, decode: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "project")
            .and_then(|(_, value)| decode(&value.replace('+', " ")))
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(SessionAddress::Project)
            .unwrap_or(SessionAddress::Scratch)
    }

    pub fn from_project_id(id: Option<String>) -> Self {
        match id {
            Some(id) if !id.trim().is_empty() => SessionAddress::Project(id),
            _ => SessionAddress::Scratch,
        }
    }
}

/// Ticket for an instruction accepted by [`EditorSession::begin_instruction`]
#[derive(Debug)]
#[must_use = "an accepted instruction must be completed"]
pub struct PendingInstruction {
    instruction: String,
}

impl PendingInstruction {
    pub fn instruction(&self) -> &str {
        &self.instruction
    }
}

pub struct EditorSession<S, T> {
    store: ProjectStore<S>,
    previewer: Previewer<T>,
    engine: PatchEngine,
    keys: StorageKeys,
    address: SessionAddress,
    project: Project,
    active_file: Option<String>,
    transcript: Vec<ChatMessage>,
    in_flight: bool,
}

impl<S: KeyValueStore, T: RenderTarget> EditorSession<S, T> {
    /// Open a session and render the first preview.
    ///
    /// A project without any HTML file gets a starter `index.html`.
    pub fn open(
        backend: S,
        target: T,
        address: SessionAddress,
        config: &CodepadConfig,
    ) -> Result<Self> {
        Self::open_with_previewer(backend, Previewer::new(target), address, config)
    }

    /// Like [`EditorSession::open`] with a caller-built previewer, e.g. one
    /// sharing a console channel with a message listener
    pub fn open_with_previewer(
        backend: S,
        previewer: Previewer<T>,
        address: SessionAddress,
        config: &CodepadConfig,
    ) -> Result<Self> {
        let store = ProjectStore::new(backend)
            .with_root_key(config.storage.projects_key.clone())
            .with_default_name(config.default_project_name.clone());

        let project = match &address {
            SessionAddress::Project(id) => store.load(id)?,
            SessionAddress::Scratch => load_scratch(store.backend(), &config.storage)?,
        };

        let mut session = Self {
            store,
            previewer,
            engine: PatchEngine::default(),
            keys: config.storage.clone(),
            address,
            project,
            active_file: None,
            transcript: vec![ChatMessage::welcome()],
            in_flight: false,
        };

        if !tree::walk(&session.project.files).any(|f| f.has_extension("html")) {
            info!(project = %session.project.id, "Adding starter index.html");
            session
                .project
                .files
                .push(FileNode::file(new_id(), "index.html", STARTER_DOCUMENT));
            session.persist()?;
        }

        session.active_file = tree::first_file(&session.project.files).map(|f| f.id.clone());
        session.refresh_preview()?;
        Ok(session)
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn address(&self) -> &SessionAddress {
        &self.address
    }

    pub fn is_scratch(&self) -> bool {
        self.address == SessionAddress::Scratch
    }

    pub fn store(&self) -> &ProjectStore<S> {
        &self.store
    }

    pub fn previewer(&self) -> &Previewer<T> {
        &self.previewer
    }

    pub fn previewer_mut(&mut self) -> &mut Previewer<T> {
        &mut self.previewer
    }

    pub fn console(&self) -> &ConsoleChannel {
        self.previewer.console()
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn is_processing(&self) -> bool {
        self.in_flight
    }

    pub fn active_file(&self) -> Option<&FileNode> {
        self.active_file
            .as_deref()
            .and_then(|id| tree::find(&self.project.files, id))
    }

    pub fn find_file(&self, id: &str) -> Option<&FileNode> {
        tree::find(&self.project.files, id)
    }

    pub fn select_file(&mut self, id: &str) -> Result<()> {
        let node =
            tree::find(&self.project.files, id).ok_or_else(|| CodepadError::FileNotFound(id.to_string()))?;
        if node.is_folder() {
            return Err(CodepadError::NotAFile(node.name.clone()));
        }
        self.active_file = Some(id.to_string());
        Ok(())
    }

    /// Replace a file's content, persist and re-render
    pub fn update_file(&mut self, id: &str, content: &str) -> Result<()> {
        let node = tree::find_mut(&mut self.project.files, id)
            .ok_or_else(|| CodepadError::FileNotFound(id.to_string()))?;
        if node.is_folder() {
            return Err(CodepadError::NotAFile(node.name.clone()));
        }
        node.content = content.to_string();
        self.commit()
    }

    /// Add an empty file or folder; returns its id. The first file created
    /// in a session without an active file becomes active.
    pub fn create_file(&mut self, name: &str, kind: FileKind, parent: Option<&str>) -> Result<String> {
        let node = match kind {
            FileKind::File => FileNode::file(new_id(), name, ""),
            FileKind::Folder => FileNode::folder(new_id(), name),
        };
        let id = node.id.clone();
        tree::insert(&mut self.project.files, parent, node)?;

        if kind == FileKind::File && self.active_file().is_none() {
            self.active_file = Some(id.clone());
        }
        self.commit()?;
        Ok(id)
    }

    /// Delete a file or folder. If the active file went with it, the first
    /// remaining file becomes active.
    pub fn delete_file(&mut self, id: &str) -> Result<FileNode> {
        let removed = tree::remove(&mut self.project.files, id)?;
        if self.active_file().is_none() {
            self.active_file = tree::first_file(&self.project.files).map(|f| f.id.clone());
        }
        self.commit()?;
        Ok(removed)
    }

    pub fn rename_file(&mut self, id: &str, name: &str) -> Result<()> {
        tree::rename(&mut self.project.files, id, name)?;
        self.commit()
    }

    pub fn rename_project(&mut self, name: &str) -> Result<()> {
        self.project.name = name.to_string();
        self.persist()
    }

    /// Recompose the preview from the current files
    pub fn refresh_preview(&mut self) -> Result<bool> {
        self.previewer.render_files(&self.project.files)
    }

    /// Reload the last rendered document without recomposing
    pub fn reload_preview(&mut self) -> Result<bool> {
        self.previewer.refresh()
    }

    pub fn export_active(&self) -> Option<ExportArtifact> {
        self.active_file()
            .map(|file| export::export_file(&file.content, &file.name))
    }

    pub fn export_preview(&self) -> Option<ExportArtifact> {
        export::export_preview(&self.project)
    }

    /// Accept an instruction and record the user's message.
    ///
    /// Blank text is ignored (`Ok(None)`). While another instruction is in
    /// flight this fails with [`CodepadError::Busy`].
    pub fn begin_instruction(&mut self, text: &str) -> Result<Option<PendingInstruction>> {
        if self.in_flight {
            return Err(CodepadError::Busy);
        }
        if text.trim().is_empty() {
            return Ok(None);
        }
        self.in_flight = true;
        self.transcript.push(ChatMessage::user(text));
        Ok(Some(PendingInstruction {
            instruction: text.to_string(),
        }))
    }

    /// Run the patch engine, apply its result, re-render and reply
    pub fn complete_instruction(&mut self, pending: PendingInstruction) -> Result<PatchOutcome> {
        let result = self.run_instruction(&pending.instruction);
        self.in_flight = false;

        match &result {
            Ok(outcome) => self.transcript.push(ChatMessage::assistant(outcome.message.clone())),
            Err(e) => {
                warn!("Failed to apply instruction: {}", e);
                self.transcript.push(ChatMessage::assistant(ERROR_MESSAGE));
            }
        }
        result
    }

    /// Begin, wait for `delay`, then complete. Returns `None` for blank text.
    pub async fn submit<F>(&mut self, text: &str, delay: F) -> Result<Option<PatchOutcome>>
    where
        F: Future<Output = ()>,
    {
        let Some(pending) = self.begin_instruction(text)? else {
            return Ok(None);
        };
        delay.await;
        self.complete_instruction(pending).map(Some)
    }

    fn run_instruction(&mut self, instruction: &str) -> Result<PatchOutcome> {
        let outcome = self.engine.apply(
            instruction,
            PatchContext {
                active: self.active_file(),
                files: &self.project.files,
            },
        );
        debug!(rule = ?outcome.rule, "Patch engine result");

        match &outcome.effect {
            PatchEffect::Edit { file_id, content } => {
                let file_id = file_id.clone();
                let content = content.clone();
                self.update_file(&file_id, &content)?;
            }
            PatchEffect::CreateFile { name, content } => {
                let node = FileNode::file(new_id(), name.clone(), content.clone());
                let id = node.id.clone();
                tree::insert(&mut self.project.files, None, node)?;
                self.active_file = Some(id);
                self.commit()?;
            }
            PatchEffect::NoChange(_) => {}
        }
        Ok(outcome)
    }

    fn commit(&mut self) -> Result<()> {
        self.persist()?;
        self.refresh_preview()?;
        Ok(())
    }

    fn persist(&mut self) -> Result<()> {
        self.project.touch();
        match &self.address {
            SessionAddress::Project(_) => self.store.save(&self.project),
            SessionAddress::Scratch => {
                // The scratch keys hold a single document
                let code = tree::walk(&self.project.files)
                    .find(|f| f.has_extension("html"))
                    .map(|f| f.content.as_str())
                    .unwrap_or_default();
                let backend = self.store.backend();
                backend.set(&self.keys.scratch_code_key, code)?;
                backend.set(&self.keys.scratch_name_key, &self.project.name)
            }
        }
    }
}

fn load_scratch<S: KeyValueStore>(backend: &S, keys: &StorageKeys) -> Result<Project> {
    let code = backend
        .get(&keys.scratch_code_key)?
        .filter(|code| !code.is_empty())
        .unwrap_or_else(|| STARTER_DOCUMENT.to_string());
    let name = backend
        .get(&keys.scratch_name_key)?
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_SCRATCH_PROJECT_NAME.to_string());

    let mut project = Project::new(SCRATCH_PROJECT_ID, name);
    project.files.push(FileNode::file(new_id(), "index.html", code));
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::{GUIDANCE_MESSAGE, SUCCESS_MESSAGE};
    use crate::preview::RecordingTarget;
    use crate::storage::MemoryStore;
    use codepad_types::{ChatSender, ConsoleLevel, ConsoleMessage};

    type TestSession = EditorSession<MemoryStore, RecordingTarget>;

    fn open_named(backend: &MemoryStore, project: &Project) -> TestSession {
        let store = ProjectStore::new(backend.clone());
        store.save(project).unwrap();
        EditorSession::open(
            backend.clone(),
            RecordingTarget::new(),
            SessionAddress::Project(project.id.clone()),
            &CodepadConfig::default(),
        )
        .unwrap()
    }

    fn site() -> Project {
        let mut project = Project::new("site", "Site");
        project.files = vec![
            FileNode::file("index", "index.html", "<head></head><body></body>"),
            FileNode::file("app", "app.js", "let n = 0;"),
        ];
        project
    }

    #[test]
    fn test_query_addressing() {
        assert_eq!(
            SessionAddress::from_query("?project=42&tab=code"),
            SessionAddress::Project("42".to_string())
        );
        assert_eq!(SessionAddress::from_query("?project="), SessionAddress::Scratch);
        assert_eq!(SessionAddress::from_query(""), SessionAddress::Scratch);
        assert_eq!(SessionAddress::from_query("?projects=1"), SessionAddress::Scratch);
    }

    #[test]
    fn test_query_value_is_decoded() {
        let decode = |value: &str| Some(value.replace("%20", " ").replace("%26", "&"));

        assert_eq!(
            SessionAddress::from_query_with("?project=my%20site&tab=code", decode),
            SessionAddress::Project("my site".to_string())
        );
        assert_eq!(
            SessionAddress::from_query_with("?project=a%26b+c", decode),
            SessionAddress::Project("a&b c".to_string())
        );
        assert_eq!(
            SessionAddress::from_query_with("?project=%E0%A4%A", |_| None),
            SessionAddress::Scratch
        );
    }

    #[test]
    fn test_open_missing_project_fails() {
        let result = TestSession::open(
            MemoryStore::new(),
            RecordingTarget::new(),
            SessionAddress::Project("nope".to_string()),
            &CodepadConfig::default(),
        );
        assert!(matches!(result, Err(CodepadError::ProjectNotFound(_))));
    }

    #[test]
    fn test_empty_project_gets_starter_and_renders() {
        let backend = MemoryStore::new();
        let session = open_named(&backend, &Project::new("empty", "Empty"));

        assert_eq!(session.project().files.len(), 1);
        assert_eq!(session.active_file().unwrap().name, "index.html");
        assert_eq!(session.previewer().target().documents().len(), 1);

        let stored = ProjectStore::new(backend).load("empty").unwrap();
        assert_eq!(stored.files.len(), 1);
    }

    #[test]
    fn test_scratch_session_uses_scratch_keys() {
        let backend = MemoryStore::new();
        backend.set("editorCode", "<body>saved</body>").unwrap();

        let mut session = TestSession::open(
            backend.clone(),
            RecordingTarget::new(),
            SessionAddress::Scratch,
            &CodepadConfig::default(),
        )
        .unwrap();
        assert_eq!(session.project().name, "My Project");
        assert_eq!(session.active_file().unwrap().content, "<body>saved</body>");

        let id = session.active_file().unwrap().id.clone();
        session.update_file(&id, "<body>edited</body>").unwrap();
        session.rename_project("Sketch").unwrap();

        assert_eq!(backend.get("editorCode").unwrap().as_deref(), Some("<body>edited</body>"));
        assert_eq!(backend.get("projectName").unwrap().as_deref(), Some("Sketch"));
        assert!(backend.get("projects").unwrap().is_none());
    }

    #[test]
    fn test_update_persists_and_rerenders() {
        let backend = MemoryStore::new();
        let mut session = open_named(&backend, &site());
        let before = session.project().last_modified;

        session.update_file("app", "let n = 1;").unwrap();

        let stored = ProjectStore::new(backend).load("site").unwrap();
        assert_eq!(tree::find(&stored.files, "app").unwrap().content, "let n = 1;");
        assert!(stored.last_modified >= before);
        assert!(session.previewer().target().last().unwrap().contains("let n = 1;"));
    }

    #[test]
    fn test_delete_active_reselects_first() {
        let backend = MemoryStore::new();
        let mut session = open_named(&backend, &site());
        session.select_file("app").unwrap();

        session.delete_file("app").unwrap();
        assert_eq!(session.active_file().unwrap().id, "index");

        session.delete_file("index").unwrap();
        assert!(session.active_file().is_none());
    }

    #[test]
    fn test_create_and_select_rules() {
        let backend = MemoryStore::new();
        let mut session = open_named(&backend, &site());

        let folder = session.create_file("lib", FileKind::Folder, None).unwrap();
        let file = session
            .create_file("util.js", FileKind::File, Some(&folder))
            .unwrap();
        assert!(matches!(
            session.select_file(&folder),
            Err(CodepadError::NotAFile(_))
        ));
        session.select_file(&file).unwrap();
        assert_eq!(session.active_file().unwrap().name, "util.js");

        session.rename_file(&file, "helpers.js").unwrap();
        let stored = ProjectStore::new(backend).load("site").unwrap();
        assert_eq!(tree::find(&stored.files, &file).unwrap().name, "helpers.js");
    }

    #[test]
    fn test_instruction_flow_is_ordered() {
        let backend = MemoryStore::new();
        let mut session = open_named(&backend, &site());
        let renders_before = session.previewer().target().documents().len();

        let outcome = tokio_test::block_on(session.submit("add a button", async {}))
            .unwrap()
            .unwrap();
        assert_eq!(outcome.message, SUCCESS_MESSAGE);

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1].sender, ChatSender::User);
        assert_eq!(transcript[1].content, "add a button");
        assert_eq!(transcript[2].content, SUCCESS_MESSAGE);

        assert!(session.active_file().unwrap().content.contains("<button"));
        assert_eq!(session.previewer().target().documents().len(), renders_before + 1);
        assert!(!session.is_processing());
    }

    #[test]
    fn test_single_instruction_in_flight() {
        let backend = MemoryStore::new();
        let mut session = open_named(&backend, &site());

        let pending = session.begin_instruction("add a footer").unwrap().unwrap();
        assert!(session.is_processing());
        assert!(matches!(
            session.begin_instruction("add a header"),
            Err(CodepadError::Busy)
        ));

        session.complete_instruction(pending).unwrap();
        assert!(session.begin_instruction("   ").unwrap().is_none());
        assert!(!session.is_processing());
    }

    #[test]
    fn test_create_stylesheet_switches_active_file() {
        let backend = MemoryStore::new();
        let mut session = open_named(&backend, &site());

        let first = tokio_test::block_on(session.submit("create a css file", async {}))
            .unwrap()
            .unwrap();
        assert!(first.is_change());
        assert_eq!(session.active_file().unwrap().name, "styles.css");
        assert_eq!(session.project().files.len(), 3);

        let second = tokio_test::block_on(session.submit("create a css file", async {}))
            .unwrap()
            .unwrap();
        assert_eq!(second.message, GUIDANCE_MESSAGE);
        assert_eq!(session.project().files.len(), 3);

        // The new stylesheet is inlined in the preview
        assert!(session.previewer().target().last().unwrap().contains("<style>/* Base styles */"));
    }

    #[test]
    fn test_vague_instruction_leaves_content() {
        let backend = MemoryStore::new();
        let mut session = open_named(&backend, &site());

        let outcome = tokio_test::block_on(session.submit("make it pop", async {}))
            .unwrap()
            .unwrap();
        assert_eq!(outcome.message, GUIDANCE_MESSAGE);
        assert_eq!(session.active_file().unwrap().content, "<head></head><body></body>");
    }

    #[test]
    fn test_console_follows_current_render() {
        let backend = MemoryStore::new();
        let mut session = open_named(&backend, &site());
        let old_context = session.console().current_context();

        session.update_file("app", "console.log('x', 1)").unwrap();
        let context = session.console().current_context();
        assert_ne!(old_context, context);

        // The console hook is the first thing the preview runs
        let written = session.previewer().target().last().unwrap();
        let shim = crate::preview::console_shim(context.as_deref().unwrap());
        assert!(written.starts_with(&shim));
        assert!(written.contains("console[level] = function"));
        let script = written.find("<script>console.log('x', 1)</script>").unwrap();
        assert!(script > shim.len());
        assert_eq!(&written[shim.len()..], session.previewer().last_document().unwrap());

        assert!(!session.console().deliver(ConsoleMessage {
            level: ConsoleLevel::Log,
            message: "stale".to_string(),
            context: old_context,
        }));
        assert!(session.console().deliver(ConsoleMessage {
            level: ConsoleLevel::Log,
            message: "x 1".to_string(),
            context,
        }));

        let entries: Vec<_> = session.previewer().capture_console().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "x 1");
    }

    #[test]
    fn test_exports() {
        let backend = MemoryStore::new();
        let session = open_named(&backend, &site());

        let active = session.export_active().unwrap();
        assert_eq!(active.filename, "index.html");
        assert_eq!(active.mime_type, "text/html");

        let preview = session.export_preview().unwrap();
        assert_eq!(preview.filename, "site.html");
    }
}
