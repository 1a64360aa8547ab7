use lined_core::{Editor, TextEditorFactory, Workspace, WorkspaceConfig, WorkspaceError};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

fn workspace_in(dir: &Path) -> Workspace {
    Workspace::new(
        WorkspaceConfig::default()
            .with_files_root(dir.join("files"))
            .with_memento_path(dir.join("state").join("workspace.json")),
    )
}

#[test]
fn test_workspace_load_edit_save_close() {
    let dir = tempfile::tempdir().unwrap();
    let mut ws = workspace_in(dir.path());
    assert!(ws.is_empty());
    assert_eq!(ws.active_path(), None);

    let editor = ws.load_file("a.txt", &TextEditorFactory).unwrap();
    assert!(editor.is_modified());
    assert!(editor.append("hello"));

    let a = dir.path().join("files").join("a.txt");
    assert!(a.exists());
    assert_eq!(ws.len(), 1);
    assert_eq!(ws.active_path(), Some(a.as_path()));
    assert_eq!(ws.dirty_paths(), vec![a.as_path()]);

    ws.save_file("a.txt").unwrap();
    assert_eq!(fs::read_to_string(&a).unwrap(), "\nhello");
    assert!(!ws.editor(&a).unwrap().is_modified());
    assert!(ws.dirty_paths().is_empty());

    ws.close_file("a.txt").unwrap();
    assert!(ws.is_empty());
    assert_eq!(ws.active_path(), None);
}

#[test]
fn test_load_existing_file_reads_content() {
    let dir = tempfile::tempdir().unwrap();
    let files = dir.path().join("files");
    fs::create_dir_all(&files).unwrap();
    fs::write(files.join("notes.txt"), "one\ntwo\n").unwrap();

    let mut ws = workspace_in(dir.path());
    let editor = ws.load_file("notes.txt", &TextEditorFactory).unwrap();
    assert_eq!(editor.line_count(), 3);
    assert!(!editor.is_modified());
    assert!(!editor.is_log_enabled());
}

#[test]
fn test_close_active_reassigns_to_remaining_editor() {
    let dir = tempfile::tempdir().unwrap();
    let mut ws = workspace_in(dir.path());
    for name in ["a.txt", "b.txt", "c.txt"] {
        ws.load_file(name, &TextEditorFactory).unwrap();
    }
    assert_eq!(ws.active_path(), Some(dir.path().join("files/c.txt").as_path()));

    ws.close_file("c.txt").unwrap();
    let active = ws.active_path().unwrap().to_path_buf();
    let open: Vec<_> = ws.editor_paths().map(Path::to_path_buf).collect();
    assert!(open.contains(&active));
    assert_eq!(open.len(), 2);
}

#[test]
fn test_close_inactive_keeps_active() {
    let dir = tempfile::tempdir().unwrap();
    let mut ws = workspace_in(dir.path());
    ws.load_file("a.txt", &TextEditorFactory).unwrap();
    ws.load_file("b.txt", &TextEditorFactory).unwrap();

    ws.close_file("a.txt").unwrap();
    assert_eq!(ws.active_path(), Some(dir.path().join("files/b.txt").as_path()));
}

#[test]
fn test_workspace_errors() {
    let dir = tempfile::tempdir().unwrap();
    let mut ws = workspace_in(dir.path());

    assert!(matches!(
        ws.load_file("", &TextEditorFactory),
        Err(WorkspaceError::EmptyPath)
    ));
    assert!(matches!(ws.save_file(""), Err(WorkspaceError::EmptyPath)));
    assert!(matches!(ws.close_file(""), Err(WorkspaceError::EmptyPath)));
    assert!(matches!(
        ws.save_file("missing.txt"),
        Err(WorkspaceError::NotOpen(_))
    ));
    assert!(matches!(
        ws.close_file("missing.txt"),
        Err(WorkspaceError::NotOpen(_))
    ));
    assert!(matches!(ws.save_active(), Err(WorkspaceError::NoActiveEditor)));

    let err = ws.load_file("data.xml", &TextEditorFactory).err().unwrap();
    assert!(matches!(err, WorkspaceError::UnsupportedFileType(ref ext) if ext == "xml"));
    assert!(ws.is_empty());
    assert!(!dir.path().join("files/data.xml").exists());
}

#[test]
fn test_save_all_writes_every_editor() {
    let dir = tempfile::tempdir().unwrap();
    let mut ws = workspace_in(dir.path());
    ws.load_file("a.txt", &TextEditorFactory)
        .unwrap()
        .append("from a");
    ws.load_file("b.txt", &TextEditorFactory)
        .unwrap()
        .append("from b");

    assert_eq!(ws.save_all().unwrap(), 2);
    assert!(ws.dirty_paths().is_empty());
    assert_eq!(
        fs::read_to_string(dir.path().join("files/b.txt")).unwrap(),
        "\nfrom b"
    );
}

#[test]
fn test_log_marker_survives_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let mut ws = workspace_in(dir.path());
    let editor = ws.load_file("log.txt", &TextEditorFactory).unwrap();
    editor.set_log_enabled(true);
    editor.append("entry");
    ws.save_file("log.txt").unwrap();
    ws.close_file("log.txt").unwrap();

    let editor = ws.load_file("log.txt", &TextEditorFactory).unwrap();
    assert!(editor.is_log_enabled());
    assert!(!editor.is_modified());
    assert_eq!(editor.content(), "# log\n\nentry");
}

#[test]
fn test_log_toggle_restores_first_line() {
    let mut editor = lined_core::TextEditor::new("a.txt", "first\nsecond");

    editor.set_log_enabled(true);
    assert_eq!(editor.lines(), ["# log", "first", "second"]);

    editor.set_log_enabled(false);
    assert_eq!(editor.lines(), ["first", "second"]);
}
