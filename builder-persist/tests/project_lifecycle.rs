//! Project Lifecycle Tests
//!
//! Runs the same save/load flow against every local backend:
//! - Create a project from an editor's design
//! - Edit the design and save an update
//! - Reload the design into a fresh editor

use builder_core::{DragPayload, EditorState, ElementKind, InputEvent, Point, PropertyField};
use builder_persist::{
    FileProjectStore, MemoryProjectStore, NewProject, PersistError, ProjectPatch, ProjectStore,
    Session,
};

fn editor_with_heading() -> EditorState {
    let mut editor = EditorState::default();
    editor
        .process_event(&InputEvent::Drop {
            payload: DragPayload::from_kind(ElementKind::Heading),
            point: Point::new(40.0, 60.0),
        })
        .expect("drop");
    editor
}

async fn save_edit_reload(store: &dyn ProjectStore) {
    let session = Session::new("ada");
    let mut editor = editor_with_heading();

    let project = NewProject::new("Bakery", "Food")
        .with_design(&editor.to_document())
        .expect("design");
    let created = store.create(&session, project).await.expect("create");
    editor.mark_saved();

    assert!(editor.edit_property(PropertyField::Text, "Fresh bread daily"));
    assert!(editor.has_local_changes);
    let patch = ProjectPatch::new()
        .design(&editor.to_document())
        .expect("design");
    store
        .update(&session, created.id, patch)
        .await
        .expect("update");

    let fetched = store.get(&session, created.id).await.expect("get");
    let reloaded =
        EditorState::from_document(fetched.design().expect("decode"), Point::default())
            .expect("editor");
    assert_eq!(reloaded.store(), editor.store());

    let listed = store.list(&session).await.expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Bakery");

    store.delete(&session, created.id).await.expect("delete");
    assert!(matches!(
        store.get(&session, created.id).await,
        Err(PersistError::NotFound(_))
    ));
}

// ============================================================================
// Backends
// ============================================================================

#[tokio::test]
async fn test_memory_store_lifecycle() {
    save_edit_reload(&MemoryProjectStore::new()).await;
}

#[tokio::test]
async fn test_file_store_lifecycle() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileProjectStore::open(dir.path()).await.expect("open");
    save_edit_reload(&store).await;
}

#[tokio::test]
async fn test_list_is_most_recent_first() {
    let store = MemoryProjectStore::new();
    let session = Session::new("ada");
    let first = store
        .create(&session, NewProject::new("First", "Food"))
        .await
        .expect("create");
    store
        .create(&session, NewProject::new("Second", "Food"))
        .await
        .expect("create");
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    store
        .update(
            &session,
            first.id,
            ProjectPatch {
                css_code: Some("h1{}".into()),
                ..ProjectPatch::default()
            },
        )
        .await
        .expect("update");

    let names: Vec<String> = store
        .list(&session)
        .await
        .expect("list")
        .into_iter()
        .map(|record| record.name)
        .collect();
    assert_eq!(names, vec!["First".to_string(), "Second".to_string()]);
}
