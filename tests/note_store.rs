use chrono::{Local, NaiveDate};
use daynote_sync::config::NoteConfig;
use daynote_sync::note::daily::DailyNoteStore;
use daynote_sync::note::{NoteError, NoteStore};
use tempfile::TempDir;

fn store(dir: &TempDir) -> DailyNoteStore {
    let config = NoteConfig {
        directory: dir.path().join("daily"),
        ..NoteConfig::default()
    };
    DailyNoteStore::for_date(config, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()).unwrap()
}

#[tokio::test]
async fn test_today_path_uses_filename_format() {
    let dir = TempDir::new().unwrap();
    let config = NoteConfig {
        directory: dir.path().to_path_buf(),
        filename_format: "%Y/%m/%d".to_string(),
        ..NoteConfig::default()
    };
    let store = DailyNoteStore::for_date(config, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()).unwrap();

    assert_eq!(store.today_path(), dir.path().join("2025/01/15.md"));
    // Nested directories are created on demand
    let handle = store.ensure_today_note().await.unwrap();
    assert!(handle.path.exists());
}

#[tokio::test]
async fn test_ensure_today_note_creates_once() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);

    let first = store.ensure_today_note().await.unwrap();
    assert!(first.created);
    assert_eq!(
        std::fs::read_to_string(&first.path).unwrap(),
        "# 2025-01-15\n\n## Tasks\n"
    );

    std::fs::write(&first.path, "# edited\n").unwrap();
    let second = store.ensure_today_note().await.unwrap();
    assert!(!second.created);
    assert_eq!(std::fs::read_to_string(&second.path).unwrap(), "# edited\n");
}

#[tokio::test]
async fn test_list_tasks_missing_note() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);

    let err = store.list_tasks(&store.today_path()).await.unwrap_err();
    assert!(matches!(err, NoteError::NotFound(_)));
}

#[tokio::test]
async fn test_append_and_list() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let note = store.ensure_today_note().await.unwrap();

    store.append_task(&note.path, "Buy milk", None).await.unwrap();
    store.append_task(&note.path, "  Call mom ", Some("AAMk2")).await.unwrap();

    let tasks = store.list_tasks(&note.path).await.unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].title, "Buy milk");
    assert_eq!(tasks[0].line_index, 3);
    assert_eq!(tasks[1].title, "Call mom");
    assert_eq!(tasks[1].line_index, 4);
    assert_eq!(tasks[1].remote_id.as_deref(), Some("AAMk2"));
}

#[tokio::test]
async fn test_append_creates_missing_section() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let note = store.ensure_today_note().await.unwrap();
    std::fs::write(&note.path, "# 2025-01-15\nMorning notes").unwrap();

    store.append_task(&note.path, "Buy milk", None).await.unwrap();

    assert_eq!(
        std::fs::read_to_string(&note.path).unwrap(),
        "# 2025-01-15\nMorning notes\n\n## Tasks\n- [ ] Buy milk\n"
    );
}

#[tokio::test]
async fn test_mark_completed() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let note = store.ensure_today_note().await.unwrap();
    std::fs::write(&note.path, "## Tasks\n- [ ] Buy milk <!-- todo-id:1 -->\n").unwrap();

    let date = NaiveDate::from_ymd_opt(2025, 1, 14).unwrap();
    store.mark_completed(&note.path, 1, date).await.unwrap();

    assert_eq!(
        std::fs::read_to_string(&note.path).unwrap(),
        "## Tasks\n- [x] Buy milk ✅ 2025-01-14 <!-- todo-id:1 -->\n"
    );
}

#[tokio::test]
async fn test_mark_completed_stale_index() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let note = store.ensure_today_note().await.unwrap();
    let date = NaiveDate::from_ymd_opt(2025, 1, 14).unwrap();

    let err = store.mark_completed(&note.path, 42, date).await.unwrap_err();
    assert!(matches!(err, NoteError::LineOutOfRange { line: 42, .. }));

    // Line 0 is the title heading
    let err = store.mark_completed(&note.path, 0, date).await.unwrap_err();
    assert!(matches!(err, NoteError::NotATask { line: 0, .. }));
}

#[tokio::test]
async fn test_link_remote_id() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let note = store.ensure_today_note().await.unwrap();
    std::fs::write(&note.path, "- [ ] Write report\n").unwrap();

    store.link_remote_id(&note.path, 0, "AAMk9").await.unwrap();

    let tasks = store.list_tasks(&note.path).await.unwrap();
    assert_eq!(tasks[0].title, "Write report");
    assert_eq!(tasks[0].remote_id.as_deref(), Some("AAMk9"));
}

#[tokio::test]
async fn test_modified_date() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let note = store.ensure_today_note().await.unwrap();

    let modified = store.modified_date(&note.path).await.unwrap();
    assert_eq!(modified, Local::now().date_naive());
}

#[tokio::test]
async fn test_ensure_note_for_given_date() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let date = NaiveDate::from_ymd_opt(2025, 1, 14).unwrap();

    let note = store.ensure_note(date).await.unwrap();
    assert!(note.created);
    assert_eq!(note.path, store.path_for_date(date));
    assert_ne!(note.path, store.today_path());
    assert_eq!(std::fs::read_to_string(&note.path).unwrap(), "# 2025-01-14\n\n## Tasks\n");
}

#[tokio::test]
async fn test_crlf_line_endings_are_kept() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let note = store.ensure_today_note().await.unwrap();
    std::fs::write(&note.path, "## Tasks\r\n- [ ] Buy milk\r\n").unwrap();

    store.append_task(&note.path, "Call mom", None).await.unwrap();
    store
        .mark_completed(&note.path, 1, NaiveDate::from_ymd_opt(2025, 1, 14).unwrap())
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(&note.path).unwrap(),
        "## Tasks\r\n- [x] Buy milk ✅ 2025-01-14\r\n- [ ] Call mom\r\n"
    );
}

#[test]
fn test_invalid_filename_format_is_rejected() {
    let dir = TempDir::new().unwrap();
    for format in ["%Q", "%H-%M", ""] {
        let config = NoteConfig {
            directory: dir.path().to_path_buf(),
            filename_format: format.to_string(),
            ..NoteConfig::default()
        };
        let err = DailyNoteStore::new(config).err().unwrap();
        assert!(matches!(err, NoteError::InvalidFormat(_)), "format {format:?}");
    }
}
