use taskboard_core::{
    migrate, BoardStorage, BoardStore, ColumnArrangement, JsonFileStorage, ShapeKind,
};

#[test]
fn save_then_load_reproduces_board() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.json");

    let (mut store, _) = BoardStore::open(JsonFileStorage::new(&path));
    let review = store.add_column("Review").unwrap();
    let first = store.add_task("write docs", "cover migration", "new").unwrap().unwrap();
    let second = store.add_task("ship", "", &review.id).unwrap().unwrap();
    store.move_task(&second.id, "blocked").unwrap();
    store.reorder_columns(&review.id, "new").unwrap();
    let expected = store.state().clone();

    let loaded = JsonFileStorage::new(&path).load().unwrap().unwrap();
    let report = migrate(Some(&loaded));
    assert_eq!(report.shape, ShapeKind::Current);
    assert!(!report.needs_persist);
    assert_eq!(report.board, expected);
    assert_eq!(report.board.task(&first.id).unwrap().description, "cover migration");
    assert_eq!(report.board.columns[0].id, review.id);
}

#[test]
fn reopened_store_keeps_stamped_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.json");

    let (mut store, _) = BoardStore::open(JsonFileStorage::new(&path));
    let a = store.add_task("a", "", "new").unwrap().unwrap();
    let b = store.add_task("b", "", "new").unwrap().unwrap();
    let c = store.add_task("c", "", "new").unwrap().unwrap();
    store
        .reorder_tasks(&[ColumnArrangement::new(
            "new",
            vec![c.id.clone(), a.id.clone(), b.id.clone()],
        )])
        .unwrap();
    drop(store);

    let (reopened, report) = BoardStore::open(JsonFileStorage::new(&path));
    assert!(report.is_clean());
    assert!(!report.persisted);
    let rendered = reopened
        .state()
        .tasks_in_column("new")
        .into_iter()
        .map(|task| task.id.clone())
        .collect::<Vec<_>>();
    assert_eq!(rendered, vec![c.id, a.id, b.id]);
}
