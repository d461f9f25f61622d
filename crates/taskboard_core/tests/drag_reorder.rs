use taskboard_core::{
    arrangement_after_drop, current_arrangement, drop_index, BoardStore, CardBounds,
    MemoryStorage,
};

const CARD_HEIGHT: f64 = 40.0;
const CARD_GAP: f64 = 8.0;

fn sibling_bounds(count: usize) -> Vec<CardBounds> {
    (0..count)
        .map(|index| CardBounds::new(index as f64 * (CARD_HEIGHT + CARD_GAP), CARD_HEIGHT))
        .collect()
}

#[test]
fn pointer_drop_commits_visual_arrangement() {
    let (mut store, _) = BoardStore::open(MemoryStorage::new());
    let a = store.add_task("a", "", "inprogress").unwrap().unwrap();
    let b = store.add_task("b", "", "inprogress").unwrap().unwrap();
    let c = store.add_task("c", "", "inprogress").unwrap().unwrap();
    let moved = store.add_task("moved", "", "new").unwrap().unwrap();

    // Pointer between the first and second card of the target lane.
    let siblings = sibling_bounds(3);
    let index = drop_index(35.0, &siblings);
    assert_eq!(index, 1);

    let arrangement =
        arrangement_after_drop(store.state(), &moved.id, "inprogress", index).unwrap();
    assert!(store.reorder_tasks(&arrangement).unwrap());

    let expected = vec![a.id, moved.id.clone(), b.id, c.id];
    let lanes = current_arrangement(store.state());
    let lane = lanes
        .iter()
        .find(|lane| lane.column_id == "inprogress")
        .unwrap();
    assert_eq!(lane.task_ids, expected);
    assert_eq!(store.state().task(&moved.id).unwrap().order, Some(1));
    assert!(store.state().tasks_in_column("new").is_empty());
}

#[test]
fn drop_below_every_card_appends() {
    let (mut store, _) = BoardStore::open(MemoryStorage::new());
    let first = store.add_task("first", "", "done").unwrap().unwrap();
    let second = store.add_task("second", "", "done").unwrap().unwrap();

    let index = drop_index(10_000.0, &sibling_bounds(1));
    assert!(store.drop_task(&first.id, "done", index).unwrap());

    let rendered = store
        .state()
        .tasks_in_column("done")
        .into_iter()
        .map(|task| task.id.clone())
        .collect::<Vec<_>>();
    assert_eq!(rendered, vec![second.id, first.id]);
}
