//! Reorder flows end to end against a scripted backend

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use shared::{PageRequest, Task, TaskFilters, TaskListResponse};
use taskflow_client::cache::{SharedListCache, TaskListKey};
use taskflow_client::reorder::ReorderTicket;
use taskflow_client::{
    ClientError, ClientResult, ItemBounds, RecordingNotifier, ReorderBackend, ReorderCoordinator, ReorderError,
    ReorderKey, ReorderOutcome, ReorderState, Severity,
};

#[derive(Debug, Clone, Copy)]
enum Mode {
    Echo,
    Fail,
    Hang,
}

/// Answers reorder requests the way the server does: tasks in the
/// requested order, `order_index` spaced by 1000.
#[derive(Clone)]
struct ScriptedBackend {
    tasks: Arc<HashMap<i64, Task>>,
    calls: Arc<Mutex<Vec<Vec<i64>>>>,
    mode: Mode,
}

impl ScriptedBackend {
    fn new(tasks: &[Task], mode: Mode) -> Self {
        Self {
            tasks: Arc::new(tasks.iter().map(|t| (t.id, t.clone())).collect()),
            calls: Arc::default(),
            mode,
        }
    }

    fn calls(&self) -> Vec<Vec<i64>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReorderBackend for ScriptedBackend {
    async fn reorder_tasks(&self, task_ids: &[i64]) -> ClientResult<Vec<Task>> {
        self.calls.lock().unwrap().push(task_ids.to_vec());
        match self.mode {
            Mode::Echo => Ok(task_ids
                .iter()
                .enumerate()
                .filter_map(|(i, id)| self.tasks.get(id).map(|t| t.with_order_index((i as i64 + 1) * 1000)))
                .collect()),
            Mode::Fail => Err(ClientError::Internal("500 Internal Server Error: boom".into())),
            Mode::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(Vec::new())
            }
        }
    }
}

fn task(id: i64, title: &str, order_index: i64) -> Task {
    Task {
        id,
        title: title.to_string(),
        description: None,
        completed: false,
        priority: 5,
        due_date: None,
        order_index,
        category_id: None,
        user_id: 1,
        category: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}

fn abc() -> Vec<Task> {
    vec![task(1, "A", 0), task(2, "B", 1), task(3, "C", 2)]
}

fn titles(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|t| t.title.as_str()).collect()
}

struct Harness {
    backend: ScriptedBackend,
    notifier: RecordingNotifier,
    cache: SharedListCache,
    key: TaskListKey,
    coordinator: ReorderCoordinator<ScriptedBackend, RecordingNotifier, SharedListCache>,
}

fn harness(mode: Mode) -> Harness {
    let tasks = abc();
    let backend = ScriptedBackend::new(&tasks, mode);
    let notifier = RecordingNotifier::new();
    let cache = SharedListCache::default();
    let filters = TaskFilters::default();
    let key = TaskListKey::new(filters.clone(), PageRequest::default());
    cache.store_list(
        key.clone(),
        TaskListResponse {
            tasks: tasks.clone(),
            total: 3,
            page: 1,
            size: 50,
        },
    );
    let coordinator =
        ReorderCoordinator::new(backend.clone(), notifier.clone(), cache.clone(), filters, tasks);
    Harness {
        backend,
        notifier,
        cache,
        key,
        coordinator,
    }
}

fn cached_titles(h: &Harness) -> Vec<String> {
    h.cache
        .read(|c| c.peek_list(&h.key).cloned())
        .map(|r| r.tasks.into_iter().map(|t| t.title).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_move_first_to_last_commits() {
    let mut h = harness(Mode::Echo);

    let outcome = h.coordinator.reorder(0, 2).await.unwrap();

    assert_eq!(outcome, ReorderOutcome::Committed);
    assert_eq!(titles(h.coordinator.displayed()), vec!["B", "C", "A"]);
    let indices: Vec<i64> = h.coordinator.displayed().iter().map(|t| t.order_index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(h.backend.calls(), vec![vec![2, 3, 1]]);
    assert_eq!(cached_titles(&h), vec!["B", "C", "A"]);
    assert!(!h.coordinator.is_reordering());

    let notices = h.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Success);
    assert_eq!(notices[0].title, "Tasks reordered");
}

#[tokio::test]
async fn test_move_last_to_first_commits() {
    let mut h = harness(Mode::Echo);

    let outcome = h.coordinator.reorder(2, 0).await.unwrap();

    assert_eq!(outcome, ReorderOutcome::Committed);
    assert_eq!(titles(h.coordinator.displayed()), vec!["C", "A", "B"]);
    assert_eq!(h.backend.calls(), vec![vec![3, 1, 2]]);
}

#[tokio::test]
async fn test_failure_rolls_back_with_one_notice() {
    let mut h = harness(Mode::Fail);

    let outcome = h.coordinator.reorder(0, 2).await.unwrap();

    assert_eq!(outcome, ReorderOutcome::RolledBack);
    assert_eq!(h.coordinator.displayed(), abc().as_slice());
    assert_eq!(cached_titles(&h), vec!["A", "B", "C"]);
    assert_eq!(h.notifier.count(Severity::Error), 1);
    assert_eq!(h.notifier.count(Severity::Success), 0);

    let notice = &h.notifier.notices()[0];
    assert_eq!(notice.title, "Reorder failed");
    assert_eq!(notice.message, "Failed to reorder tasks. Please try again.");
}

#[tokio::test]
async fn test_same_position_sends_nothing() {
    let mut h = harness(Mode::Echo);
    h.coordinator.start_drag(1).unwrap();

    let outcome = h.coordinator.reorder(1, 1).await.unwrap();

    assert_eq!(outcome, ReorderOutcome::Unchanged);
    assert!(h.backend.calls().is_empty());
    assert!(h.notifier.notices().is_empty());
    assert!(!h.coordinator.drag().is_dragging());
    assert_eq!(h.coordinator.displayed(), abc().as_slice());
}

#[tokio::test]
async fn test_out_of_bounds_is_rejected() {
    let mut h = harness(Mode::Echo);

    let err = h.coordinator.reorder(0, 3).await.unwrap_err();

    assert_eq!(err, ReorderError::IndexOutOfBounds { index: 3, len: 3 });
    assert!(h.backend.calls().is_empty());
    assert_eq!(h.coordinator.state(), &ReorderState::Committed(abc()));
}

#[tokio::test]
async fn test_older_completion_is_ignored() {
    let mut h = harness(Mode::Echo);

    let first: ReorderTicket = h.coordinator.begin_reorder(0, 2).unwrap().unwrap();
    assert_eq!(first.task_ids, vec![2, 3, 1]);
    // Second move starts from the list on screen, which is the first's speculation
    let second = h.coordinator.begin_reorder(0, 1).unwrap().unwrap();
    assert_eq!(second.task_ids, vec![3, 2, 1]);
    assert!(second.generation > first.generation);

    let stale = h.coordinator.complete_reorder(first.generation, Ok(abc()));
    assert_eq!(stale, ReorderOutcome::Stale);
    assert_eq!(titles(h.coordinator.displayed()), vec!["C", "B", "A"]);
    assert!(h.coordinator.is_reordering());
    assert!(h.notifier.notices().is_empty());

    let confirmed = vec![task(3, "C", 1000), task(2, "B", 2000), task(1, "A", 3000)];
    let outcome = h.coordinator.complete_reorder(second.generation, Ok(confirmed));
    assert_eq!(outcome, ReorderOutcome::Committed);
    assert_eq!(titles(h.coordinator.displayed()), vec!["C", "B", "A"]);
    assert_eq!(cached_titles(&h), vec!["C", "B", "A"]);
    assert_eq!(h.notifier.count(Severity::Success), 1);
}

#[tokio::test]
async fn test_stale_failure_does_not_roll_back_newer_move() {
    let mut h = harness(Mode::Echo);

    let first = h.coordinator.begin_reorder(0, 2).unwrap().unwrap();
    let second = h.coordinator.begin_reorder(2, 0).unwrap().unwrap();

    let outcome = h.coordinator.complete_reorder(second.generation, Ok(abc()));
    assert_eq!(outcome, ReorderOutcome::Committed);
    assert_eq!(titles(h.coordinator.displayed()), vec!["A", "B", "C"]);

    let late = h
        .coordinator
        .complete_reorder(first.generation, Err(ClientError::Internal("late".into())));
    assert_eq!(late, ReorderOutcome::Stale);
    assert_eq!(titles(h.coordinator.displayed()), vec!["A", "B", "C"]);
    assert_eq!(h.notifier.count(Severity::Error), 0);
}

#[tokio::test]
async fn test_failure_after_overlap_restores_previous_speculation() {
    let mut h = harness(Mode::Echo);

    h.coordinator.begin_reorder(0, 2).unwrap();
    let second = h.coordinator.begin_reorder(0, 1).unwrap().unwrap();

    let outcome = h
        .coordinator
        .complete_reorder(second.generation, Err(ClientError::Internal("boom".into())));

    assert_eq!(outcome, ReorderOutcome::RolledBack);
    assert_eq!(titles(h.coordinator.displayed()), vec!["B", "C", "A"]);
    assert_eq!(h.notifier.count(Severity::Error), 1);
}

#[tokio::test]
async fn test_replace_list_makes_pending_result_stale() {
    let mut h = harness(Mode::Echo);

    let ticket = h.coordinator.begin_reorder(0, 2).unwrap().unwrap();
    h.coordinator.replace_list(abc());

    let outcome = h.coordinator.complete_reorder(ticket.generation, Ok(abc()));
    assert_eq!(outcome, ReorderOutcome::Stale);
    assert!(h.notifier.notices().is_empty());
}

#[tokio::test]
async fn test_pointer_drag_drop_after_last_item() {
    let mut h = harness(Mode::Echo);

    h.coordinator.start_drag(0).unwrap();
    // Visible list is [B, C]; lower half of C lands after it
    let candidate = h.coordinator.hover(1, 35.0, ItemBounds::new(20.0, 20.0)).unwrap();
    assert_eq!(candidate, 2);

    let outcome = h.coordinator.finish_drag().await.unwrap();

    assert_eq!(outcome, ReorderOutcome::Committed);
    assert_eq!(titles(h.coordinator.displayed()), vec!["B", "C", "A"]);
    assert!(!h.coordinator.drag().is_dragging());
}

#[tokio::test]
async fn test_pointer_drag_upper_half_takes_hovered_slot() {
    let mut h = harness(Mode::Echo);

    h.coordinator.start_drag(2).unwrap();
    let candidate = h.coordinator.hover(0, 5.0, ItemBounds::new(0.0, 20.0)).unwrap();
    assert_eq!(candidate, 0);

    h.coordinator.finish_drag().await.unwrap();
    assert_eq!(titles(h.coordinator.displayed()), vec!["C", "A", "B"]);
}

#[tokio::test]
async fn test_drag_without_candidate_cancels() {
    let mut h = harness(Mode::Echo);

    h.coordinator.start_drag(1).unwrap();
    let outcome = h.coordinator.finish_drag().await.unwrap();

    assert_eq!(outcome, ReorderOutcome::Cancelled);
    assert!(h.backend.calls().is_empty());
    assert!(!h.coordinator.drag().is_dragging());
}

#[tokio::test]
async fn test_hover_while_idle_is_rejected() {
    let mut h = harness(Mode::Echo);

    let err = h.coordinator.hover(0, 1.0, ItemBounds::new(0.0, 10.0)).unwrap_err();
    assert_eq!(err, ReorderError::NotDragging);
    assert_eq!(h.coordinator.finish_drag().await.unwrap_err(), ReorderError::NotDragging);
}

#[tokio::test]
async fn test_keyboard_confirm_reorders() {
    let mut h = harness(Mode::Echo);

    let down = h.coordinator.handle_key(ReorderKey::from_key_name("ArrowDown"), 0).await.unwrap();
    assert!(down.prevent_default);
    h.coordinator.handle_key(ReorderKey::MoveFocusDown, 0).await.unwrap();
    assert_eq!(h.coordinator.keyboard().focused(), Some(2));

    let confirm = h.coordinator.handle_key(ReorderKey::from_key_name("Enter"), 0).await.unwrap();

    assert!(confirm.prevent_default);
    assert!(confirm.action.is_some());
    assert_eq!(h.backend.calls(), vec![vec![2, 3, 1]]);
    assert_eq!(titles(h.coordinator.displayed()), vec!["B", "C", "A"]);
    assert!(!h.coordinator.keyboard().is_dragging());
    assert_eq!(h.coordinator.keyboard().focused(), None);
}

#[tokio::test]
async fn test_keyboard_escape_and_unknown_keys() {
    let mut h = harness(Mode::Echo);

    h.coordinator.keyboard_mut().focus(2);
    let escape = h.coordinator.handle_key(ReorderKey::Cancel, 0).await.unwrap();
    assert!(escape.prevent_default);
    assert_eq!(h.coordinator.keyboard().focused(), None);

    let other = h.coordinator.handle_key(ReorderKey::from_key_name("a"), 0).await.unwrap();
    assert!(!other.prevent_default);
    assert!(h.backend.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_timeout_rolls_back() {
    let h = harness(Mode::Hang);
    let mut coordinator = h.coordinator.with_timeout(Duration::from_secs(5));

    let outcome = coordinator.reorder(0, 2).await.unwrap();

    assert_eq!(outcome, ReorderOutcome::RolledBack);
    assert_eq!(coordinator.displayed(), abc().as_slice());
    assert_eq!(h.notifier.count(Severity::Error), 1);
    assert_eq!(h.backend.calls().len(), 1);
}
