use chrono::NaiveDate;
use planner_core::db::establish_connection;
use planner_core::error::CoreError;
use planner_core::models::{NewTaskData, Task};
use planner_core::repository::{CompletionResult, SqliteRepository, TaskRepository};
use tempfile::TempDir;

/// Helper to create a repository over a temporary database.
async fn setup_test_db() -> (SqliteRepository, TempDir) {
    let temp_dir = tempfile::tempdir().expect("failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");

    let pool = establish_connection(&db_path.to_string_lossy())
        .await
        .expect("failed to establish test database connection");

    (SqliteRepository::new(pool), temp_dir)
}

fn new_task(date: &str, title: &str, repeat: &str) -> NewTaskData {
    NewTaskData {
        date: date.to_string(),
        title: title.to_string(),
        comment: format!("comment for {title}"),
        repeat: repeat.to_string(),
    }
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[tokio::test]
async fn add_and_find_round_trip() {
    let (repo, _temp_dir) = setup_test_db().await;

    let task = repo
        .add_task(new_task("20240601", "water the plants", "d 3"))
        .await
        .expect("add failed");
    assert!(task.id > 0);

    let found = repo.find_task_by_id(task.id).await.expect("find failed");
    assert_eq!(found, task);
}

#[tokio::test]
async fn find_missing_task_is_not_found() {
    let (repo, _temp_dir) = setup_test_db().await;
    assert!(matches!(
        repo.find_task_by_id(9999).await,
        Err(CoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn listing_orders_by_date_and_respects_limit() {
    let (repo, _temp_dir) = setup_test_db().await;

    repo.add_task(new_task("20240603", "c", "")).await.unwrap();
    repo.add_task(new_task("20240601", "a", "")).await.unwrap();
    repo.add_task(new_task("20240602", "b", "")).await.unwrap();

    let tasks = repo.find_tasks(50, None).await.unwrap();
    let dates: Vec<&str> = tasks.iter().map(|t| t.date.as_str()).collect();
    assert_eq!(dates, ["20240601", "20240602", "20240603"]);

    let limited = repo.find_tasks(2, None).await.unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].title, "a");
}

#[tokio::test]
async fn search_matches_title_and_comment_substrings() {
    let (repo, _temp_dir) = setup_test_db().await;

    repo.add_task(new_task("20240601", "buy groceries", ""))
        .await
        .unwrap();
    repo.add_task(new_task("20240602", "dentist", ""))
        .await
        .unwrap();

    let by_title = repo.find_tasks(50, Some("grocer")).await.unwrap();
    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title[0].title, "buy groceries");

    // comments are "comment for <title>"
    let by_comment = repo.find_tasks(50, Some("for dentist")).await.unwrap();
    assert_eq!(by_comment.len(), 1);
    assert_eq!(by_comment[0].title, "dentist");

    let none = repo.find_tasks(50, Some("no such thing")).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn search_by_dotted_date_matches_exactly() {
    let (repo, _temp_dir) = setup_test_db().await;

    repo.add_task(new_task("20240601", "on the first", ""))
        .await
        .unwrap();
    repo.add_task(new_task("20240602", "on the second", ""))
        .await
        .unwrap();

    let tasks = repo.find_tasks(50, Some("01.06.2024")).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "on the first");
}

#[tokio::test]
async fn update_rewrites_all_fields() {
    let (repo, _temp_dir) = setup_test_db().await;

    let task = repo
        .add_task(new_task("20240601", "old title", ""))
        .await
        .unwrap();

    let updated = Task {
        id: task.id,
        date: "20240615".to_string(),
        title: "new title".to_string(),
        comment: "new comment".to_string(),
        repeat: "w 1,5".to_string(),
    };
    repo.update_task(&updated).await.expect("update failed");

    let found = repo.find_task_by_id(task.id).await.unwrap();
    assert_eq!(found, updated);
}

#[tokio::test]
async fn update_and_delete_of_missing_rows_are_not_found() {
    let (repo, _temp_dir) = setup_test_db().await;

    let ghost = Task {
        id: 4242,
        date: "20240601".to_string(),
        title: "ghost".to_string(),
        comment: String::new(),
        repeat: String::new(),
    };
    assert!(matches!(
        repo.update_task(&ghost).await,
        Err(CoreError::NotFound(_))
    ));
    assert!(matches!(
        repo.delete_task(4242).await,
        Err(CoreError::NotFound(_))
    ));
    assert!(matches!(
        repo.update_date(4242, "20240601").await,
        Err(CoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn completing_a_one_shot_task_deletes_it() {
    let (repo, _temp_dir) = setup_test_db().await;

    let task = repo
        .add_task(new_task("20240601", "one shot", ""))
        .await
        .unwrap();

    let result = repo
        .complete_task(task.id, day(2024, 6, 1))
        .await
        .expect("complete failed");
    assert_eq!(result, CompletionResult::Deleted);
    assert!(matches!(
        repo.find_task_by_id(task.id).await,
        Err(CoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn completing_a_recurring_task_reschedules_it() {
    let (repo, _temp_dir) = setup_test_db().await;

    let task = repo
        .add_task(new_task("20240601", "recurring", "d 1"))
        .await
        .unwrap();

    let result = repo
        .complete_task(task.id, day(2024, 6, 1))
        .await
        .expect("complete failed");
    assert_eq!(result, CompletionResult::Rescheduled("20240602".to_string()));

    let found = repo.find_task_by_id(task.id).await.unwrap();
    assert_eq!(found.date, "20240602");
    assert_eq!(found.repeat, "d 1");
}

#[tokio::test]
async fn completing_with_a_broken_rule_keeps_the_row() {
    let (repo, _temp_dir) = setup_test_db().await;

    // The parser is not consulted on insert; a row can carry a bad rule.
    let task = repo
        .add_task(new_task("20240601", "broken", "d 9000"))
        .await
        .unwrap();

    assert!(matches!(
        repo.complete_task(task.id, day(2024, 6, 1)).await,
        Err(CoreError::InvalidOperand(_))
    ));
    assert!(repo.find_task_by_id(task.id).await.is_ok());
}
