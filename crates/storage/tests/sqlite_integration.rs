use chrono::Duration;
use quiz_core::model::{Question, QuestionResponse, ResponseDraft};
use quiz_core::time::fixed_now;
use storage::repository::SubmissionRepository;
use storage::sqlite::SqliteRepository;

fn build_question(question_index: usize) -> Question {
    Question::new(
        (question_index + 1).to_string(),
        format!("Study {question_index}"),
        "Participants were followed over two years.",
        "Cohort recruited from three clinics.",
        "Exposure measured by questionnaire.",
        "Exposed group showed higher incidence.",
        "Association held after adjustment.",
        "Causal - Tests whether changes in one variable causally contribute to changes in another variable.",
    )
    .unwrap()
}

fn build_response(question_index: usize, reasoning: &str) -> QuestionResponse {
    let question = build_question(question_index);
    let mut draft = ResponseDraft::new();
    draft.select(question.level_of_explanation());
    draft.set_reasoning(reasoning);
    QuestionResponse::new(question_index, question, &draft).unwrap()
}

#[tokio::test]
async fn sqlite_roundtrips_a_submission_with_question_payload() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let responses = vec![
        build_response(0, "randomized assignment rules out confounding"),
        build_response(1, "effect replicated in a held-out sample"),
    ];
    let id = repo
        .append_submission(&responses, fixed_now())
        .await
        .expect("append");

    let fetched = repo.get_submission(id).await.expect("fetch");
    assert_eq!(fetched.id(), id);
    assert_eq!(fetched.submitted_at(), fixed_now());
    assert_eq!(fetched.responses().len(), 2);

    let first = &fetched.responses()[0];
    assert_eq!(first.question_index(), 0);
    assert!(first.is_correct());
    assert_eq!(first.question().example(), "Study 0");
    assert_eq!(
        first.question().study_description(),
        "Participants were followed over two years."
    );
}

#[tokio::test]
async fn sqlite_list_recent_is_newest_first_and_capped() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_recent?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    for n in 0..4_i64 {
        let submitted_at = fixed_now() + Duration::minutes(n);
        repo.append_submission(
            &[build_response(0, &format!("submission number {n} reasoning"))],
            submitted_at,
        )
        .await
        .expect("append");
    }

    let recent = repo.list_recent(3).await.expect("list");
    assert_eq!(recent.len(), 3);
    assert_eq!(
        recent[0].responses()[0].reasoning(),
        "submission number 3 reasoning"
    );
    assert_eq!(
        recent[2].responses()[0].reasoning(),
        "submission number 1 reasoning"
    );
    assert!(recent[0].submitted_at() > recent[1].submitted_at());
}

#[tokio::test]
async fn sqlite_append_is_atomic_per_submission() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_atomic?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    // Duplicate question indexes violate the unique constraint; the whole
    // submission must roll back.
    let duplicated = vec![
        build_response(0, "first answer for index zero"),
        build_response(0, "second answer for index zero"),
    ];
    let err = repo
        .append_submission(&duplicated, fixed_now())
        .await
        .expect_err("duplicate index should fail");
    assert!(matches!(
        err,
        storage::repository::StorageError::Connection(_)
    ));

    let recent = repo.list_recent(10).await.expect("list");
    assert!(recent.is_empty());
}
