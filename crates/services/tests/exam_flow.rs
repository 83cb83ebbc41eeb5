use chrono::Duration;
use exam_core::model::{
    AnswerChoice, ExamSettings, FinishReason, LifecycleState, QuestionId, QuestionRecord,
    ScoringWeights, SpecialQuestionSettings, TimeLimit,
};
use exam_core::scoring::Verdict;
use exam_core::time::fixed_now;
use exam_services::{Clock, ExamLoopService, SessionError, TickOutcome};
use exam_storage::InMemoryQuestionBank;

fn record(id: u64) -> QuestionRecord {
    QuestionRecord::new(
        Some(QuestionId::new(id)),
        format!("Question {id}"),
        [("A", "first"), ("B", "second"), ("C", "third")],
        "B",
    )
    .unwrap()
}

fn repo(ids: impl IntoIterator<Item = u64>) -> InMemoryQuestionBank {
    InMemoryQuestionBank::new(ids.into_iter().map(record).collect())
}

fn answer(raw: &str) -> AnswerChoice {
    AnswerChoice::parse(raw).unwrap()
}

#[tokio::test]
async fn full_exam_with_every_answer_correct_scores_thirty() {
    let settings = ExamSettings::default().with_time_limit(TimeLimit::Minutes30);
    let mut svc = ExamLoopService::load(&repo(1..=60), Clock::fixed(fixed_now()), settings)
        .await
        .unwrap();

    svc.start().unwrap();
    loop {
        svc.answer(answer("B")).unwrap();
        svc.advance_clock(Duration::seconds(20));
        if svc.next().is_err() {
            break;
        }
    }
    assert_eq!(svc.submit().unwrap(), FinishReason::Submitted);

    let report = svc.score().unwrap();
    assert_eq!(report.correct, 30);
    assert_eq!(report.total, 30.0);
    assert!(report.details.iter().all(|d| d.verdict == Verdict::Correct));
}

#[tokio::test]
async fn mixed_answers_score_with_penalty() {
    let settings =
        ExamSettings::new(4, TimeLimit::Unlimited, ScoringWeights::default(), None).unwrap();
    let mut svc = ExamLoopService::load(&repo(1..=4), Clock::fixed(fixed_now()), settings)
        .await
        .unwrap();
    svc.start().unwrap();

    // correct, incorrect, skipped, correct
    svc.answer(answer("B")).unwrap();
    svc.next().unwrap();
    svc.answer(answer("A")).unwrap();
    svc.next().unwrap();
    svc.next().unwrap();
    svc.answer(answer("b")).unwrap();
    svc.submit().unwrap();

    let report = svc.score().unwrap();
    assert_eq!((report.correct, report.incorrect, report.skipped), (2, 1, 1));
    assert_eq!(report.total, 1.5);
}

#[tokio::test]
async fn timed_exam_expires_and_refuses_late_answers() {
    let settings =
        ExamSettings::new(3, TimeLimit::Minutes15, ScoringWeights::default(), None).unwrap();
    let mut svc = ExamLoopService::load(&repo(1..=10), Clock::fixed(fixed_now()), settings)
        .await
        .unwrap();
    svc.start().unwrap();
    svc.answer(answer("B")).unwrap();

    svc.advance_clock(Duration::minutes(14));
    assert!(matches!(svc.tick(), TickOutcome::Running(_)));

    svc.advance_clock(Duration::minutes(1));
    let err = svc.answer(answer("C")).unwrap_err();
    assert!(err.is_invalid_transition());
    assert_eq!(svc.session().lifecycle(), LifecycleState::Finished);
    assert_eq!(svc.tick(), TickOutcome::Finished);

    let report = svc.score().unwrap();
    assert_eq!((report.correct, report.skipped), (1, 2));
    assert_eq!(report.total, 1.0);
}

#[tokio::test]
async fn small_bank_cannot_start() {
    let mut svc = ExamLoopService::load(&repo(1..=12), Clock::fixed(fixed_now()), ExamSettings::default())
        .await
        .unwrap();
    let err = svc.start().unwrap_err();
    assert!(matches!(
        err,
        SessionError::InsufficientBank {
            available: 12,
            requested: 30
        }
    ));
    assert_eq!(svc.session().lifecycle(), LifecycleState::Idle);
}

#[tokio::test]
async fn special_question_appears_when_rule_always_fires() {
    let special = SpecialQuestionSettings::new(QuestionId::new(999), 1.0).unwrap();
    let settings =
        ExamSettings::new(5, TimeLimit::Unlimited, ScoringWeights::default(), Some(special))
            .unwrap();
    let mut svc =
        ExamLoopService::load(&repo((1..=20).chain([999])), Clock::fixed(fixed_now()), settings)
            .await
            .unwrap();
    svc.start().unwrap();

    let attempt = svc.session().attempt().unwrap();
    let ids: Vec<_> = attempt
        .questions()
        .iter()
        .filter_map(QuestionRecord::id)
        .collect();
    assert_eq!(ids.len(), 5);
    assert_eq!(ids.iter().filter(|id| id.value() == 999).count(), 1);
}

#[tokio::test]
async fn empty_repository_fails_to_load() {
    let err = ExamLoopService::load(
        &InMemoryQuestionBank::default(),
        Clock::fixed(fixed_now()),
        ExamSettings::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SessionError::Storage(_)));
}
