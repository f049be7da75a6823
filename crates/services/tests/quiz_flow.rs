use std::sync::Arc;

use services::{InMemoryLearningApi, LoadOutcome, QuizController, QuizError, QuizPhase, QuizScreen};
use vocab_core::model::{AnswerOption, CategoryId, Question};

fn question(prompt: &str, correct: usize) -> Question {
    let options = (0..4)
        .map(|i| AnswerOption::new(format!("{prompt}-t{i}"), i == correct))
        .collect();
    Question::new(prompt, options).unwrap()
}

fn controller(api: &InMemoryLearningApi) -> QuizController {
    QuizController::new(Arc::new(api.clone()))
}

#[tokio::test]
async fn three_question_run_scores_two_of_three() {
    let api = InMemoryLearningApi::new();
    let category = CategoryId::new(2);
    api.insert_questions(
        category,
        vec![question("cat", 1), question("dog", 2), question("fox", 0)],
    );
    let mut controller = controller(&api);

    assert_eq!(controller.reload(category).await, LoadOutcome::Applied);

    // Q1 right.
    let quiz = controller.quiz_mut().unwrap();
    let first = quiz.answer(1).unwrap();
    assert!(first.is_correct);
    quiz.advance().unwrap();

    // Q2 wrong; the true option is still surfaced for marking.
    let second = quiz.answer(1).unwrap();
    assert!(!second.is_correct);
    assert_eq!(second.chosen, 1);
    assert_eq!(second.correct, 2);
    quiz.advance().unwrap();

    // Q3 right.
    let third = quiz.answer(0).unwrap();
    assert!(third.is_correct);
    assert_eq!(quiz.advance().unwrap(), QuizPhase::Finished);

    let quiz = controller.quiz().unwrap();
    assert_eq!(quiz.score().to_string(), "2 of 3");
    assert_eq!(quiz.correct_count(), 2);
    assert_eq!(quiz.wrong_count(), 1);
    assert!((quiz.progress().percent() - 100.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn empty_category_never_presents() {
    let api = InMemoryLearningApi::new();
    let mut controller = controller(&api);

    let outcome = controller.reload(CategoryId::new(9)).await;

    assert_eq!(outcome, LoadOutcome::NoQuestions);
    assert!(matches!(controller.screen(), QuizScreen::NoQuestions));
    assert!(controller.quiz().is_none());
}

#[tokio::test]
async fn failed_load_shows_error_screen() {
    let api = InMemoryLearningApi::new();
    api.fail_quiz(true);
    let mut controller = controller(&api);

    let outcome = controller.reload(CategoryId::new(2)).await;

    assert_eq!(outcome, LoadOutcome::Failed);
    assert!(matches!(controller.screen(), QuizScreen::LoadFailed));
}

#[tokio::test]
async fn restart_resets_counters_and_loads_once() {
    let api = InMemoryLearningApi::new();
    let category = CategoryId::new(3);
    api.insert_questions(category, vec![question("owl", 0)]);
    let mut controller = controller(&api);

    controller.reload(category).await;
    let quiz = controller.quiz_mut().unwrap();
    quiz.answer(0).unwrap();
    quiz.advance().unwrap();
    assert!(quiz.is_finished());
    assert_eq!(api.quiz_request_count(), 1);

    assert_eq!(controller.reload(category).await, LoadOutcome::Applied);
    assert_eq!(api.quiz_request_count(), 2);

    let quiz = controller.quiz().unwrap();
    assert_eq!(quiz.correct_count(), 0);
    assert_eq!(quiz.wrong_count(), 0);
    assert_eq!(quiz.current_index(), 0);
    assert_eq!(quiz.phase(), QuizPhase::Presenting);
}

#[tokio::test]
async fn stale_response_cannot_clobber_newer_load() {
    let api = InMemoryLearningApi::new();
    let first_category = CategoryId::new(1);
    let second_category = CategoryId::new(2);
    let mut controller = controller(&api);

    // Two rapid loads; the second request's response arrives first.
    let first_ticket = controller.begin_load(first_category);
    let second_ticket = controller.begin_load(second_category);

    let applied =
        controller.apply_load(second_ticket, Ok(vec![question("bridge", 0)]));
    assert_eq!(applied, LoadOutcome::Applied);

    let stale = controller.apply_load(first_ticket, Ok(vec![question("river", 1)]));
    assert_eq!(stale, LoadOutcome::Stale);

    let quiz = controller.quiz().unwrap();
    assert_eq!(quiz.category(), second_category);
    assert_eq!(quiz.current_question().unwrap().prompt(), "bridge");
}

#[tokio::test]
async fn stale_failure_is_also_discarded() {
    let api = InMemoryLearningApi::new();
    let mut controller = controller(&api);

    let first_ticket = controller.begin_load(CategoryId::new(1));
    let second_ticket = controller.begin_load(CategoryId::new(2));

    controller.apply_load(second_ticket, Ok(vec![question("bridge", 0)]));
    let stale = controller.apply_load(
        first_ticket,
        Err(services::ApiError::BadPayload("late failure".into())),
    );

    assert_eq!(stale, LoadOutcome::Stale);
    assert!(matches!(controller.screen(), QuizScreen::Ready(_)));
}

#[tokio::test]
async fn second_click_is_inert_through_controller() {
    let api = InMemoryLearningApi::new();
    let category = CategoryId::new(4);
    api.insert_questions(category, vec![question("elk", 2), question("bee", 0)]);
    let mut controller = controller(&api);

    controller.reload(category).await;
    let quiz = controller.quiz_mut().unwrap();
    quiz.answer(2).unwrap();
    assert_eq!(quiz.answer(0).unwrap_err(), QuizError::AlreadyAnswered);

    assert_eq!(quiz.correct_count(), 1);
    assert_eq!(quiz.wrong_count(), 0);
    assert_eq!(quiz.progress().answered, 1);
}
