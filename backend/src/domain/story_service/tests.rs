//! Tests for the story service.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use mockable::MockClock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockChatRepository, MockStoryGenerator};

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53)
        .single()
        .expect("valid fixture timestamp")
}

#[fixture]
fn clock() -> Arc<dyn Clock> {
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(fixture_timestamp());
    Arc::new(clock)
}

fn service(
    chats: MockChatRepository,
    generator: MockStoryGenerator,
    clock: Arc<dyn Clock>,
) -> StoryService<MockChatRepository, MockStoryGenerator> {
    StoryService::new(Arc::new(chats), Arc::new(generator), clock)
}

fn owned_chat(owner: UserId) -> Chat {
    Chat::start(owner, ChatTitle::from_stored("Earlier"), fixture_timestamp())
}

#[rstest]
#[tokio::test]
async fn blank_input_is_rejected_before_any_io(clock: Arc<dyn Clock>) {
    let chats = MockChatRepository::new();
    let generator = MockStoryGenerator::new();

    let err = service(chats, generator, clock)
        .generate_story(UserId::random(), "   ", None)
        .await
        .expect_err("blank input");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "No input provided");
}

#[rstest]
#[tokio::test]
async fn new_chat_records_both_messages(clock: Arc<dyn Clock>) {
    let user = UserId::random();
    let mut chats = MockChatRepository::new();
    chats
        .expect_create_chat()
        .withf(move |chat| {
            chat.user_id == user && chat.title.as_ref().map(AsRef::as_ref) == Some("I feel lost")
        })
        .times(1)
        .returning(|_| Ok(()));
    chats
        .expect_append_message()
        .withf(|message| message.role == MessageRole::User && message.content == "I feel lost")
        .times(1)
        .returning(|_| Ok(()));
    chats
        .expect_append_message()
        .withf(|message| {
            message.role == MessageRole::Assistant && message.content == "Once upon a time"
        })
        .times(1)
        .returning(|_| Ok(()));

    let mut generator = MockStoryGenerator::new();
    generator
        .expect_generate()
        .withf(|prompt| prompt.contains("\"I feel lost\""))
        .times(1)
        .returning(|_| Ok("Once upon a time".to_owned()));

    let outcome = service(chats, generator, clock)
        .generate_story(user, "  I feel lost  ", None)
        .await
        .expect("story generated");

    assert_eq!(outcome.story, "Once upon a time");
}

#[rstest]
#[tokio::test]
async fn existing_chat_is_continued(clock: Arc<dyn Clock>) {
    let user = UserId::random();
    let chat = owned_chat(user);
    let chat_id = chat.id;

    let mut chats = MockChatRepository::new();
    chats
        .expect_find_chat()
        .withf(move |id| *id == chat_id)
        .returning(move |_| Ok(Some(chat.clone())));
    chats.expect_create_chat().never();
    chats
        .expect_append_message()
        .withf(move |message| message.chat_id == chat_id)
        .times(2)
        .returning(|_| Ok(()));

    let mut generator = MockStoryGenerator::new();
    generator
        .expect_generate()
        .returning(|_| Ok("The quest continues".to_owned()));

    let outcome = service(chats, generator, clock)
        .generate_story(user, "I choose the forest path", Some(chat_id))
        .await
        .expect("story generated");

    assert_eq!(outcome.chat_id, chat_id);
}

#[rstest]
#[case::missing(None)]
#[case::foreign(Some(UserId::random()))]
#[tokio::test]
async fn unknown_or_foreign_chat_is_not_found(
    clock: Arc<dyn Clock>,
    #[case] owner: Option<UserId>,
) {
    let chat = owner.map(owned_chat);
    let mut chats = MockChatRepository::new();
    chats
        .expect_find_chat()
        .returning(move |_| Ok(chat.clone()));
    chats.expect_append_message().never();
    let mut generator = MockStoryGenerator::new();
    generator.expect_generate().never();

    let err = service(chats, generator, clock)
        .generate_story(UserId::random(), "hello", Some(ChatId::random()))
        .await
        .expect_err("chat should not resolve");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Chat not found");
}

#[rstest]
#[case(StoryGeneratorError::not_configured())]
#[case(StoryGeneratorError::timeout("deadline elapsed"))]
#[case(StoryGeneratorError::upstream(500_u16, "boom"))]
#[tokio::test]
async fn generator_failures_are_service_unavailable(
    clock: Arc<dyn Clock>,
    #[case] failure: StoryGeneratorError,
) {
    let mut chats = MockChatRepository::new();
    chats.expect_create_chat().returning(|_| Ok(()));
    chats
        .expect_append_message()
        .withf(|message| message.role == MessageRole::User)
        .times(1)
        .returning(|_| Ok(()));
    let mut generator = MockStoryGenerator::new();
    generator
        .expect_generate()
        .returning(move |_| Err(failure.clone()));

    let err = service(chats, generator, clock)
        .generate_story(UserId::random(), "I feel tired", None)
        .await
        .expect_err("generator failed");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    assert_eq!(err.message(), GENERATION_FAILED_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn repository_outage_is_service_unavailable(clock: Arc<dyn Clock>) {
    let mut chats = MockChatRepository::new();
    chats
        .expect_create_chat()
        .returning(|_| Err(ChatPersistenceError::connection("pool exhausted")));
    let generator = MockStoryGenerator::new();

    let err = service(chats, generator, clock)
        .generate_story(UserId::random(), "hello", None)
        .await
        .expect_err("repository down");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
