// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end conversation tests through the dispatcher.

use std::time::Duration;

use chrono::Utc;
use passkeep_agent::messages;
use passkeep_bus::BusEvent;
use passkeep_core::types::{EntityId, NewPasswordRecord, Step, UserId};
use passkeep_test_utils::TestHarness;

const ALICE: UserId = UserId(1001);
const BOB: UserId = UserId(2002);

async fn harness() -> TestHarness {
    TestHarness::builder().build().await.expect("harness")
}

/// Saves with a one-shot command and declines the reminder offer.
async fn save(h: &TestHarness, user: UserId, text: &str) {
    let r = h.send(user, text).await;
    assert_eq!(r.step, Step::ReminderOffer, "{text}: {}", r.text);
    h.send(user, "Нет").await;
}

#[tokio::test]
async fn one_shot_generate_from_fresh_user() {
    let h = harness().await;
    let response = h.send(ALICE, "/generate 12 3").await;
    assert_eq!(response.text, messages::generated("aB1!aB1!aB1!"));
    assert_eq!(response.step, Step::Idle);
}

#[tokio::test]
async fn guided_generate_via_keyboard_alias() {
    let h = harness().await;

    let r = h.send(ALICE, "Генерировать").await;
    assert_eq!(r.text, messages::length_prompt(8, 64));
    assert_eq!(r.step, Step::GenerateStep1);

    let r = h.send(ALICE, "20").await;
    assert_eq!(r.text, messages::COMPLEXITY_PROMPT);
    assert_eq!(r.step, Step::GenerateStep2);

    let r = h.send(ALICE, "3").await;
    assert!(r.text.starts_with(&messages::generated("")));
    assert_eq!(r.step, Step::Idle);
    assert!(h.context().conversations.get_params(ALICE).is_empty());
}

#[tokio::test]
async fn one_shot_length_error_stays_idle() {
    let h = harness().await;
    let r = h.send(ALICE, "/generate 4 3").await;
    assert_eq!(r.text, messages::length_error(8, 64));
    assert_eq!(r.step, Step::Idle);
}

#[tokio::test]
async fn invalid_continuation_keeps_step() {
    let h = harness().await;
    h.send(ALICE, "/generate").await;

    let r = h.send(ALICE, "twelve").await;
    assert_eq!(r.text, messages::length_error(8, 64));
    assert_eq!(r.step, Step::GenerateStep1);

    // A command verb mid-flow is data, not a command.
    let r = h.send(ALICE, "/help").await;
    assert_eq!(r.step, Step::GenerateStep1);

    let r = h.send(ALICE, "10").await;
    assert_eq!(r.step, Step::GenerateStep2);
    let r = h.send(ALICE, "4").await;
    assert_eq!(r.text, messages::COMPLEXITY_ERROR);
    assert_eq!(r.step, Step::GenerateStep2);
    assert_eq!(h.context().conversations.get_params(ALICE), vec!["10"]);
}

#[tokio::test]
async fn unknown_commands_and_bad_arity_are_rejected() {
    let h = harness().await;
    for text in ["hello", "/delete 1 2", "/generate 12", "/list now", ""] {
        let r = h.send(ALICE, text).await;
        assert_eq!(r.text, messages::INVALID_COMMAND, "input {text:?}");
        assert_eq!(r.step, Step::Idle);
    }
}

#[tokio::test]
async fn start_registers_user_and_shows_help() {
    let h = harness().await;
    let r = h.send(ALICE, "/start").await;
    assert!(r.text.starts_with(messages::WELCOME));
    assert!(r.text.contains("/generate"));
    assert!(!r.text.contains("/start"));
    assert!(h.users.exists(ALICE).await.unwrap());
}

#[tokio::test]
async fn guided_save_then_decline_reminder() {
    let h = harness().await;

    let r = h.send(ALICE, "Сохранить").await;
    assert_eq!(r.step, Step::SaveStep1);

    let r = h.send(ALICE, "has space").await;
    assert_eq!(r.text, messages::SECRET_ERROR);
    assert_eq!(r.step, Step::SaveStep1);

    let r = h.send(ALICE, "s3cret!").await;
    assert_eq!(r.text, messages::DESCRIPTION_PROMPT);
    assert_eq!(r.step, Step::SaveStep2);

    let r = h.send(ALICE, "   ").await;
    assert_eq!(r.text, messages::EMPTY_INPUT);
    assert_eq!(r.step, Step::SaveStep2);

    let r = h.send(ALICE, "  My bank account ").await;
    assert_eq!(r.text, messages::saved(1));
    assert_eq!(r.step, Step::ReminderOffer);

    let r = h.send(ALICE, "может быть").await;
    assert_eq!(r.text, messages::AGREEMENT_ERROR);
    assert_eq!(r.step, Step::ReminderOffer);

    let r = h.send(ALICE, "Нет").await;
    assert_eq!(r.text, messages::REMINDER_DECLINED);
    assert_eq!(r.step, Step::Idle);

    let r = h.send(ALICE, "/list").await;
    assert_eq!(r.step, Step::InList);
    assert_eq!(
        r.text,
        format!(
            "{}\n{}",
            messages::LIST_HEADER,
            messages::list_line(1, "My bank account", "s3cret!")
        )
    );
}

#[tokio::test]
async fn secrets_are_stored_encrypted() {
    let h = harness().await;
    save(&h, ALICE, "/save hunter2 forum").await;
    let records = h.credentials.list_by_user(ALICE).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_ne!(records[0].encrypted_secret, "hunter2");
    assert_eq!(records[0].description, "forum");
}

#[tokio::test]
async fn in_list_accepts_commands() {
    let h = harness().await;
    save(&h, ALICE, "/save a1 first").await;
    assert_eq!(h.send(ALICE, "Список").await.step, Step::InList);

    let r = h.send(ALICE, "/delete 1").await;
    assert_eq!(r.text, messages::deleted(1));
    assert_eq!(r.step, Step::Idle);
    assert_eq!(h.send(ALICE, "/list").await.text, messages::EMPTY_LIST);
}

#[tokio::test]
async fn users_see_only_their_records() {
    let h = harness().await;
    save(&h, ALICE, "/save a1 alice-mail").await;
    save(&h, BOB, "/save b1 bob-mail").await;
    save(&h, BOB, "/save b2 bob-bank").await;

    let r = h.send(ALICE, "/list").await;
    assert!(r.text.contains("alice-mail"));
    assert!(!r.text.contains("bob"));

    // Bob's second record is index 2 for Bob only.
    assert_eq!(h.send(ALICE, "/delete 2").await.text, messages::NOT_FOUND);
    assert_eq!(h.credentials.count_by_user(BOB).await.unwrap(), 2);
}

#[tokio::test]
async fn guided_delete_with_bad_index_returns_to_idle() {
    let h = harness().await;
    save(&h, ALICE, "/save a1 first").await;

    let r = h.send(ALICE, "Удалить").await;
    assert_eq!(r.text, messages::INDEX_PROMPT);
    assert_eq!(r.step, Step::DeleteStep1);

    let r = h.send(ALICE, "7").await;
    assert_eq!(r.text, messages::NOT_FOUND);
    assert_eq!(r.step, Step::Idle);
    assert_eq!(h.credentials.count_by_user(ALICE).await.unwrap(), 1);
}

#[tokio::test]
async fn index_commands_on_empty_list_short_circuit() {
    let h = harness().await;
    for verb in ["/edit", "/delete", "/remind", "/clear"] {
        let r = h.send(ALICE, verb).await;
        assert_eq!(r.text, messages::EMPTY_LIST, "{verb}");
        assert_eq!(r.step, Step::Idle);
    }
}

#[tokio::test]
async fn guided_edit_replaces_secret_and_description() {
    let h = harness().await;
    save(&h, ALICE, "/save old-secret old name").await;

    let steps = [
        ("Изменить", Step::EditStep1),
        ("1", Step::EditStep2),
        ("3", Step::EditStep2),
        ("9", Step::EditStep3),
        ("Низкая", Step::EditStep4),
        ("new name", Step::ReminderOffer),
    ];
    for (text, expected) in steps {
        let r = h.send(ALICE, text).await;
        assert_eq!(r.step, expected, "after {text:?}: {}", r.text);
    }

    let r = h.send(ALICE, "Нет").await;
    assert_eq!(r.step, Step::Idle);

    let list = h.send(ALICE, "/list").await.text;
    assert!(list.contains(&messages::list_line(1, "new name", "ab1ab1ab1")));
    assert!(!list.contains("old-secret"));
}

#[tokio::test]
async fn guided_complexity_is_stored_as_its_code() {
    let h = harness().await;
    save(&h, ALICE, "/save s1 mail").await;

    h.send_all(ALICE, &["/edit", "1", "12", " высокая "]).await;
    assert_eq!(h.context().conversations.get_params(ALICE), vec!["1", "12", "3"]);

    let r = h.send(BOB, "/generate").await;
    assert_eq!(r.step, Step::GenerateStep1);
    h.send(BOB, "12").await;
    let r = h.send(BOB, "Средняя").await;
    assert_eq!(r.text, messages::generated("aB1aB1aB1aB1"));
}

#[tokio::test]
async fn one_shot_edit_offers_reminder_for_same_index() {
    let h = harness().await;
    save(&h, ALICE, "/save x1 first").await;
    save(&h, ALICE, "/save x2 second").await;

    let r = h.send(ALICE, "/edit 2 8 2 renamed entry").await;
    assert_eq!(r.text, messages::edited(2, "aB1aB1aB"));
    assert_eq!(r.step, Step::ReminderOffer);
    assert_eq!(h.context().conversations.get_params(ALICE), vec!["2"]);

    let r = h.send(ALICE, "Да").await;
    assert_eq!(r.step, Step::RemindStep2);
    let r = h.send(ALICE, "5").await;
    assert_eq!(r.text, messages::reminder_set(2, 5));
    assert_eq!(r.step, Step::Idle);

    let second = h.credentials.list_by_user(ALICE).await.unwrap()[1].clone();
    assert_eq!(second.description, "renamed entry");
    assert!(h.scheduler.is_scheduled(EntityId::password(second.id)).await);
}

#[tokio::test]
async fn sort_and_find_keep_list_numbering() {
    let h = harness().await;
    save(&h, ALICE, "/save p1 Яндекс").await;
    save(&h, ALICE, "/save p2 банк").await;
    save(&h, ALICE, "/save p3 Bank card").await;

    let r = h.send(ALICE, "Сортировать").await;
    assert_eq!(r.step, Step::SortStep1);
    let r = h.send(ALICE, "по размеру").await;
    assert_eq!(r.text, messages::SORT_ERROR);
    assert_eq!(r.step, Step::SortStep1);

    let r = h.send(ALICE, "По описанию").await;
    assert_eq!(r.step, Step::InList);
    let lines: Vec<&str> = r.text.lines().skip(1).collect();
    assert_eq!(
        lines,
        [
            messages::list_line(3, "Bank card", "p3"),
            messages::list_line(2, "банк", "p2"),
            messages::list_line(1, "Яндекс", "p1"),
        ]
    );

    let r = h.send(ALICE, "/find BANK").await;
    assert_eq!(r.step, Step::InList);
    assert_eq!(r.text.lines().count(), 2);
    assert!(r.text.contains(&messages::list_line(3, "Bank card", "p3")));

    let r = h.send(ALICE, "/find почта").await;
    assert_eq!(r.text, messages::NOTHING_FOUND);
    assert_eq!(r.step, Step::Idle);
}

#[tokio::test]
async fn sort_by_date_puts_latest_edit_first() {
    let h = harness().await;
    save(&h, ALICE, "/save p1 first").await;
    save(&h, ALICE, "/save p2 second").await;
    h.send_all(ALICE, &["/edit 1 8 1 first", "Нет"]).await;

    let r = h.send(ALICE, "/sort По дате").await;
    let first_line = r.text.lines().nth(1).unwrap_or_default();
    assert!(first_line.starts_with("1. first"), "{first_line}");
}

#[tokio::test]
async fn remind_validates_days() {
    let h = harness().await;
    save(&h, ALICE, "/save p1 first").await;

    let r = h.send(ALICE, "/remind 1 2").await;
    assert_eq!(r.text, messages::days_error(3, 90));
    assert_eq!(r.step, Step::Idle);

    h.send(ALICE, "Напомнить").await;
    let r = h.send(ALICE, "1").await;
    assert_eq!(r.text, messages::days_prompt(3, 90));
    assert_eq!(r.step, Step::RemindStep2);
    let r = h.send(ALICE, "91").await;
    assert_eq!(r.step, Step::RemindStep2);
    let r = h.send(ALICE, "30").await;
    assert_eq!(r.text, messages::reminder_set(1, 30));
}

#[tokio::test]
async fn recovery_phrase_has_cooldown() {
    let h = harness().await;

    let r = h.send(ALICE, "Фраза").await;
    assert_eq!(r.step, Step::RecoveryPhraseStep1);
    let r = h.send(ALICE, "correct horse battery staple").await;
    assert_eq!(r.text, messages::RECOVERY_SAVED);
    assert_eq!(r.step, Step::Idle);

    let user = h.users.find(ALICE).await.unwrap();
    assert_eq!(
        user.recovery_phrase_hash.as_deref(),
        Some("plain$correct horse battery staple")
    );
    assert!(h.scheduler.is_scheduled(EntityId::recovery(ALICE)).await);

    let r = h.send(ALICE, "/recovery another phrase").await;
    assert_eq!(r.text, messages::cooldown(30));
    assert_eq!(r.step, Step::Idle);
}

#[tokio::test]
async fn clear_asks_before_wiping() {
    let h = harness().await;
    save(&h, ALICE, "/save p1 first").await;
    save(&h, ALICE, "/save p2 second").await;
    save(&h, BOB, "/save p3 other").await;

    let r = h.send(ALICE, "/clear").await;
    assert_eq!(r.text, messages::CLEAR_CONFIRM);
    assert_eq!(r.step, Step::ClearStep1);
    assert_eq!(h.send(ALICE, "ok").await.step, Step::ClearStep1);

    let r = h.send(ALICE, "Нет").await;
    assert_eq!(r.text, messages::CLEAR_CANCELLED);
    assert_eq!(h.credentials.count_by_user(ALICE).await.unwrap(), 2);

    h.send(ALICE, "Очистить").await;
    let r = h.send(ALICE, "да").await;
    assert_eq!(r.text, messages::cleared(2));
    assert_eq!(r.step, Step::Idle);
    assert_eq!(h.credentials.count_by_user(ALICE).await.unwrap(), 0);
    assert_eq!(h.credentials.count_by_user(BOB).await.unwrap(), 1);
}

#[tokio::test]
async fn undecryptable_record_reports_encryption_error() {
    let h = harness().await;
    h.credentials
        .create(NewPasswordRecord {
            user_id: ALICE,
            description: "corrupt".to_string(),
            encrypted_secret: "not-sealed".to_string(),
            last_modified: Utc::now(),
        })
        .await
        .unwrap();

    let r = h.send(ALICE, "/list").await;
    assert_eq!(r.text, messages::ENCRYPTION_ERROR);
    assert_eq!(r.step, Step::Idle);
}

#[tokio::test]
async fn sqlite_backed_flow_matches_in_memory() {
    let h = TestHarness::builder().with_sqlite().build().await.unwrap();
    save(&h, ALICE, "/save s1 Почта").await;
    let r = h.send(ALICE, "/find почта").await;
    assert_eq!(r.step, Step::InList);
    assert!(r.text.contains(&messages::list_line(1, "Почта", "s1")));
}

#[tokio::test(start_paused = true)]
async fn armed_reminder_fires_once() {
    let h = TestHarness::builder().with_day_millis(10).build().await.unwrap();
    let mut events = h.bus.subscribe();

    h.send_all(ALICE, &["/save pw1 mail", "Да", "3"]).await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let mut due = Vec::new();
    while let Ok(envelope) = events.try_recv() {
        if let BusEvent::ReminderDue(delivery) = envelope.event {
            due.push(delivery);
        }
    }
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].user_id, ALICE);
    assert_eq!(due[0].response.text, messages::reminder_due("mail"));
}

#[tokio::test(start_paused = true)]
async fn deleting_a_record_cancels_its_reminder() {
    let h = TestHarness::builder().with_day_millis(10).build().await.unwrap();
    let mut events = h.bus.subscribe();

    let replies = h.send_all(ALICE, &["/save pw1 mail", "Да", "3"]).await;
    assert_eq!(replies[2].text, messages::reminder_set(1, 3));
    let record = h.credentials.list_by_user(ALICE).await.unwrap()[0].clone();
    let entity = EntityId::password(record.id);
    assert!(h.scheduler.is_scheduled(entity.clone()).await);

    let r = h.send(ALICE, "/delete 1").await;
    assert_eq!(r.text, messages::deleted(1));
    assert!(!h.scheduler.is_scheduled(entity.clone()).await);

    tokio::time::sleep(Duration::from_millis(100)).await;

    let mut seen = Vec::new();
    while let Ok(envelope) = events.try_recv() {
        seen.push(envelope.event);
    }
    assert!(
        seen.iter()
            .any(|e| matches!(e, BusEvent::ReminderCancelled { entity: cancelled } if *cancelled == entity))
    );
    assert!(!seen.iter().any(|e| matches!(e, BusEvent::ReminderDue(_))));
}

#[tokio::test(start_paused = true)]
async fn editing_a_record_cancels_its_reminder() {
    let h = TestHarness::builder().with_day_millis(10).build().await.unwrap();
    let mut events = h.bus.subscribe();

    h.send_all(ALICE, &["/save pw1 mail", "Да", "3"]).await;
    h.send_all(ALICE, &["/edit 1 8 1 mail", "Нет"]).await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    while let Ok(envelope) = events.try_recv() {
        assert!(!matches!(envelope.event, BusEvent::ReminderDue(_)));
    }
}
