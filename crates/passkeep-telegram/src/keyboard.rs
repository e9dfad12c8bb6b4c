// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply keyboards per conversation step.
//!
//! Resting steps show the command menu, choice steps show their fixed
//! vocabulary, and free-text steps remove the keyboard.

use passkeep_agent::commands::{COMMANDS, CommandKind};
use passkeep_core::types::{Agreement, Complexity, SortOrder, Step};
use teloxide::types::{KeyboardButton, KeyboardMarkup, ReplyMarkup};

/// Buttons per row in the command menu.
const MENU_COLUMNS: usize = 3;

/// Button labels for `step`, row by row. `None` means "remove the keyboard".
pub fn rows_for_step(step: Step) -> Option<Vec<Vec<&'static str>>> {
    match step {
        Step::Idle | Step::InList => Some(menu_rows()),
        Step::GenerateStep2 | Step::EditStep3 => Some(vec![Complexity::LABELS.to_vec()]),
        Step::SortStep1 => Some(vec![SortOrder::LABELS.to_vec()]),
        Step::ReminderOffer | Step::ClearStep1 => Some(vec![Agreement::LABELS.to_vec()]),
        Step::GenerateStep1
        | Step::SaveStep1
        | Step::SaveStep2
        | Step::EditStep1
        | Step::EditStep2
        | Step::EditStep4
        | Step::DeleteStep1
        | Step::FindStep1
        | Step::RemindStep1
        | Step::RemindStep2
        | Step::RecoveryPhraseStep1 => None,
    }
}

/// The first alias of every command that has one, in table order.
fn menu_rows() -> Vec<Vec<&'static str>> {
    let labels: Vec<&'static str> = COMMANDS
        .iter()
        .filter(|command| command.kind != CommandKind::Start)
        .filter_map(|command| command.aliases.first().copied())
        .collect();
    labels.chunks(MENU_COLUMNS).map(<[_]>::to_vec).collect()
}

pub fn reply_markup(step: Step) -> ReplyMarkup {
    match rows_for_step(step) {
        Some(rows) => {
            let buttons = rows
                .into_iter()
                .map(|row| row.into_iter().map(KeyboardButton::new).collect::<Vec<_>>());
            ReplyMarkup::Keyboard(KeyboardMarkup::new(buttons).resize_keyboard())
        }
        None => ReplyMarkup::kb_remove(),
    }
}

#[cfg(test)]
mod tests {
    use passkeep_agent::commands;

    use super::*;

    #[test]
    fn resting_steps_show_every_command_alias() {
        let rows = rows_for_step(Step::Idle).expect("menu");
        let labels: Vec<&str> = rows.concat();
        assert!(labels.contains(&"Генерировать"));
        assert!(labels.contains(&"Очистить"));
        assert!(rows.iter().all(|row| row.len() <= MENU_COLUMNS));
        assert_eq!(rows_for_step(Step::InList), Some(rows));
    }

    #[test]
    fn every_menu_label_resolves_to_a_command() {
        for label in rows_for_step(Step::Idle).expect("menu").concat() {
            let command = commands::find(label).expect("label should resolve");
            assert!(command.accepts(0), "{label} must work without parameters");
        }
    }

    #[test]
    fn choice_steps_offer_their_vocabulary() {
        assert_eq!(
            rows_for_step(Step::GenerateStep2),
            Some(vec![vec!["Низкая", "Средняя", "Высокая"]])
        );
        assert_eq!(rows_for_step(Step::EditStep3), rows_for_step(Step::GenerateStep2));
        assert_eq!(
            rows_for_step(Step::SortStep1),
            Some(vec![vec!["По дате", "По описанию"]])
        );
        assert_eq!(rows_for_step(Step::ClearStep1), Some(vec![vec!["Да", "Нет"]]));
        assert_eq!(rows_for_step(Step::ReminderOffer), rows_for_step(Step::ClearStep1));
    }

    #[test]
    fn vocabulary_labels_parse_back() {
        for label in Complexity::LABELS {
            assert!(Complexity::parse(label).is_some());
        }
        for label in SortOrder::LABELS {
            assert!(SortOrder::parse(label).is_some());
        }
        for label in Agreement::LABELS {
            assert!(Agreement::parse(label).is_some());
        }
    }

    #[test]
    fn free_text_steps_remove_the_keyboard() {
        assert_eq!(rows_for_step(Step::SaveStep1), None);
        assert_eq!(rows_for_step(Step::RecoveryPhraseStep1), None);
        assert!(matches!(reply_markup(Step::FindStep1), ReplyMarkup::KeyboardRemove(_)));
        assert!(matches!(reply_markup(Step::Idle), ReplyMarkup::Keyboard(_)));
    }
}
