// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static command table and lookup by verb or keyboard label.

use passkeep_core::PasskeepError;

use self::Arity::{AtLeast, Exact};

/// Every top-level command. Dispatch matches on this exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Start,
    Help,
    Generate,
    Save,
    List,
    Edit,
    Delete,
    Sort,
    Find,
    Remind,
    Recovery,
    Clear,
}

/// Accepted number of parameters after the verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    /// Free-text tails such as descriptions or search text.
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

#[derive(Debug)]
pub struct Command {
    pub kind: CommandKind,
    pub verb: &'static str,
    /// Keyboard labels; each is a single token.
    pub aliases: &'static [&'static str],
    pub arity: &'static [Arity],
    /// Shown by `/help`.
    pub label: &'static str,
}

impl Command {
    pub fn matches(&self, token: &str) -> bool {
        let token = token.to_lowercase();
        self.verb == token || self.aliases.iter().any(|alias| alias.to_lowercase() == token)
    }

    pub fn accepts(&self, param_count: usize) -> bool {
        self.arity.iter().any(|arity| arity.accepts(param_count))
    }
}

pub static COMMANDS: &[Command] = &[
    Command {
        kind: CommandKind::Start,
        verb: "/start",
        aliases: &[],
        arity: &[Exact(0)],
        label: "начать работу",
    },
    Command {
        kind: CommandKind::Help,
        verb: "/help",
        aliases: &["Помощь"],
        arity: &[Exact(0)],
        label: "список команд",
    },
    Command {
        kind: CommandKind::Generate,
        verb: "/generate",
        aliases: &["Генерировать"],
        arity: &[Exact(0), Exact(2)],
        label: "сгенерировать пароль: /generate <длина> <сложность 1-3>",
    },
    Command {
        kind: CommandKind::Save,
        verb: "/save",
        aliases: &["Сохранить"],
        arity: &[Exact(0), AtLeast(2)],
        label: "сохранить пароль: /save <пароль> <описание>",
    },
    Command {
        kind: CommandKind::List,
        verb: "/list",
        aliases: &["Список"],
        arity: &[Exact(0)],
        label: "показать сохранённые пароли",
    },
    Command {
        kind: CommandKind::Edit,
        verb: "/edit",
        aliases: &["Изменить"],
        arity: &[Exact(0), AtLeast(4)],
        label: "заменить пароль новым: /edit <номер> <длина> <сложность> <описание>",
    },
    Command {
        kind: CommandKind::Delete,
        verb: "/delete",
        aliases: &["Удалить"],
        arity: &[Exact(0), Exact(1)],
        label: "удалить пароль: /delete <номер>",
    },
    Command {
        kind: CommandKind::Sort,
        verb: "/sort",
        aliases: &["Сортировать"],
        arity: &[Exact(0), AtLeast(1)],
        label: "отсортировать список: /sort <По дате | По описанию>",
    },
    Command {
        kind: CommandKind::Find,
        verb: "/find",
        aliases: &["Найти"],
        arity: &[Exact(0), AtLeast(1)],
        label: "найти по описанию: /find <текст>",
    },
    Command {
        kind: CommandKind::Remind,
        verb: "/remind",
        aliases: &["Напомнить"],
        arity: &[Exact(0), Exact(2)],
        label: "напомнить сменить пароль: /remind <номер> <дней>",
    },
    Command {
        kind: CommandKind::Recovery,
        verb: "/recovery",
        aliases: &["Фраза"],
        arity: &[Exact(0), AtLeast(1)],
        label: "задать фразу восстановления: /recovery <фраза>",
    },
    Command {
        kind: CommandKind::Clear,
        verb: "/clear",
        aliases: &["Очистить"],
        arity: &[Exact(0)],
        label: "удалить все пароли",
    },
];

/// First command whose verb or alias equals `token`, ignoring case.
pub fn find(token: &str) -> Result<&'static Command, PasskeepError> {
    COMMANDS
        .iter()
        .find(|command| command.matches(token))
        .ok_or_else(|| PasskeepError::CommandNotFound(token.to_string()))
}

/// Resolves `tokens[0]` and checks that the remaining count is accepted.
pub fn find_with_arity(tokens: &[String]) -> Result<&'static Command, PasskeepError> {
    let verb = tokens
        .first()
        .ok_or_else(|| PasskeepError::CommandNotFound(String::new()))?;
    let command = find(verb)?;
    if command.accepts(tokens.len() - 1) {
        Ok(command)
    } else {
        Err(PasskeepError::CommandNotFound(verb.clone()))
    }
}

/// One line per command, in table order.
pub fn help_text() -> String {
    COMMANDS
        .iter()
        .filter(|command| command.kind != CommandKind::Start)
        .map(|command| match command.aliases.first() {
            Some(alias) => format!("{} ({}) - {}", command.verb, alias, command.label),
            None => format!("{} - {}", command.verb, command.label),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn finds_by_verb_and_alias_ignoring_case() {
        assert_eq!(find("/generate").unwrap().kind, CommandKind::Generate);
        assert_eq!(find("/GENERATE").unwrap().kind, CommandKind::Generate);
        assert_eq!(find("Генерировать").unwrap().kind, CommandKind::Generate);
        assert_eq!(find("генерировать").unwrap().kind, CommandKind::Generate);
        assert_eq!(find("фраза").unwrap().kind, CommandKind::Recovery);
    }

    #[test]
    fn unknown_token_is_not_found() {
        assert!(matches!(find("/nope"), Err(PasskeepError::CommandNotFound(t)) if t == "/nope"));
        assert!(matches!(find_with_arity(&[]), Err(PasskeepError::CommandNotFound(_))));
    }

    #[test]
    fn arity_variants_are_enforced() {
        assert!(find_with_arity(&tokens("/generate")).is_ok());
        assert!(find_with_arity(&tokens("/generate 12 3")).is_ok());
        assert!(find_with_arity(&tokens("/generate 12")).is_err());
        assert!(find_with_arity(&tokens("/save secret")).is_err());
        assert!(find_with_arity(&tokens("/save secret my mail box")).is_ok());
        assert!(find_with_arity(&tokens("/edit 1 12 3")).is_err());
        assert!(find_with_arity(&tokens("/edit 1 12 3 new description")).is_ok());
        assert!(find_with_arity(&tokens("/list extra")).is_err());
        assert!(find_with_arity(&tokens("/delete 1 2")).is_err());
    }

    #[test]
    fn every_alias_is_a_single_token() {
        for command in COMMANDS {
            for alias in command.aliases {
                assert_eq!(alias.split_whitespace().count(), 1, "{alias}");
            }
            assert!(command.accepts(0), "{} must support a guided flow", command.verb);
        }
    }

    #[test]
    fn help_lists_every_user_command() {
        let help = help_text();
        assert_eq!(help.lines().count(), COMMANDS.len() - 1);
        assert!(help.contains("/remind (Напомнить)"));
        assert!(!help.contains("/start"));
    }
}
