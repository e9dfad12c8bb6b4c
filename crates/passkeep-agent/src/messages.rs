// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing texts.

use passkeep_core::ValidationError;

pub const WELCOME: &str = "Привет! Я храню ваши пароли в зашифрованном виде.";
pub const HELP_HEADER: &str = "Доступные команды:";
pub const INVALID_COMMAND: &str =
    "Неизвестная команда или неверные параметры. Отправьте /help, чтобы увидеть список команд.";
pub const GENERIC_FAILURE: &str = "Что-то пошло не так. Попробуйте ещё раз.";
pub const ENCRYPTION_ERROR: &str = "Ошибка шифрования. Попробуйте ещё раз.";
pub const NOT_FOUND: &str = "Пароль с таким номером не найден.";

pub const COMPLEXITY_PROMPT: &str = "Выберите сложность: 1 - Низкая, 2 - Средняя, 3 - Высокая.";
pub const COMPLEXITY_ERROR: &str = "Сложность должна быть 1, 2 или 3 (Низкая, Средняя, Высокая).";

pub const SECRET_PROMPT: &str = "Введите пароль, который нужно сохранить:";
pub const SECRET_ERROR: &str = "Пароль не должен содержать пробелов. Введите его ещё раз:";
pub const DESCRIPTION_PROMPT: &str = "Введите описание пароля:";
pub const REMINDER_OFFER: &str = "Напомнить о смене пароля? (Да/Нет)";
pub const REMINDER_DECLINED: &str = "Хорошо, без напоминания.";

pub const INDEX_PROMPT: &str = "Введите номер пароля из списка:";
pub const EMPTY_LIST: &str = "У вас пока нет сохранённых паролей.";
pub const LIST_HEADER: &str = "Ваши пароли:";

pub const SORT_PROMPT: &str = "Как отсортировать список? «По дате» или «По описанию».";
pub const SORT_ERROR: &str = "Выберите «По дате» или «По описанию».";
pub const FIND_PROMPT: &str = "Введите текст для поиска по описанию:";
pub const NOTHING_FOUND: &str = "Ничего не найдено.";

pub const AGREEMENT_ERROR: &str = "Ответьте «Да» или «Нет».";
pub const EMPTY_INPUT: &str = "Сообщение не должно быть пустым.";

pub const RECOVERY_PROMPT: &str = "Введите фразу восстановления:";
pub const RECOVERY_SAVED: &str = "Фраза восстановления сохранена.";
pub const RECOVERY_AVAILABLE: &str = "Фразу восстановления снова можно сменить.";

pub const CLEAR_CONFIRM: &str = "Удалить все сохранённые пароли? (Да/Нет)";
pub const CLEAR_CANCELLED: &str = "Удаление отменено.";

pub fn length_prompt(min: usize, max: usize) -> String {
    format!("Введите длину пароля (от {min} до {max}):")
}

pub fn length_error(min: usize, max: usize) -> String {
    format!("Длина пароля должна быть числом от {min} до {max}.")
}

pub fn generated(password: &str) -> String {
    format!("Сгенерированный пароль: {password}")
}

pub fn saved(index: usize) -> String {
    format!("Пароль сохранён под номером {index}.\n{REMINDER_OFFER}")
}

pub fn edited(index: usize, password: &str) -> String {
    format!("Пароль №{index} заменён на: {password}\n{REMINDER_OFFER}")
}

pub fn deleted(index: usize) -> String {
    format!("Пароль №{index} удалён.")
}

pub fn list_line(index: usize, description: &str, secret: &str) -> String {
    format!("{index}. {description}: {secret}")
}

pub fn days_prompt(min: u32, max: u32) -> String {
    format!("Через сколько дней напомнить? (от {min} до {max})")
}

pub fn days_error(min: u32, max: u32) -> String {
    format!("Количество дней должно быть числом от {min} до {max}.")
}

pub fn reminder_set(index: usize, days: u32) -> String {
    format!("Напомню сменить пароль №{index} через {days} дн.")
}

pub fn reminder_due(description: &str) -> String {
    format!("Пора сменить пароль «{description}».")
}

pub fn cooldown(remaining_days: i64) -> String {
    format!("Фразу восстановления можно будет сменить через {remaining_days} дн.")
}

pub fn cleared(count: usize) -> String {
    format!("Удалено паролей: {count}.")
}

/// Text for a rejected input, shared by retrying steps and one-shot commands.
pub fn validation(err: &ValidationError) -> String {
    match err {
        ValidationError::Length { min, max } => length_error(*min, *max),
        ValidationError::Complexity => COMPLEXITY_ERROR.to_string(),
        ValidationError::Index => NOT_FOUND.to_string(),
        ValidationError::Days { min, max } => days_error(*min, *max),
        ValidationError::SortType => SORT_ERROR.to_string(),
        ValidationError::Agreement => AGREEMENT_ERROR.to_string(),
        ValidationError::Secret => SECRET_ERROR.to_string(),
        ValidationError::Empty => EMPTY_INPUT.to_string(),
    }
}
