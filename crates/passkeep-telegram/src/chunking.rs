// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Splitting long replies into Telegram-sized messages.
//!
//! Limits count characters, not bytes: descriptions are often Cyrillic.

/// Splits text at a paragraph boundary at or before `max_chars` characters.
///
/// Priority: double newline > single newline > space > hard split.
pub fn split_at_paragraph_boundary(text: &str, max_chars: usize) -> (&str, &str) {
    let Some((limit, _)) = text.char_indices().nth(max_chars) else {
        return (text, "");
    };
    let search_region = &text[..limit];

    if let Some(pos) = search_region.rfind("\n\n") {
        return (&text[..pos], text[pos + 2..].trim_start());
    }
    if let Some(pos) = search_region.rfind('\n') {
        return (&text[..pos], text[pos + 1..].trim_start());
    }
    if let Some(pos) = search_region.rfind(' ') {
        return (&text[..pos], &text[pos + 1..]);
    }
    (&text[..limit], &text[limit..])
}

/// Splits `text` into parts of at most `max_chars` characters.
///
/// Empty input yields no parts.
pub fn split_message(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut parts = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let (head, tail) = split_at_paragraph_boundary(rest, max_chars);
        if head.is_empty() {
            // Boundary at position 0; fall back to a hard split.
            let (limit, _) = rest.char_indices().nth(max_chars).unwrap_or((rest.len(), ' '));
            parts.push(&rest[..limit]);
            rest = &rest[limit..];
            continue;
        }
        parts.push(head);
        rest = tail;
    }
    parts
}
