//! Renders the accumulated answers into the final MarkdownV2 message.
//!
//! Every interpolated value is escaped independently; the fixed template
//! copy is authored pre-escaped. Required fields missing at render time are
//! an invariant violation of the state machine and fail loudly instead of
//! producing a corrupted message.

use crate::dialog::Flow;
use crate::errors::Error;
use crate::session::Answers;

/// Placeholder for absent optional fields.
pub const NOT_SPECIFIED: &str = "Не вказано";

/// MarkdownV2 punctuation that must be escaped inside interpolated values.
const RESERVED: &[char] = &[
    '*', '_', '[', ']', '(', ')', '~', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Prepends a backslash to every reserved character, order-preserving.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if RESERVED.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, Error> {
    value.ok_or(Error::MissingField(field))
}

/// Renders the regular template: name, contact, group, message, tag.
pub fn format_regular(answers: &Answers) -> Result<String, Error> {
    let name = required(answers.name.as_deref(), "name")?;
    let contact = required(answers.contact.as_deref(), "contact")?;
    let group = required(answers.group.as_deref(), "group")?;
    let tag = answers.tag.ok_or(Error::MissingField("tag"))?;
    let message = answers.final_message.as_deref().unwrap_or(NOT_SPECIFIED);

    Ok(format!(
        "Нове повідомлення:\n\n\
         👤 *Ім'я:* {}\n\
         📞 *Контакт:* {}\n\
         📚 *Група:* {}\n\
         📩 *Повідомлення:* {}\n\
         🏷 *Тег:* {}",
        escape_markdown(name),
        escape_markdown(contact),
        escape_markdown(group),
        escape_markdown(message),
        escape_markdown(tag.label()),
    ))
}

/// Renders the anonymous template: message, contact, tag.
pub fn format_anonymous(answers: &Answers) -> Result<String, Error> {
    let tag = answers.tag.ok_or(Error::MissingField("tag"))?;
    let message = answers.final_message.as_deref().unwrap_or(NOT_SPECIFIED);
    let contact = answers.contact.as_deref().unwrap_or(NOT_SPECIFIED);

    Ok(format!(
        "Анонімне повідомлення:\n\n\
         📩 *Повідомлення:* {}\n\
         📞 *Контакт:* {}\n\
         🏷 *Тег:* {}",
        escape_markdown(message),
        escape_markdown(contact),
        escape_markdown(tag.label()),
    ))
}

pub fn render(flow: Flow, answers: &Answers) -> Result<String, Error> {
    match flow {
        Flow::Regular => format_regular(answers),
        Flow::Anonymous => format_anonymous(answers),
    }
}
