//! Prompt texts and keyboard specs.
//!
//! Texts are MarkdownV2-ready: reserved punctuation inside fixed copy is
//! already escaped, so a transport can hand every outbound message to the
//! markup parser unconditionally.

use crate::dialog::{Flow, Prompt};
use crate::events::{tokens, Button, Keyboard};

/// Top-level menu labels, matched verbatim against inbound text.
pub const MENU_SEND: &str = "Надіслати повідомлення";
pub const MENU_SEND_ANONYMOUS: &str = "Надіслати анонімне повідомлення";

pub(crate) const START_COMMAND: &str = "/start";

pub(crate) const GREETING: &str =
    "Вітаю, шановний студенте\\! Я бот для надсилання повідомлень, побажань та скарг до студентської ради\\. Оберіть опцію нижче:";

const ASK_NAME: &str = "Введіть ваше *ім'я* та *прізвище* \\(Приклад: *Тарас Іваненко*\\):";
const ASK_CONTACT: &str = "Як з вами *зв'язатися*? Залиште ваш контакт\\(Телеграм/Діскорд\\):";
const ASK_GROUP: &str = "Введіть вашу *групу* \\(наприклад, Е\\-14\\):";
const ASK_MEDIA_OR_TEXT: &str = "Надішліть *медіафайл* \\(фото/документ\\) або напишіть *текст* повідомлення:";
const ASK_MESSAGE_OR_MEDIA: &str = "Введіть ваше *повідомлення* або надішліть *медіафайл* \\(фото/документ\\):";
const ASK_MEDIA_CAPTION: &str = "Напишіть *опис* до вашого медіафайлу або надішліть 'Пропустити', щоб залишити порожнім:";
const ASK_TAG: &str = "Оберіть *тег* для повідомлення:";
const ASK_CONFIRMATION: &str = "Бажаєте надіслати це повідомлення?";
const UNSUPPORTED_MEDIA: &str = "Підтримуються лише *текст*, *фото* або *документи*\\. Спробуйте знову\\.";

pub(crate) const CHOOSE_OPTION: &str = "Оберіть опцію нижче:";
pub(crate) const ACK_SENT: &str = "Ваше повідомлення успішно надіслано\\!";
pub(crate) const ACK_SENT_ANONYMOUS: &str = "Ваше анонімне повідомлення успішно надіслано\\!";
pub(crate) const ACK_CANCELLED: &str = "Повертаємося до головного меню\\.";
pub(crate) const SEND_FAILED: &str = "Не вдалося надіслати повідомлення\\. Спробуйте ще раз пізніше\\.";

/// Reply keyboard offering the two flows.
pub fn main_menu() -> Keyboard {
    Keyboard::Reply(vec![vec![MENU_SEND.to_string()], vec![MENU_SEND_ANONYMOUS.to_string()]])
}

pub fn tags_keyboard() -> Keyboard {
    Keyboard::Inline(vec![
        vec![Button::new("Важливо", tokens::TAG_IMPORTANT)],
        vec![Button::new("Скарга", tokens::TAG_COMPLAINT)],
        vec![Button::new("Побажання", tokens::TAG_SUGGESTION)],
    ])
}

pub fn confirmation_keyboard(flow: Flow) -> Keyboard {
    Keyboard::Inline(vec![vec![
        Button::new("Так", flow.confirm_token()),
        Button::new("Ні", flow.cancel_token()),
    ]])
}

pub fn prompt_text(prompt: Prompt, flow: Flow) -> &'static str {
    match prompt {
        Prompt::AskName => ASK_NAME,
        Prompt::AskContact => ASK_CONTACT,
        Prompt::AskGroup => ASK_GROUP,
        // The anonymous tree opens with the message ask, so its wording
        // leads with the text option.
        Prompt::AskMediaOrText => match flow {
            Flow::Regular => ASK_MEDIA_OR_TEXT,
            Flow::Anonymous => ASK_MESSAGE_OR_MEDIA,
        },
        Prompt::AskMediaCaption => ASK_MEDIA_CAPTION,
        Prompt::AskTag => ASK_TAG,
        Prompt::AskConfirmation => ASK_CONFIRMATION,
        Prompt::UnsupportedMedia => UNSUPPORTED_MEDIA,
    }
}

pub fn prompt_keyboard(prompt: Prompt, flow: Flow) -> Option<Keyboard> {
    match prompt {
        Prompt::AskTag => Some(tags_keyboard()),
        Prompt::AskConfirmation => Some(confirmation_keyboard(flow)),
        _ => None,
    }
}

/// Wraps the compiled message for the confirmation step.
pub(crate) fn summary(compiled: &str) -> String {
    format!("Ось підсумкове повідомлення:\n\n{compiled}\n\n{ASK_CONFIRMATION}")
}

pub(crate) fn success_ack(flow: Flow) -> &'static str {
    match flow {
        Flow::Regular => ACK_SENT,
        Flow::Anonymous => ACK_SENT_ANONYMOUS,
    }
}
