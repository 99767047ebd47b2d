//! Conversion of RFC 5322 messages into [`RawMessage`] records.

use chrono::DateTime;
use log::debug;
use mail_parser::{Message, MessageParser as MimeParser, MimeHeaders};

use super::error::{MailError, Result};
use super::{ItemKind, RawMessage};

/// Parses raw message bytes into the fields the extractor reads.
#[derive(Debug, Default, Clone)]
pub struct MessageParser;

impl MessageParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, raw: &[u8]) -> Result<RawMessage> {
        let message = MimeParser::default()
            .parse(raw)
            .ok_or_else(|| MailError::Parse("Failed to parse email message".to_string()))?;

        let sender = message.from().and_then(|addr| addr.first());

        let raw_message = RawMessage {
            kind: item_kind(&message),
            received_at: message
                .date()
                .and_then(|d| DateTime::parse_from_rfc3339(&d.to_rfc3339()).ok()),
            subject: message.subject().map(|s| s.to_string()),
            body: message.body_text(0).map(|b| b.into_owned()),
            sender_name: sender.and_then(|a| a.name()).map(|s| s.to_string()),
            sender_email: sender.and_then(|a| a.address()).map(|s| s.to_string()),
            attachment_count: u32::try_from(message.attachment_count()).ok(),
        };

        debug!(
            "Parsed message subject={:?} received={:?}",
            raw_message.subject(),
            raw_message.received_at
        );

        Ok(raw_message)
    }
}

/// Classifies the folder item by its top-level content type. Calendar
/// invitations and delivery reports share folders with mail but are not mail.
fn item_kind(message: &Message) -> ItemKind {
    let Some(content_type) = message.parts.first().and_then(|p| p.content_type()) else {
        return ItemKind::Mail;
    };

    let ctype = content_type.ctype().to_ascii_lowercase();
    let subtype = content_type
        .subtype()
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();

    match (ctype.as_str(), subtype.as_str()) {
        ("text", "calendar") => ItemKind::Calendar,
        ("multipart", "report") | ("message", _) => ItemKind::Other,
        _ => ItemKind::Mail,
    }
}
