//! Builders for test configs and raw email messages.

#![allow(dead_code)]

use jobtrail::config::schema::{Config, PhraseSetConfig};
use jobtrail::ScanMode;

/// Builder for `Config` instances.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Starts from the built-in defaults.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn mail_root(mut self, root: &str) -> Self {
        self.config.mail.root = root.to_string();
        self
    }

    pub fn store(mut self, store: &str) -> Self {
        self.config.mail.store = Some(store.to_string());
        self
    }

    pub fn window_days(mut self, days: u32) -> Self {
        self.config.window_days = days;
        self
    }

    pub fn full_scan(mut self) -> Self {
        self.config.scan_mode = ScanMode::FullScan;
        self
    }

    pub fn acknowledgment_phrases(mut self, phrases: &[&str]) -> Self {
        self.config.acknowledgment = PhraseSetConfig {
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
            ..self.config.acknowledgment
        };
        self
    }

    pub fn sheet_name(mut self, name: &str) -> Self {
        self.config.ledger.sheet_name = name.to_string();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for RFC 5322 message text.
pub struct MessageBuilder {
    from: String,
    subject: Option<String>,
    date: Option<String>,
    body: String,
    attachment: Option<String>,
    calendar: bool,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self {
            from: "Acme Corp <hr@acme.com>".to_string(),
            subject: Some("Hello".to_string()),
            date: Some("Fri, 23 Feb 2024 09:30:00 +0000".to_string()),
            body: "Hi there.".to_string(),
            attachment: None,
            calendar: false,
        }
    }

    pub fn from(mut self, from: &str) -> Self {
        self.from = from.to_string();
        self
    }

    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.to_string());
        self
    }

    pub fn no_subject(mut self) -> Self {
        self.subject = None;
        self
    }

    /// RFC 2822 date header value.
    pub fn date(mut self, date: &str) -> Self {
        self.date = Some(date.to_string());
        self
    }

    pub fn no_date(mut self) -> Self {
        self.date = None;
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    pub fn attachment(mut self, filename: &str) -> Self {
        self.attachment = Some(filename.to_string());
        self
    }

    /// Makes the item a calendar invite instead of mail.
    pub fn calendar(mut self) -> Self {
        self.calendar = true;
        self
    }

    pub fn build(&self) -> String {
        let mut headers = format!("From: {}\r\nTo: me@example.com\r\n", self.from);
        if let Some(subject) = &self.subject {
            headers.push_str(&format!("Subject: {subject}\r\n"));
        }
        if let Some(date) = &self.date {
            headers.push_str(&format!("Date: {date}\r\n"));
        }
        headers.push_str("MIME-Version: 1.0\r\n");

        if self.calendar {
            return format!(
                "{headers}Content-Type: text/calendar; charset=utf-8; method=REQUEST\r\n\r\n\
                 BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n"
            );
        }

        match &self.attachment {
            None => format!(
                "{headers}Content-Type: text/plain; charset=utf-8\r\n\r\n{}\r\n",
                self.body
            ),
            Some(filename) => format!(
                "{headers}Content-Type: multipart/mixed; boundary=\"XYZ\"\r\n\r\n\
                 --XYZ\r\nContent-Type: text/plain; charset=utf-8\r\n\r\n{body}\r\n\
                 --XYZ\r\nContent-Type: application/pdf\r\n\
                 Content-Disposition: attachment; filename=\"{filename}\"\r\n\
                 Content-Transfer-Encoding: base64\r\n\r\nJVBERi0xLjQK\r\n\
                 --XYZ--\r\n",
                body = self.body
            ),
        }
    }
}

impl Default for MessageBuilder {
    fn default() -> Self {
        Self::new()
    }
}
