use crate::config::*;
use crate::error::{Error, Result};
use crate::structs::RawStatusMessage;
use crate::time;

use std::fmt;

/// Service alert ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub priority: String,
    pub title: String,
    pub content: String,
    pub from: String,
    pub to: String,
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}\n{} - {}\n{}",
            self.priority, self.title, self.from, self.to, self.content
        )
    }
}

pub fn normalize_status(messages: &[RawStatusMessage]) -> Result<Vec<StatusMessage>> {
    messages.iter().map(normalize_message).collect()
}

fn normalize_message(message: &RawStatusMessage) -> Result<StatusMessage> {
    // validity windows get appended when an alert is extended, the last one reaches furthest
    let validity = message.timestamps.validity.last().ok_or(Error::MissingValidity)?;

    Ok(StatusMessage {
        priority: message.priority.clone(),
        title: message.subtitle.clone(),
        content: message.content.clone(),
        from: display_time(&message.timestamps.creation)?,
        to: display_time(&validity.to)?,
    })
}

fn display_time(value: &str) -> Result<String> {
    let (date, clock) = time::date_and_time(&time::parse(value)?, STATUS_DATE_FORMAT, STATUS_TIME_FORMAT);
    Ok(format!("{} {}", date, clock))
}
