use super::constants::*;

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    Crawl(String),
    Ask(String),
    Status,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_line(line: &str) -> InputCommand {
    let trimmed = line.trim();
    if !trimmed.starts_with('/') {
        return InputCommand::Ask(line.trim_end_matches(['\r', '\n']).to_string());
    }

    let (command, rest) = trimmed
        .split_once(char::is_whitespace)
        .unwrap_or((trimmed, ""));
    match command {
        CMD_CRAWL => InputCommand::Crawl(rest.trim().to_string()),
        CMD_STATUS => InputCommand::Status,
        CMD_HELP => InputCommand::Help,
        CMD_QUIT | CMD_EXIT => InputCommand::Quit,
        other => InputCommand::Unknown(other.to_string()),
    }
}
