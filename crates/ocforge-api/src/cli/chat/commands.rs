//! Slash commands available while chatting with a character.

use console::style;

#[derive(Debug, PartialEq, Eq)]
pub enum ChatCommand {
    Help,
    /// Clear the terminal screen.
    Clear,
    Exit,
    /// Reprint the transcript so far.
    History,
    /// Show the character's persona.
    Persona,
    /// End the session; the chat closes with it.
    SignOut,
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    let name = trimmed.strip_prefix('/')?;
    let name = name.split_whitespace().next().unwrap_or_default().to_lowercase();

    Some(match name.as_str() {
        "help" | "h" | "?" => ChatCommand::Help,
        "clear" | "cls" => ChatCommand::Clear,
        "exit" | "quit" | "q" => ChatCommand::Exit,
        "history" => ChatCommand::History,
        "persona" | "who" => ChatCommand::Persona,
        "signout" | "logout" => ChatCommand::SignOut,
        _ => ChatCommand::Unknown(format!("/{name}")),
    })
}

pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (command, description) in [
        ("/help", "Show this help message"),
        ("/persona", "Show who you are talking to"),
        ("/history", "Show the conversation so far"),
        ("/clear", "Clear the screen"),
        ("/signout", "Sign out and end the chat"),
        ("/exit", "End the chat"),
    ] {
        println!("  {:<10} {description}", style(command).cyan());
    }
    println!();
    println!("  {}", style("Ctrl+D to exit").dim());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!(parse("/h"), Some(ChatCommand::Help));
        assert_eq!(parse("/QUIT"), Some(ChatCommand::Exit));
        assert_eq!(parse("  /who  "), Some(ChatCommand::Persona));
        assert_eq!(parse("/history please"), Some(ChatCommand::History));
        assert_eq!(parse("/logout"), Some(ChatCommand::SignOut));
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("hello there"), None);
        assert_eq!(parse("and/or"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse("/dance"), Some(ChatCommand::Unknown("/dance".to_string())));
        assert_eq!(parse("/"), Some(ChatCommand::Unknown("/".to_string())));
    }
}
