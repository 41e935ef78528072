use crate::agent::Conversation;
use crate::cli::HistoryCommand;
use crate::commands::{confirm, load_preferences, open_store};
use crate::config::Config;
use crate::error::Result;
use crate::providers::Role;
use crate::render::transcript::write_transcript;
use colored::Colorize;

/// Handle history commands
pub fn handle_history(config: &Config, command: HistoryCommand) -> Result<()> {
    let store = open_store(config)?;
    let mut conversation = Conversation::new().with_max_persisted(config.history.max_persisted);
    conversation.load(store.as_ref());

    match command {
        HistoryCommand::Show { limit } => {
            if conversation.is_empty() {
                println!("{}", "No conversation history found.".yellow());
                return Ok(());
            }

            let messages = match limit {
                Some(n) => conversation.history_window(n),
                None => conversation.messages(),
            };

            println!();
            for message in messages {
                let label = match message.role {
                    Role::User => "You".cyan().bold(),
                    Role::Assistant => format!("{}'s AI", config.assistant.name).green().bold(),
                    Role::System => continue,
                };
                println!("{}: {}", label, message.content);
            }
            println!();
            println!(
                "{} of {} stored messages",
                messages.len(),
                conversation.len()
            );
        }
        HistoryCommand::Clear { yes } => {
            if !yes && !confirm("Clear all chat history?")? {
                println!("Cancelled.");
                return Ok(());
            }
            conversation.clear(store.as_ref())?;
            println!("{}", "Chat history cleared.".green());
        }
        HistoryCommand::Export { output } => {
            let theme = load_preferences(config, store.as_ref()).theme;
            write_transcript(
                &output,
                conversation.messages(),
                &config.assistant.name,
                theme,
            )?;
            println!(
                "{}",
                format!(
                    "Exported {} messages to {}",
                    conversation.len(),
                    output.display()
                )
                .green()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SledStore;

    fn config_in(dir: &tempfile::TempDir) -> Config {
        let mut config = Config::default();
        config.storage.path = Some(dir.path().join("store").display().to_string());
        config
    }

    fn seed(config: &Config) {
        let store = SledStore::open(config.storage.path.as_deref()).unwrap();
        let mut conversation = Conversation::new();
        conversation.append_user("tell me a joke");
        conversation.append_assistant("Why did the **chicken** cross the road?");
        conversation.persist(&store).unwrap();
    }

    #[test]
    fn test_show_on_empty_store() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = config_in(&dir);
        assert!(handle_history(&config, HistoryCommand::Show { limit: None }).is_ok());
    }

    #[test]
    fn test_clear_with_yes_removes_history() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = config_in(&dir);
        seed(&config);

        handle_history(&config, HistoryCommand::Clear { yes: true }).unwrap();

        let store = SledStore::open(config.storage.path.as_deref()).unwrap();
        let mut conversation = Conversation::new();
        conversation.load(&store);
        assert!(conversation.is_empty());
    }

    #[test]
    fn test_export_writes_html() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = config_in(&dir);
        seed(&config);
        let output = dir.path().join("chat.html");

        handle_history(
            &config,
            HistoryCommand::Export {
                output: output.clone(),
            },
        )
        .unwrap();

        let html = std::fs::read_to_string(&output).unwrap();
        assert!(html.contains("tell me a joke"));
        assert!(html.contains("<strong>chicken</strong>"));
    }
}
