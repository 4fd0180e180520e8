// src/client/repl.rs
// Terminal rendition of the chat page

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::path::PathBuf;

use super::affordance::{Affordance, AffordanceFlags};
use super::api::ChatClient;
use super::page::{ChatPage, GREETING, GREETING_PROMPT, Message};
use crate::web::types::PageConfig;

/// What a line of input asks for
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    Quit,
    New,
    Affordance(Affordance),
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let word = line.trim().strip_prefix('/')?;
        Some(match word {
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            "new" => Self::New,
            other => match Affordance::from_command(other) {
                Some(affordance) => Self::Affordance(affordance),
                None => Self::Unknown(other.to_string()),
            },
        })
    }
}

pub struct Repl {
    editor: DefaultEditor,
    client: ChatClient,
    page: ChatPage,
    config: PageConfig,
    history_path: PathBuf,
}

impl Repl {
    pub fn new(client: ChatClient, config: PageConfig) -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            client,
            page: ChatPage::new(),
            config,
            history_path: crate::config::config_dir().join("chat_history"),
        })
    }

    fn load_history(&mut self) {
        if self.history_path.exists() {
            let _ = self.editor.load_history(&self.history_path);
        }
    }

    fn save_history(&mut self) {
        if let Some(parent) = self.history_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = self.editor.save_history(&self.history_path);
    }

    /// Read one message. A trailing backslash continues onto the next line,
    /// standing in for Shift+Enter.
    fn read_input(&mut self) -> std::result::Result<String, ReadlineError> {
        let mut buffer = String::new();
        let mut prompt = ">>> ";
        loop {
            let line = self.editor.readline(prompt)?;
            match line.strip_suffix('\\') {
                Some(head) => {
                    buffer.push_str(head);
                    buffer.push('\n');
                    prompt = "... ";
                }
                None => {
                    buffer.push_str(&line);
                    return Ok(buffer);
                }
            }
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.load_history();

        println!("{}", GREETING);
        println!("{}", GREETING_PROMPT);
        println!("Model: {}  (/help for commands, Ctrl+D to exit)", self.config.model_display_name);
        println!();

        loop {
            let input = match self.read_input() {
                Ok(input) => input,
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            };

            if !input.trim().is_empty() {
                self.editor.add_history_entry(input.as_str())?;
            }

            match Command::parse(&input) {
                Some(Command::Quit) => break,
                Some(command) => self.handle_command(command).await,
                None => self.exchange(input).await,
            }
        }

        self.save_history();
        if let Err(e) = self.client.end_session().await {
            tracing::debug!(error = %e, "Could not end session");
        }
        println!("Goodbye!");
        Ok(())
    }

    async fn exchange(&mut self, input: String) {
        self.page.set_input(input);
        let Some(text) = self.page.submit() else {
            return;
        };

        println!("  ...");
        let outcome = self.client.send(&text).await;
        self.page.resolve(outcome);

        if let Some(reply) = self.page.latest() {
            render_reply(reply, &self.config.affordances);
        }
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Help => {
                println!("Commands:");
                println!("  /help        - Show this help");
                println!("  /new         - Start a new conversation");
                println!("  /model       - Show the model selector");
                println!("  /like /dislike /retry /share - Reply actions");
                println!("  /quit        - Exit");
                println!("End a line with \\ to continue on the next line.");
            }
            Command::New => {
                if let Err(e) = self.client.end_session().await {
                    tracing::debug!(error = %e, "Could not end session");
                }
                self.page = ChatPage::new();
                println!("Started a new conversation.");
            }
            Command::Affordance(Affordance::ModelSelect) => {
                println!("Models:");
                println!("  * {}", self.config.model_display_name);
                if let Err(e) = self.config.affordances.invoke(Affordance::ModelSelect) {
                    println!("  ({})", e);
                }
            }
            Command::Affordance(affordance) => {
                if !self.config.affordances.is_enabled(affordance) {
                    println!("{} is disabled", affordance.name());
                } else if let Err(e) = self.config.affordances.invoke(affordance) {
                    println!("{}", e);
                }
            }
            Command::Unknown(word) => println!("Unknown command: /{}", word),
            Command::Quit => {}
        }
    }
}

fn render_reply(reply: &Message, affordances: &AffordanceFlags) {
    println!();
    println!("{}", reply.text);

    let actions: Vec<&str> = Affordance::REPLY_ACTIONS
        .iter()
        .filter(|a| affordances.is_enabled(**a))
        .map(|a| a.name())
        .collect();
    if !actions.is_empty() {
        println!("  [{}]", actions.join(" | "));
    }
    println!();
}
