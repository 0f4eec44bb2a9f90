use clap::{Parser, Subcommand};
use chrono::Local;
use inquire::Text;
use std::sync::Arc;

use crate::handlers::chat::ChatEngine;
use crate::handlers::tools::{ListEventsArgs, ToolCall, ToolDispatcher};
use crate::models::event;
use crate::models::profile;
use crate::service::gemini_service::GeminiService;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    // Interactive conversation with the assistant (the default).
    Chat {},
    // Print the stored schedule without calling the model.
    List {},
}

pub async fn cli(api_key: String, model: String) {
    // Fine to panic here
    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Chat {}) {
        Commands::Chat {} => chat_loop(api_key, model).await,
        Commands::List {} => list_schedule(),
    }
}

fn list_schedule() {
    let mut schedule = event::load_schedule();
    let mut user_profile = profile::load_profile();
    let today = Local::now().date_naive();
    let call = ToolCall::ListEvents(ListEventsArgs::default());
    match ToolDispatcher::dispatch(&mut schedule, &mut user_profile, call, today) {
        Ok(listing) => println!("{}", listing),
        Err(e) => println!("Failed to list events: {}", e),
    }
}

async fn chat_loop(api_key: String, model: String) {
    let schedule = event::load_schedule();
    let user_profile = profile::load_profile();
    let today = Local::now().date_naive();

    println!("Chat with {}. Type 'exit' to quit.", model);
    let client = Arc::new(GeminiService::new(api_key, model));
    let mut engine = ChatEngine::new(client, schedule, user_profile, today);

    loop {
        let user_input = match specify_input() {
            Ok(input) => input,
            Err(e) => {
                println!("No user input supplied: {}", e);
                return;
            }
        };
        if user_input.eq_ignore_ascii_case("exit") {
            return;
        }

        let today = Local::now().date_naive();
        match engine.handle_turn(&user_input, today).await {
            Ok(replies) => {
                for reply in replies {
                    println!("Gemini: {}", reply);
                }
            }
            Err(e) => {
                // Transport and persistence failures are not retried.
                println!("Chat request failed: {}", e);
                return;
            }
        }
    }
}

fn specify_input() -> Result<String, Box<dyn std::error::Error>> {
    Ok(Text::new("You:").prompt()?)
}
