#![allow(non_snake_case)]

use std::env;

use scheduleBot::cli;
use scheduleBot::config::AppConfig;

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

#[tokio::main]
async fn main() {
    let config = match env::var("CONFIG_FILE") {
        Ok(path) => AppConfig::from_file(&path).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    };

    let get_prop = |key: &str| -> Option<String> {
        config.get(key).or_else(|| env::var(key).ok())
    };

    // No conversation state exists until the credential check passes.
    let Some(api_key) = get_prop("GEMINI_API_KEY") else {
        println!("Please set the GEMINI_API_KEY environment variable.");
        std::process::exit(1);
    };
    let model = get_prop("GEMINI_MODEL").unwrap_or(DEFAULT_GEMINI_MODEL.to_string());

    cli::cli(api_key, model).await;
}
