use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};

use story_relay::config::schema::DEFAULT_RECIPIENT;
use story_relay::relay::OutboundMessage;
use story_relay::submission::{screen, RawSubmission};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Operator CLI for the story submission relay", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct StoryArgs {
    #[arg(short, long)]
    title: String,

    #[arg(short, long)]
    story: String,

    #[arg(short, long, default_value = "")]
    location: String,
}

impl StoryArgs {
    fn raw(&self) -> RawSubmission {
        RawSubmission {
            title: self.title.clone(),
            story: self.story.clone(),
            location: self.location.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Sanitize and validate a story locally, showing the rejection reason
    Check(StoryArgs),
    /// Print the message the relay would send to the hook
    Preview {
        #[command(flatten)]
        story: StoryArgs,

        #[arg(long, env = "TELEGRAM_CHAT_ID", default_value = DEFAULT_RECIPIENT)]
        recipient: String,
    },
    /// Post a story to a running relay
    Submit {
        #[arg(short, long, default_value = "http://localhost:8787")]
        url: String,

        #[command(flatten)]
        story: StoryArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check(story) => {
            let report = match screen(&story.raw()) {
                Ok(accepted) => json!({
                    "accepted": true,
                    "title": accepted.fields.title.as_str(),
                    "story": accepted.fields.story.as_str(),
                    "location": accepted.fields.location.as_str(),
                    "slug": accepted.slug.as_str(),
                }),
                Err(rejection) => json!({
                    "accepted": false,
                    "reason": rejection.reason.to_string(),
                }),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Preview { story, recipient } => match screen(&story.raw()) {
            Ok(accepted) => {
                let message = OutboundMessage::build(&accepted, &recipient);
                println!("{}", serde_json::to_string_pretty(&message)?);
            }
            Err(rejection) => {
                eprintln!("Submission would be rejected: {}", rejection.reason);
                std::process::exit(1);
            }
        },
        Commands::Submit { url, story } => {
            let res = reqwest::Client::new()
                .post(&url)
                .json(&json!({
                    "title": story.title,
                    "story": story.story,
                    "location": story.location,
                }))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}\n{}", status, serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}\n{}", status, text),
    }

    if !status.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
