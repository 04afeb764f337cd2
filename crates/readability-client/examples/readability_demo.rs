//! Readability API Demo
//!
//! Parses an article with the Parser API, or logs in and bookmarks it with the
//! Reader API.
//!
//! # Usage
//!
//! ```bash
//! # Parse an article
//! READABILITY_PARSER_TOKEN=... cargo run --example readability_demo -- \
//!     parse http://www.example.com/story
//!
//! # Log in and bookmark an article
//! READABILITY_CONSUMER_KEY=... READABILITY_CONSUMER_SECRET=... \
//!     cargo run --example readability_demo -- \
//!     bookmark --username me --password secret http://www.example.com/story
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use readability_client::{Client, Config};

#[derive(Parser, Debug)]
#[command(author, version, about = "Readability API Demo")]
struct Args {
    /// OAuth consumer key
    #[arg(long, env = "READABILITY_CONSUMER_KEY", default_value = "")]
    consumer_key: String,

    /// OAuth consumer secret
    #[arg(long, env = "READABILITY_CONSUMER_SECRET", default_value = "", hide_env_values = true)]
    consumer_secret: String,

    /// Parser API token
    #[arg(long, env = "READABILITY_PARSER_TOKEN", hide_env_values = true)]
    parser_token: Option<String>,

    /// Override every endpoint, e.g. a local mock server
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse an article with the Parser API
    Parse {
        /// Article URL
        url: String,
    },
    /// Log in and bookmark an article with the Reader API
    Bookmark {
        /// Readability username
        #[arg(long)]
        username: String,
        /// Readability password
        #[arg(long)]
        password: String,
        /// Article URL
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = Config::new(args.consumer_key, args.consumer_secret);
    if let Some(token) = args.parser_token {
        config = config.with_parser_api_key(token);
    }
    if let Some(base_url) = args.base_url {
        config = config.with_base_url(base_url);
    }
    let client = Client::new(config)?;

    match args.command {
        Command::Parse { url } => {
            let parser = client.new_parser_client()?;
            let confidence = parser.confidence(&url).await?.into_data();
            info!("Parser confidence for {url}: {confidence}");

            let article = parser.parse(&url).await?.into_data();
            println!("Title:      {}", article.title);
            if let Some(author) = &article.author {
                println!("Author:     {author}");
            }
            println!("Domain:     {}", article.domain);
            println!("Words:      {}", article.word_count);
            println!("Short URL:  {}", article.short_url);
            println!();
            println!("{}", article.excerpt);
        }
        Command::Bookmark {
            username,
            password,
            url,
        } => {
            let token = client
                .login(&username, &password)
                .await
                .context("login failed")?
                .into_data();
            let reader = client.new_reader_client(token.key(), token.secret());

            let response = reader.add_bookmark(&url).await?;
            match response.location() {
                Some(location) => println!("Bookmark created: {location}"),
                None => println!("Bookmark created (status {})", response.status()),
            }
        }
    }

    Ok(())
}
