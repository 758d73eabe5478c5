use clap::{Parser, Subcommand};
use daily_scoreboard::{GameType, LeaderboardQuery, ScoreEngine};
use std::io::Read;

#[derive(Parser)]
#[command(name = "scoreboard-cli")]
#[command(about = "Daily Scoreboard CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database path
    #[arg(short, long, default_value = "scoreboard.db")]
    db: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse pasted score text without storing it
    Parse {
        /// Score text (read from stdin when omitted)
        text: Option<String>,
    },

    /// Parse and store a score
    Submit {
        /// User id
        #[arg(short, long)]
        user: String,

        /// Score text (read from stdin when omitted)
        text: Option<String>,
    },

    /// Show a game's leaderboard
    Leaderboard {
        /// Game type (wordle, connections, digitparty)
        #[arg(short, long)]
        game: GameType,

        /// Puzzle date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<chrono::NaiveDate>,

        /// Highlight this user's scores
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Get store statistics
    Stats,

    /// Clean up old scores
    Cleanup {
        /// Maximum age in days
        #[arg(short, long, default_value = "365")]
        max_age_days: i64,
    },
}

fn read_text(text: Option<String>) -> anyhow::Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let engine = ScoreEngine::new(&cli.db).await?;

    match cli.command {
        Commands::Parse { text } => {
            let text = read_text(text)?;
            let parsed = engine.parse(&text)?;

            println!("Game: {}", parsed.game_type);
            println!("   Date: {}", parsed.score_data.game_date);
            println!("   Score: {}", parsed.score_data.display_score);
            println!("   Sort key: {}", parsed.score_data.sort_score);
            println!("{}", serde_json::to_string_pretty(&parsed.score_data)?);
        }

        Commands::Submit { user, text } => {
            let text = read_text(text)?;
            let score = engine.submit(&user, &text).await?;

            println!("Stored: {}", score.display());
            println!("   Id: {}", score.id);
        }

        Commands::Leaderboard { game, date, user } => {
            let query = LeaderboardQuery {
                game_type: game,
                game_date: date,
                members: None,
                current_user: user,
            };

            let entries = engine.leaderboard(&query).await?;

            if entries.is_empty() {
                println!("No {} scores yet", game);
            }

            let mut last_date = None;
            for entry in entries {
                if last_date != Some(entry.score.game_date) {
                    println!("\n{}", entry.score.game_date);
                    last_date = Some(entry.score.game_date);
                }
                let marker = if entry.is_current_user { "*" } else { " " };
                println!(
                    "{} {:>3}. {:<24} {}",
                    marker,
                    entry.position,
                    entry.score.user_id,
                    entry.score.display_score()
                );
            }
        }

        Commands::Stats => {
            let stats = engine.stats().await?;

            println!("Store Statistics:");
            println!("   Total scores: {}", stats.total_scores);
            println!("   Players: {}", stats.distinct_users);
            for game in GameType::ALL {
                let count = stats.by_game.get(&game).copied().unwrap_or(0);
                println!("   {}: {}", game, count);
            }

            if let Some(oldest) = stats.oldest_entry {
                println!("   Oldest entry: {}", oldest.format("%Y-%m-%d %H:%M:%S"));
            }

            if let Some(newest) = stats.newest_entry {
                println!("   Newest entry: {}", newest.format("%Y-%m-%d %H:%M:%S"));
            }
        }

        Commands::Cleanup { max_age_days } => {
            println!("Cleaning up scores older than {} days...", max_age_days);

            let deleted = engine.cleanup(max_age_days).await?;

            println!("Deleted {} scores", deleted);
        }
    }

    Ok(())
}
