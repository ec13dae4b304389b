use clap::Parser;

#[derive(Parser)]
#[command(name = "discsync")]
#[command(about = "Synchronize a Discogs collection with an Elasticsearch index")]
#[command(version)]
pub struct Cli {
    /// Discogs user to import from (defaults to DISCOGS_USERNAME)
    #[arg(short, long)]
    pub user: Option<String>,

    /// Emit logs as JSON instead of the human-readable format
    #[arg(long)]
    pub json_logs: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_flag() {
        let cli = Cli::parse_from(["discsync", "--user", "rodney"]);
        assert_eq!(cli.user.as_deref(), Some("rodney"));
        assert!(!cli.json_logs);
    }

    #[test]
    fn test_user_defaults_to_configured_identity() {
        let cli = Cli::parse_from(["discsync"]);
        assert!(cli.user.is_none());
    }
}
