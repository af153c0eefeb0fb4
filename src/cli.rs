//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for `repoprobe`.
#[derive(Debug, Parser)]
#[command(
    name = "repoprobe",
    version,
    about = "Summarise a user's representative JavaScript/TypeScript repository"
)]
pub struct Cli {
    /// Log at debug level (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Cache behaviour shared by commands that hit the code host.
#[derive(Debug, Clone, Copy, Args)]
pub struct CacheArgs {
    /// Ignore cached responses for this run; fresh results are still cached.
    #[arg(long)]
    pub no_cache: bool,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a user's formatted public profile as JSON.
    Profile {
        /// Login to look up.
        username: String,
        #[command(flatten)]
        cache: CacheArgs,
    },
    /// Scan the user's representative repository and print its summary.
    Analyse {
        /// Login to probe.
        username: String,
        #[command(flatten)]
        cache: CacheArgs,
        /// Maximum number of files to fetch (defaults to `REPOPROBE_FILE_BUDGET`).
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        budget: Option<u64>,
        /// Print the full analysis as JSON instead of the summary text.
        #[arg(long)]
        json: bool,
    },
    /// Ask the language model a question about the user's repository.
    Ask {
        /// Login to probe.
        username: String,
        /// Free-text question.
        question: String,
        #[command(flatten)]
        cache: CacheArgs,
    },
    /// Serve `/fetch` and `/analyse` over HTTP.
    Serve {
        /// Address to listen on.
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: String,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_analyse_with_options() {
        let cli = Cli::parse_from(["repoprobe", "analyse", "octocat", "--no-cache", "--budget", "5", "--json"]);
        match cli.command {
            Command::Analyse { username, cache, budget, json } => {
                assert_eq!(username, "octocat");
                assert!(cache.no_cache);
                assert_eq!(budget, Some(5));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_budget() {
        assert!(Cli::try_parse_from(["repoprobe", "analyse", "octocat", "--budget", "0"]).is_err());
    }

    #[test]
    fn serve_has_default_address_and_verbose_is_global() {
        let cli = Cli::parse_from(["repoprobe", "serve", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Serve { ref addr } if addr == "127.0.0.1:8080"));
    }

    #[test]
    fn ask_requires_a_question() {
        assert!(Cli::try_parse_from(["repoprobe", "ask", "octocat"]).is_err());
        let cli = Cli::parse_from(["repoprobe", "ask", "octocat", "What framework?"]);
        assert!(matches!(cli.command, Command::Ask { ref question, .. } if question == "What framework?"));
    }
}
