use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Compact,
}

#[derive(Parser)]
#[command(name = "userfeed")]
#[command(about = "Browse a paginated user directory from the terminal", version)]
#[command(after_help = "EXAMPLES:
    userfeed browse                   Scroll through users, loading pages on demand
    userfeed list --limit 50          Print the first 50 users
    userfeed list --all --json        Dump every user as JSON")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json, compact)
    #[arg(long, short = 'o', global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Output as JSON (alias for --format json)
    #[arg(long, global = true, hide = true)]
    pub json: bool,

    /// Suppress informational messages
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Show debug logs and detailed error information
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Get the effective output format, considering --json flag
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scroll through users with infinite loading
    #[command(
        alias = "b",
        after_help = "KEYS (type a key and press enter):
    j / k        one row down / up
    d / <enter>  page down
    u            page up
    g / G        top / bottom
    r            retry or refresh
    q            quit

EXAMPLES:
    userfeed browse
    userfeed browse --rows 8"
    )]
    Browse(BrowseArgs),
    /// Print users without the interactive viewer
    #[command(
        alias = "ls",
        after_help = "EXAMPLES:
    userfeed list
    userfeed list --limit 100
    userfeed list --all --format compact"
    )]
    List(ListArgs),
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    userfeed completions bash > ~/.bash_completion.d/userfeed
    userfeed completions zsh > ~/.zfunc/_userfeed
    userfeed completions fish > ~/.config/fish/completions/userfeed.fish")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Initialize configuration file interactively
    #[command(after_help = "EXAMPLES:
    userfeed init")]
    Init,
}

#[derive(Args, Clone, Debug)]
pub struct BrowseArgs {
    /// Number of user cards visible at once (default from config, else 5)
    #[arg(long, short, value_parser = clap::value_parser!(u16).range(1..=50))]
    pub rows: Option<u16>,
}

#[derive(Args, Clone, Debug)]
pub struct ListArgs {
    /// Minimum number of users to fetch; whole pages are fetched
    #[arg(long, short, default_value = "25")]
    pub limit: usize,

    /// Fetch every page
    #[arg(long, conflicts_with = "limit")]
    pub all: bool,
}

impl ListArgs {
    pub fn limit(&self) -> Option<usize> {
        (!self.all).then_some(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_json_flag_overrides_format() {
        let cli = Cli::parse_from(["userfeed", "list", "--json"]);
        assert_eq!(cli.output_format(), OutputFormat::Json);

        let cli = Cli::parse_from(["userfeed", "-o", "compact", "list"]);
        assert_eq!(cli.output_format(), OutputFormat::Compact);
    }

    #[test]
    fn test_list_limit() {
        let cli = Cli::parse_from(["userfeed", "list", "--limit", "40"]);
        let Commands::List(args) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(args.limit(), Some(40));

        let cli = Cli::parse_from(["userfeed", "list", "--all"]);
        let Commands::List(args) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(args.limit(), None);
    }

    #[test]
    fn test_browse_rows_range() {
        assert!(Cli::try_parse_from(["userfeed", "browse", "--rows", "0"]).is_err());
        let cli = Cli::parse_from(["userfeed", "browse", "-r", "8"]);
        let Commands::Browse(args) = cli.command else {
            panic!("expected browse command");
        };
        assert_eq!(args.rows, Some(8));
    }
}
