use std::path::PathBuf;

use clap::Parser;

/// Solve the annuity linear system and report every intermediate result.
#[derive(Debug, Parser)]
#[command(
    name = "linsys",
    version,
    about = "Solve, refine and condition-check a dense linear system"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// System dimension. Overrides `size` from the config file.
    #[arg(short = 'n', long)]
    pub size: Option<usize>,

    /// Report file. Overrides `output` from the config file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the annuity identity check for every row before solving.
    #[arg(long)]
    pub check_identity: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_leave_overrides_unset() {
        let cli = Cli::try_parse_from(["linsys"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(cli.size.is_none());
        assert!(cli.output.is_none());
        assert!(!cli.check_identity);
    }

    #[test]
    fn test_short_and_long_flags() {
        let cli = Cli::try_parse_from([
            "linsys",
            "-n",
            "5",
            "--output",
            "out.txt",
            "-vv",
            "--check-identity",
        ])
        .unwrap();
        assert_eq!(cli.size, Some(5));
        assert_eq!(cli.output, Some(PathBuf::from("out.txt")));
        assert_eq!(cli.verbose, 2);
        assert!(cli.check_identity);
    }

    #[test]
    fn test_rejects_non_numeric_size() {
        assert!(Cli::try_parse_from(["linsys", "--size", "three"]).is_err());
    }
}
