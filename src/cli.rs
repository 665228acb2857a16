//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use mediaserver_core::{DEFAULT_CHUNK_SIZE, DEFAULT_LINKS_FILE};

/// Harvest and fetch direct media links from a media server channel tree.
///
/// `links` walks a channel and its sub-channels and saves one direct link per
/// video. `fetch` downloads a saved link list in concurrent chunks.
#[derive(Parser, Debug)]
#[command(name = "mediaserver-dl")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Walk a channel tree and save the direct download links
    Links(LinksArgs),
    /// Download the files of a saved link list in chunks
    Fetch(FetchArgs),
}

/// Arguments for `links`.
#[derive(Args, Debug)]
pub struct LinksArgs {
    /// Path to the JSON client configuration (SERVER_URL, API_KEY, TIMEOUT, VERIFY_SSL)
    #[arg(long, value_name = "PATH")]
    pub conf: PathBuf,

    /// Root channel oid
    #[arg(long, value_name = "OID")]
    pub channel: String,

    /// File the link list is written to
    #[arg(short, long, default_value = DEFAULT_LINKS_FILE)]
    pub output: PathBuf,

    /// Delay between item resolutions in milliseconds (0 to disable, max 60000)
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub pace_ms: u64,
}

/// Arguments for `fetch`.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Link list produced by `links`
    #[arg(short, long, default_value = DEFAULT_LINKS_FILE)]
    pub links: PathBuf,

    /// Files downloaded concurrently per chunk (at least 1)
    #[arg(short = 'c', long, default_value_t = DEFAULT_CHUNK_SIZE as u16, value_parser = clap::value_parser!(u16).range(1..))]
    pub chunk_size: u16,

    /// Zero-based chunk to resume from
    #[arg(short = 's', long, default_value_t = 0)]
    pub start_chunk: usize,

    /// Directory the files are saved to
    #[arg(short = 'd', long, default_value = ".")]
    pub output_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links_args(cli: Cli) -> LinksArgs {
        match cli.command {
            Command::Links(args) => args,
            Command::Fetch(_) => panic!("expected links subcommand"),
        }
    }

    fn fetch_args(cli: Cli) -> FetchArgs {
        match cli.command {
            Command::Fetch(args) => args,
            Command::Links(_) => panic!("expected fetch subcommand"),
        }
    }

    #[test]
    fn test_cli_links_defaults() {
        let cli = Cli::try_parse_from([
            "mediaserver-dl",
            "links",
            "--conf",
            "msc.json",
            "--channel",
            "c1",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        let args = links_args(cli);
        assert_eq!(args.conf, PathBuf::from("msc.json"));
        assert_eq!(args.channel, "c1");
        assert_eq!(args.output, PathBuf::from("download.json"));
        assert_eq!(args.pace_ms, 500);
    }

    #[test]
    fn test_cli_links_requires_conf_and_channel() {
        let err = Cli::try_parse_from(["mediaserver-dl", "links", "--channel", "c1"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let err = Cli::try_parse_from(["mediaserver-dl", "links", "--conf", "a.json"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_links_pace_over_max_rejected() {
        let err = Cli::try_parse_from([
            "mediaserver-dl",
            "links",
            "--conf",
            "a.json",
            "--channel",
            "c1",
            "--pace-ms",
            "60001",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_fetch_defaults() {
        let args = fetch_args(Cli::try_parse_from(["mediaserver-dl", "fetch"]).unwrap());
        assert_eq!(args.links, PathBuf::from("download.json"));
        assert_eq!(args.chunk_size, 5);
        assert_eq!(args.start_chunk, 0);
        assert_eq!(args.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_cli_fetch_short_flags() {
        let args = fetch_args(
            Cli::try_parse_from([
                "mediaserver-dl", "fetch", "-l", "list.json", "-c", "3", "-s", "2", "-d", "out",
            ])
            .unwrap(),
        );
        assert_eq!(args.links, PathBuf::from("list.json"));
        assert_eq!(args.chunk_size, 3);
        assert_eq!(args.start_chunk, 2);
        assert_eq!(args.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_cli_fetch_chunk_size_zero_rejected() {
        let err = Cli::try_parse_from(["mediaserver-dl", "fetch", "-c", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_fetch_large_chunk_size_accepted() {
        let cli = Cli::try_parse_from(["mediaserver-dl", "fetch", "-c", "250"]).unwrap();
        let args = fetch_args(cli);
        assert_eq!(args.chunk_size, 250);
    }

    #[test]
    fn test_cli_verbose_flag_is_global() {
        let cli = Cli::try_parse_from(["mediaserver-dl", "fetch", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);

        let cli = Cli::try_parse_from(["mediaserver-dl", "-q", "fetch"]).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_cli_missing_subcommand_returns_error() {
        assert!(Cli::try_parse_from(["mediaserver-dl"]).is_err());
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Cli::try_parse_from(["mediaserver-dl", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = Cli::try_parse_from(["mediaserver-dl", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let err = Cli::try_parse_from(["mediaserver-dl", "fetch", "--invalid-flag"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
