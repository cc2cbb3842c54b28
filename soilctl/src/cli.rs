//! Module describing all possible commands and sub-commands to the `soilctl` main driver
//!
//! We have four main commands, each one going one step further down the pipeline:
//!
//! - `transect` only computes and displays the points;
//! - `fetch` retrieves the raw SoilGrids answers and dumps them as a JSON array;
//! - `table` reduces the answers (fetched or read back from a `fetch` dump) into the four
//!   columns table, displayed or saved as CSV;
//! - `model` fits the linear model over the table (built or read from a CSV file).
//!
//! `completion` is here just to configure the various shells completion system.
//!

use std::path::PathBuf;

use clap::{crate_authors, crate_description, crate_name, crate_version, Parser};
use clap_complete::shells::Shell;

use transect_common::Coordinate;

/// CLI options
#[derive(Parser)]
#[command(disable_version_flag = true)]
#[clap(name = crate_name!(), about = crate_description!())]
#[clap(version = crate_version!(), author = crate_authors!())]
pub struct Opts {
    /// configuration file.
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,
    /// Output file.
    #[clap(short = 'o', long)]
    pub output: Option<PathBuf>,
    /// Hierarchical logging output.
    #[clap(long = "tree")]
    pub use_tree: bool,
    /// Also log into daily files in this directory.
    #[clap(long = "log-file")]
    pub use_file: Option<String>,
    /// Sub-commands (see below).
    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

// ------

/// All sub-commands:
///
/// `completion SHELL`
/// `fetch [--from LAT,LON] [--to LAT,LON] [-n N] [--async]`
/// `model [--csv FILE] [fetch options]`
/// `table [-i FILE] [fetch options]`
/// `transect [--from LAT,LON] [--to LAT,LON] [-n N]`
/// `version`
///
#[derive(Debug, Parser)]
pub enum SubCommand {
    /// Generate Completion stuff
    Completion(ComplOpts),
    /// Fetch raw soil data along the transect
    Fetch(FetchOpts),
    /// Fit the linear model over the soil table
    Model(ModelOpts),
    /// Reduce soil data into a table
    Table(TableOpts),
    /// Display the transect points
    Transect(TransectOpts),
    /// List all package versions.
    Version,
}

// ------

/// Where to sample.  Anything not given comes from the configuration file or the defaults.
///
#[derive(Clone, Debug, Default, Parser)]
pub struct TransectOpts {
    /// Start point as LAT,LON
    #[clap(short = 'f', long = "from", allow_hyphen_values = true)]
    pub from: Option<Coordinate>,
    /// End point as LAT,LON
    #[clap(short = 't', long = "to", allow_hyphen_values = true)]
    pub to: Option<Coordinate>,
    /// Number of points, both ends included
    #[clap(short = 'n', long)]
    pub points: Option<usize>,
}

// ------

/// Options for fetching data.
///
#[derive(Clone, Debug, Default, Parser)]
pub struct FetchOpts {
    #[clap(flatten)]
    pub transect: TransectOpts,
    /// Run several requests at once
    #[clap(long = "async")]
    pub concurrent: bool,
    /// Max number of requests in flight with --async
    #[clap(short = 'j', long)]
    pub max_connections: Option<usize>,
}

// ------

/// Options for the `table` command.
///
#[derive(Clone, Debug, Default, Parser)]
pub struct TableOpts {
    #[clap(flatten)]
    pub fetch: FetchOpts,
    /// Read raw records from this JSON file instead of fetching them
    #[clap(short = 'i', long)]
    pub input: Option<PathBuf>,
}

// ------

/// Options for the `model` command.
///
#[derive(Clone, Debug, Default, Parser)]
pub struct ModelOpts {
    #[clap(flatten)]
    pub table: TableOpts,
    /// Read the table from this CSV file instead of building it
    #[clap(long)]
    pub csv: Option<PathBuf>,
}

// ------

/// Options to generate completion files at runtime
///
#[derive(Debug, Parser)]
pub struct ComplOpts {
    #[clap(value_parser)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn test_opts_verify() {
        Opts::command().debug_assert();
    }

    #[test]
    fn test_opts_table() {
        let opts = Opts::try_parse_from([
            "soilctl", "-o", "out.csv", "table", "--from", "56.225297,8.662215", "--to",
            "-55.958103,-9.35439", "-n", "3", "--async",
        ])
        .unwrap();

        match opts.subcmd {
            SubCommand::Table(t) => {
                assert_eq!(Some(3), t.fetch.transect.points);
                assert_eq!(Some(Coordinate::new(-55.958103, -9.35439)), t.fetch.transect.to);
                assert!(t.fetch.concurrent);
            }
            _ => panic!("wrong sub-command"),
        }
    }

    #[rstest]
    #[case(&["soilctl", "transect"])]
    #[case(&["soilctl", "-c", "soilctl.hcl", "fetch", "--async", "-j", "2"])]
    #[case(&["soilctl", "--tree", "table", "-i", "raw.json"])]
    #[case(&["soilctl", "model", "--csv", "soil.csv"])]
    #[case(&["soilctl", "completion", "bash"])]
    #[case(&["soilctl", "version"])]
    fn test_opts_subcommands(#[case] args: &[&str]) {
        assert!(Opts::try_parse_from(args).is_ok());
    }

    #[test]
    fn test_opts_bad_coordinate() {
        let opts = Opts::try_parse_from(["soilctl", "transect", "--from", "56.2"]);
        assert!(opts.is_err());
    }
}
