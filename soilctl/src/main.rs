use std::io;

use clap::{crate_authors, crate_description, crate_version, CommandFactory, Parser};
use clap_complete::generate;
use eyre::Result;
use tracing::{info, trace};

use process_data::Ols;
use soilctl::{
    build_table, fetch_transect, records_to_json, run_model, show_transect, write_output,
    write_table, Opts, SoilConfig, SubCommand,
};
use transect_common::init_logging;

/// Binary name, using a different binary name
pub const NAME: &str = env!("CARGO_BIN_NAME");
/// Binary version
pub const VERSION: &str = crate_version!();
/// Authors
pub const AUTHORS: &str = crate_authors!();

fn main() -> Result<()> {
    let opts = Opts::parse();

    // Initialise logging.
    //
    init_logging(NAME, opts.use_tree, opts.use_file.clone())?;

    // Config is optional, defaults are used without one.
    //
    let cfg = SoilConfig::load(opts.config.as_deref())?;

    // Banner
    //
    banner()?;

    handle_subcmd(&cfg, &opts)
}

pub fn handle_subcmd(cfg: &SoilConfig, opts: &Opts) -> Result<()> {
    let output = opts.output.as_deref();

    match &opts.subcmd {
        // Handle `transect`
        //
        SubCommand::Transect(topts) => {
            trace!("transect");

            let str = show_transect(cfg, topts)?;
            write_output(output, &str)?;
        }

        // Handle `fetch`
        //
        SubCommand::Fetch(fopts) => {
            trace!("fetch");

            let report = fetch_transect(cfg, fopts)?;
            write_output(output, &records_to_json(&report)?)?;
        }

        // Handle `table`
        //
        SubCommand::Table(topts) => {
            trace!("table");

            let table = build_table(cfg, topts)?;
            write_table(&table, output)?;
        }

        // Handle `model`
        //
        SubCommand::Model(mopts) => {
            trace!("model");

            let model = Ols::default();
            info!("Fitting {}", model.formula());

            let summary = run_model(cfg, mopts, &model)?;
            write_output(output, &summary.to_string())?;
        }

        // Standalone completion generation
        //
        // NOTE: you can generate UNIX shells completion on Windows and vice-versa.
        //
        SubCommand::Completion(copts) => {
            let generator = copts.shell;
            generate(generator, &mut Opts::command(), NAME, &mut io::stdout());
        }

        // Standalone `version` command
        //
        SubCommand::Version => {
            eprintln!("Modules: ");
            eprintln!("\t{}", soilctl::version());
            eprintln!("\t{}", transect_common::version());
            eprintln!("\t{}", transect_sources::version());
            eprintln!("\t{}", process_data::version());
        }
    }
    Ok(())
}

/// Display banner
///
fn banner() -> Result<()> {
    Ok(eprintln!(
        r##"
{}/{} by {}
{}
"##,
        NAME,
        VERSION,
        AUTHORS,
        crate_description!()
    ))
}
