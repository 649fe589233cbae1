//! Man page generation for the hidden `rpmdeplint man OUT_DIR` maintenance
//! subcommand.

use std::fs;
use std::path::Path;

use clap::{Command as ClapCommand, CommandFactory};

use crate::cli::Cli;
use crate::error::Error;

/// Renders a man page for `rpmdeplint` and each of its subcommands into
/// `out_dir`, one `.1` file per command, named `rpmdeplint[-subcommand].1`.
pub fn generate(out_dir: &Path) -> Result<(), Error> {
    fs::create_dir_all(out_dir)?;
    render(&Cli::command(), out_dir, "rpmdeplint")
}

fn render(command: &ClapCommand, out_dir: &Path, name: &str) -> Result<(), Error> {
    let mut buffer = Vec::new();
    clap_mangen::Man::new(command.clone().name(name)).render(&mut buffer)?;
    fs::write(out_dir.join(format!("{name}.1")), buffer)?;

    for subcommand in command.get_subcommands() {
        if subcommand.is_hide_set() {
            continue;
        }
        let sub_name = format!("{name}-{}", subcommand.get_name());
        render(subcommand, out_dir, &sub_name)?;
    }

    Ok(())
}
