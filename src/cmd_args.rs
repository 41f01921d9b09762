use clap::Parser;
use clap_complete::Shell;

/// cycle-level simulator of a CNN accelerator datapath
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// extra config files, merged over configs/default.toml in order
    pub config_names: Vec<String>,

    /// print a shell completion script and exit
    #[clap(long = "generate", arg_enum)]
    pub generator: Option<Shell>,
}
