use clap::Parser;
use std::path::PathBuf;

/// Dump the virtual DECIDER disk into a raw image file
#[derive(Parser)]
pub struct Cli {
    /// Boot option written to DECIDER.CHO, the file stays empty if omitted
    #[arg(long, short)]
    pub choice_type: Option<String>,

    /// Entry id, required when the choice type is `entry_id`
    #[arg(long, short)]
    pub entry_id: Option<String>,

    /// Output directory
    #[arg(long, short = 'O')]
    pub out_dir: PathBuf,

    /// Read the image back and compare it with the virtual disk
    #[arg(long)]
    pub verify: bool,
}
