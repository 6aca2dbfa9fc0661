use clap::Parser;

use crate::scanner::DEFAULT_MAX_FILE_SIZE;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory path to scan
    pub dir_path: String,

    /// Output file path
    #[arg(default_value = "output.json", short)]
    pub output_file: String,

    /// Maximum recursion depth (0 means no recursion)
    #[arg(short, long, default_value = "50")]
    pub max_depth: usize,

    /// Exclude patterns (glob patterns like "*.tmp" or "node_modules")
    #[arg(short, long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Image name attached to the OS package analysis
    #[arg(long)]
    pub image: Option<String>,

    /// JSON file with the installed RPM package records to analyze
    #[arg(long)]
    pub rpm_packages: Option<String>,

    /// Enabled package repositories, recorded as identity qualifiers
    #[arg(long, value_delimiter = ',')]
    pub repositories: Vec<String>,

    /// Skip files larger than this many bytes when building the snapshot
    #[arg(long, default_value_t = DEFAULT_MAX_FILE_SIZE)]
    pub max_file_size: u64,

    /// Suppress the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}
