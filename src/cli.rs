use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "pakmap")]
#[command(version)]
#[command(about = "Extract embedded pak listings from game executables", long_about = None)]
#[command(after_help = "Examples:\n  \
  pakmap DR1_us.exe              write dr1_us.mappings.json to the current directory\n  \
  pakmap -p DR2_us.exe | jq .    print the mapping as JSON on stdout\n  \
  pakmap -l https://example.com/DR1_us.exe   list paks from a remote image")]
pub struct Cli {
    /// Executable image path or HTTP URL
    #[arg(value_name = "FILE")]
    pub file: String,

    /// List paks and file counts, write nothing
    #[arg(short = 'l')]
    pub list: bool,

    /// Write the mapping to stdout, no messages
    #[arg(short = 'p')]
    pub pipe: bool,

    /// Write the mapping file into DIR
    #[arg(short = 'd', value_name = "DIR")]
    pub output_dir: Option<String>,

    /// Quiet mode
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_http_url(&self) -> bool {
        self.file.starts_with("http://") || self.file.starts_with("https://")
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.pipe
    }
}
