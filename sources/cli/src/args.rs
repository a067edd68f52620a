use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true)]
    /// Log every native call as it is dispatched
    pub trace: bool,

    #[arg(long, global = true)]
    /// Refuse modules that contain malformed signature keys
    pub strict: bool,

    #[arg(long, global = true)]
    /// Check every descriptor's slot count against its signature while bootstrapping
    pub check_slots: bool,

    #[arg(short, long, global = true, action = ArgAction::Count)]
    /// More logging, repeat for even more
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the registered signatures
    List {
        #[arg(long)]
        /// Only print signatures containing this text
        filter: Option<String>,
    },

    /// Validate every registered key and slot count
    Check,

    /// Print the signatures still bound to trap bodies
    Coverage,

    /// Call a native method on a fresh main thread and print what happened
    Call {
        /// Full signature, e.g. java/lang/Math.abs(I)I
        signature: String,

        #[arg(allow_hyphen_values = true)]
        /// Arguments in call order: 123, 123L, 1.5, 1.5F, true, null or "text"
        args: Vec<String>,

        #[arg(long("this"))]
        /// Pass a fresh object of this class as the receiver
        this: Option<String>,
    },
}
