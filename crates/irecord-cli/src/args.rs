use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "irecord", version, about = "Innovation Record admin CLI")]
pub struct Cli {
    /// Emit JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// Store database path (default: .irecord/irecord.db)
    #[arg(long, global = true, default_value = ".irecord/irecord.db")]
    pub store: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Validate a candidate schema file and list every rule violation.
    Validate {
        /// Schema JSON file.
        schema: String,
    },

    /// Operate on record documents.
    Document {
        #[command(subcommand)]
        command: DocumentCommand,
    },

    /// Operate on the published schema registry.
    Schema {
        #[command(subcommand)]
        command: SchemaCommand,
    },

    /// Run environment checks.
    Doctor,
}

#[derive(Subcommand, Debug, Clone)]
pub enum DocumentCommand {
    /// Strip fields the schema no longer knows. With --strict, also validate
    /// every value against its question's declared shape.
    Cleanup {
        /// Document JSON file.
        document: String,
        /// Record version to clean against (default: the document's own).
        #[arg(long)]
        version: Option<String>,
        #[arg(long)]
        strict: bool,
        /// Write the result to a file instead of stdout.
        #[arg(long)]
        out: Option<String>,
    },

    /// Replace coded answers with human-readable labels.
    Translate {
        document: String,
        #[arg(long)]
        version: Option<String>,
        #[arg(long)]
        out: Option<String>,
    },

    /// Lift a document to the latest record version.
    Migrate {
        document: String,
        #[arg(long)]
        out: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum SchemaCommand {
    /// Validate and append a schema revision to the registry.
    Publish {
        /// Schema JSON file.
        schema: String,
        /// Version label for the new revision (e.g. 202304).
        #[arg(long)]
        version: String,
    },

    /// List published revisions.
    List,
}
