use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use learnhub_config::FileFormat;
use learnhub_core::{CourseFilter, CourseStatus, StudentCourse};
use uuid::Uuid;

mod commands;
mod utils;
use commands::{
    cmd_approve, cmd_courses, cmd_enroll, cmd_init, cmd_progress, cmd_requests, cmd_schema,
    cmd_serve, cmd_stats, cmd_status, cmd_unenroll, cmd_users,
};
use utils::{connect_client, load_config};

/// learnhub command-line interface.
#[derive(Parser, Debug)]
#[command(name = "learnhub", author, version, about)]
struct Cli {
    /// Config file; defaults to learnhub.{json,yaml,yml} in the current directory.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct Remote {
    /// Base URL of a running learnhub server.
    #[arg(long, default_value = "http://localhost:4000")]
    server: String,
}

#[derive(Args, Debug)]
struct Pair {
    #[arg(long)]
    student: Uuid,
    #[arg(long)]
    course: Uuid,
    #[command(flatten)]
    remote: Remote,
}

impl Pair {
    fn ids(&self) -> StudentCourse {
        StudentCourse::new(self.student, self.course)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default config file.
    Init {
        #[arg(short, long, value_enum, default_value_t)]
        format: FileFormat,
    },
    /// Run the HTTP API.
    Serve,
    /// Show the effective config and database contents.
    Status,
    /// Print the JSON Schema of the config file.
    Schema,
    /// List courses.
    Courses {
        /// Case-insensitive search over title and description.
        #[arg(short, long)]
        query: Option<String>,
        #[arg(long)]
        status: Option<CourseStatus>,
        #[command(flatten)]
        remote: Remote,
    },
    /// List users.
    Users {
        #[command(flatten)]
        remote: Remote,
    },
    /// List pending access requests.
    Requests {
        #[arg(long)]
        student: Option<Uuid>,
        #[command(flatten)]
        remote: Remote,
    },
    /// Enroll a student in a course.
    Enroll(Pair),
    /// Remove a student from a course.
    Unenroll(Pair),
    /// Approve a pending access request.
    Approve(Pair),
    /// Show a student's progress through a course.
    Progress(Pair),
    /// Show dashboard totals.
    Stats {
        #[command(flatten)]
        remote: Remote,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Init { format } => cmd_init(format).map(|_| ()),
        Commands::Schema => cmd_schema(),
        Commands::Serve => cmd_serve(load_config(config_path)?).await,
        Commands::Status => cmd_status(&load_config(config_path)?).await.map(|_| ()),
        Commands::Courses {
            query,
            status,
            remote,
        } => {
            let client = connect_client(&remote.server, &load_config(config_path)?)?;
            let filter = CourseFilter { q: query, status };
            cmd_courses(&client, filter).await.map(|_| ())
        }
        Commands::Users { remote } => {
            let client = connect_client(&remote.server, &load_config(config_path)?)?;
            cmd_users(&client).await.map(|_| ())
        }
        Commands::Requests { student, remote } => {
            let client = connect_client(&remote.server, &load_config(config_path)?)?;
            cmd_requests(&client, student).await.map(|_| ())
        }
        Commands::Enroll(pair) => {
            let client = connect_client(&pair.remote.server, &load_config(config_path)?)?;
            cmd_enroll(&client, pair.ids()).await
        }
        Commands::Unenroll(pair) => {
            let client = connect_client(&pair.remote.server, &load_config(config_path)?)?;
            cmd_unenroll(&client, pair.ids()).await
        }
        Commands::Approve(pair) => {
            let client = connect_client(&pair.remote.server, &load_config(config_path)?)?;
            cmd_approve(&client, pair.ids()).await
        }
        Commands::Progress(pair) => {
            let client = connect_client(&pair.remote.server, &load_config(config_path)?)?;
            cmd_progress(&client, pair.student, pair.course)
                .await
                .map(|_| ())
        }
        Commands::Stats { remote } => {
            let client = connect_client(&remote.server, &load_config(config_path)?)?;
            cmd_stats(&client).await.map(|_| ())
        }
    }
}
