// src/cli.rs

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "diary - A single-user web diary with bracket tags",
    long_about = "diary serves dated Markdown entries from a local SQLite file. Tags come from [tag] groups in the entry title. The public pages are read-only; a password-protected admin page creates, edits and deletes entries."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Creates the diary database and its table.
    Init {
        #[arg(long, env = "DIARY_DB", help = "Path of the SQLite file (default: ~/.config/diary/diary.db)")]
        db: Option<PathBuf>,
    },

    /// Runs the web server.
    Serve(ServeArgs),

    /// Prints the SHA-256 digest of an admin password.
    /// Pass the output as --admin-password-hash or DIARY_ADMIN_PASSWORD_HASH.
    /// If no password is given it is read from stdin.
    HashPassword {
        #[arg(short, long, help = "The password to hash")]
        password: Option<String>,
    },

    /// Prints tag counts and one page of entries, like the public index.
    List {
        #[arg(long, env = "DIARY_DB", help = "Path of the SQLite file (default: ~/.config/diary/diary.db)")]
        db: Option<PathBuf>,

        #[arg(short, long, help = "Only list entries carrying this tag")]
        tag: Option<String>,

        #[arg(short, long, help = "Page number, starting at 1")]
        page: Option<usize>,
    },

    /// Prints one entry with its tags and Markdown body.
    Show {
        #[arg(help = "The numeric ID of the entry")]
        id: i64,

        #[arg(long, env = "DIARY_DB", help = "Path of the SQLite file (default: ~/.config/diary/diary.db)")]
        db: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Listen address: ip:port, a bare ip (port 8080) or localhost:port.
    #[arg(long, env = "DIARY_LISTEN", default_value = "127.0.0.1:8080")]
    pub listen: String,

    /// Path of the SQLite file (default: ~/.config/diary/diary.db).
    #[arg(long, env = "DIARY_DB")]
    pub db: Option<PathBuf>,

    /// Hex SHA-256 digest of the admin password (see `diary hash-password`).
    #[arg(long, env = "DIARY_ADMIN_PASSWORD_HASH", hide_env_values = true)]
    pub admin_password_hash: Option<String>,

    /// UTC offset used for diary dates, e.g. +09:00.
    #[arg(long, env = "DIARY_UTC_OFFSET", default_value = "+09:00", allow_hyphen_values = true)]
    pub utc_offset: String,

    /// Entries per page on the public index.
    #[arg(long, env = "DIARY_PAGE_SIZE", default_value_t = crate::paging::DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
}
