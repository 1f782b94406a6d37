//! Cache command implementation.
//!
//! Provides `toolrig cache list`, `toolrig cache delete` and `toolrig cache clear`.

use anyhow::Result;
use clap::{Args, Subcommand};
use std::io::Write;

use crate::provision::CacheDirectory;

use super::dispatcher::{Command, CommandResult};

/// Arguments for the cache command.
#[derive(Debug, Clone, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheSubcommand,
}

/// Cache subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum CacheSubcommand {
    /// List cached entries.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Delete one cached entry.
    Delete {
        /// Entry name, e.g. `tools`.
        name: String,
    },
    /// Delete every cached entry.
    Clear,
}

/// The cache command implementation.
pub struct CacheCommand<'a> {
    cache: &'a CacheDirectory,
    args: CacheArgs,
}

impl<'a> CacheCommand<'a> {
    /// Create a new cache command.
    pub fn new(cache: &'a CacheDirectory, args: CacheArgs) -> Self {
        Self { cache, args }
    }
}

impl Command for CacheCommand<'_> {
    fn execute(&self, out: &mut dyn Write) -> crate::error::Result<CommandResult> {
        let exit_code = match &self.args.command {
            CacheSubcommand::List { json } => list_cache(self.cache, *json, out)?,
            CacheSubcommand::Delete { name } => delete_entry(self.cache, name, out)?,
            CacheSubcommand::Clear => clear_cache(self.cache, out)?,
        };

        Ok(if exit_code == 0 {
            CommandResult::success()
        } else {
            CommandResult::failure(exit_code)
        })
    }
}

fn list_cache(cache: &CacheDirectory, json: bool, out: &mut dyn Write) -> Result<i32> {
    let entries = cache.list()?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
        return Ok(0);
    }

    if entries.is_empty() {
        writeln!(out, "Cache is empty ({})", cache.root().display())?;
        return Ok(0);
    }

    writeln!(out, "{} cached entries in {}:", entries.len(), cache.root().display())?;
    for entry in &entries {
        let modified = entry
            .modified
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "  {:<24} {:>12} bytes  {}",
            entry.name, entry.size_bytes, modified
        )?;
    }
    let total: u64 = entries.iter().map(|e| e.size_bytes).sum();
    writeln!(out, "Total: {} bytes", total)?;

    Ok(0)
}

fn delete_entry(cache: &CacheDirectory, name: &str, out: &mut dyn Write) -> Result<i32> {
    if cache.delete(name)? {
        writeln!(out, "Deleted {}", name)?;
        Ok(0)
    } else {
        writeln!(out, "No cached entry named {}", name)?;
        Ok(1)
    }
}

fn clear_cache(cache: &CacheDirectory, out: &mut dyn Write) -> Result<i32> {
    let cleared = cache.clear()?;
    if cleared == 0 {
        writeln!(out, "Cache is already empty")?;
    } else {
        writeln!(out, "Cleared {} entries", cleared)?;
    }
    Ok(0)
}
