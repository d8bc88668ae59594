//
//  gerrit-cli
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Module
//!
//! Every command result is reported as one `✅ <summary>` line. In verbose
//! mode the full resource follows as indented JSON, which is what scripts
//! should parse.
//!
//! ```rust,ignore
//! use gerrit_cli::output::OutputWriter;
//!
//! let writer = OutputWriter::new(verbose);
//! writer.write_item(&format!("Project Name: {name}."), &info)?;
//! ```

mod json;

pub use json::*;

use console::style;
use serde::Serialize;

/// Writes command results to stdout and diagnostics to stderr.
#[derive(Debug, Clone, Copy)]
pub struct OutputWriter {
    verbose: bool,
    color: bool,
}

impl OutputWriter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            color: console::colors_enabled(),
        }
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Prints `✅ msg`.
    pub fn write_success(&self, msg: &str) {
        if self.color {
            println!("✅ {}", style(msg).bold());
        } else {
            println!("✅ {}", msg);
        }
    }

    /// Prints `✅ summary` and, in verbose mode, `value` as indented JSON.
    pub fn write_item<T: Serialize + ?Sized>(&self, summary: &str, value: &T) -> anyhow::Result<()> {
        self.write_success(summary);
        if self.verbose {
            println!("{}", to_indent_json(value)?);
        }
        Ok(())
    }

    pub fn write_warning(&self, msg: &str) {
        if self.color {
            eprintln!("{} {}", style("warning:").yellow().bold(), msg);
        } else {
            eprintln!("warning: {}", msg);
        }
    }
}
