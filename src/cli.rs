//! CLI argument scanning
//!
//! The surface is `verstamp <version-string> [path...] [Release]`. The
//! tokens are scanned by hand rather than mapped to clap options so that
//! argument errors produce the documented exit code instead of clap's usage
//! error: empty tokens are ignored, any token equal to `Release` toggles
//! release mode, the first remaining token is the version string, and the
//! rest are candidate paths.

use std::path::PathBuf;

use clap::Parser;

use verstamp::driver::RunRequest;
use verstamp::error::{Error, Result};

/// Stamp derived version numbers into .NET project and package metadata files
#[derive(Parser, Debug)]
#[command(name = "verstamp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Version string, candidate paths, and an optional literal `Release`
    #[arg(value_name = "ARG")]
    args: Vec<String>,
}

impl Cli {
    /// Scan the raw tokens into a run request.
    pub fn into_request(self) -> Result<RunRequest> {
        let mut release = false;
        let mut tokens = Vec::new();

        for arg in self.args {
            if arg.trim().is_empty() {
                continue;
            }
            if arg == "Release" {
                release = true;
            } else {
                tokens.push(arg);
            }
        }

        let mut tokens = tokens.into_iter();
        let version = tokens.next().ok_or_else(|| Error::Arguments {
            message: "no version token supplied".to_string(),
        })?;
        let paths = tokens.map(PathBuf::from).collect();

        Ok(RunRequest {
            version,
            paths,
            release,
        })
    }
}
