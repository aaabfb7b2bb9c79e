// Rust guideline compliant 2026-10-18

//! Implementation of the `speechauth ssml` command.

use crate::OutputFormatter;
use speechauth_app::Result;
use speechauth_core::{podcast_script_to_ssml, Error as CoreError, PodcastScript};
use std::collections::BTreeMap;
use std::io::Read;

/// Reads a podcast script from a file, or stdin for `-`.
///
/// # Errors
///
/// Returns an error if the input cannot be read.
pub fn read_script(path: &str) -> Result<String> {
    let mut content = String::new();
    if path == "-" {
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(CoreError::from)?;
    } else {
        content = std::fs::read_to_string(path).map_err(CoreError::from)?;
    }
    Ok(content)
}

/// Converts podcast script JSON to SSML.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or a speaker has no voice.
pub fn run(script_json: &str, voices: &BTreeMap<String, String>) -> Result<String> {
    let script = PodcastScript::from_json(script_json)?;
    Ok(podcast_script_to_ssml(&script, voices)?)
}

/// Reads a podcast script and prints its SSML.
///
/// # Errors
///
/// See [`read_script`] and [`run`].
pub fn execute(
    path: &str,
    voices: &BTreeMap<String, String>,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let ssml = run(&read_script(path)?, voices)?;
    println!("{}", formatter.format_ssml(&ssml));
    Ok(())
}
