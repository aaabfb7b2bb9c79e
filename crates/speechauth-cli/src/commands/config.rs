// Rust guideline compliant 2026-10-18

//! Implementation of the `speechauth config` command.

use crate::OutputFormatter;
use speechauth_core::Config;

const REDACTED: &str = "[redacted]";

/// Returns a copy of the configuration with service keys replaced.
pub fn redacted(config: &Config) -> Config {
    let mut config = config.clone();
    for key in [&mut config.speech.key, &mut config.document.key] {
        if key.is_some() {
            *key = Some(REDACTED.to_string());
        }
    }
    config
}

/// Prints the effective configuration.
pub fn execute(config: &Config, formatter: &dyn OutputFormatter) {
    println!("{}", formatter.format_config(&redacted(config)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_redacted() {
        let mut config = Config::default();
        config.speech.key = Some("speech-secret".to_string());
        let shown = redacted(&config);
        assert_eq!(shown.speech.key.as_deref(), Some("[redacted]"));
        assert_eq!(shown.document.key, None);
        assert_eq!(shown.voices, config.voices);
    }
}
