// Rust guideline compliant 2026-10-18

//! SSML generation for podcast scripts.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const SPEAK_OPEN: &str = "<speak version='1.0' xmlns='http://www.w3.org/2001/10/synthesis' xmlns:mstts='https://www.w3.org/2001/mstts' xml:lang='en-US'>";
const SPEAK_CLOSE: &str = "</speak>";

/// One spoken line of a podcast script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptLine {
    /// Speaker name, looked up in the voice map.
    pub name: String,
    /// Text to speak.
    pub message: String,
}

/// A podcast script as produced by the script generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodcastScript {
    /// Lines in speaking order.
    pub script: Vec<ScriptLine>,
}

impl PodcastScript {
    /// Parses a script from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a script.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Escapes the XML special characters of an SSML text node or attribute value.
#[must_use]
pub fn escape_ssml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Converts a podcast script to SSML.
///
/// Each line becomes a `<voice>` element using the voice mapped to its
/// speaker.
///
/// # Arguments
///
/// * `podcast` - The script to convert
/// * `voices` - Speaker name to Azure voice name
///
/// # Errors
///
/// Returns [`Error::UnknownSpeaker`] if a line's speaker has no voice.
pub fn podcast_script_to_ssml(
    podcast: &PodcastScript,
    voices: &BTreeMap<String, String>,
) -> Result<String> {
    let mut ssml = String::from(SPEAK_OPEN);

    for line in &podcast.script {
        let voice = voices
            .get(&line.name)
            .ok_or_else(|| Error::UnknownSpeaker(line.name.clone()))?;
        ssml.push_str("<voice name='");
        ssml.push_str(&escape_ssml(voice));
        ssml.push_str("'>");
        ssml.push_str(&escape_ssml(&line.message));
        ssml.push_str("</voice>");
    }

    ssml.push_str(SPEAK_CLOSE);
    Ok(ssml)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voices() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("Andrew".to_string(), "en-US-Andrew:DragonHDLatestNeural".to_string()),
            ("Emma".to_string(), "en-US-Emma:DragonHDLatestNeural".to_string()),
        ])
    }

    #[test]
    fn test_escape_ssml() {
        assert_eq!(
            escape_ssml(r#"Tom & Jerry <say> "hi" it's"#),
            "Tom &amp; Jerry &lt;say&gt; &quot;hi&quot; it&apos;s"
        );
        assert_eq!(escape_ssml("&amp;"), "&amp;amp;");
    }

    #[test]
    fn test_script_to_ssml() {
        let script = PodcastScript::from_json(
            r#"{"script": [
                {"name": "Andrew", "message": "Welcome!"},
                {"name": "Emma", "message": "R&D <today>"}
            ]}"#,
        )
        .unwrap();

        let ssml = podcast_script_to_ssml(&script, &voices()).unwrap();
        assert_eq!(
            ssml,
            format!(
                "{SPEAK_OPEN}<voice name='en-US-Andrew:DragonHDLatestNeural'>Welcome!</voice><voice name='en-US-Emma:DragonHDLatestNeural'>R&amp;D &lt;today&gt;</voice></speak>"
            )
        );
    }

    #[test]
    fn test_voice_name_is_escaped() {
        let mut voices = voices();
        voices.insert("Andrew".to_string(), "x' onload='y&z".to_string());
        let script = PodcastScript {
            script: vec![ScriptLine {
                name: "Andrew".to_string(),
                message: "hi".to_string(),
            }],
        };

        let ssml = podcast_script_to_ssml(&script, &voices).unwrap();
        assert!(ssml.contains("<voice name='x&apos; onload=&apos;y&amp;z'>hi</voice>"));
    }

    #[test]
    fn test_empty_script() {
        let ssml = podcast_script_to_ssml(&PodcastScript::default(), &voices()).unwrap();
        assert_eq!(ssml, format!("{SPEAK_OPEN}{SPEAK_CLOSE}"));
    }

    #[test]
    fn test_unknown_speaker() {
        let script = PodcastScript {
            script: vec![ScriptLine {
                name: "Zed".to_string(),
                message: "hello".to_string(),
            }],
        };
        let err = podcast_script_to_ssml(&script, &voices()).unwrap_err();
        assert!(matches!(err, Error::UnknownSpeaker(ref name) if name == "Zed"));
    }

    #[test]
    fn test_invalid_script_json() {
        assert!(matches!(
            PodcastScript::from_json(r#"{"lines": []}"#),
            Err(Error::Json(_))
        ));
    }
}
