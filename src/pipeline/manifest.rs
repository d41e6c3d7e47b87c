//! Output manifest: one JSON document describing every study unit.
//!
//! Field names are fixed by the downstream consumers' schema; serde renames
//! pin them independently of the Rust names.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One processed study unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentResult {
    /// French transcript; empty when recognition degraded.
    #[serde(rename = "frenchText")]
    pub french_text: String,
    /// English translation; empty when translation degraded or was skipped.
    #[serde(rename = "englishText")]
    pub english_text: String,
    /// Exported French clip.
    #[serde(rename = "frenchAudioFilePath")]
    pub french_audio_file_path: String,
    /// Synthesized English clip; absent when synthesis degraded or was skipped.
    #[serde(
        rename = "englishAudioFilePath",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub english_audio_file_path: Option<String>,
    pub duration_seconds: f64,
    /// 1-based, matches the segment's sequence index.
    pub segment_number: usize,
}

/// The run's complete output description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingManifest {
    pub file_name: String,
    pub processed_at: DateTime<Utc>,
    pub total_segments: usize,
    /// Sum of emitted segment durations, seconds.
    pub total_duration: f64,
    pub output_directory: String,
    /// Sorted by `segment_number` ascending.
    pub sections: Vec<SegmentResult>,
}

impl ProcessingManifest {
    /// Assemble a manifest from index-ordered sections, stamping now.
    pub fn new(file_name: &str, output_directory: &Path, sections: Vec<SegmentResult>) -> Self {
        let total_duration = sections.iter().map(|s| s.duration_seconds).sum();
        Self {
            file_name: file_name.to_string(),
            processed_at: Utc::now(),
            total_segments: sections.len(),
            total_duration,
            output_directory: output_directory.display().to_string(),
            sections,
        }
    }

    /// Serialize to pretty JSON and write to `dest`.
    pub fn write(&self, dest: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(dest, json)?;
        Ok(())
    }

    /// Sections whose text or English audio was degraded by a service failure.
    pub fn degraded_count(&self) -> usize {
        self.sections
            .iter()
            .filter(|s| {
                s.french_text.is_empty()
                    || s.english_text.is_empty()
                    || s.english_audio_file_path.is_none()
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(number: usize) -> SegmentResult {
        SegmentResult {
            french_text: "bonjour".to_string(),
            english_text: "hello".to_string(),
            french_audio_file_path: format!("french_audio/talk_fr_{number:03}.mp3"),
            english_audio_file_path: Some(format!("english_audio/talk_en_{number:03}.mp3")),
            duration_seconds: 10.0,
            segment_number: number,
        }
    }

    #[test]
    fn serializes_with_exact_field_names() {
        let manifest = ProcessingManifest::new("talk.mp3", Path::new("/out"), vec![section(1)]);
        let value = serde_json::to_value(&manifest).unwrap();

        assert_eq!(value["fileName"], "talk.mp3");
        assert!(value["processedAt"].is_string());
        assert_eq!(value["totalSegments"], 1);
        assert_eq!(value["totalDuration"], 10.0);
        assert_eq!(value["outputDirectory"], "/out");

        let section = &value["sections"][0];
        assert_eq!(section["frenchText"], "bonjour");
        assert_eq!(section["englishText"], "hello");
        assert_eq!(section["frenchAudioFilePath"], "french_audio/talk_fr_001.mp3");
        assert_eq!(
            section["englishAudioFilePath"],
            "english_audio/talk_en_001.mp3"
        );
        assert_eq!(section["duration_seconds"], 10.0);
        assert_eq!(section["segment_number"], 1);
    }

    #[test]
    fn absent_english_audio_is_omitted_not_null() {
        let mut degraded = section(1);
        degraded.english_audio_file_path = None;

        let manifest = ProcessingManifest::new("talk.mp3", Path::new("/out"), vec![degraded]);
        let value = serde_json::to_value(&manifest).unwrap();

        assert!(
            value["sections"][0]
                .as_object()
                .unwrap()
                .get("englishAudioFilePath")
                .is_none()
        );
    }

    #[test]
    fn totals_come_from_sections() {
        let mut second = section(2);
        second.duration_seconds = 4.5;
        let manifest =
            ProcessingManifest::new("talk.mp3", Path::new("/out"), vec![section(1), second]);

        assert_eq!(manifest.total_segments, 2);
        assert!((manifest.total_duration - 14.5).abs() < 1e-9);
    }

    #[test]
    fn processed_at_is_rfc3339() {
        let manifest = ProcessingManifest::new("talk.mp3", Path::new("/out"), Vec::new());
        let value = serde_json::to_value(&manifest).unwrap();
        let stamp = value["processedAt"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
    }

    #[test]
    fn degraded_count_flags_empty_fields() {
        let mut no_text = section(1);
        no_text.french_text = String::new();
        no_text.english_text = String::new();
        no_text.english_audio_file_path = None;

        let manifest =
            ProcessingManifest::new("talk.mp3", Path::new("/out"), vec![no_text, section(2)]);
        assert_eq!(manifest.degraded_count(), 1);
    }

    #[test]
    fn writes_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("talk_processed.json");

        let manifest = ProcessingManifest::new("talk.mp3", dir.path(), vec![section(1)]);
        manifest.write(&dest).unwrap();

        let raw = std::fs::read_to_string(&dest).unwrap();
        let parsed: ProcessingManifest = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, manifest);
    }
}
