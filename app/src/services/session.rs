//! In-memory form state: the selected logo and the last committed artifact.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use image::RgbaImage;
use serde::Serialize;

/// A logo that passed format checks and decoded successfully.
#[derive(Debug, Clone)]
pub struct SelectedLogo {
    pub name: String,
    pub image: Arc<RgbaImage>,
    /// Original upload, served back for the logo preview.
    pub bytes: Arc<Vec<u8>>,
}

/// The composed PNG of one finished generation.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub generation: u64,
    pub width: u32,
    pub height: u32,
    pub png: Arc<Vec<u8>>,
    pub filename: String,
    pub created_at: DateTime<Utc>,
}

/// Metadata returned to the page after a generation.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactSummary {
    pub generation: u64,
    pub width: u32,
    pub height: u32,
    pub filename: String,
    pub created_at: String,
    pub preview: String,
}

#[derive(Debug, Default)]
pub struct Session {
    logo: Option<SelectedLogo>,
    artifact: Option<Artifact>,
}

impl Session {
    pub fn logo(&self) -> Option<&SelectedLogo> {
        self.logo.as_ref()
    }

    pub fn select_logo(&mut self, logo: SelectedLogo) {
        tracing::info!(name = %logo.name, width = logo.image.width(), height = logo.image.height(), "Logo selected");
        self.logo = Some(logo);
    }

    /// Drop the logo selection. Returns whether one was selected.
    pub fn clear_logo(&mut self) -> bool {
        self.logo.take().is_some()
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        self.artifact.as_ref()
    }

    /// Store `artifact` unless a newer generation was already committed.
    pub fn commit(&mut self, artifact: Artifact) -> bool {
        if let Some(current) = &self.artifact {
            if current.generation > artifact.generation {
                tracing::debug!(
                    current = current.generation,
                    stale = artifact.generation,
                    "Ignoring stale artifact"
                );
                return false;
            }
        }
        self.artifact = Some(artifact);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(generation: u64) -> Artifact {
        Artifact {
            generation,
            width: 1,
            height: 1,
            png: Arc::new(vec![generation as u8]),
            filename: format!("qr-{generation}.png"),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn commit_keeps_newest_generation() {
        let mut session = Session::default();
        assert!(session.commit(artifact(2)));
        assert!(!session.commit(artifact(1)));
        assert_eq!(session.artifact().unwrap().generation, 2);
        assert!(session.commit(artifact(3)));
        assert_eq!(session.artifact().unwrap().generation, 3);
    }

    #[test]
    fn clear_logo_reports_previous_selection() {
        let mut session = Session::default();
        assert!(!session.clear_logo());
        session.select_logo(SelectedLogo {
            name: "logo.png".into(),
            image: Arc::new(RgbaImage::new(2, 2)),
            bytes: Arc::new(Vec::new()),
        });
        assert!(session.logo().is_some());
        assert!(session.clear_logo());
        assert!(session.logo().is_none());
    }
}
