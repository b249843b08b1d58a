//! Generation sequencing.
//!
//! Each generate request takes a ticket. Starting a new generation cancels
//! the previous ticket, and a result is only committed to the session while
//! its ticket is still the latest one.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use qr_compositor::{
    EMPTY_TEXT_MESSAGE, QrContent, QrError, download_filename, encode_png, render, to_data_url,
};
use tokio_util::sync::CancellationToken;

use crate::app::SharedState;
use crate::services::session::{Artifact, ArtifactSummary};

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error(transparent)]
    Render(#[from] QrError),
    #[error("Generation {0} was superseded by a newer request")]
    Superseded(u64),
    #[error("Render worker failed: {0}")]
    Worker(String),
}

/// Handle for one in-flight generation.
#[derive(Debug, Clone)]
pub struct GenerationTicket {
    id: u64,
    token: CancellationToken,
}

impl GenerationTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[derive(Debug, Default)]
struct TrackerState {
    latest: u64,
    token: Option<CancellationToken>,
}

#[derive(Debug, Default)]
pub struct GenerationTracker {
    state: Mutex<TrackerState>,
}

impl GenerationTracker {
    /// Start a new generation, cancelling whichever one was in flight.
    pub fn begin(&self) -> GenerationTicket {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = state.token.take() {
            previous.cancel();
        }
        state.latest += 1;
        let token = CancellationToken::new();
        state.token = Some(token.clone());
        GenerationTicket {
            id: state.latest,
            token,
        }
    }

    /// Whether `ticket` is still the most recent, uncancelled generation.
    pub fn is_current(&self, ticket: &GenerationTicket) -> bool {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        !ticket.is_cancelled() && state.latest == ticket.id
    }

    pub fn latest(&self) -> u64 {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).latest
    }

    /// Cancel the in-flight generation, if any.
    pub fn cancel_all(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = state.token.take() {
            token.cancel();
        }
    }
}

/// Render `content` with the currently selected logo and commit the result.
///
/// Rendering runs on the blocking pool. If a newer request arrives first,
/// this one returns [`GenerationError::Superseded`] and its output is dropped.
/// Empty text is rejected before a ticket is taken, so it never cancels a
/// render already in flight.
pub async fn generate(state: &SharedState, content: QrContent) -> Result<ArtifactSummary, GenerationError> {
    if content.text.is_empty() {
        return Err(QrError::InvalidInput(EMPTY_TEXT_MESSAGE.into()).into());
    }

    let ticket = state.generations().begin();
    let id = ticket.id();
    let logo = state.session().await.logo().map(|l| Arc::clone(&l.image));
    let settings = state.config().render;

    tracing::info!(
        generation = id,
        text_len = content.text.len(),
        level = %content.error_correction,
        with_logo = logo.is_some(),
        "Generating QR code"
    );

    let work = tokio::task::spawn_blocking(move || -> Result<(u32, u32, Vec<u8>), QrError> {
        let img = render(&content, logo.as_deref(), &settings)?;
        let png = encode_png(&img)?;
        Ok((img.width(), img.height(), png))
    });

    let (width, height, png) = tokio::select! {
        _ = ticket.token().cancelled() => {
            tracing::info!(generation = id, "Generation superseded while rendering");
            return Err(GenerationError::Superseded(id));
        }
        res = work => res.map_err(|e| GenerationError::Worker(e.to_string()))??,
    };

    let created_at = Utc::now();
    let artifact = Artifact {
        generation: id,
        width,
        height,
        png: Arc::new(png),
        filename: download_filename(created_at),
        created_at,
    };

    let mut session = state.session_mut().await;
    if !state.generations().is_current(&ticket) || !session.commit(artifact.clone()) {
        tracing::info!(generation = id, "Discarding stale generation result");
        return Err(GenerationError::Superseded(id));
    }
    drop(session);

    tracing::info!(generation = id, width, height, bytes = artifact.png.len(), "Generation committed");
    Ok(ArtifactSummary {
        generation: id,
        width,
        height,
        filename: artifact.filename,
        created_at: created_at.to_rfc3339(),
        preview: to_data_url(&artifact.png),
    })
}
