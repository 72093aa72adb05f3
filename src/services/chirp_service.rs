use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::db::ChirpStore;
use crate::errors::AppError;
use crate::models::chirp::{Chirp, MAX_CHIRP_LENGTH};
use crate::utils::clock::Clock;

#[derive(Clone)]
pub struct ChirpService {
    chirps: Arc<dyn ChirpStore>,
    clock: Arc<dyn Clock>,
}

impl ChirpService {
    pub fn new(chirps: Arc<dyn ChirpStore>, clock: Arc<dyn Clock>) -> Self {
        Self { chirps, clock }
    }

    #[instrument(skip(self, body))]
    pub async fn create(&self, author_id: Uuid, body: &str) -> Result<Chirp, AppError> {
        validate_body(body)?;

        let chirp = Chirp::new(body.to_string(), author_id, self.clock.now());
        let created = self.chirps.create_chirp(&chirp).await?;

        info!(chirp_id = %created.id, "Posted chirp");
        Ok(created)
    }

    pub async fn list(&self) -> Result<Vec<Chirp>, AppError> {
        Ok(self.chirps.list_chirps().await?)
    }

    pub async fn get(&self, chirp_id: Uuid) -> Result<Chirp, AppError> {
        self.chirps
            .find_chirp(chirp_id)
            .await?
            .ok_or(AppError::NotFound("Chirp"))
    }

    /// Only the author may delete a chirp.
    #[instrument(skip(self))]
    pub async fn delete(&self, requester_id: Uuid, chirp_id: Uuid) -> Result<(), AppError> {
        let chirp = self.get(chirp_id).await?;
        if !chirp.is_owned_by(requester_id) {
            warn!(author_id = %chirp.user_id, "Refused to delete another user's chirp");
            return Err(AppError::Forbidden);
        }

        if !self.chirps.delete_chirp(chirp_id).await? {
            return Err(AppError::NotFound("Chirp"));
        }

        info!("Deleted chirp");
        Ok(())
    }
}

fn validate_body(body: &str) -> Result<(), AppError> {
    if body.trim().is_empty() {
        return Err(AppError::Validation("Request is missing 'body'".to_string()));
    }
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(AppError::Validation(format!(
            "Chirp is too long. Max length is {MAX_CHIRP_LENGTH}"
        )));
    }
    Ok(())
}
