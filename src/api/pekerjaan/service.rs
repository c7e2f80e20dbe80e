use std::fmt;
use std::sync::Arc;

use actix_web::{HttpResponse, ResponseError};
use tracing::{error, info, warn};

use crate::api::auth::CallerIdentity;
use crate::api::validation::ErrorResponse;
use crate::db::models::{ListQuery, NewPekerjaan, PekerjaanRow};
use crate::db::PekerjaanStore;
use super::models::{CreatePekerjaanRequest, UpdatePekerjaanRequest};
use super::policy::{self, Operation};

/// Service-level errors
#[derive(Debug)]
pub enum ServiceError {
    /// Database operation failed
    DatabaseError(sqlx::Error),

    /// Malformed input
    ValidationError(String),

    /// No record with this id in the expected state
    NotFound(i32),

    /// Record exists but the caller may not touch it
    PermissionDenied(i32),

    /// Record changed between the authorization read and the write
    Conflict(i32),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::DatabaseError(e) => write!(f, "Database error: {}", e),
            ServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ServiceError::NotFound(id) => write!(f, "Pekerjaan not found: {}", id),
            ServiceError::PermissionDenied(id) => write!(f, "Permission denied for pekerjaan: {}", id),
            ServiceError::Conflict(id) => write!(f, "Pekerjaan changed concurrently: {}", id),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::DatabaseError(e)
    }
}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::DatabaseError(e) => {
                error!("Database error: {}", e);
                HttpResponse::InternalServerError().json(
                    ErrorResponse::new("Failed to process request").with_message("Database error occurred"),
                )
            }
            ServiceError::ValidationError(msg) => {
                warn!("Validation error: {}", msg);
                HttpResponse::BadRequest().json(ErrorResponse::new("Validation failed").with_message(msg))
            }
            ServiceError::NotFound(id) => {
                warn!("Pekerjaan not found: {}", id);
                HttpResponse::NotFound().json(
                    ErrorResponse::new("Not found").with_message(format!("Pekerjaan with id {} not found", id)),
                )
            }
            ServiceError::PermissionDenied(id) => {
                warn!("Permission denied for pekerjaan {}", id);
                HttpResponse::Forbidden().json(
                    ErrorResponse::new("Forbidden")
                        .with_message(format!("You are not allowed to modify pekerjaan {}", id)),
                )
            }
            ServiceError::Conflict(id) => {
                warn!("Conflicting change on pekerjaan {}", id);
                HttpResponse::Conflict().json(
                    ErrorResponse::new("Conflict")
                        .with_message(format!("Pekerjaan {} was modified concurrently, retry the request", id)),
                )
            }
        }
    }
}

/// State the guarded transition expects the record to be in
#[derive(Clone, Copy)]
enum Partition {
    Active,
    Deleted,
}

/// Job-record lifecycle: Active -> Deleted -> {Active | Purged}
pub struct PekerjaanService {
    store: Arc<dyn PekerjaanStore>,
}

impl PekerjaanService {
    pub fn new(store: Arc<dyn PekerjaanStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Vec<PekerjaanRow>, ServiceError> {
        Ok(self.store.list(query).await?)
    }

    pub async fn get_active(&self, id: i32) -> Result<PekerjaanRow, ServiceError> {
        self.store.get_active(id).await?.ok_or(ServiceError::NotFound(id))
    }

    pub async fn list_by_alumni(&self, alumni_id: i32) -> Result<Vec<PekerjaanRow>, ServiceError> {
        Ok(self.store.list_by_alumni(alumni_id).await?)
    }

    /// Create a record attributed to the caller
    ///
    /// Ordinary callers always create for their own alumni id. `created_by`
    /// is stamped from the caller's username.
    pub async fn create(
        &self,
        caller: &CallerIdentity,
        request: CreatePekerjaanRequest,
    ) -> Result<PekerjaanRow, ServiceError> {
        let alumni_id = policy::effective_alumni_id(caller, request.alumni_id)
            .ok_or_else(|| ServiceError::ValidationError("alumni_id is required".to_string()))?;
        let fields = request.fields.into_fields().map_err(ServiceError::ValidationError)?;

        let row = self
            .store
            .create(&NewPekerjaan {
                alumni_id,
                created_by: caller.username.clone(),
                fields,
            })
            .await?;

        info!(
            "Service: Pekerjaan {} created by {} for alumni {}",
            row.id, caller.username, alumni_id
        );
        Ok(row)
    }

    /// Replace the descriptive fields of an active record
    pub async fn update(
        &self,
        id: i32,
        request: UpdatePekerjaanRequest,
    ) -> Result<PekerjaanRow, ServiceError> {
        let fields = request.fields.into_fields().map_err(ServiceError::ValidationError)?;

        let row = self
            .store
            .update(id, &fields)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        info!("Service: Pekerjaan {} updated", id);
        Ok(row)
    }

    pub async fn soft_delete(&self, caller: &CallerIdentity, id: i32) -> Result<(), ServiceError> {
        self.authorize_transition(caller, id, Operation::SoftDelete, Partition::Active)
            .await?;

        let done = self
            .store
            .soft_delete(id, policy::ownership_scope(caller))
            .await?;
        self.confirm(id, done)?;

        info!("Service: Pekerjaan {} moved to trash by {}", id, caller.username);
        Ok(())
    }

    /// Soft-deleted records visible to the caller
    pub async fn list_trash(&self, caller: &CallerIdentity) -> Result<Vec<PekerjaanRow>, ServiceError> {
        Ok(self.store.list_trash(policy::ownership_scope(caller)).await?)
    }

    pub async fn get_from_trash(&self, id: i32) -> Result<PekerjaanRow, ServiceError> {
        self.store
            .get_from_trash(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }

    pub async fn restore(&self, caller: &CallerIdentity, id: i32) -> Result<(), ServiceError> {
        self.authorize_transition(caller, id, Operation::Restore, Partition::Deleted)
            .await?;

        let done = self.store.restore(id, policy::ownership_scope(caller)).await?;
        self.confirm(id, done)?;

        info!("Service: Pekerjaan {} restored by {}", id, caller.username);
        Ok(())
    }

    pub async fn hard_delete(&self, caller: &CallerIdentity, id: i32) -> Result<(), ServiceError> {
        self.authorize_transition(caller, id, Operation::HardDelete, Partition::Deleted)
            .await?;

        let done = self
            .store
            .hard_delete(id, policy::ownership_scope(caller))
            .await?;
        self.confirm(id, done)?;

        info!("Service: Pekerjaan {} permanently deleted by {}", id, caller.username);
        Ok(())
    }

    /// Classify a transition before attempting it: a missing record or one in
    /// the wrong partition is NotFound, someone else's record is PermissionDenied.
    async fn authorize_transition(
        &self,
        caller: &CallerIdentity,
        id: i32,
        op: Operation,
        expected: Partition,
    ) -> Result<(), ServiceError> {
        let info = self
            .store
            .get_deleted_info(id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        let in_partition = match expected {
            Partition::Active => !info.is_deleted,
            Partition::Deleted => info.is_deleted,
        };
        if !in_partition {
            return Err(ServiceError::NotFound(id));
        }

        if !policy::authorize(op, caller, info.created_by.as_deref()) {
            return Err(ServiceError::PermissionDenied(id));
        }
        Ok(())
    }

    /// The conditional write is authoritative: zero rows after a passing check
    /// means the record moved underneath us.
    fn confirm(&self, id: i32, done: bool) -> Result<(), ServiceError> {
        if done {
            Ok(())
        } else {
            Err(ServiceError::Conflict(id))
        }
    }
}
