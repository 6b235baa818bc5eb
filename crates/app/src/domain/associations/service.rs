//! Associations service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use tracing::info;

use crate::domain::associations::{
    data::NewAssociation, errors::AssociationsServiceError, records::AssociationRecord,
    repository::PgAssociationsRepository,
};

#[derive(Debug, Clone)]
pub struct PgAssociationsService {
    repository: PgAssociationsRepository,
}

impl PgAssociationsService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAssociationsRepository::new(pool),
        }
    }
}

#[async_trait]
impl AssociationsService for PgAssociationsService {
    #[tracing::instrument(
        name = "associations.service.create_association",
        skip(self, association),
        fields(association_uuid = %association.uuid),
        err
    )]
    async fn create_association(
        &self,
        association: NewAssociation,
    ) -> Result<AssociationRecord, AssociationsServiceError> {
        let record = self.repository.create_association(association).await?;

        info!(association_uuid = %record.uuid, "created association");

        Ok(record)
    }

    async fn list_associations(&self) -> Result<Vec<AssociationRecord>, AssociationsServiceError> {
        self.repository
            .list_associations()
            .await
            .map_err(Into::into)
    }
}

#[automock]
#[async_trait]
/// Association persistence operations.
pub trait AssociationsService: Send + Sync {
    /// Creates a new association.
    async fn create_association(
        &self,
        association: NewAssociation,
    ) -> Result<AssociationRecord, AssociationsServiceError>;

    /// Lists associations that have not been deleted, oldest first.
    async fn list_associations(&self) -> Result<Vec<AssociationRecord>, AssociationsServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;

    use crate::{domain::associations::records::AssociationUuid, test::TestContext};

    use super::*;

    #[tokio::test]
    async fn create_association_returns_correct_uuid_and_name() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgAssociationsService::new(ctx.db.pool().clone());

        let uuid = AssociationUuid::new();

        let association = svc
            .create_association(NewAssociation {
                uuid,
                name: "Torre Norte".to_string(),
            })
            .await?;

        assert_eq!(association.uuid, uuid);
        assert_eq!(association.name, "Torre Norte");
        assert!(association.deleted_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn create_association_timestamps_are_set() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgAssociationsService::new(ctx.db.pool().clone());

        let before = Timestamp::now();

        let association = svc
            .create_association(NewAssociation {
                uuid: AssociationUuid::new(),
                name: "Timestamp Test".to_string(),
            })
            .await?;

        let after = Timestamp::now();

        assert!(association.created_at >= before);
        assert!(association.created_at <= after);

        Ok(())
    }

    #[tokio::test]
    async fn create_association_duplicate_uuid_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgAssociationsService::new(ctx.db.pool().clone());

        let uuid = AssociationUuid::new();

        svc.create_association(NewAssociation {
            uuid,
            name: "First".to_string(),
        })
        .await?;

        let result = svc
            .create_association(NewAssociation {
                uuid,
                name: "Second".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(AssociationsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_association_blank_name_returns_invalid_data() {
        let ctx = TestContext::new().await;
        let svc = PgAssociationsService::new(ctx.db.pool().clone());

        let result = svc
            .create_association(NewAssociation {
                uuid: AssociationUuid::new(),
                name: "   ".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(AssociationsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_associations_includes_created() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgAssociationsService::new(ctx.db.pool().clone());

        let created = svc
            .create_association(NewAssociation {
                uuid: AssociationUuid::new(),
                name: "Torre Sur".to_string(),
            })
            .await?;

        let associations = svc.list_associations().await?;
        let uuids: Vec<AssociationUuid> = associations.iter().map(|a| a.uuid).collect();

        assert!(uuids.contains(&ctx.association), "default association listed");
        assert!(uuids.contains(&created.uuid), "new association listed");

        Ok(())
    }
}
