//! Projects service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        associations::records::AssociationUuid,
        projects::{
            data::{NewAttachment, NewProject, NewQuotation},
            errors::ProjectsServiceError,
            records::{
                AttachmentRecord, ProjectRecord, ProjectUuid, QuotationRecord, VolunteerRecord,
                VoteTally,
            },
            repositories::{
                PgAttachmentsRepository, PgParticipationRepository, PgProjectsRepository,
                PgQuotationsRepository,
            },
        },
        users::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgProjectsService {
    db: Db,
    projects: PgProjectsRepository,
    attachments: PgAttachmentsRepository,
    quotations: PgQuotationsRepository,
    participation: PgParticipationRepository,
}

impl PgProjectsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            projects: PgProjectsRepository::new(),
            attachments: PgAttachmentsRepository::new(),
            quotations: PgQuotationsRepository::new(),
            participation: PgParticipationRepository::new(),
        }
    }
}

#[async_trait]
impl ProjectsService for PgProjectsService {
    #[tracing::instrument(
        name = "projects.service.create_project",
        skip(self, project),
        fields(association_uuid = %association, project_uuid = %project.uuid),
        err
    )]
    async fn create_project(
        &self,
        association: AssociationUuid,
        project: NewProject,
    ) -> Result<ProjectRecord, ProjectsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let created = self.projects.create_project(&mut tx, project).await?;

        tx.commit().await?;

        info!(project_uuid = %created.uuid, name = %created.name, "created project");

        Ok(created)
    }

    async fn get_project(
        &self,
        association: AssociationUuid,
        project: ProjectUuid,
    ) -> Result<ProjectRecord, ProjectsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let project = self.projects.get_project(&mut tx, project).await?;

        tx.commit().await?;

        Ok(project)
    }

    async fn list_projects(
        &self,
        association: AssociationUuid,
    ) -> Result<Vec<ProjectRecord>, ProjectsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let projects = self.projects.list_projects(&mut tx).await?;

        tx.commit().await?;

        Ok(projects)
    }

    #[tracing::instrument(
        name = "projects.service.mark_delivered",
        skip(self),
        fields(association_uuid = %association, project_uuid = %project),
        err
    )]
    async fn mark_delivered(
        &self,
        association: AssociationUuid,
        project: ProjectUuid,
    ) -> Result<ProjectRecord, ProjectsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let delivered = self.projects.mark_delivered(&mut tx, project).await?;

        tx.commit().await?;

        info!(project_uuid = %project, "project delivered");

        Ok(delivered)
    }

    async fn delete_project(
        &self,
        association: AssociationUuid,
        project: ProjectUuid,
    ) -> Result<(), ProjectsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let rows_affected = self.projects.delete_project(&mut tx, project).await?;

        if rows_affected == 0 {
            return Err(ProjectsServiceError::NotFound);
        }

        tx.commit().await?;

        info!(project_uuid = %project, "deleted project");

        Ok(())
    }

    async fn add_attachment(
        &self,
        association: AssociationUuid,
        project: ProjectUuid,
        attachment: NewAttachment,
    ) -> Result<AttachmentRecord, ProjectsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let created = self
            .attachments
            .create_attachment(&mut tx, project, attachment)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn list_attachments(
        &self,
        association: AssociationUuid,
        project: ProjectUuid,
    ) -> Result<Vec<AttachmentRecord>, ProjectsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let attachments = self.attachments.list_attachments(&mut tx, project).await?;

        tx.commit().await?;

        Ok(attachments)
    }

    #[tracing::instrument(
        name = "projects.service.submit_quotation",
        skip(self, quotation),
        fields(
            association_uuid = %association,
            project_uuid = %project,
            quotation_uuid = %quotation.uuid
        ),
        err
    )]
    async fn submit_quotation(
        &self,
        association: AssociationUuid,
        project: ProjectUuid,
        quotation: NewQuotation,
    ) -> Result<QuotationRecord, ProjectsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let created = self
            .quotations
            .create_quotation(&mut tx, project, quotation)
            .await?;

        tx.commit().await?;

        info!(quotation_uuid = %created.uuid, price = created.price, "submitted quotation");

        Ok(created)
    }

    async fn list_quotations(
        &self,
        association: AssociationUuid,
        project: ProjectUuid,
    ) -> Result<Vec<QuotationRecord>, ProjectsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let quotations = self.quotations.list_quotations(&mut tx, project).await?;

        tx.commit().await?;

        Ok(quotations)
    }

    #[tracing::instrument(
        name = "projects.service.cast_vote",
        skip(self),
        fields(association_uuid = %association, project_uuid = %project, user_uuid = %user),
        err
    )]
    async fn cast_vote(
        &self,
        association: AssociationUuid,
        project: ProjectUuid,
        user: UserUuid,
        in_favour: bool,
    ) -> Result<(), ProjectsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let rows_affected = self
            .participation
            .upsert_vote(&mut tx, project, user, in_favour)
            .await?;

        if rows_affected == 0 {
            return Err(ProjectsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn tally_votes(
        &self,
        association: AssociationUuid,
        project: ProjectUuid,
    ) -> Result<VoteTally, ProjectsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        self.projects.get_project(&mut tx, project).await?;

        let tally = self.participation.tally_votes(&mut tx, project).await?;

        tx.commit().await?;

        Ok(tally)
    }

    async fn volunteer(
        &self,
        association: AssociationUuid,
        project: ProjectUuid,
        user: UserUuid,
    ) -> Result<(), ProjectsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        self.projects.get_project(&mut tx, project).await?;

        if self
            .participation
            .create_volunteer(&mut tx, project, user)
            .await?
            > 0
        {
            info!(project_uuid = %project, user_uuid = %user, "volunteer added");
        }

        tx.commit().await?;

        Ok(())
    }

    async fn list_volunteers(
        &self,
        association: AssociationUuid,
        project: ProjectUuid,
    ) -> Result<Vec<VolunteerRecord>, ProjectsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let volunteers = self.participation.list_volunteers(&mut tx, project).await?;

        tx.commit().await?;

        Ok(volunteers)
    }
}

#[automock]
#[async_trait]
pub trait ProjectsService: Send + Sync {
    /// Creates a maintenance project.
    async fn create_project(
        &self,
        association: AssociationUuid,
        project: NewProject,
    ) -> Result<ProjectRecord, ProjectsServiceError>;

    /// Retrieve a single project.
    async fn get_project(
        &self,
        association: AssociationUuid,
        project: ProjectUuid,
    ) -> Result<ProjectRecord, ProjectsServiceError>;

    /// Lists projects ordered by due date.
    async fn list_projects(
        &self,
        association: AssociationUuid,
    ) -> Result<Vec<ProjectRecord>, ProjectsServiceError>;

    /// Flags a project as delivered.
    async fn mark_delivered(
        &self,
        association: AssociationUuid,
        project: ProjectUuid,
    ) -> Result<ProjectRecord, ProjectsServiceError>;

    /// Soft-deletes a project.
    async fn delete_project(
        &self,
        association: AssociationUuid,
        project: ProjectUuid,
    ) -> Result<(), ProjectsServiceError>;

    /// Records a reference to a stored file.
    async fn add_attachment(
        &self,
        association: AssociationUuid,
        project: ProjectUuid,
        attachment: NewAttachment,
    ) -> Result<AttachmentRecord, ProjectsServiceError>;

    async fn list_attachments(
        &self,
        association: AssociationUuid,
        project: ProjectUuid,
    ) -> Result<Vec<AttachmentRecord>, ProjectsServiceError>;

    /// Records a provider quotation.
    async fn submit_quotation(
        &self,
        association: AssociationUuid,
        project: ProjectUuid,
        quotation: NewQuotation,
    ) -> Result<QuotationRecord, ProjectsServiceError>;

    /// Lists quotations, cheapest first.
    async fn list_quotations(
        &self,
        association: AssociationUuid,
        project: ProjectUuid,
    ) -> Result<Vec<QuotationRecord>, ProjectsServiceError>;

    /// Records a user's vote. A later vote replaces the earlier one.
    async fn cast_vote(
        &self,
        association: AssociationUuid,
        project: ProjectUuid,
        user: UserUuid,
        in_favour: bool,
    ) -> Result<(), ProjectsServiceError>;

    async fn tally_votes(
        &self,
        association: AssociationUuid,
        project: ProjectUuid,
    ) -> Result<VoteTally, ProjectsServiceError>;

    /// Adds the user as a volunteer. Volunteering twice is a no-op.
    async fn volunteer(
        &self,
        association: AssociationUuid,
        project: ProjectUuid,
        user: UserUuid,
    ) -> Result<(), ProjectsServiceError>;

    async fn list_volunteers(
        &self,
        association: AssociationUuid,
        project: ProjectUuid,
    ) -> Result<Vec<VolunteerRecord>, ProjectsServiceError>;
}
