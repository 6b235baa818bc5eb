mod attachments;
mod participation;
mod projects;
mod quotations;

pub(crate) use attachments::PgAttachmentsRepository;
pub(crate) use participation::PgParticipationRepository;
pub(crate) use projects::PgProjectsRepository;
pub(crate) use quotations::PgQuotationsRepository;
