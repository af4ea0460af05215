//! Submission service - posting links and voting on them.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::error::{DomainError, DomainResult, StorageError};
use crate::metrics::record_mutation;
use crate::models::{
    Link, MAX_DESCRIPTION_LENGTH, MAX_URL_LENGTH, NewLink, NewVote, User, Vote, check_length,
};
use crate::ports::Repositories;

/// Fields of a new link.
#[derive(Debug, Clone)]
pub struct CreateLinkInput {
    pub description: String,
    pub url: String,
    /// Must name the viewer when present.
    pub posted_by: Option<i64>,
}

/// Fields of a new vote.
#[derive(Debug, Clone, Copy)]
pub struct CreateVoteInput {
    /// Must name the viewer when present.
    pub user: Option<i64>,
    pub link: i64,
}

#[derive(Clone)]
pub struct SubmissionService {
    repositories: Arc<dyn Repositories>,
}

impl SubmissionService {
    pub fn new(repositories: Arc<dyn Repositories>) -> Self {
        Self { repositories }
    }

    /// Post a link as the viewer, or anonymously when nobody is named.
    #[instrument(skip_all, fields(viewer = viewer.map(|u| u.id), url = %input.url))]
    pub async fn create_link(
        &self,
        viewer: Option<&User>,
        input: CreateLinkInput,
    ) -> DomainResult<Link> {
        check_length("description", &input.description, MAX_DESCRIPTION_LENGTH)
            .and_then(|()| check_length("url", &input.url, MAX_URL_LENGTH))
            .map_err(|e| rejected("create_link", e))?;

        let posted_by = match (input.posted_by, viewer) {
            (None, viewer) => viewer.map(|u| u.id),
            (Some(_), None) => {
                return Err(rejected(
                    "create_link",
                    DomainError::NotAuthenticated("Only logged in users can create links".into()),
                ));
            }
            (Some(id), Some(user)) if id != user.id => {
                return Err(rejected("create_link", DomainError::PostedByMismatch));
            }
            (Some(id), Some(_)) => Some(id),
        };

        let link = self
            .repositories
            .links()
            .insert_link(NewLink {
                description: input.description,
                url: input.url,
                created_at: Utc::now(),
                posted_by,
            })
            .await?;

        record_mutation("create_link", "ok");
        info!(link_id = link.id, "Link created");
        Ok(link)
    }

    /// Record the viewer's vote for a link.
    #[instrument(skip_all, fields(viewer = viewer.map(|u| u.id), link = input.link))]
    pub async fn create_vote(
        &self,
        viewer: Option<&User>,
        input: CreateVoteInput,
    ) -> DomainResult<Vote> {
        let Some(user) = viewer else {
            return Err(rejected(
                "create_vote",
                DomainError::NotAuthenticated("Only logged in users can vote".into()),
            ));
        };
        if input.user.is_some_and(|id| id != user.id) {
            return Err(rejected("create_vote", DomainError::UserMismatch));
        }

        if self.repositories.links().get_link(input.link).await?.is_none() {
            return Err(rejected("create_vote", DomainError::LinkNotFound(input.link)));
        }

        let vote = NewVote {
            user: user.id,
            link: input.link,
        };
        match self.repositories.votes().insert_vote(vote).await {
            Ok(vote) => {
                record_mutation("create_vote", "ok");
                info!(vote_id = vote.id, "Vote created");
                Ok(vote)
            }
            Err(StorageError::ConstraintViolation(_)) => Err(rejected(
                "create_vote",
                DomainError::DuplicateVote {
                    user: vote.user,
                    link: vote.link,
                },
            )),
            Err(e) => Err(e.into()),
        }
    }
}

fn rejected(mutation: &'static str, error: DomainError) -> DomainError {
    record_mutation(mutation, "rejected");
    warn!(error = %error, "Mutation rejected");
    error
}
