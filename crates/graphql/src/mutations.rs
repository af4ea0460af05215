//! Relay client-mutation style mutations.
//!
//! Every payload echoes the `clientMutationId` it was given. The viewer is
//! resolved from the request's [`AuthHeader`](crate::AuthHeader).

use async_graphql::{Context, InputObject, Object, Result, SimpleObject, ID};

use hackernews_core::models::{
    self, MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MAX_PASSWORD_LENGTH, MAX_URL_LENGTH,
};
use hackernews_core::services::{
    self, AccountService, NewUserInput, SubmissionService, bearer_token,
};

use crate::AuthHeader;
use crate::global_id;
use crate::schema::{Link, User, Vote, validate_string};

// -----------------------------------------------------------------------------
// Inputs
// -----------------------------------------------------------------------------

#[derive(InputObject)]
#[graphql(name = "AUTH_PROVIDER_EMAIL")]
pub struct AuthProviderEmail {
    pub email: String,
    pub password: String,
}

#[derive(InputObject)]
pub struct AuthProviderSignupData {
    pub email: AuthProviderEmail,
}

#[derive(InputObject)]
pub struct SignupUserInput {
    pub name: String,
    pub auth_provider: AuthProviderSignupData,
    pub client_mutation_id: Option<String>,
}

#[derive(InputObject)]
pub struct SigninUserInput {
    pub email: AuthProviderEmail,
    pub client_mutation_id: Option<String>,
}

#[derive(InputObject)]
pub struct CreateLinkInput {
    pub description: String,
    pub url: String,
    pub posted_by_id: Option<ID>,
    pub client_mutation_id: Option<String>,
}

#[derive(InputObject)]
pub struct CreateVoteInput {
    pub user_id: Option<ID>,
    pub link_id: ID,
    pub client_mutation_id: Option<String>,
}

// -----------------------------------------------------------------------------
// Payloads
// -----------------------------------------------------------------------------

#[derive(SimpleObject)]
pub struct CreateUserPayload {
    pub user: Option<User>,
    pub client_mutation_id: Option<String>,
}

#[derive(SimpleObject)]
pub struct SigninUserPayload {
    pub token: Option<String>,
    pub user: Option<User>,
    pub client_mutation_id: Option<String>,
}

#[derive(SimpleObject)]
pub struct CreateLinkPayload {
    pub link: Link,
    pub client_mutation_id: Option<String>,
}

#[derive(SimpleObject)]
pub struct CreateVotePayload {
    pub vote: Vote,
    pub client_mutation_id: Option<String>,
}

// -----------------------------------------------------------------------------
// Mutation Root
// -----------------------------------------------------------------------------

#[derive(Default)]
pub struct Mutation;

#[Object]
impl Mutation {
    /// Register a user. The email address must not be taken.
    async fn create_user<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        input: SignupUserInput,
    ) -> Result<CreateUserPayload> {
        let credentials = input.auth_provider.email;
        validate_string(&input.name, "name", MAX_NAME_LENGTH)?;
        validate_credentials(&credentials)?;

        let accounts = ctx.data::<AccountService>()?;
        let user = accounts
            .create_user(NewUserInput {
                name: input.name,
                email: credentials.email,
                password: credentials.password,
            })
            .await?;

        Ok(CreateUserPayload {
            user: Some(User(user)),
            client_mutation_id: input.client_mutation_id,
        })
    }

    /// Exchange an email and password for a bearer token.
    async fn signin_user<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        input: SigninUserInput,
    ) -> Result<SigninUserPayload> {
        validate_credentials(&input.email)?;

        let accounts = ctx.data::<AccountService>()?;
        let signed = accounts
            .sign_in(&input.email.email, &input.email.password)
            .await?;

        Ok(SigninUserPayload {
            token: Some(signed.token),
            user: Some(User(signed.user)),
            client_mutation_id: input.client_mutation_id,
        })
    }

    /// Post a link. Anonymous posting is allowed when no poster is named.
    async fn create_link<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        input: CreateLinkInput,
    ) -> Result<CreateLinkPayload> {
        validate_string(&input.url, "url", MAX_URL_LENGTH)?;
        let posted_by = input
            .posted_by_id
            .map(|id| global_id::decode_as(&id, "User"))
            .transpose()?;

        let viewer = current_user(ctx).await?;
        let submissions = ctx.data::<SubmissionService>()?;
        let link = submissions
            .create_link(
                viewer.as_ref(),
                services::CreateLinkInput {
                    description: input.description,
                    url: input.url,
                    posted_by,
                },
            )
            .await?;

        Ok(CreateLinkPayload {
            link: Link(link),
            client_mutation_id: input.client_mutation_id,
        })
    }

    /// Vote for a link as the logged-in user.
    async fn create_vote<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        input: CreateVoteInput,
    ) -> Result<CreateVotePayload> {
        let link = global_id::decode_as(&input.link_id, "Link")?;
        let user = input
            .user_id
            .map(|id| global_id::decode_as(&id, "User"))
            .transpose()?;

        let viewer = current_user(ctx).await?;
        let submissions = ctx.data::<SubmissionService>()?;
        let vote = submissions
            .create_vote(viewer.as_ref(), services::CreateVoteInput { user, link })
            .await?;

        Ok(CreateVotePayload {
            vote: Vote(vote),
            client_mutation_id: input.client_mutation_id,
        })
    }
}

/// The user behind the request's bearer token, if any.
async fn current_user(ctx: &Context<'_>) -> Result<Option<models::User>> {
    let header = ctx
        .data_opt::<AuthHeader>()
        .and_then(|header| header.0.as_deref());
    let accounts = ctx.data::<AccountService>()?;
    Ok(accounts.authenticate(bearer_token(header)).await?)
}

fn validate_credentials(credentials: &AuthProviderEmail) -> Result<()> {
    validate_string(&credentials.email, "email", MAX_EMAIL_LENGTH)?;
    validate_string(&credentials.password, "password", MAX_PASSWORD_LENGTH)
}
