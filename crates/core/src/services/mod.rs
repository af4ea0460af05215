//! Business logic services.

mod accounts;
mod collection;
mod submissions;

pub use accounts::{AccountService, NewUserInput, SignIn, bearer_token};
pub use collection::{
    CollectionRequest, CollectionResponse, CollectionService, ConnectionRequest, CountRequest,
};
pub use submissions::{CreateLinkInput, CreateVoteInput, SubmissionService};
