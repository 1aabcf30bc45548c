mod error;
mod label;
mod token;
mod vote;

pub use error::RepositoryError;
pub use label::{ContractLabelRepository, ContractLabelRepositoryTrait, ContractLabelService};
pub use token::{TokenRepository, TokenRepositoryTrait, TokenService};
pub use vote::{VoteRepository, VoteRepositoryTrait, VoteService};
