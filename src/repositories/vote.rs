use std::path::{Path, PathBuf};

use crate::{
    models::VoteRecord, repositories::error::RepositoryError, utils::parsing::normalize_address,
};

/// Loader for per-token vote tables (`<data>/votes/<token>.csv` with
/// `voter,choice,vp` columns). Votes are only needed in classification mode,
/// so tables are read on demand rather than all at construction.
pub struct VoteRepository {
    votes_dir: PathBuf,
}

impl VoteRepository {
    pub fn new(path: Option<&Path>) -> Result<Self, RepositoryError> {
        let votes_dir = path.unwrap_or(Path::new("data/votes")).to_path_buf();
        Ok(VoteRepository { votes_dir })
    }
}

pub trait VoteRepositoryTrait {
    fn new(path: Option<&Path>) -> Result<Self, RepositoryError>
    where
        Self: Sized;
    fn load(&self, token_address: &str) -> Result<Vec<VoteRecord>, RepositoryError>;
}

impl VoteRepositoryTrait for VoteRepository {
    fn new(path: Option<&Path>) -> Result<Self, RepositoryError> {
        VoteRepository::new(path)
    }

    fn load(&self, token_address: &str) -> Result<Vec<VoteRecord>, RepositoryError> {
        let path = self.votes_dir.join(format!("{}.csv", token_address));
        if !path.exists() {
            // A token without a vote table simply has no recorded voters.
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&path)?;
        let mut votes = Vec::new();
        for record in reader.deserialize() {
            let mut vote: VoteRecord = record?;
            vote.voter = normalize_address(&vote.voter);
            votes.push(vote);
        }
        Ok(votes)
    }
}

pub struct VoteService<T: VoteRepositoryTrait> {
    repository: T,
}

impl<T: VoteRepositoryTrait> VoteService<T> {
    pub fn new(path: Option<&Path>) -> Result<VoteService<VoteRepository>, RepositoryError> {
        let repository = VoteRepository::new(path)?;
        Ok(VoteService { repository })
    }

    pub fn new_with_repository(repository: T) -> Result<Self, RepositoryError> {
        Ok(VoteService { repository })
    }

    pub fn load(&self, token_address: &str) -> Result<Vec<VoteRecord>, RepositoryError> {
        self.repository.load(token_address)
    }
}
