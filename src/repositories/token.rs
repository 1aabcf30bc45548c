use std::{collections::HashMap, path::Path};

use crate::{
    models::{ConfigLoader, Token},
    repositories::error::RepositoryError,
};

/// Repository of tracked tokens, keyed by config file stem.
pub struct TokenRepository {
    pub tokens: HashMap<String, Token>,
}

impl TokenRepository {
    pub fn new(path: Option<&Path>) -> Result<Self, RepositoryError> {
        let tokens = Token::load_all(path)
            .map_err(|e| RepositoryError::load_error(format!("Failed to load tokens: {}", e)))?;
        Ok(TokenRepository { tokens })
    }
}

pub trait TokenRepositoryTrait {
    fn new(path: Option<&Path>) -> Result<Self, RepositoryError>
    where
        Self: Sized;
    fn load_all(&self, path: Option<&Path>) -> Result<HashMap<String, Token>, RepositoryError>;
    fn get(&self, token_id: &str) -> Option<Token>;
    fn get_all(&self) -> HashMap<String, Token>;
}

impl TokenRepositoryTrait for TokenRepository {
    fn new(path: Option<&Path>) -> Result<Self, RepositoryError> {
        TokenRepository::new(path)
    }

    fn load_all(&self, path: Option<&Path>) -> Result<HashMap<String, Token>, RepositoryError> {
        Token::load_all(path)
            .map_err(|e| RepositoryError::load_error(format!("Failed to load tokens: {}", e)))
    }

    fn get(&self, token_id: &str) -> Option<Token> {
        self.tokens.get(token_id).cloned()
    }

    fn get_all(&self) -> HashMap<String, Token> {
        self.tokens.clone()
    }
}

pub struct TokenService<T: TokenRepositoryTrait> {
    repository: T,
}

impl<T: TokenRepositoryTrait> TokenService<T> {
    pub fn new(path: Option<&Path>) -> Result<TokenService<TokenRepository>, RepositoryError> {
        let repository = TokenRepository::new(path)?;
        Ok(TokenService { repository })
    }

    pub fn new_with_repository(repository: T) -> Result<Self, RepositoryError> {
        Ok(TokenService { repository })
    }

    pub fn get(&self, token_id: &str) -> Option<Token> {
        self.repository.get(token_id)
    }

    pub fn get_all(&self) -> HashMap<String, Token> {
        self.repository.get_all()
    }

    /// Look a token up by its contract address (lowercased comparison).
    pub fn get_by_address(&self, address: &str) -> Option<Token> {
        let needle = address.to_lowercase();
        self.repository
            .get_all()
            .into_values()
            .find(|t| t.address.to_lowercase() == needle)
    }
}
