use std::{collections::HashSet, path::Path};

use crate::repositories::error::RepositoryError;
use crate::utils::parsing::normalize_address;

/// Repository of addresses known to be smart contracts, loaded from the
/// externally-produced label table (CSV with an `address` column; header
/// casing varies by labeling service, so it is matched case-insensitively).
pub struct ContractLabelRepository {
    pub labels: HashSet<String>,
}

impl ContractLabelRepository {
    pub fn new(path: Option<&Path>) -> Result<Self, RepositoryError> {
        let label_path = path.unwrap_or(Path::new("data/labels/contracts.csv"));
        let labels = load_labels(label_path)?;
        Ok(ContractLabelRepository { labels })
    }
}

fn load_labels(path: &Path) -> Result<HashSet<String>, RepositoryError> {
    if !path.exists() {
        return Err(RepositoryError::load_error(format!(
            "contract label file not found: {}",
            path.display()
        )));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let address_column = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("address"))
        .ok_or_else(|| {
            RepositoryError::validation_error(format!(
                "contract label file {} has no 'address' column",
                path.display()
            ))
        })?;

    let mut labels = HashSet::new();
    for record in reader.records() {
        let record = record?;
        if let Some(value) = record.get(address_column) {
            if !value.is_empty() {
                labels.insert(normalize_address(value));
            }
        }
    }
    Ok(labels)
}

pub trait ContractLabelRepositoryTrait {
    fn new(path: Option<&Path>) -> Result<Self, RepositoryError>
    where
        Self: Sized;
    fn contains(&self, address: &str) -> bool;
    fn get_all(&self) -> HashSet<String>;
}

impl ContractLabelRepositoryTrait for ContractLabelRepository {
    fn new(path: Option<&Path>) -> Result<Self, RepositoryError> {
        ContractLabelRepository::new(path)
    }

    fn contains(&self, address: &str) -> bool {
        self.labels.contains(&normalize_address(address))
    }

    fn get_all(&self) -> HashSet<String> {
        self.labels.clone()
    }
}

pub struct ContractLabelService<T: ContractLabelRepositoryTrait> {
    repository: T,
}

impl<T: ContractLabelRepositoryTrait> ContractLabelService<T> {
    pub fn new(
        path: Option<&Path>,
    ) -> Result<ContractLabelService<ContractLabelRepository>, RepositoryError> {
        let repository = ContractLabelRepository::new(path)?;
        Ok(ContractLabelService { repository })
    }

    pub fn new_with_repository(repository: T) -> Result<Self, RepositoryError> {
        Ok(ContractLabelService { repository })
    }

    pub fn contains(&self, address: &str) -> bool {
        self.repository.contains(address)
    }

    pub fn get_all(&self) -> HashSet<String> {
        self.repository.get_all()
    }
}
