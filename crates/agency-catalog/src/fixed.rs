//! A breed catalog backed by a fixed list.

use agency_core::{Result, catalog::BreedCatalog};

#[derive(Debug, Clone, Default)]
pub struct StaticBreedCatalog {
  names: Vec<String>,
}

impl StaticBreedCatalog {
  pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
    Self { names: names.into_iter().map(Into::into).collect() }
  }
}

impl BreedCatalog for StaticBreedCatalog {
  async fn check_breed(&self, breed: &str) -> Result<()> {
    crate::lookup(breed, self.names.clone())
  }
}

#[cfg(test)]
mod tests {
  use agency_core::Error;

  use super::*;

  #[tokio::test]
  async fn accepts_listed_breeds_only() {
    let catalog = StaticBreedCatalog::new(["Abyssinian", "Bengal"]);
    catalog.check_breed("Bengal").await.unwrap();

    let err = catalog.check_breed("bengal").await.unwrap_err();
    assert_eq!(err, Error::UnknownBreed {
      breed: "bengal".into(),
      valid: vec!["Abyssinian".into(), "Bengal".into()],
    });
    assert_eq!(
      err.to_string(),
      "Breed 'bengal' is not valid. Please choose from valid cat breeds \
       [\"Abyssinian\", \"Bengal\"]"
    );
  }
}
