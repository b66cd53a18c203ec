use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateCollectionRequest {
    pub name: String,
    #[serde(default)]
    pub pinned: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCollectionRequest {
    pub name: String,
    #[serde(default)]
    pub pinned: bool,
}
