use crate::imports::*;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: u64,
    #[serde(rename = "nombre")]
    pub name: String,
}
