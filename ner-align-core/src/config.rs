//! # Configuração
//!
//! Esquema de rótulos + estratégia de alinhamento, carregáveis de JSON:
//!
//! ```json
//! {
//!   "scheme": { "names": ["O", "B-PER", "I-PER"], "ignore_index": -100 },
//!   "strategy": "first_token"
//! }
//! ```
//!
//! Campos ausentes usam o preset CoNLL-2003 e `all_tokens`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::align::AlignStrategy;
use crate::error::Result;
use crate::scheme::LabelScheme;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    pub scheme: LabelScheme,
    pub strategy: AlignStrategy,
}

impl AlignConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
