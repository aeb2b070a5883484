//! # Esquema de Rótulos (configuração imutável)
//!
//! Tabela id ↔ nome fornecida pelo esquema do dataset, junto com a tag BIO
//! de cada rótulo, a tabela de continuação (B-X → I-X) e o sentinela de
//! "ignorar" usado pela função de perda.
//!
//! | id | nome   | continuação |
//! |----|--------|-------------|
//! | 0  | O      | 0           |
//! | 1  | B-PER  | 2           |
//! | 2  | I-PER  | 2           |
//! | 3  | B-ORG  | 4           |
//! | …  | …      | …           |
//!
//! No preset CoNLL-2003 a tabela coincide com a regra "código ímpar + 1",
//! mas qualquer ordem de rótulos funciona.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{AlignError, Result};
use crate::label::Tag;

/// Valor padrão do sentinela de ignorar (convenção de `CrossEntropyLoss`).
pub const DEFAULT_IGNORE_INDEX: i64 = -100;

/// Rótulos do CoNLL-2003 na ordem do dataset.
pub const CONLL2003_LABELS: [&str; 9] = [
    "O", "B-PER", "I-PER", "B-ORG", "I-ORG", "B-LOC", "I-LOC", "B-MISC", "I-MISC",
];

/// Espaço de rótulos validado.
///
/// Construído uma vez e passado por referência para alinhamento e
/// pós-processamento; nunca é estado global.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScheme", into = "RawScheme")]
pub struct LabelScheme {
    names: Vec<String>,
    tags: Vec<Tag>,
    ids: HashMap<String, usize>,
    /// Para cada id, o id usado nos sub-tokens de continuação.
    continuation: Vec<usize>,
    ignore_index: i64,
}

/// Forma serializada: `{ "names": [...], "ignore_index": -100 }`.
#[derive(Serialize, Deserialize)]
struct RawScheme {
    names: Vec<String>,
    #[serde(default = "default_ignore_index")]
    ignore_index: i64,
}

fn default_ignore_index() -> i64 {
    DEFAULT_IGNORE_INDEX
}

impl TryFrom<RawScheme> for LabelScheme {
    type Error = AlignError;

    fn try_from(raw: RawScheme) -> Result<Self> {
        LabelScheme::new(raw.names, raw.ignore_index)
    }
}

impl From<LabelScheme> for RawScheme {
    fn from(scheme: LabelScheme) -> Self {
        RawScheme {
            names: scheme.names,
            ignore_index: scheme.ignore_index,
        }
    }
}

impl LabelScheme {
    /// Cria um esquema a partir da lista de nomes (id = posição na lista).
    ///
    /// Falha se a lista for vazia, tiver nomes repetidos ou mal formados, ou
    /// se o sentinela coincidir com um id válido.
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>, ignore_index: i64) -> Result<Self> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(AlignError::EmptyScheme);
        }
        if ignore_index >= 0 && (ignore_index as u64) < names.len() as u64 {
            return Err(AlignError::IgnoreCollision(ignore_index));
        }

        let mut ids = HashMap::with_capacity(names.len());
        let mut tags = Vec::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if ids.insert(name.clone(), i).is_some() {
                return Err(AlignError::DuplicateLabel(name.clone()));
            }
            tags.push(Tag::parse(name)?);
        }

        // B-X continua como I-X; sem I-X no esquema, o próprio B-X é mantido
        let continuation = tags
            .iter()
            .enumerate()
            .map(|(i, tag)| match tag {
                Tag::Begin(ty) => ids.get(&Tag::Inside(ty.clone()).label()).copied().unwrap_or(i),
                _ => i,
            })
            .collect();

        Ok(Self {
            names,
            tags,
            ids,
            continuation,
            ignore_index,
        })
    }

    /// Preset CoNLL-2003 com sentinela `-100`.
    pub fn conll2003() -> Self {
        Self::new(CONLL2003_LABELS, DEFAULT_IGNORE_INDEX)
            .unwrap_or_else(|e| unreachable!("preset CoNLL-2003 inválido: {e}"))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn ignore_index(&self) -> i64 {
        self.ignore_index
    }

    pub fn is_ignore(&self, code: i64) -> bool {
        code == self.ignore_index
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Converte um código em índice, rejeitando valores fora do esquema.
    fn index(&self, code: i64) -> Result<usize> {
        usize::try_from(code)
            .ok()
            .filter(|&i| i < self.names.len())
            .ok_or(AlignError::UnknownLabel {
                code,
                len: self.names.len(),
            })
    }

    pub fn name(&self, code: i64) -> Result<&str> {
        Ok(&self.names[self.index(code)?])
    }

    pub fn tag(&self, code: i64) -> Result<&Tag> {
        Ok(&self.tags[self.index(code)?])
    }

    pub fn id(&self, name: &str) -> Result<i64> {
        self.ids
            .get(name)
            .map(|&i| i as i64)
            .ok_or_else(|| AlignError::UnknownLabelName(name.to_string()))
    }

    /// Código a usar num sub-token que continua a palavra rotulada com `code`.
    pub fn continuation(&self, code: i64) -> Result<i64> {
        Ok(self.continuation[self.index(code)?] as i64)
    }

    /// Tipos de entidade presentes no esquema, na ordem de primeira aparição.
    pub fn entity_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = Vec::new();
        for ty in self.tags.iter().filter_map(Tag::entity_type) {
            if !types.contains(&ty) {
                types.push(ty);
            }
        }
        types
    }
}

impl Default for LabelScheme {
    fn default() -> Self {
        Self::conll2003()
    }
}
