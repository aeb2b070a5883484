//! # Esquema de Tags BIO
//!
//! Define o esquema de anotação **BIO** (Beginning-Inside-Outside) usado para
//! rotular palavras e sub-tokens no reconhecimento de entidades nomeadas.
//!
//! - `B-TIPO`: Begin — primeiro token de uma entidade
//! - `I-TIPO`: Inside — tokens subsequentes da mesma entidade
//! - `O`: Outside — não é parte de nenhuma entidade
//!
//! Diferente de uma enumeração fixa de categorias, o tipo de entidade aqui é
//! uma string livre: o espaço de rótulos vem do esquema do dataset
//! (ver [`crate::scheme::LabelScheme`]).

use serde::{Deserialize, Serialize};

use crate::error::{AlignError, Result};

/// Tag BIO de um rótulo.
///
/// Substitui a aritmética de paridade ("códigos ímpares são B-") por uma
/// variante explícita; a conversão B → I fica numa tabela do esquema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// **Begin**: INÍCIO de uma entidade. Ex: **European** (B-ORG) Commission.
    Begin(String),
    /// **Inside**: CONTINUAÇÃO de uma entidade. Ex: European **Commission** (I-ORG).
    Inside(String),
    /// **Outside**: fora de qualquer entidade.
    Outside,
}

impl Tag {
    /// Representação textual da tag (ex: "B-PER", "I-ORG", "O")
    pub fn label(&self) -> String {
        match self {
            Tag::Begin(ty) => format!("B-{ty}"),
            Tag::Inside(ty) => format!("I-{ty}"),
            Tag::Outside => "O".to_string(),
        }
    }

    /// Tipo da entidade (se for B- ou I-)
    pub fn entity_type(&self) -> Option<&str> {
        match self {
            Tag::Begin(ty) | Tag::Inside(ty) => Some(ty),
            Tag::Outside => None,
        }
    }

    pub fn is_begin(&self) -> bool {
        matches!(self, Tag::Begin(_))
    }

    /// Verifica se a transição prev → next é válida no esquema BIO
    ///
    /// Regras:
    /// - `I-X` só pode seguir `B-X` ou `I-X` (mesmo tipo)
    /// - `B-X` e `O` podem seguir qualquer tag
    pub fn is_valid_transition(prev: &Tag, next: &Tag) -> bool {
        match next {
            Tag::Inside(ty) => match prev {
                Tag::Begin(prev_ty) | Tag::Inside(prev_ty) => prev_ty == ty,
                Tag::Outside => false,
            },
            _ => true,
        }
    }

    /// Parseia uma tag a partir de string (ex: "B-PER" → Begin("PER")).
    ///
    /// Retorna `None` para qualquer coisa fora de `O`, `B-*`, `I-*`.
    pub fn from_label(s: &str) -> Option<Self> {
        if s == "O" {
            return Some(Tag::Outside);
        }
        let (prefix, ty) = s.split_once('-')?;
        if ty.is_empty() {
            return None;
        }
        match prefix {
            "B" => Some(Tag::Begin(ty.to_string())),
            "I" => Some(Tag::Inside(ty.to_string())),
            _ => None,
        }
    }

    /// Como [`Tag::from_label`], mas com erro tipado.
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_label(s).ok_or_else(|| AlignError::MalformedLabel(s.to_string()))
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
