//! # Codificação de Sub-tokens
//!
//! Modelo da saída de um tokenizador de sub-palavras (WordPiece, BPE...):
//! a sequência de tokens e, para cada token, a palavra de origem.
//!
//! ```text
//! palavras:  EU   rejects  German  call  to  boycott
//! tokens:    [CLS] EU rejects German call to boy ##cott [SEP]
//! word_ids:  None  0  1       2      3    4  5   5      None
//! ```
//!
//! A tokenização em si é responsabilidade do tokenizador externo; aqui só
//! representamos e validamos o mapa de word-ids que ele produz.

use serde::{Deserialize, Serialize};

use crate::error::{AlignError, Result};

/// Tokens de uma sentença e a palavra de origem de cada um.
///
/// `None` em `word_ids` marca tokens especiais (início/fim de sentença).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encoding {
    pub tokens: Vec<String>,
    pub word_ids: Vec<Option<usize>>,
}

impl Encoding {
    /// Monta uma codificação a partir dos pedaços de cada palavra,
    /// opcionalmente cercada por marcadores (ex: `[CLS]` e `[SEP]`).
    pub fn from_word_pieces<W, P>(pieces: W, bos: Option<&str>, eos: Option<&str>) -> Self
    where
        W: IntoIterator,
        W::Item: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let mut encoding = Encoding::default();
        if let Some(marker) = bos {
            encoding.push_marker(marker);
        }
        for (word_id, word) in pieces.into_iter().enumerate() {
            for piece in word {
                encoding.tokens.push(piece.into());
                encoding.word_ids.push(Some(word_id));
            }
        }
        if let Some(marker) = eos {
            encoding.push_marker(marker);
        }
        encoding
    }

    fn push_marker(&mut self, marker: &str) {
        self.tokens.push(marker.to_string());
        self.word_ids.push(None);
    }

    pub fn len(&self) -> usize {
        self.word_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_ids.is_empty()
    }

    /// Número de palavras distintas cobertas pelos tokens.
    pub fn word_count(&self) -> usize {
        self.word_ids
            .iter()
            .flatten()
            .max()
            .map_or(0, |&max| max + 1)
    }

    /// Verifica os invariantes da codificação para uma sentença de
    /// `word_count` palavras.
    pub fn validate(&self, word_count: usize) -> Result<()> {
        if self.tokens.len() != self.word_ids.len() {
            return Err(AlignError::EncodingLength {
                tokens: self.tokens.len(),
                word_ids: self.word_ids.len(),
            });
        }
        validate_word_ids(&self.word_ids, word_count)
    }
}

/// Checa que os word-ids estão dentro de `0..word_count` e que cada palavra
/// ocupa um único trecho contíguo, em ordem não-decrescente.
pub fn validate_word_ids(word_ids: &[Option<usize>], word_count: usize) -> Result<()> {
    let mut last: Option<usize> = None;
    let mut run_open = false;

    for (position, entry) in word_ids.iter().enumerate() {
        let Some(word_id) = *entry else {
            run_open = false;
            continue;
        };
        if word_id >= word_count {
            return Err(AlignError::WordIndexOutOfRange {
                position,
                word_id,
                word_count,
            });
        }
        if let Some(previous) = last {
            let continues = run_open && word_id == previous;
            if !continues && word_id <= previous {
                return Err(AlignError::NonContiguousWordIds {
                    position,
                    word_id,
                    previous,
                });
            }
        }
        last = Some(word_id);
        run_open = true;
    }
    Ok(())
}
