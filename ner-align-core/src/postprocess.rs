//! # Pós-processamento para Métricas
//!
//! Converte predições e rótulos numéricos (com padding) de volta em
//! sequências de nomes de rótulo por sentença, descartando as posições
//! ignoradas. O resultado alimenta o avaliador por spans ([`crate::metrics`]).

use serde::{Deserialize, Serialize};

use crate::error::{AlignError, Result};
use crate::scheme::LabelScheme;

/// Rótulos verdadeiros e preditos de uma sentença, já como nomes.
///
/// Invariante: `gold.len() == predicted.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelledRow {
    pub gold: Vec<String>,
    pub predicted: Vec<String>,
}

impl LabelledRow {
    pub fn len(&self) -> usize {
        self.gold.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gold.is_empty()
    }
}

/// Remove as posições ignoradas e traduz códigos em nomes, linha a linha.
///
/// Uma posição é mantida apenas se o rótulo verdadeiro não for o sentinela.
/// Predições nessas posições precisam ser códigos válidos do esquema.
pub fn postprocess(
    predictions: &[Vec<i64>],
    labels: &[Vec<i64>],
    scheme: &LabelScheme,
) -> Result<Vec<LabelledRow>> {
    if predictions.len() != labels.len() {
        return Err(AlignError::ShapeMismatch {
            row: None,
            predictions: predictions.len(),
            labels: labels.len(),
        });
    }

    predictions
        .iter()
        .zip(labels)
        .enumerate()
        .map(|(row, (preds, golds))| postprocess_row(row, preds, golds, scheme))
        .collect()
}

fn postprocess_row(
    row: usize,
    predictions: &[i64],
    labels: &[i64],
    scheme: &LabelScheme,
) -> Result<LabelledRow> {
    if predictions.len() != labels.len() {
        return Err(AlignError::ShapeMismatch {
            row: Some(row),
            predictions: predictions.len(),
            labels: labels.len(),
        });
    }

    let mut out = LabelledRow::default();
    for (&p, &l) in predictions.iter().zip(labels) {
        if scheme.is_ignore(l) {
            continue;
        }
        out.gold.push(scheme.name(l)?.to_string());
        out.predicted.push(scheme.name(p)?.to_string());
    }
    Ok(out)
}

/// Índice do maior logit no último eixo (`[lote, seq, rótulos]` → `[lote, seq]`).
///
/// Em empate vence o primeiro índice.
pub fn argmax(logits: &[Vec<Vec<f32>>]) -> Result<Vec<Vec<i64>>> {
    logits
        .iter()
        .enumerate()
        .map(|(row, positions)| {
            positions
                .iter()
                .enumerate()
                .map(|(position, scores)| {
                    scores
                        .iter()
                        .enumerate()
                        .fold(None, |best: Option<(usize, f32)>, (i, &s)| match best {
                            Some((_, b)) if s.total_cmp(&b).is_le() => best,
                            _ => Some((i, s)),
                        })
                        .map(|(i, _)| i as i64)
                        .ok_or(AlignError::EmptyLogits { row, position })
                })
                .collect()
        })
        .collect()
}
