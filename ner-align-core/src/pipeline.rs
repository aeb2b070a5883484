//! # Pipeline de Alinhamento — Orquestrador
//!
//! Junta configuração, alinhamento, pós-processamento e avaliação num único
//! objeto, espelhando as duas pontas de um treino de classificação de tokens:
//!
//! 1. **Pré-processamento**: rótulos por palavra → rótulos por sub-token ([`align`](crate::align)).
//! 2. **Avaliação**: logits/predições + rótulos → nomes → métricas por span
//!    ([`postprocess`](crate::postprocess), [`metrics`](crate::metrics)).

use tracing::debug;

use crate::align::{align_batch, align_labels, AlignInput};
use crate::config::AlignConfig;
use crate::encoding::Encoding;
use crate::error::Result;
use crate::metrics::{evaluate, Report};
use crate::postprocess::{argmax, postprocess, LabelledRow};
use crate::scheme::LabelScheme;

/// O pipeline principal.
///
/// Só guarda configuração imutável; todos os métodos usam `&self` e podem ser
/// chamados de várias threads.
#[derive(Debug, Clone, Default)]
pub struct AlignPipeline {
    config: AlignConfig,
}

impl AlignPipeline {
    pub fn new(config: AlignConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlignConfig {
        &self.config
    }

    pub fn scheme(&self) -> &LabelScheme {
        &self.config.scheme
    }

    /// Alinha uma sentença usando a estratégia configurada.
    pub fn align(&self, word_labels: &[i64], word_ids: &[Option<usize>]) -> Result<Vec<i64>> {
        align_labels(word_labels, word_ids, &self.config.scheme, self.config.strategy)
    }

    /// Como [`AlignPipeline::align`], validando também a codificação.
    pub fn align_encoding(&self, word_labels: &[i64], encoding: &Encoding) -> Result<Vec<i64>> {
        encoding.validate(word_labels.len())?;
        self.align(word_labels, &encoding.word_ids)
    }

    pub fn align_batch(&self, batch: &[AlignInput]) -> Result<Vec<Vec<i64>>> {
        align_batch(batch, &self.config.scheme, self.config.strategy)
    }

    pub fn postprocess(&self, predictions: &[Vec<i64>], labels: &[Vec<i64>]) -> Result<Vec<LabelledRow>> {
        postprocess(predictions, labels, &self.config.scheme)
    }

    /// Pós-processa e avalia um lote de predições já decodificadas.
    pub fn compute_metrics(&self, predictions: &[Vec<i64>], labels: &[Vec<i64>]) -> Result<Report> {
        let rows = self.postprocess(predictions, labels)?;
        let report = evaluate(&rows);
        debug!(
            rows = rows.len(),
            f1 = report.overall.f1,
            accuracy = report.accuracy,
            "métricas calculadas"
        );
        Ok(report)
    }

    /// Decodifica logits `[lote, seq, rótulos]` por argmax e avalia.
    pub fn compute_metrics_from_logits(&self, logits: &[Vec<Vec<f32>>], labels: &[Vec<i64>]) -> Result<Report> {
        let predictions = argmax(logits)?;
        self.compute_metrics(&predictions, labels)
    }
}
