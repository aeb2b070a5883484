//! # Avaliação por Spans
//!
//! Precisão, revocação e F1 calculadas sobre **entidades completas**, não
//! sobre tokens: uma entidade só conta como acerto se tipo, início e fim
//! baterem exatamente com o gold standard.
//!
//! A reconstrução dos spans segue o modo tolerante do esquema BIO: um `I-X`
//! depois de `O` (ou de outro tipo) abre uma nova entidade em vez de ser
//! descartado.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::label::Tag;
use crate::postprocess::LabelledRow;

/// Um trecho de tokens `[start, end)` com o tipo da entidade.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    pub entity_type: String,
    pub start: usize,
    pub end: usize,
}

/// Converte uma sequência de rótulos BIO em entidades.
///
/// Máquina de estados:
/// - `B-X` fecha a entidade aberta e inicia uma nova do tipo X;
/// - `I-X` continua a entidade aberta se ela for do tipo X, senão inicia uma nova;
/// - `O` (ou um rótulo não reconhecido) fecha a entidade aberta.
///
/// # Exemplo
/// `[B-PER, I-PER, O, I-LOC]` → `[PER 0..2, LOC 3..4]`
pub fn extract_entities<S: AsRef<str>>(labels: &[S]) -> Vec<Entity> {
    let mut entities = Vec::new();
    let mut open: Option<(String, usize)> = None;

    for (i, label) in labels.iter().enumerate() {
        let tag = Tag::from_label(label.as_ref()).unwrap_or(Tag::Outside);
        let continues = match (&tag, &open) {
            (Tag::Inside(ty), Some((open_ty, _))) => ty == open_ty,
            _ => false,
        };
        if continues {
            continue;
        }
        if let Some((entity_type, start)) = open.take() {
            entities.push(Entity { entity_type, start, end: i });
        }
        if let Tag::Begin(ty) | Tag::Inside(ty) = tag {
            open = Some((ty, i));
        }
    }

    if let Some((entity_type, start)) = open {
        entities.push(Entity {
            entity_type,
            start,
            end: labels.len(),
        });
    }
    entities
}

/// Precisão, revocação e F1 de um tipo (ou do total).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Número de entidades no gold standard.
    pub support: usize,
}

impl Scores {
    /// Divisão por zero resulta em 0.0.
    fn from_counts(correct: usize, predicted: usize, support: usize) -> Self {
        let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
        let precision = ratio(correct, predicted);
        let recall = ratio(correct, support);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };
        Self {
            precision,
            recall,
            f1,
            support,
        }
    }
}

/// Resultado da avaliação de um conjunto de sentenças.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Métricas por tipo de entidade, em ordem alfabética.
    pub per_type: BTreeMap<String, Scores>,
    /// Média micro sobre todas as entidades.
    pub overall: Scores,
    /// Fração de tokens com rótulo predito igual ao verdadeiro.
    pub accuracy: f64,
}

#[derive(Default)]
struct Counts {
    correct: usize,
    predicted: usize,
    gold: usize,
}

/// Avalia as sentenças pós-processadas.
pub fn evaluate(rows: &[LabelledRow]) -> Report {
    let mut counts: BTreeMap<String, Counts> = BTreeMap::new();
    let mut total = Counts::default();
    let mut tokens = 0usize;
    let mut tokens_correct = 0usize;

    for row in rows {
        tokens += row.gold.len();
        tokens_correct += row
            .gold
            .iter()
            .zip(&row.predicted)
            .filter(|(g, p)| g == p)
            .count();

        let gold = extract_entities(&row.gold);
        let predicted = extract_entities(&row.predicted);
        let gold_set: HashSet<&Entity> = gold.iter().collect();

        for entity in &gold {
            counts.entry(entity.entity_type.clone()).or_default().gold += 1;
            total.gold += 1;
        }
        for entity in &predicted {
            let c = counts.entry(entity.entity_type.clone()).or_default();
            c.predicted += 1;
            total.predicted += 1;
            if gold_set.contains(entity) {
                c.correct += 1;
                total.correct += 1;
            }
        }
    }

    Report {
        per_type: counts
            .into_iter()
            .map(|(ty, c)| (ty, Scores::from_counts(c.correct, c.predicted, c.gold)))
            .collect(),
        overall: Scores::from_counts(total.correct, total.predicted, total.gold),
        accuracy: if tokens == 0 {
            0.0
        } else {
            tokens_correct as f64 / tokens as f64
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(gold: &[&str], predicted: &[&str]) -> LabelledRow {
        LabelledRow {
            gold: gold.iter().map(|s| s.to_string()).collect(),
            predicted: predicted.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn entity(ty: &str, start: usize, end: usize) -> Entity {
        Entity { entity_type: ty.to_string(), start, end }
    }

    #[test]
    fn test_extract_entities() {
        let tags = ["O", "B-PER", "I-PER", "O", "B-LOC"];
        assert_eq!(
            extract_entities(&tags),
            vec![entity("PER", 1, 3), entity("LOC", 4, 5)]
        );
    }

    #[test]
    fn test_extract_lenient_inside() {
        // I- sem B- abre entidade; troca de tipo fecha a anterior
        let tags = ["I-MISC", "I-MISC", "I-PER", "B-PER", "B-PER", "I-PER"];
        assert_eq!(
            extract_entities(&tags),
            vec![
                entity("MISC", 0, 2),
                entity("PER", 2, 3),
                entity("PER", 3, 4),
                entity("PER", 4, 6),
            ]
        );
    }

    #[test]
    fn test_extract_empty_and_outside() {
        assert!(extract_entities::<&str>(&[]).is_empty());
        assert!(extract_entities(&["O", "O", "???"]).is_empty());
    }

    #[test]
    fn test_evaluate_perfect() {
        let rows = vec![row(
            &["B-ORG", "O", "B-MISC", "O", "O", "O", "B-MISC", "I-MISC", "O"],
            &["B-ORG", "O", "B-MISC", "O", "O", "O", "B-MISC", "I-MISC", "O"],
        )];
        let report = evaluate(&rows);
        assert_eq!(report.overall.f1, 1.0);
        assert_eq!(report.overall.support, 3);
        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.per_type["MISC"].support, 2);
    }

    #[test]
    fn test_evaluate_partial_match_is_miss() {
        // Gold: PER 0..2, LOC 3..4; predito: PER 0..1 (fronteira errada), LOC 3..4
        let rows = vec![row(
            &["B-PER", "I-PER", "O", "B-LOC"],
            &["B-PER", "O", "O", "B-LOC"],
        )];
        let report = evaluate(&rows);
        assert_eq!(report.overall.precision, 0.5);
        assert_eq!(report.overall.recall, 0.5);
        assert_eq!(report.overall.f1, 0.5);
        assert_eq!(report.accuracy, 0.75);
        assert_eq!(report.per_type["PER"].f1, 0.0);
        assert_eq!(report.per_type["LOC"].f1, 1.0);
    }

    #[test]
    fn test_evaluate_predicted_only_type() {
        let rows = vec![row(&["O", "O"], &["B-ORG", "O"])];
        let report = evaluate(&rows);
        let org = report.per_type["ORG"];
        assert_eq!(org.support, 0);
        assert_eq!(org.precision, 0.0);
        assert_eq!(org.recall, 0.0);
        assert_eq!(report.overall.f1, 0.0);
    }

    #[test]
    fn test_entities_do_not_cross_rows() {
        let rows = vec![row(&["B-PER"], &["B-PER"]), row(&["I-PER"], &["B-LOC"])];
        let report = evaluate(&rows);
        assert_eq!(report.overall.support, 2);
        assert_eq!(report.per_type["PER"].recall, 0.5);
    }

    #[test]
    fn test_evaluate_empty() {
        let report = evaluate(&[]);
        assert_eq!(report, Report::default());
    }
}
