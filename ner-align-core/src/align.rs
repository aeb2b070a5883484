//! # Alinhamento de Rótulos Palavra → Sub-token
//!
//! Os datasets de NER rotulam **palavras**, mas o modelo enxerga **sub-tokens**.
//! Este módulo propaga o rótulo de cada palavra para os seus pedaços:
//!
//! ```text
//! word_ids:   None  0      1   2       3   3       None
//! rótulos:          B-ORG  O   B-MISC  B-MISC
//! alinhado:   -100  B-ORG  O   B-MISC  B-MISC I-MISC -100
//! ```
//!
//! 1. Tokens especiais (sem palavra de origem) recebem o sentinela de ignorar.
//! 2. O primeiro token de cada palavra recebe o rótulo original.
//! 3. Os tokens seguintes da mesma palavra recebem a continuação do rótulo:
//!    um sub-token nunca pode abrir uma nova entidade (`B-X` vira `I-X`).

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::encoding::validate_word_ids;
use crate::error::Result;
use crate::scheme::LabelScheme;

/// Estratégia para os sub-tokens de continuação.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignStrategy {
    /// Todos os sub-tokens recebem rótulo (`B-X` na continuação vira `I-X`).
    #[default]
    AllTokens,
    /// Só o primeiro sub-token é rotulado; os demais são ignorados na perda.
    FirstToken,
}

/// Alinha os rótulos de uma sentença ao seu mapa de word-ids.
///
/// `word_labels[i]` é o rótulo da palavra `i`; um rótulo igual ao sentinela
/// marca a palavra inteira como ignorada. A saída tem o mesmo tamanho de
/// `word_ids`.
///
/// # Erros
/// - word-id fora de `0..word_labels.len()` ou trechos não contíguos;
/// - código de rótulo fora do esquema.
pub fn align_labels(
    word_labels: &[i64],
    word_ids: &[Option<usize>],
    scheme: &LabelScheme,
    strategy: AlignStrategy,
) -> Result<Vec<i64>> {
    validate_word_ids(word_ids, word_labels.len())?;

    let ignore = scheme.ignore_index();
    let mut aligned = Vec::with_capacity(word_ids.len());
    let mut current_word: Option<usize> = None;

    for &entry in word_ids {
        let label = match entry {
            None => ignore,
            Some(word_id) => {
                let label = word_labels[word_id];
                if scheme.is_ignore(label) {
                    ignore
                } else if current_word == Some(word_id) {
                    match strategy {
                        AlignStrategy::AllTokens => scheme.continuation(label)?,
                        AlignStrategy::FirstToken => {
                            scheme.name(label)?;
                            ignore
                        }
                    }
                } else {
                    // Valida o código mesmo quando copiado sem alteração
                    scheme.name(label)?;
                    label
                }
            }
        };
        current_word = entry;
        aligned.push(label);
    }

    Ok(aligned)
}

/// Uma sentença a alinhar: rótulos por palavra e word-ids por token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignInput {
    pub labels: Vec<i64>,
    pub word_ids: Vec<Option<usize>>,
}

/// Alinha um lote de sentenças em paralelo, preservando a ordem.
///
/// Falha no primeiro erro encontrado: não há resultado parcial.
pub fn align_batch(
    batch: &[AlignInput],
    scheme: &LabelScheme,
    strategy: AlignStrategy,
) -> Result<Vec<Vec<i64>>> {
    debug!(rows = batch.len(), ?strategy, "alinhando lote");
    batch
        .par_iter()
        .map(|row| align_labels(&row.labels, &row.word_ids, scheme, strategy))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AlignError;
    use proptest::prelude::*;

    const IGNORE: i64 = -100;

    fn conll() -> LabelScheme {
        LabelScheme::conll2003()
    }

    #[test]
    fn test_one_token_per_word_with_markers() {
        let aligned = align_labels(
            &[3, 0, 7],
            &[None, Some(0), Some(1), Some(2), None],
            &conll(),
            AlignStrategy::AllTokens,
        )
        .unwrap();
        assert_eq!(aligned, vec![IGNORE, 3, 0, 7, IGNORE]);
    }

    #[test]
    fn test_split_begin_becomes_inside() {
        // "EU rejects German boycott": "boycott" (B-MISC) vira boy + ##cott
        let word_ids = [Some(0), Some(1), Some(2), Some(3), Some(3)];
        let aligned = align_labels(&[3, 0, 7, 7], &word_ids, &conll(), AlignStrategy::AllTokens)
            .unwrap();
        assert_eq!(&aligned[3..], &[7, 8]);
    }

    #[test]
    fn test_split_outside_and_inside_unchanged() {
        let word_ids = [Some(0), Some(0), Some(0), Some(1), Some(1)];
        let aligned = align_labels(&[0, 2], &word_ids, &conll(), AlignStrategy::AllTokens).unwrap();
        assert_eq!(aligned, vec![0, 0, 0, 2, 2]);
    }

    #[test]
    fn test_first_token_strategy() {
        let word_ids = [None, Some(0), Some(0), Some(1), None];
        let aligned = align_labels(&[5, 0], &word_ids, &conll(), AlignStrategy::FirstToken).unwrap();
        assert_eq!(aligned, vec![IGNORE, 5, IGNORE, 0, IGNORE]);
    }

    #[test]
    fn test_ignored_word_propagates() {
        let word_ids = [Some(0), Some(1), Some(1)];
        let aligned =
            align_labels(&[1, IGNORE], &word_ids, &conll(), AlignStrategy::AllTokens).unwrap();
        assert_eq!(aligned, vec![1, IGNORE, IGNORE]);
    }

    #[test]
    fn test_empty_inputs() {
        let aligned = align_labels(&[], &[], &conll(), AlignStrategy::AllTokens).unwrap();
        assert!(aligned.is_empty());
        // Apenas marcadores
        let aligned = align_labels(&[], &[None, None], &conll(), AlignStrategy::AllTokens).unwrap();
        assert_eq!(aligned, vec![IGNORE, IGNORE]);
    }

    #[test]
    fn test_custom_ignore_index() {
        let scheme = LabelScheme::new(["O", "B-PER", "I-PER"], -1).unwrap();
        let aligned =
            align_labels(&[1], &[None, Some(0), Some(0)], &scheme, AlignStrategy::AllTokens).unwrap();
        assert_eq!(aligned, vec![-1, 1, 2]);
    }

    #[test]
    fn test_contract_violations() {
        let scheme = conll();
        assert!(matches!(
            align_labels(&[0], &[Some(0), Some(1)], &scheme, AlignStrategy::AllTokens),
            Err(AlignError::WordIndexOutOfRange { .. })
        ));
        assert!(matches!(
            align_labels(&[0, 0], &[Some(1), Some(0)], &scheme, AlignStrategy::AllTokens),
            Err(AlignError::NonContiguousWordIds { .. })
        ));
        assert!(matches!(
            align_labels(&[42], &[Some(0)], &scheme, AlignStrategy::AllTokens),
            Err(AlignError::UnknownLabel { code: 42, .. })
        ));
        assert!(matches!(
            align_labels(&[0, 12], &[Some(0), Some(1), Some(1)], &scheme, AlignStrategy::FirstToken),
            Err(AlignError::UnknownLabel { code: 12, .. })
        ));
    }

    #[test]
    fn test_align_batch_preserves_order() {
        let batch = vec![
            AlignInput { labels: vec![3, 0, 7], word_ids: vec![None, Some(0), Some(1), Some(2), None] },
            AlignInput { labels: vec![1], word_ids: vec![None, Some(0), Some(0), None] },
            AlignInput { labels: vec![], word_ids: vec![None, None] },
        ];
        let aligned = align_batch(&batch, &conll(), AlignStrategy::AllTokens).unwrap();
        assert_eq!(
            aligned,
            vec![
                vec![IGNORE, 3, 0, 7, IGNORE],
                vec![IGNORE, 1, 2, IGNORE],
                vec![IGNORE, IGNORE],
            ]
        );
    }

    #[test]
    fn test_align_batch_fails_on_bad_row() {
        let batch = vec![
            AlignInput { labels: vec![0], word_ids: vec![Some(0)] },
            AlignInput { labels: vec![99], word_ids: vec![Some(0)] },
        ];
        assert!(align_batch(&batch, &conll(), AlignStrategy::AllTokens).is_err());
    }

    /// Gera rótulos CoNLL e o número de pedaços de cada palavra.
    fn words_strategy() -> impl Strategy<Value = Vec<(i64, usize)>> {
        prop::collection::vec((0i64..9, 1usize..4), 0..12)
    }

    fn word_ids_for(pieces: &[usize], markers: bool) -> Vec<Option<usize>> {
        let mut ids = Vec::new();
        if markers {
            ids.push(None);
        }
        for (w, &n) in pieces.iter().enumerate() {
            ids.extend(std::iter::repeat(Some(w)).take(n));
        }
        if markers {
            ids.push(None);
        }
        ids
    }

    proptest! {
        #[test]
        fn prop_one_token_per_word_is_identity(words in words_strategy()) {
            let labels: Vec<i64> = words.iter().map(|(l, _)| *l).collect();
            let ids = word_ids_for(&vec![1; labels.len()], false);
            let aligned = align_labels(&labels, &ids, &conll(), AlignStrategy::AllTokens).unwrap();
            prop_assert_eq!(aligned, labels);
        }

        #[test]
        fn prop_split_word_gets_one_begin(words in words_strategy(), markers in any::<bool>()) {
            let labels: Vec<i64> = words.iter().map(|(l, _)| *l).collect();
            let pieces: Vec<usize> = words.iter().map(|(_, n)| *n).collect();
            let ids = word_ids_for(&pieces, markers);
            let aligned = align_labels(&labels, &ids, &conll(), AlignStrategy::AllTokens).unwrap();
            prop_assert_eq!(aligned.len(), ids.len());

            let mut offset = usize::from(markers);
            for (&c, &k) in labels.iter().zip(&pieces) {
                let cont = if c % 2 == 1 { c + 1 } else { c };
                let mut expected = vec![c];
                expected.extend(std::iter::repeat(cont).take(k - 1));
                prop_assert_eq!(&aligned[offset..offset + k], expected.as_slice());
                offset += k;
            }
        }

        #[test]
        fn prop_markers_always_ignored(words in words_strategy()) {
            let labels: Vec<i64> = words.iter().map(|(l, _)| *l).collect();
            let pieces: Vec<usize> = words.iter().map(|(_, n)| *n).collect();
            let ids = word_ids_for(&pieces, true);
            let aligned = align_labels(&labels, &ids, &conll(), AlignStrategy::AllTokens).unwrap();
            for (id, label) in ids.iter().zip(&aligned) {
                prop_assert_eq!(id.is_none(), *label == IGNORE);
            }
        }
    }
}
