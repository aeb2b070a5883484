//! # Exemplos de Demonstração
//!
//! Sentenças anotadas no formato BIO por palavra, junto com a divisão em
//! sub-tokens que um tokenizador WordPiece produziria (`##` marca
//! continuação). Usadas pelo endpoint `/demo` do servidor e pelos testes.

use crate::encoding::Encoding;
use crate::error::Result;
use crate::scheme::LabelScheme;

/// Uma sentença com rótulos por palavra e sub-tokens por palavra.
pub struct DemoExample {
    pub text: &'static str,
    /// Pares (palavra, tag_BIO).
    pub annotations: &'static [(&'static str, &'static str)],
    /// Sub-tokens de cada palavra, na mesma ordem de `annotations`.
    pub pieces: &'static [&'static [&'static str]],
}

impl DemoExample {
    pub fn words(&self) -> Vec<&'static str> {
        self.annotations.iter().map(|(w, _)| *w).collect()
    }

    /// Códigos numéricos dos rótulos segundo o esquema.
    pub fn word_labels(&self, scheme: &LabelScheme) -> Result<Vec<i64>> {
        self.annotations.iter().map(|(_, tag)| scheme.id(tag)).collect()
    }

    /// Codificação cercada por `[CLS]` e `[SEP]`.
    pub fn encoding(&self) -> Encoding {
        Encoding::from_word_pieces(
            self.pieces.iter().map(|word| word.iter().copied()),
            Some("[CLS]"),
            Some("[SEP]"),
        )
    }
}

/// Retorna os exemplos de demonstração.
pub fn demo_examples() -> Vec<DemoExample> {
    vec![
        DemoExample {
            text: "EU rejects German call to boycott British lamb .",
            annotations: &[
                ("EU", "B-ORG"), ("rejects", "O"), ("German", "B-MISC"), ("call", "O"),
                ("to", "O"), ("boycott", "O"), ("British", "B-MISC"), ("lamb", "O"), (".", "O"),
            ],
            pieces: &[
                &["EU"], &["rejects"], &["German"], &["call"], &["to"],
                &["boy", "##cott"], &["British"], &["la", "##mb"], &["."],
            ],
        },
        DemoExample {
            text: "Peter Blackburn",
            annotations: &[("Peter", "B-PER"), ("Blackburn", "I-PER")],
            pieces: &[&["Peter"], &["Black", "##burn"]],
        },
        DemoExample {
            text: "O Hospital Albert Einstein em São Paulo é referência em cardiologia.",
            annotations: &[
                ("O", "O"), ("Hospital", "B-ORG"), ("Albert", "I-ORG"), ("Einstein", "I-ORG"),
                ("em", "O"), ("São", "B-LOC"), ("Paulo", "I-LOC"), ("é", "O"),
                ("referência", "O"), ("em", "O"), ("cardiologia", "O"), (".", "O"),
            ],
            pieces: &[
                &["O"], &["Hospital"], &["Albert"], &["Einstein"], &["em"], &["São"],
                &["Paulo"], &["é"], &["refer", "##ência"], &["em"],
                &["card", "##io", "##logia"], &["."],
            ],
        },
        DemoExample {
            text: "A Fiocruz desenvolveu a vacina contra a dengue.",
            annotations: &[
                ("A", "O"), ("Fiocruz", "B-ORG"), ("desenvolveu", "O"), ("a", "O"),
                ("vacina", "O"), ("contra", "O"), ("a", "O"), ("dengue", "B-MISC"), (".", "O"),
            ],
            pieces: &[
                &["A"], &["Fio", "##cruz"], &["desenvolve", "##u"], &["a"], &["vacina"],
                &["contra"], &["a"], &["den", "##gue"], &["."],
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_examples_are_consistent() {
        let scheme = LabelScheme::conll2003();
        for example in demo_examples() {
            assert_eq!(
                example.annotations.len(),
                example.pieces.len(),
                "palavras e sub-tokens desalinhados em {:?}",
                example.text
            );
            let labels = example.word_labels(&scheme).unwrap();
            assert_eq!(labels.len(), example.words().len());
            assert!(example.encoding().validate(labels.len()).is_ok());
        }
    }

    #[test]
    fn test_first_example_labels() {
        let scheme = LabelScheme::conll2003();
        let first = &demo_examples()[0];
        assert_eq!(first.word_labels(&scheme).unwrap(), vec![3, 0, 7, 0, 0, 0, 7, 0, 0]);
        assert_eq!(first.encoding().len(), 13);
    }
}
