//! # ner-align-core — Alinhamento de rótulos e avaliação para NER com sub-tokens
//!
//! Modelos baseados em Transformers veem **sub-tokens** ("boycott" → "boy", "##cott"),
//! mas os datasets de NER rotulam **palavras**. Este crate cuida das duas pontas
//! desse descompasso:
//!
//! 1.  **Esquema de rótulos** ([`scheme`]): tabela id ↔ nome, tags BIO e sentinela de ignorar.
//! 2.  **Alinhamento** ([`align`]): rótulos por palavra → rótulos por sub-token,
//!     usando o mapa de word-ids do tokenizador ([`encoding`]).
//! 3.  **Pós-processamento** ([`postprocess`]): predições e rótulos numéricos → nomes,
//!     sem as posições ignoradas.
//! 4.  **Avaliação** ([`metrics`]): precisão/revocação/F1 por entidade completa.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use ner_align_core::{align_labels, AlignStrategy, LabelScheme};
//!
//! let scheme = LabelScheme::conll2003();
//!
//! // "EU rejects German" → [CLS] EU rejects German [SEP]
//! let word_labels = [3, 0, 7]; // B-ORG, O, B-MISC
//! let word_ids = [None, Some(0), Some(1), Some(2), None];
//!
//! let aligned = align_labels(&word_labels, &word_ids, &scheme, AlignStrategy::AllTokens).unwrap();
//! assert_eq!(aligned, vec![-100, 3, 0, 7, -100]);
//! ```
//!
//! ## Módulos Principais
//!
//! - [`pipeline`]: Orquestrador que aplica a configuração a todas as etapas.
//! - [`config`]: Esquema + estratégia carregáveis de JSON.
//! - [`corpus`]: Sentenças de demonstração com sub-tokens.

pub mod align;
pub mod config;
pub mod corpus;
pub mod encoding;
pub mod error;
pub mod label;
pub mod metrics;
pub mod pipeline;
pub mod postprocess;
pub mod scheme;

pub use align::{align_batch, align_labels, AlignInput, AlignStrategy};
pub use config::AlignConfig;
pub use encoding::Encoding;
pub use error::{AlignError, Result};
pub use label::Tag;
pub use metrics::{evaluate, extract_entities, Entity, Report, Scores};
pub use pipeline::AlignPipeline;
pub use postprocess::{argmax, postprocess, LabelledRow};
pub use scheme::LabelScheme;
