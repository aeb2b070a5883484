//! # Erros do alinhamento
//!
//! Todas as falhas desta biblioteca são violações de contrato do chamador
//! (formatos incompatíveis, códigos de rótulo fora do esquema). Não há
//! recuperação parcial: a operação retorna o erro imediatamente.

/// Erros possíveis ao alinhar, pós-processar ou configurar rótulos.
#[derive(Debug, thiserror::Error)]
pub enum AlignError {
    /// Código numérico que não pertence ao esquema de rótulos.
    #[error("código de rótulo desconhecido: {code} (esquema com {len} rótulos)")]
    UnknownLabel { code: i64, len: usize },

    /// Nome de rótulo que não existe no esquema.
    #[error("nome de rótulo desconhecido: {0:?}")]
    UnknownLabelName(String),

    /// Nome que não segue o formato `O`, `B-TIPO` ou `I-TIPO`.
    #[error("rótulo mal formado: {0:?}")]
    MalformedLabel(String),

    #[error("rótulo duplicado no esquema: {0:?}")]
    DuplicateLabel(String),

    #[error("esquema de rótulos vazio")]
    EmptyScheme,

    /// O sentinela de ignorar colide com um índice válido do esquema.
    #[error("sentinela de ignorar {0} colide com um rótulo válido")]
    IgnoreCollision(i64),

    /// O mapa de word-ids aponta para uma palavra inexistente.
    #[error("word-id {word_id} na posição {position} fora do intervalo (0..{word_count})")]
    WordIndexOutOfRange {
        position: usize,
        word_id: usize,
        word_count: usize,
    },

    /// Um word-id voltou atrás ou reapareceu depois do fim do seu trecho.
    #[error("word-id {word_id} na posição {position} quebra a contiguidade (anterior: {previous})")]
    NonContiguousWordIds {
        position: usize,
        word_id: usize,
        previous: usize,
    },

    /// Tokens e word-ids de uma codificação com tamanhos diferentes.
    #[error("codificação inconsistente: {tokens} tokens para {word_ids} word-ids")]
    EncodingLength { tokens: usize, word_ids: usize },

    /// Predições e rótulos com formatos diferentes.
    #[error("formatos incompatíveis na linha {row:?}: predições {predictions}, rótulos {labels}")]
    ShapeMismatch {
        row: Option<usize>,
        predictions: usize,
        labels: usize,
    },

    #[error("logits vazios na linha {row}, posição {position}")]
    EmptyLogits { row: usize, position: usize },

    #[error("JSON inválido: {0}")]
    Json(#[from] serde_json::Error),

    #[error("erro de E/S: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AlignError>;
