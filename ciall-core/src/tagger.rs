//! # Etiquetador Semântico
//!
//! Ponto de extensão do pipeline: qualquer etiquetador que, dada a sequência
//! de tokens (com lema e código PAROLE curto), produza para cada token uma
//! lista ordenada de candidatos USAS e os spans MWE que o cobrem.
//!
//! A implementação incluída é o [`crate::lexicon::LexiconTagger`].

use serde::{Deserialize, Serialize};

use crate::token::Token;

/// Resultado do etiquetador para um token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggerOutput {
    /// Candidatos do mais provável ao menos provável (ex: `["Z5", "A3+"]`).
    pub tags: Vec<String>,
    /// Spans `(início, fim)` (fim exclusivo) de expressões multipalavra.
    pub mwe_indexes: Vec<(usize, usize)>,
}

/// Etiquetador semântico de uma sequência de tokens.
///
/// Deve retornar exatamente uma saída por token, na mesma ordem.
pub trait SemanticTagger: Send + Sync {
    fn tag(&self, tokens: &[Token]) -> Vec<TaggerOutput>;
}
