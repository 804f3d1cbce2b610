//! # Token e Documento Anotado
//!
//! Cada token carrega, em campos nomeados e tipados, todas as anotações que os
//! componentes do pipeline podem produzir. Nenhum componente cria atributos
//! dinamicamente: um campo ausente é `None` ou uma coleção vazia.
//!
//! | Campo                | Preenchido por                       |
//! |----------------------|--------------------------------------|
//! | `lemma`, `pos`       | leitor TSV/CG3                       |
//! | `par_long/par_short` | leitor TSV/CG3 (via [`crate::parole`]) |
//! | `morph_tags`         | leitor TSV/CG3                       |
//! | `musas_tags`         | etiquetador semântico e heurísticas  |
//! | `mwe_indexes`        | etiquetador semântico (MWE)          |
//! | `expected_musas_tag` | leitor TSV (coluna `EXPECTED_USAS`)  |

use serde::{Deserialize, Serialize};

use crate::accuracy::AccuracyReport;
use crate::doc_tags::FieldStats;
use crate::error::Result;
use crate::usas::MultiSenseTag;

/// Uma leitura (análise) CG3 de um token: lema, traços e códigos PAROLE.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cg3Analysis {
    pub lemma: String,
    pub morph_tags: Vec<String>,
    pub dep_tags: Vec<String>,
    pub par_long: String,
    pub par_short: String,
    pub udep: String,
}

/// Um token anotado.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Posição (0-based) do token no documento.
    pub index: usize,
    pub text: String,
    pub lemma: String,
    /// Classe gramatical universal (UD).
    pub pos: String,
    pub par_long: String,
    pub par_short: String,
    pub morph_tags: Vec<String>,
    pub dep_tags: Vec<String>,
    pub deptree_tag: String,
    /// Todas as leituras CG3, a primeira é a escolhida.
    pub analyses: Vec<Cg3Analysis>,
    /// Candidatos semânticos, do mais provável ao menos provável.
    pub musas_tags: Option<Vec<String>>,
    /// Spans `(início, fim)` de expressões multipalavra que cobrem o token.
    pub mwe_indexes: Option<Vec<(usize, usize)>>,
    pub expected_musas_tag: Option<String>,
}

impl Token {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            ..Default::default()
        }
    }

    /// Token com lema e código PAROLE curto (atalho para testes e demos).
    pub fn with_lemma(
        index: usize,
        text: impl Into<String>,
        lemma: impl Into<String>,
        par_short: impl Into<String>,
    ) -> Self {
        Self {
            lemma: lemma.into(),
            par_short: par_short.into(),
            ..Self::new(index, text)
        }
    }

    /// Token composto apenas de espaços em branco (ex: quebras de linha).
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Candidato mais provável, se houver.
    pub fn top_tag(&self) -> Option<&str> {
        self.musas_tags
            .as_ref()
            .and_then(|tags| tags.first())
            .map(String::as_str)
    }

    pub fn musas_tags_str(&self) -> String {
        self.musas_tags
            .as_ref()
            .map(|tags| tags.join(" "))
            .unwrap_or_default()
    }

    /// Descrição do primeiro sentido do primeiro candidato.
    pub fn musas_desc_str(&self) -> Result<String> {
        match self.top_tag() {
            None => Ok(String::new()),
            Some(top) => {
                let tag = MultiSenseTag::parse(top)?;
                match tag.senses().first() {
                    Some(sense) => sense.description(),
                    None => Ok(String::new()),
                }
            }
        }
    }

    /// Apenas o primeiro span MWE é exibido.
    pub fn mwe_indexes_str(&self) -> String {
        match self.mwe_indexes.as_ref().and_then(|spans| spans.first()) {
            Some((start, end)) => format!("({start}, {end})"),
            None => String::new(),
        }
    }

    pub fn morph_tags_str(&self) -> String {
        self.morph_tags.join(",")
    }

    pub fn dep_tags_str(&self) -> String {
        self.dep_tags.join(",")
    }
}

/// Documento: sequência de tokens mais o estado por documento dos componentes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub tokens: Vec<Token>,
    /// Frequência de campos USAS não ambíguos (preenchida por `ciall_doc_tags`).
    pub field_stats: FieldStats,
    pub accuracy_report: Option<AccuracyReport>,
}

impl Document {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Texto do documento, tokens separados por espaço.
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_token_strings() {
        let token = Token::new(0, "madra");
        assert_eq!(token.musas_tags_str(), "");
        assert_eq!(token.musas_desc_str().unwrap(), "");
        assert_eq!(token.mwe_indexes_str(), "");
        assert!(token.top_tag().is_none());
    }

    #[test]
    fn test_tagged_token_strings() {
        let mut token = Token::new(3, "páipéar");
        token.musas_tags = Some(vec!["Q1.2/S2mf".into(), "O1.1".into()]);
        token.mwe_indexes = Some(vec![(3, 5), (2, 5)]);
        token.morph_tags = vec!["Noun".into(), "Masc".into()];

        assert_eq!(token.musas_tags_str(), "Q1.2/S2mf O1.1");
        assert_eq!(token.musas_desc_str().unwrap(), "Paper documents and writing / People");
        assert_eq!(token.mwe_indexes_str(), "(3, 5)");
        assert_eq!(token.morph_tags_str(), "Noun,Masc");
        assert_eq!(token.top_tag(), Some("Q1.2/S2mf"));
    }

    #[test]
    fn test_desc_of_invalid_tag_fails() {
        let mut token = Token::new(0, "x");
        token.musas_tags = Some(vec!["q1".into()]);
        assert!(token.musas_desc_str().is_err());
    }

    #[test]
    fn test_blank_token() {
        assert!(Token::new(0, " \n").is_blank());
        assert!(!Token::new(0, "tá").is_blank());
    }

    #[test]
    fn test_document_text() {
        let doc = Document::new(vec![Token::new(0, "Tá"), Token::new(1, "sé")]);
        assert_eq!(doc.text(), "Tá sé");
        assert_eq!(doc.len(), 2);
    }
}
