//! Tabela estática de frequência de lemas (`lemma,frequency`), usada para
//! ordenar as leituras CG3 ambíguas.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CiallError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LemmaFrequency {
    freqs: HashMap<String, u64>,
}

/// Remove aspas duplas envolventes (`"agus"` → `agus`).
fn unquote(field: &str) -> &str {
    let field = field.trim();
    field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .unwrap_or(field)
}

impl LemmaFrequency {
    /// Lê o conteúdo CSV. Linhas vazias são ignoradas.
    pub fn from_csv_str(contents: &str) -> Result<Self> {
        let mut freqs = HashMap::new();
        for (i, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let lexicon_error = |message: String| CiallError::Lexicon {
                source_name: "lemmafreq".to_string(),
                line: i + 1,
                message,
            };
            // O lema pode conter vírgulas; a frequência é sempre a última coluna
            let (lemma, freq) = line
                .rsplit_once(',')
                .ok_or_else(|| lexicon_error("esperado 'lema,frequência'".to_string()))?;
            let freq: u64 = unquote(freq)
                .parse()
                .map_err(|_| lexicon_error(format!("frequência inválida: '{freq}'")))?;
            freqs.insert(unquote(lemma).to_string(), freq);
        }
        info!(lemmas = freqs.len(), "frequências de lemas carregadas");
        Ok(Self { freqs })
    }

    /// Constrói a partir de pares (lema, frequência).
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        Self {
            freqs: pairs.into_iter().map(|(l, f)| (l.into(), f)).collect(),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_csv_str(&std::fs::read_to_string(path)?)
    }

    /// Frequência do lema, ou 0 se desconhecido.
    pub fn get(&self, lemma: &str) -> u64 {
        self.freqs.get(lemma).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.freqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.freqs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lemmafreq() {
        let table = LemmaFrequency::from_csv_str("agus,98000\n\"ciallaigh\",\"12\"\n\n\"a, b\",3\n").unwrap();
        assert!(table.get("agus") > table.get("ciallaigh"));
        assert_eq!(table.get("ciallaigh"), 12);
        assert_eq!(table.get("a, b"), 3);
        assert_eq!(table.get("anaithnid"), 0);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_invalid_rows() {
        assert!(LemmaFrequency::from_csv_str("agus").is_err());
        assert!(LemmaFrequency::from_csv_str("agus,lots").is_err());
    }
}
