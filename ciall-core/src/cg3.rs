//! # Leitor CG3 (Constraint Grammar)
//!
//! Converte a saída de um analisador morfológico/sintático no formato CG3 em
//! um [`Document`].
//!
//! ## Formato
//!
//! ```text
//! "<scrúduithe>"                                    ← cabeçalho: token
//!     "scrúdú" Noun Masc Com Pl Len @SUBJ #3->1    ← leitura 1
//!     "bí" Verb VI PresInd Neg @FMV #1->0          ← leitura 2
//! ```
//!
//! Cada leitura traz o lema entre aspas seguido das tags. Tags iniciadas por
//! `@`, `#` ou `^` são de dependência; as demais são traços morfológicos,
//! compilados em PAROLE por [`pos_to_parole`].

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CiallError, Result};
use crate::lemmafreq::LemmaFrequency;
use crate::parole::pos_to_parole;
use crate::token::{Cg3Analysis, Document, Token};

/// Um token CG3 com todas as suas leituras.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cg3Entry {
    pub token: String,
    pub analyses: Vec<Cg3Analysis>,
}

/// Documento CG3 ainda não convertido.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cg3Document {
    pub entries: Vec<Cg3Entry>,
}

fn is_dependency_tag(tag: &str) -> bool {
    tag.starts_with(['@', '#', '^'])
}

/// Interpreta uma linha de leitura (`\t"lema" TAG TAG ...`).
fn parse_reading(line: &str) -> Option<Cg3Analysis> {
    let mut words = line.split_whitespace();
    let lemma = words.next()?.trim_matches('"').to_string();
    let (dep_tags, morph_tags): (Vec<String>, Vec<String>) =
        words.map(str::to_string).partition(|t| is_dependency_tag(t));

    let parole = pos_to_parole(&morph_tags);
    Some(Cg3Analysis {
        lemma,
        morph_tags,
        dep_tags,
        par_long: parole.long,
        par_short: parole.short,
        udep: parole.udep,
    })
}

impl Cg3Document {
    pub fn parse(input: &str) -> Result<Self> {
        let mut doc = Cg3Document::default();
        // Cabeçalho lido e ainda sem nenhuma leitura
        let mut pending: Option<String> = None;

        for (i, line) in input.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            if line.starts_with('"') {
                if pending.is_some() {
                    warn!(line = i + 1, "cabeçalho CG3 dentro de uma entrada aberta, ignorado");
                    continue;
                }
                let head = line.trim_end();
                let token = head
                    .strip_prefix("\"<")
                    .and_then(|h| h.strip_suffix(">\""))
                    .ok_or_else(|| CiallError::Cg3 {
                        line: i + 1,
                        message: format!("cabeçalho mal formado: {head}"),
                    })?;
                pending = Some(token.to_string());
            } else if line.starts_with('\t') {
                let analysis = parse_reading(line).ok_or_else(|| CiallError::Cg3 {
                    line: i + 1,
                    message: "leitura sem lema".to_string(),
                })?;
                match pending.take() {
                    Some(token) => doc.entries.push(Cg3Entry {
                        token,
                        analyses: vec![analysis],
                    }),
                    None => match doc.entries.last_mut() {
                        Some(entry) => entry.analyses.push(analysis),
                        None => {
                            return Err(CiallError::Cg3 {
                                line: i + 1,
                                message: "leitura antes do primeiro cabeçalho".to_string(),
                            })
                        }
                    },
                }
            }
        }
        Ok(doc)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ordena as leituras de cada token pela frequência do lema (decrescente),
    /// apenas quando o token tem mais de um lema distinto. A ordenação é estável.
    pub fn reorder_by_lemma_freq(&mut self, freqs: &LemmaFrequency) {
        for entry in self.entries.iter_mut() {
            let first = entry.analyses.first().map(|a| a.lemma.as_str());
            let ambiguous = entry.analyses.iter().any(|a| Some(a.lemma.as_str()) != first);
            if ambiguous {
                entry
                    .analyses
                    .sort_by_key(|a| std::cmp::Reverse(freqs.get(&a.lemma)));
            }
        }
    }

    /// Converte em [`Document`] usando a primeira leitura de cada token.
    pub fn into_document(self) -> Document {
        let tokens = self
            .entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let mut token = Token::new(index, entry.token);
                if let Some(first) = entry.analyses.first() {
                    token.lemma = first.lemma.clone();
                    token.pos = first.udep.clone();
                    token.par_long = first.par_long.clone();
                    token.par_short = first.par_short.clone();
                    token.morph_tags = first.morph_tags.clone();
                    token.dep_tags = first.dep_tags.clone();
                }
                token.analyses = entry.analyses;
                token
            })
            .collect();
        Document::new(tokens)
    }
}

/// Lê CG3, reordena as leituras pela frequência de lemas e monta o documento.
pub fn document_from_cg3(input: &str, freqs: &LemmaFrequency) -> Result<Document> {
    let mut cg3 = Cg3Document::parse(input)?;
    cg3.reorder_by_lemma_freq(freqs);
    Ok(cg3.into_document())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{demo_lemma_frequency, CG3_SAMPLE};

    #[test]
    fn test_parsing() {
        let doc = Cg3Document::parse(CG3_SAMPLE).unwrap();
        assert_eq!(doc.len(), 13);

        let first = &doc.entries[0];
        assert_eq!(first.token, "Níl");
        let reading = &first.analyses[0];
        assert_eq!(reading.lemma, "bí");
        assert_eq!(reading.morph_tags, vec!["Verb", "VI", "PresInd", "Neg"]);
        assert_eq!(reading.par_long, "Vmip---n");
        assert_eq!(reading.par_short, "Vm");
        assert_eq!(reading.udep, "VERB");
        assert_eq!(reading.dep_tags, vec!["@FMV", "#1->0"]);
    }

    #[test]
    fn test_freq_reorder() {
        let mut doc = Cg3Document::parse(CG3_SAMPLE).unwrap();
        assert_eq!(doc.entries[2].analyses[0].lemma, "scrúdú");
        assert_eq!(doc.entries[2].analyses[1].lemma, "bí");

        doc.reorder_by_lemma_freq(&demo_lemma_frequency());
        assert_eq!(doc.entries[2].analyses[0].lemma, "bí");
        assert_eq!(doc.entries[2].analyses[1].lemma, "scrúdú");
    }

    #[test]
    fn test_same_lemma_keeps_order() {
        let input = "\"<an>\"\n\t\"an\" Art Sg Def\n\t\"an\" Part Vb Q\n";
        let mut doc = Cg3Document::parse(input).unwrap();
        doc.reorder_by_lemma_freq(&demo_lemma_frequency());
        assert_eq!(doc.entries[0].analyses[0].par_short, "Td");
    }

    #[test]
    fn test_head_inside_open_entry_is_skipped() {
        let input = "\"<a>\"\n\"<b>\"\n\t\"a\" Part Vb Rel Direct\n";
        let doc = Cg3Document::parse(input).unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.entries[0].token, "a");
        assert_eq!(doc.entries[0].analyses[0].par_long, "Q-r");
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(
            Cg3Document::parse("\t\"bí\" Verb\n"),
            Err(CiallError::Cg3 { line: 1, .. })
        ));
        assert!(matches!(
            Cg3Document::parse("\"Níl\"\n"),
            Err(CiallError::Cg3 { line: 1, .. })
        ));
    }

    #[test]
    fn test_into_document() {
        let doc = document_from_cg3(CG3_SAMPLE, &demo_lemma_frequency()).unwrap();
        assert_eq!(doc.len(), 13);
        let token = &doc.tokens[2];
        assert_eq!(token.text, "scrúduithe");
        assert_eq!(token.lemma, "bí");
        assert_eq!(token.par_short, "Vm");
        assert_eq!(token.analyses.len(), 2);
        assert_eq!(doc.tokens[10].par_short, "Nc");
        assert_eq!(doc.tokens[10].index, 10);
    }
}
