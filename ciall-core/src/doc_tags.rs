//! # Desambiguação em Nível de Documento
//!
//! Reordena os candidatos semânticos de tokens ambíguos usando a frequência
//! dos campos USAS no próprio documento. A intuição: se um texto fala muito
//! de `A` (termos gerais), um token ambíguo entre `B1` e `A2` provavelmente
//! é `A2`.
//!
//! ## Algoritmo (duas passadas)
//!
//! 1. **Contagem**: para cada token com exatamente um candidato, composto por
//!    exatamente uma tag, cujo campo não seja `Z` (gramatical), incrementa o
//!    contador daquele campo.
//! 2. **Reordenação**: para cada token com mais de um candidato, ordena os
//!    candidatos (ordenação estável, decrescente) pela chave:
//!
//! | Candidato                             | Chave                              |
//! |---------------------------------------|------------------------------------|
//! | string vazia                          | `-1000` (sempre por último)        |
//! | algum campo presente na tabela        | maior frequência entre seus campos |
//! | nenhum campo presente na tabela       | `-1 - posição original`            |
//!
//! A chave negativa por posição mantém a ordem original entre candidatos sem
//! campo frequente, sempre abaixo dos que têm. Um documento sem nenhum token
//! não ambíguo gera uma tabela vazia e nenhuma ordem é alterada.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::taxonomy::GRAMMATICAL_FIELD;
use crate::token::Token;
use crate::usas::CompoundTag;

/// Chave de ordenação de um candidato vazio.
const EMPTY_CANDIDATE_KEY: i64 = -1000;

/// Tabela de frequência de campos USAS de um documento.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStats {
    counts: BTreeMap<char, usize>,
}

impl FieldStats {
    /// Primeira passada: conta os campos dos tokens não ambíguos.
    pub fn from_tokens(tokens: &[Token]) -> Result<Self> {
        let mut stats = FieldStats::default();
        for token in tokens {
            let Some(tags) = token.musas_tags.as_ref() else {
                continue;
            };
            if tags.len() != 1 {
                continue;
            }
            let compound = CompoundTag::parse(&tags[0])?;
            if let [tag] = compound.tags() {
                if tag.field() != GRAMMATICAL_FIELD {
                    stats.increment(tag.field());
                }
            }
        }
        Ok(stats)
    }

    pub fn increment(&mut self, field: char) {
        *self.counts.entry(field).or_insert(0) += 1;
    }

    pub fn get(&self, field: char) -> Option<usize> {
        self.counts.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Campos do mais frequente ao menos frequente (empates em ordem alfabética).
    pub fn most_common(&self) -> Vec<(char, usize)> {
        let mut fields: Vec<(char, usize)> = self.counts.iter().map(|(f, n)| (*f, *n)).collect();
        fields.sort_by(|a, b| b.1.cmp(&a.1));
        fields
    }

    /// Chave de ordenação de um candidato (ver tabela do módulo).
    fn sort_key(&self, candidate: &str, candidates: &[String]) -> Result<i64> {
        if candidate.is_empty() {
            return Ok(EMPTY_CANDIDATE_KEY);
        }
        let compound = CompoundTag::parse(candidate)?;
        let best = compound
            .tags()
            .iter()
            .filter_map(|tag| self.get(tag.field()))
            .max();

        Ok(match best {
            Some(freq) => freq as i64,
            None => {
                let first = candidates
                    .iter()
                    .position(|c| c == candidate)
                    .unwrap_or_default();
                -1 - first as i64
            }
        })
    }

    /// Reordena uma lista de candidatos pela frequência dos campos.
    pub fn reorder(&self, candidates: &[String]) -> Result<Vec<String>> {
        let mut keyed = candidates
            .iter()
            .map(|c| Ok((self.sort_key(c, candidates)?, c.clone())))
            .collect::<Result<Vec<(i64, String)>>>()?;
        // sort_by é estável: empates mantêm a ordem original
        keyed.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(keyed.into_iter().map(|(_, c)| c).collect())
    }
}

/// Um token cuja ordem de candidatos mudou.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reordering {
    pub token_index: usize,
    pub before: Vec<String>,
    pub after: Vec<String>,
}

/// Executa as duas passadas sobre os tokens.
///
/// Retorna a tabela de frequência e a lista de tokens efetivamente reordenados.
/// Uma tag mal formada interrompe o processamento do documento.
pub fn disambiguate(tokens: &mut [Token]) -> Result<(FieldStats, Vec<Reordering>)> {
    let stats = FieldStats::from_tokens(tokens)?;
    debug!(fields = ?stats.most_common(), "frequência de campos do documento");

    let mut reorderings = Vec::new();
    for token in tokens.iter_mut() {
        let Some(tags) = token.musas_tags.as_mut() else {
            continue;
        };
        if tags.len() <= 1 {
            continue;
        }
        let reordered = stats.reorder(tags)?;
        if reordered != *tags {
            debug!(token = %token.text, before = ?tags, after = ?reordered, "candidatos reordenados");
            reorderings.push(Reordering {
                token_index: token.index,
                before: std::mem::replace(tags, reordered.clone()),
                after: reordered,
            });
        }
    }
    Ok((stats, reorderings))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(index: usize, tags: &[&str]) -> Token {
        let mut token = Token::new(index, format!("t{index}"));
        token.musas_tags = Some(tags.iter().map(|t| t.to_string()).collect());
        token
    }

    fn strings(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_field_stats_counts_only_unambiguous() {
        let tokens = vec![
            tagged(0, &["A1"]),
            tagged(1, &["A5.1+"]),
            tagged(2, &["B2"]),
            tagged(3, &["Z5"]),            // campo gramatical
            tagged(4, &["Q1.2/S2mf"]),     // composta
            tagged(5, &["C1", "D1"]),      // ambígua
            Token::new(6, "gan tag"),
        ];
        let stats = FieldStats::from_tokens(&tokens).unwrap();
        assert_eq!(stats.get('A'), Some(2));
        assert_eq!(stats.get('B'), Some(1));
        assert_eq!(stats.get('Z'), None);
        assert_eq!(stats.get('Q'), None);
        assert_eq!(stats.get('C'), None);
        assert_eq!(stats.most_common(), vec![('A', 2), ('B', 1)]);
    }

    #[test]
    fn test_reorder_by_frequency() {
        let mut tokens = vec![
            tagged(0, &["A1"]),
            tagged(1, &["A3"]),
            tagged(2, &["B2"]),
            tagged(3, &["B1", "A2"]),
        ];
        let (_, reorderings) = disambiguate(&mut tokens).unwrap();
        assert_eq!(tokens[3].musas_tags, Some(strings(&["A2", "B1"])));
        assert_eq!(reorderings.len(), 1);
        assert_eq!(reorderings[0].before, strings(&["B1", "A2"]));
    }

    #[test]
    fn test_ties_preserve_order() {
        let mut tokens = vec![
            tagged(0, &["A1"]),
            tagged(1, &["B2"]),
            tagged(2, &["B1", "A2", "A4"]),
        ];
        let (_, reorderings) = disambiguate(&mut tokens).unwrap();
        assert_eq!(tokens[2].musas_tags, Some(strings(&["B1", "A2", "A4"])));
        assert!(reorderings.is_empty());
    }

    #[test]
    fn test_untracked_fields_sink_below_tracked() {
        let mut tokens = vec![
            tagged(0, &["S2"]),
            tagged(1, &["X1", "Y2", "S2.1", "G1"]),
        ];
        disambiguate(&mut tokens).unwrap();
        assert_eq!(tokens[1].musas_tags, Some(strings(&["S2.1", "X1", "Y2", "G1"])));
    }

    #[test]
    fn test_compound_candidate_uses_best_field() {
        let stats = {
            let mut s = FieldStats::default();
            s.increment('S');
            s.increment('S');
            s.increment('Q');
            s
        };
        let reordered = stats.reorder(&strings(&["Q2.1", "Q1.2/S2mf"])).unwrap();
        assert_eq!(reordered, strings(&["Q1.2/S2mf", "Q2.1"]));
    }

    #[test]
    fn test_empty_candidate_always_last() {
        let stats = FieldStats::default();
        let reordered = stats.reorder(&strings(&["", "X1", "Y2"])).unwrap();
        assert_eq!(reordered, strings(&["X1", "Y2", ""]));
    }

    #[test]
    fn test_empty_stats_keep_original_order() {
        let mut tokens = vec![tagged(0, &["Z5"]), tagged(1, &["N1", "A1", "B1"])];
        let (stats, reorderings) = disambiguate(&mut tokens).unwrap();
        assert!(stats.is_empty());
        assert!(reorderings.is_empty());
        assert_eq!(tokens[1].musas_tags, Some(strings(&["N1", "A1", "B1"])));
    }

    #[test]
    fn test_malformed_tag_propagates() {
        let mut tokens = vec![tagged(0, &["not-a-tag"])];
        assert!(disambiguate(&mut tokens).is_err());
    }
}
