//! # Etiquetador por Léxico: Palavras Simples e Expressões Multipalavra
//!
//! Atribui candidatos USAS consultando dois léxicos TSV:
//!
//! | Léxico         | Cabeçalho                          | Exemplo                               |
//! |----------------|------------------------------------|---------------------------------------|
//! | Palavra simples | `lemma  pos  semantic_tags`       | `mór  Aq  N3.2 A5.1+`                 |
//! | Multipalavra   | `mwe_template  semantic_tags`      | `Baile_Np Átha_Np Cliath_Np  Z2`      |
//!
//! ## Ordem de Consulta
//!
//! 1. **MWE**: todas as ocorrências de modelos MWE são coletadas; as mais
//!    longas têm prioridade (empate: a que começa antes) e um token pertence
//!    a no máximo uma MWE.
//! 2. **(lema, PAROLE curto)**, depois com o lema em minúsculas.
//! 3. **Apenas o lema**, depois em minúsculas.
//! 4. Nada encontrado → `Z99`.
//!
//! A consulta usa sempre o lema, nunca a forma de superfície.
//!
//! ## Modelos MWE
//!
//! Cada parte é `lema_POS`. O POS `*` casa com qualquer classe e um POS
//! terminado em `*` (ex: `N*`) casa por prefixo.
//!
//! ## Curingas
//!
//! Depois da etiquetagem, tokens cujo candidato principal é `Z99` recebem a
//! tag da tabela de curingas indexada pelo PAROLE curto ([`wildcard_tag`]).

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{CiallError, Result};
use crate::tagger::{SemanticTagger, TaggerOutput};
use crate::taxonomy::UNMATCHED;
use crate::token::Token;

/// Tag de fallback por classe PAROLE curta, para tokens não casados.
const WILDCARD_LEXICON: &[(&str, &str)] = &[
    ("Mn", "N1"),
    ("Mo", "N1"),
    ("Mc", "N5"),
    ("Ms", "Z5"),
    ("Np", "Z0"),
    ("C", "Z5"),
    ("Cc", "Z5"),
    ("Cs", "Z5"),
    ("Dd", "Z5"),
    ("Dp", "Z5"),
    ("Dq", "Z5"),
    ("Dw", "Z5"),
    ("F", "Z9"),
    ("Fe", "Z9"),
    ("Fi", "Z9"),
    ("Fa", "Z9"),
    ("Fz", "Z9"),
    ("Fb", "Z9"),
    ("Fq", "Z9"),
    ("Fc", "I1"),
    ("Pp", "Z8"),
    ("Px", "Z5"),
    ("Pq", "Z5"),
    ("Pi", "Z5"),
    ("Pr", "Z8"),
    ("Pd", "Z5"),
    ("Q", "Z5"),
    ("Qq", "Z5"),
    ("Qn", "Z6"),
    ("Sp", "Z5"),
    ("Td", "Z5"),
    ("Xfp", "Z0"),
    ("Xfenp", "Z0"),
    ("Y", "Z0"),
    ("U", "Z5"),
    ("Uv", "Z5"),
    ("Uc", "Z5"),
    ("Ua", "Z5"),
    ("Um", "Z5"),
    ("Ud", "Z5"),
    ("Up", "Z1"),
    ("Uw", "Z5"),
    ("W", "Z5"),
    ("X*", "Z9"),
    ("Xa", "Z9"),
];

/// Tag curinga para uma classe PAROLE curta, se houver.
pub fn wildcard_tag(par_short: &str) -> Option<&'static str> {
    WILDCARD_LEXICON
        .iter()
        .find(|(class, _)| *class == par_short)
        .map(|(_, tag)| *tag)
}

/// Substitui `Z99` pela tag curinga da classe do token.
///
/// Retorna os índices dos tokens alterados.
pub fn apply_wildcards(tokens: &mut [Token]) -> Vec<usize> {
    let mut changed = Vec::new();
    for token in tokens.iter_mut() {
        if token.top_tag() != Some(UNMATCHED) {
            continue;
        }
        if let Some(tag) = wildcard_tag(&token.par_short) {
            token.musas_tags = Some(vec![tag.to_string()]);
            changed.push(token.index);
        }
    }
    changed
}

/// Padrão de classe gramatical em um modelo MWE.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PosPattern {
    Any,
    Prefix(String),
    Exact(String),
}

impl PosPattern {
    fn parse(pos: &str) -> Self {
        match pos {
            "" | "*" => PosPattern::Any,
            p => match p.strip_suffix('*') {
                Some(prefix) => PosPattern::Prefix(prefix.to_string()),
                None => PosPattern::Exact(p.to_string()),
            },
        }
    }

    fn matches(&self, pos: &str) -> bool {
        match self {
            PosPattern::Any => true,
            PosPattern::Prefix(prefix) => pos.starts_with(prefix.as_str()),
            PosPattern::Exact(exact) => pos == exact,
        }
    }
}

/// Uma entrada do léxico multipalavra.
#[derive(Debug, Clone)]
struct MweEntry {
    /// (lema em minúsculas, padrão de POS) por posição.
    parts: Vec<(String, PosPattern)>,
    tags: Vec<String>,
}

impl MweEntry {
    fn matches_at(&self, tokens: &[Token], start: usize) -> bool {
        start + self.parts.len() <= tokens.len()
            && self.parts.iter().enumerate().all(|(j, (lemma, pos))| {
                let token = &tokens[start + j];
                token.lemma.to_lowercase() == *lemma && pos.matches(&token.par_short)
            })
    }
}

/// Etiquetador baseado em léxicos de palavra simples e multipalavra.
#[derive(Debug, Clone, Default)]
pub struct LexiconTagger {
    /// (lema, PAROLE curto) → candidatos
    single: HashMap<(String, String), Vec<String>>,
    /// lema → candidatos
    lemma_only: HashMap<String, Vec<String>>,
    mwes: Vec<MweEntry>,
    /// primeiro lema (minúsculas) → índices em `mwes`
    mwe_index: HashMap<String, Vec<usize>>,
}

fn split_tags(tags: &str) -> Vec<String> {
    tags.split_whitespace().map(str::to_string).collect()
}

/// Lê um TSV com cabeçalho, retornando (número da linha, colunas) das linhas de dados.
/// As colunas vêm na ordem `required` seguida de `optional`; opcionais ausentes viram `""`.
fn read_tsv_columns<'a>(
    source_name: &str,
    contents: &'a str,
    required: &[&str],
    optional: &[&str],
) -> Result<Vec<(usize, Vec<&'a str>)>> {
    let lexicon_error = |line: usize, message: String| CiallError::Lexicon {
        source_name: source_name.to_string(),
        line,
        message,
    };

    let mut lines = contents
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim_end_matches('\r')))
        .filter(|(_, l)| !l.trim().is_empty());

    let Some((_, header)) = lines.next() else {
        return Ok(Vec::new());
    };
    let header: Vec<&str> = header.split('\t').map(str::trim).collect();

    let mut positions: Vec<Option<usize>> = Vec::new();
    for name in required {
        match header.iter().position(|h| h == name) {
            Some(p) => positions.push(Some(p)),
            None => return Err(lexicon_error(1, format!("coluna '{name}' ausente no cabeçalho"))),
        }
    }
    for name in optional {
        positions.push(header.iter().position(|h| h == name));
    }

    lines
        .map(|(n, line)| {
            let cols: Vec<&str> = line.split('\t').collect();
            positions
                .iter()
                .map(|p| match p {
                    Some(p) => cols
                        .get(*p)
                        .copied()
                        .map(str::trim)
                        .ok_or_else(|| lexicon_error(n, format!("esperadas {} colunas", header.len()))),
                    None => Ok(""),
                })
                .collect::<Result<Vec<&str>>>()
                .map(|row| (n, row))
        })
        .collect()
}

impl LexiconTagger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adiciona uma entrada de palavra simples. `pos` vazio = apenas lema.
    pub fn add_single(&mut self, lemma: &str, pos: &str, tags: &str) {
        let tags = split_tags(tags);
        if !pos.is_empty() {
            self.single
                .insert((lemma.to_string(), pos.to_string()), tags.clone());
        }
        self.lemma_only.insert(lemma.to_string(), tags);
    }

    /// Adiciona um modelo MWE (ex: `"tar_* éis_*"`).
    pub fn add_mwe(&mut self, template: &str, tags: &str) {
        let parts: Vec<(String, PosPattern)> = template
            .split_whitespace()
            .map(|part| match part.rsplit_once('_') {
                Some((lemma, pos)) => (lemma.to_lowercase(), PosPattern::parse(pos)),
                None => (part.to_lowercase(), PosPattern::Any),
            })
            .collect();
        let Some((first, _)) = parts.first() else {
            return;
        };
        self.mwe_index
            .entry(first.clone())
            .or_default()
            .push(self.mwes.len());
        self.mwes.push(MweEntry {
            parts,
            tags: split_tags(tags),
        });
    }

    /// Constrói a partir do conteúdo dos dois léxicos TSV.
    pub fn from_tsv_str(sw_lexicon: &str, mw_lexicon: &str) -> Result<Self> {
        let mut tagger = Self::new();

        let rows = read_tsv_columns("sw_lexicon", sw_lexicon, &["lemma", "semantic_tags"], &["pos"])?;
        for (_, row) in rows {
            tagger.add_single(row[0], row[2], row[1]);
        }

        let rows = read_tsv_columns("mw_lexicon", mw_lexicon, &["mwe_template", "semantic_tags"], &[])?;
        for (n, row) in rows {
            if row[0].is_empty() {
                return Err(CiallError::Lexicon {
                    source_name: "mw_lexicon".to_string(),
                    line: n,
                    message: "modelo MWE vazio".to_string(),
                });
            }
            tagger.add_mwe(row[0], row[1]);
        }

        info!(
            single = tagger.lemma_only.len(),
            mwe = tagger.mwes.len(),
            "léxicos carregados"
        );
        Ok(tagger)
    }

    /// Carrega os dois léxicos de arquivos.
    pub fn from_files(sw_lexicon: impl AsRef<Path>, mw_lexicon: impl AsRef<Path>) -> Result<Self> {
        let read = |path: &Path, name: &str| -> Result<String> {
            if !path.is_file() {
                return Err(CiallError::Config(format!(
                    "arquivo {name} não encontrado: {}",
                    path.display()
                )));
            }
            Ok(std::fs::read_to_string(path)?)
        };
        let sw = read(sw_lexicon.as_ref(), "sw_lexicon")?;
        let mw = read(mw_lexicon.as_ref(), "mw_lexicon")?;
        Self::from_tsv_str(&sw, &mw)
    }

    /// Consulta de palavra simples na ordem (lema, POS) → minúsculas → só lema.
    fn lookup_single(&self, token: &Token) -> Option<&Vec<String>> {
        let lower = token.lemma.to_lowercase();
        self.single
            .get(&(token.lemma.clone(), token.par_short.clone()))
            .or_else(|| self.single.get(&(lower.clone(), token.par_short.clone())))
            .or_else(|| self.lemma_only.get(&token.lemma))
            .or_else(|| self.lemma_only.get(&lower))
    }

    /// Todas as ocorrências MWE como (início, comprimento, índice da entrada).
    fn mwe_matches(&self, tokens: &[Token]) -> Vec<(usize, usize, usize)> {
        let mut found = Vec::new();
        for (start, token) in tokens.iter().enumerate() {
            let Some(candidates) = self.mwe_index.get(&token.lemma.to_lowercase()) else {
                continue;
            };
            for &entry in candidates {
                let mwe = &self.mwes[entry];
                if mwe.parts.len() > 1 && mwe.matches_at(tokens, start) {
                    found.push((start, mwe.parts.len(), entry));
                }
            }
        }
        // Mais longas primeiro; empate: a que começa antes
        found.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        found
    }
}

impl SemanticTagger for LexiconTagger {
    fn tag(&self, tokens: &[Token]) -> Vec<TaggerOutput> {
        let mut outputs: Vec<Option<TaggerOutput>> = vec![None; tokens.len()];

        // 1. Expressões multipalavra
        for (start, len, entry) in self.mwe_matches(tokens) {
            let span = start..start + len;
            if outputs[span.clone()].iter().any(Option::is_some) {
                continue;
            }
            debug!(start, end = span.end, tags = ?self.mwes[entry].tags, "MWE encontrada");
            for i in span.clone() {
                outputs[i] = Some(TaggerOutput {
                    tags: self.mwes[entry].tags.clone(),
                    mwe_indexes: vec![(span.start, span.end)],
                });
            }
        }

        // 2. Palavras simples
        tokens
            .iter()
            .zip(outputs)
            .enumerate()
            .map(|(i, (token, output))| {
                output.unwrap_or_else(|| TaggerOutput {
                    tags: self
                        .lookup_single(token)
                        .cloned()
                        .unwrap_or_else(|| vec![UNMATCHED.to_string()]),
                    mwe_indexes: vec![(i, i + 1)],
                })
            })
            .collect()
    }
}
