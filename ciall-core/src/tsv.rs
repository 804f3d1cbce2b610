//! # Leitura e Escrita TSV
//!
//! Formato tabular com uma linha por token. As colunas são nomeadas por um
//! cabeçalho (ou informadas explicitamente) e devem pertencer a [`TsvField`].
//!
//! ```text
//! TOKEN       LEMMA   PAROLE
//! Níl         bí      Vmip---n
//! scrúduithe  scrúdú  Ncmpc
//! ```
//!
//! ## Regras de Leitura
//! - `TOKEN` é obrigatório; toda linha deve ter o mesmo número de colunas do cabeçalho.
//! - Sem `PAR_SHORT`, o código curto é derivado de `PAROLE` ([`crate::parole::shorten`]).
//! - `MORPH_TAGS`, `DEP_TAGS` e `USAS` são listas separadas por espaço.
//! - `\n` literal no texto do token representa uma quebra de linha.
//! - Linhas vazias são ignoradas.
//!
//! ## Regras de Escrita
//! Cabeçalho, depois uma linha por token (`ID` é o número da linha, a partir de 1),
//! sempre terminando com quebra de linha.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CiallError, Result};
use crate::parole::shorten;
use crate::token::{Document, Token};

/// Colunas aceitas na entrada e na saída.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TsvField {
    // Entrada
    Token,
    Lemma,
    Pos,
    Parole,
    ParShort,
    MorphTags,
    DepTags,
    DeptreeTag,
    // Saída
    Id,
    Mwe,
    Usas,
    UsasDescription,
    // Avaliação
    ExpectedUsas,
}

impl TsvField {
    pub const ALL: [TsvField; 13] = [
        TsvField::Token,
        TsvField::Lemma,
        TsvField::Pos,
        TsvField::Parole,
        TsvField::ParShort,
        TsvField::MorphTags,
        TsvField::DepTags,
        TsvField::DeptreeTag,
        TsvField::Id,
        TsvField::Mwe,
        TsvField::Usas,
        TsvField::UsasDescription,
        TsvField::ExpectedUsas,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TsvField::Token => "TOKEN",
            TsvField::Lemma => "LEMMA",
            TsvField::Pos => "POS",
            TsvField::Parole => "PAROLE",
            TsvField::ParShort => "PAR_SHORT",
            TsvField::MorphTags => "MORPH_TAGS",
            TsvField::DepTags => "DEP_TAGS",
            TsvField::DeptreeTag => "DEPTREE_TAG",
            TsvField::Id => "ID",
            TsvField::Mwe => "MWE",
            TsvField::Usas => "USAS",
            TsvField::UsasDescription => "USAS_DESCRIPTION",
            TsvField::ExpectedUsas => "EXPECTED_USAS",
        }
    }
}

impl fmt::Display for TsvField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TsvField {
    type Err = CiallError;

    fn from_str(s: &str) -> Result<Self> {
        TsvField::ALL
            .iter()
            .find(|f| f.as_str() == s)
            .copied()
            .ok_or_else(|| CiallError::InvalidField(s.to_string()))
    }
}

/// Valida uma lista de nomes de campo.
pub fn parse_fields<S: AsRef<str>>(names: &[S]) -> Result<Vec<TsvField>> {
    names.iter().map(|n| n.as_ref().trim().parse()).collect()
}

/// Valida uma lista de campos separada por `|` (formato da configuração).
pub fn parse_field_list(list: &str) -> Result<Vec<TsvField>> {
    let names: Vec<&str> = list.split('|').filter(|n| !n.trim().is_empty()).collect();
    parse_fields(&names)
}

fn split_list(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

fn set_field(token: &mut Token, field: TsvField, value: &str) {
    match field {
        TsvField::Token => token.text = value.replace("\\n", "\n"),
        TsvField::Lemma => token.lemma = value.to_string(),
        TsvField::Pos => token.pos = value.to_string(),
        TsvField::Parole => token.par_long = value.to_string(),
        TsvField::ParShort => token.par_short = value.to_string(),
        TsvField::MorphTags => token.morph_tags = split_list(value),
        TsvField::DepTags => token.dep_tags = split_list(value),
        TsvField::DeptreeTag => token.deptree_tag = value.to_string(),
        TsvField::Usas => {
            let tags = split_list(value);
            token.musas_tags = (!tags.is_empty()).then_some(tags);
        }
        TsvField::ExpectedUsas => {
            token.expected_musas_tag = Some(value.trim().to_string()).filter(|v| !v.is_empty())
        }
        // Campos derivados: ignorados na entrada
        TsvField::Id | TsvField::Mwe | TsvField::UsasDescription => {}
    }
}

/// Lê um documento TSV.
///
/// Se `fields` estiver vazio, a primeira linha não vazia é o cabeçalho.
pub fn document_from_tsv(input: &str, fields: &[TsvField]) -> Result<Document> {
    let mut rows = input
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.is_empty());

    let fields: Vec<TsvField> = if fields.is_empty() {
        match rows.next() {
            Some((_, header)) => parse_fields(&header.split('\t').collect::<Vec<_>>())?,
            None => return Err(CiallError::MissingField(TsvField::Token.to_string())),
        }
    } else {
        fields.to_vec()
    };

    if !fields.contains(&TsvField::Token) {
        return Err(CiallError::MissingField(TsvField::Token.to_string()));
    }
    let has_par_short = fields.contains(&TsvField::ParShort);

    let mut tokens = Vec::new();
    for (line, row) in rows {
        let values: Vec<&str> = row.split('\t').collect();
        if values.len() != fields.len() {
            return Err(CiallError::RowLength {
                line,
                expected: fields.len(),
                found: values.len(),
            });
        }
        let mut token = Token::new(tokens.len(), "");
        for (field, value) in fields.iter().zip(values) {
            set_field(&mut token, *field, value);
        }
        if !has_par_short && !token.par_long.is_empty() {
            token.par_short = shorten(&token.par_long);
        }
        tokens.push(token);
    }
    Ok(Document::new(tokens))
}

fn field_value(token: &Token, field: TsvField, line_number: usize) -> Result<String> {
    Ok(match field {
        TsvField::Id => line_number.to_string(),
        TsvField::Token => token.text.replace('\n', "\\n"),
        TsvField::Lemma => token.lemma.clone(),
        TsvField::Pos => token.pos.clone(),
        TsvField::Parole => token.par_long.clone(),
        TsvField::ParShort => token.par_short.clone(),
        TsvField::MorphTags => token.morph_tags_str(),
        TsvField::DepTags => token.dep_tags_str(),
        TsvField::DeptreeTag => token.deptree_tag.clone(),
        TsvField::Mwe => token.mwe_indexes_str(),
        TsvField::Usas => token.musas_tags_str(),
        TsvField::UsasDescription => token.musas_desc_str()?,
        TsvField::ExpectedUsas => token.expected_musas_tag.clone().unwrap_or_default(),
    })
}

/// Escreve o documento em TSV com as colunas pedidas.
pub fn document_to_tsv(doc: &Document, fields: &[TsvField]) -> Result<String> {
    let mut out = fields
        .iter()
        .map(TsvField::as_str)
        .collect::<Vec<_>>()
        .join("\t");
    out.push('\n');

    for (i, token) in doc.tokens.iter().enumerate() {
        let values = fields
            .iter()
            .map(|f| field_value(token, *f, i + 1))
            .collect::<Result<Vec<_>>>()?;
        out.push_str(&values.join("\t"));
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = "TOKEN\tLEMMA\tPAROLE\n\
                         Níl\tbí\tVmxx\n\
                         aon\taon\tDqxx\n\
                         scrúduithe\tscrúdú\tNcxx\n\
                         móra\tmór\tAqxx\n\
                         agam\tag\tSpxx\n\
                         .\t.\tFxx\n";

    #[test]
    fn test_document_from_tsv_with_header() {
        let doc = document_from_tsv(INPUT, &[]).unwrap();
        assert_eq!(doc.len(), 6);
        assert_eq!(doc.tokens[0].text, "Níl");
        assert_eq!(doc.tokens[0].lemma, "bí");
        assert_eq!(doc.tokens[0].par_long, "Vmxx");
        assert_eq!(doc.tokens[0].par_short, "Vm");
        assert_eq!(doc.tokens[5].par_short, "F");
        assert_eq!(doc.tokens[5].index, 5);
    }

    #[test]
    fn test_document_from_tsv_explicit_fields() {
        let body = INPUT.split_once('\n').unwrap().1;
        let fields = [TsvField::Token, TsvField::Lemma, TsvField::Parole];
        let doc = document_from_tsv(body, &fields).unwrap();
        assert_eq!(doc.len(), 6);
        assert_eq!(doc.tokens[0].par_short, "Vm");
    }

    #[test]
    fn test_all_input_fields() {
        let input = "TOKEN\tLEMMA\tPOS\tPAROLE\tPAR_SHORT\tMORPH_TAGS\tDEP_TAGS\n\
                     Níl\tbí\tVERB\tVmxx\tVm\tVerb VI PresInd Neg\t^Níl^ @FMV #1->0\n\
                     aon\taon\tDET\tDqxx\tDq\tDet Qty Def\t^aon^ @>N #2->1\n";
        let doc = document_from_tsv(input, &[]).unwrap();
        let token = &doc.tokens[0];
        assert_eq!(token.pos, "VERB");
        assert_eq!(token.par_short, "Vm");
        let mut morph = token.morph_tags.clone();
        morph.sort();
        assert_eq!(morph, vec!["Neg", "PresInd", "VI", "Verb"]);
        let mut deps = token.dep_tags.clone();
        deps.sort();
        assert_eq!(deps, vec!["#1->0", "@FMV", "^Níl^"]);
    }

    #[test]
    fn test_output_round_trip() {
        let doc = document_from_tsv(INPUT, &[]).unwrap();
        let fields = [TsvField::Token, TsvField::Lemma, TsvField::Parole];
        assert_eq!(document_to_tsv(&doc, &fields).unwrap(), INPUT);
    }

    #[test]
    fn test_output_derived_fields() {
        let mut doc = document_from_tsv("TOKEN\n\\n\nmadra\n", &[]).unwrap();
        assert_eq!(doc.tokens[0].text, "\n");
        doc.tokens[1].musas_tags = Some(vec!["Q1.2/S2mf".into(), "O1".into()]);
        doc.tokens[1].mwe_indexes = Some(vec![(1, 2)]);

        let fields = parse_field_list("ID|TOKEN|USAS|MWE|USAS_DESCRIPTION").unwrap();
        let out = document_to_tsv(&doc, &fields).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "ID\tTOKEN\tUSAS\tMWE\tUSAS_DESCRIPTION");
        assert_eq!(lines[1], "1\t\\n\t\t\t");
        assert_eq!(
            lines[2],
            "2\tmadra\tQ1.2/S2mf O1\t(1, 2)\tPaper documents and writing / People"
        );
    }

    #[test]
    fn test_expected_usas_column() {
        let doc = document_from_tsv("TOKEN\tEXPECTED_USAS\nmadra\tL2mfn\ncat\t\n", &[]).unwrap();
        assert_eq!(doc.tokens[0].expected_musas_tag.as_deref(), Some("L2mfn"));
        assert_eq!(doc.tokens[1].expected_musas_tag, None);
    }

    #[test]
    fn test_invalid_field() {
        assert!(matches!(
            document_from_tsv("TOKEN\tFOO\na\tb\n", &[]),
            Err(CiallError::InvalidField(f)) if f == "FOO"
        ));
        assert!(matches!(parse_field_list("TOKEN|USAS_DESC"), Err(CiallError::InvalidField(_))));
    }

    #[test]
    fn test_token_field_required() {
        assert!(matches!(
            document_from_tsv("LEMMA\nbí\n", &[]),
            Err(CiallError::MissingField(_))
        ));
        assert!(matches!(document_from_tsv("", &[]), Err(CiallError::MissingField(_))));
    }

    #[test]
    fn test_row_length_mismatch() {
        assert!(matches!(
            document_from_tsv("TOKEN\tLEMMA\nNíl\n", &[]),
            Err(CiallError::RowLength { line: 2, expected: 2, found: 1 })
        ));
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in TsvField::ALL {
            assert_eq!(field.as_str().parse::<TsvField>().unwrap(), field);
        }
    }
}
