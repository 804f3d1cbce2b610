//! # Heurísticas de Documento
//!
//! Regras determinísticas aplicadas depois do etiquetador semântico,
//! usando o código PAROLE curto e os traços morfológicos do token.
//!
//! | Regra          | Condição                                        | Efeito               |
//! |----------------|-------------------------------------------------|----------------------|
//! | Ano            | PAROLE `M*`, texto numérico entre 1000 e 2100   | `T1.3` vira o 1º candidato |
//! | Nome próprio   | PAROLE `Np` com traço `Pers`/`PName`/`PersName`/`Fam` | candidatos = `[Z1]` |
//! | Nome de lugar  | PAROLE `Np` com traço `Place`                   | candidatos = `[Z2]`  |

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::token::Token;

/// Tag USAS de período de tempo.
pub const TIME_PERIOD_TAG: &str = "T1.3";
pub const PERSONAL_NAME_TAG: &str = "Z1";
pub const PLACE_NAME_TAG: &str = "Z2";

const PROPER_NOUN_CLASS: &str = "Np";
const YEAR_RANGE: std::ops::RangeInclusive<u32> = 1000..=2100;

/// Traços morfológicos que identificam nomes, em ordem de prioridade.
const NAME_FEATURES: &[(&str, &str)] = &[
    ("Pers", PERSONAL_NAME_TAG),
    ("PName", PERSONAL_NAME_TAG),
    ("PersName", PERSONAL_NAME_TAG),
    ("Fam", PERSONAL_NAME_TAG),
    ("Place", PLACE_NAME_TAG),
];

/// Uma alteração feita por uma heurística.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeuristicChange {
    pub token_index: usize,
    pub rule: String,
    pub tags: Vec<String>,
}

/// Interpreta o texto como um ano plausível.
///
/// Qualquer numeral Unicode passa pelo teste de "é número", mas só dígitos
/// ASCII têm valor inteiro: "²" ou "١٩١٦" nunca são anos.
fn as_year(text: &str) -> Option<u32> {
    if text.is_empty() || !text.chars().all(char::is_numeric) {
        return None;
    }
    text.parse::<u32>().ok().filter(|n| YEAR_RANGE.contains(n))
}

/// Numerais entre 1000 e 2100 recebem `T1.3` como candidato mais provável.
pub fn detect_years(tokens: &mut [Token]) -> Vec<HeuristicChange> {
    let mut changes = Vec::new();
    for token in tokens.iter_mut() {
        if !token.par_short.starts_with('M') || as_year(&token.text).is_none() {
            continue;
        }
        let tags = token.musas_tags.get_or_insert_with(Vec::new);
        tags.insert(0, TIME_PERIOD_TAG.to_string());
        debug!(token = %token.text, "ano detectado");
        changes.push(HeuristicChange {
            token_index: token.index,
            rule: "year_detector".to_string(),
            tags: tags.clone(),
        });
    }
    changes
}

/// Nomes próprios com traço de pessoa/família → `Z1`, de lugar → `Z2`.
pub fn resolve_proper_nouns(tokens: &mut [Token]) -> Vec<HeuristicChange> {
    let mut changes = Vec::new();
    for token in tokens.iter_mut() {
        if token.par_short != PROPER_NOUN_CLASS {
            continue;
        }
        let found = NAME_FEATURES
            .iter()
            .find(|(feature, _)| token.morph_tags.iter().any(|m| m == feature));
        if let Some((feature, tag)) = found {
            debug!(token = %token.text, feature, tag, "nome próprio resolvido");
            token.musas_tags = Some(vec![tag.to_string()]);
            changes.push(HeuristicChange {
                token_index: token.index,
                rule: "prop_nouns".to_string(),
                tags: vec![tag.to_string()],
            });
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeral(index: usize, text: &str, par_short: &str, tags: Option<&[&str]>) -> Token {
        let mut token = Token::with_lemma(index, text, text, par_short);
        token.musas_tags = tags.map(|t| t.iter().map(|s| s.to_string()).collect());
        token
    }

    #[test]
    fn test_year_detected() {
        let mut tokens = vec![
            numeral(0, "1916", "Mc", Some(&["N5"])),
            numeral(1, "2100", "Mc", None),
            numeral(2, "999", "Mc", Some(&["N5"])),
            numeral(3, "2101", "Mc", Some(&["N5"])),
            numeral(4, "1916", "Nc", Some(&["N5"])),
            numeral(5, "19a6", "Mc", Some(&["N5"])),
        ];
        let changes = detect_years(&mut tokens);

        assert_eq!(changes.len(), 2);
        assert_eq!(tokens[0].musas_tags, Some(vec!["T1.3".to_string(), "N5".to_string()]));
        assert_eq!(tokens[1].musas_tags, Some(vec!["T1.3".to_string()]));
        for token in &tokens[2..] {
            assert_eq!(token.musas_tags, Some(vec!["N5".to_string()]));
        }
    }

    #[test]
    fn test_as_year() {
        assert_eq!(as_year("1000"), Some(1000));
        assert_eq!(as_year(""), None);
        assert_eq!(as_year("-1999"), None);
        assert_eq!(as_year("99999999999999999999"), None);
        assert_eq!(as_year("1916²"), None);
        assert_eq!(as_year("١٩١٦"), None);
        assert_eq!(as_year("½"), None);
    }

    #[test]
    fn test_proper_nouns() {
        let mut tokens: Vec<Token> = [
            ("Seán", vec!["Noun", "Prop", "Masc", "PName"]),
            ("Gaillimh", vec!["Noun", "Prop", "Place"]),
            ("Ó Néill", vec!["Noun", "Prop", "Place", "Fam"]),
            ("Rud", vec!["Noun", "Prop"]),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (text, morph))| {
            let mut t = Token::with_lemma(i, text, text, "Np");
            t.morph_tags = morph.into_iter().map(String::from).collect();
            t.musas_tags = Some(vec!["Z0".to_string()]);
            t
        })
        .collect();
        tokens.push(Token::with_lemma(4, "Seán", "Seán", "Nc"));
        tokens[4].morph_tags = vec!["PName".to_string()];

        let changes = resolve_proper_nouns(&mut tokens);
        assert_eq!(changes.len(), 3);
        assert_eq!(tokens[0].musas_tags, Some(vec!["Z1".to_string()]));
        assert_eq!(tokens[1].musas_tags, Some(vec!["Z2".to_string()]));
        // Fam tem prioridade sobre Place
        assert_eq!(tokens[2].musas_tags, Some(vec!["Z1".to_string()]));
        assert_eq!(tokens[3].musas_tags, Some(vec!["Z0".to_string()]));
        assert_eq!(tokens[4].musas_tags, None);
    }
}
