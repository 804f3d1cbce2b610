//! # Tags Semânticas USAS: Modelo e Métrica de Similaridade
//!
//! Representa as tags semânticas da taxonomia (M)USAS em três níveis:
//!
//! | Tipo              | Exemplo                      | Significado                                |
//! |-------------------|------------------------------|--------------------------------------------|
//! | [`Tag`]           | `A1.2.3f+`                   | Uma única categoria com modificadores      |
//! | [`CompoundTag`]   | `Q1.2/S2mf`                  | Pertence a várias categorias ao mesmo tempo |
//! | [`MultiSenseTag`] | `Q1.2/S2mf L7.2.5- A1.2`     | Sentidos alternativos, o mais provável primeiro |
//!
//! ## Anatomia de uma Tag
//!
//! ```text
//!   A  1.2.3  f  +
//!   │    │    │  └── intensidade: 1-3 '+' ou 1-3 '-' (nunca misturados)
//!   │    │    └───── símbolos modificadores: % @ f m n c i
//!   │    └────────── subdivisões numéricas separadas por '.'
//!   └─────────────── campo (ramo de topo da taxonomia)
//! ```
//!
//! ## Métrica de Similaridade
//!
//! A comparação entre duas tags produz um grau ([`TagComparison`]) que é
//! convertido em um peso numérico. Esse peso é usado tanto na
//! desambiguação quanto no cálculo de acurácia.
//!
//! | Grau            | Peso |
//! |-----------------|------|
//! | `Unequal`       | 0.0  |
//! | `SameField`     | 0.4  |
//! | `SameFirstDiv`  | 0.6  |
//! | `SubCategory`   | 0.7  |
//! | `SameCategory`  | 0.8  |
//! | `Equal`         | 1.0  |

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CiallError, Result};
use crate::taxonomy::{self, UNMATCHED};

/// Gramática fixa de uma tag atômica.
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([ABCEFGHIKLMNOPQSTWXYZ])([0-9]+(?:\.[0-9]+)*)([%@fmnci]*)(\+{1,3}|-{1,3})?$")
        .expect("regex de tag USAS é estática e válida")
});

/// Graus de similaridade entre duas tags, do menos para o mais similar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TagComparison {
    /// Campos diferentes (ou uma das tags é `Z99`).
    Unequal,
    /// Mesmo campo, primeira subdivisão diferente.
    SameField,
    /// Mesma primeira subdivisão, mas nenhuma é prefixo da outra.
    SameFirstDiv,
    /// Uma é subcategoria (menos específica) da outra.
    SubCategory,
    /// Mesma categoria, símbolos diferentes.
    SameCategory,
    /// Campo, subdivisões e símbolos idênticos.
    Equal,
}

impl TagComparison {
    /// Peso numérico do grau de similaridade.
    pub fn value(&self) -> f64 {
        match self {
            TagComparison::Unequal => 0.0,
            TagComparison::SameField => 0.4,
            TagComparison::SameFirstDiv => 0.6,
            TagComparison::SubCategory => 0.7,
            TagComparison::SameCategory => 0.8,
            TagComparison::Equal => 1.0,
        }
    }
}

/// Uma tag atômica (não composta). Imutável após a construção.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Tag {
    raw: String,
    field: char,
    subdivisions_str: String,
    subdivisions: Vec<String>,
    symbols_str: String,
    /// Cada modificador é um elemento; a sequência de '+'/'-' conta como um só.
    symbols: BTreeSet<String>,
}

impl Tag {
    /// Parseia uma tag (ex: "S1.2.3mf-"). Espaços nas bordas são ignorados.
    pub fn parse(s: &str) -> Result<Self> {
        let raw = s.trim();
        let caps = TAG_REGEX
            .captures(raw)
            .ok_or_else(|| CiallError::InvalidTag(s.to_string()))?;

        let field = caps[1]
            .chars()
            .next()
            .ok_or_else(|| CiallError::InvalidTag(s.to_string()))?;
        let subdivisions_str = caps[2].to_string();
        let subdivisions = subdivisions_str.split('.').map(str::to_string).collect();

        let modifiers = &caps[3];
        let intensity = caps.get(4).map(|m| m.as_str()).unwrap_or("");
        let mut symbols: BTreeSet<String> = modifiers.chars().map(String::from).collect();
        if !intensity.is_empty() {
            symbols.insert(intensity.to_string());
        }

        Ok(Self {
            raw: raw.to_string(),
            field,
            subdivisions_str,
            subdivisions,
            symbols_str: format!("{modifiers}{intensity}"),
            symbols,
        })
    }

    /// Campo (letra de topo da taxonomia).
    pub fn field(&self) -> char {
        self.field
    }

    /// Subdivisões numéricas (ex: `["1", "2", "3"]`).
    pub fn subdivisions(&self) -> &[String] {
        &self.subdivisions
    }

    pub fn subdivisions_str(&self) -> &str {
        &self.subdivisions_str
    }

    pub fn symbols(&self) -> &BTreeSet<String> {
        &self.symbols
    }

    pub fn symbols_str(&self) -> &str {
        &self.symbols_str
    }

    /// Categoria: campo + subdivisões, sem símbolos (ex: "A1.2.3").
    pub fn category(&self) -> String {
        format!("{}{}", self.field, self.subdivisions_str)
    }

    /// Verdadeiro para a tag sentinela `Z99`.
    pub fn is_unmatched(&self) -> bool {
        self.raw == UNMATCHED
    }

    pub fn field_description(&self) -> Result<&'static str> {
        taxonomy::describe(&self.field.to_string())
    }

    pub fn category_description(&self) -> Result<&'static str> {
        taxonomy::describe(&self.category())
    }

    /// Compara esta tag com outra.
    ///
    /// Regras, na ordem:
    /// 1. Se qualquer uma é `Z99` → `Unequal`.
    /// 2. Tudo igual → `Equal`.
    /// 3. Mesma categoria → `SameCategory`.
    /// 4. Mesmo campo e mesma primeira subdivisão → `SubCategory` se uma
    ///    sequência de subdivisões é prefixo da outra, senão `SameFirstDiv`.
    /// 5. Mesmo campo → `SameField`.
    /// 6. Caso contrário → `Unequal`.
    pub fn compare(&self, other: &Tag) -> TagComparison {
        if self.is_unmatched() || other.is_unmatched() {
            return TagComparison::Unequal;
        }
        if self == other {
            return TagComparison::Equal;
        }
        if self.field == other.field && self.subdivisions == other.subdivisions {
            return TagComparison::SameCategory;
        }
        if self.field != other.field {
            return TagComparison::Unequal;
        }
        if self.subdivisions[0] != other.subdivisions[0] {
            return TagComparison::SameField;
        }

        let (shorter, longer) = if self.subdivisions.len() <= other.subdivisions.len() {
            (&self.subdivisions, &other.subdivisions)
        } else {
            (&other.subdivisions, &self.subdivisions)
        };
        if longer.starts_with(shorter) {
            TagComparison::SubCategory
        } else {
            TagComparison::SameFirstDiv
        }
    }

    /// Valor de correspondência (0.0 a 1.0) entre esta tag e outra.
    pub fn match_value(&self, other: &Tag) -> f64 {
        self.compare(other).value()
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field
            && self.subdivisions == other.subdivisions
            && self.symbols == other.symbols
    }
}

impl Eq for Tag {}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl FromStr for Tag {
    type Err = CiallError;

    fn from_str(s: &str) -> Result<Self> {
        Tag::parse(s)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.raw
    }
}

impl TryFrom<String> for Tag {
    type Error = CiallError;

    fn try_from(value: String) -> Result<Self> {
        Tag::parse(&value)
    }
}

/// Tag composta: várias tags separadas por '/', indicando pertencimento
/// simultâneo a várias categorias. Sempre tem pelo menos uma tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CompoundTag {
    raw: String,
    tags: Vec<Tag>,
}

impl CompoundTag {
    pub fn parse(s: &str) -> Result<Self> {
        let raw = s.trim();
        let tags = raw.split('/').map(Tag::parse).collect::<Result<Vec<_>>>()?;
        Ok(Self {
            raw: raw.to_string(),
            tags,
        })
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn num_tags(&self) -> usize {
        self.tags.len()
    }

    /// Descrição composta pelas descrições de categoria (sem os modificadores).
    ///
    /// Ex: "Q1.2/S2mf" → "Paper documents and writing / People"
    pub fn description(&self) -> Result<String> {
        let parts = self
            .tags
            .iter()
            .map(Tag::category_description)
            .collect::<Result<Vec<_>>>()?;
        Ok(parts.join(" / "))
    }

    /// Valor de correspondência (0.0 a 1.0) entre duas tags compostas.
    ///
    /// Todos os pares (tag de `self`, tag de `other`) são comparados e apenas
    /// os pares com valor positivo são mantidos. O resultado é:
    ///
    /// $$ \text{média dos pares} \times \text{cobertura}_{self} \times \text{cobertura}_{other} $$
    ///
    /// onde a cobertura é a fração de tags de cada lado que participou de
    /// pelo menos um par positivo. A ordem das tags não importa.
    pub fn match_value(&self, other: &CompoundTag) -> f64 {
        let mut positive = Vec::new();
        let mut self_hit = vec![false; self.tags.len()];
        let mut other_hit = vec![false; other.tags.len()];

        for (si, stag) in self.tags.iter().enumerate() {
            for (oi, otag) in other.tags.iter().enumerate() {
                let value = stag.match_value(otag);
                if value > 0.0 {
                    positive.push(value);
                    self_hit[si] = true;
                    other_hit[oi] = true;
                }
            }
        }

        if positive.is_empty() {
            return 0.0;
        }

        let avg = positive.iter().sum::<f64>() / positive.len() as f64;
        avg * coverage(&self_hit) * coverage(&other_hit)
    }
}

fn coverage(hits: &[bool]) -> f64 {
    hits.iter().filter(|h| **h).count() as f64 / hits.len() as f64
}

impl fmt::Display for CompoundTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl FromStr for CompoundTag {
    type Err = CiallError;

    fn from_str(s: &str) -> Result<Self> {
        CompoundTag::parse(s)
    }
}

impl From<CompoundTag> for String {
    fn from(tag: CompoundTag) -> Self {
        tag.raw
    }
}

impl TryFrom<String> for CompoundTag {
    type Error = CiallError;

    fn try_from(value: String) -> Result<Self> {
        CompoundTag::parse(&value)
    }
}

/// Sentidos alternativos de um token, do mais provável para o menos provável.
///
/// A ordem importa: ela expressa a confiança do etiquetador e define o peso
/// de posição usado em [`MultiSenseTag::match_value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiSenseTag {
    senses: Vec<CompoundTag>,
}

impl MultiSenseTag {
    /// Peso da posição do sentido (1/posição).
    const POSITION_WEIGHT: f64 = 0.7;
    /// Peso do número total de sentidos (1/n).
    const NUM_SENSES_WEIGHT: f64 = 0.3;

    /// Parseia sentidos separados por espaço ou vírgula (ex: "Q1.2/S2mf,S7.2.5-").
    pub fn parse(s: &str) -> Result<Self> {
        let senses = s
            .split([' ', ','])
            .filter(|sense| !sense.trim().is_empty())
            .map(CompoundTag::parse)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { senses })
    }

    /// Constrói a partir da lista de candidatos do etiquetador (uma tag composta por item).
    pub fn from_candidates<S: AsRef<str>>(candidates: &[S]) -> Result<Self> {
        let senses = candidates
            .iter()
            .map(|c| CompoundTag::parse(c.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { senses })
    }

    pub fn senses(&self) -> &[CompoundTag] {
        &self.senses
    }

    pub fn num_senses(&self) -> usize {
        self.senses.len()
    }

    /// Valor de correspondência contra a tag composta esperada.
    ///
    /// Cada sentido na posição `p` (1-based) de `n` com valor `cm > 0` contribui
    /// `cm * (0.7/p + 0.3/n)`. Sentidos com valor zero são excluídos da média.
    ///
    /// # Exemplo
    /// `"Q1.2/S2mf L7.2.5- A1.2 B5"` contra `"B5"`: só o 4º sentido casa,
    /// `1.0 * (0.7/4 + 0.3/4) = 0.25`.
    pub fn match_value(&self, expected: &CompoundTag) -> f64 {
        let n = self.senses.len() as f64;
        let weighted: Vec<f64> = self
            .senses
            .iter()
            .enumerate()
            .filter_map(|(i, sense)| {
                let cm = sense.match_value(expected);
                if cm > 0.0 {
                    let position = (i + 1) as f64;
                    Some(cm * (Self::POSITION_WEIGHT / position + Self::NUM_SENSES_WEIGHT / n))
                } else {
                    None
                }
            })
            .collect();

        if weighted.is_empty() {
            0.0
        } else {
            weighted.iter().sum::<f64>() / weighted.len() as f64
        }
    }
}

impl fmt::Display for MultiSenseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let senses: Vec<String> = self.senses.iter().map(ToString::to_string).collect();
        write!(f, "{}", senses.join(" "))
    }
}

impl FromStr for MultiSenseTag {
    type Err = CiallError;

    fn from_str(s: &str) -> Result<Self> {
        MultiSenseTag::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tag(s: &str) -> Tag {
        Tag::parse(s).unwrap()
    }

    fn round3(v: f64) -> f64 {
        (v * 1000.0).round() / 1000.0
    }

    #[test]
    fn test_tag_parsing() {
        let t = tag("S1.2.3mf-");
        assert_eq!(t.field(), 'S');
        assert_eq!(t.subdivisions_str(), "1.2.3");
        assert_eq!(t.subdivisions(), ["1", "2", "3"]);
        assert_eq!(t.category(), "S1.2.3");
        assert_eq!(t.symbols_str(), "mf-");
        let expected: BTreeSet<String> = ["m", "f", "-"].iter().map(|s| s.to_string()).collect();
        assert_eq!(t.symbols(), &expected);

        let t = tag("A1.2fci++");
        assert_eq!(t.category(), "A1.2");
        assert_eq!(t.symbols_str(), "fci++");
        assert!(t.symbols().contains("++"));
        assert_eq!(t.symbols().len(), 4);
    }

    #[test]
    fn test_tag_display_roundtrip() {
        assert_eq!(tag(" S1.0.3mf- ").to_string(), "S1.0.3mf-");
    }

    #[test]
    fn test_invalid_tags() {
        for bad in ["", "D1", "a1", "A", "A1+-", "A1++++", "A1x", "/", "A.", "A..1", "A1.", "A.1"] {
            assert!(
                matches!(Tag::parse(bad), Err(CiallError::InvalidTag(_))),
                "'{bad}' deveria ser inválida"
            );
        }
    }

    #[test]
    fn test_tag_eq() {
        assert_eq!(tag("S1.2.3mf-"), tag("S1.2.3fm-"));
        assert_ne!(tag("S1.2.3mf-"), tag("Q3.4.5ni-"));
    }

    #[test]
    fn test_tag_descriptions() {
        let t = tag("S1.2.3mf-");
        assert_eq!(t.field_description().unwrap(), "Social actions, states and processes");
        assert_eq!(t.category_description().unwrap(), "Egoism");
        assert!(tag("A9.9.9").category_description().is_err());
    }

    #[test]
    fn test_tag_comparison() {
        let target = tag("A1.2.3f+");
        let cases = [
            ("A1.2.3f+", TagComparison::Equal),
            ("A1.2.3m+", TagComparison::SameCategory),
            ("A1.2.3", TagComparison::SameCategory),
            ("A1.2m+", TagComparison::SubCategory),
            ("A1.2", TagComparison::SubCategory),
            ("A1f+", TagComparison::SubCategory),
            ("A1.3f+", TagComparison::SameFirstDiv),
            ("A1.3.5", TagComparison::SameFirstDiv),
            ("A4.7n-", TagComparison::SameField),
            ("A4", TagComparison::SameField),
            ("Q4.5", TagComparison::Unequal),
        ];
        for (s, expected) in cases {
            assert_eq!(tag(s).compare(&target), expected, "{s} vs A1.2.3f+");
        }
    }

    #[test]
    fn test_tag_match_values() {
        let target = tag("A1.2.3f+");
        assert_eq!(tag("A1.2.3f+").match_value(&target), 1.0);
        assert_eq!(tag("A1.2.3m+").match_value(&target), 0.8);
        assert_eq!(tag("A1.2m+").match_value(&target), 0.7);
        assert_eq!(tag("A1.3.5").match_value(&target), 0.6);
        assert_eq!(tag("A4").match_value(&target), 0.4);
        assert_eq!(tag("Q4.5").match_value(&target), 0.0);
    }

    #[test]
    fn test_unmatched_is_unequal_even_to_itself() {
        let z99 = tag("Z99");
        assert_eq!(z99.compare(&z99), TagComparison::Unequal);
        assert_eq!(z99.match_value(&tag("Z9")), 0.0);
    }

    #[test]
    fn test_compound_tag_parsing() {
        let ct = CompoundTag::parse("Q1.2/S2mf").unwrap();
        assert_eq!(ct.num_tags(), 2);
        assert_eq!(ct.tags()[0].category(), "Q1.2");
        assert_eq!(ct.tags()[1].category(), "S2");
        assert_eq!(ct.description().unwrap(), "Paper documents and writing / People");
        assert!(CompoundTag::parse("").is_err());
        assert!(CompoundTag::parse("A1//B2").is_err());
    }

    #[test]
    fn test_compound_tag_match() {
        let ct = CompoundTag::parse("Q1.2/S2mf").unwrap();
        let cases = [
            ("S2mf/Q1.2", 1.0),
            ("S2mf", 0.5),
            ("Q1.2", 0.5),
            ("S2", 0.4),
            ("S2mf/A1.2", 0.25),
            ("S2/A1.2", 0.2),
        ];
        for (other, expected) in cases {
            let other = CompoundTag::parse(other).unwrap();
            assert_eq!(round3(ct.match_value(&other)), expected);
        }
    }

    #[test]
    fn test_multisense_parsing() {
        for s in ["Q1.2/S2mf S7.2.5-", "Q1.2/S2mf,S7.2.5-", " Q1.2/S2mf  S7.2.5- "] {
            let ms = MultiSenseTag::parse(s).unwrap();
            assert_eq!(ms.num_senses(), 2);
            assert_eq!(ms.senses()[0].num_tags(), 2);
            assert_eq!(ms.senses()[1].tags()[0].category(), "S7.2.5");
        }
    }

    #[test]
    fn test_multisense_match() {
        let cases = [
            ("Q1.2/S2mf L7.2.5- A1.2 B5", "C3.6/N5mf-", 0.0),
            ("Q1.2/S2mf", "Q1.2/S2mf", 1.0),
            ("Q1.2/S2mf L7.2.5-", "Q1.2/S2mf", 0.85),
            ("Q1.2/S2mf L7.2.5-", "L7.2.5-", 0.5),
            ("Q1.2/S2mf L7.2.5- A1.2", "Q1.2/S2mf", 0.8),
            ("Q1.2/S2mf L7.2.5- A1.2", "L7.2.5-", 0.45),
            ("Q1.2/S2mf L7.2.5- A1.2", "A1.2", 0.333),
            ("Q1.2/S2mf L7.2.5- A1.2 B5", "Q1.2/S2mf", 0.775),
            ("Q1.2/S2mf L7.2.5- A1.2 B5", "L7.2.5-", 0.425),
            ("Q1.2/S2mf L7.2.5- A1.2 B5", "A1.2", 0.308),
            ("Q1.2/S2mf L7.2.5- A1.2 B5", "B5", 0.25),
            ("Q1.2/S2mf L7.2.5-", "S2mf", 0.425),
            ("Q1.2/S2mf L7.2.5-", "Q1.2", 0.425),
            ("Q1.2/S2mf L7.2.5-", "S2", 0.34),
        ];
        for (ms, ct, expected) in cases {
            let ms = MultiSenseTag::parse(ms).unwrap();
            let ct = CompoundTag::parse(ct).unwrap();
            assert_eq!(round3(ms.match_value(&ct)), expected, "{ms} vs {ct}");
        }
    }

    #[test]
    fn test_multisense_from_candidates() {
        let ms = MultiSenseTag::from_candidates(&["A1", "C1"]).unwrap();
        assert_eq!(ms.to_string(), "A1 C1");
        let empty = MultiSenseTag::from_candidates::<&str>(&[]).unwrap();
        assert_eq!(empty.match_value(&CompoundTag::parse("A1").unwrap()), 0.0);
        assert!(MultiSenseTag::from_candidates(&["A1", "nope"]).is_err());
    }

    #[test]
    fn test_tag_serde_as_string() {
        let ct = CompoundTag::parse("Q1.2/S2mf").unwrap();
        let json = serde_json::to_string(&ct).unwrap();
        assert_eq!(json, "\"Q1.2/S2mf\"");
        let back: CompoundTag = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ct);
        assert!(serde_json::from_str::<Tag>("\"x1\"").is_err());
    }

    fn tag_strategy() -> impl Strategy<Value = String> {
        (
            prop::sample::select(vec!['A', 'B', 'S', 'Z']),
            prop::collection::vec(1u8..4, 1..4),
            "[fmnci%@]{0,2}",
            prop::sample::select(vec!["", "+", "++", "-", "---"]),
        )
            .prop_map(|(field, divs, syms, intensity)| {
                let divs: Vec<String> = divs.iter().map(|d| d.to_string()).collect();
                format!("{field}{}{syms}{intensity}", divs.join("."))
            })
    }

    proptest! {
        #[test]
        fn prop_tag_match_is_symmetric(a in tag_strategy(), b in tag_strategy()) {
            let (a, b) = (tag(&a), tag(&b));
            prop_assert_eq!(a.match_value(&b), b.match_value(&a));
        }

        #[test]
        fn prop_tag_matches_itself(a in tag_strategy()) {
            let a = tag(&a);
            let expected = if a.is_unmatched() { 0.0 } else { 1.0 };
            prop_assert_eq!(a.match_value(&a), expected);
        }

        #[test]
        fn prop_compound_match_is_symmetric(
            a in prop::collection::vec(tag_strategy(), 1..4),
            b in prop::collection::vec(tag_strategy(), 1..4),
        ) {
            let a = CompoundTag::parse(&a.join("/")).unwrap();
            let b = CompoundTag::parse(&b.join("/")).unwrap();
            let (ab, ba) = (a.match_value(&b), b.match_value(&a));
            prop_assert!((ab - ba).abs() < 1e-12);
            prop_assert!((0.0..=1.0).contains(&ab));
        }
    }
}
