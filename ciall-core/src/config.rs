//! # Configuração do Pipeline (YAML)
//!
//! ```yaml
//! components:
//!   - ciall_musas_tagger
//!   - ciall_doc_tags
//!   - ciall_year_detector
//!   - ciall_prop_nouns
//! ciall_musas_tagger:
//!   sw_lexicon: sw_lexicon.tsv
//!   mw_lexicon: mw_lexicon.tsv
//! lemma_frequency: lemmafreq.csv
//! input:
//!   format: tsv
//!   fields: TOKEN|LEMMA|PAROLE
//! output:
//!   fields: ID|TOKEN|LEMMA|PAR_SHORT|MWE|USAS|USAS_DESCRIPTION
//! ```
//!
//! Caminhos relativos são resolvidos a partir do diretório do arquivo de
//! configuração.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cg3::document_from_cg3;
use crate::error::{CiallError, Result};
use crate::lemmafreq::LemmaFrequency;
use crate::token::Document;
use crate::tsv::{document_from_tsv, parse_field_list, TsvField};

/// Componentes do pipeline, na ordem em que podem aparecer na configuração.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    #[serde(rename = "ciall_musas_tagger")]
    MusasTagger,
    #[serde(rename = "ciall_doc_tags")]
    DocTags,
    #[serde(rename = "ciall_year_detector")]
    YearDetector,
    #[serde(rename = "ciall_prop_nouns")]
    PropNouns,
    /// Adicionado apenas no modo de avaliação, nunca pela configuração.
    #[serde(rename = "ciall_accuracy")]
    Accuracy,
}

impl Component {
    /// Componentes aceitos na lista `components` da configuração.
    pub const CONFIGURABLE: [Component; 4] = [
        Component::MusasTagger,
        Component::DocTags,
        Component::YearDetector,
        Component::PropNouns,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Component::MusasTagger => "ciall_musas_tagger",
            Component::DocTags => "ciall_doc_tags",
            Component::YearDetector => "ciall_year_detector",
            Component::PropNouns => "ciall_prop_nouns",
            Component::Accuracy => "ciall_accuracy",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Component {
    type Err = CiallError;

    fn from_str(s: &str) -> Result<Self> {
        Component::CONFIGURABLE
            .iter()
            .find(|c| c.name() == s)
            .copied()
            .ok_or_else(|| CiallError::InvalidComponent(s.to_string()))
    }
}

/// Formato de entrada.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    #[default]
    Tsv,
    Cg3,
}

impl InputFormat {
    /// Lê um documento neste formato. `fields` só se aplica a TSV e `freqs`
    /// só a CG3.
    pub fn read(&self, input: &str, fields: &[TsvField], freqs: &LemmaFrequency) -> Result<Document> {
        match self {
            InputFormat::Tsv => document_from_tsv(input, fields),
            InputFormat::Cg3 => document_from_cg3(input, freqs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusasTaggerConfig {
    pub sw_lexicon: PathBuf,
    pub mw_lexicon: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default)]
    pub format: InputFormat,
    /// Campos separados por `|`; ausente = o TSV tem cabeçalho.
    #[serde(default)]
    pub fields: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub fields: Option<String>,
}

/// Configuração completa, como lida do YAML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub components: Option<Vec<String>>,
    #[serde(default)]
    pub ciall_musas_tagger: Option<MusasTaggerConfig>,
    #[serde(default)]
    pub lemma_frequency: Option<PathBuf>,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl PipelineConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Lê o arquivo e resolve os caminhos relativos ao seu diretório.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::from_yaml_str(&std::fs::read_to_string(path)?)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        if let Some(tagger) = self.ciall_musas_tagger.as_mut() {
            resolve(&mut tagger.sw_lexicon);
            resolve(&mut tagger.mw_lexicon);
        }
        if let Some(freqs) = self.lemma_frequency.as_mut() {
            resolve(freqs);
        }
    }

    /// Componentes validados, na ordem da configuração.
    pub fn components(&self) -> Result<Vec<Component>> {
        let names = self
            .components
            .as_ref()
            .ok_or_else(|| CiallError::Config("chave 'components' ausente".to_string()))?;
        names.iter().map(|n| n.parse()).collect()
    }

    /// Tabela de frequência de lemas configurada, ou uma tabela vazia.
    pub fn lemma_frequency(&self) -> Result<LemmaFrequency> {
        match &self.lemma_frequency {
            Some(path) => LemmaFrequency::from_file(path),
            None => Ok(LemmaFrequency::default()),
        }
    }

    /// Campos de entrada TSV (vazio = usar o cabeçalho).
    pub fn input_fields(&self) -> Result<Vec<TsvField>> {
        match self.input.fields.as_deref() {
            Some(list) => parse_field_list(list),
            None => Ok(Vec::new()),
        }
    }

    /// Campos de saída; obrigatórios para escrever TSV.
    pub fn output_fields(&self) -> Result<Vec<TsvField>> {
        let list = self.output.fields.as_deref().ok_or_else(|| {
            CiallError::Config(
                "output.fields deve ser uma lista de campos separada por '|'".to_string(),
            )
        })?;
        parse_field_list(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = "
components:
  - ciall_musas_tagger
  - ciall_doc_tags
  - ciall_year_detector
  - ciall_prop_nouns
ciall_musas_tagger:
  sw_lexicon: lexicons/sw.tsv
  mw_lexicon: /abs/mw.tsv
input:
  format: cg3
output:
  fields: ID|TOKEN|USAS
";

    #[test]
    fn test_parse_config() {
        let config = PipelineConfig::from_yaml_str(YAML).unwrap();
        assert_eq!(
            config.components().unwrap(),
            vec![
                Component::MusasTagger,
                Component::DocTags,
                Component::YearDetector,
                Component::PropNouns
            ]
        );
        assert_eq!(config.input.format, InputFormat::Cg3);
        assert!(config.input_fields().unwrap().is_empty());
        assert_eq!(
            config.output_fields().unwrap(),
            vec![TsvField::Id, TsvField::Token, TsvField::Usas]
        );
    }

    #[test]
    fn test_resolve_paths() {
        let mut config = PipelineConfig::from_yaml_str(YAML).unwrap();
        config.resolve_paths(Path::new("/etc/ciall"));
        let tagger = config.ciall_musas_tagger.unwrap();
        assert_eq!(tagger.sw_lexicon, PathBuf::from("/etc/ciall/lexicons/sw.tsv"));
        assert_eq!(tagger.mw_lexicon, PathBuf::from("/abs/mw.tsv"));
    }

    #[test]
    fn test_missing_components() {
        let config = PipelineConfig::from_yaml_str("input:\n  format: tsv\n").unwrap();
        assert!(matches!(config.components(), Err(CiallError::Config(_))));
        assert!(matches!(config.output_fields(), Err(CiallError::Config(_))));
    }

    #[test]
    fn test_invalid_component() {
        let config =
            PipelineConfig::from_yaml_str("components: [ciall_musas_tagger, ciall_frames]\n")
                .unwrap();
        assert!(matches!(
            config.components(),
            Err(CiallError::InvalidComponent(c)) if c == "ciall_frames"
        ));

        let config = PipelineConfig::from_yaml_str("components: [ciall_accuracy]\n").unwrap();
        assert!(config.components().is_err());
    }

    #[test]
    fn test_read_by_format() {
        let freqs = LemmaFrequency::default();
        let doc = InputFormat::Tsv
            .read("TOKEN\tLEMMA\nTá\tbí\n", &[], &freqs)
            .unwrap();
        assert_eq!(doc.tokens[0].lemma, "bí");

        let doc = InputFormat::Cg3
            .read("\"<Tá>\"\n\t\"bí\" Verb VI PresInd\n", &[], &freqs)
            .unwrap();
        assert_eq!(doc.tokens[0].par_short, "Vm");
    }

    #[test]
    fn test_invalid_format_is_yaml_error() {
        let err = PipelineConfig::from_yaml_str("input:\n  format: xml\n").unwrap_err();
        assert!(matches!(err, CiallError::Yaml(_)));
    }
}
