//! # Pipeline de Etiquetagem Semântica: Orquestrador com Eventos Observáveis
//!
//! O pipeline aplica, em ordem, os componentes configurados sobre um
//! [`Document`] e emite eventos a cada passo via um canal Rust (`mpsc`),
//! permitindo que o servidor WebSocket transmita o progresso em tempo real.
//!
//! ## Componentes
//!
//! | Componente             | Efeito                                                      |
//! |------------------------|-------------------------------------------------------------|
//! | `ciall_musas_tagger`   | candidatos USAS por léxico + curingas para `Z99`            |
//! | `ciall_doc_tags`       | reordena candidatos ambíguos pela frequência de campos      |
//! | `ciall_year_detector`  | `T1.3` para numerais que parecem anos                       |
//! | `ciall_prop_nouns`     | `Z1`/`Z2` para nomes próprios de pessoa/lugar               |
//! | `ciall_accuracy`       | relatório de acurácia (apenas no modo de avaliação)         |
//!
//! ## Lotes
//!
//! Documentos são independentes: [`CiallPipeline::process_batch`] processa cada
//! um em paralelo (rayon) e agrega os relatórios de acurácia ao final, numa
//! única thread, com [`combine`].

use std::fmt;
use std::sync::{mpsc, Arc};
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::accuracy::{combine, AccuracyReport};
use crate::config::{Component, PipelineConfig};
use crate::corpus::demo_tagger;
use crate::doc_tags::disambiguate;
use crate::error::{CiallError, Result};
use crate::heuristics::{detect_years, resolve_proper_nouns, HeuristicChange};
use crate::lexicon::{apply_wildcards, LexiconTagger};
use crate::tagger::SemanticTagger;
use crate::taxonomy::UNMATCHED;
use crate::token::{Document, Token};

/// Eventos emitidos pelo pipeline durante o processamento.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PipelineEvent {
    /// **Passo 0**: documento recebido (tokens com lema e PAROLE).
    DocumentReceived { tokens: Vec<Token>, total: usize },
    /// Um componente começou a executar.
    ComponentStarted { component: String },
    /// Candidatos atribuídos a um token.
    TagsAssigned {
        token_index: usize,
        token_text: String,
        tags: Vec<String>,
        mwe_indexes: Vec<(usize, usize)>,
        source: String, // "lexicon" ou "wildcard"
    },
    /// Frequência dos campos USAS não ambíguos do documento.
    FieldStatsComputed { fields: Vec<(char, usize)> },
    /// Candidatos de um token ambíguo reordenados.
    TagsReordered {
        token_index: usize,
        token_text: String,
        before: Vec<String>,
        after: Vec<String>,
    },
    /// Uma heurística alterou os candidatos de um token.
    HeuristicApplied {
        token_index: usize,
        token_text: String,
        rule: String,
        tags: Vec<String>,
    },
    /// Relatório de acurácia do documento.
    AccuracyComputed { report: AccuracyReport, summary: String },
    /// **Conclusão**: documento final e cobertura.
    Done {
        document: Document,
        coverage: Coverage,
        processing_ms: u64,
    },
    /// **Falha**: erro irrecuperável (ex: tag mal formada no léxico).
    Error { message: String },
}

/// Cobertura da etiquetagem: tokens etiquetados e quantos não casaram (`Z99`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    pub num_tokens: usize,
    pub num_unmatched: usize,
    pub num_matched: usize,
    /// Porcentagem de tokens casados, 3 casas decimais (`None` sem tokens etiquetados).
    pub pc_matched: Option<f64>,
}

impl Coverage {
    /// Conta apenas tokens com candidatos.
    pub fn of(tokens: &[Token]) -> Self {
        let tagged: Vec<&Token> = tokens.iter().filter(|t| t.musas_tags.is_some()).collect();
        let num_tokens = tagged.len();
        let num_unmatched = tagged
            .iter()
            .filter(|t| t.top_tag() == Some(UNMATCHED))
            .count();
        let num_matched = num_tokens - num_unmatched;
        let pc_matched = (num_tokens > 0)
            .then(|| (num_matched as f64 / num_tokens as f64 * 100.0 * 1000.0).round() / 1000.0);
        Coverage {
            num_tokens,
            num_unmatched,
            num_matched,
            pc_matched,
        }
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total de tokens: {}", self.num_tokens)?;
        writeln!(f, "Tokens casados: {}", self.num_matched)?;
        match self.pc_matched {
            Some(pc) => write!(f, "Porcentagem de tokens casados: {pc}%"),
            None => write!(f, "Porcentagem de tokens casados: n/a"),
        }
    }
}

/// O pipeline de etiquetagem semântica.
///
/// # Modos de Uso
/// - **Sync**: [`CiallPipeline::run`] para scripts e a CLI.
/// - **Streaming**: [`CiallPipeline::run_streaming`] para a interface (via WebSocket).
/// - **Lote**: [`CiallPipeline::process_batch`] para vários documentos em paralelo.
#[derive(Clone)]
pub struct CiallPipeline {
    components: Vec<Component>,
    tagger: Option<Arc<dyn SemanticTagger>>,
}

impl CiallPipeline {
    /// Cria o pipeline. `ciall_musas_tagger` exige um etiquetador.
    pub fn new(
        components: Vec<Component>,
        tagger: Option<Arc<dyn SemanticTagger>>,
    ) -> Result<Self> {
        if components.contains(&Component::MusasTagger) && tagger.is_none() {
            return Err(CiallError::Config(
                "ciall_musas_tagger exige os léxicos sw_lexicon e mw_lexicon".to_string(),
            ));
        }
        Ok(Self { components, tagger })
    }

    /// Monta o pipeline a partir da configuração, carregando os léxicos.
    pub fn from_config(config: &PipelineConfig, accuracy: bool) -> Result<Self> {
        let components = config.components()?;
        let tagger: Option<Arc<dyn SemanticTagger>> = match &config.ciall_musas_tagger {
            Some(lexicons) if components.contains(&Component::MusasTagger) => Some(Arc::new(
                LexiconTagger::from_files(&lexicons.sw_lexicon, &lexicons.mw_lexicon)?,
            )),
            _ => None,
        };
        let pipeline = Self::new(components, tagger)?;
        Ok(pipeline.with_accuracy(accuracy))
    }

    /// Pipeline completo com os léxicos de demonstração.
    pub fn demo() -> Self {
        Self {
            components: Component::CONFIGURABLE.to_vec(),
            tagger: Some(Arc::new(demo_tagger())),
        }
    }

    /// Acrescenta (ou remove) o componente de acurácia ao final.
    ///
    /// Clones compartilham o etiquetador, então `pipeline.clone().with_accuracy(true)`
    /// não recarrega os léxicos.
    pub fn with_accuracy(mut self, accuracy: bool) -> Self {
        self.components.retain(|c| *c != Component::Accuracy);
        if accuracy {
            self.components.push(Component::Accuracy);
        }
        self
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Processa o documento de forma síncrona.
    pub fn run(&self, mut doc: Document) -> Result<Document> {
        self.process(&mut doc, &mut |_| {})?;
        Ok(doc)
    }

    /// Executa o pipeline enviando eventos de progresso pelo canal `tx`.
    ///
    /// # Fluxo de Eventos
    /// 1. `DocumentReceived`
    /// 2. Para cada componente: `ComponentStarted` seguido dos eventos do componente.
    /// 3. `Done` com o documento final, ou `Error`.
    pub fn run_streaming(&self, mut doc: Document, tx: mpsc::Sender<PipelineEvent>) {
        let start = Instant::now();
        let _ = tx.send(PipelineEvent::DocumentReceived {
            tokens: doc.tokens.clone(),
            total: doc.len(),
        });

        let result = self.process(&mut doc, &mut |event| {
            let _ = tx.send(event);
        });

        let _ = match result {
            Ok(()) => tx.send(PipelineEvent::Done {
                coverage: Coverage::of(&doc.tokens),
                document: doc,
                processing_ms: start.elapsed().as_millis() as u64,
            }),
            Err(err) => tx.send(PipelineEvent::Error {
                message: err.to_string(),
            }),
        };
    }

    /// Processa vários documentos em paralelo e agrega os relatórios de acurácia.
    pub fn process_batch(
        &self,
        docs: Vec<Document>,
    ) -> Result<(Vec<Document>, Option<AccuracyReport>)> {
        let docs = docs
            .into_par_iter()
            .map(|doc| self.run(doc))
            .collect::<Result<Vec<_>>>()?;

        let reports: Vec<&AccuracyReport> = docs
            .iter()
            .filter_map(|d| d.accuracy_report.as_ref())
            .collect();
        let combined = (!reports.is_empty()).then(|| combine(reports));
        Ok((docs, combined))
    }

    /// Núcleo do pipeline: aplica os componentes e entrega cada evento a `emit`.
    fn process(&self, doc: &mut Document, emit: &mut dyn FnMut(PipelineEvent)) -> Result<()> {
        let start = Instant::now();
        for component in &self.components {
            emit(PipelineEvent::ComponentStarted {
                component: component.to_string(),
            });
            match component {
                Component::MusasTagger => self.apply_tagger(doc, emit)?,
                Component::DocTags => apply_doc_tags(doc, emit)?,
                Component::YearDetector => {
                    let changes = detect_years(&mut doc.tokens);
                    emit_heuristics(&doc.tokens, changes, emit);
                }
                Component::PropNouns => {
                    let changes = resolve_proper_nouns(&mut doc.tokens);
                    emit_heuristics(&doc.tokens, changes, emit);
                }
                Component::Accuracy => apply_accuracy(doc, emit)?,
            }
        }

        let coverage = Coverage::of(&doc.tokens);
        info!(
            tokens = doc.len(),
            tagged = coverage.num_tokens,
            unmatched = coverage.num_unmatched,
            ms = start.elapsed().as_millis() as u64,
            "documento processado"
        );
        Ok(())
    }

    fn apply_tagger(
        &self,
        doc: &mut Document,
        emit: &mut dyn FnMut(PipelineEvent),
    ) -> Result<()> {
        let Some(tagger) = self.tagger.as_ref() else {
            return Ok(());
        };
        let outputs = tagger.tag(&doc.tokens);
        if outputs.len() != doc.tokens.len() {
            return Err(CiallError::TaggerOutput {
                expected: doc.tokens.len(),
                found: outputs.len(),
            });
        }

        for (token, output) in doc.tokens.iter_mut().zip(outputs) {
            // Tokens em branco (quebras de linha) ficam sem etiqueta
            if token.is_blank() {
                continue;
            }
            emit(PipelineEvent::TagsAssigned {
                token_index: token.index,
                token_text: token.text.clone(),
                tags: output.tags.clone(),
                mwe_indexes: output.mwe_indexes.clone(),
                source: "lexicon".to_string(),
            });
            token.musas_tags = Some(output.tags);
            token.mwe_indexes = Some(output.mwe_indexes);
        }

        for index in apply_wildcards(&mut doc.tokens) {
            if let Some(token) = doc.tokens.get(index) {
                debug!(token = %token.text, tag = ?token.musas_tags, "curinga aplicado");
                emit(PipelineEvent::TagsAssigned {
                    token_index: index,
                    token_text: token.text.clone(),
                    tags: token.musas_tags.clone().unwrap_or_default(),
                    mwe_indexes: token.mwe_indexes.clone().unwrap_or_default(),
                    source: "wildcard".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn apply_doc_tags(doc: &mut Document, emit: &mut dyn FnMut(PipelineEvent)) -> Result<()> {
    let (stats, reorderings) = disambiguate(&mut doc.tokens)?;
    emit(PipelineEvent::FieldStatsComputed {
        fields: stats.most_common(),
    });
    for r in reorderings {
        let token_text = doc
            .tokens
            .get(r.token_index)
            .map(|t| t.text.clone())
            .unwrap_or_default();
        emit(PipelineEvent::TagsReordered {
            token_index: r.token_index,
            token_text,
            before: r.before,
            after: r.after,
        });
    }
    doc.field_stats = stats;
    Ok(())
}

fn emit_heuristics(
    tokens: &[Token],
    changes: Vec<HeuristicChange>,
    emit: &mut dyn FnMut(PipelineEvent),
) {
    for change in changes {
        let token_text = tokens
            .get(change.token_index)
            .map(|t| t.text.clone())
            .unwrap_or_default();
        emit(PipelineEvent::HeuristicApplied {
            token_index: change.token_index,
            token_text,
            rule: change.rule,
            tags: change.tags,
        });
    }
}

/// Compara os candidatos de cada token com a tag esperada.
///
/// Tokens sem candidatos contam como não casados (`Z99`).
fn apply_accuracy(doc: &mut Document, emit: &mut dyn FnMut(PipelineEvent)) -> Result<()> {
    let unmatched = vec![UNMATCHED.to_string()];
    let mut report = AccuracyReport::new();
    for token in &doc.tokens {
        let Some(expected) = token.expected_musas_tag.as_deref() else {
            continue;
        };
        let candidates = token.musas_tags.as_ref().unwrap_or(&unmatched);
        report.add_token(&token.par_short, candidates, expected)?;
    }
    report.calculate_totals();
    info!(tokens = report.num_tokens(), "acurácia calculada");

    emit(PipelineEvent::AccuracyComputed {
        summary: report.summary(),
        report: report.clone(),
    });
    doc.accuracy_report = Some(report);
    Ok(())
}
