//! # ciall-core: Etiquetagem Semântica USAS para o Irlandês
//!
//! Este crate atribui categorias semânticas USAS a textos em irlandês já
//! analisados morfologicamente, desambigua candidatos usando o próprio
//! documento e mede a acurácia contra um padrão-ouro.
//!
//! ## Arquitetura do Sistema
//!
//! 1.  **Entrada**: TSV ([`tsv`]) ou saída CG3 de um analisador ([`cg3`]), com
//!     as leituras ambíguas ordenadas por frequência de lema ([`lemmafreq`]).
//! 2.  **Morfologia** ([`parole`]): traços do analisador → código PAROLE
//!     (longo, curto) e classe universal.
//! 3.  **Etiquetagem** ([`lexicon`]): candidatos USAS por léxico de palavras
//!     simples e expressões multipalavra, com curingas por classe PAROLE.
//! 4.  **Desambiguação** ([`doc_tags`]): reordena candidatos pela frequência
//!     de campos do documento.
//! 5.  **Heurísticas** ([`heuristics`]): anos e nomes próprios.
//! 6.  **Avaliação** ([`accuracy`]): cobertura e acurácia por token.
//! 7.  **Saída**: TSV com as colunas configuradas ([`tsv`]).
//!
//! O modelo de tags ([`usas`]) e a tabela de descrições ([`taxonomy`]) são a
//! base de todos os estágios.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use ciall_core::{cg3::document_from_cg3, corpus, CiallPipeline};
//!
//! let freqs = corpus::demo_lemma_frequency();
//! let doc = document_from_cg3(corpus::CG3_SAMPLE, &freqs).unwrap();
//!
//! let pipeline = CiallPipeline::demo();
//! let doc = pipeline.run(doc).unwrap();
//!
//! for token in &doc.tokens {
//!     println!("{}\t{}", token.text, token.musas_tags_str());
//! }
//! ```

pub mod accuracy;
pub mod cg3;
pub mod config;
pub mod corpus;
pub mod doc_tags;
pub mod error;
pub mod heuristics;
pub mod lemmafreq;
pub mod lexicon;
pub mod parole;
pub mod pipeline;
pub mod tagger;
pub mod taxonomy;
pub mod token;
pub mod tsv;
pub mod usas;

pub use accuracy::AccuracyReport;
pub use config::{Component, InputFormat, PipelineConfig};
pub use error::{CiallError, Result};
pub use pipeline::{CiallPipeline, Coverage, PipelineEvent};
pub use token::{Document, Token};
pub use usas::{CompoundTag, MultiSenseTag, Tag};
