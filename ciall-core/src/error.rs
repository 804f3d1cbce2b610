//! Tipos de erro do crate.

use thiserror::Error;

/// Erro comum a todos os módulos do `ciall-core`.
#[derive(Debug, Error)]
pub enum CiallError {
    /// A string não obedece à gramática de uma tag USAS (ex: "q1.2", "A1+-").
    #[error("'{0}' não é uma tag USAS válida")]
    InvalidTag(String),

    /// Categoria ausente da tabela de descrições (bug de completude dos dados estáticos).
    #[error("categoria USAS desconhecida: '{0}'")]
    UnknownCategory(String),

    /// Campo TSV que não pertence ao conjunto aceito.
    #[error("campo '{0}' não é um campo válido")]
    InvalidField(String),

    /// Campo obrigatório ausente no cabeçalho TSV.
    #[error("é necessário especificar pelo menos o campo '{0}'")]
    MissingField(String),

    /// Linha TSV com número de colunas diferente do cabeçalho.
    #[error("linha {line} tem {found} colunas, esperado {expected}")]
    RowLength {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Componente de pipeline desconhecido.
    #[error("'{0}' não é um componente válido")]
    InvalidComponent(String),

    /// Etiquetador que não devolveu exatamente uma saída por token.
    #[error("etiquetador devolveu {found} saídas para {expected} tokens")]
    TaggerOutput { expected: usize, found: usize },

    /// Configuração incompleta ou mal formada.
    #[error("configuração inválida: {0}")]
    Config(String),

    /// Linha de léxico mal formada.
    #[error("léxico inválido ({source_name}, linha {line}): {message}")]
    Lexicon {
        source_name: String,
        line: usize,
        message: String,
    },

    /// Entrada CG3 mal formada.
    #[error("entrada CG3 inválida na linha {line}: {message}")]
    Cg3 { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CiallError>;
