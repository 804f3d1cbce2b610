//! # Avaliação de Acurácia
//!
//! Compara os candidatos produzidos pelo etiquetador com a tag esperada
//! (padrão-ouro) de cada token e acumula estatísticas por documento.
//!
//! ## Métricas
//!
//! | Métrica                   | Fórmula                                            |
//! |---------------------------|----------------------------------------------------|
//! | Cobertura lexical         | `(total - não casados) / total`                    |
//! | Totalmente corretos       | `tokens com valor 1.0 / população`                 |
//! | Acurácia                  | média dos valores de [`MultiSenseTag::match_value`] |
//!
//! Duas populações são medidas: **todos** os tokens e apenas as **palavras de
//! conteúdo** (classe PAROLE iniciando em `N`, `V`, `A`, `R` ou `M`).
//!
//! ## Populações Vazias
//!
//! Uma porcentagem sobre uma população sem membros (ex: documento sem palavras
//! de conteúdo) não é aplicável: o valor é `None` e o resumo textual mostra `n/a`.
//!
//! ## Ciclo de Vida
//!
//! 1. [`AccuracyReport::add_token`] para cada token.
//! 2. [`AccuracyReport::calculate_totals`] uma única vez ao final.
//! 3. [`combine`] agrega relatórios de vários documentos e recalcula os totais.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::taxonomy::UNMATCHED;
use crate::usas::{CompoundTag, MultiSenseTag};

/// Letras iniciais PAROLE das palavras de conteúdo.
pub const CONTENT_CLASSES: [char; 5] = ['N', 'V', 'A', 'R', 'M'];

/// Indica se a classe PAROLE (curta) é de uma palavra de conteúdo.
pub fn is_content_word(word_class: &str) -> bool {
    word_class
        .chars()
        .next()
        .is_some_and(|c| CONTENT_CLASSES.contains(&c))
}

/// Porcentagens calculadas por [`AccuracyReport::calculate_totals`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AccuracyTotals {
    pub lexical_coverage: Option<f64>,
    pub pc_all_fully_correct: Option<f64>,
    pub pc_cont_fully_correct: Option<f64>,
    pub pc_all_accuracy: Option<f64>,
    pub pc_cont_accuracy: Option<f64>,
}

/// Acumulador de acurácia de um documento.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccuracyReport {
    num_tokens: usize,
    num_unmatched: usize,
    num_all_fully_correct: usize,
    num_cont_fully_correct: usize,
    all_match_values: Vec<f64>,
    cont_match_values: Vec<f64>,
    totals: Option<AccuracyTotals>,
}

fn percentage(part: f64, whole: usize) -> Option<f64> {
    (whole > 0).then(|| part / whole as f64 * 100.0)
}

fn mean_percentage(values: &[f64]) -> Option<f64> {
    percentage(values.iter().sum(), values.len())
}

impl AccuracyReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra um token e retorna seu valor de correspondência.
    ///
    /// `candidates` é a lista ordenada de candidatos do etiquetador e
    /// `expected` a tag composta esperada. Uma tag mal formada em qualquer um
    /// dos dois é um erro.
    pub fn add_token<S: AsRef<str>>(
        &mut self,
        word_class: &str,
        candidates: &[S],
        expected: &str,
    ) -> Result<f64> {
        let value =
            MultiSenseTag::from_candidates(candidates)?.match_value(&CompoundTag::parse(expected)?);

        self.num_tokens += 1;
        if candidates.first().map(|c| c.as_ref()) == Some(UNMATCHED) {
            self.num_unmatched += 1;
        }

        self.all_match_values.push(value);
        if value == 1.0 {
            self.num_all_fully_correct += 1;
        }
        if is_content_word(word_class) {
            self.cont_match_values.push(value);
            if value == 1.0 {
                self.num_cont_fully_correct += 1;
            }
        }

        // Os totais anteriores ficam obsoletos
        self.totals = None;
        Ok(value)
    }

    /// Calcula as porcentagens. Deve ser chamado após o último `add_token`.
    pub fn calculate_totals(&mut self) -> AccuracyTotals {
        let totals = AccuracyTotals {
            lexical_coverage: percentage(
                (self.num_tokens - self.num_unmatched) as f64,
                self.num_tokens,
            ),
            pc_all_fully_correct: percentage(self.num_all_fully_correct as f64, self.num_tokens),
            pc_cont_fully_correct: percentage(
                self.num_cont_fully_correct as f64,
                self.cont_match_values.len(),
            ),
            pc_all_accuracy: mean_percentage(&self.all_match_values),
            pc_cont_accuracy: mean_percentage(&self.cont_match_values),
        };
        self.totals = Some(totals);
        totals
    }

    pub fn num_tokens(&self) -> usize {
        self.num_tokens
    }

    pub fn num_unmatched(&self) -> usize {
        self.num_unmatched
    }

    pub fn num_all_fully_correct(&self) -> usize {
        self.num_all_fully_correct
    }

    pub fn num_cont_fully_correct(&self) -> usize {
        self.num_cont_fully_correct
    }

    pub fn num_content_words(&self) -> usize {
        self.cont_match_values.len()
    }

    pub fn all_match_values(&self) -> &[f64] {
        &self.all_match_values
    }

    pub fn cont_match_values(&self) -> &[f64] {
        &self.cont_match_values
    }

    /// Totais, disponíveis apenas após [`AccuracyReport::calculate_totals`].
    pub fn totals(&self) -> Option<&AccuracyTotals> {
        self.totals.as_ref()
    }

    /// Resumo textual (porcentagens com duas casas decimais).
    pub fn summary(&self) -> String {
        let totals = self.totals.unwrap_or_default();
        let fmt_pc = |pc: Option<f64>| match pc {
            Some(v) => format!("{v:.2}%"),
            None => "n/a".to_string(),
        };

        let mut out = String::new();
        let _ = writeln!(out, "Total de tokens: {}", self.num_tokens);
        let _ = writeln!(out, "Tokens não casados (Z99): {}", self.num_unmatched);
        let _ = writeln!(out, "Palavras de conteúdo: {}", self.num_content_words());
        let _ = writeln!(out, "Cobertura lexical: {}", fmt_pc(totals.lexical_coverage));
        let _ = writeln!(out, "Totalmente corretos (todos): {}", fmt_pc(totals.pc_all_fully_correct));
        let _ = writeln!(
            out,
            "Totalmente corretos (conteúdo): {}",
            fmt_pc(totals.pc_cont_fully_correct)
        );
        let _ = writeln!(out, "Acurácia (todos): {}", fmt_pc(totals.pc_all_accuracy));
        let _ = write!(out, "Acurácia (conteúdo): {}", fmt_pc(totals.pc_cont_accuracy));
        out
    }
}

/// Agrega relatórios: soma os contadores, concatena as listas de valores e
/// recalcula os totais.
pub fn combine<'a, I>(reports: I) -> AccuracyReport
where
    I: IntoIterator<Item = &'a AccuracyReport>,
{
    let mut combined = reports
        .into_iter()
        .fold(AccuracyReport::default(), |mut acc, report| {
            acc.num_tokens += report.num_tokens;
            acc.num_unmatched += report.num_unmatched;
            acc.num_all_fully_correct += report.num_all_fully_correct;
            acc.num_cont_fully_correct += report.num_cont_fully_correct;
            acc.all_match_values.extend_from_slice(&report.all_match_values);
            acc.cont_match_values.extend_from_slice(&report.cont_match_values);
            acc
        });
    combined.calculate_totals();
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CiallError;

    // classe PAROLE, candidatos, tag esperada
    const FIXTURE: &[(&str, &[&str], &str)] = &[
        ("Nc", &["A1"], "A1"),       // conteúdo, correto
        ("Nc", &["B2"], "B2"),       // conteúdo, correto
        ("Nc", &["A1", "C1"], "A1"), // conteúdo, parcial
        ("Nc", &["Z99"], "A1"),      // conteúdo, não casado
        ("Nc", &["Z99"], "A1"),      // conteúdo, não casado
        ("D", &["Z5"], "Z5"),        // gramatical, correto
        ("Sp", &["Z8"], "Z8"),       // gramatical, correto
        ("Sp", &["Z8"], "Z5"),       // gramatical, parcial
        ("D", &["Z99"], "Z5"),       // gramatical, não casado
        ("D", &["Z99"], "Z5"),       // gramatical, não casado
    ];

    fn report_from(rows: &[(&str, &[&str], &str)]) -> AccuracyReport {
        let mut report = AccuracyReport::new();
        for (class, candidates, expected) in rows {
            report.add_token(class, *candidates, expected).unwrap();
        }
        report.calculate_totals();
        report
    }

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn test_accuracy_report() {
        let report = report_from(FIXTURE);
        let totals = report.totals().unwrap();

        assert!(approx(totals.lexical_coverage, 60.0));
        assert!(approx(totals.pc_all_fully_correct, 40.0));
        assert!(approx(totals.pc_cont_fully_correct, 40.0));

        let all = totals.pc_all_accuracy.unwrap();
        let cont = totals.pc_cont_accuracy.unwrap();
        assert!(all > 40.0 && all < 60.0, "acurácia geral: {all}");
        assert!(cont > 40.0 && cont < 60.0, "acurácia de conteúdo: {cont}");
    }

    #[test]
    fn test_add_token_values() {
        let mut report = AccuracyReport::new();
        assert_eq!(report.add_token("Nc", &["A1"], "A1").unwrap(), 1.0);
        let partial = report.add_token("Nc", &["A1", "C1"], "A1").unwrap();
        assert!((partial - 0.85).abs() < 1e-9);
        assert_eq!(report.add_token("Nc", &["Z99"], "A1").unwrap(), 0.0);
        assert_eq!(report.num_tokens(), 3);
        assert_eq!(report.num_unmatched(), 1);
        assert_eq!(report.num_all_fully_correct(), 1);
        assert!(report.totals().is_none());
    }

    #[test]
    fn test_zero_content_words_is_not_applicable() {
        let report = report_from(&[("D", &["Z5"], "Z5"), ("Sp", &["Z8"], "Z5")]);
        let totals = report.totals().unwrap();

        assert_eq!(report.num_content_words(), 0);
        assert_eq!(totals.pc_cont_fully_correct, None);
        assert_eq!(totals.pc_cont_accuracy, None);
        assert!(approx(totals.lexical_coverage, 100.0));
        assert!(report.summary().contains("Acurácia (conteúdo): n/a"));
    }

    #[test]
    fn test_empty_report() {
        let mut report = AccuracyReport::new();
        let totals = report.calculate_totals();
        assert_eq!(totals, AccuracyTotals::default());
        assert!(report.summary().contains("Cobertura lexical: n/a"));
    }

    #[test]
    fn test_invalid_tags_are_errors() {
        let mut report = AccuracyReport::new();
        assert!(report.add_token("Nc", &["a1"], "A1").is_err());
        assert!(report.add_token("Nc", &["A1"], "").is_err());
        assert_eq!(report.num_tokens(), 0);
    }

    #[test]
    fn test_each_candidate_is_one_sense() {
        let mut report = AccuracyReport::new();
        // Candidato vazio ou com vírgula não pode sumir nem virar dois sentidos
        assert!(matches!(
            report.add_token("Nc", &["", "A1"], "A1"),
            Err(CiallError::InvalidTag(_))
        ));
        assert!(matches!(
            report.add_token("Nc", &["B2,A1"], "A1"),
            Err(CiallError::InvalidTag(_))
        ));
        assert_eq!(report.num_tokens(), 0);

        // A posição do acerto conta: o segundo de dois candidatos não é correspondência total
        let second = report.add_token("Nc", &["B2", "A1"], "A1").unwrap();
        assert!(second < 1.0);
        assert_eq!(report.num_all_fully_correct(), 0);
    }

    #[test]
    fn test_combine_matches_union() {
        let first = report_from(&FIXTURE[..4]);
        let second = report_from(&FIXTURE[4..]);
        let combined = combine([&first, &second]);
        let direct = report_from(FIXTURE);

        assert_eq!(combined.num_tokens(), first.num_tokens() + second.num_tokens());
        assert_eq!(
            combined.num_unmatched(),
            first.num_unmatched() + second.num_unmatched()
        );
        assert_eq!(combined, direct);
    }

    #[test]
    fn test_summary_format() {
        let summary = report_from(FIXTURE).summary();
        assert!(summary.contains("Total de tokens: 10"));
        assert!(summary.contains("Cobertura lexical: 60.00%"));
        assert!(summary.contains("Acurácia (todos): 52.50%"));
    }

    #[test]
    fn test_is_content_word() {
        for class in ["Nc", "Vm", "Aq", "R", "Mc"] {
            assert!(is_content_word(class));
        }
        for class in ["D", "Sp", "Td", "F", ""] {
            assert!(!is_content_word(class));
        }
    }
}
